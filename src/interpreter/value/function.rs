use std::{fmt, rc::Rc};

use crate::{
    ast::Expr,
    interpreter::{
        evaluator::{
            core::{Context, EvalResult},
            function::argument::Argument,
        },
        scope::Scope,
        value::core::Value,
    },
};

/// Signature of a native built-in.
///
/// Built-ins receive their arguments unevaluated, so they can read names,
/// skip branches or evaluate in a scope of their own making.
pub type NativeFn = fn(&mut Context, &[Argument<'_>]) -> EvalResult<Option<Value>>;

/// A callable value.
pub enum Function {
    /// A closure over an expression and the scope it was defined in.
    User(UserFunction),
    /// A function implemented natively.
    Builtin(BuiltinFunction),
}

/// A function defined in the language, by `f(x) = ...` or `lambda`.
pub struct UserFunction {
    /// Name used in messages; lambdas are `<anonymous>`.
    pub name:   String,
    /// Parameter names, bound immutably on each call.
    pub params: Vec<String>,
    /// The body, evaluated in a fresh child of `scope` on each call.
    pub body:   Rc<Expr>,
    /// The defining scope.
    pub scope:  Rc<Scope>,
}

/// A native function registered in the global scope.
#[derive(Clone, Copy)]
pub struct BuiltinFunction {
    /// Name the function is bound under.
    pub name:   &'static str,
    /// Parameter names, for display and arity checks.
    pub params: &'static [&'static str],
    /// The implementation.
    pub native: NativeFn,
}

impl Function {
    /// The function's name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::User(function) => &function.name,
            Self::Builtin(function) => function.name,
        }
    }

    /// The function's parameter names.
    #[must_use]
    pub fn params(&self) -> Vec<&str> {
        match self {
            Self::User(function) => function.params.iter().map(String::as_str).collect(),
            Self::Builtin(function) => function.params.to_vec(),
        }
    }

    /// `"UserFunction"` or `"BuiltinFunction"`.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::User(_) => "UserFunction",
            Self::Builtin(_) => "BuiltinFunction",
        }
    }

    /// Calls the function with unevaluated arguments.
    ///
    /// See [`Context::call_function`].
    pub fn call(&self, context: &mut Context, args: &[Argument<'_>]) -> EvalResult<Option<Value>> {
        context.call_function(self, args)
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}({})", self.kind(), self.name(), self.params().join(", "))
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}")
    }
}
