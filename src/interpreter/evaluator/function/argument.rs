use std::rc::Rc;

use crate::{
    ast::Expr,
    error::RuntimeError,
    interpreter::{
        evaluator::core::{Context, EvalResult},
        scope::Scope,
        value::core::Value,
    },
};

/// An unevaluated call argument.
///
/// Built-ins decide themselves whether and where to evaluate an argument:
/// `ifelse` skips the branch it does not take, `lambda` reads its parameter
/// names without evaluating them and `sum` evaluates its body in a scope of
/// its own.
#[derive(Debug, Clone, Copy)]
pub struct Argument<'a> {
    expr:  &'a Expr,
    scope: &'a Rc<Scope>,
}

impl<'a> Argument<'a> {
    /// Wraps `expr`, to be evaluated in `scope`.
    #[must_use]
    pub const fn new(expr: &'a Expr, scope: &'a Rc<Scope>) -> Self {
        Self { expr, scope }
    }

    /// Evaluates the argument in its own scope.
    ///
    /// # Errors
    /// Fails like [`Context::eval_value`], naming `purpose` when the
    /// argument has no usable value.
    pub fn eval(&self, context: &mut Context, purpose: &'static str) -> EvalResult<Value> {
        context.eval_value(self.expr, self.scope, purpose)
    }

    /// Reads the argument as bare names, without evaluating it.
    ///
    /// See [`Expr::to_word_list`].
    #[must_use]
    pub fn to_word_list(&self) -> Option<Vec<String>> {
        self.expr.to_word_list()
    }

    /// The scope the argument belongs to.
    #[must_use]
    pub const fn scope(&self) -> &'a Rc<Scope> {
        self.scope
    }

    /// The unevaluated expression.
    #[must_use]
    pub const fn expr(&self) -> &'a Expr {
        self.expr
    }
}

/// Destructures the arguments of a built-in into a fixed-size array.
///
/// # Errors
/// Returns [`RuntimeError::ArityMismatch`] if there are not exactly `N`
/// arguments.
///
/// # Example
/// ```
/// use combicalc::{
///     ast::Expr,
///     interpreter::{evaluator::function::argument::{Argument, unpack}, scope::Scope},
/// };
///
/// let scope = Scope::root();
/// let expr = Expr::Number(1.0);
/// let args = [Argument::new(&expr, &scope), Argument::new(&expr, &scope)];
///
/// let [_x, _y] = unpack::<2>("f", &args).unwrap();
/// assert!(unpack::<3>("f", &args).is_err());
/// ```
pub fn unpack<'s, 'a, const N: usize>(name: &str,
                                      args: &'s [Argument<'a>])
                                      -> EvalResult<&'s [Argument<'a>; N]> {
    <&[Argument<'a>; N]>::try_from(args).map_err(|_| RuntimeError::ArityMismatch { name:     name.to_string(),
                                                                                   expected: N,
                                                                                   found:    args.len(), })
}

/// Reads an argument that must be a single bare name.
///
/// # Errors
/// Returns [`RuntimeError::InvalidArgument`] otherwise.
pub fn single_name(function: &str, argument: &Argument<'_>) -> EvalResult<String> {
    match argument.to_word_list().as_deref() {
        Some([name]) => Ok(name.clone()),
        _ => Err(RuntimeError::InvalidArgument { details: format!("{function} expects a single name") }),
    }
}
