use std::rc::Rc;

use crate::{
    ast::{BinaryOperator, Expr},
    error::RuntimeError,
    interpreter::{
        evaluator::{
            core::{Context, EvalResult},
            function::{argument::Argument, builtin, log, special},
            utils::{check_arity, describe},
        },
        scope::Scope,
        value::{
            core::Value,
            function::{BuiltinFunction, Function},
        },
    },
};

/// Defines builtin functions by generating a lookup table and a name list.
///
/// Each entry provides:
/// - a string name,
/// - the parameter names, which also fix the arity,
/// - a function pointer implementing the builtin.
///
/// The macro produces:
/// - `BUILTIN_TABLE` (static table for lookup),
/// - `BUILTIN_FUNCTIONS` (public list of builtin names).
macro_rules! builtin_functions {
    (
        $(
            $name:literal => {
                params: [$($param:literal),* $(,)?],
                native: $native:expr $(,)?
            }
        ),* $(,)?
    ) => {
        static BUILTIN_TABLE: &[BuiltinFunction] = &[
            $(
                BuiltinFunction { name: $name, params: &[$($param),*], native: $native },
            )*
        ];
        /// Names of all built-in functions, in registration order.
        pub const BUILTIN_FUNCTIONS: &[&str] = &[
            $($name,)*
        ];
    };
}

builtin_functions! {
    "lambda"  => { params: ["param_names", "expression"], native: special::lambda },
    "sum"     => { params: ["index", "start", "end", "expression"], native: special::sum },
    "ifelse"  => { params: ["condition", "expression_true", "expression_false"], native: special::ifelse },
    "delete"  => { params: ["name"], native: special::delete },
    "len"     => { params: ["array"], native: builtin::len },
    "zeros"   => { params: ["dims"], native: builtin::zeros },
    "sin"     => { params: ["theta"], native: builtin::sin },
    "cos"     => { params: ["theta"], native: builtin::cos },
    "tan"     => { params: ["theta"], native: builtin::tan },
    "arcsin"  => { params: ["x"], native: builtin::arcsin },
    "arccos"  => { params: ["x"], native: builtin::arccos },
    "arctan"  => { params: ["x"], native: builtin::arctan },
    "arctan2" => { params: ["y", "x"], native: builtin::arctan2 },
    "sqrt"    => { params: ["x"], native: builtin::sqrt },
    "exp"     => { params: ["x"], native: builtin::exp },
    "ln"      => { params: ["x"], native: log::ln },
    "log"     => { params: ["x"], native: log::log },
    "log2"    => { params: ["x"], native: log::log2 },
    "logb"    => { params: ["x", "base"], native: log::logb },
}

/// Constants bound immutably in the global scope.
pub const CONSTANTS: &[(&str, f64)] = &[("True", 1.0),
                                        ("False", 0.0),
                                        ("pi", std::f64::consts::PI),
                                        ("e", std::f64::consts::E)];

/// Looks up a built-in by name.
///
/// # Example
/// ```
/// use combicalc::interpreter::evaluator::function::core::builtin;
///
/// assert_eq!(builtin("logb").map(|f| f.params), Some(&["x", "base"][..]));
/// assert!(builtin("print").is_none());
/// ```
#[must_use]
pub fn builtin(name: &str) -> Option<BuiltinFunction> {
    BUILTIN_TABLE.iter().find(|b| b.name == name).copied()
}

/// Binds the constants and every built-in immutably in `scope`.
pub fn install_globals(scope: &Scope) {
    for &(name, value) in CONSTANTS {
        scope.set_value(name, Value::Number(value), false);
    }
    for function in BUILTIN_TABLE {
        scope.set_value(function.name, Function::Builtin(*function).into(), false);
    }
}

impl Context {
    /// Evaluates a curried call `callee(group)(group)...`.
    ///
    /// The callee is evaluated once. Each argument group calls the current
    /// function and its result becomes the callee of the next group.
    ///
    /// A callee that is not a function may still be followed by exactly one
    /// group holding exactly one argument, which is read as multiplication:
    /// `3(4)` is `12`.
    ///
    /// # Errors
    /// - [`RuntimeError::NotCallable`] if a non-function is called in any
    ///   other way.
    /// - Whatever the called functions raise.
    pub(crate) fn eval_call(&mut self,
                            callee: &Expr,
                            groups: &[Vec<Expr>],
                            scope: &Rc<Scope>)
                            -> EvalResult<Option<Value>> {
        let mut current = self.eval(callee, scope)?;

        for group in groups {
            current = match current.take() {
                Some(Value::Function(function)) => {
                    let args = group.iter()
                                    .map(|expr| Argument::new(expr, scope))
                                    .collect::<Vec<_>>();
                    function.call(self, &args)?
                },
                Some(value) if groups.len() == 1 && group.len() == 1 => {
                    let factor = self.eval_value(&group[0], scope, "a factor")?;
                    Some(Self::eval_binary(BinaryOperator::Mul, &value, &factor)?)
                },
                other => return Err(RuntimeError::NotCallable { kind: describe(other.as_ref()) }),
            };
        }

        Ok(current)
    }

    /// Calls a function with unevaluated arguments.
    ///
    /// A user function gets a fresh child of its defining scope. Its
    /// arguments are evaluated where the call was written and bound
    /// immutably under the parameter names before the body runs. A built-in
    /// receives the arguments as they are.
    ///
    /// # Errors
    /// - [`RuntimeError::ArityMismatch`] if the argument count differs from
    ///   the parameter count.
    /// - Any error raised while evaluating arguments or the body.
    ///
    /// # Example
    /// ```
    /// use combicalc::{
    ///     ast::Expr,
    ///     interpreter::{
    ///         evaluator::{core::Context, function::argument::Argument},
    ///         scope::Scope,
    ///         value::core::Value,
    ///     },
    /// };
    ///
    /// let mut context = Context::default();
    /// let scope = Scope::global();
    ///
    /// let Value::Function(sqrt) = scope.lookup("sqrt").unwrap() else { panic!() };
    /// let arg = Expr::Number(16.0);
    ///
    /// let result = context.call_function(&sqrt, &[Argument::new(&arg, &scope)]).unwrap();
    /// assert_eq!(result, Some(Value::Number(4.0)));
    /// ```
    pub fn call_function(&mut self, function: &Function, args: &[Argument<'_>]) -> EvalResult<Option<Value>> {
        match function {
            Function::User(user) => {
                check_arity(&user.name, user.params.len(), args.len())?;
                tracing::trace!(name = %user.name, args = args.len(), "calling user function");

                let local = Scope::child(&user.scope);
                for (param, arg) in user.params.iter().zip(args) {
                    let value = arg.eval(self, "an argument")?;
                    local.set_value(param, value, false);
                }

                self.eval(&user.body, &local)
            },
            Function::Builtin(native) => {
                check_arity(native.name, native.params.len(), args.len())?;
                (native.native)(self, args)
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::parser::parse;

    fn run(scope: &Rc<Scope>, source: &str) -> EvalResult<Option<Value>> {
        let program = parse(source).unwrap();
        Context::default().eval_program(&program, scope)
    }

    #[test]
    fn builtin_names_are_unique() {
        for (i, name) in BUILTIN_FUNCTIONS.iter().enumerate() {
            assert!(!BUILTIN_FUNCTIONS[i + 1..].contains(name), "{name} registered twice");
        }
    }

    #[test]
    fn globals_are_immutable() {
        let scope = Scope::global();

        run(&scope, "pi = 3; sin = 2").unwrap();

        assert_eq!(scope.lookup("pi"), Ok(Value::Number(std::f64::consts::PI)));
        assert!(matches!(scope.lookup("sin"), Ok(Value::Function(_))));
    }

    #[test]
    fn curried_calls_thread_results() {
        let scope = Scope::global();

        let value = run(&scope, "add(x) = lambda(y, x + y); add(2)(3)").unwrap();

        assert_eq!(value, Some(Value::Number(5.0)));
    }

    #[test]
    fn non_functions_multiply_only_with_one_argument() {
        let scope = Scope::global();

        assert_eq!(run(&scope, "x = 3; x(4)").unwrap(), Some(Value::Number(12.0)));
        assert_eq!(run(&scope, "x(1, 2)"),
                   Err(RuntimeError::NotCallable { kind: "a number".to_string() }));
        assert_eq!(run(&scope, "x(1)(2)"),
                   Err(RuntimeError::NotCallable { kind: "a number".to_string() }));
    }

    #[test]
    fn arity_is_checked_per_group() {
        let scope = Scope::global();

        assert_eq!(run(&scope, "f(a, b) = a * b; f(1)"),
                   Err(RuntimeError::ArityMismatch { name:     "f".to_string(),
                                                     expected: 2,
                                                     found:    1, }));
    }

    #[test]
    fn closures_see_their_defining_scope() {
        let scope = Scope::global();

        run(&scope, "k = 10; g(x) = x + k; h(k) = g(k)").unwrap();

        assert_eq!(run(&scope, "h(1)").unwrap(), Some(Value::Number(11.0)));
        assert_eq!(run(&scope, "k = 20; h(1)").unwrap(), Some(Value::Number(21.0)));
    }
}
