use std::rc::Rc;

use crate::{
    ast::Expr,
    error::RuntimeError,
    interpreter::{
        evaluator::core::{Context, EvalResult},
        scope::Scope,
        value::core::Value,
    },
    util::num::f64_to_i64_checked,
};

impl Context {
    /// Evaluates a subexpression and ensures that it produces a usable value.
    ///
    /// Many evaluation paths need the same sequence: evaluate, reject the
    /// empty result, reject word lists. This helper centralizes that so
    /// operators, arrays, calls and definitions report the same errors.
    ///
    /// # Parameters
    /// - `expr`: Expression to evaluate.
    /// - `scope`: Scope to evaluate it in.
    /// - `context`: What the value is used as, for error messages.
    ///
    /// # Errors
    /// - [`RuntimeError::EmptyValue`] if the expression has no value.
    /// - [`RuntimeError::WordListValue`] if it is a word list.
    ///
    /// # Example
    /// ```
    /// use combicalc::{
    ///     ast::Expr,
    ///     error::RuntimeError,
    ///     interpreter::{evaluator::core::Context, scope::Scope, value::core::Value},
    /// };
    ///
    /// let mut context = Context::default();
    /// let scope = Scope::global();
    ///
    /// let v = context.eval_value(&Expr::Number(10.0), &scope, "an operand").unwrap();
    /// assert_eq!(v, Value::Number(10.0));
    ///
    /// let empty = context.eval_value(&Expr::Empty, &scope, "an operand");
    /// assert_eq!(empty, Err(RuntimeError::EmptyValue { context: "an operand" }));
    /// ```
    pub fn eval_value(&mut self,
                      expr: &Expr,
                      scope: &Rc<Scope>,
                      context: &'static str)
                      -> EvalResult<Value> {
        require_value(self.eval(expr, scope)?, context)
    }
}

/// Rejects the empty result and word lists.
///
/// # Errors
/// See [`Context::eval_value`].
pub fn require_value(value: Option<Value>, context: &'static str) -> EvalResult<Value> {
    match value {
        None => Err(RuntimeError::EmptyValue { context }),
        Some(Value::WordList(_)) => Err(RuntimeError::WordListValue { context }),
        Some(value) => Ok(value),
    }
}

/// Describes an optional value for error messages.
#[must_use]
pub fn describe(value: Option<&Value>) -> String {
    value.map_or_else(|| "an empty expression".to_string(), |value| value.kind().to_string())
}

/// Converts a number to an integer, failing on fractions and non-finite
/// values.
///
/// # Errors
/// Returns `error` if `value` is not integer-valued.
pub fn integer_value(value: f64, error: RuntimeError) -> EvalResult<i64> {
    f64_to_i64_checked(value, error)
}

/// Ensures that a function received as many arguments as it declares.
///
/// # Errors
/// Returns [`RuntimeError::ArityMismatch`] if the counts differ.
pub fn check_arity(name: &str, expected: usize, found: usize) -> EvalResult<()> {
    if expected != found {
        return Err(RuntimeError::ArityMismatch { name: name.to_string(),
                                                 expected,
                                                 found });
    }
    Ok(())
}
