use std::rc::Rc;

use crate::{
    ast::{Expr, UnaryOperator},
    interpreter::{
        evaluator::core::{Context, EvalResult},
        scope::Scope,
        value::core::Value,
    },
};

impl Context {
    /// Evaluates an operand with its prefix operators.
    ///
    /// Operators are applied right to left, so `-not x` negates `not x`.
    pub(crate) fn eval_unary(&mut self,
                             operators: &[UnaryOperator],
                             operand: &Expr,
                             scope: &Rc<Scope>)
                             -> EvalResult<Value> {
        let mut value = self.eval_value(operand, scope, "an operand")?;
        for operator in operators.iter().rev() {
            value = Self::apply_unary(*operator, &value)?;
        }
        Ok(value)
    }

    /// Applies a unary operator elementwise.
    ///
    /// Supported operators:
    /// - `Plus`: identity, numeric values only.
    /// - `Negate`: arithmetic negation.
    /// - `Not`: logical negation, `1` for zero and `0` otherwise.
    ///
    /// # Example
    /// ```
    /// use combicalc::{
    ///     ast::UnaryOperator,
    ///     interpreter::{evaluator::core::Context, value::core::Value},
    /// };
    ///
    /// let v = Context::apply_unary(UnaryOperator::Negate, &Value::Number(5.0)).unwrap();
    /// assert_eq!(v, Value::Number(-5.0));
    ///
    /// let v = Context::apply_unary(UnaryOperator::Not, &Value::Number(0.0)).unwrap();
    /// assert_eq!(v, Value::Number(1.0));
    /// ```
    pub fn apply_unary(operator: UnaryOperator, value: &Value) -> EvalResult<Value> {
        let array = value.to_array("an operand")?;

        let result = match operator {
            UnaryOperator::Plus => array,
            UnaryOperator::Negate => array.map(|x| -x),
            UnaryOperator::Not => array.map(|x| if x == 0.0 { 1.0 } else { 0.0 }),
        };

        Ok(result.into())
    }
}
