use crate::{
    ast::BinaryOperator,
    interpreter::{
        evaluator::{
            binary::{comparison, logic, scalar},
            core::{Context, EvalResult},
        },
        value::core::Value,
    },
};

/// An elementwise binary operation on numbers.
pub type Kernel = fn(f64, f64) -> f64;

impl Context {
    /// Evaluates a binary operation between two values.
    ///
    /// Every operator acts elementwise. Two numbers are combined directly;
    /// otherwise both operands are viewed as arrays and broadcast against
    /// each other.
    ///
    /// # Parameters
    /// - `op`: The operator.
    /// - `left`: Left operand.
    /// - `right`: Right operand.
    ///
    /// # Returns
    /// A number if both operands are numbers, otherwise an array of the
    /// broadcast shape.
    ///
    /// # Errors
    /// - [`RuntimeError::TypeError`](crate::error::RuntimeError::TypeError) if
    ///   an operand is a function.
    /// - [`RuntimeError::ShapeMismatch`](crate::error::RuntimeError::ShapeMismatch)
    ///   if the shapes do not broadcast.
    ///
    /// # Example
    /// ```
    /// use combicalc::{
    ///     ast::BinaryOperator,
    ///     interpreter::{evaluator::core::Context, value::core::Value},
    /// };
    ///
    /// let left = Value::Number(3.0);
    /// let right = Value::Number(4.0);
    ///
    /// let result = Context::eval_binary(BinaryOperator::Add, &left, &right);
    /// assert_eq!(result.unwrap(), Value::Number(7.0));
    /// ```
    pub fn eval_binary(op: BinaryOperator, left: &Value, right: &Value) -> EvalResult<Value> {
        let kernel = kernel(op);

        match (left, right) {
            (Value::Number(a), Value::Number(b)) => Ok(Value::Number(kernel(*a, *b))),
            _ => Self::elementwise(left, right, kernel),
        }
    }
}

/// The elementwise operation behind an operator.
#[must_use]
pub fn kernel(op: BinaryOperator) -> Kernel {
    use BinaryOperator::{
        Add, And, Div, Equal, Greater, GreaterEqual, Less, LessEqual, Mod, Mul, NotEqual, Or, Pow,
        Sub,
    };

    match op {
        Pow => scalar::pow,
        Mul => scalar::mul,
        Div => scalar::div,
        Mod => scalar::rem,
        Add => scalar::add,
        Sub => scalar::sub,
        Greater => comparison::greater,
        Less => comparison::less,
        GreaterEqual => comparison::greater_equal,
        LessEqual => comparison::less_equal,
        Equal => comparison::equal,
        NotEqual => comparison::not_equal,
        And => logic::and,
        Or => logic::or,
    }
}
