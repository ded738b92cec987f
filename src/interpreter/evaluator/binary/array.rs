use crate::interpreter::{
    evaluator::{
        binary::core::Kernel,
        core::{Context, EvalResult},
    },
    value::core::Value,
};

impl Context {
    /// Applies an elementwise operation to two values with broadcasting.
    ///
    /// Numbers act as 0-dimensional arrays, so number with array, array with
    /// number and array with array all take the same path. A 0-dimensional
    /// result collapses back to a number.
    ///
    /// # Parameters
    /// - `left`: Left-hand operand.
    /// - `right`: Right-hand operand.
    /// - `kernel`: The operation applied to each pair of elements.
    ///
    /// # Example
    /// ```
    /// use std::rc::Rc;
    ///
    /// use combicalc::interpreter::{
    ///     evaluator::{binary::scalar, core::Context},
    ///     value::{array::NdArray, core::Value},
    /// };
    ///
    /// let left = Value::Array(Rc::new(NdArray::from_vec(vec![1.0, 2.0])));
    /// let right = Value::Array(Rc::new(NdArray::from_vec(vec![10.0, 20.0])));
    ///
    /// let r = Context::elementwise(&left, &right, scalar::add).unwrap();
    ///
    /// assert_eq!(r, Value::Array(Rc::new(NdArray::from_vec(vec![11.0, 22.0]))));
    /// ```
    pub fn elementwise(left: &Value, right: &Value, kernel: Kernel) -> EvalResult<Value> {
        let left = left.to_array("an operand")?;
        let right = right.to_array("an operand")?;

        Ok(left.broadcast_with(&right, kernel)?.into())
    }
}
