use std::rc::Rc;

use crate::{
    ast::{BinaryOperator, Expr},
    error::RuntimeError,
    interpreter::{
        evaluator::{
            core::{Context, EvalResult},
            utils::{integer_value, require_value},
        },
        scope::Scope,
        value::core::Value,
    },
};

impl Context {
    /// Evaluates a chain of subscripts, left to right.
    ///
    /// Each pair of brackets holds a flat list of integers that selects along
    /// the leading axes of an array: `m[1, 0]` is an element of a matrix and
    /// `m[1]` a row. Indices start at zero and negative indices count from the
    /// end.
    ///
    /// A number in front of brackets is not indexed but multiplied, so
    /// `2[3]` is `6`.
    pub(crate) fn eval_index(&mut self,
                             base: &Expr,
                             subscripts: &[Expr],
                             scope: &Rc<Scope>)
                             -> EvalResult<Value> {
        let mut value = require_value(self.eval(base, scope)?, "an indexed value")?;

        for subscript in subscripts {
            let indices = self.eval_value(subscript, scope, "an index")?;
            value = Self::apply_index(&value, &indices)?;
        }

        Ok(value)
    }

    /// Applies one pair of brackets to `value`.
    ///
    /// Each bracket pair picks one position per axis. There is no gathering:
    /// a nested subscript such as `v[[0, 1]]` is a type error rather than the
    /// elements at positions 0 and 1.
    ///
    /// # Errors
    /// - [`RuntimeError::NotIndexable`] if `value` is a function.
    /// - [`RuntimeError::TypeError`] if the indices are nested or too many.
    /// - [`RuntimeError::NonIntegerIndex`] if an index has a fraction.
    /// - [`RuntimeError::IndexOutOfBounds`] if an index falls outside its
    ///   axis.
    ///
    /// # Example
    /// ```
    /// use combicalc::interpreter::{
    ///     evaluator::core::Context,
    ///     value::{array::NdArray, core::Value},
    /// };
    ///
    /// let v = Value::from(NdArray::from_vec(vec![10.0, 20.0, 30.0]));
    /// let last = Value::from(NdArray::from_vec(vec![-1.0]));
    ///
    /// assert_eq!(Context::apply_index(&v, &last).unwrap(), Value::Number(30.0));
    /// ```
    pub fn apply_index(value: &Value, indices: &Value) -> EvalResult<Value> {
        match value {
            Value::Number(_) => Self::eval_binary(BinaryOperator::Mul, value, indices),
            Value::Array(array) => {
                let indices = indices.to_array("an index")?;
                if indices.ndim() > 1 {
                    return Err(RuntimeError::TypeError { details: format!("indices must be a flat list, found shape {:?}",
                                                                          indices.shape()) });
                }

                let indices = indices.data()
                                     .iter()
                                     .map(|&i| integer_value(i, RuntimeError::NonIntegerIndex))
                                     .collect::<EvalResult<Vec<_>>>()?;

                Ok(array.select(&indices)?.into())
            },
            Value::Function(function) => {
                Err(RuntimeError::NotIndexable { kind: function.kind().to_string() })
            },
            Value::WordList(_) => Err(RuntimeError::WordListValue { context: "an indexed value" }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::value::array::NdArray;

    fn matrix() -> Value {
        Value::from(NdArray::new(vec![2, 3], vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap())
    }

    fn indices(data: &[f64]) -> Value {
        Value::from(NdArray::from_vec(data.to_vec()))
    }

    #[test]
    fn rows_and_elements() {
        assert_eq!(Context::apply_index(&matrix(), &indices(&[1.0])).unwrap(),
                   indices(&[4.0, 5.0, 6.0]));
        assert_eq!(Context::apply_index(&matrix(), &indices(&[0.0, -1.0])).unwrap(),
                   Value::Number(3.0));
    }

    #[test]
    fn numbers_multiply_instead() {
        assert_eq!(Context::apply_index(&Value::Number(2.0), &indices(&[3.0])).unwrap(),
                   indices(&[6.0]));
    }

    #[test]
    fn fractional_and_nested_indices_fail() {
        assert_eq!(Context::apply_index(&matrix(), &indices(&[0.5])),
                   Err(RuntimeError::NonIntegerIndex));

        let nested = Value::from(NdArray::new(vec![1, 1], vec![0.0]).unwrap());
        assert!(matches!(Context::apply_index(&matrix(), &nested),
                         Err(RuntimeError::TypeError { .. })));
    }

    #[test]
    fn out_of_range_indices_name_their_axis() {
        assert_eq!(Context::apply_index(&matrix(), &indices(&[0.0, 3.0])),
                   Err(RuntimeError::IndexOutOfBounds { index: 3,
                                                        axis:  1,
                                                        size:  3, }));
    }
}
