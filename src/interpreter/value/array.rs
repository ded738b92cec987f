use std::fmt;

use crate::{error::RuntimeError, interpreter::evaluator::core::EvalResult, util::num::format_number};

/// Largest number of elements one array may hold.
pub const MAX_ELEMENTS: usize = 1 << 28;

/// A dense n-dimensional array of `f64` in row-major order.
///
/// A zero-dimensional array (empty shape) holds exactly one element and
/// stands in for a scalar during broadcasting.
#[derive(Debug, Clone, PartialEq)]
pub struct NdArray {
    shape: Vec<usize>,
    data:  Vec<f64>,
}

impl NdArray {
    /// Creates an array from a shape and its row-major data.
    ///
    /// # Errors
    /// Returns [`RuntimeError::InvalidArgument`] if the data length does not
    /// match the shape, or the shape is too large (see [`element_count`]).
    pub fn new(shape: Vec<usize>, data: Vec<f64>) -> EvalResult<Self> {
        let size = element_count(&shape)?;
        if size != data.len() {
            return Err(RuntimeError::InvalidArgument { details: format!("shape {shape:?} needs {size} elements but {} were given",
                                                                        data.len()) });
        }
        Ok(Self { shape, data })
    }

    /// A zero-dimensional array holding `value`.
    #[must_use]
    pub fn scalar(value: f64) -> Self {
        Self { shape: Vec::new(),
               data:  vec![value], }
    }

    /// A one-dimensional array holding `data`.
    #[must_use]
    pub fn from_vec(data: Vec<f64>) -> Self {
        Self { shape: vec![data.len()],
               data }
    }

    /// An array of the given shape filled with zeros.
    ///
    /// # Errors
    /// Returns [`RuntimeError::InvalidArgument`] if the shape is too large.
    pub fn zeros(shape: Vec<usize>) -> EvalResult<Self> {
        let size = element_count(&shape)?;
        Ok(Self { shape,
                  data: vec![0.0; size] })
    }

    /// The length of every axis.
    #[must_use]
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// The elements in row-major order.
    #[must_use]
    pub fn data(&self) -> &[f64] {
        &self.data
    }

    /// Number of axes.
    #[must_use]
    pub const fn ndim(&self) -> usize {
        self.shape.len()
    }

    /// Total number of elements.
    #[must_use]
    pub const fn size(&self) -> usize {
        self.data.len()
    }

    /// Applies `f` to every element.
    #[must_use]
    pub fn map(&self, f: impl Fn(f64) -> f64) -> Self {
        Self { shape: self.shape.clone(),
               data:  self.data.iter().map(|&x| f(x)).collect(), }
    }

    /// Stacks equally shaped arrays along a new leading axis.
    ///
    /// No items give the empty array of shape `[0]`.
    ///
    /// # Errors
    /// Returns [`RuntimeError::ShapeMismatch`] if the items differ in shape.
    ///
    /// # Example
    /// ```
    /// use combicalc::interpreter::value::array::NdArray;
    ///
    /// let rows = [NdArray::from_vec(vec![1.0, 2.0]), NdArray::from_vec(vec![3.0, 4.0])];
    /// let matrix = NdArray::stack(&rows).unwrap();
    ///
    /// assert_eq!(matrix.shape(), &[2, 2]);
    /// assert_eq!(matrix.data(), &[1.0, 2.0, 3.0, 4.0]);
    /// ```
    pub fn stack(items: &[Self]) -> EvalResult<Self> {
        let Some(first) = items.first() else {
            return Ok(Self::from_vec(Vec::new()));
        };

        let mut data = Vec::with_capacity(first.size() * items.len());
        for item in items {
            if item.shape != first.shape {
                return Err(RuntimeError::ShapeMismatch { left:  first.shape.clone(),
                                                         right: item.shape.clone(), });
            }
            data.extend_from_slice(&item.data);
        }

        let mut shape = Vec::with_capacity(first.ndim() + 1);
        shape.push(items.len());
        shape.extend_from_slice(&first.shape);

        Ok(Self { shape, data })
    }

    /// Combines two arrays elementwise under broadcasting.
    ///
    /// Shapes are aligned from the last axis; two axes are compatible when
    /// they are equal or one of them is `1`, and missing leading axes count
    /// as `1`.
    ///
    /// # Errors
    /// - [`RuntimeError::ShapeMismatch`] if the shapes are incompatible.
    /// - [`RuntimeError::InvalidArgument`] if the result would be too large.
    ///
    /// # Example
    /// ```
    /// use combicalc::interpreter::value::array::NdArray;
    ///
    /// let column = NdArray::new(vec![2, 1], vec![1.0, 2.0]).unwrap();
    /// let row = NdArray::from_vec(vec![10.0, 20.0, 30.0]);
    ///
    /// let sum = column.broadcast_with(&row, |a, b| a + b).unwrap();
    /// assert_eq!(sum.shape(), &[2, 3]);
    /// assert_eq!(sum.data(), &[11.0, 21.0, 31.0, 12.0, 22.0, 32.0]);
    /// ```
    pub fn broadcast_with(&self, other: &Self, f: impl Fn(f64, f64) -> f64) -> EvalResult<Self> {
        if self.shape == other.shape {
            let data = self.data.iter().zip(&other.data).map(|(&a, &b)| f(a, b)).collect();
            return Ok(Self { shape: self.shape.clone(),
                             data });
        }

        let shape = broadcast_shape(&self.shape, &other.shape).ok_or_else(|| {
                                                                   RuntimeError::ShapeMismatch { left:  self.shape.clone(),
                                                                                                 right: other.shape.clone(), }
                                                               })?;

        let ndim = shape.len();
        let left_strides = broadcast_strides(&self.shape, ndim);
        let right_strides = broadcast_strides(&other.shape, ndim);
        let size = element_count(&shape)?;

        let mut data = Vec::with_capacity(size);
        let mut index = vec![0; ndim];
        let (mut left, mut right) = (0, 0);

        for _ in 0..size {
            data.push(f(self.data[left], other.data[right]));

            for axis in (0..ndim).rev() {
                index[axis] += 1;
                left += left_strides[axis];
                right += right_strides[axis];
                if index[axis] < shape[axis] {
                    break;
                }
                left -= left_strides[axis] * shape[axis];
                right -= right_strides[axis] * shape[axis];
                index[axis] = 0;
            }
        }

        Ok(Self { shape, data })
    }

    /// Selects along the leading axes with already validated indices.
    ///
    /// Negative indices count from the end of their axis. Fewer indices than
    /// axes select a sub-array; as many select a single element, returned as a
    /// zero-dimensional array.
    ///
    /// # Errors
    /// - [`RuntimeError::IndexOutOfBounds`] if an index falls outside its
    ///   axis.
    /// - [`RuntimeError::TypeError`] if there are more indices than axes.
    pub fn select(&self, indices: &[i64]) -> EvalResult<Self> {
        if indices.len() > self.ndim() {
            return Err(RuntimeError::TypeError { details: format!("too many indices: {} given for an array with {} dimensions",
                                                                  indices.len(),
                                                                  self.ndim()) });
        }

        let rest = &self.shape[indices.len()..];
        let block: usize = rest.iter().product();

        let mut offset = 0;
        let mut stride = self.size();
        for (axis, &index) in indices.iter().enumerate() {
            let size = self.shape[axis];
            stride /= size.max(1);

            let resolved = if index < 0 { i64::try_from(size).ok().map(|n| n + index) } else { Some(index) };
            let position = resolved.and_then(|i| usize::try_from(i).ok())
                                   .filter(|&i| i < size)
                                   .ok_or(RuntimeError::IndexOutOfBounds { index, axis, size })?;
            offset += position * stride;
        }

        Ok(Self { shape: rest.to_vec(),
                  data:  self.data[offset..offset + block].to_vec(), })
    }

    fn fmt_axis(&self, f: &mut fmt::Formatter<'_>, axis: usize, offset: usize) -> fmt::Result {
        if axis == self.ndim() {
            return write!(f, "{}", format_number(self.data[offset]));
        }

        let block: usize = self.shape[axis + 1..].iter().product();
        write!(f, "[")?;
        for i in 0..self.shape[axis] {
            if i > 0 {
                write!(f, ", ")?;
            }
            self.fmt_axis(f, axis + 1, offset + i * block)?;
        }
        write!(f, "]")
    }
}

impl fmt::Display for NdArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_axis(f, 0, 0)
    }
}

/// Number of elements an array of `shape` holds.
///
/// # Errors
/// Returns [`RuntimeError::InvalidArgument`] if the count overflows `usize`
/// or exceeds [`MAX_ELEMENTS`].
///
/// # Example
/// ```
/// use combicalc::interpreter::value::array::element_count;
///
/// assert_eq!(element_count(&[2, 3]).unwrap(), 6);
/// assert_eq!(element_count(&[]).unwrap(), 1);
/// assert!(element_count(&[100_000; 5]).is_err());
/// ```
pub fn element_count(shape: &[usize]) -> EvalResult<usize> {
    if shape.contains(&0) {
        return Ok(0);
    }

    shape.iter()
         .try_fold(1_usize, |size, &dim| size.checked_mul(dim))
         .filter(|&size| size <= MAX_ELEMENTS)
         .ok_or_else(|| RuntimeError::InvalidArgument { details: format!("shape {shape:?} holds more than {MAX_ELEMENTS} elements") })
}

/// The shape two shapes broadcast to, if they are compatible.
fn broadcast_shape(left: &[usize], right: &[usize]) -> Option<Vec<usize>> {
    let ndim = left.len().max(right.len());
    let mut shape = Vec::with_capacity(ndim);

    for k in 1..=ndim {
        let l = left.len().checked_sub(k).map_or(1, |i| left[i]);
        let r = right.len().checked_sub(k).map_or(1, |i| right[i]);
        let dim = if l == r || r == 1 {
            l
        } else if l == 1 {
            r
        } else {
            return None;
        };
        shape.push(dim);
    }

    shape.reverse();
    Some(shape)
}

/// Row-major strides of `shape` padded to `ndim` axes, with `0` on every
/// axis that is broadcast.
fn broadcast_strides(shape: &[usize], ndim: usize) -> Vec<usize> {
    let mut strides = vec![0; ndim];
    let padding = ndim - shape.len();
    let mut step = 1;

    for (i, &dim) in shape.iter().enumerate().rev() {
        strides[padding + i] = if dim == 1 { 0 } else { step };
        step *= dim;
    }

    strides
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matrix() -> NdArray {
        NdArray::new(vec![2, 3], vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap()
    }

    #[test]
    fn incompatible_shapes_do_not_broadcast() {
        let error = matrix().broadcast_with(&NdArray::from_vec(vec![1.0, 2.0]), |a, b| a + b)
                            .unwrap_err();
        assert_eq!(error,
                   RuntimeError::ShapeMismatch { left:  vec![2, 3],
                                                 right: vec![2], });
    }

    #[test]
    fn scalars_broadcast_over_everything() {
        let doubled = matrix().broadcast_with(&NdArray::scalar(2.0), |a, b| a * b).unwrap();
        assert_eq!(doubled.data(), &[2.0, 4.0, 6.0, 8.0, 10.0, 12.0]);

        let empty = NdArray::from_vec(Vec::new()).broadcast_with(&NdArray::scalar(1.0), |a, b| a + b)
                                                 .unwrap();
        assert_eq!(empty.shape(), &[0]);
    }

    #[test]
    fn select_rows_elements_and_negative_indices() {
        let row = matrix().select(&[1]).unwrap();
        assert_eq!(row.shape(), &[3]);
        assert_eq!(row.data(), &[4.0, 5.0, 6.0]);

        let element = matrix().select(&[-1, -3]).unwrap();
        assert_eq!(element.ndim(), 0);
        assert_eq!(element.data(), &[4.0]);
    }

    #[test]
    fn select_reports_the_offending_axis() {
        assert_eq!(matrix().select(&[0, 3]).unwrap_err(),
                   RuntimeError::IndexOutOfBounds { index: 3,
                                                    axis:  1,
                                                    size:  3, });
        assert_eq!(matrix().select(&[-3]).unwrap_err(),
                   RuntimeError::IndexOutOfBounds { index: -3,
                                                    axis:  0,
                                                    size:  2, });
        assert!(matrix().select(&[0, 0, 0]).is_err());
    }

    #[test]
    fn stacking_requires_equal_shapes() {
        let items = [NdArray::from_vec(vec![1.0]), NdArray::from_vec(vec![1.0, 2.0])];
        assert!(NdArray::stack(&items).is_err());

        let empty = NdArray::stack(&[]).unwrap();
        assert_eq!(empty.shape(), &[0]);
    }

    #[test]
    fn oversized_shapes_are_rejected() {
        let huge = vec![100_000; 5];

        assert!(matches!(NdArray::zeros(huge.clone()), Err(RuntimeError::InvalidArgument { .. })));
        assert!(matches!(NdArray::new(huge, vec![0.0]), Err(RuntimeError::InvalidArgument { .. })));
        assert!(matches!(NdArray::new(vec![usize::MAX, 2], Vec::new()),
                         Err(RuntimeError::InvalidArgument { .. })));
        assert_eq!(NdArray::zeros(vec![usize::MAX, 0]).unwrap().size(), 0);
    }

    #[test]
    fn broadcasting_into_an_oversized_shape_fails() {
        let column = NdArray::new(vec![100_000, 1], vec![0.0; 100_000]).unwrap();
        let row = NdArray::from_vec(vec![0.0; 100_000]);

        assert!(matches!(column.broadcast_with(&row, |a, b| a + b),
                         Err(RuntimeError::InvalidArgument { .. })));
    }

    #[test]
    fn display_nests_brackets() {
        assert_eq!(matrix().to_string(), "[[1, 2, 3], [4, 5, 6]]");
        assert_eq!(NdArray::from_vec(Vec::new()).to_string(), "[]");
        assert_eq!(NdArray::from_vec(vec![0.5, f64::INFINITY]).to_string(), "[0.5, Inf]");
    }
}
