use crate::{
    error::RuntimeError,
    interpreter::{
        evaluator::{
            core::{Context, EvalResult},
            function::argument::{Argument, unpack},
        },
        value::{array::NdArray, core::Value},
    },
    util::num::{f64_to_usize_checked, usize_to_f64},
};

/// Evaluates the single argument of a built-in and applies `f` to every
/// element.
///
/// # Errors
/// Fails if there is not exactly one argument or it is not numeric.
pub fn map_argument(context: &mut Context,
                    name: &str,
                    args: &[Argument<'_>],
                    f: fn(f64) -> f64)
                    -> EvalResult<Option<Value>> {
    let [x] = unpack::<1>(name, args)?;
    let array = x.eval(context, "an argument")?.to_array("an argument")?;
    Ok(Some(array.map(f).into()))
}

/// Generates one-argument built-ins that apply an `f64` method elementwise.
///
/// # Example
/// ```
/// use combicalc::interpreter::parser::parse;
/// use combicalc::interpreter::{evaluator::core::Context, scope::Scope, value::core::Value};
///
/// let scope = Scope::global();
/// let program = parse("sin(pi / 2)").unwrap();
/// let r = Context::default().eval_program(&program, &scope).unwrap();
///
/// assert_eq!(r, Some(Value::Number(1.0)));
/// ```
macro_rules! elementwise_builtin {
    ($($fname:ident => $method:ident),* $(,)?) => {
        $(
            #[doc = concat!("`", stringify!($fname), "`, applied elementwise.")]
            pub fn $fname(context: &mut Context, args: &[Argument<'_>]) -> EvalResult<Option<Value>> {
                map_argument(context, stringify!($fname), args, f64::$method)
            }
        )*
    };
}

elementwise_builtin! {
    sin => sin,
    cos => cos,
    tan => tan,
    arcsin => asin,
    arccos => acos,
    arctan => atan,
    sqrt => sqrt,
    exp => exp,
}

/// The angle of the point `(x, y)`, broadcasting `y` against `x`.
pub fn arctan2(context: &mut Context, args: &[Argument<'_>]) -> EvalResult<Option<Value>> {
    let [y, x] = unpack::<2>("arctan2", args)?;
    let y = y.eval(context, "an argument")?;
    let x = x.eval(context, "an argument")?;

    Context::elementwise(&y, &x, f64::atan2).map(Some)
}

/// The length of the leading axis of an array.
///
/// # Errors
/// Returns [`RuntimeError::TypeError`] for anything but an array.
pub fn len(context: &mut Context, args: &[Argument<'_>]) -> EvalResult<Option<Value>> {
    let [array] = unpack::<1>("len", args)?;

    let value = array.eval(context, "an argument")?;
    if let Value::Array(array) = &value
       && let Some(&length) = array.shape().first()
    {
        return Ok(Some(Value::Number(usize_to_f64(length))));
    }

    Err(RuntimeError::TypeError { details: format!("len() of {}", value.kind()) })
}

/// An array of zeros.
///
/// `dims` is a number, for a vector of that length, or a flat list of axis
/// lengths.
///
/// # Errors
/// Returns [`RuntimeError::InvalidArgument`] if `dims` is nested, holds
/// anything but non-negative integers, or describes more than
/// [`MAX_ELEMENTS`](crate::interpreter::value::array::MAX_ELEMENTS) elements.
pub fn zeros(context: &mut Context, args: &[Argument<'_>]) -> EvalResult<Option<Value>> {
    let [dims] = unpack::<1>("zeros", args)?;
    let dims = dims.eval(context, "an argument")?.to_array("an argument")?;

    if dims.ndim() > 1 {
        return Err(RuntimeError::InvalidArgument { details: format!("zeros expects a flat list of dimensions, found shape {:?}",
                                                                    dims.shape()) });
    }

    let shape = dims.data()
                    .iter()
                    .map(|&n| {
                        f64_to_usize_checked(n, RuntimeError::InvalidArgument { details: format!("{n} is not a valid dimension") })
                    })
                    .collect::<EvalResult<Vec<_>>>()?;

    Ok(Some(NdArray::zeros(shape)?.into()))
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::interpreter::{parser::parse, scope::Scope};

    fn run(source: &str) -> EvalResult<Option<Value>> {
        let program = parse(source).unwrap();
        Context::default().eval_program(&program, &Scope::global())
    }

    fn number(source: &str) -> f64 {
        match run(source) {
            Ok(Some(Value::Number(n))) => n,
            other => panic!("expected a number from {source}, found {other:?}"),
        }
    }

    #[test]
    fn math_functions_act_elementwise() {
        assert_eq!(run("sqrt([4, 9])").unwrap(),
                   Some(Value::Array(Rc::new(NdArray::from_vec(vec![2.0, 3.0])))));
        assert!((number("cos(pi)") + 1.0).abs() < 1e-12);
        assert!((number("arcsin(1)") - std::f64::consts::FRAC_PI_2).abs() < 1e-12);
    }

    #[test]
    fn arctan2_takes_y_first() {
        assert!((number("arctan2(1, 0)") - std::f64::consts::FRAC_PI_2).abs() < 1e-12);
        assert!((number("arctan2(0, -1)") - std::f64::consts::PI).abs() < 1e-12);
    }

    #[test]
    fn len_counts_the_leading_axis() {
        assert_eq!(number("len([[1, 2], [3, 4], [5, 6]])"), 3.0);
        assert_eq!(number("len([])"), 0.0);
        assert!(matches!(run("len(5)"), Err(RuntimeError::TypeError { .. })));
    }

    #[test]
    fn zeros_builds_arrays_of_any_shape() {
        assert_eq!(run("zeros([2, 3])").unwrap(),
                   Some(Value::from(NdArray::zeros(vec![2, 3]).unwrap())));
        assert_eq!(run("zeros(2)").unwrap(),
                   Some(Value::from(NdArray::from_vec(vec![0.0, 0.0]))));
        assert!(matches!(run("zeros(-1)"), Err(RuntimeError::InvalidArgument { .. })));
        assert!(matches!(run("zeros([100000, 100000, 100000, 100000, 100000])"),
                         Err(RuntimeError::InvalidArgument { .. })));
    }
}
