use crate::interpreter::{
    evaluator::{
        core::{Context, EvalResult},
        function::{
            argument::{Argument, unpack},
            builtin::map_argument,
        },
    },
    value::core::Value,
};

/// Natural logarithm, elementwise.
pub fn ln(context: &mut Context, args: &[Argument<'_>]) -> EvalResult<Option<Value>> {
    map_argument(context, "ln", args, f64::ln)
}

/// Base 10 logarithm, elementwise.
pub fn log(context: &mut Context, args: &[Argument<'_>]) -> EvalResult<Option<Value>> {
    map_argument(context, "log", args, f64::log10)
}

/// Base 2 logarithm, elementwise.
pub fn log2(context: &mut Context, args: &[Argument<'_>]) -> EvalResult<Option<Value>> {
    map_argument(context, "log2", args, f64::log2)
}

/// Computes the logarithm of a value with respect to a given base.
///
/// `logb(x, base) = ln(x) / ln(base)`, with `x` and `base` broadcast against
/// each other. Non-positive inputs and a base of one give IEEE results (NaN
/// or infinities) rather than errors.
///
/// # Example
/// ```
/// use combicalc::interpreter::parser::parse;
/// use combicalc::interpreter::{evaluator::core::Context, scope::Scope, value::core::Value};
///
/// let program = parse("logb(8, 2)").unwrap();
/// let r = Context::default().eval_program(&program, &Scope::global()).unwrap();
///
/// assert_eq!(r, Some(Value::Number(3.0)));
/// ```
pub fn logb(context: &mut Context, args: &[Argument<'_>]) -> EvalResult<Option<Value>> {
    let [x, base] = unpack::<2>("logb", args)?;
    let x = x.eval(context, "an argument")?;
    let base = base.eval(context, "a base")?;

    Context::elementwise(&x, &base, |x, base| x.ln() / base.ln()).map(Some)
}

#[cfg(test)]
mod tests {
    use crate::interpreter::{
        evaluator::core::Context, parser::parse, scope::Scope, value::core::Value,
    };

    fn number(source: &str) -> f64 {
        let program = parse(source).unwrap();
        match Context::default().eval_program(&program, &Scope::global()) {
            Ok(Some(Value::Number(n))) => n,
            other => panic!("expected a number from {source}, found {other:?}"),
        }
    }

    #[test]
    fn fixed_bases() {
        assert_eq!(number("ln(1)"), 0.0);
        assert_eq!(number("log(1000)"), 3.0);
        assert_eq!(number("log2(1024)"), 10.0);
        assert!((number("ln(e)") - 1.0).abs() < 1e-12);
    }

    #[test]
    fn non_positive_inputs_follow_ieee() {
        assert_eq!(number("ln(0)"), f64::NEG_INFINITY);
        assert!(number("log(-1)").is_nan());
        assert_eq!(number("logb(2, 1)"), f64::INFINITY);
    }
}
