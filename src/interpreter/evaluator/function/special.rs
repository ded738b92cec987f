use std::rc::Rc;

use crate::{
    ast::BinaryOperator,
    error::RuntimeError,
    interpreter::{
        evaluator::{
            core::{Context, EvalResult},
            function::argument::{Argument, single_name, unpack},
            utils::integer_value,
        },
        scope::Scope,
        value::{
            core::Value,
            function::{Function, UserFunction},
        },
    },
    util::num::i64_to_f64_checked,
};

/// Name given to functions created by `lambda`.
pub const ANONYMOUS: &str = "<anonymous>";

/// `lambda(param_names, expression)`: creates an anonymous function.
///
/// The parameters are a single name, a parenthesized list of names or `()`.
/// The function closes over a fresh child of the calling scope in which it is
/// also bound as `self`, so it can recurse without a name.
///
/// # Errors
/// Returns [`RuntimeError::InvalidArgument`] if the parameters are not bare
/// names.
pub fn lambda(_context: &mut Context, args: &[Argument<'_>]) -> EvalResult<Option<Value>> {
    let [param_names, expression] = unpack::<2>("lambda", args)?;

    let params = param_names.to_word_list().ok_or_else(|| {
                                               RuntimeError::InvalidArgument { details: "lambda parameters must be names".to_string() }
                                           })?;

    let scope = Scope::child(param_names.scope());
    let function = Rc::new(Function::User(UserFunction { name: ANONYMOUS.to_string(),
                                                         params,
                                                         body: Rc::new(expression.expr().clone()),
                                                         scope: Rc::clone(&scope) }));
    scope.set_value("self", Value::Function(Rc::clone(&function)), false);

    Ok(Some(Value::Function(function)))
}

/// `sum(index, start, end, expression)`: adds up `expression` over an
/// inclusive integer range.
///
/// The range counts down when `start > end`. `index` is bound immutably in
/// one child scope and rebound on every step. Terms are added to `0` with
/// the `+` operator, so arrays broadcast.
///
/// # Errors
/// - [`RuntimeError::InvalidArgument`] if `index` is not a single name or a
///   bound is not an integer.
/// - Whatever evaluating `expression` raises.
pub fn sum(context: &mut Context, args: &[Argument<'_>]) -> EvalResult<Option<Value>> {
    let [index, start, end, expression] = unpack::<4>("sum", args)?;

    let name = single_name("sum", index)?;
    let start = bound(context, start)?;
    let end = bound(context, end)?;

    let local = Scope::child(expression.scope());
    let (low, high) = (start.min(end), start.max(end));
    let mut total = Value::Number(0.0);

    for offset in 0..=high - low {
        let i = if start <= end { low + offset } else { high - offset };
        let i = i64_to_f64_checked(i, ()).map_err(|()| non_integer_bound())?;

        local.force_value(&name, Value::Number(i), false);
        let term = context.eval_value(expression.expr(), &local, "a summand")?;
        total = Context::eval_binary(BinaryOperator::Add, &total, &term)?;
    }

    Ok(Some(total))
}

fn bound(context: &mut Context, argument: &Argument<'_>) -> EvalResult<i64> {
    let value = argument.eval(context, "a bound")?.as_number("a bound")?;
    integer_value(value, non_integer_bound())
}

fn non_integer_bound() -> RuntimeError {
    RuntimeError::InvalidArgument { details: "sum bounds must be integers".to_string() }
}

/// `ifelse(condition, expression_true, expression_false)`.
///
/// Only the selected branch is evaluated; its result, possibly empty, is the
/// result of the call.
///
/// # Errors
/// Fails if the condition has no truth value, see [`Value::is_truthy`].
pub fn ifelse(context: &mut Context, args: &[Argument<'_>]) -> EvalResult<Option<Value>> {
    let [condition, if_true, if_false] = unpack::<3>("ifelse", args)?;

    let branch = if condition.eval(context, "a condition")?.is_truthy()? { if_true } else { if_false };

    context.eval(branch.expr(), branch.scope())
}

/// `delete(name)`: removes the nearest binding of `name`.
///
/// The search starts in the scope of the call and walks outwards.
///
/// # Errors
/// - [`RuntimeError::InvalidArgument`] if the argument is not a single name.
/// - [`RuntimeError::ImmutableBinding`] if the binding is immutable.
/// - [`RuntimeError::UndefinedName`] if there is no binding.
pub fn delete(_context: &mut Context, args: &[Argument<'_>]) -> EvalResult<Option<Value>> {
    let [name] = unpack::<1>("delete", args)?;

    let key = single_name("delete", name)?;
    name.scope().delete(&key)?;

    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::parser::parse;

    fn run(scope: &Rc<Scope>, source: &str) -> EvalResult<Option<Value>> {
        let program = parse(source).unwrap();
        Context::default().eval_program(&program, scope)
    }

    fn number(source: &str) -> Option<Value> {
        run(&Scope::global(), source).unwrap()
    }

    #[test]
    fn sums_count_up_and_down() {
        assert_eq!(number("sum(i, 1, 5, i)"), Some(Value::Number(15.0)));
        assert_eq!(number("sum(i, 5, 1, i)"), Some(Value::Number(15.0)));
        assert_eq!(number("sum(i, 3, 3, i^2)"), Some(Value::Number(9.0)));
    }

    #[test]
    fn sum_bounds_must_be_integers() {
        let scope = Scope::global();

        assert!(matches!(run(&scope, "sum(i, 1, 2.5, i)"),
                         Err(RuntimeError::InvalidArgument { .. })));
        assert!(matches!(run(&scope, "sum(2, 1, 2, 1)"),
                         Err(RuntimeError::InvalidArgument { .. })));
    }

    #[test]
    fn sum_index_does_not_leak() {
        let scope = Scope::global();

        run(&scope, "sum(k, 1, 3, k)").unwrap();

        assert!(!scope.contains("k"));
    }

    #[test]
    fn ifelse_skips_the_other_branch() {
        assert_eq!(number("ifelse(1, 1, undefined_name)"), Some(Value::Number(1.0)));
        assert_eq!(number("ifelse(0, undefined_name, 2)"), Some(Value::Number(2.0)));
    }

    #[test]
    fn lambdas_recurse_through_self() {
        let source = "fact = lambda(n, ifelse(n <= 1, 1, n self(n - 1))); fact(5)";

        assert_eq!(number(source), Some(Value::Number(120.0)));
    }

    #[test]
    fn lambdas_accept_name_lists() {
        assert_eq!(number("lambda((a, b), a - b)(5, 3)"), Some(Value::Number(2.0)));
        assert_eq!(number("lambda(x, 2x)(4)"), Some(Value::Number(8.0)));
    }

    #[test]
    fn delete_removes_mutable_bindings_only() {
        let scope = Scope::global();

        run(&scope, "x = 1; delete(x)").unwrap();
        assert!(!scope.contains("x"));

        assert_eq!(run(&scope, "delete(pi)"),
                   Err(RuntimeError::ImmutableBinding { name: "pi".to_string() }));
        assert_eq!(run(&scope, "delete(x)"),
                   Err(RuntimeError::UndefinedName { name: "x".to_string() }));
    }
}
