use std::fs;

use combicalc::{
    error::{Error, ParseError, RuntimeError},
    evaluate,
    interpreter::{Config, DEFAULT_MAX_DEPTH, parser::MAX_NESTING, session::Session},
};
use walkdir::WalkDir;

/// Runs every `*.calc` script under `tests/scripts`.
///
/// Each non-blank line is evaluated in one session, in order. A line of the
/// form `input --> expected` must display as `expected`; any other line must
/// simply succeed. Lines starting with `#` are comments.
#[test]
fn script_examples_work() {
    let mut count = 0;

    for entry in
        WalkDir::new("tests/scripts").into_iter()
                                     .filter_map(Result::ok)
                                     .filter(|e| e.path().extension().is_some_and(|ext| ext == "calc"))
    {
        let path = entry.path();
        let content =
            fs::read_to_string(path).unwrap_or_else(|e| panic!("Failed to read {path:?}: {e}"));

        let mut session = Session::new();
        for (i, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            count += 1;

            let (input, expected) = match line.split_once("-->") {
                Some((input, expected)) => (input.trim(), Some(expected.trim())),
                None => (line, None),
            };

            let shown = match session.evaluate(input) {
                Ok(value) => value.map(|v| v.to_string()).unwrap_or_default(),
                Err(e) => panic!("{path:?} line {} failed:\n{input}\nError: {e}", i + 1),
            };

            if let Some(expected) = expected {
                assert_eq!(shown, expected, "{path:?} line {}: {input}", i + 1);
            }
        }
    }

    assert!(count > 0, "No script lines found in tests/scripts");
}

fn assert_success(src: &str) {
    if let Err(e) = evaluate(src) {
        panic!("Script failed: {e}");
    }
}

fn assert_failure(src: &str) {
    if evaluate(src).is_ok() {
        panic!("Script succeeded but was expected to fail")
    }
}

fn assert_value(src: &str, expected: &str) {
    match evaluate(src) {
        Ok(Some(value)) => assert_eq!(value.to_string(), expected, "{src}"),
        Ok(None) => panic!("Script produced no value: {src}"),
        Err(e) => panic!("Script failed: {e}"),
    }
}

fn runtime_error(src: &str) -> RuntimeError {
    match evaluate(src) {
        Err(Error::Runtime(e)) => e,
        other => panic!("expected a runtime error from {src}, found {other:?}"),
    }
}

#[test]
fn assignment_and_basic_arithmetic() {
    assert_value("x = 1 + 2; x", "3");
    assert_value("x = 7 * 9; x", "63");
    assert_value("x = 8 - 5; x", "3");
    assert_value("x = 10 / 4; x", "2.5");
    assert_value("10 % 3", "1");
    assert_value("a = b = 4; a + b", "8");
}

#[test]
fn precedence_and_grouping() {
    assert_value("2 + 3 * 4", "14");
    assert_value("(2 + 3) * 4", "20");
    assert_value("2 * 3 ^ 2", "18");
    assert_value("1 + 2 < 4 and 0 or 0", "0");
    assert_value("-2 ^ 2", "4");
}

#[test]
fn chains_associate_to_the_left() {
    assert_value("10 - 4 - 3", "3");
    assert_value("64 / 4 / 2", "8");
    assert_value("2 ^ 3 ^ 2", "64");
}

#[test]
fn implicit_multiplication() {
    assert_value("x = 3; 2x", "6");
    assert_value("x = 3; 2x(x + 1)", "24");
    assert_value("2pi / pi", "2");
}

#[test]
fn comparisons_and_logic_are_numbers() {
    assert_value("2 < 3", "1");
    assert_value("2 >= 3", "0");
    assert_value("2 == 2", "1");
    assert_value("2 neq 2", "0");
    assert_value("not 0", "1");
    assert_value("True and False", "0");
    assert_value("[1, 2, 3] > 1", "[0, 1, 1]");
}

#[test]
fn user_defined_function_and_calls() {
    assert_value("f(x) = x * x; f(5)", "25");
    assert_value("add(a, b) = a + b; add(2, 5)", "7");
    assert_value("f(x) = x * x; f(5); f(x) = x + 1; f(5)", "6");
    assert_value("f(x) = x; f", "UserFunction: f(x)");
    assert_value("sin", "BuiltinFunction: sin(theta)");
}

#[test]
fn function_definitions_have_no_value() {
    assert!(matches!(evaluate("f(x) = x"), Ok(None)));
    assert!(matches!(evaluate(""), Ok(None)));
}

#[test]
fn closures_and_currying() {
    assert_value("adder(n) = lambda(x, x + n); add2 = adder(2); add2(40)", "42");
    assert_value("adder(n) = lambda(x, x + n); adder(1)(2)", "3");
    assert_value("k = 1; f(x) = x + k; k = 10; f(0)", "10");
}

#[test]
fn mutable_and_immutable_rebinding() {
    assert_value("a = 1; a = 2; a", "2");
    assert_value("pi = 3; pi", &std::f64::consts::PI.to_string());
    assert_value("e = 1; e > 2", "1");
}

#[test]
fn sum_counts_in_both_directions() {
    assert_value("sum(i, 1, 5, i)", "15");
    assert_value("sum(i, 5, 1, i)", "15");
    assert_value("sum(i, 1, 3, [i, 1])", "[6, 3]");
    assert!(matches!(runtime_error("sum(i, 0.5, 3, i)"), RuntimeError::InvalidArgument { .. }));
}

#[test]
fn ifelse_is_lazy() {
    assert_value("ifelse(1, 1, undefined_name)", "1");
    assert_value("ifelse(0, undefined_name, 2)", "2");
    assert_eq!(runtime_error("ifelse(1, undefined_name, 2)"),
               RuntimeError::UndefinedName { name: "undefined_name".to_string() });
}

#[test]
fn arrays_broadcast() {
    assert_value("[1, 2, 3] + 1", "[2, 3, 4]");
    assert_value("[[1], [2]] * [10, 20]", "[[10, 20], [20, 40]]");
    assert_value("[]", "[]");
    assert_value("len([[1, 2], [3, 4], [5, 6]])", "3");
    assert!(matches!(runtime_error("[1, 2] + [1, 2, 3]"), RuntimeError::ShapeMismatch { .. }));
    assert!(matches!(runtime_error("[[1, 2], [3]]"), RuntimeError::ShapeMismatch { .. }));
}

#[test]
fn indexing_is_zero_based() {
    assert_value("[10, 20, 30][1]", "20");
    assert_value("[10, 20, 30][-1]", "30");
    assert_value("m = [[1, 2], [3, 4]]; m[1]", "[3, 4]");
    assert_value("m = [[1, 2], [3, 4]]; m[1, 0]", "3");
    assert_value("m = [[1, 2], [3, 4]]; m[1][0]", "3");
    assert_eq!(runtime_error("[10, 20, 30][3]"),
               RuntimeError::IndexOutOfBounds { index: 3,
                                                axis:  0,
                                                size:  3, });
    assert_eq!(runtime_error("[10, 20, 30][0.5]"), RuntimeError::NonIntegerIndex);
}

#[test]
fn non_callables_multiply() {
    assert_value("x = 4; x(2)", "8");
    assert_value("x = 4; x[2]", "[8]");
    assert_eq!(runtime_error("x = 4; x(1, 2)"),
               RuntimeError::NotCallable { kind: "a number".to_string() });
}

#[test]
fn word_lists() {
    assert_value("(a, b)", "(a, b)");
    assert!(matches!(runtime_error("x = (a, b)"), RuntimeError::WordListValue { .. }));
}

#[test]
fn delete_removes_bindings() {
    assert_failure("x = 1; delete(x); x");
    assert_eq!(runtime_error("delete(sin)"),
               RuntimeError::ImmutableBinding { name: "sin".to_string() });
}

#[test]
fn unknown_variable_is_error() {
    assert_eq!(runtime_error("y = x + 1"),
               RuntimeError::UndefinedName { name: "x".to_string() });
}

#[test]
fn wrong_function_arity_is_error() {
    assert_eq!(runtime_error("f(x) = x; f(1, 2)"),
               RuntimeError::ArityMismatch { name:     "f".to_string(),
                                             expected: 1,
                                             found:    2, });
    assert_failure("sin(1, 2)");
}

#[test]
fn division_by_zero_follows_ieee() {
    assert_value("1 / 0", "Inf");
    assert_value("-1 / 0", "-Inf");
    assert_value("0 / 0", "NaN");
}

#[test]
fn incomplete_input_is_a_syntax_error() {
    match evaluate("2 +") {
        Err(Error::Parse(ParseError::UnexpectedToken { token, .. })) => assert_eq!(token, "+"),
        other => panic!("expected a syntax error, found {other:?}"),
    }
    assert_failure("(1 + 2");
    assert_failure("2 $ 3");
}

#[test]
fn deep_recursion_is_reported() {
    let mut session = Session::with_config(Config { max_depth: 200 });

    let result = session.evaluate("down(n) = ifelse(n, down(n - 1), 0); down(1000)");

    assert!(matches!(result,
                     Err(Error::Runtime(RuntimeError::RecursionDepthExceeded { limit: 200 }))));
    assert_success("down(n) = ifelse(n, down(n - 1), 0); down(20)");
}

#[test]
fn runaway_recursion_stops_at_the_default_depth() {
    assert_eq!(runtime_error("f(n) = f(n + 1); f(0)"),
               RuntimeError::RecursionDepthExceeded { limit: DEFAULT_MAX_DEPTH });
}

#[test]
fn deeply_nested_brackets_are_a_syntax_error() {
    let depth = 10_000;
    let source = format!("{}1{}", "(".repeat(depth), ")".repeat(depth));

    match evaluate(&source) {
        Err(Error::Parse(ParseError::NestingTooDeep { limit, .. })) => assert_eq!(limit, MAX_NESTING),
        other => panic!("expected a nesting error, found {other:?}"),
    }
    assert_value("((((((((((((((((((((((((((((((((((((((((7))))))))))))))))))))))))))))))))))))))))", "7");
}
