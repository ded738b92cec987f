use combicalc::{
    error::{Error, PersistError},
    interpreter::{Config, persist, session::Session, value::core::Value},
};

fn restore(session: &Session) -> Session {
    let json = persist::to_json(&session.snapshot()).unwrap();
    let snapshot = persist::from_json(&json).unwrap();
    Session::from_snapshot(&snapshot, Config::default()).unwrap()
}

fn value(session: &mut Session, src: &str) -> String {
    match session.evaluate(src) {
        Ok(Some(value)) => value.to_string(),
        other => panic!("expected a value from {src}, found {other:?}"),
    }
}

#[test]
fn bindings_round_trip() {
    let mut session = Session::new();
    session.evaluate("x = 3; m = [[1.5, 2], [3, 4]]; v = [NaN, Inf]").unwrap();
    session.evaluate("2x").unwrap();

    let mut restored = restore(&session);

    assert_eq!(value(&mut restored, "ans"), "[NaN, 6]");
    assert_eq!(value(&mut restored, "x"), "3");
    assert_eq!(value(&mut restored, "m"), "[[1.5, 2], [3, 4]]");
    assert_eq!(value(&mut restored, "v"), "[NaN, Inf]");
}

#[test]
fn functions_and_closures_round_trip() {
    let mut session = Session::new();
    session.evaluate("square(x) = x^2; offset = 5; shifted(x) = square(x) + offset")
           .unwrap();
    session.evaluate("counter(k) = lambda(x, x + k); add10 = counter(10)").unwrap();

    let mut restored = restore(&session);

    assert_eq!(value(&mut restored, "shifted(3)"), "14");
    assert_eq!(value(&mut restored, "add10(1)"), "11");
    assert_eq!(value(&mut restored, "offset = 6; shifted(3)"), "15");
}

#[test]
fn self_referential_lambdas_round_trip() {
    let mut session = Session::new();
    session.evaluate("fib = lambda(n, ifelse(n < 2, n, self(n - 1) + self(n - 2)))").unwrap();

    let mut restored = restore(&session);

    assert_eq!(value(&mut restored, "fib(10)"), "55");
}

#[test]
fn immutability_round_trips() {
    let mut session = Session::new();
    session.evaluate("y = 1").unwrap();

    let mut restored = restore(&session);

    assert_eq!(value(&mut restored, "pi = 3; pi"), std::f64::consts::PI.to_string());
    assert_eq!(value(&mut restored, "y = 2; y"), "2");
    assert_eq!(value(&mut restored, "sqrt(16)"), "4");
}

#[test]
fn snapshots_are_plain_json() {
    let mut session = Session::new();
    session.evaluate("z = 2").unwrap();

    let json = persist::to_json(&session.snapshot()).unwrap();

    assert!(json.contains("\"type\": \"number\""));
    assert!(json.contains("\"type\": \"builtin\""));
}

#[test]
fn garbage_is_rejected() {
    assert!(matches!(persist::from_json("{\"scopes\": 3}"), Err(PersistError::Json(_))));

    let error: Error = PersistError::UnknownBuiltin { name: "print".to_string() }.into();
    assert_eq!(error.to_string(), "Snapshot refers to unknown built-in 'print'");
}

#[test]
fn restored_values_compare_equal() {
    let mut session = Session::new();
    session.evaluate("w = [1, 2, 3]").unwrap();

    let restored = restore(&session);

    assert_eq!(restored.scope().lookup("w"), session.scope().lookup("w"));
    assert!(matches!(restored.scope().lookup("sin"), Ok(Value::Function(_))));
}
