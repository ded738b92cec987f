use std::rc::Rc;

use crate::{
    error::{Error, PersistError},
    interpreter::{
        Config,
        evaluator::core::Context,
        parser::{parse, parse_tree},
        persist::{self, Snapshot},
        scope::Scope,
        value::{array::NdArray, core::Value},
    },
};

/// Name bound to the history of results.
pub const ANS: &str = "ans";

/// An interpreter session: one global scope and one evaluation context.
///
/// Each call to [`Session::evaluate`] runs a whole program. Bindings made by
/// lines that succeed stay in place even when a later line fails.
///
/// Every evaluation appends to `ans`, a one-dimensional array: the result if
/// it is a number, `NaN` otherwise (arrays, functions, no value, errors). So
/// `ans[-1]` is the last result and `ans[-2]` the one before.
///
/// Evaluation grows its stack on the heap as it nests, so a session works on
/// any thread up to [`Config::max_depth`].
///
/// ## Usage
/// ```
/// use combicalc::interpreter::{session::Session, value::core::Value};
///
/// let mut session = Session::new();
///
/// session.evaluate("f(x) = x^2").unwrap();
/// assert_eq!(session.evaluate("f(3)").unwrap(), Some(Value::Number(9.0)));
/// assert_eq!(session.evaluate("ans[-1] + 1").unwrap(), Some(Value::Number(10.0)));
/// assert_eq!(session.evaluate("ans").unwrap().unwrap().to_string(), "[NaN, 9, 10]");
/// ```
#[derive(Debug)]
pub struct Session {
    context: Context,
    scope:   Rc<Scope>,
}

impl Session {
    /// A fresh session with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// A fresh session with the given limits.
    #[must_use]
    pub fn with_config(config: Config) -> Self {
        let scope = Scope::global();
        scope.force_value(ANS, NdArray::from_vec(Vec::new()).into(), false);

        Self { context: Context::new(config),
               scope }
    }

    /// Resumes a saved session.
    ///
    /// # Errors
    /// Fails if the snapshot cannot be rebuilt, see [`persist::deserialize`].
    pub fn from_snapshot(snapshot: &Snapshot, config: Config) -> Result<Self, PersistError> {
        let scope = persist::deserialize(snapshot)?;
        if !scope.contains(ANS) {
            scope.force_value(ANS, NdArray::from_vec(Vec::new()).into(), false);
        }

        Ok(Self { context: Context::new(config),
                  scope })
    }

    /// Parses and evaluates `text`, then appends the outcome to `ans`.
    ///
    /// # Returns
    /// The value of the last line, or `None` if it has none (a function
    /// definition, `delete`, an empty line).
    ///
    /// # Errors
    /// - [`Error::Parse`] if the text is not a program. Nothing is evaluated.
    /// - [`Error::Runtime`] if a line fails. Earlier lines stay committed.
    pub fn evaluate(&mut self, text: &str) -> Result<Option<Value>, Error> {
        let result = self.run(text);
        self.record(result.as_ref().ok().and_then(Option::as_ref));
        result
    }

    fn run(&mut self, text: &str) -> Result<Option<Value>, Error> {
        let program = parse(text)?;
        tracing::trace!(?program, "parsed");

        let value = self.context.eval_program(&program, &self.scope)?;
        if let Some(value) = &value {
            tracing::debug!(%value, "evaluated");
        }
        Ok(value)
    }

    /// Appends `value` to the `ans` history, or `NaN` if it is not a number.
    fn record(&self, value: Option<&Value>) {
        let latest = match value {
            Some(Value::Number(n)) => *n,
            _ => f64::NAN,
        };

        let mut history = match self.scope.lookup(ANS) {
            Ok(Value::Array(array)) if array.ndim() == 1 => array.data().to_vec(),
            _ => Vec::new(),
        };
        history.push(latest);

        self.scope.force_value(ANS, NdArray::from_vec(history).into(), false);
    }

    /// The labeled parse tree of `text`, as printed by `--debug`.
    ///
    /// # Errors
    /// Returns [`Error::Parse`] if the text is not a program.
    pub fn tree(text: &str) -> Result<String, Error> {
        Ok(parse_tree(text)?.to_string())
    }

    /// The global scope.
    #[must_use]
    pub const fn scope(&self) -> &Rc<Scope> {
        &self.scope
    }

    /// Records the global scope and everything reachable from it.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        persist::serialize(&self.scope)
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RuntimeError;

    fn history(session: &Session) -> Vec<String> {
        match session.scope().lookup(ANS) {
            Ok(Value::Array(array)) => array.data().iter().map(ToString::to_string).collect(),
            other => panic!("ans is not an array: {other:?}"),
        }
    }

    #[test]
    fn ans_records_every_result() {
        let mut session = Session::new();

        session.evaluate("1").unwrap();
        session.evaluate("2").unwrap();

        assert_eq!(session.evaluate("ans[-2]").unwrap(), Some(Value::Number(1.0)));
        assert_eq!(session.evaluate("ans[-1] + ans[0]").unwrap(), Some(Value::Number(2.0)));
    }

    #[test]
    fn results_without_a_number_record_nan() {
        let mut session = Session::new();

        session.evaluate("g(x) = x").unwrap();
        session.evaluate("[1, 2]").unwrap();
        assert!(session.evaluate("missing").is_err());
        assert!(session.evaluate("1 +").is_err());
        session.evaluate("5").unwrap();

        assert_eq!(history(&session), vec!["NaN", "NaN", "NaN", "NaN", "5"]);
    }

    #[test]
    fn ans_cannot_be_assigned_or_deleted() {
        let mut session = Session::new();

        session.evaluate("7").unwrap();
        session.evaluate("ans = 1; g(x) = x").unwrap();

        assert_eq!(history(&session), vec!["7", "NaN"]);
        assert!(matches!(session.evaluate("delete(ans)"),
                         Err(Error::Runtime(RuntimeError::ImmutableBinding { .. }))));
    }

    #[test]
    fn failing_lines_keep_earlier_bindings() {
        let mut session = Session::new();

        assert!(session.evaluate("a = 1; b = missing; c = 3").is_err());

        assert_eq!(session.scope().lookup("a"), Ok(Value::Number(1.0)));
        assert!(session.scope().lookup("c").is_err());
    }

    #[test]
    fn parse_errors_evaluate_nothing() {
        let mut session = Session::new();

        assert!(matches!(session.evaluate("a = 1; 2 +"), Err(Error::Parse(_))));
        assert!(session.scope().lookup("a").is_err());
    }

    #[test]
    fn depth_limit_comes_from_the_config() {
        let mut session = Session::with_config(Config { max_depth: 50 });

        let result = session.evaluate("f(n) = ifelse(n, f(n - 1), 0); f(100)");

        assert!(matches!(result,
                         Err(Error::Runtime(RuntimeError::RecursionDepthExceeded { limit: 50 }))));
    }

    #[test]
    fn snapshots_resume_sessions() {
        let mut session = Session::new();
        session.evaluate("square(x) = x^2; base = 4").unwrap();

        let mut resumed = Session::from_snapshot(&session.snapshot(), Config::default()).unwrap();

        assert_eq!(resumed.evaluate("square(base)").unwrap(), Some(Value::Number(16.0)));
    }
}
