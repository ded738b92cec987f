use std::rc::Rc;

use crate::{
    error::RuntimeError,
    interpreter::{
        evaluator::core::EvalResult,
        value::{array::NdArray, function::Function},
    },
    util::num::format_number,
};

/// Represents a runtime value in the interpreter.
///
/// Booleans are numbers: comparisons and logical operators produce `1` or
/// `0`, and any nonzero number counts as true. The absence of a value is not
/// a variant; evaluation returns `Option<Value>` and `None` is the empty
/// result.
#[derive(Debug, Clone)]
pub enum Value {
    /// A double precision number.
    Number(f64),
    /// An n-dimensional numeric array, shared between holders.
    Array(Rc<NdArray>),
    /// A user-defined or built-in function.
    Function(Rc<Function>),
    /// A list of bare names, only meaningful where names are expected.
    WordList(Vec<String>),
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Number(if v { 1.0 } else { 0.0 })
    }
}

impl From<NdArray> for Value {
    /// Zero-dimensional arrays become plain numbers.
    fn from(array: NdArray) -> Self {
        if array.ndim() == 0 {
            return Self::Number(array.data()[0]);
        }
        Self::Array(Rc::new(array))
    }
}

impl From<Function> for Value {
    fn from(function: Function) -> Self {
        Self::Function(Rc::new(function))
    }
}

impl Value {
    /// A short description of the value's type, for error messages.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Number(_) => "a number",
            Self::Array(_) => "an array",
            Self::Function(_) => "a function",
            Self::WordList(_) => "a word list",
        }
    }

    /// Views a numeric value as an array; numbers become zero-dimensional.
    ///
    /// # Parameters
    /// - `context`: What the value is being used as, for error messages.
    ///
    /// # Errors
    /// - [`RuntimeError::WordListValue`] for word lists.
    /// - [`RuntimeError::TypeError`] for functions.
    pub fn to_array(&self, context: &'static str) -> EvalResult<NdArray> {
        match self {
            Self::Number(n) => Ok(NdArray::scalar(*n)),
            Self::Array(array) => Ok(NdArray::clone(array)),
            Self::WordList(_) => Err(RuntimeError::WordListValue { context }),
            Self::Function(function) => {
                Err(RuntimeError::TypeError { details: format!("{} cannot be used as {context}",
                                                               function.name()) })
            },
        }
    }

    /// Reads the value as a single number.
    ///
    /// Numbers and one-element arrays qualify.
    ///
    /// # Errors
    /// Returns [`RuntimeError::TypeError`] for anything else.
    ///
    /// # Example
    /// ```
    /// use combicalc::interpreter::value::{array::NdArray, core::Value};
    ///
    /// assert_eq!(Value::Number(2.0).as_number("a bound").unwrap(), 2.0);
    ///
    /// let single = Value::from(NdArray::from_vec(vec![3.0]));
    /// assert_eq!(single.as_number("a bound").unwrap(), 3.0);
    ///
    /// let pair = Value::from(NdArray::from_vec(vec![1.0, 2.0]));
    /// assert!(pair.as_number("a bound").is_err());
    /// ```
    pub fn as_number(&self, context: &'static str) -> EvalResult<f64> {
        match self {
            Self::Number(n) => Ok(*n),
            Self::Array(array) if array.size() == 1 => Ok(array.data()[0]),
            other => Err(RuntimeError::TypeError { details: format!("{} cannot be used as {context}",
                                                                    other.kind()) }),
        }
    }

    /// Decides whether the value counts as true in a condition.
    ///
    /// Nonzero numbers (including NaN) and functions are true. An array is
    /// only allowed when it holds exactly one element.
    ///
    /// # Errors
    /// - [`RuntimeError::TypeError`] for arrays with more or fewer than one
    ///   element.
    /// - [`RuntimeError::WordListValue`] for word lists.
    pub fn is_truthy(&self) -> EvalResult<bool> {
        match self {
            Self::Number(n) => Ok(*n != 0.0),
            Self::Array(array) if array.size() == 1 => Ok(array.data()[0] != 0.0),
            Self::Array(array) => {
                Err(RuntimeError::TypeError { details: format!("the truth value of an array with {} elements is ambiguous",
                                                               array.size()) })
            },
            Self::Function(_) => Ok(true),
            Self::WordList(_) => Err(RuntimeError::WordListValue { context: "a condition" }),
        }
    }
}

impl PartialEq for Value {
    /// Numbers and arrays compare by content, functions by identity.
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Number(a), Self::Number(b)) => a == b,
            (Self::Array(a), Self::Array(b)) => a == b,
            (Self::Function(a), Self::Function(b)) => Rc::ptr_eq(a, b),
            (Self::WordList(a), Self::WordList(b)) => a == b,
            _ => false,
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{}", format_number(*n)),
            Self::Array(array) => write!(f, "{array}"),
            Self::Function(function) => write!(f, "{function}"),
            Self::WordList(words) => write!(f, "({})", words.join(", ")),
        }
    }
}
