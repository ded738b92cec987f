//! # combicalc
//!
//! combicalc is an array calculator language written in Rust.
//! Source text is parsed by a memoizing combinator engine that accepts
//! ambiguous and left-recursive grammars, then evaluated by a tree-walking
//! interpreter with lexical closures, lazy built-in arguments and NumPy-style
//! broadcasting over n-dimensional arrays.

#![warn(
    clippy::redundant_clone,
    clippy::needless_pass_by_value,
    clippy::similar_names,
    clippy::large_enum_variant,
    clippy::string_lit_as_bytes,
    clippy::match_same_arms,
    clippy::cargo,
    clippy::nursery,
    clippy::perf,
    clippy::style,
    clippy::suspicious,
    clippy::correctness,
    clippy::complexity,
    clippy::pedantic,
    //missing_docs,
)]
#![allow(clippy::missing_errors_doc)]

use crate::{error::Error, interpreter::{session::Session, value::core::Value}};

/// Defines the structure of parsed code.
///
/// This module declares the `Program`, `Line` and `Expr` types that represent
/// the syntactic structure of source code as a typed tree. The AST is lowered
/// from the labeled parse tree and walked by the evaluator.
///
/// # Responsibilities
/// - Defines line and expression types for all language constructs.
/// - Defines the binary and unary operators with their symbols.
/// - Reads unevaluated expressions as word lists.
pub mod ast;
/// Provides unified error types for parsing, evaluation and persistence.
///
/// This module defines all errors that can be raised while lexing, parsing,
/// evaluating code or restoring a snapshot. It standardizes error reporting
/// and carries the offending token or value in each variant.
///
/// # Responsibilities
/// - Defines error enums for all failure modes.
/// - Attaches token offsets and details for context.
/// - Wraps every kind in one `Error` for front ends.
pub mod error;
/// Orchestrates the entire process of code execution.
///
/// This module ties together lexing, parsing, evaluation, value
/// representations, scopes, persistence and the session to provide a
/// complete runtime for source code evaluation.
///
/// # Responsibilities
/// - Coordinates all core components: lexer, parser, evaluator, and value
///   types.
/// - Provides entry points for parsing and evaluating user code.
/// - Manages the flow of data and errors between phases.
pub mod interpreter;
/// General utilities for safe numeric conversion and helpers.
///
/// This module provides conversion routines shared by the evaluator and the
/// persistence layer: checked conversions between integers and `f64`, number
/// formatting and the serde representation of non-finite floats.
///
/// # Responsibilities
/// - Safely convert between `i64`, `usize`, and `f64` without silent data
///   loss.
/// - Format numbers the way the interpreter displays them.
pub mod util;

/// Evaluates a program in a fresh session.
///
/// Lines are separated by `;`. The value of the last line is returned, or
/// `None` if it has none. Parsing and evaluation grow their stack on the heap,
/// so this can be called from any thread.
///
/// # Errors
/// Returns an error if parsing or evaluation fails.
///
/// # Examples
/// ```
/// use combicalc::{evaluate, interpreter::value::core::Value};
///
/// // Simple expression: the result will be calculated and no error should occur.
/// let res = evaluate("x = 2; 3x + 1");
/// assert_eq!(res.unwrap(), Some(Value::Number(7.0)));
///
/// // Example with an intentional error (unknown variable).
/// let res = evaluate("y = x + 1"); // 'x' is not defined
/// assert!(res.is_err());
/// ```
pub fn evaluate(source: &str) -> Result<Option<Value>, Error> {
    Session::new().evaluate(source)
}
