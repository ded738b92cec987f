/// The evaluator module executes the AST and computes results.
///
/// The evaluator walks lines and expressions, applies operators with
/// broadcasting, resolves names through the scope chain and calls user and
/// built-in functions.
///
/// # Responsibilities
/// - Evaluates every AST variant with an exhaustive match.
/// - Implements curried calls, closures, lazy arguments and the built-ins.
/// - Reports runtime errors and guards the nesting depth.
pub mod evaluator;
/// The lexer module tokenizes source code for further parsing.
///
/// The lexer reads the raw source text and produces a stream of tokens:
/// numbers, words, operators and punctuation. This is the first stage of
/// interpretation.
///
/// # Responsibilities
/// - Converts the input character stream into tokens with byte offsets.
/// - Skips whitespace.
/// - Reports characters it cannot classify.
pub mod lexer;
/// The parser module builds the abstract syntax tree (AST) from tokens.
///
/// Parsing is done by a memoizing combinator engine that tolerates ambiguous
/// and left-recursive rules. The grammar produces a labeled parse tree which
/// is then lowered into the typed AST.
///
/// # Responsibilities
/// - Composes the grammar from combinators.
/// - Resolves ambiguity by keeping the longest match.
/// - Reports the furthest point the grammar reached when input is rejected.
pub mod parser;
/// Lexical scopes.
///
/// Parent-linked symbol tables shared by reference between closures.
pub mod scope;
/// The value module defines the runtime data types for evaluation.
///
/// Numbers, n-dimensional arrays, functions and word lists, with conversion
/// and display.
///
/// # Responsibilities
/// - Defines the `Value` enum and its variants.
/// - Implements broadcasting and selection on arrays.
/// - Defines user and built-in function values.
pub mod value;
/// Saving and restoring scopes.
///
/// Turns a scope graph into a serde tree and back, keeping shared parents
/// and self-referential closures intact.
pub mod persist;
/// A REPL-style session.
///
/// Owns the global scope and the evaluation context, and records every result
/// in the `ans` history.
pub mod session;

/// Default for [`Config::max_depth`].
pub const DEFAULT_MAX_DEPTH: usize = 3000;

/// Evaluation limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Deepest expression nesting allowed before evaluation fails with
    /// [`RuntimeError::RecursionDepthExceeded`](crate::error::RuntimeError::RecursionDepthExceeded).
    pub max_depth: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self { max_depth: DEFAULT_MAX_DEPTH }
    }
}
