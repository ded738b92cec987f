/// Parser combinators.
///
/// Defines the parser type, the per-parse state with its memo table and
/// left-recursion counters, and the primitives rules are assembled from:
/// terminals, sequences, alternation, repetition, labeling and memoization.
pub mod combinator;

/// Labeled parse trees.
///
/// The untyped tree the combinators produce: labeled nodes, token leaves and
/// the canonical empty node.
pub mod tree;

/// The language grammar.
///
/// Builds every production of the language out of combinators, including the
/// seven binary precedence tiers and the left-recursive call and index rules.
pub mod grammar;

/// Parse entry points.
///
/// Tokenizes the source, runs the `program` rule, requires the whole input to
/// be consumed and reports the furthest reached token otherwise.
pub mod core;

/// Lowering from labeled trees to the typed AST.
///
/// Walks the disambiguated parse tree and produces [`crate::ast::Program`].
pub mod lower;

pub use self::core::{MAX_NESTING, ParseResult, parse, parse_tree, parse_with_stats};
