/// Binary operator evaluation logic.
///
/// Arithmetic, comparison and logical operators, all applied elementwise with
/// broadcasting.
pub mod binary;

/// Unary operator evaluation logic.
///
/// Identity, arithmetic negation and logical `not`.
pub mod unary;

/// Core evaluation logic and context management.
///
/// Contains the main evaluation engine, the runtime context with its depth
/// guard, and the evaluation of lines and definitions.
pub mod core;

/// Subscript evaluation.
pub mod index;

/// Utility functions for evaluation.
///
/// Provides helpers and reusable routines shared by evaluation logic.
pub mod utils;

/// Function evaluation.
///
/// Handles curried calls, user closures and the built-in function table.
pub mod function;
