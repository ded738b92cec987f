/// Call evaluation and the built-in function table.
///
/// Resolves curried calls, invokes user closures in a fresh child of their
/// defining scope and installs the global constants and built-ins.
pub mod core;
/// Lazy argument wrappers.
///
/// Built-ins receive their arguments unevaluated together with the scope
/// they should be evaluated in.
pub mod argument;
/// Elementwise mathematical built-ins.
///
/// Trigonometry, square roots, exponentials, `len` and `zeros`.
pub mod builtin;
/// Logarithm function implementations.
///
/// Natural, base 10, base 2 and arbitrary base logarithms.
pub mod log;
/// Built-ins that control evaluation of their arguments.
///
/// `lambda`, `sum`, `ifelse` and `delete`.
pub mod special;
