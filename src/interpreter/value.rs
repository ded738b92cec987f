/// The `Value` enum.
///
/// Numbers, arrays, functions and word lists, with conversions, truthiness
/// and display.
pub mod core;

/// N-dimensional arrays.
///
/// Defines `NdArray`, a row-major `f64` array with a shape. Implements
/// stacking, NumPy-style broadcasting and selection by integer indices.
pub mod array;

/// Function values.
///
/// User closures that capture their defining scope, and native built-ins that
/// receive unevaluated arguments.
pub mod function;
