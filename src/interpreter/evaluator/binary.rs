/// Binary operator dispatch.
///
/// Maps every operator to its elementwise kernel and applies it with
/// broadcasting.
pub mod core;

/// Elementwise application of a kernel to two values.
pub mod array;

/// Arithmetic kernels: power, products, quotients, remainders and sums.
pub mod scalar;

/// Comparison kernels producing `1` or `0`.
pub mod comparison;

/// Logical kernels producing `1` or `0`.
pub mod logic;
