/// Numeric conversion helpers.
///
/// This module provides safe functions for converting between integer and
/// floating-point types without risking silent data loss or rounding errors.
/// Use these helpers whenever a language number has to become an index, a
/// dimension or a loop bound.
///
/// All checked functions return a `Result`, which is `Ok` if the conversion is
/// lossless and valid, or the caller's error if the value is out of range or
/// not an integer. The module also carries the JSON float representation used
/// by snapshots.
pub mod num;
/// Stack growth for the recursive parser and evaluator.
pub mod stack;
