//! Comparisons follow IEEE semantics: any comparison involving NaN is false,
//! except `!=`.

const fn truth(value: bool) -> f64 {
    if value { 1.0 } else { 0.0 }
}

/// `a > b`.
#[must_use]
pub fn greater(a: f64, b: f64) -> f64 {
    truth(a > b)
}

/// `a < b`.
#[must_use]
pub fn less(a: f64, b: f64) -> f64 {
    truth(a < b)
}

/// `a >= b`.
#[must_use]
pub fn greater_equal(a: f64, b: f64) -> f64 {
    truth(a >= b)
}

/// `a <= b`.
#[must_use]
pub fn less_equal(a: f64, b: f64) -> f64 {
    truth(a <= b)
}

/// `a == b`.
#[allow(clippy::float_cmp)]
#[must_use]
pub fn equal(a: f64, b: f64) -> f64 {
    truth(a == b)
}

/// `a != b`.
#[allow(clippy::float_cmp)]
#[must_use]
pub fn not_equal(a: f64, b: f64) -> f64 {
    truth(a != b)
}
