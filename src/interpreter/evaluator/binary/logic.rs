//! Logical operators treat every nonzero value, NaN included, as true.

fn truthy(value: f64) -> bool {
    value != 0.0
}

/// `a and b`.
#[must_use]
pub fn and(a: f64, b: f64) -> f64 {
    if truthy(a) && truthy(b) { 1.0 } else { 0.0 }
}

/// `a or b`.
#[must_use]
pub fn or(a: f64, b: f64) -> f64 {
    if truthy(a) || truthy(b) { 1.0 } else { 0.0 }
}
