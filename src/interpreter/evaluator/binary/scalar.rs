/// `a ^ b`.
#[must_use]
pub fn pow(a: f64, b: f64) -> f64 {
    a.powf(b)
}

/// `a * b`.
#[must_use]
pub fn mul(a: f64, b: f64) -> f64 {
    a * b
}

/// `a / b`, with IEEE results for a zero divisor.
#[must_use]
pub fn div(a: f64, b: f64) -> f64 {
    a / b
}

/// `a % b`, taking the sign of the divisor.
///
/// A zero divisor gives NaN.
///
/// # Example
/// ```
/// use combicalc::interpreter::evaluator::binary::scalar::rem;
///
/// assert_eq!(rem(7.0, 3.0), 1.0);
/// assert_eq!(rem(-7.0, 3.0), 2.0);
/// assert_eq!(rem(7.0, -3.0), -2.0);
/// assert!(rem(1.0, 0.0).is_nan());
/// ```
#[must_use]
pub fn rem(a: f64, b: f64) -> f64 {
    if b == 0.0 {
        return f64::NAN;
    }
    let r = a % b;
    if r != 0.0 && (r < 0.0) != (b < 0.0) { r + b } else { r }
}

/// `a + b`.
#[must_use]
pub fn add(a: f64, b: f64) -> f64 {
    a + b
}

/// `a - b`.
#[must_use]
pub fn sub(a: f64, b: f64) -> f64 {
    a - b
}
