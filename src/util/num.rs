/// Largest signed integer exactly representable as an `f64` (`2^53 - 1`).
pub const MAX_SAFE_I64_INT: i64 = 9_007_199_254_740_991;

/// Safely converts an `i64` to `f64` if and only if it is exactly
/// representable.
///
/// ## Errors
/// Returns `Err(error)` if the value exceeds `MAX_SAFE_I64_INT` in absolute
/// value.
///
/// ## Example
/// ```
/// use combicalc::util::num::{MAX_SAFE_I64_INT, i64_to_f64_checked};
///
/// assert_eq!(i64_to_f64_checked(42, "too big!"), Ok(42.0));
/// assert!(i64_to_f64_checked(MAX_SAFE_I64_INT + 1, "too big!").is_err());
/// ```
#[allow(clippy::cast_precision_loss)]
pub fn i64_to_f64_checked<E>(value: i64, error: E) -> Result<f64, E> {
    if value.unsigned_abs() > MAX_SAFE_I64_INT.unsigned_abs() {
        return Err(error);
    }
    Ok(value as f64)
}

/// Converts a length or count to `f64`.
///
/// Lengths in this crate are bounded by allocation sizes, far below `2^53`,
/// so the conversion is exact in practice.
#[allow(clippy::cast_precision_loss)]
#[must_use]
pub const fn usize_to_f64(value: usize) -> f64 {
    value as f64
}

/// Converts an `f64` to `i64` if the value is finite, integral and exactly
/// representable.
///
/// ## Errors
/// Returns `Err(error)` for NaN, infinities, fractional values and values
/// beyond `MAX_SAFE_I64_INT`.
///
/// ## Example
/// ```
/// use combicalc::util::num::f64_to_i64_checked;
///
/// assert_eq!(f64_to_i64_checked(-3.0, ()), Ok(-3));
/// assert!(f64_to_i64_checked(1.5, ()).is_err());
/// assert!(f64_to_i64_checked(f64::NAN, ()).is_err());
/// ```
#[allow(clippy::cast_possible_truncation)]
#[allow(clippy::cast_precision_loss)]
pub fn f64_to_i64_checked<E>(value: f64, error: E) -> Result<i64, E> {
    if !value.is_finite() || value.fract() != 0.0 || value.abs() > MAX_SAFE_I64_INT as f64 {
        return Err(error);
    }
    Ok(value as i64)
}

/// Converts an `f64` to `usize` if the value is a non-negative integer that
/// fits.
///
/// ## Errors
/// Returns `Err(error)` for negative, fractional or non-finite values.
///
/// ## Example
/// ```
/// use combicalc::util::num::f64_to_usize_checked;
///
/// assert_eq!(f64_to_usize_checked(4.0, ()), Ok(4));
/// assert!(f64_to_usize_checked(-1.0, ()).is_err());
/// ```
pub fn f64_to_usize_checked<E>(value: f64, error: E) -> Result<usize, E> {
    let Ok(integer) = f64_to_i64_checked(value, ()) else {
        return Err(error);
    };
    usize::try_from(integer).map_err(|_| error)
}

/// Formats a number the way the language spells it.
///
/// Integral values print without a fractional part and the infinities print
/// as `Inf` and `-Inf`, so every finite or infinite result reads back as the
/// same literal.
///
/// ## Example
/// ```
/// use combicalc::util::num::format_number;
///
/// assert_eq!(format_number(7.0), "7");
/// assert_eq!(format_number(0.25), "0.25");
/// assert_eq!(format_number(f64::NEG_INFINITY), "-Inf");
/// ```
#[must_use]
pub fn format_number(value: f64) -> String {
    if value.is_infinite() {
        if value.is_sign_positive() { "Inf".to_string() } else { "-Inf".to_string() }
    } else {
        format!("{value}")
    }
}

/// Serializes floats so that NaN and the infinities survive JSON.
///
/// Finite values are written as JSON numbers; `NaN`, `Inf` and `-Inf` are
/// written as strings, matching the language's own spelling.
pub mod float_repr {
    use serde::{Deserialize, Deserializer, Serializer, de::Error as _};

    /// Writes `value` as a number, or as `"NaN"`, `"Inf"` or `"-Inf"`.
    pub fn serialize<S>(value: &f64, serializer: S) -> Result<S::Ok, S::Error>
        where S: Serializer
    {
        if value.is_finite() {
            serializer.serialize_f64(*value)
        } else if value.is_nan() {
            serializer.serialize_str("NaN")
        } else if value.is_sign_positive() {
            serializer.serialize_str("Inf")
        } else {
            serializer.serialize_str("-Inf")
        }
    }

    /// Reads a value written by [`serialize`].
    pub fn deserialize<'de, D>(deserializer: D) -> Result<f64, D::Error>
        where D: Deserializer<'de>
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Number(f64),
            Text(String),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Number(value) => Ok(value),
            Repr::Text(text) => match text.as_str() {
                "NaN" => Ok(f64::NAN),
                "Inf" => Ok(f64::INFINITY),
                "-Inf" => Ok(f64::NEG_INFINITY),
                other => Err(D::Error::custom(format!("invalid float '{other}'"))),
            },
        }
    }
}
