//! Lenient numeric handling for query results.
//!
//! Query engines hand back aggregates as native numbers or as numeric strings
//! depending on the column type, so every chart builder goes through here.

use crate::models::Scalar;

/// Parse a string as a whole number. Surrounding whitespace is ignored, anything
/// else after the number is not.
pub fn parse_number(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// True for native numbers and for non-empty strings that parse fully as a number.
pub fn is_numeric_like(value: &Scalar) -> bool {
    match value {
        Scalar::Number(n) => !n.is_nan(),
        Scalar::Text(s) => parse_number(s).is_some(),
        _ => false,
    }
}

/// Numeric value of a cell, falling back to 0 so NaN never reaches chart output.
pub fn coerce_number(value: &Scalar) -> f64 {
    match value {
        Scalar::Number(n) if n.is_finite() => *n,
        Scalar::Text(s) => parse_number(s).unwrap_or_else(|| {
            tracing::debug!(value = %s, "non-numeric value coerced to 0");
            0.0
        }),
        Scalar::Null => 0.0,
        other => {
            tracing::debug!(value = ?other, "non-numeric value coerced to 0");
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_strings() {
        assert!(is_numeric_like(&Scalar::from("42")));
        assert!(is_numeric_like(&Scalar::from(" 3.5 ")));
        assert!(is_numeric_like(&Scalar::from("-1e3")));
        assert!(!is_numeric_like(&Scalar::from("")));
        assert!(!is_numeric_like(&Scalar::from("10px")));
        assert!(!is_numeric_like(&Scalar::from("NaN")));
        assert!(!is_numeric_like(&Scalar::Null));
        assert!(!is_numeric_like(&Scalar::Bool(true)));
    }

    #[test]
    fn test_native_numbers() {
        assert!(is_numeric_like(&Scalar::Number(0.0)));
        assert!(!is_numeric_like(&Scalar::Number(f64::NAN)));
    }

    #[test]
    fn test_coerce_falls_back_to_zero() {
        assert_eq!(coerce_number(&Scalar::from("20")), 20.0);
        assert_eq!(coerce_number(&Scalar::from("abc")), 0.0);
        assert_eq!(coerce_number(&Scalar::Null), 0.0);
        assert_eq!(coerce_number(&Scalar::Number(f64::NAN)), 0.0);
        assert_eq!(coerce_number(&Scalar::Number(7.5)), 7.5);
    }
}
