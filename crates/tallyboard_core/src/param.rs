//! Loosely typed request parameter values.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A request parameter value as it travels through the query string.
///
/// Raw query-string values are coerced to numbers when they parse as a
/// finite number, and kept as text otherwise.
///
/// # Examples
///
/// ```
/// use tallyboard_core::ParamValue;
///
/// assert_eq!(ParamValue::coerce("42"), ParamValue::Number(42.0));
/// assert_eq!(ParamValue::coerce("critValue"), ParamValue::Text("critValue".into()));
/// assert_eq!(ParamValue::coerce("42").to_string(), "42");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, derive_more::From)]
#[serde(untagged)]
pub enum ParamValue {
    /// Finite numeric value
    Number(f64),
    /// Anything that is not a finite number
    Text(String),
}

impl ParamValue {
    /// Coerce a raw query-string value.
    ///
    /// Blank strings stay text; `"NaN"` and `"inf"` are not finite and stay
    /// text as well.
    pub fn coerce(raw: &str) -> Self {
        let trimmed = raw.trim();
        if !trimmed.is_empty() {
            if let Ok(number) = trimmed.parse::<f64>() {
                if number.is_finite() {
                    return Self::Number(number);
                }
            }
        }
        Self::Text(raw.to_string())
    }

    /// Whether the value carries no information (empty text).
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Text(text) if text.is_empty())
    }

    /// The value as an integer, when it is a whole number.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Number(n) if n.fract() == 0.0 => Some(*n as i64),
            _ => None,
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        Self::Number(value as f64)
    }
}

impl std::fmt::Display for ParamValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => write!(f, "{}", *n as i64),
            Self::Number(n) => write!(f, "{}", n),
            Self::Text(text) => f.write_str(text),
        }
    }
}

/// Named parameters supplied from outside the grid.
///
/// Ordered by key so two maps with the same entries always compare and
/// serialize identically.
pub type ExternalParams = BTreeMap<String, ParamValue>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coerce_rejects_non_finite_and_blank() {
        assert_eq!(ParamValue::coerce(""), ParamValue::Text(String::new()));
        assert_eq!(ParamValue::coerce("  "), ParamValue::Text("  ".into()));
        assert_eq!(ParamValue::coerce("NaN"), ParamValue::Text("NaN".into()));
        assert_eq!(ParamValue::coerce("inf"), ParamValue::Text("inf".into()));
        assert_eq!(ParamValue::coerce("-1"), ParamValue::Number(-1.0));
        assert_eq!(ParamValue::coerce("2.5"), ParamValue::Number(2.5));
    }

    #[test]
    fn test_display_keeps_integers_integral() {
        assert_eq!(ParamValue::Number(-1.0).to_string(), "-1");
        assert_eq!(ParamValue::Number(2.5).to_string(), "2.5");
        assert_eq!(ParamValue::from("abc").to_string(), "abc");
    }
}
