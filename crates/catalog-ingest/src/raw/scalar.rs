//! Loosely typed JSON scalars.
//!
//! Storefront APIs disagree on whether ids, prices and flags are strings,
//! numbers or booleans, sometimes within one payload. Fields that vary are
//! read as [`Scalar`] and converted on use.

use catalog_model::Decimal;
use catalog_model::text::{non_empty, parse_bool, parse_decimal, parse_int};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Bool(bool),
    Number(serde_json::Number),
    Text(String),
}

impl Scalar {
    /// Trimmed text form; blank strings are `None`.
    pub fn text(&self) -> Option<String> {
        match self {
            Self::Bool(flag) => Some(flag.to_string()),
            Self::Number(number) => Some(number.to_string()),
            Self::Text(text) => non_empty(text),
        }
    }

    pub fn decimal(&self) -> Option<Decimal> {
        match self {
            Self::Bool(_) => None,
            Self::Number(number) => parse_decimal(&number.to_string()),
            Self::Text(text) => parse_decimal(text),
        }
    }

    pub fn int(&self) -> Option<i64> {
        match self {
            Self::Bool(_) => None,
            Self::Number(number) => number
                .as_i64()
                .or_else(|| parse_int(&number.to_string())),
            Self::Text(text) => parse_int(text),
        }
    }

    pub fn bool(&self) -> Option<bool> {
        match self {
            Self::Bool(flag) => Some(*flag),
            Self::Number(number) => number.as_i64().map(|value| value != 0),
            Self::Text(text) => parse_bool(text),
        }
    }

    /// True for whole numbers, written either as JSON integers or as
    /// strings of digits.
    pub fn is_integral(&self) -> bool {
        match self {
            Self::Bool(_) => false,
            Self::Number(number) => number.is_i64() || number.is_u64(),
            Self::Text(text) => {
                let digits = text.trim().strip_prefix('-').unwrap_or(text.trim());
                !digits.is_empty() && digits.chars().all(|ch| ch.is_ascii_digit())
            }
        }
    }
}

/// Shorthand for the common `Option<Scalar>` field.
pub(crate) fn text(value: Option<&Scalar>) -> Option<String> {
    value.and_then(Scalar::text)
}

pub(crate) fn decimal(value: Option<&Scalar>) -> Option<Decimal> {
    value.and_then(Scalar::decimal)
}

pub(crate) fn int(value: Option<&Scalar>) -> Option<i64> {
    value.and_then(Scalar::int)
}

pub(crate) fn flag(value: Option<&Scalar>) -> Option<bool> {
    value.and_then(Scalar::bool)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scalar(json: &str) -> Scalar {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn reads_mixed_representations() {
        assert_eq!(scalar("\"19.99\"").decimal().unwrap().to_string(), "19.99");
        assert_eq!(scalar("19.99").decimal().unwrap().to_string(), "19.99");
        assert_eq!(scalar("42").text().as_deref(), Some("42"));
        assert_eq!(scalar("\" 7 \"").int(), Some(7));
        assert_eq!(scalar("\"yes\"").bool(), Some(true));
        assert_eq!(scalar("true").bool(), Some(true));
        assert_eq!(scalar("\"  \"").text(), None);
    }

    #[test]
    fn integral_detection() {
        assert!(scalar("1999").is_integral());
        assert!(scalar("\"1999\"").is_integral());
        assert!(!scalar("19.99").is_integral());
        assert!(!scalar("\"19.99\"").is_integral());
    }
}
