//! Errors raised by the order-key engine.
//!
//! Every variant is a contract violation by the caller (or a broken invariant
//! upstream), never a transient condition. Nothing here is retried; callers
//! surface the error and abort the current operation.

use crate::types::OrderKey;

/// Which record field a comparator needed but did not find.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordField {
    /// The order key field (`order`).
    Order,
    /// The numeric priority field (`urgency`).
    Priority,
}

impl std::fmt::Display for RecordField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Order => write!(f, "order"),
            Self::Priority => write!(f, "urgency"),
        }
    }
}

/// Error returned by key generation and comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderError {
    /// Both bounds were given but `prev` does not sort strictly before `next`.
    InvalidBounds { prev: OrderKey, next: OrderKey },
    /// Two keys compared equal. Keys within a partition are unique, so this
    /// means an invariant was broken upstream.
    DuplicateKey(OrderKey),
    /// A record lacks a field required for comparison.
    MissingField(RecordField),
    /// A string is not a valid order key.
    InvalidKey { value: String, reason: &'static str },
    /// The bounds are ordered but no key over `a..=z` fits between them.
    KeySpaceExhausted {
        prev: Option<OrderKey>,
        next: Option<OrderKey>,
    },
}

impl std::fmt::Display for OrderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidBounds { prev, next } => {
                write!(f, "invalid bounds: '{prev}' does not sort before '{next}'")
            }
            Self::DuplicateKey(key) => write!(f, "duplicate order key: '{key}'"),
            Self::MissingField(field) => write!(f, "record is missing the {field} field"),
            Self::InvalidKey { value, reason } => {
                write!(f, "invalid order key '{value}': {reason}")
            }
            Self::KeySpaceExhausted { prev, next } => write!(
                f,
                "no order key fits between {} and {}",
                describe_bound(prev.as_ref(), "start"),
                describe_bound(next.as_ref(), "end")
            ),
        }
    }
}

impl std::error::Error for OrderError {}

fn describe_bound(bound: Option<&OrderKey>, absent: &str) -> String {
    bound.map_or_else(|| absent.to_string(), |key| format!("'{key}'"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::key;

    #[test]
    fn test_display_invalid_bounds() {
        let error = OrderError::InvalidBounds {
            prev: key("m"),
            next: key("c"),
        };
        assert_eq!(
            error.to_string(),
            "invalid bounds: 'm' does not sort before 'c'"
        );
    }

    #[test]
    fn test_display_missing_field() {
        assert_eq!(
            OrderError::MissingField(RecordField::Priority).to_string(),
            "record is missing the urgency field"
        );
    }

    #[test]
    fn test_display_exhausted_with_absent_bound() {
        let error = OrderError::KeySpaceExhausted {
            prev: None,
            next: Some(key("aa")),
        };
        assert_eq!(error.to_string(), "no order key fits between start and 'aa'");
    }
}
