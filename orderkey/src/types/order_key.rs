//! The order key newtype.
//!
//! An order key is a non-empty string over the lowercase alphabet `a..=z`.
//! Keys compare by plain byte-lexicographic order, which is also how the
//! document store orders the `order` field, so sorting in the database and
//! sorting here always agree.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::OrderError;
use crate::keyspace;

/// A validated order key.
///
/// # Invariants
///
/// - The key is non-empty.
/// - Every byte is in `a..=z`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct OrderKey(String);

impl OrderKey {
    /// Validate and wrap a string.
    ///
    /// # Examples
    ///
    /// ```
    /// use orderkey::OrderKey;
    /// let key = OrderKey::new("bn").unwrap();
    /// assert_eq!(key.as_str(), "bn");
    /// assert!(OrderKey::new("B").is_err());
    /// ```
    pub fn new(value: impl Into<String>) -> Result<Self, OrderError> {
        let value = value.into();
        if value.is_empty() {
            return Err(OrderError::InvalidKey {
                value,
                reason: "must not be empty",
            });
        }
        if !value.bytes().all(keyspace::is_symbol) {
            return Err(OrderError::InvalidKey {
                value,
                reason: "must contain only the letters a-z",
            });
        }
        Ok(Self(value))
    }

    /// Parse a wire value where the empty string means "no bound".
    pub fn parse_optional(value: &str) -> Result<Option<Self>, OrderError> {
        if value.is_empty() {
            Ok(None)
        } else {
            Self::new(value).map(Some)
        }
    }

    /// Build a key from bytes the generator produced.
    ///
    /// Callers guarantee the bytes are a non-empty run of `a..=z`.
    pub(crate) fn from_generated(bytes: Vec<u8>) -> Self {
        debug_assert!(!bytes.is_empty());
        debug_assert!(bytes.iter().copied().all(keyspace::is_symbol));
        Self(bytes.into_iter().map(char::from).collect())
    }

    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }

    #[must_use]
    pub const fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    /// Length of the key in symbols.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if the key is empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        false
    }
}

impl fmt::Display for OrderKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for OrderKey {
    type Err = OrderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for OrderKey {
    type Error = OrderError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for OrderKey {
    type Error = OrderError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<OrderKey> for String {
    fn from(key: OrderKey) -> Self {
        key.0
    }
}

impl AsRef<str> for OrderKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
