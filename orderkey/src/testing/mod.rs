//! Helpers shared by unit tests.

use crate::types::OrderKey;

/// Build a key from a literal, panicking on invalid input.
pub fn key(value: &str) -> OrderKey {
    #[allow(clippy::expect_used)]
    OrderKey::new(value).expect("test key must be valid")
}

/// Build keys from literals.
pub fn keys(values: &[&str]) -> Vec<OrderKey> {
    values.iter().map(|value| key(value)).collect()
}

/// Assert that every key sorts strictly before the next.
pub fn assert_strictly_ascending(keys: &[OrderKey]) {
    for pair in keys.windows(2) {
        assert!(
            pair[0] < pair[1],
            "keys not strictly ascending: '{}' then '{}' in {keys:?}",
            pair[0],
            pair[1]
        );
    }
}
