//! Alphabet and boundary sentinels shared by every key operation.
//!
//! Keys use the 26 contiguous symbols `a..=z`. Two extra codes sit just
//! outside the alphabet: [`LOWER_SENTINEL`] (one below `a`) stands for
//! "no lower bound" and [`UPPER_SENTINEL`] (one above `z`) for "no upper
//! bound". The sentinels are only ever used as intermediate codes; they
//! never appear in a stored key.

use crate::types::OrderKey;

/// Smallest alphabet symbol.
pub const FIRST: u8 = b'a';
/// Largest alphabet symbol.
pub const LAST: u8 = b'z';
/// Code one below [`FIRST`], read past the end of a lower bound.
pub const LOWER_SENTINEL: u8 = FIRST - 1;
/// Code one above [`LAST`], read past the end of an upper bound.
pub const UPPER_SENTINEL: u8 = LAST + 1;

/// Whether a byte is an alphabet symbol.
#[must_use]
pub const fn is_symbol(byte: u8) -> bool {
    matches!(byte, FIRST..=LAST)
}

/// Code of the lower bound at `pos`, or the lower sentinel past its end.
#[must_use]
pub fn lower_code(bound: Option<&OrderKey>, pos: usize) -> u8 {
    bound
        .and_then(|key| key.as_bytes().get(pos).copied())
        .unwrap_or(LOWER_SENTINEL)
}

/// Code of the upper bound at `pos`, or the upper sentinel past its end.
#[must_use]
pub fn upper_code(bound: Option<&OrderKey>, pos: usize) -> u8 {
    bound
        .and_then(|key| key.as_bytes().get(pos).copied())
        .unwrap_or(UPPER_SENTINEL)
}

/// Code strictly between `low` and `high`, rounded up toward `high`.
///
/// Callers guarantee `high - low >= 2`.
#[must_use]
pub const fn middle(low: u8, high: u8) -> u8 {
    low + (high - low).div_ceil(2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::key;

    #[test]
    fn test_sentinels_bracket_alphabet() {
        assert_eq!(LOWER_SENTINEL, b'`');
        assert_eq!(UPPER_SENTINEL, b'{');
        assert!(!is_symbol(LOWER_SENTINEL));
        assert!(!is_symbol(UPPER_SENTINEL));
        assert!((FIRST..=LAST).all(is_symbol));
    }

    #[test]
    fn test_codes_past_end_are_sentinels() {
        let k = key("ab");
        assert_eq!(lower_code(Some(&k), 1), b'b');
        assert_eq!(lower_code(Some(&k), 2), LOWER_SENTINEL);
        assert_eq!(upper_code(Some(&k), 2), UPPER_SENTINEL);
        assert_eq!(lower_code(None, 0), LOWER_SENTINEL);
        assert_eq!(upper_code(None, 0), UPPER_SENTINEL);
    }

    #[test]
    fn test_middle_of_open_range_is_n() {
        assert_eq!(middle(LOWER_SENTINEL, UPPER_SENTINEL), b'n');
    }

    #[test]
    fn test_middle_rounds_toward_high() {
        assert_eq!(middle(b'a', b'd'), b'c');
        assert_eq!(middle(b'a', b'c'), b'b');
    }
}
