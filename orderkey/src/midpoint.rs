//! Midpoint generation between two neighbouring order keys.
//!
//! Given a lower bound `prev` and an upper bound `next` (either may be
//! absent), [`midpoint`] builds a key that sorts strictly between them. The
//! construction walks both keys position by position:
//!
//! 1. Copy the shared prefix.
//! 2. If `prev` ran out first, copy the leading `a`s of `next`; a following
//!    `b` becomes an `a` and frees the upper bound.
//! 3. If the differing symbols are adjacent, keep `prev`'s symbol, free the
//!    upper bound, and carry through any run of `z` in `prev`.
//! 4. Close with the symbol halfway between the remaining codes, rounded
//!    toward `next`.
//!
//! The result is deterministic and never ends in `a`, so there is always
//! room to generate another key below it later.

use crate::error::OrderError;
use crate::keyspace::{self, FIRST, LAST, LOWER_SENTINEL, UPPER_SENTINEL};
use crate::types::OrderKey;

/// Generate a key strictly between `prev` and `next`.
///
/// `None` stands for an open boundary: `midpoint(None, None)` is `"n"`,
/// `midpoint(Some(k), None)` sorts after `k`, and `midpoint(None, Some(k))`
/// sorts before `k`.
///
/// # Errors
///
/// - [`OrderError::InvalidBounds`] if both bounds are present and `prev` does
///   not sort strictly before `next`.
/// - [`OrderError::KeySpaceExhausted`] if nothing over `a..=z` fits, which
///   happens when `next` is `prev` followed only by `a`s (e.g. `"a"` with no
///   lower bound).
///
/// # Examples
///
/// ```
/// use orderkey::{OrderKey, midpoint};
/// let d = OrderKey::new("d").unwrap();
/// let f = OrderKey::new("f").unwrap();
/// assert_eq!(midpoint(Some(&d), Some(&f)).unwrap().as_str(), "e");
/// assert_eq!(midpoint(None, None).unwrap().as_str(), "n");
/// ```
pub fn midpoint(prev: Option<&OrderKey>, next: Option<&OrderKey>) -> Result<OrderKey, OrderError> {
    if let (Some(p), Some(n)) = (prev, next)
        && p >= n
    {
        return Err(OrderError::InvalidBounds {
            prev: p.clone(),
            next: n.clone(),
        });
    }

    let mut out = Vec::with_capacity(prev.map_or(1, |p| p.len() + 1));
    let mut pos = 0;

    // Shared prefix. The sentinels never match each other, so this stops at
    // the latest one position past the longer key.
    let (mut low, mut high) = loop {
        let low = keyspace::lower_code(prev, pos);
        let high = keyspace::upper_code(next, pos);
        pos += 1;
        if low != high {
            break (low, high);
        }
        out.push(low);
    };

    if low == LOWER_SENTINEL {
        while high == FIRST {
            out.push(FIRST);
            high = keyspace::upper_code(next, pos);
            pos += 1;
        }
        if high == UPPER_SENTINEL && next.is_some() {
            return Err(OrderError::KeySpaceExhausted {
                prev: prev.cloned(),
                next: next.cloned(),
            });
        }
        if high == FIRST + 1 {
            out.push(FIRST);
            high = UPPER_SENTINEL;
        }
    } else if low + 1 == high {
        out.push(low);
        high = UPPER_SENTINEL;
        // Carry through trailing `z`s so the result still sorts after `prev`.
        loop {
            low = keyspace::lower_code(prev, pos);
            pos += 1;
            if low != LAST {
                break;
            }
            out.push(LAST);
        }
    }

    out.push(keyspace::middle(low, high));
    Ok(OrderKey::from_generated(out))
}
