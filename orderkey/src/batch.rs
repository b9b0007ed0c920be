//! Batch insertion at either end of an ordered list of keys.
//!
//! Appending is free: keys above the current maximum are unbounded. The
//! space below the minimum runs out (nothing sorts below a run of `a`s), so
//! prepending reclaims room by moving the current first record up to the
//! midpoint of the first two keys and reusing the freed range below it. At
//! most one existing record is rewritten per batch, whatever the list size.
//!
//! Callers persisting a [`Prepended`] result must read the first two keys
//! and rewrite the first record in one transaction. Two concurrent prepends
//! on the same partition otherwise race on that record.

use crate::compare::check_ascending;
use crate::error::OrderError;
use crate::midpoint::midpoint;
use crate::types::OrderKey;

/// A key change for an existing record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyRewrite {
    /// The record's current key.
    pub from: OrderKey,
    /// The key the record must be updated to.
    pub to: OrderKey,
}

/// Result of [`prepend_front`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prepended {
    /// Rewrite of the former first record, if room had to be reclaimed.
    pub rewritten: Option<KeyRewrite>,
    /// New keys in ascending order. The `i`-th new record takes `new_keys[i]`.
    pub new_keys: Vec<OrderKey>,
}

impl Prepended {
    /// New keys starting from the one adjacent to the existing records.
    pub fn descending_from_boundary(&self) -> impl Iterator<Item = &OrderKey> {
        self.new_keys.iter().rev()
    }
}

/// Generate `count` ascending keys that sort after every key in `existing`.
///
/// `existing` must be strictly ascending. No existing record is rewritten.
///
/// # Examples
///
/// ```
/// use orderkey::{OrderKey, append_back};
/// let keys = append_back(3, &[]).unwrap();
/// let strs: Vec<&str> = keys.iter().map(OrderKey::as_str).collect();
/// assert_eq!(strs, ["n", "u", "x"]);
/// ```
pub fn append_back(count: usize, existing: &[OrderKey]) -> Result<Vec<OrderKey>, OrderError> {
    check_ascending(existing)?;
    let mut new_keys = Vec::with_capacity(count);
    let mut last = existing.last().cloned();
    for _ in 0..count {
        let key = midpoint(last.as_ref(), None)?;
        new_keys.push(key.clone());
        last = Some(key);
    }
    Ok(new_keys)
}

/// Generate `count` ascending keys that sort before every key in `existing`.
///
/// `existing` must be strictly ascending; only its first two keys are
/// consulted when placing the new keys.
///
/// - Empty list: the first key is the open midpoint and later keys step
///   down below it.
/// - One key: keys step down below it. If it is a run of `a`s there is no
///   room below, and the record is rewritten above its current key instead.
/// - Two or more keys: the first record moves to the midpoint of the first
///   two keys. Its old key and successive bisections below the new position
///   become the new keys.
pub fn prepend_front(count: usize, existing: &[OrderKey]) -> Result<Prepended, OrderError> {
    check_ascending(existing)?;
    if count == 0 {
        return Ok(Prepended {
            rewritten: None,
            new_keys: Vec::new(),
        });
    }

    match existing {
        [] => Ok(Prepended {
            rewritten: None,
            new_keys: step_down(count, None)?,
        }),
        [only] => match step_down(count, Some(only)) {
            Err(OrderError::KeySpaceExhausted { .. }) => reclaim(count, only, None),
            result => result.map(|new_keys| Prepended {
                rewritten: None,
                new_keys,
            }),
        },
        [first, second, ..] => reclaim(count, first, Some(second)),
    }
}

/// Keys descending from `upper` (or from the open midpoint), returned ascending.
fn step_down(count: usize, upper: Option<&OrderKey>) -> Result<Vec<OrderKey>, OrderError> {
    let mut new_keys = Vec::with_capacity(count);
    let mut boundary = upper.cloned();
    for _ in 0..count {
        let key = midpoint(None, boundary.as_ref())?;
        new_keys.push(key.clone());
        boundary = Some(key);
    }
    new_keys.reverse();
    Ok(new_keys)
}

/// Move `first` up to `midpoint(first, next)` and fill the freed range.
fn reclaim(
    count: usize,
    first: &OrderKey,
    next: Option<&OrderKey>,
) -> Result<Prepended, OrderError> {
    let moved = midpoint(Some(first), next)?;
    tracing::debug!(from = %first, to = %moved, count, "reclaiming room below first key");

    // Bisect toward `first`; the last record created keeps `first` itself.
    let mut new_keys = Vec::with_capacity(count);
    let mut boundary = moved.clone();
    for _ in 1..count {
        let key = midpoint(Some(first), Some(&boundary))?;
        new_keys.push(key.clone());
        boundary = key;
    }
    new_keys.push(first.clone());
    new_keys.reverse();

    Ok(Prepended {
        rewritten: Some(KeyRewrite {
            from: first.clone(),
            to: moved,
        }),
        new_keys,
    })
}
