//! Fallible comparators over order keys and ordered records.
//!
//! Equality is never a tie here: two live keys in one partition must differ,
//! so an equal pair is reported as [`OrderError::DuplicateKey`].

use std::cmp::Ordering;

use crate::error::{OrderError, RecordField};
use crate::types::OrderKey;

/// A record that carries an order key and, optionally, a priority.
///
/// Both accessors return `None` when the stored record lacks the field.
pub trait Ordered {
    fn order_key(&self) -> Option<&OrderKey>;

    fn priority(&self) -> Option<i64>;
}

impl Ordered for OrderKey {
    fn order_key(&self) -> Option<&OrderKey> {
        Some(self)
    }

    fn priority(&self) -> Option<i64> {
        None
    }
}

/// Compare two keys, failing if they are equal.
pub fn compare_keys(a: &OrderKey, b: &OrderKey) -> Result<Ordering, OrderError> {
    match a.cmp(b) {
        Ordering::Equal => Err(OrderError::DuplicateKey(a.clone())),
        ordering => Ok(ordering),
    }
}

/// Check that `keys` is strictly ascending.
///
/// Equal neighbours are reported as [`OrderError::DuplicateKey`], reversed
/// ones as [`OrderError::InvalidBounds`].
pub fn check_ascending(keys: &[OrderKey]) -> Result<(), OrderError> {
    for pair in keys.windows(2) {
        if compare_keys(&pair[0], &pair[1])?.is_gt() {
            return Err(OrderError::InvalidBounds {
                prev: pair[0].clone(),
                next: pair[1].clone(),
            });
        }
    }
    Ok(())
}

/// Compare two records by their order keys.
pub fn compare_by_key<T: Ordered + ?Sized>(a: &T, b: &T) -> Result<Ordering, OrderError> {
    let (Some(key_a), Some(key_b)) = (a.order_key(), b.order_key()) else {
        return Err(OrderError::MissingField(RecordField::Order));
    };
    compare_keys(key_a, key_b)
}

/// Compare two records by priority (highest first), then by key ascending.
///
/// Within one priority the smallest key sorts first, which is where the most
/// recently prepended record lives.
pub fn compare_by_priority_then_key<T: Ordered + ?Sized>(
    a: &T,
    b: &T,
) -> Result<Ordering, OrderError> {
    let (Some(priority_a), Some(priority_b)) = (a.priority(), b.priority()) else {
        return Err(OrderError::MissingField(RecordField::Priority));
    };
    match priority_b.cmp(&priority_a) {
        Ordering::Equal => compare_by_key(a, b),
        ordering => Ok(ordering),
    }
}

/// Sort records by key, surfacing the first comparator failure.
pub fn sort_by_key<T: Ordered>(records: &mut [T]) -> Result<(), OrderError> {
    sort_with(records, compare_by_key)
}

/// Sort records by priority then key, surfacing the first comparator failure.
pub fn sort_by_priority_then_key<T: Ordered>(records: &mut [T]) -> Result<(), OrderError> {
    sort_with(records, compare_by_priority_then_key)
}

// Fields are checked up front so the comparator seen by `sort_by` is a total
// order; equal keys then compare as equal and are reported once sorted.
fn sort_with<T>(
    records: &mut [T],
    compare: impl Fn(&T, &T) -> Result<Ordering, OrderError>,
) -> Result<(), OrderError> {
    for record in records.iter() {
        compare_single(record, &compare)?;
    }
    records.sort_by(|a, b| compare(a, b).unwrap_or(Ordering::Equal));
    for pair in records.windows(2) {
        compare(&pair[0], &pair[1])?;
    }
    Ok(())
}

fn compare_single<T>(
    record: &T,
    compare: &impl Fn(&T, &T) -> Result<Ordering, OrderError>,
) -> Result<(), OrderError> {
    match compare(record, record) {
        Err(OrderError::DuplicateKey(_)) | Ok(_) => Ok(()),
        Err(err) => Err(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::key;

    struct Item {
        order: Option<OrderKey>,
        urgency: Option<i64>,
    }

    fn item(urgency: i64, order: &str) -> Item {
        Item {
            order: Some(key(order)),
            urgency: Some(urgency),
        }
    }

    impl Ordered for Item {
        fn order_key(&self) -> Option<&OrderKey> {
            self.order.as_ref()
        }

        fn priority(&self) -> Option<i64> {
            self.urgency
        }
    }

    #[test]
    fn test_compare_keys() {
        assert_eq!(compare_keys(&key("a"), &key("b")).unwrap(), Ordering::Less);
        assert_eq!(compare_keys(&key("b"), &key("a")).unwrap(), Ordering::Greater);
        assert_eq!(compare_keys(&key("a"), &key("an")).unwrap(), Ordering::Less);
    }

    #[test]
    fn test_compare_keys_equal_is_duplicate() {
        for k in ["a", "n", "zzn", "bgt"] {
            assert_eq!(
                compare_keys(&key(k), &key(k)),
                Err(OrderError::DuplicateKey(key(k)))
            );
        }
    }

    #[test]
    fn test_check_ascending() {
        assert_eq!(check_ascending(&[]), Ok(()));
        assert_eq!(check_ascending(&[key("d"), key("dn"), key("f")]), Ok(()));
        assert_eq!(
            check_ascending(&[key("d"), key("f"), key("c")]),
            Err(OrderError::InvalidBounds {
                prev: key("f"),
                next: key("c"),
            })
        );
        assert_eq!(
            check_ascending(&[key("a"), key("d"), key("d")]),
            Err(OrderError::DuplicateKey(key("d")))
        );
    }

    #[test]
    fn test_compare_by_key_missing_field() {
        let missing = Item {
            order: None,
            urgency: Some(300),
        };
        assert_eq!(
            compare_by_key(&missing, &item(300, "a")),
            Err(OrderError::MissingField(RecordField::Order))
        );
    }

    #[test]
    fn test_priority_tie_breaks_on_ascending_key() {
        let b = item(300, "b");
        let a = item(300, "a");
        assert_eq!(compare_by_priority_then_key(&b, &a).unwrap(), Ordering::Greater);
        assert_eq!(compare_by_priority_then_key(&a, &b).unwrap(), Ordering::Less);
    }

    #[test]
    fn test_higher_priority_always_first() {
        let urgent = item(500, "zzz");
        let normal = item(300, "a");
        assert_eq!(
            compare_by_priority_then_key(&urgent, &normal).unwrap(),
            Ordering::Less
        );
        assert_eq!(
            compare_by_priority_then_key(&normal, &urgent).unwrap(),
            Ordering::Greater
        );
    }

    #[test]
    fn test_priority_missing_field() {
        let missing = Item {
            order: Some(key("a")),
            urgency: None,
        };
        assert_eq!(
            compare_by_priority_then_key(&item(300, "b"), &missing),
            Err(OrderError::MissingField(RecordField::Priority))
        );
    }

    #[test]
    fn test_priority_equal_keys_is_duplicate() {
        assert_eq!(
            compare_by_priority_then_key(&item(300, "c"), &item(300, "c")),
            Err(OrderError::DuplicateKey(key("c")))
        );
    }

    #[test]
    fn test_sort_by_priority_then_key() {
        let mut items = vec![
            item(300, "b"),
            item(500, "z"),
            item(300, "a"),
            item(500, "c"),
        ];
        sort_by_priority_then_key(&mut items).unwrap();
        let order: Vec<(i64, &str)> = items
            .iter()
            .map(|i| (i.urgency.unwrap(), i.order.as_ref().unwrap().as_str()))
            .collect();
        assert_eq!(order, vec![(500, "c"), (500, "z"), (300, "a"), (300, "b")]);
    }

    #[test]
    fn test_sort_by_key_reports_duplicate() {
        let mut keys = vec![key("d"), key("b"), key("d")];
        assert_eq!(sort_by_key(&mut keys), Err(OrderError::DuplicateKey(key("d"))));
    }

    #[test]
    fn test_sort_single_record_missing_key() {
        let mut items = vec![Item {
            order: None,
            urgency: Some(1),
        }];
        assert_eq!(
            sort_by_key(&mut items),
            Err(OrderError::MissingField(RecordField::Order))
        );
    }
}
