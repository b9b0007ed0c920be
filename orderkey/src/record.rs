//! Ordered records and the partitions that hold them.
//!
//! A partition is every record sharing one partition id (one bookmark
//! category, say). Within it, order keys are unique and totally ordered.
//! [`Partition`] loads a snapshot of those records, enforces the invariant,
//! and plans insertions as an [`InsertPlan`] the storage layer applies in a
//! single transaction.
//!
//! # Invariants
//!
//! - Every record in a `Partition` has the partition's id and an order key.
//! - Records are sorted ascending by key and no two keys are equal.

use serde::{Deserialize, Serialize};

use crate::batch::{KeyRewrite, append_back, prepend_front};
use crate::compare::{Ordered, sort_by_key};
use crate::error::{OrderError, RecordField};
use crate::types::OrderKey;

/// Priority given to records created by the bot.
pub const DEFAULT_URGENCY: i64 = 300;

/// The ordering-relevant part of a stored record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    /// Document id in the external store.
    pub id: String,
    /// Partition the record belongs to.
    pub partition: String,
    /// Display order within the partition.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<OrderKey>,
    /// Primary sort priority, highest first.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub urgency: Option<i64>,
}

impl Record {
    /// A new record at the default urgency.
    #[must_use]
    pub fn new(id: impl Into<String>, partition: impl Into<String>, order: OrderKey) -> Self {
        Self {
            id: id.into(),
            partition: partition.into(),
            order: Some(order),
            urgency: Some(DEFAULT_URGENCY),
        }
    }
}

impl Ordered for Record {
    fn order_key(&self) -> Option<&OrderKey> {
        self.order.as_ref()
    }

    fn priority(&self) -> Option<i64> {
        self.urgency
    }
}

/// Error returned when loading a partition fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PartitionError {
    /// A record belongs to a different partition.
    ForeignRecord { id: String, partition: String },
    /// A planned rewrite no longer matches the record it targets.
    StaleRewrite { id: String },
    /// The number of ids does not match the number of planned keys.
    IdCountMismatch { expected: usize, actual: usize },
    /// The records violate the ordering invariant.
    Order(OrderError),
}

impl std::fmt::Display for PartitionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ForeignRecord { id, partition } => {
                write!(f, "record '{id}' belongs to partition '{partition}'")
            }
            Self::StaleRewrite { id } => {
                write!(f, "record '{id}' changed since the insertion was planned")
            }
            Self::IdCountMismatch { expected, actual } => {
                write!(f, "expected {expected} new record ids, got {actual}")
            }
            Self::Order(e) => write!(f, "order error: {e}"),
        }
    }
}

impl std::error::Error for PartitionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ForeignRecord { .. }
            | Self::StaleRewrite { .. }
            | Self::IdCountMismatch { .. } => None,
            Self::Order(e) => Some(e),
        }
    }
}

impl From<OrderError> for PartitionError {
    fn from(e: OrderError) -> Self {
        Self::Order(e)
    }
}

/// Changes to apply to a partition for one batch insertion.
///
/// The storage layer must apply `rewrite` and create the new records in one
/// transaction, conditional on the rewritten record still holding
/// `rewrite.1.from`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertPlan {
    /// Id and key change of the one existing record that moves, if any.
    pub rewrite: Option<(String, KeyRewrite)>,
    /// Keys for the new records, ascending, in creation order.
    pub new_keys: Vec<OrderKey>,
}

/// A validated, sorted snapshot of one partition.
#[derive(Debug, Clone)]
pub struct Partition {
    id: String,
    records: Vec<Record>,
}

impl Partition {
    /// Validate and sort the records of one partition.
    ///
    /// # Errors
    ///
    /// Returns an error if a record belongs to another partition, lacks an
    /// order key, or shares its key with another record.
    pub fn from_records(
        id: impl Into<String>,
        mut records: Vec<Record>,
    ) -> Result<Self, PartitionError> {
        let id = id.into();
        if let Some(foreign) = records.iter().find(|r| r.partition != id) {
            return Err(PartitionError::ForeignRecord {
                id: foreign.id.clone(),
                partition: foreign.partition.clone(),
            });
        }
        if records.iter().any(|r| r.order.is_none()) {
            return Err(OrderError::MissingField(RecordField::Order).into());
        }
        sort_by_key(&mut records)?;
        Ok(Self { id, records })
    }

    /// A partition with no records yet.
    #[must_use]
    pub fn empty(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            records: Vec::new(),
        }
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Records in ascending key order.
    #[must_use]
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Keys in ascending order.
    #[must_use]
    pub fn keys(&self) -> Vec<OrderKey> {
        self.records
            .iter()
            .filter_map(|r| r.order.clone())
            .collect()
    }

    /// Plan `count` new records at the front of the partition.
    pub fn plan_prepend(&self, count: usize) -> Result<InsertPlan, OrderError> {
        let head: Vec<OrderKey> = self
            .records
            .iter()
            .take(2)
            .filter_map(|r| r.order.clone())
            .collect();
        let prepended = prepend_front(count, &head)?;
        let rewrite = prepended.rewritten.map(|rewrite| {
            // The rewritten key is always the first record's.
            let id = self.records.first().map(|r| r.id.clone()).unwrap_or_default();
            tracing::debug!(
                partition = %self.id,
                record = %id,
                from = %rewrite.from,
                to = %rewrite.to,
                "planned rewrite of first record"
            );
            (id, rewrite)
        });
        Ok(InsertPlan {
            rewrite,
            new_keys: prepended.new_keys,
        })
    }

    /// Plan `count` new records at the back of the partition.
    pub fn plan_append(&self, count: usize) -> Result<InsertPlan, OrderError> {
        let tail: Vec<OrderKey> = self
            .records
            .last()
            .and_then(|r| r.order.clone())
            .into_iter()
            .collect();
        Ok(InsertPlan {
            rewrite: None,
            new_keys: append_back(count, &tail)?,
        })
    }

    /// Apply a plan to this snapshot, creating records with the given ids.
    ///
    /// Mirrors what the storage layer persists. On error the snapshot is left
    /// unchanged.
    pub fn apply(&mut self, plan: InsertPlan, new_ids: &[String]) -> Result<(), PartitionError> {
        if new_ids.len() != plan.new_keys.len() {
            return Err(PartitionError::IdCountMismatch {
                expected: plan.new_keys.len(),
                actual: new_ids.len(),
            });
        }
        let mut records = self.records.clone();
        if let Some((id, rewrite)) = plan.rewrite {
            let record = records
                .iter_mut()
                .find(|r| r.id == id && r.order.as_ref() == Some(&rewrite.from))
                .ok_or_else(|| PartitionError::StaleRewrite { id: id.clone() })?;
            record.order = Some(rewrite.to);
        }
        for (key, id) in plan.new_keys.into_iter().zip(new_ids) {
            records.push(Record::new(id.clone(), self.id.clone(), key));
        }
        sort_by_key(&mut records)?;
        self.records = records;
        Ok(())
    }
}
