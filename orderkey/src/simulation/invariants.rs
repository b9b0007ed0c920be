//! Invariant checking for deterministic simulation testing.
//!
//! This module verifies the ordering invariants of a partition after each
//! insertion, helping to detect bugs in key generation.

use crate::record::InsertPlan;
use crate::types::OrderKey;

use super::op_gen::Operation;

/// A recorded operation in the simulation.
#[derive(Debug, Clone)]
pub struct RecordedOperation {
    /// The operation that was applied.
    pub operation: Operation,
    /// Whether an existing record was rewritten.
    pub rewrote: bool,
    /// Longest key produced by the operation.
    pub longest_key: usize,
}

/// Tracks the history of operations.
#[derive(Debug, Default)]
pub struct OperationHistory {
    operations: Vec<RecordedOperation>,
    keys_created: u64,
    rewrites: u64,
    max_key_length: usize,
}

impl OperationHistory {
    /// Create a new empty history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an applied plan.
    pub fn record(&mut self, operation: Operation, plan: &InsertPlan) {
        let rewrote = plan.rewrite.is_some();
        let longest_key = plan
            .new_keys
            .iter()
            .chain(plan.rewrite.as_ref().map(|(_, rewrite)| &rewrite.to))
            .map(OrderKey::len)
            .max()
            .unwrap_or(0);

        self.keys_created += plan.new_keys.len() as u64;
        if rewrote {
            self.rewrites += 1;
        }
        self.max_key_length = self.max_key_length.max(longest_key);
        self.operations.push(RecordedOperation {
            operation,
            rewrote,
            longest_key,
        });
    }

    /// Get the number of operations.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.operations.len()
    }

    /// Check if history is empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// All recorded operations in order.
    #[must_use]
    pub fn operations(&self) -> &[RecordedOperation] {
        &self.operations
    }

    /// Get statistics.
    #[must_use]
    pub const fn stats(&self) -> HistoryStats {
        HistoryStats {
            total_operations: self.operations.len(),
            keys_created: self.keys_created,
            rewrites: self.rewrites,
            max_key_length: self.max_key_length,
        }
    }
}

/// Statistics about the operation history.
#[derive(Debug, Clone)]
pub struct HistoryStats {
    /// Total number of operations.
    pub total_operations: usize,
    /// Number of new keys generated.
    pub keys_created: u64,
    /// Number of existing records rewritten.
    pub rewrites: u64,
    /// Longest key generated.
    pub max_key_length: usize,
}

/// An invariant violation detected during simulation.
#[derive(Debug, Clone)]
pub struct InvariantViolation {
    /// Description of the violation.
    pub description: String,
    /// Operation index where it was detected.
    pub operation_index: usize,
    /// Additional context.
    pub context: String,
}

/// Checker for ordering invariants.
pub struct InvariantChecker {
    violations: Vec<InvariantViolation>,
}

impl Default for InvariantChecker {
    fn default() -> Self {
        Self::new()
    }
}

impl InvariantChecker {
    /// Create a new invariant checker.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            violations: Vec::new(),
        }
    }

    /// Get all violations.
    #[must_use]
    pub fn violations(&self) -> &[InvariantViolation] {
        &self.violations
    }

    /// Check if any violations were detected.
    #[must_use]
    pub const fn has_violations(&self) -> bool {
        !self.violations.is_empty()
    }

    /// Add a violation.
    pub fn add_violation(&mut self, violation: InvariantViolation) {
        self.violations.push(violation);
    }

    fn violation(&mut self, operation_index: usize, description: &str, context: String) {
        self.add_violation(InvariantViolation {
            description: description.to_string(),
            operation_index,
            context,
        });
    }

    /// Keys must be strictly ascending and there must be `expected_len` of them.
    pub fn check_partition(
        &mut self,
        keys: &[OrderKey],
        expected_len: usize,
        operation_index: usize,
    ) {
        if keys.len() != expected_len {
            self.violation(
                operation_index,
                "partition has wrong number of keys",
                format!("expected {expected_len}, found {}", keys.len()),
            );
        }
        if let Some(pair) = keys.windows(2).find(|pair| pair[0] >= pair[1]) {
            self.violation(
                operation_index,
                "keys not strictly ascending",
                format!("'{}' then '{}'", pair[0], pair[1]),
            );
        }
    }

    /// A prepend rewrites at most the first record and lands below the rest.
    ///
    /// `before` is the ascending key list before the operation.
    pub fn check_prepend(
        &mut self,
        before: &[OrderKey],
        first_id: Option<&str>,
        plan: &InsertPlan,
        operation_index: usize,
    ) {
        let untouched = match (&plan.rewrite, before) {
            (Some((id, rewrite)), [first, rest @ ..]) => {
                if Some(id.as_str()) != first_id || &rewrite.from != first {
                    self.violation(
                        operation_index,
                        "prepend rewrote a record other than the first",
                        format!("rewrote '{id}' from '{}'", rewrite.from),
                    );
                }
                if rest.first().is_some_and(|second| rewrite.to >= *second) {
                    self.violation(
                        operation_index,
                        "rewritten key does not stay below the second key",
                        format!("'{}'", rewrite.to),
                    );
                }
                Some(&rewrite.to)
            }
            (Some(_), []) => {
                self.violation(
                    operation_index,
                    "prepend rewrote a record in an empty partition",
                    String::new(),
                );
                None
            }
            (None, [first, _, ..]) => {
                self.violation(
                    operation_index,
                    "prepend before two or more keys did not reclaim room",
                    format!("first key '{first}'"),
                );
                before.first()
            }
            (None, _) => before.first(),
        };

        if let (Some(last_new), Some(bound)) = (plan.new_keys.last(), untouched)
            && last_new >= bound
        {
            self.violation(
                operation_index,
                "prepended key does not sort before existing records",
                format!("'{last_new}' vs '{bound}'"),
            );
        }
    }

    /// An append never rewrites and lands above the current last key.
    pub fn check_append(
        &mut self,
        last: Option<&OrderKey>,
        plan: &InsertPlan,
        operation_index: usize,
    ) {
        if plan.rewrite.is_some() {
            self.violation(operation_index, "append rewrote a record", String::new());
        }
        if let (Some(last), Some(first_new)) = (last, plan.new_keys.first())
            && first_new <= last
        {
            self.violation(
                operation_index,
                "appended key does not sort after existing records",
                format!("'{first_new}' vs '{last}'"),
            );
        }
    }

    /// A between insert lands strictly between its neighbours.
    pub fn check_between(
        &mut self,
        prev: &OrderKey,
        next: &OrderKey,
        key: &OrderKey,
        operation_index: usize,
    ) {
        if !(prev < key && key < next) {
            self.violation(
                operation_index,
                "midpoint not strictly between its bounds",
                format!("'{prev}' < '{key}' < '{next}'"),
            );
        }
    }
}
