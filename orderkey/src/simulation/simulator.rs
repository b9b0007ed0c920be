//! Main simulator harness for deterministic simulation testing.
//!
//! This module ties together the operation generator, an in-memory
//! partition, and the invariant checker.

use crate::midpoint::midpoint;
use crate::record::{InsertPlan, Partition};
use crate::types::OrderKey;

use super::invariants::{InvariantChecker, InvariantViolation, OperationHistory};
use super::op_gen::{Operation, OperationGenConfig, OperationGenerator};

/// Configuration for the simulator.
#[derive(Debug, Clone)]
pub struct SimulatorConfig {
    /// Random seed for reproducibility.
    pub seed: u64,
    /// Operation generation configuration.
    pub operation_config: OperationGenConfig,
}

impl SimulatorConfig {
    /// Create a new simulator config with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            operation_config: OperationGenConfig::default(),
        }
    }

    /// Set the operation configuration.
    #[must_use]
    pub const fn with_operation_config(mut self, config: OperationGenConfig) -> Self {
        self.operation_config = config;
        self
    }

    /// Only ever prepend, the worst case for key growth.
    #[must_use]
    pub const fn prepend_only(mut self) -> Self {
        self.operation_config.prepend_rate = 1.0;
        self.operation_config.append_rate = 0.0;
        self
    }
}

/// Results from a simulation run.
#[derive(Debug)]
pub struct SimulationResult {
    /// The seed used for this simulation.
    pub seed: u64,
    /// Number of operations applied.
    pub operations_processed: u64,
    /// Number of records in the partition at the end.
    pub final_len: usize,
    /// Number of existing records rewritten across the run.
    pub rewrites: u64,
    /// Longest key generated.
    pub max_key_length: usize,
    /// Invariant violations detected.
    pub invariant_violations: Vec<InvariantViolation>,
}

impl SimulationResult {
    /// Check if the simulation passed (no invariant violations).
    #[must_use]
    pub const fn passed(&self) -> bool {
        self.invariant_violations.is_empty()
    }
}

/// The main simulator harness.
pub struct Simulator {
    config: SimulatorConfig,
    generator: OperationGenerator,
    history: OperationHistory,
    checker: InvariantChecker,
    partition: Partition,
    next_record_id: u64,
}

impl Simulator {
    const PARTITION_ID: &'static str = "simulated";

    /// Create a new simulator with the given configuration.
    #[must_use]
    pub fn new(config: SimulatorConfig) -> Self {
        let generator =
            OperationGenerator::with_config(config.seed, config.operation_config.clone());
        Self {
            config,
            generator,
            history: OperationHistory::new(),
            checker: InvariantChecker::new(),
            partition: Partition::empty(Self::PARTITION_ID),
            next_record_id: 0,
        }
    }

    /// Run the simulation for a given number of operations.
    ///
    /// Invariants are checked after every operation. An engine error on a
    /// valid partition is itself a violation; the run stops there because
    /// the partition can no longer be trusted.
    pub fn run(&mut self, operation_count: usize) -> SimulationResult {
        for _ in 0..operation_count {
            let operation = self.generator.next_operation(self.partition.len());
            if let Err(message) = self.step(operation) {
                self.checker.add_violation(InvariantViolation {
                    description: "engine error on valid partition".to_string(),
                    operation_index: self.history.len(),
                    context: message,
                });
                break;
            }
        }

        let stats = self.history.stats();
        SimulationResult {
            seed: self.config.seed,
            operations_processed: stats.total_operations as u64,
            final_len: self.partition.len(),
            rewrites: stats.rewrites,
            max_key_length: stats.max_key_length,
            invariant_violations: self.checker.violations().to_vec(),
        }
    }

    fn step(&mut self, operation: Operation) -> Result<(), String> {
        let index = self.history.len();
        let before = self.partition.keys();

        let plan = match operation {
            Operation::Prepend { count } => {
                let plan = self.partition.plan_prepend(count).map_err(|e| e.to_string())?;
                let first_id = self.partition.records().first().map(|r| r.id.as_str());
                self.checker.check_prepend(&before, first_id, &plan, index);
                plan
            }
            Operation::Append { count } => {
                let plan = self.partition.plan_append(count).map_err(|e| e.to_string())?;
                self.checker.check_append(before.last(), &plan, index);
                plan
            }
            Operation::InsertBetween { index: at } => {
                let (prev, next) = (&before[at], &before[at + 1]);
                let key = midpoint(Some(prev), Some(next)).map_err(|e| e.to_string())?;
                self.checker.check_between(prev, next, &key, index);
                InsertPlan {
                    rewrite: None,
                    new_keys: vec![key],
                }
            }
        };

        let ids = self.fresh_ids(plan.new_keys.len());
        let expected_len = before.len() + ids.len();
        self.history.record(operation, &plan);
        self.partition.apply(plan, &ids).map_err(|e| e.to_string())?;
        self.checker
            .check_partition(&self.partition.keys(), expected_len, index);
        Ok(())
    }

    fn fresh_ids(&mut self, count: usize) -> Vec<String> {
        (0..count)
            .map(|_| {
                self.next_record_id += 1;
                format!("r{}", self.next_record_id)
            })
            .collect()
    }

    /// Keys currently in the simulated partition, ascending.
    #[must_use]
    pub fn keys(&self) -> Vec<OrderKey> {
        self.partition.keys()
    }

    /// Get the operation history.
    #[must_use]
    pub const fn history(&self) -> &OperationHistory {
        &self.history
    }

    /// Get the invariant checker.
    #[must_use]
    pub const fn checker(&self) -> &InvariantChecker {
        &self.checker
    }
}
