//! Operation generator for deterministic simulation testing.
//!
//! This module generates random but reproducible sequences of insertions
//! against one partition. The mix is skewed toward the front of the list,
//! which is the worst case for key growth.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Configuration for operation generation.
#[derive(Debug, Clone)]
pub struct OperationGenConfig {
    /// Probability of a prepend batch (0.0 - 1.0).
    pub prepend_rate: f64,
    /// Probability of an append batch (0.0 - 1.0).
    /// Whatever remains after prepends and appends is a between insert.
    pub append_rate: f64,
    /// Maximum number of keys per batch.
    pub max_batch_size: usize,
}

impl Default for OperationGenConfig {
    fn default() -> Self {
        Self {
            prepend_rate: 0.5,
            append_rate: 0.2,
            max_batch_size: 5,
        }
    }
}

/// One insertion against the simulated partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Add `count` records at the front.
    Prepend { count: usize },
    /// Add `count` records at the back.
    Append { count: usize },
    /// Add one record between the records at `index` and `index + 1`.
    InsertBetween { index: usize },
}

/// Generator for random operations.
///
/// Produces the same sequence for the same seed.
pub struct OperationGenerator {
    rng: StdRng,
    config: OperationGenConfig,
}

impl OperationGenerator {
    /// Create a new generator with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self::with_config(seed, OperationGenConfig::default())
    }

    /// Create a new generator with custom configuration.
    #[must_use]
    pub fn with_config(seed: u64, config: OperationGenConfig) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            config,
        }
    }

    /// Get the configuration.
    #[must_use]
    pub const fn config(&self) -> &OperationGenConfig {
        &self.config
    }

    /// Generate the next operation for a partition of `len` records.
    ///
    /// Between inserts need two neighbours, so short partitions only get
    /// batches at either end.
    pub fn next_operation(&mut self, len: usize) -> Operation {
        let roll = self.rng.random::<f64>();
        let count = self.rng.random_range(1..=self.config.max_batch_size.max(1));

        if roll < self.config.prepend_rate {
            Operation::Prepend { count }
        } else if roll < self.config.prepend_rate + self.config.append_rate || len < 2 {
            Operation::Append { count }
        } else {
            Operation::InsertBetween {
                index: self.rng.random_range(0..len - 1),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = OperationGenerator::new(7);
        let mut b = OperationGenerator::new(7);
        for len in 0..100 {
            assert_eq!(a.next_operation(len), b.next_operation(len));
        }
    }

    #[test]
    fn test_between_only_with_neighbours() {
        let config = OperationGenConfig {
            prepend_rate: 0.0,
            append_rate: 0.0,
            max_batch_size: 3,
        };
        let mut generator = OperationGenerator::with_config(1, config);
        assert!(matches!(
            generator.next_operation(1),
            Operation::Append { .. }
        ));
        for _ in 0..50 {
            match generator.next_operation(4) {
                Operation::InsertBetween { index } => assert!(index < 3),
                other => panic!("unexpected operation {other:?}"),
            }
        }
    }

    #[test]
    fn test_batch_size_bounds() {
        let mut generator = OperationGenerator::new(99);
        for _ in 0..200 {
            match generator.next_operation(10) {
                Operation::Prepend { count } | Operation::Append { count } => {
                    assert!((1..=5).contains(&count));
                }
                Operation::InsertBetween { .. } => {}
            }
        }
    }
}
