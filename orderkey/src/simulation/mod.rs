//! Deterministic Simulation Testing (DST) infrastructure.
//!
//! This module exercises the key engine with:
//! - Reproducible random operation sequences
//! - An in-memory partition standing in for the document store
//! - Invariant checking after each operation
//!
//! # Design Principles
//!
//! 1. All randomness is seeded for reproducibility
//! 2. Given the same seed, execution is identical
//! 3. Every operation is checked, not just the final state
//!
//! # Usage
//!
//! ```
//! use orderkey::simulation::{Simulator, SimulatorConfig};
//!
//! let mut sim = Simulator::new(SimulatorConfig::new(12345));
//! let result = sim.run(200);
//!
//! assert!(result.invariant_violations.is_empty());
//! ```

mod invariants;
mod op_gen;
mod simulator;

pub use invariants::{
    HistoryStats, InvariantChecker, InvariantViolation, OperationHistory, RecordedOperation,
};
pub use op_gen::{Operation, OperationGenConfig, OperationGenerator};
pub use simulator::{SimulationResult, Simulator, SimulatorConfig};
