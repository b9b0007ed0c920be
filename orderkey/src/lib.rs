// Life of a bookmark insertion:
// 1. The bot picks up a reaction and extracts the links to save
// 2. The caller loads the target partition (one category) from the store
// 3. The engine plans keys:
//     - Prepend: reclaim room below the first record, rewriting only it
//     - Append: step past the last record
// 4. The caller writes the rewrite and the new records in one transaction
//
// System components:
//  - Key space and midpoint generator (pure)
//  - Comparators and batch insertion (pure)
//  - Partition planning over stored records
//  - HTTP service exposing the above to the bot backend

pub mod batch;
pub mod compare;
pub mod config;
pub mod error;
pub mod keyspace;
pub mod midpoint;
pub mod record;
pub mod service;
pub mod simulation;
#[cfg(test)]
mod testing;
pub mod types;

pub use batch::{KeyRewrite, Prepended, append_back, prepend_front};
pub use compare::{
    Ordered, check_ascending, compare_by_key, compare_by_priority_then_key, compare_keys,
    sort_by_key, sort_by_priority_then_key,
};
pub use error::{OrderError, RecordField};
pub use midpoint::midpoint;
pub use record::{DEFAULT_URGENCY, InsertPlan, Partition, PartitionError, Record};
pub use types::OrderKey;
