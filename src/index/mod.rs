//! Index Manager subsystem
//!
//! Indexes are derived, in-memory-only state rebuilt from storage when the
//! store opens.
//!
//! # Invariants
//!
//! - Indexes mirror the record file, never the source of truth
//! - Updates occur AFTER the record is durable
//! - A natural key maps to at most one record

mod manager;
mod unique;

pub use manager::{IndexError, IndexManager, IndexResult};
pub use unique::UniqueIndex;
