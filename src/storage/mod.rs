//! Document storage for the applications collection
//!
//! The record file holds the canonical persistent state of all applications.
//! It is append-only: records are never rewritten or removed.
//!
//! # Design Principles
//!
//! - Append-only (no in-place updates)
//! - Checksum-verified on every read
//! - fsync before an insert is acknowledged
//! - Halt-on-corruption: a bad record fails the open, nothing is skipped

mod checksum;
mod errors;
mod reader;
mod record;
mod writer;

pub use checksum::{compute_checksum, verify_checksum};
pub use errors::{ErrorContext, Severity, StorageError, StorageErrorCode, StorageResult};
pub use reader::StorageReader;
pub use record::DocumentRecord;
pub use writer::{AppendTarget, StorageWriter, STORAGE_FILE};
