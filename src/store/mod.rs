//! Application store
//!
//! The persistence abstraction over the document log and its unique indexes.
//! Safe to call directly with raw documents: it applies its own schema and
//! enforces uniqueness of `rollNo`, `phone` and `email`.
//!
//! Duplicate inserts fail with a structured [`StoreError::DuplicateKey`]
//! naming every colliding field.

mod collection;
mod errors;
mod handle;
mod location;
mod log;

pub use collection::{verify_records, ApplicationStore};
pub use errors::{StoreError, StoreResult};
pub use handle::StoreHandle;
pub use location::StoreLocation;
pub use log::{DocumentLog, FileLog, MemoryLog};
