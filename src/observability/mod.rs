//! Observability for the intake service
//!
//! Structured JSON logging only. Logging is read-only with respect to request
//! handling: a failed log write never changes a response.
//!
//! # Usage
//!
//! ```ignore
//! use flux_induction::observability::Logger;
//!
//! Logger::info("APPLICATION_ACCEPTED", &[("id", &id)]);
//! ```

mod logger;

pub use logger::{Logger, Severity};
