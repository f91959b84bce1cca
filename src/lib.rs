//! flux-induction - intake service for club induction applications
//!
//! Submissions are validated, cast against the collection schema and
//! appended to a checksummed document log. Roll number, phone and email are
//! unique across all records.

pub mod application;
pub mod cli;
pub mod http_server;
pub mod index;
pub mod observability;
pub mod schema;
pub mod storage;
pub mod store;
pub mod validation;
