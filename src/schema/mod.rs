//! Store-side schema for the applications collection
//!
//! Schemas are enforced at write time, independently of submission
//! validation, so the store is safe to call with raw documents.
//!
//! # Design Principles
//!
//! - Mandatory on all inserts
//! - Strict: undeclared keys are dropped, never stored
//! - Normalization (trim, lower-case) before constraint checks
//! - Deterministic validation

mod types;
mod validator;

pub use types::{CustomRule, FieldDef, LengthRule, Schema};
pub use validator::SchemaValidator;
