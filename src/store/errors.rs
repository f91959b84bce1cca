//! # Store Errors

use thiserror::Error;

use crate::application::Field;
use crate::index::IndexError;
use crate::storage::StorageError;
use crate::validation::FieldErrors;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Store errors
#[derive(Debug, Error)]
pub enum StoreError {
    // ==================
    // Caller errors
    // ==================
    /// Document failed schema casting
    #[error("validation failed: {0}")]
    Validation(FieldErrors),

    /// Natural keys already taken, in field order
    #[error("duplicate key: {}", join_fields(.0))]
    DuplicateKey(Vec<Field>),

    // ==================
    // Connection errors
    // ==================
    /// Unusable database URL
    #[error("invalid database url '{url}': {reason}")]
    InvalidLocation { url: String, reason: String },

    /// No store has been connected yet
    #[error("store is not connected")]
    NotConnected,

    // ==================
    // Unexpected errors
    // ==================
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("index rebuild failed: {0}")]
    Index(#[from] IndexError),

    #[error("document encoding failed: {0}")]
    Encode(#[from] serde_json::Error),

    /// A writer panicked while holding the store lock
    #[error("store lock poisoned")]
    Poisoned,
}

impl StoreError {
    pub fn invalid_location(url: impl Into<String>, reason: impl Into<String>) -> Self {
        StoreError::InvalidLocation {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// Returns whether the caller can fix the problem by changing the input.
    pub fn is_caller_error(&self) -> bool {
        matches!(self, StoreError::Validation(_) | StoreError::DuplicateKey(_))
    }

    /// Returns whether the persisted records cannot be trusted.
    pub fn is_fatal(&self) -> bool {
        match self {
            StoreError::Storage(e) => e.is_fatal(),
            StoreError::Index(_) => true,
            _ => false,
        }
    }

    /// Field-keyed view of caller errors; `None` for everything else.
    pub fn field_errors(&self) -> Option<FieldErrors> {
        match self {
            StoreError::Validation(errors) => Some(errors.clone()),
            StoreError::DuplicateKey(fields) => Some(FieldErrors::duplicates(fields)),
            _ => None,
        }
    }
}

fn join_fields(fields: &[Field]) -> String {
    fields
        .iter()
        .map(|f| f.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
