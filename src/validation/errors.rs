//! Field-keyed error sets
//!
//! The same shape is produced by submission validation, schema casting in the
//! store, and duplicate-key translation, so callers see one error contract.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::application::Field;

/// A mapping from field to a human-readable message.
///
/// At most one message per field; iteration follows [`Field`] order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<Field, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a message for a field. The first message for a field wins.
    pub fn add(&mut self, field: Field, message: impl Into<String>) {
        self.0.entry(field).or_insert_with(|| message.into());
    }

    /// Builds the conflict error set for colliding natural keys.
    pub fn duplicates(fields: &[Field]) -> Self {
        let mut errors = Self::new();
        for field in fields {
            errors.add(*field, format!("{} already exists", field));
        }
        errors
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: Field) -> bool {
        self.0.contains_key(&field)
    }

    pub fn fields(&self) -> impl Iterator<Item = Field> + '_ {
        self.0.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Comma-separated field names, for log lines.
    pub fn field_list(&self) -> String {
        self.fields()
            .map(|f| f.as_str())
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in &self.0 {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", field, message)?;
            first = false;
        }
        Ok(())
    }
}
