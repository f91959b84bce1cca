//! Induction application record types
//!
//! An application is the only entity in the system. It is created once by a
//! successful insert and never updated or deleted.
//!
//! Natural keys (`rollNo`, `phone`, `email`) are unique across all records.

mod field;

pub use field::Field;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A validated, normalized submission ready to be inserted.
///
/// Values are trimmed and `email` is lower-cased.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewApplication {
    pub name: String,
    pub branch: String,
    pub year: String,
    pub roll_no: String,
    pub phone: String,
    pub email: String,
}

impl NewApplication {
    /// Returns the value stored for a field.
    pub fn value(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::RollNo => &self.roll_no,
            Field::Branch => &self.branch,
            Field::Year => &self.year,
            Field::Phone => &self.phone,
            Field::Email => &self.email,
        }
    }
}

/// A persisted application as stored in the document log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    /// Store-assigned identifier
    pub id: String,
    pub name: String,
    pub branch: String,
    pub year: String,
    pub roll_no: String,
    pub phone: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Application {
    /// Stamps a new application with its identifier and timestamps.
    pub fn from_new(id: impl Into<String>, fields: NewApplication, now: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            name: fields.name,
            branch: fields.branch,
            year: fields.year,
            roll_no: fields.roll_no,
            phone: fields.phone,
            email: fields.email,
            created_at: now,
            updated_at: now,
        }
    }

    /// Returns the value stored for a field.
    pub fn value(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::RollNo => &self.roll_no,
            Field::Branch => &self.branch,
            Field::Year => &self.year,
            Field::Phone => &self.phone,
            Field::Email => &self.email,
        }
    }
}
