//! Index Manager
//!
//! Maintains the primary key index and one unique index per natural key.
//! Indexes are derived, in-memory state rebuilt from the record file when a
//! store opens.
//!
//! # API
//!
//! - `conflicts(app)` - Natural keys of `app` already taken
//! - `apply_insert(app)` - Update indexes after the record is durable
//! - `rebuild(records)` - Rebuild from stored records
//! - `lookup(field, value)` - Exact match lookup

use std::collections::BTreeMap;

use thiserror::Error;

use super::unique::UniqueIndex;
use crate::application::{Application, Field};

/// Index errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IndexError {
    /// Two stored records share a natural key
    #[error("duplicate {field} '{value}' held by {existing} and {duplicate}")]
    Duplicate {
        field: Field,
        value: String,
        existing: String,
        duplicate: String,
    },

    /// Two stored records share an id
    #[error("duplicate document id '{0}'")]
    DuplicateId(String),
}

/// Result type for index operations
pub type IndexResult<T> = Result<T, IndexError>;

/// Index Manager for the applications collection
#[derive(Debug)]
pub struct IndexManager {
    /// Primary key index (id -> position in load order)
    pk_index: BTreeMap<String, usize>,
    /// Unique indexes, one per natural key
    unique: Vec<UniqueIndex>,
}

impl IndexManager {
    pub fn new() -> Self {
        Self {
            pk_index: BTreeMap::new(),
            unique: Field::UNIQUE.into_iter().map(UniqueIndex::new).collect(),
        }
    }

    /// Rebuilds all indexes from stored records, in file order.
    ///
    /// Any duplicate means the file violates the uniqueness invariant and the
    /// rebuild fails.
    pub fn rebuild<'a, I>(&mut self, records: I) -> IndexResult<()>
    where
        I: IntoIterator<Item = &'a Application>,
    {
        self.clear();
        for app in records {
            if self.pk_index.contains_key(&app.id) {
                return Err(IndexError::DuplicateId(app.id.clone()));
            }
            if let Some(field) = self.conflicts(app).first().copied() {
                let value = app.value(field).to_string();
                let existing = self.lookup(field, &value).unwrap_or_default().to_string();
                return Err(IndexError::Duplicate {
                    field,
                    value,
                    existing,
                    duplicate: app.id.clone(),
                });
            }
            self.apply_insert(app);
        }
        Ok(())
    }

    /// Returns every natural key of `app` already held by another record,
    /// in field order.
    pub fn conflicts(&self, app: &Application) -> Vec<Field> {
        self.unique
            .iter()
            .filter(|index| index.contains(app.value(index.field())))
            .map(UniqueIndex::field)
            .collect()
    }

    /// Indexes a record. Called only after the record is durable and
    /// `conflicts` returned nothing.
    pub fn apply_insert(&mut self, app: &Application) {
        let position = self.pk_index.len();
        self.pk_index.insert(app.id.clone(), position);
        for index in &mut self.unique {
            let value = app.value(index.field()).to_string();
            index.insert(&value, &app.id);
        }
    }

    /// Exact match lookup on a unique field.
    pub fn lookup(&self, field: Field, value: &str) -> Option<&str> {
        self.unique
            .iter()
            .find(|index| index.field() == field)
            .and_then(|index| index.lookup(value))
    }

    /// Position of a record in load order.
    pub fn position(&self, id: &str) -> Option<usize> {
        self.pk_index.get(id).copied()
    }

    pub fn len(&self) -> usize {
        self.pk_index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pk_index.is_empty()
    }

    fn clear(&mut self) {
        self.pk_index.clear();
        for index in &mut self.unique {
            index.clear();
        }
    }
}

impl Default for IndexManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::NewApplication;
    use chrono::Utc;

    fn app(id: &str, roll: &str, phone: &str, email: &str) -> Application {
        Application::from_new(
            id,
            NewApplication {
                name: "A".into(),
                branch: "CS".into(),
                year: "2".into(),
                roll_no: roll.into(),
                phone: phone.into(),
                email: email.into(),
            },
            Utc::now(),
        )
    }

    #[test]
    fn test_conflicts_report_every_colliding_field() {
        let mut manager = IndexManager::new();
        manager.apply_insert(&app("1", "1111111111", "9876543210", "a@b.com"));

        let candidate = app("2", "1111111111", "0000000000", "a@b.com");
        assert_eq!(manager.conflicts(&candidate), vec![Field::RollNo, Field::Email]);

        let fresh = app("3", "2222222222", "1234567", "c@d.com");
        assert!(manager.conflicts(&fresh).is_empty());
    }

    #[test]
    fn test_lookup_and_position() {
        let mut manager = IndexManager::new();
        manager.apply_insert(&app("x", "1111111111", "9876543210", "a@b.com"));
        manager.apply_insert(&app("y", "2222222222", "9876543211", "b@b.com"));

        assert_eq!(manager.lookup(Field::Phone, "9876543211"), Some("y"));
        assert_eq!(manager.position("y"), Some(1));
        assert_eq!(manager.lookup(Field::Name, "A"), None);
        assert_eq!(manager.len(), 2);
    }

    #[test]
    fn test_rebuild_rejects_duplicate_natural_key() {
        let records = vec![
            app("1", "1111111111", "9876543210", "a@b.com"),
            app("2", "2222222222", "9876543210", "b@b.com"),
        ];
        let mut manager = IndexManager::new();
        let err = manager.rebuild(&records).unwrap_err();
        assert_eq!(
            err,
            IndexError::Duplicate {
                field: Field::Phone,
                value: "9876543210".into(),
                existing: "1".into(),
                duplicate: "2".into(),
            }
        );
    }

    #[test]
    fn test_rebuild_replaces_previous_state() {
        let mut manager = IndexManager::new();
        manager.apply_insert(&app("old", "9999999999", "9876543219", "old@b.com"));

        let records = vec![app("1", "1111111111", "9876543210", "a@b.com")];
        manager.rebuild(&records).unwrap();

        assert_eq!(manager.len(), 1);
        assert!(manager.lookup(Field::RollNo, "9999999999").is_none());
    }
}
