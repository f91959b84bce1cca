//! BTreeMap-based unique index
//!
//! Maps a normalized field value to the id of the single record holding it.

use std::collections::BTreeMap;

use crate::application::Field;

/// A unique index over one field.
#[derive(Debug)]
pub struct UniqueIndex {
    field: Field,
    tree: BTreeMap<String, String>,
}

impl UniqueIndex {
    pub fn new(field: Field) -> Self {
        Self {
            field,
            tree: BTreeMap::new(),
        }
    }

    pub fn field(&self) -> Field {
        self.field
    }

    /// Returns the id of the record holding `value`, if any.
    pub fn lookup(&self, value: &str) -> Option<&str> {
        self.tree.get(value).map(String::as_str)
    }

    pub fn contains(&self, value: &str) -> bool {
        self.tree.contains_key(value)
    }

    /// Claims `value` for `document_id`.
    ///
    /// Returns `false` and leaves the index unchanged if the value is taken.
    pub fn insert(&mut self, value: &str, document_id: &str) -> bool {
        if self.tree.contains_key(value) {
            return false;
        }
        self.tree.insert(value.to_string(), document_id.to_string());
        true
    }

    pub fn len(&self) -> usize {
        self.tree.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    pub fn clear(&mut self) {
        self.tree.clear();
    }
}
