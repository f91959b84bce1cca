//! Schema validator for documents entering the store
//!
//! This is the store's own line of defense and does not rely on submission
//! validation having run. Casting semantics:
//! - Undeclared keys are dropped (strict projection), never an error
//! - Every declared field is required and must be a string
//! - Values are normalized (trim, lower-case) before constraints run
//! - Each failing field reports exactly one message
//!
//! Validator does not mutate the input document.

use std::collections::BTreeMap;

use serde_json::Value;

use super::types::{FieldDef, LengthRule, Schema};
use crate::application::{Field, NewApplication};
use crate::validation::FieldErrors;

/// Casts raw documents into normalized applications.
pub struct SchemaValidator<'a> {
    schema: &'a Schema,
}

impl<'a> SchemaValidator<'a> {
    pub fn new(schema: &'a Schema) -> Self {
        Self { schema }
    }

    /// Projects, normalizes and validates a document.
    ///
    /// # Errors
    ///
    /// Returns every failing field with its message.
    pub fn cast(&self, document: &Value) -> Result<NewApplication, FieldErrors> {
        let mut errors = FieldErrors::new();
        let mut values: BTreeMap<Field, String> = BTreeMap::new();

        for def in &self.schema.fields {
            let raw = document.get(def.field.as_str());
            match cast_field(def, raw) {
                Ok(value) => {
                    values.insert(def.field, value);
                }
                Err(message) => errors.add(def.field, message),
            }
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        let mut take = |field: Field| -> Result<String, FieldErrors> {
            values.remove(&field).ok_or_else(|| {
                let mut missing = FieldErrors::new();
                missing.add(field, format!("{} is required", field));
                missing
            })
        };

        Ok(NewApplication {
            name: take(Field::Name)?,
            branch: take(Field::Branch)?,
            year: take(Field::Year)?,
            roll_no: take(Field::RollNo)?,
            phone: take(Field::Phone)?,
            email: take(Field::Email)?,
        })
    }
}

/// Normalizes and checks one field value.
fn cast_field(def: &FieldDef, raw: Option<&Value>) -> Result<String, String> {
    let field = def.field;

    let text = match raw {
        None | Some(Value::Null) => return Err(format!("{} is required", field)),
        Some(Value::String(s)) => s,
        Some(_) => return Err(format!("{} must be a string", field)),
    };

    let mut value = if def.trim {
        text.trim().to_string()
    } else {
        text.clone()
    };
    if def.lowercase {
        value = value.to_lowercase();
    }

    if value.is_empty() {
        return Err(format!("{} is required", field));
    }

    if let Some(length) = def.length {
        if !length.allows(value.chars().count()) {
            // A custom rule without a pattern owns the length message.
            if let Some(custom) = def.custom.as_ref().filter(|c| c.pattern.is_none()) {
                return Err(custom.message.to_string());
            }
            return Err(length_message(field, length));
        }
    }

    if let Some(custom) = &def.custom {
        if let Some(pattern) = custom.pattern {
            if !pattern.is_match(&value) {
                return Err(custom.message.to_string());
            }
        }
    }

    Ok(value)
}

fn length_message(field: Field, length: LengthRule) -> String {
    match length {
        LengthRule::Between(min, max) => {
            format!("{} must be between {} and {} characters", field, min, max)
        }
        LengthRule::Exactly(n) => format!("{} must be exactly {} characters", field, n),
    }
}
