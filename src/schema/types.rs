//! Schema type definitions for the applications collection
//!
//! Every field of the collection is a required string. A field definition
//! describes how the raw value is normalized (trim, lower-case) and which
//! constraints the normalized value must satisfy.

use regex::Regex;

use crate::application::Field;
use crate::validation::{EMAIL_PATTERN, PHONE_PATTERN};

/// Length constraint on a normalized string, counted in characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthRule {
    /// Inclusive range
    Between(usize, usize),
    /// Exact length
    Exactly(usize),
}

impl LengthRule {
    pub fn allows(&self, len: usize) -> bool {
        match *self {
            LengthRule::Between(min, max) => (min..=max).contains(&len),
            LengthRule::Exactly(n) => len == n,
        }
    }
}

/// Custom validator attached to a field, with the message reported on failure.
#[derive(Debug, Clone)]
pub struct CustomRule {
    pub pattern: Option<&'static Regex>,
    pub message: &'static str,
}

/// Field definition.
#[derive(Debug, Clone)]
pub struct FieldDef {
    pub field: Field,
    /// Strip surrounding whitespace before validation
    pub trim: bool,
    /// Lower-case before validation
    pub lowercase: bool,
    /// Length constraint; `None` when only a custom rule applies
    pub length: Option<LengthRule>,
    pub custom: Option<CustomRule>,
}

impl FieldDef {
    /// A trimmed string with a length constraint.
    pub fn trimmed(field: Field, length: LengthRule) -> Self {
        Self {
            field,
            trim: true,
            lowercase: false,
            length: Some(length),
            custom: None,
        }
    }

    /// A trimmed string checked only by its custom rule.
    pub fn unbounded(field: Field) -> Self {
        Self {
            length: None,
            ..Self::trimmed(field, LengthRule::Between(0, 0))
        }
    }

    pub fn lowercase(mut self) -> Self {
        self.lowercase = true;
        self
    }

    /// Attaches a custom rule. A `None` pattern means the length rule carries
    /// the check and the custom message replaces the generic one.
    pub fn with_custom(mut self, pattern: Option<&'static Regex>, message: &'static str) -> Self {
        self.custom = Some(CustomRule { pattern, message });
        self
    }
}

/// Complete schema for the applications collection.
///
/// Strict: keys not declared here are dropped on insert.
#[derive(Debug, Clone)]
pub struct Schema {
    pub collection: &'static str,
    pub fields: Vec<FieldDef>,
}

impl Schema {
    /// The induction applications schema.
    pub fn applications() -> Self {
        Self {
            collection: "applications",
            fields: vec![
                FieldDef::trimmed(Field::Name, LengthRule::Between(1, 200)),
                FieldDef::trimmed(Field::Branch, LengthRule::Between(1, 200)),
                FieldDef::trimmed(Field::Year, LengthRule::Between(1, 20)),
                FieldDef::trimmed(Field::RollNo, LengthRule::Exactly(10))
                    .with_custom(None, "Roll number must be exactly 10 characters"),
                FieldDef::trimmed(Field::Phone, LengthRule::Between(6, 20))
                    .with_custom(Some(&*PHONE_PATTERN), "Invalid phone number"),
                FieldDef::unbounded(Field::Email)
                    .lowercase()
                    .with_custom(Some(&*EMAIL_PATTERN), "Invalid email"),
            ],
        }
    }

    pub fn get(&self, field: Field) -> Option<&FieldDef> {
        self.fields.iter().find(|def| def.field == field)
    }
}
