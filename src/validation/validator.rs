//! Submission validator
//!
//! Validation semantics:
//! - Only the six application fields are read; everything else is ignored
//! - Every rule is evaluated; errors accumulate instead of short-circuiting
//! - Missing, null and non-string values fail the field's rule
//! - Accepted values are trimmed and `email` is lower-cased
//!
//! Validation is pure: the same input always yields the same result.

use serde_json::{Map, Value};

use super::errors::FieldErrors;
use super::patterns::{EMAIL_PATTERN, PHONE_PATTERN};
use crate::application::{Field, NewApplication};

/// Outcome of validating a raw submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validation {
    Accepted(NewApplication),
    Rejected(FieldErrors),
}

/// Returns the message reported when `field` fails its rule.
pub fn rule_message(field: Field) -> &'static str {
    match field {
        Field::Name => "Name must be between 1 and 200 characters",
        Field::RollNo => "Roll number must be exactly 10 characters",
        Field::Branch => "Branch must be between 1 and 200 characters",
        Field::Year => "Year must be between 1 and 20 characters",
        Field::Phone => "Phone number must be 6-20 characters with numbers, +, -, (), or spaces",
        Field::Email => "Please enter a valid email address",
    }
}

/// Validates a raw JSON submission.
///
/// A non-object input behaves like an object with no fields.
pub fn validate_submission(input: &Value) -> Validation {
    let empty = Map::new();
    let obj = input.as_object().unwrap_or(&empty);

    let mut errors = FieldErrors::new();
    let mut accepted: [Option<String>; 6] = Default::default();

    for (slot, field) in accepted.iter_mut().zip(Field::ALL) {
        match check_field(field, obj.get(field.as_str())) {
            Some(value) => *slot = Some(value),
            None => errors.add(field, rule_message(field)),
        }
    }

    if !errors.is_empty() {
        return Validation::Rejected(errors);
    }

    let [Some(name), Some(roll_no), Some(branch), Some(year), Some(phone), Some(email)] = accepted
    else {
        // Every slot is filled when no error was recorded.
        return Validation::Rejected(errors);
    };

    Validation::Accepted(NewApplication {
        name,
        branch,
        year,
        roll_no,
        phone,
        email,
    })
}

/// Applies the rule for one field, returning the normalized value on success.
fn check_field(field: Field, value: Option<&Value>) -> Option<String> {
    let raw = value.and_then(Value::as_str)?;
    let trimmed = raw.trim();
    let len = trimmed.chars().count();

    let ok = match field {
        Field::Name | Field::Branch => (1..=200).contains(&len),
        Field::Year => (1..=20).contains(&len),
        Field::RollNo => len == 10,
        Field::Phone => PHONE_PATTERN.is_match(raw),
        Field::Email => EMAIL_PATTERN.is_match(raw),
    };
    if !ok {
        return None;
    }

    Some(match field {
        Field::Email => trimmed.to_lowercase(),
        _ => trimmed.to_string(),
    })
}
