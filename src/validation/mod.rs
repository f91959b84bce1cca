//! Submission validation
//!
//! First line of defense in front of the store. Maps a raw submission to
//! either a normalized [`NewApplication`](crate::application::NewApplication)
//! or a [`FieldErrors`] set keyed by field name.

mod errors;
mod patterns;
mod validator;

pub use errors::FieldErrors;
pub use patterns::{EMAIL_PATTERN, PHONE_PATTERN};
pub use validator::{rule_message, validate_submission, Validation};
