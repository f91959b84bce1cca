//! The fixed set of submission fields.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the six fields of an application.
///
/// Declaration order is the order errors are reported in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    Name,
    RollNo,
    Branch,
    Year,
    Phone,
    Email,
}

impl Field {
    /// All fields, in reporting order.
    pub const ALL: [Field; 6] = [
        Field::Name,
        Field::RollNo,
        Field::Branch,
        Field::Year,
        Field::Phone,
        Field::Email,
    ];

    /// Fields that carry a unique index.
    pub const UNIQUE: [Field; 3] = [Field::RollNo, Field::Phone, Field::Email];

    /// Returns the wire name of the field (the JSON key).
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::RollNo => "rollNo",
            Field::Branch => "branch",
            Field::Year => "year",
            Field::Phone => "phone",
            Field::Email => "email",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
