//! Shared field patterns.

use std::sync::LazyLock;

use regex::Regex;

/// Digits, `+`, `-`, parentheses and spaces; 6 to 20 characters overall.
pub static PHONE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9+\-() ]{6,20}$").expect("phone pattern compiles"));

/// `local@domain.tld`: non-whitespace, non-`@` segments, one `@`, at least one `.`.
pub static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"));
