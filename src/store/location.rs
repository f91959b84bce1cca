//! Database URL parsing
//!
//! Accepted forms:
//! - `memory:` or `memory://` - ephemeral in-memory store
//! - `file:<dir>` or `file://<dir>` - record file in `<dir>`
//! - a bare path - same as `file:<path>`

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use super::errors::{StoreError, StoreResult};

/// Where a store keeps its records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreLocation {
    Memory,
    Directory(PathBuf),
}

impl StoreLocation {
    pub fn parse(url: &str) -> StoreResult<Self> {
        let url = url.trim();
        if url.is_empty() {
            return Err(StoreError::invalid_location(url, "empty url"));
        }

        if let Some(rest) = url.strip_prefix("memory:") {
            let rest = rest.strip_prefix("//").unwrap_or(rest);
            if !rest.is_empty() {
                return Err(StoreError::invalid_location(
                    url,
                    "memory urls take no path",
                ));
            }
            return Ok(StoreLocation::Memory);
        }

        if let Some(rest) = url.strip_prefix("file:") {
            let path = rest.strip_prefix("//").unwrap_or(rest);
            if path.is_empty() {
                return Err(StoreError::invalid_location(url, "missing directory"));
            }
            return Ok(StoreLocation::Directory(PathBuf::from(path)));
        }

        if let Some((scheme, _)) = url.split_once("://") {
            return Err(StoreError::invalid_location(
                url,
                format!("unsupported scheme '{}'", scheme),
            ));
        }

        Ok(StoreLocation::Directory(PathBuf::from(url)))
    }
}

impl FromStr for StoreLocation {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for StoreLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreLocation::Memory => write!(f, "memory:"),
            StoreLocation::Directory(path) => write!(f, "file:{}", path.display()),
        }
    }
}
