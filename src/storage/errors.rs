//! Storage error types
//!
//! Error codes:
//! - FLUX_STORAGE_IO_ERROR (ERROR severity)
//! - FLUX_STORAGE_WRITE_FAILED (ERROR severity)
//! - FLUX_STORAGE_READ_FAILED (ERROR severity)
//! - FLUX_DATA_CORRUPTION (FATAL severity)

use std::fmt;
use std::io;

/// Severity levels for storage errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Operation fails, server continues
    Error,
    /// The record file cannot be trusted; the store must not open
    Fatal,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Error => "ERROR",
            Severity::Fatal => "FATAL",
        }
    }
}

/// Storage-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageErrorCode {
    StorageIoError,
    /// Record write or fsync failed
    StorageWriteFailed,
    StorageReadFailed,
    /// Checksum failure or malformed record
    DataCorruption,
}

impl StorageErrorCode {
    pub fn code(&self) -> &'static str {
        match self {
            StorageErrorCode::StorageIoError => "FLUX_STORAGE_IO_ERROR",
            StorageErrorCode::StorageWriteFailed => "FLUX_STORAGE_WRITE_FAILED",
            StorageErrorCode::StorageReadFailed => "FLUX_STORAGE_READ_FAILED",
            StorageErrorCode::DataCorruption => "FLUX_DATA_CORRUPTION",
        }
    }

    pub fn severity(&self) -> Severity {
        if *self == StorageErrorCode::DataCorruption {
            Severity::Fatal
        } else {
            Severity::Error
        }
    }
}

/// Where in the record file an error was found
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorContext {
    /// Byte offset of the record that failed
    Offset(u64),
    /// Id of the document that failed to decode
    Document(String),
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorContext::Offset(offset) => write!(f, "byte_offset: {}", offset),
            ErrorContext::Document(id) => write!(f, "document_id: {}", id),
        }
    }
}

/// Coded storage error
#[derive(Debug)]
pub struct StorageError {
    code: StorageErrorCode,
    message: String,
    context: Option<ErrorContext>,
    source: Option<io::Error>,
}

impl StorageError {
    fn new(code: StorageErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            context: None,
            source: None,
        }
    }

    fn caused_by(mut self, source: io::Error) -> Self {
        self.source = Some(source);
        self
    }

    fn within(mut self, context: ErrorContext) -> Self {
        self.context = Some(context);
        self
    }

    pub fn io_error(message: impl Into<String>, source: io::Error) -> Self {
        Self::new(StorageErrorCode::StorageIoError, message).caused_by(source)
    }

    pub fn write_failed(message: impl Into<String>, source: io::Error) -> Self {
        Self::new(StorageErrorCode::StorageWriteFailed, message).caused_by(source)
    }

    /// A write failure that did not come from the OS.
    pub fn write_failed_no_source(message: impl Into<String>) -> Self {
        Self::new(StorageErrorCode::StorageWriteFailed, message)
    }

    pub fn read_failed(message: impl Into<String>, source: io::Error) -> Self {
        Self::new(StorageErrorCode::StorageReadFailed, message).caused_by(source)
    }

    pub fn corruption_at_offset(offset: u64, reason: impl Into<String>) -> Self {
        Self::new(StorageErrorCode::DataCorruption, reason).within(ErrorContext::Offset(offset))
    }

    pub fn corruption_for_document(document_id: &str, reason: impl Into<String>) -> Self {
        Self::new(StorageErrorCode::DataCorruption, reason)
            .within(ErrorContext::Document(document_id.to_string()))
    }

    pub fn code(&self) -> StorageErrorCode {
        self.code
    }

    pub fn severity(&self) -> Severity {
        self.code.severity()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn context(&self) -> Option<&ErrorContext> {
        self.context.as_ref()
    }

    /// Fatal errors mean the record file cannot be trusted
    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: {}",
            self.severity().as_str(),
            self.code.code(),
            self.message
        )?;
        match &self.context {
            Some(context) => write!(f, " ({})", context),
            None => Ok(()),
        }
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

pub type StorageResult<T> = Result<T, StorageError>;
