//! Document logs backing a store
//!
//! A log only appends. Reads are served from the store's in-memory copy,
//! which is loaded from the file when the store opens.

use std::fs::File;

use crate::storage::{AppendTarget, DocumentRecord, StorageResult, StorageWriter};

/// Durable sink for inserted records.
pub trait DocumentLog: Send {
    /// Appends a record. On error nothing may be considered written.
    fn append(&mut self, record: &DocumentRecord) -> StorageResult<u64>;

    /// Short description for log lines.
    fn describe(&self) -> String;
}

/// Ephemeral log. Nothing is kept beyond the store's in-memory records;
/// offsets are those the record file would have produced.
#[derive(Debug, Default)]
pub struct MemoryLog {
    bytes: u64,
}

impl MemoryLog {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DocumentLog for MemoryLog {
    fn append(&mut self, record: &DocumentRecord) -> StorageResult<u64> {
        let offset = self.bytes;
        self.bytes += record.serialize().len() as u64;
        Ok(offset)
    }

    fn describe(&self) -> String {
        "memory:".to_string()
    }
}

/// Append-only record file.
pub struct FileLog<T: AppendTarget = File> {
    writer: StorageWriter<T>,
}

impl<T: AppendTarget> FileLog<T> {
    pub fn new(writer: StorageWriter<T>) -> Self {
        Self { writer }
    }
}

impl<T: AppendTarget + Send> DocumentLog for FileLog<T> {
    fn append(&mut self, record: &DocumentRecord) -> StorageResult<u64> {
        self.writer.write(record)
    }

    fn describe(&self) -> String {
        format!("file:{}", self.writer.path().display())
    }
}
