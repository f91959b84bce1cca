//! Storage writer with fsync enforcement
//!
//! The record file is append-only; an insert must not be acknowledged until
//! its record is written and synced. A failed append is rolled back by
//! truncating to the last good offset. If the rollback itself fails, the
//! writer refuses every later append.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use super::errors::{StorageError, StorageResult};
use super::record::DocumentRecord;

/// Name of the record file inside a data directory.
pub const STORAGE_FILE: &str = "applications.dat";

/// Byte sink a [`StorageWriter`] appends to.
pub trait AppendTarget: Write {
    /// Current length in bytes.
    fn size(&self) -> io::Result<u64>;

    /// Flushes written bytes to stable storage.
    fn sync(&mut self) -> io::Result<()>;

    /// Cuts the target back to `len` bytes.
    fn truncate(&mut self, len: u64) -> io::Result<()>;
}

impl AppendTarget for File {
    fn size(&self) -> io::Result<u64> {
        Ok(self.metadata()?.len())
    }

    fn sync(&mut self) -> io::Result<()> {
        self.sync_all()
    }

    fn truncate(&mut self, len: u64) -> io::Result<()> {
        self.set_len(len)
    }
}

/// Append-only writer for `<data_dir>/applications.dat`.
pub struct StorageWriter<T: AppendTarget = File> {
    storage_path: PathBuf,
    target: T,
    current_offset: u64,
    /// Set when a rollback failed; the tail of the file is unknown
    poisoned: bool,
}

impl StorageWriter<File> {
    /// Opens or creates the record file inside `data_dir`.
    ///
    /// Creates `data_dir` if missing.
    ///
    /// # Errors
    ///
    /// Returns `FLUX_STORAGE_WRITE_FAILED` if the directory or file cannot be
    /// created or opened.
    pub fn open(data_dir: &Path) -> StorageResult<Self> {
        if !data_dir.exists() {
            fs::create_dir_all(data_dir).map_err(|e| {
                StorageError::write_failed(
                    format!("Failed to create data directory: {}", data_dir.display()),
                    e,
                )
            })?;
        }

        let storage_path = Self::storage_path(data_dir);

        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(&storage_path)
            .map_err(|e| {
                StorageError::write_failed(
                    format!("Failed to open storage file: {}", storage_path.display()),
                    e,
                )
            })?;

        Self::with_target(storage_path, file)
    }

    /// Returns the record file path for a data directory.
    pub fn storage_path(data_dir: &Path) -> PathBuf {
        data_dir.join(STORAGE_FILE)
    }
}

impl<T: AppendTarget> StorageWriter<T> {
    /// Wraps an already-open target; appends start at its current end.
    pub fn with_target(storage_path: PathBuf, target: T) -> StorageResult<Self> {
        let current_offset = target
            .size()
            .map_err(|e| StorageError::io_error("Failed to read file metadata", e))?;

        Ok(Self {
            storage_path,
            target,
            current_offset,
            poisoned: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.storage_path
    }

    /// Appends a record and syncs it to disk.
    ///
    /// Returns the byte offset where the record was written. On error the
    /// file is truncated back to that offset.
    pub fn write(&mut self, record: &DocumentRecord) -> StorageResult<u64> {
        if self.poisoned {
            return Err(StorageError::write_failed_no_source(format!(
                "Writer disabled: {} could not be restored after a failed write",
                self.storage_path.display()
            )));
        }

        let serialized = record.serialize();
        let offset = self.current_offset;

        let appended = self
            .target
            .write_all(&serialized)
            .map_err(|e| {
                StorageError::write_failed(
                    format!("Failed to write document: {}", record.document_id),
                    e,
                )
            })
            .and_then(|()| {
                // fsync - mandatory before acknowledging the insert
                self.target.sync().map_err(|e| {
                    StorageError::write_failed(
                        format!("fsync failed after writing document: {}", record.document_id),
                        e,
                    )
                })
            });

        if let Err(err) = appended {
            self.rollback();
            return Err(err);
        }

        self.current_offset += serialized.len() as u64;

        Ok(offset)
    }

    /// Drops any bytes past the last acknowledged record.
    fn rollback(&mut self) {
        let restored = self
            .target
            .truncate(self.current_offset)
            .and_then(|()| self.target.sync());
        if restored.is_err() {
            self.poisoned = true;
        }
    }
}
