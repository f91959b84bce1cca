//! Storage reader with strict corruption detection
//!
//! Every read validates the checksum. The reader is used when a store is
//! opened (index rebuild) and by `verify`.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use super::errors::{StorageError, StorageResult};
use super::record::{DocumentRecord, MIN_RECORD_SIZE};

/// Sequential reader over a record file.
pub struct StorageReader {
    reader: BufReader<File>,
    current_offset: u64,
    file_size: u64,
}

impl StorageReader {
    /// Opens the storage file for reading.
    pub fn open(storage_path: &Path) -> StorageResult<Self> {
        let file = File::open(storage_path).map_err(|e| {
            StorageError::read_failed(
                format!("Failed to open storage file: {}", storage_path.display()),
                e,
            )
        })?;

        let file_size = file
            .metadata()
            .map_err(|e| StorageError::read_failed("Failed to read file metadata", e))?
            .len();

        Ok(Self {
            reader: BufReader::new(file),
            current_offset: 0,
            file_size,
        })
    }

    /// Reads the next record.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(record))` if a record was read
    /// - `Ok(None)` at end of file
    /// - `Err(FLUX_DATA_CORRUPTION)` on a short, oversized or checksum-failing record
    pub fn read_next(&mut self) -> StorageResult<Option<DocumentRecord>> {
        let remaining = self.file_size.saturating_sub(self.current_offset);
        if remaining == 0 {
            return Ok(None);
        }
        if remaining < MIN_RECORD_SIZE as u64 {
            return Err(self.corrupt(format!(
                "Truncated storage: {} bytes remaining, minimum record size is {}",
                remaining, MIN_RECORD_SIZE
            )));
        }

        let mut prefix = [0u8; 4];
        self.reader
            .read_exact(&mut prefix)
            .map_err(|e| self.corrupt(format!("Unreadable length prefix: {}", e)))?;

        let declared = u64::from(u32::from_le_bytes(prefix));
        if !(MIN_RECORD_SIZE as u64..=remaining).contains(&declared) {
            return Err(self.corrupt(format!(
                "Record length {} outside [{}, {}]",
                declared, MIN_RECORD_SIZE, remaining
            )));
        }

        let mut frame = prefix.to_vec();
        frame.resize(declared as usize, 0);
        self.reader
            .read_exact(&mut frame[prefix.len()..])
            .map_err(|e| self.corrupt(format!("Unreadable record body: {}", e)))?;

        let (record, consumed) =
            DocumentRecord::deserialize(&frame).map_err(|e| self.corrupt(e.to_string()))?;
        self.current_offset += consumed as u64;

        Ok(Some(record))
    }

    /// Corruption error for the record starting at the current offset.
    fn corrupt(&self, reason: String) -> StorageError {
        StorageError::corruption_at_offset(self.current_offset, reason)
    }

    /// Reads all records. Any corruption causes immediate failure.
    pub fn read_all(&mut self) -> StorageResult<Vec<DocumentRecord>> {
        let mut records = Vec::new();
        while let Some(record) = self.read_next()? {
            records.push(record);
        }
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::errors::ErrorContext;
    use std::fs;
    use tempfile::TempDir;

    fn write_records(path: &Path, records: &[DocumentRecord]) {
        let mut bytes = Vec::new();
        for record in records {
            bytes.extend_from_slice(&record.serialize());
        }
        fs::write(path, bytes).unwrap();
    }

    fn record(id: &str) -> DocumentRecord {
        DocumentRecord::new("applications", id, format!(r#"{{"id":"{}"}}"#, id).into_bytes())
    }

    #[test]
    fn test_read_empty_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("applications.dat");
        fs::write(&path, b"").unwrap();

        let mut reader = StorageReader::open(&path).unwrap();
        assert!(reader.read_next().unwrap().is_none());
        assert!(reader.read_next().unwrap().is_none());
    }

    #[test]
    fn test_read_multiple_records_in_order() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("applications.dat");
        write_records(&path, &[record("a"), record("b"), record("c")]);

        let mut reader = StorageReader::open(&path).unwrap();
        let ids: Vec<_> = reader
            .read_all()
            .unwrap()
            .into_iter()
            .map(|r| r.document_id)
            .collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
        assert!(reader.read_next().unwrap().is_none());
    }

    #[test]
    fn test_corruption_detected_with_offset() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("applications.dat");
        write_records(&path, &[record("a"), record("b")]);

        let first_len = record("a").serialize().len();
        let mut bytes = fs::read(&path).unwrap();
        bytes[first_len + 10] ^= 0xFF;
        fs::write(&path, bytes).unwrap();

        let mut reader = StorageReader::open(&path).unwrap();
        assert!(reader.read_next().unwrap().is_some());
        let err = reader.read_next().unwrap_err();
        assert!(err.is_fatal());
        assert_eq!(err.context(), Some(&ErrorContext::Offset(first_len as u64)));
    }

    #[test]
    fn test_truncated_tail_detected() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("applications.dat");
        write_records(&path, &[record("a")]);

        let mut bytes = fs::read(&path).unwrap();
        bytes.extend_from_slice(&[1, 2, 3]);
        fs::write(&path, bytes).unwrap();

        let mut reader = StorageReader::open(&path).unwrap();
        let err = reader.read_all().unwrap_err();
        assert!(err.message().contains("Truncated storage"));
    }

    #[test]
    fn test_missing_file_is_read_failure() {
        let tmp = TempDir::new().unwrap();
        let err = StorageReader::open(&tmp.path().join("nope.dat")).err().unwrap();
        assert!(!err.is_fatal());
    }
}
