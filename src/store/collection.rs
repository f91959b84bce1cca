//! The applications collection
//!
//! Insert path, all under the collection lock:
//! 1. Schema cast (projection, normalization, field rules)
//! 2. Uniqueness check against every natural-key index
//! 3. Append to the document log (fsync for files)
//! 4. Index update
//!
//! A failure at any step leaves the log and the indexes unchanged.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::Utc;
use serde_json::Value;
use uuid::Uuid;

use super::errors::{StoreError, StoreResult};
use super::location::StoreLocation;
use super::log::{DocumentLog, FileLog, MemoryLog};
use crate::application::{Application, Field, NewApplication};
use crate::index::IndexManager;
use crate::schema::{Schema, SchemaValidator};
use crate::storage::{DocumentRecord, StorageError, StorageReader, StorageWriter};

/// Mutable state guarded by the collection lock.
struct Collection {
    log: Box<dyn DocumentLog>,
    indexes: IndexManager,
    records: Vec<Application>,
}

/// Store for induction applications.
pub struct ApplicationStore {
    schema: Schema,
    inner: Mutex<Collection>,
}

impl ApplicationStore {
    /// Opens the store described by a database URL.
    pub fn connect(url: &str) -> StoreResult<Self> {
        Self::open(&StoreLocation::parse(url)?)
    }

    pub fn open(location: &StoreLocation) -> StoreResult<Self> {
        match location {
            StoreLocation::Memory => Ok(Self::in_memory()),
            StoreLocation::Directory(dir) => Self::open_dir(dir),
        }
    }

    /// An empty, ephemeral store.
    pub fn in_memory() -> Self {
        Self {
            schema: Schema::applications(),
            inner: Mutex::new(Collection {
                log: Box::new(MemoryLog::new()),
                indexes: IndexManager::new(),
                records: Vec::new(),
            }),
        }
    }

    /// Opens (or creates) a file-backed store in `dir`.
    ///
    /// Every existing record is checksum-verified and decoded, and the unique
    /// indexes are rebuilt from them.
    pub fn open_dir(dir: &Path) -> StoreResult<Self> {
        let schema = Schema::applications();
        let storage_path = StorageWriter::storage_path(dir);

        let records = if storage_path.exists() {
            load_records(&storage_path, schema.collection)?
        } else {
            Vec::new()
        };

        let writer = StorageWriter::open(dir)?;
        Self::with_log(Box::new(FileLog::new(writer)), records)
    }

    /// Builds a store over an arbitrary log and its already-persisted records.
    pub fn with_log(log: Box<dyn DocumentLog>, records: Vec<Application>) -> StoreResult<Self> {
        let mut indexes = IndexManager::new();
        indexes.rebuild(&records)?;

        Ok(Self {
            schema: Schema::applications(),
            inner: Mutex::new(Collection {
                log,
                indexes,
                records,
            }),
        })
    }

    /// Inserts a raw document and returns the new record's id.
    ///
    /// # Errors
    ///
    /// - `Validation` if schema casting fails
    /// - `DuplicateKey` with every colliding natural key
    /// - `Storage` / `Encode` / `Poisoned` for unexpected failures
    pub fn insert(&self, document: &Value) -> StoreResult<String> {
        let fields = SchemaValidator::new(&self.schema)
            .cast(document)
            .map_err(StoreError::Validation)?;

        let mut inner = self.lock()?;

        let app = Application::from_new(new_id(), fields, Utc::now());

        let conflicts = inner.indexes.conflicts(&app);
        if !conflicts.is_empty() {
            return Err(StoreError::DuplicateKey(conflicts));
        }

        let body = serde_json::to_vec(&app)?;
        let record = DocumentRecord::new(self.schema.collection, &app.id, body);
        inner.log.append(&record)?;

        inner.indexes.apply_insert(&app);
        let id = app.id.clone();
        inner.records.push(app);

        Ok(id)
    }

    /// Inserts an already-validated application. Schema rules still apply.
    pub fn insert_application(&self, app: &NewApplication) -> StoreResult<String> {
        self.insert(&serde_json::to_value(app)?)
    }

    pub fn get(&self, id: &str) -> StoreResult<Option<Application>> {
        let inner = self.lock()?;
        Ok(inner
            .indexes
            .position(id)
            .and_then(|pos| inner.records.get(pos))
            .cloned())
    }

    /// Finds the record holding a natural key. Non-unique fields never match.
    pub fn find_by(&self, field: Field, value: &str) -> StoreResult<Option<Application>> {
        let inner = self.lock()?;
        Ok(inner
            .indexes
            .lookup(field, value)
            .and_then(|id| inner.indexes.position(id))
            .and_then(|pos| inner.records.get(pos))
            .cloned())
    }

    pub fn len(&self) -> StoreResult<usize> {
        Ok(self.lock()?.records.len())
    }

    pub fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.len()? == 0)
    }

    /// Description of the backing log, for log lines.
    pub fn describe(&self) -> StoreResult<String> {
        Ok(self.lock()?.log.describe())
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, Collection>> {
        self.inner.lock().map_err(|_| StoreError::Poisoned)
    }
}

fn new_id() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Checks the records at `location` without opening a writer.
///
/// Every record is checksum-verified, decoded and indexed, exactly as an open
/// would. Nothing is created: a missing directory or record file holds zero
/// records. Returns the record count.
pub fn verify_records(location: &StoreLocation) -> StoreResult<usize> {
    let dir = match location {
        StoreLocation::Memory => return Ok(0),
        StoreLocation::Directory(dir) => dir,
    };

    let storage_path = StorageWriter::storage_path(dir);
    if !storage_path.exists() {
        return Ok(0);
    }

    let records = load_records(&storage_path, Schema::applications().collection)?;
    IndexManager::new().rebuild(&records)?;
    Ok(records.len())
}

/// Reads and decodes every record of the file.
fn load_records(path: &Path, collection: &str) -> StoreResult<Vec<Application>> {
    let mut reader = StorageReader::open(path)?;
    let mut records = Vec::new();

    while let Some(record) = reader.read_next()? {
        if record.collection != collection {
            return Err(StorageError::corruption_for_document(
                &record.document_id,
                format!("unexpected collection '{}'", record.collection),
            )
            .into());
        }

        let app: Application = serde_json::from_slice(&record.document_body).map_err(|e| {
            StorageError::corruption_for_document(
                &record.document_id,
                format!("undecodable document: {}", e),
            )
        })?;

        if app.id != record.document_id {
            return Err(StorageError::corruption_for_document(
                &record.document_id,
                format!("body id '{}' does not match record id", app.id),
            )
            .into());
        }

        records.push(app);
    }

    Ok(records)
}
