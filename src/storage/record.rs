//! Document record format
//!
//! ```text
//! +------------------+
//! | Record Length    | (u32 LE)
//! +------------------+
//! | Collection       | (length-prefixed string)
//! +------------------+
//! | Document ID      | (length-prefixed string)
//! +------------------+
//! | Document Body    | (length-prefixed bytes, JSON)
//! +------------------+
//! | Checksum         | (u32 LE)
//! +------------------+
//! ```
//!
//! Checksum covers all bytes except the checksum itself.

use std::io;

use super::checksum::{compute_checksum, verify_checksum};

/// len + collection + id + body + checksum, with empty strings and body
pub(crate) const MIN_RECORD_SIZE: usize = 4 + 4 + 4 + 4 + 4;

const LEN_PREFIX: usize = 4;
const CHECKSUM_SIZE: usize = 4;

/// Complete document record as stored on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentRecord {
    pub collection: String,
    /// Document primary key
    pub document_id: String,
    /// Serialized JSON document
    pub document_body: Vec<u8>,
}

impl DocumentRecord {
    pub fn new(
        collection: impl Into<String>,
        document_id: impl Into<String>,
        document_body: Vec<u8>,
    ) -> Self {
        Self {
            collection: collection.into(),
            document_id: document_id.into(),
            document_body,
        }
    }

    /// Encodes the record, length prefix and checksum included.
    pub fn serialize(&self) -> Vec<u8> {
        let fields: [&[u8]; 3] = [
            self.collection.as_bytes(),
            self.document_id.as_bytes(),
            &self.document_body,
        ];
        let total = LEN_PREFIX
            + fields.iter().map(|f| LEN_PREFIX + f.len()).sum::<usize>()
            + CHECKSUM_SIZE;

        let mut out = Vec::with_capacity(total);
        out.extend_from_slice(&(total as u32).to_le_bytes());
        for field in fields {
            out.extend_from_slice(&(field.len() as u32).to_le_bytes());
            out.extend_from_slice(field);
        }

        let checksum = compute_checksum(&out);
        out.extend_from_slice(&checksum.to_le_bytes());
        out
    }

    /// Decodes one record from the front of `data`, verifying its checksum.
    ///
    /// Returns the record and the number of bytes consumed.
    pub fn deserialize(data: &[u8]) -> io::Result<(Self, usize)> {
        let record_length = frame_length(data)?;
        let (covered, trailer) = data[..record_length].split_at(record_length - CHECKSUM_SIZE);

        let stored = read_u32(trailer)?;
        if !verify_checksum(covered, stored) {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!(
                    "Checksum mismatch: computed {:08x}, stored {:08x}",
                    compute_checksum(covered),
                    stored
                ),
            ));
        }

        let mut rest = &covered[LEN_PREFIX..];
        let collection = take_string(&mut rest)?;
        let document_id = take_string(&mut rest)?;
        let document_body = take_field(&mut rest)?.to_vec();

        if !rest.is_empty() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("{} trailing bytes inside record", rest.len()),
            ));
        }

        Ok((
            Self {
                collection,
                document_id,
                document_body,
            },
            record_length,
        ))
    }
}

/// Validates the length prefix against the available bytes.
fn frame_length(data: &[u8]) -> io::Result<usize> {
    if data.len() < MIN_RECORD_SIZE {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "Record too short",
        ));
    }

    let record_length = read_u32(data)? as usize;
    if record_length < MIN_RECORD_SIZE {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("Invalid record length: {}", record_length),
        ));
    }
    if data.len() < record_length {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            format!(
                "Record truncated: expected {} bytes, got {}",
                record_length,
                data.len()
            ),
        ));
    }
    Ok(record_length)
}

fn read_u32(bytes: &[u8]) -> io::Result<u32> {
    bytes
        .get(..4)
        .and_then(|b| b.try_into().ok())
        .map(u32::from_le_bytes)
        .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "missing u32"))
}

/// Splits one length-prefixed field off the front of `rest`.
fn take_field<'a>(rest: &mut &'a [u8]) -> io::Result<&'a [u8]> {
    let current: &'a [u8] = *rest;
    let len = read_u32(current)? as usize;
    let body = &current[LEN_PREFIX..];
    if body.len() < len {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("field length {} overruns record", len),
        ));
    }
    let (field, tail) = body.split_at(len);
    *rest = tail;
    Ok(field)
}

fn take_string(rest: &mut &[u8]) -> io::Result<String> {
    let bytes = take_field(rest)?;
    String::from_utf8(bytes.to_vec())
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, format!("Invalid UTF-8: {}", e)))
}
