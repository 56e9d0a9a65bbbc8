// File: src/error.rs
//! Error types for corpus parsing, access and persistence.

use thiserror::Error;

/// Everything that can go wrong while building or reading a corpus.
#[derive(Debug, Error)]
pub enum GntError {
    /// An error originating from the underlying stream or file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The stream ended in the middle of a record.
    #[error("Truncated {context} in record at byte {offset}: expected {expected} bytes, found {found}")]
    TruncatedRecord {
        offset: u64,
        context: &'static str,
        expected: usize,
        found: usize,
    },

    /// The two tag bytes are not a valid GB2312 character.
    #[error("Undecodable tag {tag:02x?} in record at byte {offset}")]
    UndecodableTag { offset: u64, tag: [u8; 2] },

    #[error("Sample index {index} out of range for corpus of {len} samples")]
    IndexOutOfRange { index: usize, len: usize },

    /// A state blob (or JSON export) could not be encoded or decoded.
    #[error("Serialization failed: {0}")]
    Serialization(String),
}

impl From<bincode::Error> for GntError {
    fn from(e: bincode::Error) -> Self {
        GntError::Serialization(e.to_string())
    }
}

impl From<serde_json::Error> for GntError {
    fn from(e: serde_json::Error) -> Self {
        GntError::Serialization(e.to_string())
    }
}

/// A convenience `Result` alias using [`GntError`].
pub type Result<T> = std::result::Result<T, GntError>;
