//! Custom error types for the emb-codec crate.

use thiserror::Error;

/// The primary error type for all operations in this crate.
#[derive(Debug, Error)]
pub enum EmbError {
    /// A packing/unpacking primitive received a buffer of the wrong size.
    #[error("invalid length for {context}: expected {expected} bytes, got {actual}")]
    InvalidLength {
        context: &'static str,
        expected: usize,
        actual: usize,
    },

    /// A value exceeds what the target encoding can represent.
    #[error("{what} out of range: {value} exceeds ±{max}")]
    OutOfRange {
        what: &'static str,
        value: i64,
        max: i64,
    },

    /// The data is structurally invalid for the format being encoded or decoded.
    #[error("invalid format: {0}")]
    InvalidFormat(String),

    /// The requested format or operation has no verified specification yet.
    #[error("unsupported: {0}")]
    Unsupported(&'static str),

    /// A codec error annotated with the offending chunk's stream position.
    #[error("chunk at offset {offset} ({len} bytes): {source}")]
    ChunkError {
        offset: u64,
        len: usize,
        source: Box<EmbError>,
    },
}

impl EmbError {
    /// Wrap an error with the stream offset and byte length of the chunk
    /// that produced it.
    pub fn at_chunk(self, offset: u64, len: usize) -> Self {
        EmbError::ChunkError {
            offset,
            len,
            source: Box::new(self),
        }
    }
}

/// A convenience `Result` type alias using the crate's `EmbError` type.
pub type Result<T> = std::result::Result<T, EmbError>;
