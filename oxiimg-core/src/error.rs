//! Error types for OxiImg operations.
//!
//! The container crates wrap [`OxiImgError`] in their own error enums and add
//! the format violations specific to them.

use std::io;
use thiserror::Error;

/// The main error type for OxiImg byte-level operations.
#[derive(Debug, Error)]
pub enum OxiImgError {
    /// I/O error from underlying reader/writer.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Invalid magic number or signature.
    #[error("Invalid magic number: expected {expected:02x?}, found {found:02x?}")]
    InvalidMagic {
        /// Expected magic bytes.
        expected: Vec<u8>,
        /// Actual magic bytes found.
        found: Vec<u8>,
    },

    /// Unexpected end of the byte source.
    #[error("Unexpected end of data: expected {expected} more bytes")]
    UnexpectedEof {
        /// Number of bytes that were expected but not available.
        expected: u64,
    },

    /// Corrupted data in a container.
    #[error("Corrupted data at offset {offset}: {message}")]
    CorruptedData {
        /// Byte offset where corruption was detected.
        offset: u64,
        /// Description of the corruption.
        message: String,
    },

    /// Invalid header format.
    #[error("Invalid header: {message}")]
    InvalidHeader {
        /// Description of the header error.
        message: String,
    },
}

/// Result type alias for OxiImg operations.
pub type Result<T> = std::result::Result<T, OxiImgError>;

impl OxiImgError {
    /// Create an invalid magic error.
    pub fn invalid_magic(expected: impl Into<Vec<u8>>, found: impl Into<Vec<u8>>) -> Self {
        Self::InvalidMagic {
            expected: expected.into(),
            found: found.into(),
        }
    }

    /// Create an unexpected EOF error.
    pub fn unexpected_eof(expected: u64) -> Self {
        Self::UnexpectedEof { expected }
    }

    /// Create a corrupted data error.
    pub fn corrupted(offset: u64, message: impl Into<String>) -> Self {
        Self::CorruptedData {
            offset,
            message: message.into(),
        }
    }

    /// Create an invalid header error.
    pub fn invalid_header(message: impl Into<String>) -> Self {
        Self::InvalidHeader {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = OxiImgError::invalid_magic(vec![0x97, 0x4A], vec![0x89, 0x50]);
        assert!(err.to_string().contains("Invalid magic"));

        let err = OxiImgError::corrupted(12, "segment body runs past end of stream");
        assert!(err.to_string().contains("offset 12"));

        let err = OxiImgError::invalid_header("chunk payload exceeds the length field");
        assert!(err.to_string().starts_with("Invalid header"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::UnexpectedEof, "short read");
        let err: OxiImgError = io_err.into();
        assert!(matches!(err, OxiImgError::Io(_)));
    }
}
