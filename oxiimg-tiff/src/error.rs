//! TIFF-specific error types.

use crate::types::FieldType;
use oxiimg_core::OxiImgError;
use oxiimg_lzw::LzwError;
use thiserror::Error;

/// TIFF directory errors.
#[derive(Debug, Error)]
pub enum TiffError {
    /// Error from the shared byte layer.
    #[error(transparent)]
    Core(#[from] OxiImgError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Strip compression failure.
    #[error("LZW error: {0}")]
    Lzw(#[from] LzwError),

    /// Byte order marker is neither `II` nor `MM`.
    #[error("Invalid TIFF byte order marker: {0:#06x}")]
    InvalidByteOrder(u16),

    /// Version word is not 42.
    #[error("Invalid TIFF version: {0} (expected 42)")]
    InvalidVersion(u16),

    /// The IFD chain ended before the requested directory.
    #[error("Directory index {index} out of range ({available} directories)")]
    DirectoryIndexOutOfRange {
        /// Requested index.
        index: usize,
        /// Directories found before the chain ended.
        available: usize,
    },

    /// Accessor incompatible with the field's type.
    #[error("Tag {tag}: cannot read {field_type:?} field as {requested}")]
    TypeMismatch {
        /// Field tag.
        tag: u16,
        /// Stored type.
        field_type: FieldType,
        /// Requested view.
        requested: &'static str,
    },

    /// Value index past the field's count.
    #[error("Tag {tag}: value index {index} out of range (count {count})")]
    ValueIndexOutOfRange {
        /// Field tag.
        tag: u16,
        /// Requested index.
        index: usize,
        /// Number of values.
        count: usize,
    },

    /// An out-of-line value would start beyond the 32-bit offset range.
    #[error("Value offset {0} does not fit in 32 bits")]
    OffsetOverflow(u64),
}

/// Result type for TIFF operations.
pub type Result<T> = std::result::Result<T, TiffError>;
