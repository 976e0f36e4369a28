//! LZW-specific error types.

use thiserror::Error;

/// LZW compression/decompression errors.
#[derive(Debug, Error)]
pub enum LzwError {
    /// Code that is neither in the table nor the next one to be assigned.
    #[error("Invalid LZW code: {0}")]
    InvalidCode(u16),

    /// Symbol code size outside 2..=8.
    #[error("Invalid code size: {0} (must be 2-8)")]
    InvalidCodeSize(u8),

    /// Invalid bit width passed to the bit packer.
    #[error("Invalid bit width: {0} (must be 1-16)")]
    InvalidBitWidth(u8),

    /// Input byte does not fit the configured symbol size.
    #[error("Symbol {symbol} does not fit in {code_size} bits")]
    SymbolOutOfRange {
        /// Offending input byte.
        symbol: u8,
        /// Configured symbol size.
        code_size: u8,
    },

    /// Stream starts with the marker of the TIFF 5.0-style LZW variant.
    #[error("TIFF 5.0-style LZW codes are not supported")]
    UnsupportedVariant,

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for LZW operations.
pub type Result<T> = std::result::Result<T, LzwError>;
