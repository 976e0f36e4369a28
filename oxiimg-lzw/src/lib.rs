//! # OxiImg-LZW: Pure Rust LZW Compression
//!
//! LZW (Lempel-Ziv-Welch) compression and decompression for the two
//! framings found in image containers.
//!
//! ## Features
//!
//! - **Pure Rust**: No C dependencies, 100% safe Rust
//! - **TIFF LZW**: MSB-first bit order, early code change, flat stream
//! - **GIF LZW**: LSB-first bit order, 255-byte length-prefixed sub-blocks,
//!   symbol sizes from 2 to 8 bits
//! - **Streaming encoder**: input may arrive in arbitrary chunks
//! - **Strip decoder**: tolerates missing END codes and undoes the TIFF
//!   horizontal predictor
//!
//! ## Code Stream Layout
//!
//! - **Variable-length codes**: starting at `code_size + 1` bits, up to 12
//! - **CLEAR first**: every encoded stream starts with a CLEAR code
//! - **Table full**: at 12 bits a CLEAR is emitted and the table restarts
//! - **EOI termination**: streams end with the END code (257 for 8-bit symbols)
//!
//! ## Example
//!
//! ```rust
//! use oxiimg_lzw::{compress_tiff, decompress_tiff};
//!
//! let original = b"TOBEORNOTTOBEORTOBEORNOT";
//!
//! // Compress
//! let compressed = compress_tiff(original).unwrap();
//!
//! // Decompress
//! let decompressed = decompress_tiff(&compressed, original.len()).unwrap();
//!
//! assert_eq!(decompressed, original);
//! ```
//!
//! ## Streaming
//!
//! ```rust
//! use oxiimg_lzw::{LzwConfig, LzwEncoder, LzwStreamDecoder};
//!
//! let mut encoder = LzwEncoder::new(Vec::new(), LzwConfig::GIF).unwrap();
//! encoder.compress(b"GIF sub-blocks, ").unwrap();
//! encoder.compress(b"fed in two chunks").unwrap();
//! let compressed = encoder.finish().unwrap();
//!
//! let mut decoder = LzwStreamDecoder::new(LzwConfig::GIF).unwrap();
//! let decompressed = decoder.decode(&compressed, 64).unwrap();
//! assert_eq!(decompressed, b"GIF sub-blocks, fed in two chunks");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

mod bitstream;
mod config;
mod decoder;
mod dictionary;
mod encoder;
mod error;
pub mod predictor;
mod stream;

pub use bitstream::{BitOrder, BitPacker, CodeReader, EndOfInput, MAX_BLOCK_LEN, unblock};
pub use config::{Framing, LzwConfig, MAX_BITS};
pub use decoder::LzwDecoder;
pub use dictionary::{Expansion, Insertion, LzwDictionary, MAX_CODES};
pub use encoder::LzwEncoder;
pub use error::{LzwError, Result};
pub use predictor::Predictor;
pub use stream::LzwStreamDecoder;

/// Decompress LZW-compressed data with the given configuration.
///
/// # Parameters
///
/// - `data`: LZW-compressed input
/// - `expected_size`: Upper bound on the decompressed size
/// - `config`: LZW configuration (TIFF or GIF)
///
/// # Returns
///
/// Decompressed byte sequence, shorter than `expected_size` when the stream
/// ends early.
///
/// # Example
///
/// ```rust
/// use oxiimg_lzw::{decompress, compress, LzwConfig};
///
/// let original = b"Hello, World!";
/// let compressed = compress(original, LzwConfig::GIF).unwrap();
/// let decompressed = decompress(&compressed, original.len(), LzwConfig::GIF).unwrap();
/// assert_eq!(decompressed, original);
/// ```
pub fn decompress(data: &[u8], expected_size: usize, config: LzwConfig) -> Result<Vec<u8>> {
    if config == LzwConfig::TIFF {
        return LzwDecoder::plain().decode_to_vec(data, expected_size);
    }
    let mut decoder = LzwStreamDecoder::new(config)?;
    decoder.decode(data, expected_size)
}

/// Compress data with LZW using the given configuration.
///
/// # Example
///
/// ```rust
/// use oxiimg_lzw::{compress, LzwConfig};
///
/// let data = b"TOBEORNOTTOBEORTOBEORNOT".repeat(4);
/// let compressed = compress(&data, LzwConfig::TIFF).unwrap();
/// assert!(compressed.len() < data.len());
/// ```
pub fn compress(data: &[u8], config: LzwConfig) -> Result<Vec<u8>> {
    let mut encoder = LzwEncoder::new(Vec::new(), config)?;
    encoder.compress(data)?;
    encoder.finish()
}

/// Decompress TIFF LZW data (convenience function).
///
/// This is equivalent to `decompress(data, expected_size, LzwConfig::TIFF)`.
pub fn decompress_tiff(data: &[u8], expected_size: usize) -> Result<Vec<u8>> {
    decompress(data, expected_size, LzwConfig::TIFF)
}

/// Compress data with TIFF LZW (convenience function).
///
/// This is equivalent to `compress(data, LzwConfig::TIFF)`.
pub fn compress_tiff(data: &[u8]) -> Result<Vec<u8>> {
    compress(data, LzwConfig::TIFF)
}
