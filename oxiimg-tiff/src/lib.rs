//! # OxiImg-TIFF: TIFF Image File Directories
//!
//! Reads and writes the tag directories of TIFF files, and compresses strip
//! data with TIFF LZW.
//!
//! ## Features
//!
//! - **Both byte orders**: `II` and `MM` files, read and written
//! - **All twelve field types**: integers, rationals, floats, ASCII, opaque
//! - **Tolerant reader**: entries with unknown types or values outside the
//!   file are skipped with a warning; a missing next-IFD offset ends the chain
//! - **Strip compression**: LZW with optional horizontal differencing
//!
//! ## Example
//!
//! ```rust
//! use oxiimg_lzw::Predictor;
//! use oxiimg_tiff::{DirectoryWriter, TiffDirectory, TiffField, compress_lzw, tags};
//! use std::io::Cursor;
//!
//! // 4x2 RGB strip
//! let pixels: Vec<u8> = (0..24).collect();
//! let strip = compress_lzw(Vec::new(), Predictor::HorizontalDifferencing, &pixels, 2, 3, 12).unwrap();
//!
//! let mut writer = DirectoryWriter::new();
//! writer.add_field(TiffField::long(tags::IMAGE_WIDTH, vec![4u32]));
//! writer.add_field(TiffField::long(tags::IMAGE_LENGTH, vec![2u32]));
//! writer.add_field(TiffField::short(tags::COMPRESSION, vec![tags::COMPRESSION_LZW]));
//! writer.add_field(TiffField::short(tags::PREDICTOR, vec![Predictor::HorizontalDifferencing.tag_value()]));
//! writer.add_field(TiffField::long(tags::STRIP_BYTE_COUNTS, vec![strip.len() as u32]));
//! writer.add_strip_image(strip);
//!
//! let mut file = Vec::new();
//! writer.write_file(&mut file).unwrap();
//!
//! let dir = TiffDirectory::read(&mut Cursor::new(&file), 0).unwrap();
//! assert_eq!(dir.field_as_long(tags::COMPRESSION, 0), Some(5));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

mod directory;
mod error;
mod field;
pub mod tags;
mod types;
mod writer;

pub use directory::{ENTRY_SIZE, TIFF_VERSION, TiffDirectory};
pub use error::{Result, TiffError};
pub use field::{FieldValues, TiffField};
pub use types::FieldType;
pub use writer::{DirectoryWriter, compress_lzw};
