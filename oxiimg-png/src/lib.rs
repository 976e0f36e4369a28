//! # OxiImg-PNG: PNG Chunk Writer
//!
//! Emits the chunk stream of a PNG file: signature, IHDR, optional PLTE and
//! iCCP, a deflated IDAT and IEND, each chunk CRC-32 checked.
//!
//! Rows are written unfiltered (filter type 0). Deflate is provided by
//! `flate2`.
//!
//! ## Example
//!
//! ```rust
//! use oxiimg_png::{ColorType, PngWriter};
//!
//! // 2x2 greyscale
//! let pixels = [0u8, 255, 255, 0];
//!
//! let mut png = PngWriter::new(Vec::new()).unwrap();
//! png.write_header(2, 2, 8, ColorType::Grayscale).unwrap();
//! png.write_data(&pixels, 2).unwrap();
//! png.write_end().unwrap();
//!
//! let bytes = png.into_inner();
//! assert_eq!(&bytes[..8], &oxiimg_png::PNG_SIGNATURE);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

mod writer;

pub use oxiimg_core::{OxiImgError, Result};
pub use writer::{ColorType, PNG_SIGNATURE, PngWriter, chunk};
