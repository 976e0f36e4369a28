//! # OxiImg Core
//!
//! Core components shared by the OxiImg image-container codecs.
//!
//! This crate provides the building blocks the container crates sit on:
//!
//! - [`io`]: Endian-aware reads over a seekable byte source
//! - [`crc`]: CRC-32 checksum used by PNG chunks
//! - [`error`]: Error types
//!
//! ## Architecture
//!
//! OxiImg is layered the same way as a protocol stack:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │ L3: Container                                           │
//! │     JBIG2 segments, TIFF IFDs, PNG chunks               │
//! ├─────────────────────────────────────────────────────────┤
//! │ L2: Codec                                               │
//! │     LZW (GIF blocked / TIFF unblocked), deflate         │
//! ├─────────────────────────────────────────────────────────┤
//! │ L1: Bytes (this crate)                                  │
//! │     EndianReader, CRC-32, errors                        │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust
//! use oxiimg_core::crc::Crc32;
//! use oxiimg_core::io::{ByteOrder, EndianReader};
//! use std::io::Cursor;
//!
//! let mut reader = EndianReader::new(Cursor::new(vec![0x00, 0x2A]), ByteOrder::BigEndian);
//! assert_eq!(reader.read_u16().unwrap(), 42);
//!
//! assert_eq!(Crc32::compute(b"IEND"), 0xAE42_6082);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]
#![allow(clippy::module_name_repetitions)]

pub mod crc;
pub mod error;
pub mod io;

// Re-exports for convenience
pub use crc::Crc32;
pub use error::{OxiImgError, Result};
pub use io::{ByteOrder, EndianReader};
