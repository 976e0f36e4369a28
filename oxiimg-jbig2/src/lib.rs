//! # OxiImg-JBIG2: JBIG2 Segment Reader
//!
//! Splits a JBIG2 stream into segments and pages without decoding any
//! bitmap. The raw segment bytes are kept so a page, or the global segment
//! set, can be re-emitted for embedding in another container.
//!
//! ## Features
//!
//! - **Both file organizations**: sequential and random-access standalone
//!   files, plus header-less embedded streams
//! - **Full segment headers**: short and long referred-to counts, retention
//!   flags, 1- and 4-byte page associations
//! - **Page extraction**: per-page byte streams rewritten to page 1, with
//!   end-of-page and end-of-file segments removed
//!
//! ## Limitations
//!
//! Segments whose data length is the unknown-length sentinel are not
//! supported: the body is skipped and a warning is logged.
//!
//! ## Example
//!
//! ```rust,no_run
//! use oxiimg_jbig2::Jbig2Reader;
//! use std::fs::File;
//!
//! let mut reader = Jbig2Reader::new(File::open("scan.jb2")?);
//! reader.read()?;
//!
//! let globals = reader.globals(true);
//! for page in reader.pages() {
//!     let payload = page.data(true);
//!     println!("page {}: {}x{}, {} bytes", page.number(), page.width()?, page.height()?, payload.len());
//! }
//! # let _ = globals;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

mod error;
mod page;
mod reader;
mod segment;

pub use error::{Jbig2Error, Result};
pub use page::Page;
pub use reader::{FILE_HEADER_ID, Jbig2Reader, Organization};
pub use segment::{Segment, SegmentType, UNKNOWN_DATA_LENGTH};
