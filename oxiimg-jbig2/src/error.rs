//! JBIG2-specific error types.

use oxiimg_core::OxiImgError;
use thiserror::Error;

/// JBIG2 segment stream errors.
#[derive(Debug, Error)]
pub enum Jbig2Error {
    /// Error from the shared byte layer (bad magic, truncation, corruption).
    #[error(transparent)]
    Core(#[from] OxiImgError),

    /// [`read`](crate::Jbig2Reader::read) was called a second time.
    #[error("JBIG2 stream was already read")]
    AlreadyRead,

    /// File header flags with reserved bits set.
    #[error("Invalid JBIG2 file header flags: {0:#04x}")]
    InvalidFileFlags(u8),

    /// Referred-to segment count field uses the reserved values 5 or 6.
    #[error("Segment {segment}: referred-to segment count field {value} is reserved")]
    ReservedReferredToCount {
        /// Segment number.
        segment: u32,
        /// Value of the top three bits.
        value: u8,
    },

    /// Page association does not fit a non-negative 32-bit page number.
    #[error("Segment {segment}: invalid page association {page}")]
    InvalidPageAssociation {
        /// Segment number.
        segment: u32,
        /// Raw page association.
        page: u32,
    },

    /// Page information segment for a page that was never registered.
    #[error("Segment {segment}: page information for unknown page {page}")]
    UnknownPage {
        /// Segment number.
        segment: u32,
        /// Page association.
        page: u32,
    },

    /// Page dimensions requested before its page information was read.
    #[error("Page {0}: bitmap dimensions are not known")]
    PageDimensionsUnknown(u32),

    /// Region segment for a page whose page information has not been read.
    #[error("Segment {segment}: region on page {page} precedes its page information")]
    MissingPageInformation {
        /// Segment number.
        segment: u32,
        /// Page association.
        page: u32,
    },
}

/// Result type for JBIG2 operations.
pub type Result<T> = std::result::Result<T, Jbig2Error>;
