//! JBIG2 segment headers.
//!
//! A segment header is laid out as:
//!
//! ```text
//! ┌────────────┬───────┬──────────────────────┬──────────────┬──────┬─────────────┐
//! │ number (4) │ flags │ referred-to count +  │ referred-to  │ page │ data length │
//! │            │ (1)   │ retention (1 or 4+n) │ numbers      │ 1/4  │ (4)         │
//! └────────────┴───────┴──────────────────────┴──────────────┴──────┴─────────────┘
//! ```
//!
//! The raw header bytes are kept so a segment can be re-emitted verbatim, with
//! only the page association patched when embedding.

use crate::error::{Jbig2Error, Result};
use log::trace;
use oxiimg_core::{EndianReader, OxiImgError};
use std::io::{Read, Seek, Write};

/// Data length value meaning "determined by scanning the body".
pub const UNKNOWN_DATA_LENGTH: u32 = 0xFFFF_FFFF;

/// Segment type (bits 0-5 of the segment header flags).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SegmentType {
    /// Symbol dictionary (0).
    SymbolDictionary,
    /// Intermediate text region (4).
    IntermediateTextRegion,
    /// Immediate text region (6).
    ImmediateTextRegion,
    /// Immediate lossless text region (7).
    ImmediateLosslessTextRegion,
    /// Pattern dictionary (16).
    PatternDictionary,
    /// Intermediate halftone region (20).
    IntermediateHalftoneRegion,
    /// Immediate halftone region (22).
    ImmediateHalftoneRegion,
    /// Immediate lossless halftone region (23).
    ImmediateLosslessHalftoneRegion,
    /// Intermediate generic region (36).
    IntermediateGenericRegion,
    /// Immediate generic region (38).
    ImmediateGenericRegion,
    /// Immediate lossless generic region (39).
    ImmediateLosslessGenericRegion,
    /// Intermediate generic refinement region (40).
    IntermediateGenericRefinementRegion,
    /// Immediate generic refinement region (42).
    ImmediateGenericRefinementRegion,
    /// Immediate lossless generic refinement region (43).
    ImmediateLosslessGenericRefinementRegion,
    /// Page information (48).
    PageInformation,
    /// End of page (49).
    EndOfPage,
    /// End of stripe (50).
    EndOfStripe,
    /// End of file (51).
    EndOfFile,
    /// Profiles (52).
    Profiles,
    /// Tables (53).
    Tables,
    /// Colour palette (54).
    ColourPalette,
    /// Extension (62).
    Extension,
    /// Any other value.
    Reserved(u8),
}

impl SegmentType {
    /// Decode the six-bit type field.
    pub fn from_type_value(value: u8) -> Self {
        match value {
            0 => Self::SymbolDictionary,
            4 => Self::IntermediateTextRegion,
            6 => Self::ImmediateTextRegion,
            7 => Self::ImmediateLosslessTextRegion,
            16 => Self::PatternDictionary,
            20 => Self::IntermediateHalftoneRegion,
            22 => Self::ImmediateHalftoneRegion,
            23 => Self::ImmediateLosslessHalftoneRegion,
            36 => Self::IntermediateGenericRegion,
            38 => Self::ImmediateGenericRegion,
            39 => Self::ImmediateLosslessGenericRegion,
            40 => Self::IntermediateGenericRefinementRegion,
            42 => Self::ImmediateGenericRefinementRegion,
            43 => Self::ImmediateLosslessGenericRefinementRegion,
            48 => Self::PageInformation,
            49 => Self::EndOfPage,
            50 => Self::EndOfStripe,
            51 => Self::EndOfFile,
            52 => Self::Profiles,
            53 => Self::Tables,
            54 => Self::ColourPalette,
            62 => Self::Extension,
            other => Self::Reserved(other),
        }
    }

    /// The six-bit type field value.
    pub fn type_value(self) -> u8 {
        match self {
            Self::SymbolDictionary => 0,
            Self::IntermediateTextRegion => 4,
            Self::ImmediateTextRegion => 6,
            Self::ImmediateLosslessTextRegion => 7,
            Self::PatternDictionary => 16,
            Self::IntermediateHalftoneRegion => 20,
            Self::ImmediateHalftoneRegion => 22,
            Self::ImmediateLosslessHalftoneRegion => 23,
            Self::IntermediateGenericRegion => 36,
            Self::ImmediateGenericRegion => 38,
            Self::ImmediateLosslessGenericRegion => 39,
            Self::IntermediateGenericRefinementRegion => 40,
            Self::ImmediateGenericRefinementRegion => 42,
            Self::ImmediateLosslessGenericRefinementRegion => 43,
            Self::PageInformation => 48,
            Self::EndOfPage => 49,
            Self::EndOfStripe => 50,
            Self::EndOfFile => 51,
            Self::Profiles => 52,
            Self::Tables => 53,
            Self::ColourPalette => 54,
            Self::Extension => 62,
            Self::Reserved(value) => value,
        }
    }

    /// Whether segments of this type paint into a page bitmap.
    pub fn is_region(self) -> bool {
        matches!(
            self,
            Self::IntermediateTextRegion
                | Self::ImmediateTextRegion
                | Self::ImmediateLosslessTextRegion
                | Self::IntermediateHalftoneRegion
                | Self::ImmediateHalftoneRegion
                | Self::ImmediateLosslessHalftoneRegion
                | Self::IntermediateGenericRegion
                | Self::ImmediateGenericRegion
                | Self::ImmediateLosslessGenericRegion
                | Self::IntermediateGenericRefinementRegion
                | Self::ImmediateGenericRefinementRegion
                | Self::ImmediateLosslessGenericRefinementRegion
        )
    }

    /// End-of-page and end-of-file markers, dropped when embedding.
    pub fn is_end_marker(self) -> bool {
        matches!(self, Self::EndOfPage | Self::EndOfFile)
    }
}

/// A segment: parsed header fields plus the raw header and body bytes.
#[derive(Debug, Clone)]
pub struct Segment {
    pub(crate) number: u32,
    pub(crate) segment_type: SegmentType,
    pub(crate) deferred_non_retain: bool,
    pub(crate) retain_self: bool,
    pub(crate) referred_to: Vec<u32>,
    pub(crate) retention_flags: Vec<bool>,
    pub(crate) page: u32,
    /// Whether the page association field is four bytes wide.
    pub(crate) long_page_association: bool,
    /// Offset of the page association field within `header`.
    pub(crate) page_association_offset: usize,
    pub(crate) data_length: Option<u32>,
    pub(crate) header: Vec<u8>,
    pub(crate) data: Vec<u8>,
}

impl Segment {
    /// Segment number.
    pub fn number(&self) -> u32 {
        self.number
    }

    /// Segment type.
    pub fn segment_type(&self) -> SegmentType {
        self.segment_type
    }

    /// Deferred non-retain flag (bit 7 of the header flags).
    pub fn deferred_non_retain(&self) -> bool {
        self.deferred_non_retain
    }

    /// Retention bit for this segment itself.
    pub fn retain_self(&self) -> bool {
        self.retain_self
    }

    /// Numbers of the segments this one refers to, in header order.
    pub fn referred_to(&self) -> &[u32] {
        &self.referred_to
    }

    /// Retention bits, one per referred-to segment.
    pub fn retention_flags(&self) -> &[bool] {
        &self.retention_flags
    }

    /// Page association; 0 for global segments.
    pub fn page(&self) -> u32 {
        self.page
    }

    /// Whether the segment belongs to no page.
    pub fn is_global(&self) -> bool {
        self.page == 0
    }

    /// Declared body length, `None` for the unknown-length sentinel.
    pub fn data_length(&self) -> Option<u32> {
        self.data_length
    }

    /// Raw header bytes as read.
    pub fn header(&self) -> &[u8] {
        &self.header
    }

    /// Raw body bytes (empty when the length was unknown).
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Write header and body to `sink`.
    ///
    /// With `for_embedding`, the page association inside the header is set to
    /// page 1 in its original width.
    pub fn write_to<W: Write>(&self, sink: &mut W, for_embedding: bool) -> std::io::Result<()> {
        if for_embedding {
            let mut header = self.header.clone();
            let at = self.page_association_offset;
            let page_one: &[u8] = if self.long_page_association {
                &[0, 0, 0, 1]
            } else {
                &[1]
            };
            if let Some(field) = header.get_mut(at..at + page_one.len()) {
                field.copy_from_slice(page_one);
            }
            sink.write_all(&header)?;
        } else {
            sink.write_all(&self.header)?;
        }
        sink.write_all(&self.data)
    }

    /// Parse a segment header at the current position.
    ///
    /// The body is not read; the source is left right after the header.
    pub(crate) fn read_header<R: Read + Seek>(src: &mut EndianReader<R>) -> Result<Self> {
        let start = src.position()?;
        let number = src.read_u32()?;

        let flags = src.read_u8()?;
        let deferred_non_retain = flags & 0x80 != 0;
        let long_page_association = flags & 0x40 != 0;
        let segment_type = SegmentType::from_type_value(flags & 0x3F);

        let referred_size: u64 = match number {
            0..=256 => 1,
            257..=65536 => 2,
            _ => 4,
        };

        let count_field = src.read_u8()?;
        let (retain_self, retention_flags): (bool, Vec<bool>) = match count_field >> 5 {
            short @ 0..=4 => {
                let bits = count_field & 0x1F;
                let flags = (1..=short).map(|i| bits & (1 << i) != 0).collect();
                (bits & 1 != 0, flags)
            }
            7 => {
                src.seek_to(start + 5)?;
                let count = (src.read_u32()? & 0x1FFF_FFFF) as u64;
                let flag_bytes = (count + 1).div_ceil(8);
                let needed = flag_bytes + count * referred_size;
                if needed > src.remaining()? {
                    return Err(OxiImgError::corrupted(
                        start,
                        format!("segment {number} refers to {count} segments past end of stream"),
                    )
                    .into());
                }
                let bytes = src.read_bytes(flag_bytes)?;
                let bit = |i: u64| bytes[(i / 8) as usize] & (1 << (i % 8)) != 0;
                (bit(0), (1..=count).map(bit).collect())
            }
            value => {
                return Err(Jbig2Error::ReservedReferredToCount {
                    segment: number,
                    value,
                });
            }
        };

        let mut referred_to = Vec::with_capacity(retention_flags.len());
        for _ in 0..retention_flags.len() {
            let referred = match referred_size {
                1 => src.read_u8()? as u32,
                2 => src.read_u16()? as u32,
                _ => src.read_u32()?,
            };
            referred_to.push(referred);
        }

        let page_association_offset = (src.position()? - start) as usize;
        let page = if long_page_association {
            src.read_u32()?
        } else {
            src.read_u8()? as u32
        };
        if page > i32::MAX as u32 {
            return Err(Jbig2Error::InvalidPageAssociation {
                segment: number,
                page,
            });
        }

        let data_length = match src.read_u32()? {
            UNKNOWN_DATA_LENGTH => None,
            len => Some(len),
        };

        let end = src.position()?;
        src.seek_to(start)?;
        let header = src.read_bytes(end - start)?;

        trace!("JBIG2 segment {number} ({segment_type:?}): page {page}, refs {referred_to:?}");

        Ok(Self {
            number,
            segment_type,
            deferred_non_retain,
            retain_self,
            referred_to,
            retention_flags,
            page,
            long_page_association,
            page_association_offset,
            data_length,
            header,
            data: Vec::new(),
        })
    }
}
