//! Pages and their segment sets.

use crate::error::{Jbig2Error, Result};
use crate::segment::Segment;
use std::collections::{BTreeMap, BTreeSet};
use std::io::Write;

/// Per-page bookkeeping owned by the reader.
#[derive(Debug, Clone, Default)]
pub(crate) struct PageRecord {
    pub(crate) number: u32,
    pub(crate) width: Option<u32>,
    pub(crate) height: Option<u32>,
    pub(crate) segments: BTreeSet<u32>,
}

impl PageRecord {
    pub(crate) fn new(number: u32) -> Self {
        Self {
            number,
            ..Self::default()
        }
    }

    pub(crate) fn has_dimensions(&self) -> bool {
        self.width.is_some() && self.height.is_some()
    }
}

/// A page of a JBIG2 stream, borrowed from its [`Jbig2Reader`](crate::Jbig2Reader).
#[derive(Debug, Clone, Copy)]
pub struct Page<'a> {
    record: &'a PageRecord,
    all_segments: &'a BTreeMap<u32, Segment>,
}

impl<'a> Page<'a> {
    pub(crate) fn new(record: &'a PageRecord, all_segments: &'a BTreeMap<u32, Segment>) -> Self {
        Self {
            record,
            all_segments,
        }
    }

    /// Page number (1-based).
    pub fn number(&self) -> u32 {
        self.record.number
    }

    /// Page bitmap width from the page information segment.
    pub fn width(&self) -> Result<u32> {
        self.record
            .width
            .ok_or(Jbig2Error::PageDimensionsUnknown(self.record.number))
    }

    /// Page bitmap height from the page information segment.
    pub fn height(&self) -> Result<u32> {
        self.record
            .height
            .ok_or(Jbig2Error::PageDimensionsUnknown(self.record.number))
    }

    /// Number of segments associated with this page.
    pub fn segment_count(&self) -> usize {
        self.record.segments.len()
    }

    /// Segments of this page in segment-number order.
    pub fn segments(&self) -> impl Iterator<Item = &'a Segment> + 'a {
        let all = self.all_segments;
        self.record
            .segments
            .iter()
            .filter_map(move |number| all.get(number))
    }

    /// Write the page's segments, headers and bodies, to `sink`.
    ///
    /// With `for_embedding`, end-of-page and end-of-file segments are left out
    /// and every header is rewritten to page 1.
    pub fn write_to<W: Write>(&self, sink: &mut W, for_embedding: bool) -> std::io::Result<()> {
        for segment in self.segments() {
            if for_embedding && segment.segment_type().is_end_marker() {
                continue;
            }
            segment.write_to(sink, for_embedding)?;
        }
        Ok(())
    }

    /// The page's segments as one byte sequence.
    ///
    /// See [`write_to`](Self::write_to).
    pub fn data(&self, for_embedding: bool) -> Vec<u8> {
        let mut out = Vec::new();
        // Writing into a Vec cannot fail.
        let _ = self.write_to(&mut out, for_embedding);
        out
    }
}
