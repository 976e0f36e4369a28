//! JBIG2 segment stream reader.

use crate::error::{Jbig2Error, Result};
use crate::page::{Page, PageRecord};
use crate::segment::{Segment, SegmentType};
use log::{debug, trace, warn};
use oxiimg_core::{ByteOrder, EndianReader, OxiImgError};
use std::collections::{BTreeMap, BTreeSet};
use std::io::{Read, Seek, Write};

/// Standalone file ID string.
pub const FILE_HEADER_ID: [u8; 8] = [0x97, 0x4A, 0x42, 0x32, 0x0D, 0x0A, 0x1A, 0x0A];

const FLAG_SEQUENTIAL: u8 = 0x01;
const FLAG_PAGE_COUNT_UNKNOWN: u8 = 0x02;
const FLAGS_RESERVED: u8 = 0xFC;

/// Standalone file organization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Organization {
    /// Each segment header is directly followed by its body.
    Sequential,
    /// All segment headers come first, then all bodies in the same order.
    RandomAccess,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReadState {
    Unread,
    Done,
}

/// Reads a JBIG2 segment stream and groups its segments by page.
///
/// [`read`](Self::read) consumes the whole stream once; the parsed segments
/// are then available through [`page`](Self::page),
/// [`segments`](Self::segments) and [`globals`](Self::globals).
///
/// # Example
///
/// ```rust
/// use oxiimg_jbig2::Jbig2Reader;
/// use std::io::Cursor;
///
/// // An embedded stream holding one page information segment.
/// let mut stream = vec![0, 0, 0, 0, 0x30, 0x00, 1, 0, 0, 0, 19];
/// stream.extend_from_slice(&64u32.to_be_bytes());
/// stream.extend_from_slice(&48u32.to_be_bytes());
/// stream.extend_from_slice(&[0; 11]);
/// let mut reader = Jbig2Reader::embedded(Cursor::new(stream));
/// reader.read().unwrap();
///
/// let page = reader.page(1).unwrap();
/// assert_eq!(page.width().unwrap(), 64);
/// assert_eq!(page.height().unwrap(), 48);
/// assert!(reader.globals(true).is_none());
/// ```
#[derive(Debug)]
pub struct Jbig2Reader<R> {
    src: EndianReader<R>,
    /// Whether the stream starts with a file header.
    standalone: bool,
    organization: Option<Organization>,
    number_of_pages: Option<u32>,
    state: ReadState,
    segments: BTreeMap<u32, Segment>,
    pages: BTreeMap<u32, PageRecord>,
    globals: BTreeSet<u32>,
}

impl<R: Read + Seek> Jbig2Reader<R> {
    /// Reader for a standalone JBIG2 file (with file header).
    pub fn new(source: R) -> Self {
        Self::with_layout(source, true, None)
    }

    /// Reader for a header-less sequential segment stream, as found inside
    /// other containers.
    pub fn embedded(source: R) -> Self {
        Self::with_layout(source, false, Some(Organization::Sequential))
    }

    fn with_layout(source: R, standalone: bool, organization: Option<Organization>) -> Self {
        Self {
            src: EndianReader::new(source, ByteOrder::BigEndian),
            standalone,
            organization,
            number_of_pages: None,
            state: ReadState::Unread,
            segments: BTreeMap::new(),
            pages: BTreeMap::new(),
            globals: BTreeSet::new(),
        }
    }

    /// Parse the whole stream. May be called only once.
    pub fn read(&mut self) -> Result<()> {
        if self.state == ReadState::Done {
            return Err(Jbig2Error::AlreadyRead);
        }
        self.state = ReadState::Done;

        if self.standalone {
            self.read_file_header()?;
        }
        match self.organization {
            Some(Organization::RandomAccess) => self.read_random_access(),
            _ => self.read_sequential(),
        }
    }

    fn read_file_header(&mut self) -> Result<()> {
        let id = self.src.read_array::<8>()?;
        if id != FILE_HEADER_ID {
            return Err(OxiImgError::invalid_magic(FILE_HEADER_ID, id).into());
        }

        let flags = self.src.read_u8()?;
        if flags & FLAGS_RESERVED != 0 {
            return Err(Jbig2Error::InvalidFileFlags(flags));
        }
        self.organization = Some(if flags & FLAG_SEQUENTIAL != 0 {
            Organization::Sequential
        } else {
            Organization::RandomAccess
        });
        if flags & FLAG_PAGE_COUNT_UNKNOWN == 0 {
            self.number_of_pages = Some(self.src.read_u32()?);
        }

        trace!(
            "JBIG2 file: {:?}, {:?} pages",
            self.organization, self.number_of_pages
        );
        Ok(())
    }

    fn read_sequential(&mut self) -> Result<()> {
        while self.src.remaining()? > 0 {
            let mut segment = Segment::read_header(&mut self.src)?;
            self.register(&segment);
            self.read_body(&mut segment)?;
            self.segments.insert(segment.number, segment);
        }
        Ok(())
    }

    fn read_random_access(&mut self) -> Result<()> {
        let mut headers = BTreeMap::new();
        while self.src.remaining()? > 0 {
            let segment = Segment::read_header(&mut self.src)?;
            self.register(&segment);
            let end_of_file = segment.segment_type == SegmentType::EndOfFile;
            headers.insert(segment.number, segment);
            if end_of_file {
                break;
            }
        }

        for (number, mut segment) in headers {
            self.read_body(&mut segment)?;
            self.segments.insert(number, segment);
        }
        Ok(())
    }

    fn register(&mut self, segment: &Segment) {
        if segment.page > 0 {
            self.pages
                .entry(segment.page)
                .or_insert_with(|| PageRecord::new(segment.page))
                .segments
                .insert(segment.number);
        } else {
            self.globals.insert(segment.number);
        }
    }

    fn read_body(&mut self, segment: &mut Segment) -> Result<()> {
        if segment.segment_type.is_region() && segment.page > 0 {
            let known = self
                .pages
                .get(&segment.page)
                .is_some_and(PageRecord::has_dimensions);
            if !known {
                return Err(Jbig2Error::MissingPageInformation {
                    segment: segment.number,
                    page: segment.page,
                });
            }
        }

        let Some(len) = segment.data_length else {
            warn!(
                "JBIG2 segment {}: unknown data length is not supported, body skipped",
                segment.number
            );
            return Ok(());
        };

        let offset = self.src.position()?;
        if len as u64 > self.src.remaining()? {
            return Err(OxiImgError::corrupted(
                offset,
                format!(
                    "segment {} declares {} data bytes past end of stream",
                    segment.number, len
                ),
            )
            .into());
        }
        segment.data = self.src.read_bytes(len as u64)?;

        if segment.segment_type == SegmentType::PageInformation {
            self.apply_page_information(segment, offset)?;
        }
        Ok(())
    }

    /// Record the page bitmap size from a page information body.
    fn apply_page_information(&mut self, segment: &Segment, offset: u64) -> Result<()> {
        let Some(dims) = segment.data.first_chunk::<8>() else {
            return Err(OxiImgError::corrupted(
                offset,
                format!("page information segment {} is too short", segment.number),
            )
            .into());
        };
        let width = u32::from_be_bytes([dims[0], dims[1], dims[2], dims[3]]);
        let height = u32::from_be_bytes([dims[4], dims[5], dims[6], dims[7]]);

        let page = self
            .pages
            .get_mut(&segment.page)
            .ok_or(Jbig2Error::UnknownPage {
                segment: segment.number,
                page: segment.page,
            })?;
        page.width = Some(width);
        page.height = Some(height);
        trace!("JBIG2 page {}: {}x{}", segment.page, width, height);
        Ok(())
    }

    /// Consume the reader and return the underlying source.
    pub fn into_inner(self) -> R {
        self.src.into_inner()
    }
}

impl<R> Jbig2Reader<R> {
    /// File organization; `None` for a standalone file not read yet.
    pub fn organization(&self) -> Option<Organization> {
        self.organization
    }

    /// Page count declared in the file header, if any.
    pub fn number_of_pages(&self) -> Option<u32> {
        self.number_of_pages
    }

    /// Number of distinct pages seen.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Page by number.
    pub fn page(&self, number: u32) -> Option<Page<'_>> {
        self.pages
            .get(&number)
            .map(|record| Page::new(record, &self.segments))
    }

    /// All pages in page-number order.
    pub fn pages(&self) -> impl Iterator<Item = Page<'_>> {
        self.pages
            .values()
            .map(|record| Page::new(record, &self.segments))
    }

    /// Segment by number.
    pub fn segment(&self, number: u32) -> Option<&Segment> {
        self.segments.get(&number)
    }

    /// All segments in segment-number order.
    pub fn segments(&self) -> impl Iterator<Item = &Segment> {
        self.segments.values()
    }

    /// Write the global (page 0) segments to `sink`, returning the byte count.
    ///
    /// With `for_embedding`, end-of-page and end-of-file segments are left out.
    /// Page associations are not rewritten.
    pub fn write_globals<W: Write>(
        &self,
        sink: &mut W,
        for_embedding: bool,
    ) -> std::io::Result<usize> {
        let mut written = 0;
        for segment in self.globals.iter().filter_map(|n| self.segments.get(n)) {
            if for_embedding && segment.segment_type().is_end_marker() {
                continue;
            }
            segment.write_to(sink, false)?;
            written += segment.header().len() + segment.data().len();
        }
        Ok(written)
    }

    /// The global segments as one byte sequence, or `None` if there are none.
    ///
    /// Write failures are logged and reported as `None`.
    pub fn globals(&self, for_embedding: bool) -> Option<Vec<u8>> {
        let mut out = Vec::new();
        match self.write_globals(&mut out, for_embedding) {
            Ok(0) => None,
            Ok(_) => Some(out),
            Err(err) => {
                debug!("JBIG2 global segment export failed: {err}");
                None
            }
        }
    }
}
