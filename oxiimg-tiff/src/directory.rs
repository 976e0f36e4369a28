//! TIFF Image File Directory reader.
//!
//! ```text
//! Header:  byte order (2) │ 42 (2) │ first IFD offset (4)
//! IFD:     entry count (2) │ entries (12 each) │ next IFD offset (4)
//! Entry:   tag (2) │ type (2) │ count (4) │ value or offset (4)
//! ```

use crate::error::{Result, TiffError};
use crate::field::{FieldValues, TiffField};
use crate::types::FieldType;
use log::warn;
use oxiimg_core::{ByteOrder, EndianReader};
use std::collections::{BTreeSet, HashMap};
use std::io::{Read, Seek, SeekFrom};

/// Size of one IFD entry.
pub const ENTRY_SIZE: u64 = 12;

/// TIFF version word.
pub const TIFF_VERSION: u16 = 42;

const LITTLE_ENDIAN_MARKER: [u8; 2] = *b"II";
const BIG_ENDIAN_MARKER: [u8; 2] = *b"MM";

/// One parsed IFD.
#[derive(Debug, Clone)]
pub struct TiffDirectory {
    byte_order: ByteOrder,
    ifd_offset: u64,
    next_ifd_offset: u64,
    fields: Vec<TiffField>,
    by_tag: HashMap<u16, usize>,
}

impl TiffDirectory {
    /// Read directory `index` (0-based) of the TIFF stream in `source`.
    ///
    /// The position of `source` is restored afterwards.
    pub fn read<R: Read + Seek>(source: &mut R, index: usize) -> Result<Self> {
        with_restored_position(source, |src| {
            let first = read_header(src)?;
            Self::walk_and_parse(src, first, index)
        })
    }

    /// Read directory `index` counting from the IFD at `ifd_offset` instead of
    /// the first one. The byte order still comes from the file header.
    pub fn read_at<R: Read + Seek>(source: &mut R, ifd_offset: u64, index: usize) -> Result<Self> {
        with_restored_position(source, |src| {
            read_header(src)?;
            Self::walk_and_parse(src, ifd_offset, index)
        })
    }

    /// Number of directories in the IFD chain.
    pub fn count_directories<R: Read + Seek>(source: &mut R) -> Result<usize> {
        with_restored_position(source, |src| {
            let mut offset = read_header(src)?;
            let mut seen = BTreeSet::new();
            while offset != 0 && seen.insert(offset) {
                offset = next_offset(src, offset)?;
            }
            Ok(seen.len())
        })
    }

    fn walk_and_parse<R: Read + Seek>(
        src: &mut EndianReader<R>,
        mut offset: u64,
        index: usize,
    ) -> Result<Self> {
        for skipped in 0..index {
            offset = next_offset(src, offset)?;
            if offset == 0 {
                return Err(TiffError::DirectoryIndexOutOfRange {
                    index,
                    available: skipped + 1,
                });
            }
        }
        Self::parse(src, offset)
    }

    fn parse<R: Read + Seek>(src: &mut EndianReader<R>, ifd_offset: u64) -> Result<Self> {
        let order = src.order();
        let len = src.len()?;
        src.seek_to(ifd_offset)?;
        let entry_count = src.read_u16()?;

        let mut directory = Self {
            byte_order: order,
            ifd_offset,
            next_ifd_offset: 0,
            fields: Vec::with_capacity(entry_count as usize),
            by_tag: HashMap::new(),
        };

        for i in 0..entry_count {
            let entry_start = src.position()?;
            if len.saturating_sub(entry_start) < ENTRY_SIZE {
                warn!("TIFF IFD at {ifd_offset}: truncated after {i} of {entry_count} entries");
                // Leave no next-IFD offset to follow.
                src.seek_to(len)?;
                break;
            }
            if let Some(field) = read_entry(src, entry_start, len)? {
                directory.insert(field);
            }
            src.seek_to(entry_start + ENTRY_SIZE)?;
        }

        directory.next_ifd_offset = src.read_u32().map(u64::from).unwrap_or(0);
        Ok(directory)
    }

    fn insert(&mut self, field: TiffField) {
        match self.by_tag.get(&field.tag()) {
            Some(&slot) => self.fields[slot] = field,
            None => {
                self.by_tag.insert(field.tag(), self.fields.len());
                self.fields.push(field);
            }
        }
    }

    /// Byte order of the file.
    pub fn byte_order(&self) -> ByteOrder {
        self.byte_order
    }

    /// Whether the file is big-endian (`MM`).
    pub fn is_big_endian(&self) -> bool {
        self.byte_order.is_big_endian()
    }

    /// Offset of this IFD.
    pub fn ifd_offset(&self) -> u64 {
        self.ifd_offset
    }

    /// Offset of the next IFD, 0 if this is the last one.
    pub fn next_ifd_offset(&self) -> u64 {
        self.next_ifd_offset
    }

    /// Fields in file order.
    pub fn fields(&self) -> &[TiffField] {
        &self.fields
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the directory has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Field with `tag`.
    pub fn field(&self, tag: u16) -> Option<&TiffField> {
        self.by_tag.get(&tag).map(|&slot| &self.fields[slot])
    }

    /// Whether a field with `tag` is present.
    pub fn contains(&self, tag: u16) -> bool {
        self.by_tag.contains_key(&tag)
    }

    /// Tags in file order.
    pub fn tags(&self) -> impl Iterator<Item = u16> + '_ {
        self.fields.iter().map(TiffField::tag)
    }

    /// Integer value `index` of field `tag`, if present and integer-typed.
    pub fn field_as_long(&self, tag: u16, index: usize) -> Option<i64> {
        self.field(tag).and_then(|f| f.as_long(index).ok())
    }

    /// Numeric value `index` of field `tag`, if present and numeric.
    pub fn field_as_double(&self, tag: u16, index: usize) -> Option<f64> {
        self.field(tag).and_then(|f| f.as_double(index).ok())
    }
}

fn with_restored_position<R, T>(
    source: &mut R,
    body: impl FnOnce(&mut EndianReader<&mut R>) -> Result<T>,
) -> Result<T>
where
    R: Read + Seek,
{
    let saved = source.stream_position()?;
    let result = {
        let mut reader = EndianReader::new(&mut *source, ByteOrder::BigEndian);
        body(&mut reader)
    };
    source.seek(SeekFrom::Start(saved))?;
    result
}

/// Validate the file header and return the first IFD offset.
fn read_header<R: Read + Seek>(src: &mut EndianReader<R>) -> Result<u64> {
    src.seek_to(0)?;
    let marker = src.read_array::<2>()?;
    let order = match marker {
        LITTLE_ENDIAN_MARKER => ByteOrder::LittleEndian,
        BIG_ENDIAN_MARKER => ByteOrder::BigEndian,
        _ => return Err(TiffError::InvalidByteOrder(u16::from_be_bytes(marker))),
    };
    src.set_order(order);

    let version = src.read_u16()?;
    if version != TIFF_VERSION {
        return Err(TiffError::InvalidVersion(version));
    }
    Ok(src.read_u32()? as u64)
}

/// Offset of the IFD following the one at `offset`.
fn next_offset<R: Read + Seek>(src: &mut EndianReader<R>, offset: u64) -> Result<u64> {
    src.seek_to(offset)?;
    let entries = src.read_u16()? as u64;
    src.skip(entries * ENTRY_SIZE)?;
    Ok(src.read_u32()? as u64)
}

/// Parse the entry at `entry_start`; `None` if it has to be skipped.
fn read_entry<R: Read + Seek>(
    src: &mut EndianReader<R>,
    entry_start: u64,
    len: u64,
) -> Result<Option<TiffField>> {
    let tag = src.read_u16()?;
    let type_code = src.read_u16()?;
    let count = src.read_u32()? as u64;

    let Some(field_type) = FieldType::from_code(type_code) else {
        warn!("TIFF tag {tag} at {entry_start}: unknown field type {type_code}, entry skipped");
        return Ok(None);
    };

    let size = count * field_type.size();
    if size > 4 {
        let value_offset = src.read_u32()? as u64;
        if value_offset >= len || size > len - value_offset {
            warn!("TIFF tag {tag}: {size} bytes at {value_offset} lie outside the file, skipped");
            return Ok(None);
        }
        src.seek_to(value_offset)?;
    }

    let bytes = src.read_bytes(size)?;
    let values = FieldValues::decode(field_type, count as usize, &bytes, src.order());
    Ok(Some(TiffField::new(tag, values)))
}
