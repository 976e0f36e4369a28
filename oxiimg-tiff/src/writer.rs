//! Single-IFD TIFF writer and LZW strip compression.

use crate::directory::{ENTRY_SIZE, TIFF_VERSION};
use crate::error::{Result, TiffError};
use crate::field::TiffField;
use crate::tags;
use crate::types::FieldType;
use oxiimg_core::ByteOrder;
use oxiimg_lzw::predictor::difference_row;
use oxiimg_lzw::{LzwConfig, LzwEncoder, Predictor};
use std::collections::BTreeMap;
use std::io::Write;

/// Offset of the first (only) IFD.
const FIRST_IFD_OFFSET: u32 = 8;

#[derive(Debug, Clone)]
enum Entry {
    Field(TiffField),
    /// Strip payload stored out of line; the entry value is its offset.
    StripImage(Vec<u8>),
}

impl Entry {
    fn field_type(&self) -> FieldType {
        match self {
            Entry::Field(field) => field.field_type(),
            Entry::StripImage(_) => FieldType::Long,
        }
    }

    fn count(&self) -> usize {
        match self {
            Entry::Field(field) => field.values().entry_count(),
            Entry::StripImage(_) => 1,
        }
    }

    fn payload(&self, order: ByteOrder) -> Vec<u8> {
        match self {
            Entry::Field(field) => field.values().encode(order),
            Entry::StripImage(data) => data.clone(),
        }
    }

    fn is_inline(&self, payload_len: usize) -> bool {
        matches!(self, Entry::Field(_)) && payload_len <= 4
    }
}

/// Builds one IFD and writes it as a complete TIFF file.
///
/// Fields are kept in tag order; adding a field whose tag is already present
/// replaces it.
///
/// # Example
///
/// ```rust
/// use oxiimg_tiff::{DirectoryWriter, TiffDirectory, TiffField, tags};
/// use std::io::Cursor;
///
/// let mut writer = DirectoryWriter::new();
/// writer.add_field(TiffField::long(tags::IMAGE_WIDTH, vec![64u32]));
/// writer.add_field(TiffField::ascii(tags::SOFTWARE, "oxiimg"));
///
/// let mut file = Vec::new();
/// writer.write_file(&mut file).unwrap();
///
/// let dir = TiffDirectory::read(&mut Cursor::new(file), 0).unwrap();
/// assert_eq!(dir.field_as_long(tags::IMAGE_WIDTH, 0), Some(64));
/// ```
#[derive(Debug, Clone, Default)]
pub struct DirectoryWriter {
    byte_order: ByteOrder,
    entries: BTreeMap<u16, Entry>,
}

impl DirectoryWriter {
    /// Empty big-endian directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Write with `byte_order` instead of big-endian.
    pub fn with_byte_order(mut self, byte_order: ByteOrder) -> Self {
        self.byte_order = byte_order;
        self
    }

    /// Register a field.
    pub fn add_field(&mut self, field: TiffField) {
        self.entries.insert(field.tag(), Entry::Field(field));
    }

    /// Register the strip payload as the StripOffsets field.
    ///
    /// The payload is written after the IFD and the entry holds its offset.
    pub fn add_strip_image(&mut self, data: Vec<u8>) {
        self.entries.insert(tags::STRIP_OFFSETS, Entry::StripImage(data));
    }

    /// Number of registered fields.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no field is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Size of the IFD: entry count, entries and next-IFD offset.
    pub fn compute_ifd_size(&self) -> usize {
        6 + ENTRY_SIZE as usize * self.entries.len()
    }

    /// Write the header, the IFD and the out-of-line values.
    pub fn write_file<W: Write>(&self, mut sink: W) -> Result<()> {
        let order = self.byte_order;
        let mut head = Vec::with_capacity(8 + self.compute_ifd_size());
        head.extend_from_slice(match order {
            ByteOrder::BigEndian => b"MM",
            ByteOrder::LittleEndian => b"II",
        });
        order.put_u16(&mut head, TIFF_VERSION);
        order.put_u32(&mut head, FIRST_IFD_OFFSET);
        order.put_u16(&mut head, self.entries.len() as u16);

        let mut offset = FIRST_IFD_OFFSET as u64 + self.compute_ifd_size() as u64;
        let mut out_of_line = Vec::new();

        for (&tag, entry) in &self.entries {
            let mut payload = entry.payload(order);
            order.put_u16(&mut head, tag);
            order.put_u16(&mut head, entry.field_type().code());
            order.put_u32(&mut head, entry.count() as u32);

            if entry.is_inline(payload.len()) {
                payload.resize(4, 0);
                head.extend_from_slice(&payload);
            } else {
                let value_offset =
                    u32::try_from(offset).map_err(|_| TiffError::OffsetOverflow(offset))?;
                order.put_u32(&mut head, value_offset);
                if payload.len() % 2 == 1 {
                    payload.push(0);
                }
                offset += payload.len() as u64;
                out_of_line.push(payload);
            }
        }
        order.put_u32(&mut head, 0);

        sink.write_all(&head)?;
        for payload in &out_of_line {
            sink.write_all(payload)?;
        }
        sink.flush()?;
        Ok(())
    }
}

/// LZW-compress strip data for a TIFF file.
///
/// Without a predictor the whole of `data` is compressed. With
/// [`Predictor::HorizontalDifferencing`] the first `height` rows of `stride`
/// bytes are differenced per sample before compression; bytes past them are
/// not part of any row and are left out. Returns the sink.
pub fn compress_lzw<W: Write>(
    sink: W,
    predictor: Predictor,
    data: &[u8],
    height: usize,
    samples_per_pixel: usize,
    stride: usize,
) -> Result<W> {
    let mut encoder = LzwEncoder::new(sink, LzwConfig::TIFF)?;
    match predictor {
        Predictor::HorizontalDifferencing if stride > 0 => {
            let mut row = Vec::with_capacity(stride);
            for chunk in data.chunks(stride).take(height) {
                row.clear();
                row.extend_from_slice(chunk);
                difference_row(&mut row, samples_per_pixel);
                encoder.compress(&row)?;
            }
        }
        _ => encoder.compress(data)?,
    }
    Ok(encoder.finish()?)
}
