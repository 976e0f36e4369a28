//! Integration tests for the TIFF directory reader and writer.

use oxiimg_core::ByteOrder;
use oxiimg_lzw::{LzwDecoder, Predictor};
use oxiimg_tiff::{
    DirectoryWriter, FieldType, FieldValues, TiffDirectory, TiffError, TiffField, compress_lzw,
    tags,
};
use std::io::Cursor;

fn every_type() -> Vec<TiffField> {
    vec![
        TiffField::new(1000, FieldValues::Byte(vec![1, 2, 3, 4, 5, 6])),
        TiffField::new(
            1001,
            FieldValues::Ascii(vec!["first".to_string(), "second".to_string()]),
        ),
        TiffField::new(1002, FieldValues::Short(vec![1, 0xFFFF])),
        TiffField::new(1003, FieldValues::Long(vec![0xDEAD_BEEF, 7, 8])),
        TiffField::new(1004, FieldValues::Rational(vec![[72, 1], [300, 2]])),
        TiffField::new(1005, FieldValues::SByte(vec![-1, 2, -3])),
        TiffField::new(1006, FieldValues::Undefined(vec![0xAA; 9])),
        TiffField::new(1007, FieldValues::SShort(vec![-300])),
        TiffField::new(1008, FieldValues::SLong(vec![-70_000, 70_000])),
        TiffField::new(1009, FieldValues::SRational(vec![[-1, 3]])),
        TiffField::new(1010, FieldValues::Float(vec![0.5])),
        TiffField::new(1011, FieldValues::Double(vec![-2.25, 1e100])),
    ]
}

fn write(writer: &DirectoryWriter) -> Vec<u8> {
    let mut file = Vec::new();
    writer.write_file(&mut file).unwrap();
    file
}

/// Big-endian chain of one-entry IFDs, each holding ImageWidth = `widths[i]`.
/// `last_next` is the next-IFD offset of the final directory.
fn chain(widths: &[u16], last_next: u32) -> Vec<u8> {
    let mut data = b"MM\0\x2A\0\0\0\x08".to_vec();
    for (i, &width) in widths.iter().enumerate() {
        data.extend_from_slice(&1u16.to_be_bytes());
        data.extend_from_slice(&[1, 0, 0, 3, 0, 0, 0, 1]);
        data.extend_from_slice(&width.to_be_bytes());
        data.extend_from_slice(&[0, 0]);
        let next = if i + 1 == widths.len() {
            last_next
        } else {
            data.len() as u32 + 4
        };
        data.extend_from_slice(&next.to_be_bytes());
    }
    data
}

#[test]
fn test_every_type_both_orders() {
    for order in [ByteOrder::BigEndian, ByteOrder::LittleEndian] {
        let mut writer = DirectoryWriter::new().with_byte_order(order);
        for field in every_type() {
            writer.add_field(field);
        }
        let file = write(&writer);

        let dir = TiffDirectory::read(&mut Cursor::new(&file), 0).unwrap();
        assert_eq!(dir.byte_order(), order);
        assert_eq!(dir.len(), 12);
        for expected in every_type() {
            let field = dir.field(expected.tag()).unwrap();
            assert_eq!(field, &expected, "tag {} in {order:?}", expected.tag());
        }
    }
}

#[test]
fn test_accessors_after_roundtrip() {
    let mut writer = DirectoryWriter::new().with_byte_order(ByteOrder::LittleEndian);
    writer.add_field(TiffField::rational(tags::X_RESOLUTION, vec![[300u32, 1]]));
    writer.add_field(TiffField::short(tags::BITS_PER_SAMPLE, vec![8u16, 8, 8]));
    writer.add_field(TiffField::ascii(tags::SOFTWARE, "oxiimg"));
    let file = write(&writer);

    let dir = TiffDirectory::read(&mut Cursor::new(file), 0).unwrap();
    assert_eq!(dir.field_as_double(tags::X_RESOLUTION, 0), Some(300.0));
    assert_eq!(dir.field_as_long(tags::X_RESOLUTION, 0), None);
    assert_eq!(dir.field_as_long(tags::BITS_PER_SAMPLE, 2), Some(8));
    assert_eq!(dir.field_as_long(tags::BITS_PER_SAMPLE, 3), None);

    let software = dir.field(tags::SOFTWARE).unwrap();
    assert_eq!(software.field_type(), FieldType::Ascii);
    assert_eq!(software.as_ascii(0).unwrap(), "oxiimg");
    assert_eq!(
        dir.tags().collect::<Vec<_>>(),
        vec![tags::BITS_PER_SAMPLE, tags::X_RESOLUTION, tags::SOFTWARE]
    );
}

#[test]
fn test_multiple_directories() {
    let file = chain(&[10, 20, 30], 0);
    let mut cursor = Cursor::new(file);

    assert_eq!(TiffDirectory::count_directories(&mut cursor).unwrap(), 3);
    for (index, width) in [10, 20, 30].into_iter().enumerate() {
        let dir = TiffDirectory::read(&mut cursor, index).unwrap();
        assert_eq!(dir.field_as_long(tags::IMAGE_WIDTH, 0), Some(width));
    }

    let second = TiffDirectory::read(&mut cursor, 1).unwrap();
    assert_eq!(second.ifd_offset(), 26);
    assert_eq!(second.next_ifd_offset(), 44);

    let from_second = TiffDirectory::read_at(&mut cursor, 26, 1).unwrap();
    assert_eq!(from_second.field_as_long(tags::IMAGE_WIDTH, 0), Some(30));
    assert_eq!(from_second.next_ifd_offset(), 0);

    assert!(matches!(
        TiffDirectory::read(&mut cursor, 3),
        Err(TiffError::DirectoryIndexOutOfRange {
            index: 3,
            available: 3
        })
    ));
}

#[test]
fn test_cyclic_chain_counts_each_directory_once() {
    let file = chain(&[10, 20], 8);
    assert_eq!(
        TiffDirectory::count_directories(&mut Cursor::new(file)).unwrap(),
        2
    );
}

#[test]
fn test_skipped_entries_keep_the_rest() {
    let mut file = chain(&[10], 0);
    // Append an IFD with a bad type, an offset past the end and one good entry,
    // and point the header at it.
    let ifd_offset = file.len() as u32;
    file.extend_from_slice(&3u16.to_be_bytes());
    file.extend_from_slice(&[1, 0, 0, 99, 0, 0, 0, 1, 0, 0, 0, 0]);
    file.extend_from_slice(&[1, 1, 0, 4, 0, 0, 0, 2, 0, 1, 0, 0]);
    file.extend_from_slice(&[1, 2, 0, 3, 0, 0, 0, 1, 0, 8, 0, 0]);
    file.extend_from_slice(&[0, 0, 0, 0]);
    file[4..8].copy_from_slice(&ifd_offset.to_be_bytes());

    let dir = TiffDirectory::read(&mut Cursor::new(file), 0).unwrap();
    assert_eq!(dir.tags().collect::<Vec<_>>(), vec![tags::BITS_PER_SAMPLE]);
    assert_eq!(dir.field_as_long(tags::BITS_PER_SAMPLE, 0), Some(8));
}

#[test]
fn test_truncated_ifd_keeps_complete_entries() {
    let mut file = chain(&[10], 0);
    // Claim two entries but provide only one, without a next offset.
    file[9] = 2;
    file.truncate(file.len() - 4);

    let dir = TiffDirectory::read(&mut Cursor::new(file), 0).unwrap();
    assert_eq!(dir.len(), 1);
    assert_eq!(dir.next_ifd_offset(), 0);
}

#[test]
fn test_lzw_strip_roundtrip() {
    let (width, height, spp) = (16usize, 8usize, 3usize);
    let stride = width * spp;
    let pixels: Vec<u8> = (0..stride * height)
        .map(|i| ((i % stride) as u8).wrapping_mul(3).wrapping_add((i / stride) as u8))
        .collect();

    let strip = compress_lzw(
        Vec::new(),
        Predictor::HorizontalDifferencing,
        &pixels,
        height,
        spp,
        stride,
    )
    .unwrap();

    let mut writer = DirectoryWriter::new();
    writer.add_field(TiffField::long(tags::IMAGE_WIDTH, vec![width as u32]));
    writer.add_field(TiffField::long(tags::IMAGE_LENGTH, vec![height as u32]));
    writer.add_field(TiffField::short(tags::SAMPLES_PER_PIXEL, vec![spp as u16]));
    writer.add_field(TiffField::short(tags::COMPRESSION, vec![tags::COMPRESSION_LZW]));
    writer.add_field(TiffField::short(
        tags::PREDICTOR,
        vec![Predictor::HorizontalDifferencing.tag_value()],
    ));
    writer.add_field(TiffField::long(tags::STRIP_BYTE_COUNTS, vec![strip.len() as u32]));
    writer.add_strip_image(strip);
    let file = write(&writer);

    let dir = TiffDirectory::read(&mut Cursor::new(&file), 0).unwrap();
    let offset = dir.field_as_long(tags::STRIP_OFFSETS, 0).unwrap() as usize;
    let length = dir.field_as_long(tags::STRIP_BYTE_COUNTS, 0).unwrap() as usize;
    let predictor_tag = dir.field_as_long(tags::PREDICTOR, 0).unwrap() as u16;
    let predictor = Predictor::from_tag_value(predictor_tag);
    assert_eq!(offset % 2, 0);

    let mut decoded = vec![0u8; pixels.len()];
    let written = LzwDecoder::new(width, spp, predictor)
        .decode(&file[offset..offset + length], &mut decoded, height)
        .unwrap();
    assert_eq!(written, pixels.len());
    assert_eq!(decoded, pixels);
}

#[test]
fn test_read_restores_position() {
    let file = chain(&[10, 20], 0);
    let mut cursor = Cursor::new(file);
    cursor.set_position(13);
    TiffDirectory::read(&mut cursor, 1).unwrap();
    assert_eq!(cursor.position(), 13);

    // Failed reads restore it too.
    assert!(TiffDirectory::read(&mut cursor, 5).is_err());
    assert_eq!(cursor.position(), 13);
}
