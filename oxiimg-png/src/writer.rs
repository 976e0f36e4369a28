//! PNG chunk stream writer.
//!
//! ```text
//! Signature: 89 50 4E 47 0D 0A 1A 0A
//! Chunk:     length (4, BE) │ type (4) │ data │ CRC-32 of type + data (4, BE)
//! ```

use flate2::Compression;
use flate2::write::ZlibEncoder;
use log::trace;
use oxiimg_core::{Crc32, OxiImgError, Result};
use std::io::{self, Write};

/// PNG file signature.
pub const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

/// Name written in front of every embedded ICC profile.
const ICC_PROFILE_NAME: &[u8] = b"ICC\0";

/// Chunk type codes.
pub mod chunk {
    /// Image header.
    pub const IHDR: [u8; 4] = *b"IHDR";
    /// Palette.
    pub const PLTE: [u8; 4] = *b"PLTE";
    /// Image data.
    pub const IDAT: [u8; 4] = *b"IDAT";
    /// Embedded ICC profile.
    pub const ICCP: [u8; 4] = *b"iCCP";
    /// Image trailer.
    pub const IEND: [u8; 4] = *b"IEND";
}

/// PNG colour type, as stored in IHDR.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorType {
    /// Greyscale samples.
    Grayscale,
    /// RGB triples.
    Rgb,
    /// Palette indices.
    Indexed,
    /// Greyscale with alpha.
    GrayscaleAlpha,
    /// RGB with alpha.
    Rgba,
}

impl ColorType {
    /// The IHDR colour type byte.
    pub fn code(self) -> u8 {
        match self {
            ColorType::Grayscale => 0,
            ColorType::Rgb => 2,
            ColorType::Indexed => 3,
            ColorType::GrayscaleAlpha => 4,
            ColorType::Rgba => 6,
        }
    }
}

/// Writes a PNG chunk stream to `W`.
///
/// The signature is written by [`PngWriter::new`]; callers then emit chunks in
/// file order and finish with [`PngWriter::write_end`].
#[derive(Debug)]
pub struct PngWriter<W: Write> {
    inner: W,
    compression: Compression,
}

impl<W: Write> PngWriter<W> {
    /// Start a PNG stream by writing the signature.
    pub fn new(mut inner: W) -> Result<Self> {
        inner.write_all(&PNG_SIGNATURE)?;
        Ok(Self {
            inner,
            compression: Compression::fast(),
        })
    }

    /// Use `compression` for IDAT and iCCP payloads instead of the fastest level.
    pub fn with_compression(mut self, compression: Compression) -> Self {
        self.compression = compression;
        self
    }

    /// Write one chunk: length, type, data and CRC.
    pub fn write_chunk(&mut self, chunk_type: [u8; 4], data: &[u8]) -> Result<()> {
        let length = u32::try_from(data.len()).map_err(|_| {
            OxiImgError::invalid_header(format!(
                "chunk {} payload of {} bytes exceeds the 32-bit length field",
                String::from_utf8_lossy(&chunk_type),
                data.len()
            ))
        })?;

        let mut crc = Crc32::new();
        crc.update(&chunk_type);
        crc.update(data);

        self.inner.write_all(&length.to_be_bytes())?;
        self.inner.write_all(&chunk_type)?;
        self.inner.write_all(data)?;
        self.inner.write_all(&crc.finalize().to_be_bytes())?;
        trace!(
            "PNG chunk {}: {length} bytes",
            String::from_utf8_lossy(&chunk_type)
        );
        Ok(())
    }

    /// Write IHDR. Compression, filter and interlace methods are all 0.
    pub fn write_header(
        &mut self,
        width: u32,
        height: u32,
        bit_depth: u8,
        color_type: ColorType,
    ) -> Result<()> {
        let mut data = [0u8; 13];
        data[..4].copy_from_slice(&width.to_be_bytes());
        data[4..8].copy_from_slice(&height.to_be_bytes());
        data[8] = bit_depth;
        data[9] = color_type.code();
        self.write_chunk(chunk::IHDR, &data)
    }

    /// Write PLTE from RGB entries.
    pub fn write_palette(&mut self, colors: &[[u8; 3]]) -> Result<()> {
        self.write_chunk(chunk::PLTE, colors.as_flattened())
    }

    /// Write the image as a single IDAT.
    ///
    /// `data` holds rows of `stride` bytes; each row is prefixed with filter
    /// type 0 before deflating. A trailing partial row is written as is.
    pub fn write_data(&mut self, data: &[u8], stride: usize) -> Result<()> {
        if stride == 0 && !data.is_empty() {
            return Err(io::Error::new(io::ErrorKind::InvalidInput, "row stride is zero").into());
        }
        let mut encoder = ZlibEncoder::new(Vec::new(), self.compression);
        for row in data.chunks(stride.max(1)) {
            encoder.write_all(&[0])?;
            encoder.write_all(row)?;
        }
        let compressed = encoder.finish()?;
        self.write_chunk(chunk::IDAT, &compressed)
    }

    /// Write iCCP holding the deflated `profile`.
    pub fn write_icc_profile(&mut self, profile: &[u8]) -> Result<()> {
        let mut data = ICC_PROFILE_NAME.to_vec();
        // Compression method: deflate.
        data.push(0);
        let mut encoder = ZlibEncoder::new(data, self.compression);
        encoder.write_all(profile)?;
        let data = encoder.finish()?;
        self.write_chunk(chunk::ICCP, &data)
    }

    /// Write IEND and flush.
    pub fn write_end(&mut self) -> Result<()> {
        self.write_chunk(chunk::IEND, &[])?;
        self.inner.flush()?;
        Ok(())
    }

    /// Get a reference to the sink.
    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    /// Return the sink.
    pub fn into_inner(self) -> W {
        self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signature_written_first() {
        let writer = PngWriter::new(Vec::new()).unwrap();
        assert_eq!(writer.into_inner(), PNG_SIGNATURE);
    }

    #[test]
    fn test_iend_bytes() {
        let mut writer = PngWriter::new(Vec::new()).unwrap();
        writer.write_end().unwrap();
        let out = writer.into_inner();
        assert_eq!(
            &out[8..],
            &[0, 0, 0, 0, b'I', b'E', b'N', b'D', 0xAE, 0x42, 0x60, 0x82]
        );
    }

    #[test]
    fn test_header_layout() {
        let mut writer = PngWriter::new(Vec::new()).unwrap();
        writer.write_header(3, 2, 8, ColorType::Rgb).unwrap();
        let out = writer.into_inner();
        let chunk = &out[8..];
        assert_eq!(&chunk[..8], &[0, 0, 0, 13, b'I', b'H', b'D', b'R']);
        assert_eq!(&chunk[8..21], &[0, 0, 0, 3, 0, 0, 0, 2, 8, 2, 0, 0, 0]);
        assert_eq!(chunk.len(), 25);
        let crc = Crc32::compute(&chunk[4..21]);
        assert_eq!(&chunk[21..], &crc.to_be_bytes());
    }

    #[test]
    fn test_palette_layout() {
        let mut writer = PngWriter::new(Vec::new()).unwrap();
        writer.write_palette(&[[255, 0, 0], [0, 0, 255]]).unwrap();
        let out = writer.into_inner();
        assert_eq!(&out[8..12], &[0, 0, 0, 6]);
        assert_eq!(&out[12..16], b"PLTE");
        assert_eq!(&out[16..22], &[255, 0, 0, 0, 0, 255]);
    }

    #[test]
    fn test_zero_stride_rejected() {
        let mut writer = PngWriter::new(Vec::new()).unwrap();
        assert!(writer.write_data(&[1, 2, 3], 0).is_err());
    }

    #[test]
    fn test_color_type_codes() {
        assert_eq!(ColorType::Grayscale.code(), 0);
        assert_eq!(ColorType::Indexed.code(), 3);
        assert_eq!(ColorType::Rgba.code(), 6);
    }
}
