//! Endian-aware reads over a random-access byte source.
//!
//! Both JBIG2 (always big-endian) and TIFF (either order, chosen by the file)
//! parse fixed-width integers out of a seekable stream. [`EndianReader`]
//! wraps any `Read + Seek` source and decodes those integers in the
//! configured [`ByteOrder`].

use crate::error::{OxiImgError, Result};
use std::io::{Read, Seek, SeekFrom};

/// Byte order of multi-byte values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ByteOrder {
    /// Most significant byte first ("MM" in TIFF).
    #[default]
    BigEndian,
    /// Least significant byte first ("II" in TIFF).
    LittleEndian,
}

impl ByteOrder {
    /// Check whether this is big-endian order.
    pub fn is_big_endian(self) -> bool {
        self == ByteOrder::BigEndian
    }

    /// Decode a `u16` from two bytes.
    #[inline]
    pub fn u16_from(self, bytes: [u8; 2]) -> u16 {
        match self {
            ByteOrder::BigEndian => u16::from_be_bytes(bytes),
            ByteOrder::LittleEndian => u16::from_le_bytes(bytes),
        }
    }

    /// Decode a `u32` from four bytes.
    #[inline]
    pub fn u32_from(self, bytes: [u8; 4]) -> u32 {
        match self {
            ByteOrder::BigEndian => u32::from_be_bytes(bytes),
            ByteOrder::LittleEndian => u32::from_le_bytes(bytes),
        }
    }

    /// Decode a `u64` from eight bytes.
    #[inline]
    pub fn u64_from(self, bytes: [u8; 8]) -> u64 {
        match self {
            ByteOrder::BigEndian => u64::from_be_bytes(bytes),
            ByteOrder::LittleEndian => u64::from_le_bytes(bytes),
        }
    }

    /// Append a `u16` to `out`.
    #[inline]
    pub fn put_u16(self, out: &mut Vec<u8>, value: u16) {
        match self {
            ByteOrder::BigEndian => out.extend_from_slice(&value.to_be_bytes()),
            ByteOrder::LittleEndian => out.extend_from_slice(&value.to_le_bytes()),
        }
    }

    /// Append a `u32` to `out`.
    #[inline]
    pub fn put_u32(self, out: &mut Vec<u8>, value: u32) {
        match self {
            ByteOrder::BigEndian => out.extend_from_slice(&value.to_be_bytes()),
            ByteOrder::LittleEndian => out.extend_from_slice(&value.to_le_bytes()),
        }
    }

    /// Append a `u64` to `out`.
    #[inline]
    pub fn put_u64(self, out: &mut Vec<u8>, value: u64) {
        match self {
            ByteOrder::BigEndian => out.extend_from_slice(&value.to_be_bytes()),
            ByteOrder::LittleEndian => out.extend_from_slice(&value.to_le_bytes()),
        }
    }
}

/// A reader decoding fixed-width values from a seekable source.
///
/// The stream length is measured once, on first use, and cached.
#[derive(Debug)]
pub struct EndianReader<R> {
    inner: R,
    order: ByteOrder,
    len: Option<u64>,
}

impl<R: Read + Seek> EndianReader<R> {
    /// Wrap a source, decoding multi-byte values in `order`.
    pub fn new(inner: R, order: ByteOrder) -> Self {
        Self {
            inner,
            order,
            len: None,
        }
    }

    /// Current byte order.
    pub fn order(&self) -> ByteOrder {
        self.order
    }

    /// Change the byte order used for subsequent reads.
    pub fn set_order(&mut self, order: ByteOrder) {
        self.order = order;
    }

    /// Get a reference to the underlying source.
    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    /// Get a mutable reference to the underlying source.
    pub fn get_mut(&mut self) -> &mut R {
        &mut self.inner
    }

    /// Consume this reader and return the underlying source.
    pub fn into_inner(self) -> R {
        self.inner
    }

    /// Current position in the source.
    pub fn position(&mut self) -> Result<u64> {
        Ok(self.inner.stream_position()?)
    }

    /// Seek to an absolute position.
    pub fn seek_to(&mut self, pos: u64) -> Result<()> {
        self.inner.seek(SeekFrom::Start(pos))?;
        Ok(())
    }

    /// Advance the position by `count` bytes without reading them.
    pub fn skip(&mut self, count: u64) -> Result<()> {
        let pos = self.position()?;
        let target = pos
            .checked_add(count)
            .ok_or_else(|| OxiImgError::corrupted(pos, "skip overflows stream offset"))?;
        self.seek_to(target)
    }

    /// Total length of the source in bytes.
    pub fn len(&mut self) -> Result<u64> {
        if let Some(len) = self.len {
            return Ok(len);
        }
        let pos = self.inner.stream_position()?;
        let len = self.inner.seek(SeekFrom::End(0))?;
        self.inner.seek(SeekFrom::Start(pos))?;
        self.len = Some(len);
        Ok(len)
    }

    /// Check whether the source is empty.
    pub fn is_empty(&mut self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Bytes between the current position and the end of the source.
    pub fn remaining(&mut self) -> Result<u64> {
        let len = self.len()?;
        let pos = self.position()?;
        Ok(len.saturating_sub(pos))
    }

    /// Read exactly `N` bytes.
    #[inline]
    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut buf = [0u8; N];
        self.inner.read_exact(&mut buf)?;
        Ok(buf)
    }

    /// Read exactly `count` bytes into a new buffer.
    ///
    /// Fails before allocating if fewer than `count` bytes remain.
    pub fn read_bytes(&mut self, count: u64) -> Result<Vec<u8>> {
        let remaining = self.remaining()?;
        if count > remaining {
            return Err(OxiImgError::unexpected_eof(count - remaining));
        }
        let mut buf = vec![0u8; count as usize];
        self.inner.read_exact(&mut buf)?;
        Ok(buf)
    }

    /// Read an unsigned byte.
    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.read_array::<1>()?[0])
    }

    /// Read a signed byte.
    pub fn read_i8(&mut self) -> Result<i8> {
        Ok(self.read_u8()? as i8)
    }

    /// Read an unsigned 16-bit value.
    pub fn read_u16(&mut self) -> Result<u16> {
        let bytes = self.read_array::<2>()?;
        Ok(self.order.u16_from(bytes))
    }

    /// Read a signed 16-bit value.
    pub fn read_i16(&mut self) -> Result<i16> {
        Ok(self.read_u16()? as i16)
    }

    /// Read an unsigned 32-bit value.
    pub fn read_u32(&mut self) -> Result<u32> {
        let bytes = self.read_array::<4>()?;
        Ok(self.order.u32_from(bytes))
    }

    /// Read a signed 32-bit value.
    pub fn read_i32(&mut self) -> Result<i32> {
        Ok(self.read_u32()? as i32)
    }

    /// Read an IEEE 754 single-precision value.
    pub fn read_f32(&mut self) -> Result<f32> {
        Ok(f32::from_bits(self.read_u32()?))
    }

    /// Read an IEEE 754 double-precision value.
    pub fn read_f64(&mut self) -> Result<f64> {
        let bytes = self.read_array::<8>()?;
        Ok(f64::from_bits(self.order.u64_from(bytes)))
    }
}
