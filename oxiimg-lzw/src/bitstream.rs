//! Variable-width code packing for LZW.
//!
//! GIF packs codes LSB-first and splits the byte stream into sub-blocks of at
//! most 255 bytes, each preceded by its length. TIFF packs codes MSB-first
//! into one flat stream.

use crate::config::Framing;
use crate::error::{LzwError, Result};
use std::io::Write;

/// Largest sub-block payload in blocked framing.
pub const MAX_BLOCK_LEN: usize = 255;

/// Order in which code bits fill each byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BitOrder {
    /// Least significant bit first (GIF).
    Lsb,
    /// Most significant bit first (TIFF).
    Msb,
}

/// Packs codes of arbitrary width and forwards the bytes to a sink.
///
/// Completed bytes are staged and handed to the sink every
/// [`MAX_BLOCK_LEN`] bytes and on [`flush`](Self::flush).
#[derive(Debug)]
pub struct BitPacker<W: Write> {
    sink: W,
    framing: Framing,
    staging: Vec<u8>,
    /// Pending bits not yet forming a whole byte.
    buffer: u32,
    /// Number of valid bits in `buffer`.
    bits_in_buffer: u8,
}

impl<W: Write> BitPacker<W> {
    /// Create a packer writing to `sink` with the given framing.
    pub fn new(sink: W, framing: Framing) -> Self {
        Self {
            sink,
            framing,
            staging: Vec::with_capacity(MAX_BLOCK_LEN + 1),
            buffer: 0,
            bits_in_buffer: 0,
        }
    }

    /// Append the low `count` bits of `value`.
    pub fn write_bits(&mut self, value: u16, count: u8) -> Result<()> {
        if count == 0 || count > 16 {
            return Err(LzwError::InvalidBitWidth(count));
        }
        let value = value as u32 & ((1u32 << count) - 1);

        match self.framing {
            Framing::Blocked => {
                self.buffer |= value << self.bits_in_buffer;
                self.bits_in_buffer += count;
                while self.bits_in_buffer >= 8 {
                    let byte = self.buffer as u8;
                    self.buffer >>= 8;
                    self.bits_in_buffer -= 8;
                    self.push_byte(byte)?;
                }
            }
            Framing::Unblocked => {
                self.buffer = (self.buffer << count) | value;
                self.bits_in_buffer += count;
                while self.bits_in_buffer >= 8 {
                    let byte = (self.buffer >> (self.bits_in_buffer - 8)) as u8;
                    self.bits_in_buffer -= 8;
                    self.buffer &= (1u32 << self.bits_in_buffer) - 1;
                    self.push_byte(byte)?;
                }
            }
        }
        Ok(())
    }

    /// Emit the partial trailing byte (zero padded) and any staged bytes.
    pub fn flush(&mut self) -> Result<()> {
        if self.bits_in_buffer > 0 {
            let byte = match self.framing {
                Framing::Blocked => self.buffer as u8,
                Framing::Unblocked => (self.buffer << (8 - self.bits_in_buffer)) as u8,
            };
            self.buffer = 0;
            self.bits_in_buffer = 0;
            self.staging.push(byte);
        }
        self.emit_staging()?;
        self.sink.flush()?;
        Ok(())
    }

    /// Get a reference to the sink.
    pub fn get_ref(&self) -> &W {
        &self.sink
    }

    /// Consume the packer and return the sink.
    ///
    /// Bits not yet flushed are discarded.
    pub fn into_inner(self) -> W {
        self.sink
    }

    #[inline]
    fn push_byte(&mut self, byte: u8) -> Result<()> {
        self.staging.push(byte);
        if self.staging.len() == MAX_BLOCK_LEN {
            self.emit_staging()?;
        }
        Ok(())
    }

    fn emit_staging(&mut self) -> Result<()> {
        if self.staging.is_empty() {
            return Ok(());
        }
        if self.framing == Framing::Blocked {
            self.sink.write_all(&[self.staging.len() as u8])?;
        }
        self.sink.write_all(&self.staging)?;
        self.staging.clear();
        Ok(())
    }
}

/// Input ran out before a complete code could be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EndOfInput;

/// Reads variable-width codes from an unblocked byte slice.
#[derive(Debug)]
pub struct CodeReader<'a> {
    data: &'a [u8],
    byte_pos: usize,
    order: BitOrder,
    buffer: u32,
    bits_in_buffer: u8,
}

impl<'a> CodeReader<'a> {
    /// Create a reader over `data`.
    pub fn new(data: &'a [u8], order: BitOrder) -> Self {
        Self {
            data,
            byte_pos: 0,
            order,
            buffer: 0,
            bits_in_buffer: 0,
        }
    }

    /// Read the next `count`-bit code (`count` at most 16).
    #[inline]
    pub fn read(&mut self, count: u8) -> std::result::Result<u16, EndOfInput> {
        while self.bits_in_buffer < count {
            let byte = *self.data.get(self.byte_pos).ok_or(EndOfInput)?;
            self.byte_pos += 1;
            match self.order {
                BitOrder::Msb => self.buffer = (self.buffer << 8) | byte as u32,
                BitOrder::Lsb => self.buffer |= (byte as u32) << self.bits_in_buffer,
            }
            self.bits_in_buffer += 8;
        }

        let mask = (1u32 << count) - 1;
        let code = match self.order {
            BitOrder::Msb => {
                let code = (self.buffer >> (self.bits_in_buffer - count)) & mask;
                self.bits_in_buffer -= count;
                self.buffer &= (1u32 << self.bits_in_buffer) - 1;
                code
            }
            BitOrder::Lsb => {
                let code = self.buffer & mask;
                self.buffer >>= count;
                self.bits_in_buffer -= count;
                code
            }
        };
        Ok(code as u16)
    }

    /// Bytes consumed so far.
    pub fn bytes_consumed(&self) -> usize {
        self.byte_pos
    }
}

/// Concatenate the payloads of length-prefixed sub-blocks.
///
/// Stops at a zero-length terminator or at the end of `data`; a final block
/// whose length overruns the input contributes what is present.
pub fn unblock(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(data.len());
    let mut pos = 0;
    while let Some(&len) = data.get(pos) {
        if len == 0 {
            break;
        }
        let start = pos + 1;
        let end = (start + len as usize).min(data.len());
        out.extend_from_slice(&data[start..end]);
        pos = end;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_msb_roundtrip() {
        let mut packer = BitPacker::new(Vec::new(), Framing::Unblocked);
        packer.write_bits(0b101, 3).unwrap();
        packer.write_bits(0b1100, 4).unwrap();
        packer.write_bits(0b11111111, 8).unwrap();
        packer.flush().unwrap();
        let data = packer.into_inner();
        assert_eq!(data, vec![0b1011_1001, 0b1111_1110]);

        let mut reader = CodeReader::new(&data, BitOrder::Msb);
        assert_eq!(reader.read(3), Ok(0b101));
        assert_eq!(reader.read(4), Ok(0b1100));
        assert_eq!(reader.read(8), Ok(0b11111111));
    }

    #[test]
    fn test_lsb_packing() {
        let mut packer = BitPacker::new(Vec::new(), Framing::Blocked);
        packer.write_bits(0x100, 9).unwrap();
        packer.write_bits(0x041, 9).unwrap();
        packer.flush().unwrap();
        let data = packer.into_inner();
        // Length prefix, then 0x100 | (0x041 << 9) packed from bit 0.
        assert_eq!(data, vec![3, 0x00, 0x83, 0x00]);

        let payload = unblock(&data);
        let mut reader = CodeReader::new(&payload, BitOrder::Lsb);
        assert_eq!(reader.read(9), Ok(0x100));
        assert_eq!(reader.read(9), Ok(0x041));
    }

    #[test]
    fn test_blocked_splits_at_255() {
        let mut packer = BitPacker::new(Vec::new(), Framing::Blocked);
        for i in 0..300u16 {
            packer.write_bits(i & 0xFF, 8).unwrap();
        }
        packer.flush().unwrap();
        let data = packer.into_inner();
        assert_eq!(data.len(), 302);
        assert_eq!(data[0], 255);
        assert_eq!(data[256], 45);
        let payload = unblock(&data);
        assert_eq!(payload.len(), 300);
        assert_eq!(payload[299], (299 & 0xFF) as u8);
    }

    #[test]
    fn test_unblocked_has_no_prefixes() {
        let mut packer = BitPacker::new(Vec::new(), Framing::Unblocked);
        for _ in 0..600 {
            packer.write_bits(0xAB, 8).unwrap();
        }
        packer.flush().unwrap();
        let data = packer.into_inner();
        assert_eq!(data.len(), 600);
        assert!(data.iter().all(|&b| b == 0xAB));
    }

    #[test]
    fn test_reader_end_of_input() {
        let data = [0xFF];
        let mut reader = CodeReader::new(&data, BitOrder::Msb);
        assert_eq!(reader.read(9), Err(EndOfInput));
    }

    #[test]
    fn test_invalid_width() {
        let mut packer = BitPacker::new(Vec::new(), Framing::Unblocked);
        assert!(matches!(
            packer.write_bits(1, 0),
            Err(LzwError::InvalidBitWidth(0))
        ));
        assert!(matches!(
            packer.write_bits(1, 17),
            Err(LzwError::InvalidBitWidth(17))
        ));
    }

    #[test]
    fn test_unblock_tolerates_missing_terminator() {
        assert_eq!(unblock(&[2, 7, 8, 1, 9]), vec![7, 8, 9]);
        assert_eq!(unblock(&[2, 7, 8, 0, 1, 9]), vec![7, 8]);
        assert_eq!(unblock(&[5, 1, 2]), vec![1, 2]);
    }
}
