//! TIFF LZW decoder (decompression of strips).
//!
//! This decoder is self-contained: it keeps its own code table with the TIFF
//! reset semantics (fixed 8-bit literals, width changes at table sizes 511,
//! 1023 and 2047) and writes into a caller-provided strip buffer.
//!
//! Truncated strips are expected input. When the codes run out before an
//! END code, decoding stops as if END had been read.

use crate::bitstream::{BitOrder, CodeReader};
use crate::dictionary::MAX_CODES;
use crate::error::{LzwError, Result};
use crate::predictor::{Predictor, accumulate_rows};

const CLEAR_CODE: u16 = 256;
const EOI_CODE: u16 = 257;
const FIRST_CODE: usize = 258;

#[derive(Debug, Clone, Copy, Default)]
struct TableEntry {
    prefix: u16,
    byte: u8,
    first: u8,
    len: u16,
}

#[derive(Debug)]
struct CodeTable {
    entries: Box<[TableEntry]>,
    len: usize,
}

impl CodeTable {
    fn new() -> Self {
        let mut table = Self {
            entries: vec![TableEntry::default(); MAX_CODES].into_boxed_slice(),
            len: 0,
        };
        table.reset();
        table
    }

    fn reset(&mut self) {
        for (i, entry) in self.entries.iter_mut().take(256).enumerate() {
            *entry = TableEntry {
                prefix: 0,
                byte: i as u8,
                first: i as u8,
                len: 1,
            };
        }
        self.len = FIRST_CODE;
    }

    fn add(&mut self, prefix: u16, byte: u8) {
        if self.len >= MAX_CODES {
            return;
        }
        let parent = self.entries[prefix as usize];
        self.entries[self.len] = TableEntry {
            prefix,
            byte,
            first: parent.first,
            len: parent.len + 1,
        };
        self.len += 1;
    }

    fn first(&self, code: u16) -> u8 {
        self.entries[code as usize].first
    }

    /// Write the leading bytes of `code`'s string that fit in `out`.
    fn write(&self, code: u16, out: &mut [u8]) -> usize {
        let entry = self.entries[code as usize];
        let len = entry.len as usize;
        let fit = len.min(out.len());

        let mut code = code;
        for pos in (0..len).rev() {
            let entry = self.entries[code as usize];
            if pos < fit {
                out[pos] = entry.byte;
            }
            code = entry.prefix;
        }
        fit
    }

    /// Code width needed for the next code.
    fn code_width(&self) -> u8 {
        match self.len {
            0..511 => 9,
            511..1023 => 10,
            1023..2047 => 11,
            _ => 12,
        }
    }
}

/// Decoder for LZW-compressed TIFF strips.
#[derive(Debug)]
pub struct LzwDecoder {
    /// Image width in pixels.
    width: usize,
    samples_per_pixel: usize,
    predictor: Predictor,
    table: CodeTable,
}

impl LzwDecoder {
    /// Create a decoder for strips of `width` pixels.
    ///
    /// `width` and `samples_per_pixel` only matter when the predictor is
    /// [`Predictor::HorizontalDifferencing`].
    pub fn new(width: usize, samples_per_pixel: usize, predictor: Predictor) -> Self {
        Self {
            width,
            samples_per_pixel,
            predictor,
            table: CodeTable::new(),
        }
    }

    /// Decoder without a predictor.
    pub fn plain() -> Self {
        Self::new(0, 1, Predictor::None)
    }

    /// Decode `data` into `out`, returning the number of bytes produced.
    ///
    /// Decoding stops at the END code, when `out` is full, or when `data` is
    /// exhausted. Afterwards the predictor, if any, is undone on the first
    /// `rows` rows of `out`.
    pub fn decode(&mut self, data: &[u8], out: &mut [u8], rows: usize) -> Result<usize> {
        if data.len() >= 2 && data[0] == 0x00 && data[1] == 0x01 {
            return Err(LzwError::UnsupportedVariant);
        }

        self.table.reset();
        let mut reader = CodeReader::new(data, BitOrder::Msb);
        let mut bits = self.table.code_width();
        let mut written = 0usize;
        let mut old_code: Option<u16> = None;

        while written < out.len() {
            let code = reader.read(bits).unwrap_or(EOI_CODE);
            if code == EOI_CODE {
                break;
            }
            if code == CLEAR_CODE {
                self.table.reset();
                bits = self.table.code_width();
                old_code = None;
                continue;
            }

            let table_len = self.table.len;
            if (code as usize) < table_len {
                written += self.table.write(code, &mut out[written..]);
                if let Some(old) = old_code {
                    self.table.add(old, self.table.first(code));
                }
            } else if code as usize == table_len {
                let Some(old) = old_code else {
                    return Err(LzwError::InvalidCode(code));
                };
                self.table.add(old, self.table.first(old));
                written += self.table.write(code, &mut out[written..]);
            } else {
                return Err(LzwError::InvalidCode(code));
            }

            old_code = Some(code);
            bits = self.table.code_width();
        }

        if self.predictor == Predictor::HorizontalDifferencing {
            let stride = self.width * self.samples_per_pixel;
            accumulate_rows(out, stride, rows, self.samples_per_pixel);
        }

        Ok(written)
    }

    /// Decode into a new buffer of at most `expected_size` bytes.
    pub fn decode_to_vec(&mut self, data: &[u8], expected_size: usize) -> Result<Vec<u8>> {
        let mut out = vec![0u8; expected_size];
        let rows = if self.width * self.samples_per_pixel == 0 {
            0
        } else {
            expected_size / (self.width * self.samples_per_pixel)
        };
        let written = self.decode(data, &mut out, rows)?;
        out.truncate(written);
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compress_tiff;

    #[test]
    fn test_decode_simple() {
        let original = b"TOBEORNOTTOBEORTOBEORNOT";
        let compressed = compress_tiff(original).unwrap();
        let decompressed = LzwDecoder::plain()
            .decode_to_vec(&compressed, original.len())
            .unwrap();
        assert_eq!(decompressed, original);
    }

    #[test]
    fn test_decode_repeating_pattern() {
        // Exercises the code == table length case.
        let original = b"ABABABABABABABABAB";
        let compressed = compress_tiff(original).unwrap();
        let decompressed = LzwDecoder::plain()
            .decode_to_vec(&compressed, original.len())
            .unwrap();
        assert_eq!(decompressed, original);
    }

    #[test]
    fn test_rejects_old_style_marker() {
        let mut out = [0u8; 16];
        let result = LzwDecoder::plain().decode(&[0x00, 0x01, 0xFF], &mut out, 0);
        assert!(matches!(result, Err(LzwError::UnsupportedVariant)));
    }

    #[test]
    fn test_stops_when_output_full() {
        let original = vec![b'X'; 500];
        let compressed = compress_tiff(&original).unwrap();
        let mut out = [0u8; 100];
        let written = LzwDecoder::plain()
            .decode(&compressed, &mut out, 0)
            .unwrap();
        assert_eq!(written, 100);
        assert!(out.iter().all(|&b| b == b'X'));
    }

    #[test]
    fn test_missing_end_code_is_tolerated() {
        let original: Vec<u8> = (0..2000u32).map(|i| (i * 7 % 251) as u8).collect();
        let compressed = compress_tiff(&original).unwrap();
        let truncated = &compressed[..compressed.len() / 2];

        let decoded = LzwDecoder::plain()
            .decode_to_vec(truncated, original.len())
            .unwrap();
        assert!(!decoded.is_empty());
        assert!(decoded.len() < original.len());
        assert_eq!(decoded, original[..decoded.len()]);
    }

    #[test]
    fn test_invalid_code() {
        // CLEAR (256), then code 300 while the table ends at 258.
        let mut packer = crate::BitPacker::new(Vec::new(), crate::Framing::Unblocked);
        packer.write_bits(256, 9).unwrap();
        packer.write_bits(300, 9).unwrap();
        packer.flush().unwrap();
        let data = packer.into_inner();

        let mut out = [0u8; 8];
        let result = LzwDecoder::plain().decode(&data, &mut out, 0);
        assert!(matches!(result, Err(LzwError::InvalidCode(300))));
    }

    #[test]
    fn test_predictor_applied_per_row() {
        // Two rows of two RGB pixels, already differenced.
        let differenced = [10u8, 20, 30, 1, 2, 3, 100, 100, 100, 255, 0, 1];
        let compressed = compress_tiff(&differenced).unwrap();

        let mut out = [0u8; 12];
        let mut decoder = LzwDecoder::new(2, 3, Predictor::HorizontalDifferencing);
        let written = decoder.decode(&compressed, &mut out, 2).unwrap();
        assert_eq!(written, 12);
        assert_eq!(out, [10, 20, 30, 11, 22, 33, 100, 100, 100, 99, 100, 101]);
    }
}
