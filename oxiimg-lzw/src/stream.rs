//! Dictionary-backed LZW decoder for either framing.
//!
//! Unlike [`LzwDecoder`](crate::LzwDecoder), which only understands TIFF
//! strips, this decoder follows an [`LzwConfig`] and therefore handles GIF
//! sub-blocks, small symbol sizes and both code-width conventions.

use crate::bitstream::{CodeReader, unblock};
use crate::config::{Framing, LzwConfig, MAX_BITS};
use crate::dictionary::LzwDictionary;
use crate::error::{LzwError, Result};
use std::borrow::Cow;

/// LZW decoder driven by an [`LzwConfig`].
#[derive(Debug)]
pub struct LzwStreamDecoder {
    config: LzwConfig,
    dict: LzwDictionary,
}

impl LzwStreamDecoder {
    /// Create a decoder for `config`.
    pub fn new(config: LzwConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            dict: LzwDictionary::new(config.code_size),
        })
    }

    /// Decode `input`, producing at most `expected_size` bytes.
    ///
    /// A stream without an END code ends where its codes run out.
    pub fn decode(&mut self, input: &[u8], expected_size: usize) -> Result<Vec<u8>> {
        let payload: Cow<'_, [u8]> = match self.config.framing {
            Framing::Blocked => Cow::Owned(unblock(input)),
            Framing::Unblocked => Cow::Borrowed(input),
        };

        let clear = self.config.clear_code();
        let eoi = self.config.eoi_code();
        let mut reader = CodeReader::new(&payload, self.config.bit_order());

        self.dict.reset(self.config.code_size);
        let mut bits = self.config.initial_bits();
        let mut out = vec![0u8; expected_size];
        let mut written = 0usize;
        let mut prev: Option<u16> = None;

        while written < expected_size {
            let Ok(code) = reader.read(bits) else {
                break;
            };
            if code == clear {
                self.dict.reset(self.config.code_size);
                bits = self.config.initial_bits();
                prev = None;
                continue;
            }
            if code == eoi {
                break;
            }

            let table_len = self.dict.len();
            let first = if (code as usize) < table_len {
                self.dict.first_byte(code)
            } else if code as usize == table_len {
                prev.and_then(|p| self.dict.first_byte(p))
            } else {
                None
            };
            let first = first.ok_or(LzwError::InvalidCode(code))?;

            if let Some(p) = prev {
                self.dict.add(Some(p), first);
            }
            written += self.dict.expand(code, &mut out[written..], 0).written();
            prev = Some(code);

            if bits < MAX_BITS && self.dict.len() >= self.config.decoder_threshold(bits) {
                bits += 1;
            }
        }

        out.truncate(written);
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compress;

    #[test]
    fn test_gif_roundtrip() {
        let original = b"TOBEORNOTTOBEORTOBEORNOT".repeat(40);
        let compressed = compress(&original, LzwConfig::GIF).unwrap();
        let mut decoder = LzwStreamDecoder::new(LzwConfig::GIF).unwrap();
        assert_eq!(
            decoder.decode(&compressed, original.len()).unwrap(),
            original
        );
    }

    #[test]
    fn test_tiff_framing_matches_strip_decoder() {
        let original: Vec<u8> = (0..5000u32).map(|i| (i * i % 253) as u8).collect();
        let compressed = compress(&original, LzwConfig::TIFF).unwrap();

        let mut stream = LzwStreamDecoder::new(LzwConfig::TIFF).unwrap();
        let from_stream = stream.decode(&compressed, original.len()).unwrap();
        let from_strip = crate::LzwDecoder::plain()
            .decode_to_vec(&compressed, original.len())
            .unwrap();
        assert_eq!(from_stream, original);
        assert_eq!(from_strip, original);
    }

    #[test]
    fn test_small_symbol_size() {
        let original: Vec<u8> = (0..3000u32).map(|i| ((i / 3) % 4) as u8).collect();
        let config = LzwConfig::gif(2);
        let compressed = compress(&original, config).unwrap();
        let mut decoder = LzwStreamDecoder::new(config).unwrap();
        assert_eq!(
            decoder.decode(&compressed, original.len()).unwrap(),
            original
        );
    }

    #[test]
    fn test_expected_size_caps_output() {
        let original = vec![b'Z'; 400];
        let compressed = compress(&original, LzwConfig::GIF).unwrap();
        let mut decoder = LzwStreamDecoder::new(LzwConfig::GIF).unwrap();
        assert_eq!(decoder.decode(&compressed, 123).unwrap(), vec![b'Z'; 123]);
    }

    #[test]
    fn test_first_code_past_table_is_invalid() {
        let mut packer = crate::BitPacker::new(Vec::new(), Framing::Unblocked);
        packer.write_bits(258, 9).unwrap();
        packer.flush().unwrap();
        let data = packer.into_inner();

        let mut decoder = LzwStreamDecoder::new(LzwConfig::TIFF).unwrap();
        assert!(matches!(
            decoder.decode(&data, 10),
            Err(LzwError::InvalidCode(258))
        ));
    }
}
