//! LZW encoder (compression).

use crate::bitstream::BitPacker;
use crate::config::{LzwConfig, MAX_BITS};
use crate::dictionary::{Insertion, LzwDictionary};
use crate::error::{LzwError, Result};
use std::io::Write;

/// Streaming LZW encoder writing packed codes to a sink.
///
/// Input may be fed in any number of [`compress`](Self::compress) calls;
/// the string being matched carries over between calls.
#[derive(Debug)]
pub struct LzwEncoder<W: Write> {
    packer: BitPacker<W>,
    dict: LzwDictionary,
    config: LzwConfig,
    /// Current code width.
    bits: u8,
    /// Largest code assignable before the width grows.
    limit: u16,
    /// Code of the string matched so far.
    prefix: Option<u16>,
}

impl<W: Write> LzwEncoder<W> {
    /// Create an encoder and emit the initial CLEAR code.
    pub fn new(sink: W, config: LzwConfig) -> Result<Self> {
        config.validate()?;
        let bits = config.initial_bits();
        let mut encoder = Self {
            packer: BitPacker::new(sink, config.framing),
            dict: LzwDictionary::new(config.code_size),
            config,
            bits,
            limit: config.code_limit(bits),
            prefix: None,
        };
        encoder.packer.write_bits(config.clear_code(), bits)?;
        Ok(encoder)
    }

    /// Compress a chunk of input.
    pub fn compress(&mut self, input: &[u8]) -> Result<()> {
        let symbol_limit = self.config.clear_code();
        for &byte in input {
            if byte as u16 >= symbol_limit {
                return Err(LzwError::SymbolOutOfRange {
                    symbol: byte,
                    code_size: self.config.code_size,
                });
            }

            match self.dict.find(self.prefix, byte) {
                Some(code) => self.prefix = Some(code),
                None => {
                    if let Some(prefix) = self.prefix {
                        self.emit_and_extend(prefix, byte)?;
                    }
                    self.prefix = Some(byte as u16);
                }
            }
        }
        Ok(())
    }

    /// Emit `prefix`, then record `prefix + byte` and adjust the code width.
    fn emit_and_extend(&mut self, prefix: u16, byte: u8) -> Result<()> {
        self.packer.write_bits(prefix, self.bits)?;

        let past_limit = match self.dict.add(Some(prefix), byte) {
            Insertion::Assigned(code) => code > self.limit,
            Insertion::TableFull => true,
        };
        if past_limit {
            if self.bits == MAX_BITS {
                self.packer
                    .write_bits(self.config.clear_code(), self.bits)?;
                self.dict.reset(self.config.code_size);
                self.bits = self.config.initial_bits();
            } else {
                self.bits += 1;
            }
            self.limit = self.config.code_limit(self.bits);
        }
        Ok(())
    }

    /// Emit the pending string, the END code, and flush the packer.
    pub fn flush(&mut self) -> Result<()> {
        if let Some(prefix) = self.prefix.take() {
            self.packer.write_bits(prefix, self.bits)?;
        }
        self.packer.write_bits(self.config.eoi_code(), self.bits)?;
        self.packer.flush()
    }

    /// Flush and return the sink.
    pub fn finish(mut self) -> Result<W> {
        self.flush()?;
        Ok(self.packer.into_inner())
    }

    /// Current code width in bits.
    pub fn code_width(&self) -> u8 {
        self.bits
    }
}
