//! LZW configuration for the two framing conventions (GIF, TIFF).

use crate::bitstream::BitOrder;
use crate::error::{LzwError, Result};

/// Largest code width in bits; the code table holds `1 << MAX_BITS` entries.
pub const MAX_BITS: u8 = 12;

/// How packed codes are laid out in the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Framing {
    /// 255-byte sub-blocks, each prefixed by its length byte; LSB-first codes.
    Blocked,
    /// One flat byte stream; MSB-first codes.
    Unblocked,
}

/// LZW configuration parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LzwConfig {
    /// Bits per literal symbol (8 for TIFF, 2..=8 for GIF).
    pub code_size: u8,
    /// Output framing, which also fixes the bit order.
    pub framing: Framing,
    /// Whether code width grows one code earlier (the TIFF convention).
    pub early_change: bool,
}

impl LzwConfig {
    /// Standard TIFF LZW configuration.
    ///
    /// - MSB-first, unblocked
    /// - 9-12 bit codes
    /// - Early code change
    pub const TIFF: Self = Self {
        code_size: 8,
        framing: Framing::Unblocked,
        early_change: true,
    };

    /// Standard GIF LZW configuration for 8-bit symbols.
    ///
    /// - LSB-first, 255-byte sub-blocks
    /// - 9-12 bit codes
    /// - Standard code change
    pub const GIF: Self = Self {
        code_size: 8,
        framing: Framing::Blocked,
        early_change: false,
    };

    /// GIF configuration for a given minimum code size.
    pub fn gif(code_size: u8) -> Self {
        Self {
            code_size,
            ..Self::GIF
        }
    }

    /// Check that the code size is usable.
    pub fn validate(&self) -> Result<()> {
        if !(2..=8).contains(&self.code_size) {
            return Err(LzwError::InvalidCodeSize(self.code_size));
        }
        Ok(())
    }

    /// Bit order implied by the framing.
    pub fn bit_order(&self) -> BitOrder {
        match self.framing {
            Framing::Blocked => BitOrder::Lsb,
            Framing::Unblocked => BitOrder::Msb,
        }
    }

    /// Get the clear code value (256 for 8-bit symbols).
    pub fn clear_code(&self) -> u16 {
        1 << self.code_size
    }

    /// Get the end-of-information code value (clear_code + 1).
    pub fn eoi_code(&self) -> u16 {
        self.clear_code() + 1
    }

    /// Get the first code available for multi-byte strings.
    pub fn first_code(&self) -> u16 {
        self.eoi_code() + 1
    }

    /// Code width right after a reset.
    pub fn initial_bits(&self) -> u8 {
        self.code_size + 1
    }

    /// Largest code the encoder may assign at `bits` before growing.
    ///
    /// TIFF's early change moves every threshold down by one.
    pub fn code_limit(&self, bits: u8) -> u16 {
        let limit = (1u16 << bits) - 1;
        if self.early_change { limit - 1 } else { limit }
    }

    /// Table size at which a decoder widens its codes past `bits`.
    pub fn decoder_threshold(&self, bits: u8) -> usize {
        let threshold = 1usize << bits;
        if self.early_change {
            threshold - 1
        } else {
            threshold
        }
    }
}
