//! TIFF field types.

/// Field type code of an IFD entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    /// 8-bit unsigned integer (1).
    Byte,
    /// NUL-terminated 7-bit ASCII text (2).
    Ascii,
    /// 16-bit unsigned integer (3).
    Short,
    /// 32-bit unsigned integer (4).
    Long,
    /// Two LONGs: numerator, denominator (5).
    Rational,
    /// 8-bit signed integer (6).
    SByte,
    /// Opaque byte (7).
    Undefined,
    /// 16-bit signed integer (8).
    SShort,
    /// 32-bit signed integer (9).
    SLong,
    /// Two SLONGs: numerator, denominator (10).
    SRational,
    /// IEEE single precision (11).
    Float,
    /// IEEE double precision (12).
    Double,
}

impl FieldType {
    /// Decode a type code; `None` for codes outside 1..=12.
    pub fn from_code(code: u16) -> Option<Self> {
        Some(match code {
            1 => Self::Byte,
            2 => Self::Ascii,
            3 => Self::Short,
            4 => Self::Long,
            5 => Self::Rational,
            6 => Self::SByte,
            7 => Self::Undefined,
            8 => Self::SShort,
            9 => Self::SLong,
            10 => Self::SRational,
            11 => Self::Float,
            12 => Self::Double,
            _ => return None,
        })
    }

    /// The type code written to an IFD entry.
    pub fn code(self) -> u16 {
        match self {
            Self::Byte => 1,
            Self::Ascii => 2,
            Self::Short => 3,
            Self::Long => 4,
            Self::Rational => 5,
            Self::SByte => 6,
            Self::Undefined => 7,
            Self::SShort => 8,
            Self::SLong => 9,
            Self::SRational => 10,
            Self::Float => 11,
            Self::Double => 12,
        }
    }

    /// Size of one value in bytes.
    pub fn size(self) -> u64 {
        match self {
            Self::Byte | Self::Ascii | Self::SByte | Self::Undefined => 1,
            Self::Short | Self::SShort => 2,
            Self::Long | Self::SLong | Self::Float => 4,
            Self::Rational | Self::SRational | Self::Double => 8,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_roundtrip() {
        for code in 1..=12u16 {
            let field_type = FieldType::from_code(code).unwrap();
            assert_eq!(field_type.code(), code);
        }
        assert_eq!(FieldType::from_code(0), None);
        assert_eq!(FieldType::from_code(13), None);
    }

    #[test]
    fn test_sizes() {
        let sizes: Vec<u64> = (1..=12u16)
            .map(|c| FieldType::from_code(c).unwrap().size())
            .collect();
        assert_eq!(sizes, vec![1, 1, 2, 4, 8, 1, 1, 2, 4, 8, 4, 8]);
    }
}
