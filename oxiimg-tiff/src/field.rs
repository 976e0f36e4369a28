//! Typed IFD field values.

use crate::error::{Result, TiffError};
use crate::types::FieldType;
use oxiimg_core::ByteOrder;

/// Values of one field, one variant per [`FieldType`].
///
/// SHORT values are kept unsigned; rationals are `[numerator, denominator]`.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValues {
    /// BYTE values.
    Byte(Vec<u8>),
    /// ASCII strings, without their NUL terminators.
    Ascii(Vec<String>),
    /// SHORT values.
    Short(Vec<u16>),
    /// LONG values.
    Long(Vec<u32>),
    /// RATIONAL values.
    Rational(Vec<[u32; 2]>),
    /// SBYTE values.
    SByte(Vec<i8>),
    /// UNDEFINED bytes.
    Undefined(Vec<u8>),
    /// SSHORT values.
    SShort(Vec<i16>),
    /// SLONG values.
    SLong(Vec<i32>),
    /// SRATIONAL values.
    SRational(Vec<[i32; 2]>),
    /// FLOAT values.
    Float(Vec<f32>),
    /// DOUBLE values.
    Double(Vec<f64>),
}

impl FieldValues {
    /// The field type these values are stored as.
    pub fn field_type(&self) -> FieldType {
        match self {
            Self::Byte(_) => FieldType::Byte,
            Self::Ascii(_) => FieldType::Ascii,
            Self::Short(_) => FieldType::Short,
            Self::Long(_) => FieldType::Long,
            Self::Rational(_) => FieldType::Rational,
            Self::SByte(_) => FieldType::SByte,
            Self::Undefined(_) => FieldType::Undefined,
            Self::SShort(_) => FieldType::SShort,
            Self::SLong(_) => FieldType::SLong,
            Self::SRational(_) => FieldType::SRational,
            Self::Float(_) => FieldType::Float,
            Self::Double(_) => FieldType::Double,
        }
    }

    /// Number of values; for ASCII, the number of strings.
    pub fn len(&self) -> usize {
        match self {
            Self::Byte(v) | Self::Undefined(v) => v.len(),
            Self::Ascii(v) => v.len(),
            Self::Short(v) => v.len(),
            Self::Long(v) => v.len(),
            Self::Rational(v) => v.len(),
            Self::SByte(v) => v.len(),
            Self::SShort(v) => v.len(),
            Self::SLong(v) => v.len(),
            Self::SRational(v) => v.len(),
            Self::Float(v) => v.len(),
            Self::Double(v) => v.len(),
        }
    }

    /// Whether there are no values.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Count as written in an IFD entry; for ASCII, the byte count
    /// including every terminator.
    pub fn entry_count(&self) -> usize {
        match self {
            Self::Ascii(strings) => strings.iter().map(|s| s.len() + 1).sum(),
            other => other.len(),
        }
    }

    /// Decode `count` values of `field_type` from `bytes`.
    ///
    /// `bytes` must hold at least `count * field_type.size()` bytes.
    pub(crate) fn decode(
        field_type: FieldType,
        count: usize,
        bytes: &[u8],
        order: ByteOrder,
    ) -> Self {
        let chunks = |size: usize| bytes.chunks_exact(size).take(count);
        let u16_at = |c: &[u8]| order.u16_from([c[0], c[1]]);
        let u32_at = |c: &[u8]| order.u32_from([c[0], c[1], c[2], c[3]]);
        let u64_at = |c: &[u8]| order.u64_from([c[0], c[1], c[2], c[3], c[4], c[5], c[6], c[7]]);

        match field_type {
            FieldType::Byte => Self::Byte(bytes[..count].to_vec()),
            FieldType::Undefined => Self::Undefined(bytes[..count].to_vec()),
            FieldType::SByte => Self::SByte(bytes[..count].iter().map(|&b| b as i8).collect()),
            FieldType::Ascii => Self::Ascii(split_ascii(&bytes[..count])),
            FieldType::Short => Self::Short(chunks(2).map(u16_at).collect()),
            FieldType::SShort => Self::SShort(chunks(2).map(|c| u16_at(c) as i16).collect()),
            FieldType::Long => Self::Long(chunks(4).map(u32_at).collect()),
            FieldType::SLong => Self::SLong(chunks(4).map(|c| u32_at(c) as i32).collect()),
            FieldType::Float => Self::Float(chunks(4).map(|c| f32::from_bits(u32_at(c))).collect()),
            FieldType::Rational => Self::Rational(
                chunks(8)
                    .map(|c| [u32_at(&c[..4]), u32_at(&c[4..])])
                    .collect(),
            ),
            FieldType::SRational => Self::SRational(
                chunks(8)
                    .map(|c| [u32_at(&c[..4]) as i32, u32_at(&c[4..]) as i32])
                    .collect(),
            ),
            FieldType::Double => {
                Self::Double(chunks(8).map(|c| f64::from_bits(u64_at(c))).collect())
            }
        }
    }

    /// Serialize the values in `order`.
    pub(crate) fn encode(&self, order: ByteOrder) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.entry_count() * self.field_type().size() as usize);
        match self {
            Self::Byte(v) | Self::Undefined(v) => out.extend_from_slice(v),
            Self::SByte(v) => out.extend(v.iter().map(|&b| b as u8)),
            Self::Ascii(strings) => {
                for s in strings {
                    out.extend_from_slice(s.as_bytes());
                    out.push(0);
                }
            }
            Self::Short(v) => v.iter().for_each(|&x| order.put_u16(&mut out, x)),
            Self::SShort(v) => v.iter().for_each(|&x| order.put_u16(&mut out, x as u16)),
            Self::Long(v) => v.iter().for_each(|&x| order.put_u32(&mut out, x)),
            Self::SLong(v) => v.iter().for_each(|&x| order.put_u32(&mut out, x as u32)),
            Self::Float(v) => v.iter().for_each(|&x| order.put_u32(&mut out, x.to_bits())),
            Self::Double(v) => v.iter().for_each(|&x| order.put_u64(&mut out, x.to_bits())),
            Self::Rational(v) => v.iter().for_each(|&[n, d]| {
                order.put_u32(&mut out, n);
                order.put_u32(&mut out, d);
            }),
            Self::SRational(v) => v.iter().for_each(|&[n, d]| {
                order.put_u32(&mut out, n as u32);
                order.put_u32(&mut out, d as u32);
            }),
        }
        out
    }
}

/// Split packed ASCII data into its NUL-terminated strings.
///
/// Runs of NULs produce no empty strings; trailing text without a
/// terminator still forms a string.
fn split_ascii(bytes: &[u8]) -> Vec<String> {
    bytes
        .split(|&b| b == 0)
        .filter(|s| !s.is_empty())
        .map(|s| String::from_utf8_lossy(s).into_owned())
        .collect()
}

/// One IFD entry: a tag and its typed values.
#[derive(Debug, Clone, PartialEq)]
pub struct TiffField {
    tag: u16,
    values: FieldValues,
}

impl TiffField {
    /// Create a field.
    pub fn new(tag: u16, values: FieldValues) -> Self {
        Self { tag, values }
    }

    /// SHORT field.
    pub fn short(tag: u16, values: impl Into<Vec<u16>>) -> Self {
        Self::new(tag, FieldValues::Short(values.into()))
    }

    /// LONG field.
    pub fn long(tag: u16, values: impl Into<Vec<u32>>) -> Self {
        Self::new(tag, FieldValues::Long(values.into()))
    }

    /// RATIONAL field.
    pub fn rational(tag: u16, values: impl Into<Vec<[u32; 2]>>) -> Self {
        Self::new(tag, FieldValues::Rational(values.into()))
    }

    /// BYTE field.
    pub fn byte(tag: u16, values: impl Into<Vec<u8>>) -> Self {
        Self::new(tag, FieldValues::Byte(values.into()))
    }

    /// UNDEFINED field.
    pub fn undefined(tag: u16, values: impl Into<Vec<u8>>) -> Self {
        Self::new(tag, FieldValues::Undefined(values.into()))
    }

    /// ASCII field holding one string.
    pub fn ascii(tag: u16, value: impl Into<String>) -> Self {
        Self::new(tag, FieldValues::Ascii(vec![value.into()]))
    }

    /// Field tag.
    pub fn tag(&self) -> u16 {
        self.tag
    }

    /// Field type.
    pub fn field_type(&self) -> FieldType {
        self.values.field_type()
    }

    /// Number of values (strings, for ASCII).
    pub fn count(&self) -> usize {
        self.values.len()
    }

    /// The typed values.
    pub fn values(&self) -> &FieldValues {
        &self.values
    }

    fn mismatch(&self, requested: &'static str) -> TiffError {
        TiffError::TypeMismatch {
            tag: self.tag,
            field_type: self.field_type(),
            requested,
        }
    }

    fn checked<T: Copy>(&self, values: &[T], index: usize) -> Result<T> {
        values
            .get(index)
            .copied()
            .ok_or(TiffError::ValueIndexOutOfRange {
                tag: self.tag,
                index,
                count: values.len(),
            })
    }

    /// Integer value at `index`, widened to `i64`.
    ///
    /// Defined for BYTE, SBYTE, UNDEFINED, SHORT, SSHORT, LONG and SLONG.
    pub fn as_long(&self, index: usize) -> Result<i64> {
        match &self.values {
            FieldValues::Byte(v) | FieldValues::Undefined(v) => Ok(self.checked(v, index)? as i64),
            FieldValues::SByte(v) => Ok(self.checked(v, index)? as i64),
            FieldValues::Short(v) => Ok(self.checked(v, index)? as i64),
            FieldValues::SShort(v) => Ok(self.checked(v, index)? as i64),
            FieldValues::Long(v) => Ok(self.checked(v, index)? as i64),
            FieldValues::SLong(v) => Ok(self.checked(v, index)? as i64),
            _ => Err(self.mismatch("integer")),
        }
    }

    /// Integer value at `index` as `i32`; LONG values above `i32::MAX` wrap.
    pub fn as_int(&self, index: usize) -> Result<i32> {
        self.as_long(index).map(|v| v as i32)
    }

    /// Numeric value at `index` as `f64`.
    ///
    /// Defined for every integer type plus FLOAT, DOUBLE, RATIONAL and
    /// SRATIONAL (numerator divided by denominator).
    pub fn as_double(&self, index: usize) -> Result<f64> {
        match &self.values {
            FieldValues::Float(v) => Ok(self.checked(v, index)? as f64),
            FieldValues::Double(v) => self.checked(v, index),
            FieldValues::Rational(v) => {
                let [n, d] = self.checked(v, index)?;
                Ok(n as f64 / d as f64)
            }
            FieldValues::SRational(v) => {
                let [n, d] = self.checked(v, index)?;
                Ok(n as f64 / d as f64)
            }
            FieldValues::Ascii(_) => Err(self.mismatch("floating point")),
            _ => self.as_long(index).map(|v| v as f64),
        }
    }

    /// Numeric value at `index` as `f32`.
    pub fn as_float(&self, index: usize) -> Result<f32> {
        self.as_double(index).map(|v| v as f32)
    }

    /// String at `index` of an ASCII field.
    pub fn as_ascii(&self, index: usize) -> Result<&str> {
        match &self.values {
            FieldValues::Ascii(strings) => strings
                .get(index)
                .map(String::as_str)
                .ok_or(TiffError::ValueIndexOutOfRange {
                    tag: self.tag,
                    index,
                    count: strings.len(),
                }),
            _ => Err(self.mismatch("ASCII")),
        }
    }

    /// Raw bytes of a BYTE or UNDEFINED field.
    pub fn as_bytes(&self) -> Result<&[u8]> {
        match &self.values {
            FieldValues::Byte(v) | FieldValues::Undefined(v) => Ok(v),
            _ => Err(self.mismatch("bytes")),
        }
    }

    /// Values of a SHORT field.
    pub fn as_shorts(&self) -> Result<&[u16]> {
        match &self.values {
            FieldValues::Short(v) => Ok(v),
            _ => Err(self.mismatch("SHORT array")),
        }
    }

    /// Values of a LONG field.
    pub fn as_longs(&self) -> Result<&[u32]> {
        match &self.values {
            FieldValues::Long(v) => Ok(v),
            _ => Err(self.mismatch("LONG array")),
        }
    }

    /// Values of a RATIONAL field.
    pub fn as_rationals(&self) -> Result<&[[u32; 2]]> {
        match &self.values {
            FieldValues::Rational(v) => Ok(v),
            _ => Err(self.mismatch("RATIONAL array")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_widening() {
        let field = TiffField::new(1, FieldValues::SShort(vec![-5, 7]));
        assert_eq!(field.as_long(0).unwrap(), -5);
        assert_eq!(field.as_int(1).unwrap(), 7);
        assert_eq!(field.as_double(0).unwrap(), -5.0);

        let undefined = TiffField::undefined(2, vec![200u8]);
        assert_eq!(undefined.as_long(0).unwrap(), 200);
    }

    #[test]
    fn test_long_wraps_in_as_int() {
        let field = TiffField::long(1, vec![0xFFFF_FFFFu32]);
        assert_eq!(field.as_long(0).unwrap(), 0xFFFF_FFFF);
        assert_eq!(field.as_int(0).unwrap(), -1);
    }

    #[test]
    fn test_rational_as_double() {
        let field = TiffField::rational(282, vec![[300u32, 2]]);
        assert_eq!(field.as_double(0).unwrap(), 150.0);
        assert_eq!(field.as_float(0).unwrap(), 150.0);
        assert!(matches!(
            field.as_long(0),
            Err(TiffError::TypeMismatch { tag: 282, .. })
        ));

        let signed = TiffField::new(9, FieldValues::SRational(vec![[-1, 4]]));
        assert_eq!(signed.as_double(0).unwrap(), -0.25);
    }

    #[test]
    fn test_ascii_is_not_numeric() {
        let field = TiffField::ascii(305, "oxiimg");
        assert!(matches!(field.as_long(0), Err(TiffError::TypeMismatch { .. })));
        assert!(matches!(field.as_double(0), Err(TiffError::TypeMismatch { .. })));
        assert_eq!(field.as_ascii(0).unwrap(), "oxiimg");
        assert_eq!(field.count(), 1);
        assert_eq!(field.values().entry_count(), 7);
    }

    #[test]
    fn test_index_out_of_range() {
        let field = TiffField::short(256, vec![1u16, 2]);
        assert!(matches!(
            field.as_long(2),
            Err(TiffError::ValueIndexOutOfRange {
                tag: 256,
                index: 2,
                count: 2
            })
        ));
    }

    #[test]
    fn test_split_ascii() {
        assert_eq!(split_ascii(b"abc\0"), vec!["abc"]);
        assert_eq!(split_ascii(b"abc\0de\0"), vec!["abc", "de"]);
        assert_eq!(split_ascii(b"abc\0\0de"), vec!["abc", "de"]);
        assert!(split_ascii(b"\0").is_empty());
    }

    #[test]
    fn test_encode_decode_each_order() {
        let values = FieldValues::SRational(vec![[-3, 7], [5, -9]]);
        for order in [ByteOrder::BigEndian, ByteOrder::LittleEndian] {
            let bytes = values.encode(order);
            assert_eq!(bytes.len(), 16);
            assert_eq!(
                FieldValues::decode(FieldType::SRational, 2, &bytes, order),
                values
            );
        }

        let doubles = FieldValues::Double(vec![1.5, -0.125]);
        let bytes = doubles.encode(ByteOrder::LittleEndian);
        assert_eq!(
            FieldValues::decode(FieldType::Double, 2, &bytes, ByteOrder::LittleEndian),
            doubles
        );
    }
}
