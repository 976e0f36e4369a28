//! TIFF horizontal differencing predictor (Predictor tag value 2).
//!
//! Encoding replaces every sample from the second pixel of a row onward by
//! its difference to the same sample of the previous pixel; decoding adds it
//! back. Both use wrapping byte arithmetic.

/// Strip predictor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Predictor {
    /// Samples are stored as-is (tag value 1).
    #[default]
    None,
    /// Samples are stored as horizontal differences (tag value 2).
    HorizontalDifferencing,
}

impl Predictor {
    /// Map a TIFF Predictor tag value.
    ///
    /// Unknown values, including floating-point prediction (3), are treated as
    /// no prediction.
    pub fn from_tag_value(value: u16) -> Self {
        match value {
            2 => Predictor::HorizontalDifferencing,
            _ => Predictor::None,
        }
    }

    /// The TIFF Predictor tag value.
    pub fn tag_value(self) -> u16 {
        match self {
            Predictor::None => 1,
            Predictor::HorizontalDifferencing => 2,
        }
    }
}

/// Replace samples of one row by their horizontal differences, in place.
pub fn difference_row(row: &mut [u8], samples_per_pixel: usize) {
    if samples_per_pixel == 0 {
        return;
    }
    for i in (samples_per_pixel..row.len()).rev() {
        row[i] = row[i].wrapping_sub(row[i - samples_per_pixel]);
    }
}

/// Undo horizontal differencing on one row, in place.
pub fn accumulate_row(row: &mut [u8], samples_per_pixel: usize) {
    if samples_per_pixel == 0 {
        return;
    }
    for i in samples_per_pixel..row.len() {
        row[i] = row[i].wrapping_add(row[i - samples_per_pixel]);
    }
}

/// Undo horizontal differencing on up to `rows` rows of `stride` bytes.
///
/// Rows that are not fully present in `data` are left untouched.
pub fn accumulate_rows(data: &mut [u8], stride: usize, rows: usize, samples_per_pixel: usize) {
    if stride == 0 {
        return;
    }
    for row in data.chunks_exact_mut(stride).take(rows) {
        accumulate_row(row, samples_per_pixel);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_sample_row() {
        let original = [10u8, 20, 5, 15];
        let mut row = original;
        difference_row(&mut row, 2);
        assert_eq!(row, [10, 20, 5u8.wrapping_sub(10), 15u8.wrapping_sub(20)]);
        assert_eq!(row, [10, 20, 251, 251]);

        accumulate_row(&mut row, 2);
        assert_eq!(row, original);
    }

    #[test]
    fn test_wraparound_not_saturating() {
        let mut row = [250u8, 10];
        accumulate_row(&mut row, 1);
        assert_eq!(row, [250, 4]);
    }

    #[test]
    fn test_rows_are_independent() {
        let mut data = vec![1u8, 1, 1, 7, 1, 1];
        accumulate_rows(&mut data, 3, 2, 1);
        assert_eq!(data, vec![1, 2, 3, 7, 8, 9]);
    }

    #[test]
    fn test_partial_trailing_row_untouched() {
        let mut data = vec![1u8, 1, 1, 5, 5];
        accumulate_rows(&mut data, 3, 2, 1);
        assert_eq!(data, vec![1, 2, 3, 5, 5]);
    }

    #[test]
    fn test_tag_values() {
        assert_eq!(
            Predictor::from_tag_value(2),
            Predictor::HorizontalDifferencing
        );
        assert_eq!(Predictor::from_tag_value(1), Predictor::None);
        assert_eq!(Predictor::HorizontalDifferencing.tag_value(), 2);
    }
}
