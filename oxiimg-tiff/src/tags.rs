//! Common TIFF tag numbers and values.

/// NewSubfileType
pub const NEW_SUBFILE_TYPE: u16 = 254;
/// ImageWidth
pub const IMAGE_WIDTH: u16 = 256;
/// ImageLength
pub const IMAGE_LENGTH: u16 = 257;
/// BitsPerSample
pub const BITS_PER_SAMPLE: u16 = 258;
/// Compression
pub const COMPRESSION: u16 = 259;
/// PhotometricInterpretation
pub const PHOTOMETRIC_INTERPRETATION: u16 = 262;
/// FillOrder
pub const FILL_ORDER: u16 = 266;
/// ImageDescription
pub const IMAGE_DESCRIPTION: u16 = 270;
/// Make
pub const MAKE: u16 = 271;
/// Model
pub const MODEL: u16 = 272;
/// StripOffsets
pub const STRIP_OFFSETS: u16 = 273;
/// Orientation
pub const ORIENTATION: u16 = 274;
/// SamplesPerPixel
pub const SAMPLES_PER_PIXEL: u16 = 277;
/// RowsPerStrip
pub const ROWS_PER_STRIP: u16 = 278;
/// StripByteCounts
pub const STRIP_BYTE_COUNTS: u16 = 279;
/// XResolution
pub const X_RESOLUTION: u16 = 282;
/// YResolution
pub const Y_RESOLUTION: u16 = 283;
/// PlanarConfiguration
pub const PLANAR_CONFIGURATION: u16 = 284;
/// ResolutionUnit
pub const RESOLUTION_UNIT: u16 = 296;
/// Software
pub const SOFTWARE: u16 = 305;
/// DateTime
pub const DATE_TIME: u16 = 306;
/// Artist
pub const ARTIST: u16 = 315;
/// Predictor
pub const PREDICTOR: u16 = 317;
/// ColorMap
pub const COLOR_MAP: u16 = 320;
/// TileWidth
pub const TILE_WIDTH: u16 = 322;
/// TileLength
pub const TILE_LENGTH: u16 = 323;
/// TileOffsets
pub const TILE_OFFSETS: u16 = 324;
/// TileByteCounts
pub const TILE_BYTE_COUNTS: u16 = 325;
/// ExtraSamples
pub const EXTRA_SAMPLES: u16 = 338;
/// SampleFormat
pub const SAMPLE_FORMAT: u16 = 339;
/// JPEGTables
pub const JPEG_TABLES: u16 = 347;
/// Copyright
pub const COPYRIGHT: u16 = 33432;
/// ICC profile (InterColorProfile)
pub const ICC_PROFILE: u16 = 34675;

/// Compression: none.
pub const COMPRESSION_NONE: u16 = 1;
/// Compression: CCITT Group 3 fax.
pub const COMPRESSION_CCITT_T4: u16 = 3;
/// Compression: CCITT Group 4 fax.
pub const COMPRESSION_CCITT_T6: u16 = 4;
/// Compression: LZW.
pub const COMPRESSION_LZW: u16 = 5;
/// Compression: Adobe deflate.
pub const COMPRESSION_ADOBE_DEFLATE: u16 = 8;
/// Compression: PackBits.
pub const COMPRESSION_PACKBITS: u16 = 32773;

/// Photometric: 0 is white.
pub const PHOTOMETRIC_MIN_IS_WHITE: u16 = 0;
/// Photometric: 0 is black.
pub const PHOTOMETRIC_MIN_IS_BLACK: u16 = 1;
/// Photometric: RGB.
pub const PHOTOMETRIC_RGB: u16 = 2;
/// Photometric: palette.
pub const PHOTOMETRIC_PALETTE: u16 = 3;
/// Photometric: separated (CMYK).
pub const PHOTOMETRIC_SEPARATED: u16 = 5;
