/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Pixel types and single sample decoding
//!
//! Every band declares one of eleven pixel types, each type maps
//! to a fixed byte width and a numeric interpretation.
//!
//! | code | name  | bits | bytes | interpretation |
//! |------|-------|------|-------|----------------|
//! | 0    | 1BB   | 1    | 1     | unsigned       |
//! | 1    | 2BUI  | 2    | 1     | unsigned       |
//! | 2    | 4BUI  | 4    | 1     | unsigned       |
//! | 3    | 8BSI  | 8    | 1     | signed         |
//! | 4    | 8BUI  | 8    | 1     | unsigned       |
//! | 5    | 16BSI | 16   | 2     | signed         |
//! | 6    | 16BUI | 16   | 2     | unsigned       |
//! | 7    | 32BSI | 32   | 4     | signed         |
//! | 8    | 32BUI | 32   | 4     | unsigned       |
//! | 9    | 32BF  | 32   | 4     | float          |
//! | 10   | 64BF  | 64   | 8     | float          |
use core::fmt::{Display, Formatter};
use std::io::Read;

use crate::bytestream::WkbReader;
use crate::errors::WkbDecodeErrors;

/// How the bits of a sample should be interpreted
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum SampleFormat {
    Unsigned,
    Signed,
    Float
}

/// The pixel type of a band
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum PixelType {
    /// 1-bit boolean
    Bool1,
    /// 2-bit unsigned integer
    UInt2,
    /// 4-bit unsigned integer
    UInt4,
    /// 8-bit signed integer
    Int8,
    /// 8-bit unsigned integer
    UInt8,
    /// 16-bit signed integer
    Int16,
    /// 16-bit unsigned integer
    UInt16,
    /// 32-bit signed integer
    Int32,
    /// 32-bit unsigned integer
    UInt32,
    /// 32-bit IEEE float
    Float32,
    /// 64-bit IEEE float
    Float64
}

/// Pixel types indexed by their wire code
const PIXEL_TYPES: [PixelType; 11] = [
    PixelType::Bool1,
    PixelType::UInt2,
    PixelType::UInt4,
    PixelType::Int8,
    PixelType::UInt8,
    PixelType::Int16,
    PixelType::UInt16,
    PixelType::Int32,
    PixelType::UInt32,
    PixelType::Float32,
    PixelType::Float64
];

impl PixelType {
    /// Look up a pixel type by its code, `None` if the code is outside `0..=10`
    pub const fn from_code(code: u8) -> Option<PixelType> {
        if (code as usize) < PIXEL_TYPES.len() {
            Some(PIXEL_TYPES[code as usize])
        } else {
            None
        }
    }
    /// Derive the pixel type from the low nibble of a band's flag byte
    ///
    /// The nibble stores `code + 1`, a nibble of zero is invalid.
    pub fn from_nibble(nibble: u8) -> Result<PixelType, WkbDecodeErrors> {
        let nibble = nibble & 0x0F;

        nibble
            .checked_sub(1)
            .and_then(PixelType::from_code)
            .ok_or(WkbDecodeErrors::UnknownPixelType(nibble))
    }

    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Number of bytes a single sample of this type takes on the wire
    /// when stored one sample per byte
    pub const fn byte_width(self) -> usize {
        self.codec().byte_width()
    }

    /// Number of significant bits in a sample of this type
    pub const fn bit_width(self) -> usize {
        match self {
            PixelType::Bool1 => 1,
            PixelType::UInt2 => 2,
            PixelType::UInt4 => 4,
            _ => self.byte_width() * 8
        }
    }

    pub const fn format(self) -> SampleFormat {
        match self {
            PixelType::Int8 | PixelType::Int16 | PixelType::Int32 => SampleFormat::Signed,
            PixelType::Float32 | PixelType::Float64 => SampleFormat::Float,
            _ => SampleFormat::Unsigned
        }
    }

    /// Whether samples of this type are narrower than a byte
    pub const fn is_sub_byte(self) -> bool {
        matches!(self, PixelType::Bool1 | PixelType::UInt2 | PixelType::UInt4)
    }

    /// The handler used to decode samples of this type
    pub const fn codec(self) -> SampleCodec {
        match self {
            PixelType::Bool1 | PixelType::UInt2 | PixelType::UInt4 | PixelType::UInt8 => {
                SampleCodec::U8
            }
            PixelType::Int8 => SampleCodec::I8,
            PixelType::Int16 => SampleCodec::I16,
            PixelType::UInt16 => SampleCodec::U16,
            PixelType::Int32 => SampleCodec::I32,
            PixelType::UInt32 => SampleCodec::U32,
            PixelType::Float32 => SampleCodec::F32,
            PixelType::Float64 => SampleCodec::F64
        }
    }

    /// The name raster stores use for this type, e.g. `16BSI`
    pub const fn name(self) -> &'static str {
        match self {
            PixelType::Bool1 => "1BB",
            PixelType::UInt2 => "2BUI",
            PixelType::UInt4 => "4BUI",
            PixelType::Int8 => "8BSI",
            PixelType::UInt8 => "8BUI",
            PixelType::Int16 => "16BSI",
            PixelType::UInt16 => "16BUI",
            PixelType::Int32 => "32BSI",
            PixelType::UInt32 => "32BUI",
            PixelType::Float32 => "32BF",
            PixelType::Float64 => "64BF"
        }
    }
}

impl Display for PixelType {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// One handler per distinct width/signedness/float combination
///
/// Several pixel types share a handler, e.g. all sub-byte types
/// are read through [`SampleCodec::U8`]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum SampleCodec {
    U8,
    I8,
    U16,
    I16,
    U32,
    I32,
    F32,
    F64
}

impl SampleCodec {
    pub const fn byte_width(self) -> usize {
        match self {
            SampleCodec::U8 | SampleCodec::I8 => 1,
            SampleCodec::U16 | SampleCodec::I16 => 2,
            SampleCodec::U32 | SampleCodec::I32 | SampleCodec::F32 => 4,
            SampleCodec::F64 => 8
        }
    }

    /// Read exactly one sample, consuming [`byte_width`](Self::byte_width) bytes
    pub(crate) fn read_sample<R: Read>(
        self, stream: &mut WkbReader<R>
    ) -> Result<Sample, WkbDecodeErrors> {
        let sample = match self {
            SampleCodec::U8 => Sample::U8(stream.get_u8_err()?),
            SampleCodec::I8 => Sample::I8(stream.get_i8()?),
            SampleCodec::U16 => Sample::U16(stream.get_u16()?),
            SampleCodec::I16 => Sample::I16(stream.get_i16()?),
            SampleCodec::U32 => Sample::U32(stream.get_u32()?),
            SampleCodec::I32 => Sample::I32(stream.get_i32()?),
            SampleCodec::F32 => Sample::F32(stream.get_f32()?),
            SampleCodec::F64 => Sample::F64(stream.get_f64()?)
        };
        Ok(sample)
    }
}

/// A single decoded pixel or no-data value
///
/// Samples keep the width and interpretation of their pixel type,
/// use [`as_f64`](Self::as_f64) or [`as_i64`](Self::as_i64) to widen them.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Sample {
    U8(u8),
    I8(i8),
    U16(u16),
    I16(i16),
    U32(u32),
    I32(i32),
    F32(f32),
    F64(f64)
}

impl Sample {
    /// Widen to a 64-bit float, exact for every variant
    pub fn as_f64(self) -> f64 {
        match self {
            Sample::U8(v) => f64::from(v),
            Sample::I8(v) => f64::from(v),
            Sample::U16(v) => f64::from(v),
            Sample::I16(v) => f64::from(v),
            Sample::U32(v) => f64::from(v),
            Sample::I32(v) => f64::from(v),
            Sample::F32(v) => f64::from(v),
            Sample::F64(v) => v
        }
    }

    /// Widen to a 64-bit signed integer
    ///
    /// Integer samples always convert, float samples only
    /// when they hold a whole number inside the `i64` range.
    pub fn as_i64(self) -> Option<i64> {
        match self {
            Sample::U8(v) => Some(i64::from(v)),
            Sample::I8(v) => Some(i64::from(v)),
            Sample::U16(v) => Some(i64::from(v)),
            Sample::I16(v) => Some(i64::from(v)),
            Sample::U32(v) => Some(i64::from(v)),
            Sample::I32(v) => Some(i64::from(v)),
            Sample::F32(v) => float_to_i64(f64::from(v)),
            Sample::F64(v) => float_to_i64(v)
        }
    }

    /// The handler this sample was decoded with
    pub const fn codec(self) -> SampleCodec {
        match self {
            Sample::U8(_) => SampleCodec::U8,
            Sample::I8(_) => SampleCodec::I8,
            Sample::U16(_) => SampleCodec::U16,
            Sample::I16(_) => SampleCodec::I16,
            Sample::U32(_) => SampleCodec::U32,
            Sample::I32(_) => SampleCodec::I32,
            Sample::F32(_) => SampleCodec::F32,
            Sample::F64(_) => SampleCodec::F64
        }
    }

    /// Compare two samples the way a no-data check should,
    /// `NaN` matches `NaN`.
    pub fn matches(self, other: Sample) -> bool {
        match (self, other) {
            (Sample::F32(a), Sample::F32(b)) => a == b || (a.is_nan() && b.is_nan()),
            (Sample::F64(a), Sample::F64(b)) => a == b || (a.is_nan() && b.is_nan()),
            (a, b) => a == b
        }
    }
}

fn float_to_i64(value: f64) -> Option<i64> {
    // 2^63 is exactly representable, i64::MAX is not
    const LIMIT: f64 = 9_223_372_036_854_775_808.0;

    if value.fract() == 0.0 && value >= -LIMIT && value < LIMIT {
        Some(value as i64)
    } else {
        None
    }
}

impl Display for Sample {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Sample::U8(v) => write!(f, "{v}"),
            Sample::I8(v) => write!(f, "{v}"),
            Sample::U16(v) => write!(f, "{v}"),
            Sample::I16(v) => write!(f, "{v}"),
            Sample::U32(v) => write!(f, "{v}"),
            Sample::I32(v) => write!(f, "{v}"),
            Sample::F32(v) => write!(f, "{v}"),
            Sample::F64(v) => write!(f, "{v}")
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::bytestream::{ByteOrder, WkbReader};
    use crate::errors::WkbDecodeErrors;
    use crate::pixel::{PixelType, Sample, SampleCodec, SampleFormat};

    #[test]
    fn codes_round_trip_through_table() {
        for code in 0..=10_u8 {
            let ty = PixelType::from_code(code).unwrap();
            assert_eq!(ty.code(), code);
            assert_eq!(PixelType::from_nibble(code + 1).unwrap(), ty);
        }
        assert!(PixelType::from_code(11).is_none());
    }

    #[test]
    fn widths_match_table() {
        let expected = [1, 1, 1, 1, 1, 2, 2, 4, 4, 4, 8];

        for (code, width) in expected.iter().enumerate() {
            let ty = PixelType::from_code(code as u8).unwrap();
            assert_eq!(ty.byte_width(), *width, "{ty}");
        }
        assert_eq!(PixelType::Bool1.bit_width(), 1);
        assert_eq!(PixelType::UInt4.bit_width(), 4);
        assert_eq!(PixelType::Float64.bit_width(), 64);
    }

    #[test]
    fn formats_match_table() {
        use SampleFormat::*;
        let expected = [
            Unsigned, Unsigned, Unsigned, Signed, Unsigned, Signed, Unsigned, Signed, Unsigned,
            Float, Float
        ];
        for (code, format) in expected.iter().enumerate() {
            assert_eq!(PixelType::from_code(code as u8).unwrap().format(), *format);
        }
    }

    #[test]
    fn zero_and_out_of_range_nibbles_are_rejected() {
        for nibble in [0_u8, 12, 13, 14, 15] {
            match PixelType::from_nibble(nibble) {
                Err(WkbDecodeErrors::UnknownPixelType(n)) => assert_eq!(n, nibble),
                other => panic!("nibble {nibble} gave {other:?}")
            }
        }
    }

    #[test]
    fn sample_read_consumes_exactly_width() {
        // more bytes than any type needs
        let data = [0xAB_u8; 16];

        for code in 0..=10_u8 {
            let ty = PixelType::from_code(code).unwrap();
            for endian in [ByteOrder::BigEndian, ByteOrder::LittleEndian] {
                let mut reader = WkbReader::new(&data[..]);
                reader.set_endian(endian);
                ty.codec().read_sample(&mut reader).unwrap();
                assert_eq!(reader.position(), ty.byte_width() as u64, "{ty}");
            }
        }
    }

    #[test]
    fn signed_and_unsigned_interpretation() {
        let data = [0xFF_u8, 0xFF];

        let mut reader = WkbReader::new(&data[..]);
        assert_eq!(
            SampleCodec::I16.read_sample(&mut reader).unwrap(),
            Sample::I16(-1)
        );
        let mut reader = WkbReader::new(&data[..]);
        assert_eq!(
            SampleCodec::U16.read_sample(&mut reader).unwrap(),
            Sample::U16(u16::MAX)
        );
        let mut reader = WkbReader::new(&data[..]);
        assert_eq!(
            SampleCodec::I8.read_sample(&mut reader).unwrap(),
            Sample::I8(-1)
        );
    }

    #[test]
    fn floats_keep_fractions() {
        let data = 2.75_f32.to_be_bytes();
        let mut reader = WkbReader::new(&data[..]);
        reader.set_endian(ByteOrder::BigEndian);

        let sample = SampleCodec::F32.read_sample(&mut reader).unwrap();
        assert_eq!(sample, Sample::F32(2.75));
        assert_eq!(sample.as_f64(), 2.75);
        assert_eq!(sample.as_i64(), None);
        assert_eq!(Sample::F64(-3.0).as_i64(), Some(-3));
        assert_eq!(Sample::F64(f64::NAN).as_i64(), None);
    }

    #[test]
    fn nan_matches_nan() {
        assert!(Sample::F64(f64::NAN).matches(Sample::F64(f64::NAN)));
        assert!(!Sample::F64(f64::NAN).matches(Sample::F64(0.0)));
        assert!(!Sample::I16(1).matches(Sample::U16(1)));
    }
}
