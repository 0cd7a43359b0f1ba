/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Typed pixel storage for a band
use std::io::Read;

use log::trace;

use crate::bytestream::{ByteOrder, WkbReader};
use crate::errors::WkbDecodeErrors;
use crate::options::SubBytePacking;
use crate::pixel::{PixelType, Sample, SampleCodec};

/// Decoded samples of one band, row-major, in the width of their pixel type
#[derive(Clone, Debug, PartialEq)]
pub enum PixelData {
    U8(Vec<u8>),
    I8(Vec<i8>),
    U16(Vec<u16>),
    I16(Vec<i16>),
    U32(Vec<u32>),
    I32(Vec<i32>),
    F32(Vec<f32>),
    F64(Vec<f64>)
}

impl PixelData {
    pub fn len(&self) -> usize {
        match self {
            PixelData::U8(v) => v.len(),
            PixelData::I8(v) => v.len(),
            PixelData::U16(v) => v.len(),
            PixelData::I16(v) => v.len(),
            PixelData::U32(v) => v.len(),
            PixelData::I32(v) => v.len(),
            PixelData::F32(v) => v.len(),
            PixelData::F64(v) => v.len()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The handler whose samples this storage holds
    pub const fn codec(&self) -> SampleCodec {
        match self {
            PixelData::U8(_) => SampleCodec::U8,
            PixelData::I8(_) => SampleCodec::I8,
            PixelData::U16(_) => SampleCodec::U16,
            PixelData::I16(_) => SampleCodec::I16,
            PixelData::U32(_) => SampleCodec::U32,
            PixelData::I32(_) => SampleCodec::I32,
            PixelData::F32(_) => SampleCodec::F32,
            PixelData::F64(_) => SampleCodec::F64
        }
    }

    /// Sample at a flat row-major index
    pub fn get(&self, index: usize) -> Option<Sample> {
        match self {
            PixelData::U8(v) => v.get(index).copied().map(Sample::U8),
            PixelData::I8(v) => v.get(index).copied().map(Sample::I8),
            PixelData::U16(v) => v.get(index).copied().map(Sample::U16),
            PixelData::I16(v) => v.get(index).copied().map(Sample::I16),
            PixelData::U32(v) => v.get(index).copied().map(Sample::U32),
            PixelData::I32(v) => v.get(index).copied().map(Sample::I32),
            PixelData::F32(v) => v.get(index).copied().map(Sample::F32),
            PixelData::F64(v) => v.get(index).copied().map(Sample::F64)
        }
    }
}

/// A `height` x `width` matrix of samples
///
/// Row 0 is the topmost row and column 0 the leftmost column,
/// matching the order samples appear on the wire.
#[derive(Clone, Debug, PartialEq)]
pub struct PixelGrid {
    width:      usize,
    height:     usize,
    pixel_type: PixelType,
    data:       PixelData
}

impl PixelGrid {
    /// Create a grid from already decoded samples
    ///
    /// Fails if `data` does not hold exactly `width*height` samples
    /// or holds samples of a different width than `pixel_type`
    pub fn new(
        width: usize, height: usize, pixel_type: PixelType, data: PixelData
    ) -> Result<PixelGrid, WkbDecodeErrors> {
        if data.codec() != pixel_type.codec() {
            let msg = format!(
                "Pixel storage {:?} cannot hold samples of type {pixel_type}",
                data.codec()
            );
            return Err(WkbDecodeErrors::Generic(msg));
        }
        let expected = width
            .checked_mul(height)
            .ok_or("Grid dimensions overflow a usize")?;

        if data.len() != expected {
            let msg = format!(
                "Expected {expected} samples for a {width}x{height} grid but found {}",
                data.len()
            );
            return Err(WkbDecodeErrors::Generic(msg));
        }
        Ok(PixelGrid {
            width,
            height,
            pixel_type,
            data
        })
    }

    pub const fn width(&self) -> usize {
        self.width
    }

    pub const fn height(&self) -> usize {
        self.height
    }

    pub const fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub const fn pixel_type(&self) -> PixelType {
        self.pixel_type
    }

    pub const fn data(&self) -> &PixelData {
        &self.data
    }

    pub fn into_data(self) -> PixelData {
        self.data
    }

    /// Sample at `row`, `column`, `None` if out of bounds
    pub fn get(&self, row: usize, column: usize) -> Option<Sample> {
        if row >= self.height || column >= self.width {
            return None;
        }
        self.data.get(row * self.width + column)
    }

    pub fn row(&self, row: usize) -> Option<PixelRow<'_>> {
        if row >= self.height {
            return None;
        }
        Some(PixelRow {
            grid:  self,
            start: row * self.width
        })
    }

    /// Rows from top to bottom
    pub fn rows(&self) -> impl ExactSizeIterator<Item = PixelRow<'_>> + '_ {
        (0..self.height).map(move |row| PixelRow {
            grid:  self,
            start: row * self.width
        })
    }

    /// All samples in row-major order
    pub fn samples(&self) -> impl Iterator<Item = Sample> + '_ {
        (0..self.data.len()).filter_map(move |index| self.data.get(index))
    }

    /// Widen every sample to `f64`, one vector per row
    pub fn to_f64_rows(&self) -> Vec<Vec<f64>> {
        self.rows()
            .map(|row| row.iter().map(Sample::as_f64).collect())
            .collect()
    }
}

/// A borrowed row of a [`PixelGrid`]
#[derive(Copy, Clone, Debug)]
pub struct PixelRow<'a> {
    grid:  &'a PixelGrid,
    start: usize
}

impl<'a> PixelRow<'a> {
    pub const fn len(&self) -> usize {
        self.grid.width
    }

    pub const fn is_empty(&self) -> bool {
        self.grid.width == 0
    }

    pub fn get(&self, column: usize) -> Option<Sample> {
        if column >= self.grid.width {
            return None;
        }
        self.grid.data.get(self.start + column)
    }

    /// Samples from left to right
    pub fn iter(&self) -> impl Iterator<Item = Sample> + 'a {
        let grid = self.grid;
        (self.start..self.start + grid.width).filter_map(move |index| grid.data.get(index))
    }

    pub fn to_vec(&self) -> Vec<Sample> {
        self.iter().collect()
    }
}

#[inline(always)]
fn fixed<const N: usize>(chunk: &[u8]) -> [u8; N] {
    let mut bytes = [0; N];
    bytes.copy_from_slice(chunk);
    bytes
}

macro_rules! decode_rows {
    ($stream:expr, $width:expr, $height:expr, $int_type:tt) => {{
        const SIZE_OF_VAL: usize = core::mem::size_of::<$int_type>();

        let endian = $stream.endian();
        let mut row_bytes = vec![0_u8; $width * SIZE_OF_VAL];
        let mut samples: Vec<$int_type> = Vec::new();

        for _ in 0..$height {
            $stream.read_exact_bytes(&mut row_bytes)?;
            samples.reserve($width);

            let chunks = row_bytes.chunks_exact(SIZE_OF_VAL).map(fixed::<SIZE_OF_VAL>);

            match endian {
                ByteOrder::BigEndian => samples.extend(chunks.map($int_type::from_be_bytes)),
                ByteOrder::LittleEndian => samples.extend(chunks.map($int_type::from_le_bytes))
            }
        }
        samples
    }};
}

/// Read `width*height` samples of `pixel_type` in row-major order
pub(crate) fn decode_grid<R: Read>(
    stream: &mut WkbReader<R>, width: usize, height: usize, pixel_type: PixelType,
    packing: SubBytePacking
) -> Result<PixelGrid, WkbDecodeErrors> {
    if pixel_type.is_sub_byte() && packing == SubBytePacking::Packed {
        let data = decode_packed(stream, width, height, pixel_type)?;
        return PixelGrid::new(width, height, pixel_type, PixelData::U8(data));
    }

    let data = match pixel_type.codec() {
        SampleCodec::U8 => PixelData::U8(decode_rows!(stream, width, height, u8)),
        SampleCodec::I8 => PixelData::I8(decode_rows!(stream, width, height, i8)),
        SampleCodec::U16 => PixelData::U16(decode_rows!(stream, width, height, u16)),
        SampleCodec::I16 => PixelData::I16(decode_rows!(stream, width, height, i16)),
        SampleCodec::U32 => PixelData::U32(decode_rows!(stream, width, height, u32)),
        SampleCodec::I32 => PixelData::I32(decode_rows!(stream, width, height, i32)),
        SampleCodec::F32 => PixelData::F32(decode_rows!(stream, width, height, f32)),
        SampleCodec::F64 => PixelData::F64(decode_rows!(stream, width, height, f64))
    };
    PixelGrid::new(width, height, pixel_type, data)
}

/// Unpack sub-byte samples stored most significant bits first,
/// contiguously across rows, with the last byte zero padded.
fn decode_packed<R: Read>(
    stream: &mut WkbReader<R>, width: usize, height: usize, pixel_type: PixelType
) -> Result<Vec<u8>, WkbDecodeErrors> {
    const CHUNK_SIZE: usize = 4096;

    let bits = pixel_type.bit_width();
    let per_byte = 8 / bits;
    let mask = ((1_u16 << bits) - 1) as u8;

    let total = width * height;
    let mut remaining_bytes = total.div_ceil(per_byte);

    trace!("Unpacking {total} {pixel_type} samples from {remaining_bytes} bytes");

    let mut samples = Vec::new();
    let mut chunk = vec![0_u8; CHUNK_SIZE.min(remaining_bytes)];

    while remaining_bytes > 0 {
        let take = CHUNK_SIZE.min(remaining_bytes);
        stream.read_exact_bytes(&mut chunk[..take])?;
        remaining_bytes -= take;

        for &byte in &chunk[..take] {
            for position in 0..per_byte {
                if samples.len() == total {
                    break;
                }
                let shift = 8 - bits * (position + 1);
                samples.push((byte >> shift) & mask);
            }
        }
    }
    Ok(samples)
}

#[cfg(test)]
mod tests {
    use crate::bytestream::{ByteOrder, WkbReader};
    use crate::errors::WkbDecodeErrors;
    use crate::grid::{decode_grid, PixelData, PixelGrid};
    use crate::options::SubBytePacking;
    use crate::pixel::{PixelType, Sample};

    #[test]
    fn rows_are_row_major() {
        let grid = PixelGrid::new(3, 2, PixelType::UInt8, PixelData::U8(vec![1, 2, 3, 4, 5, 6]))
            .unwrap();

        assert_eq!(grid.rows().len(), 2);
        let rows: Vec<Vec<Sample>> = grid.rows().map(|row| row.to_vec()).collect();
        assert_eq!(rows[0], [Sample::U8(1), Sample::U8(2), Sample::U8(3)]);
        assert_eq!(rows[1], [Sample::U8(4), Sample::U8(5), Sample::U8(6)]);
        assert_eq!(grid.get(1, 0), Some(Sample::U8(4)));
        assert_eq!(grid.get(2, 0), None);
        assert_eq!(grid.get(0, 3), None);
        assert!(grid.row(2).is_none());
    }

    #[test]
    fn new_rejects_wrong_length_and_storage() {
        assert!(PixelGrid::new(2, 2, PixelType::UInt8, PixelData::U8(vec![0; 3])).is_err());
        assert!(PixelGrid::new(1, 1, PixelType::Int16, PixelData::U16(vec![0])).is_err());
        // sub-byte types live in byte storage
        assert!(PixelGrid::new(1, 1, PixelType::Bool1, PixelData::U8(vec![1])).is_ok());

        let err = PixelGrid::new(usize::MAX, 2, PixelType::UInt8, PixelData::U8(vec![])).unwrap_err();
        assert!(matches!(err, WkbDecodeErrors::GenericStatic(_)));
    }

    #[test]
    fn big_endian_rows() {
        let data = [0x00, 0x01, 0xFF, 0xFE, 0x12, 0x34, 0x80, 0x00];
        let mut reader = WkbReader::new(&data[..]);
        reader.set_endian(ByteOrder::BigEndian);

        let grid = decode_grid(
            &mut reader,
            2,
            2,
            PixelType::Int16,
            SubBytePacking::BytePerSample
        )
        .unwrap();

        assert_eq!(
            grid.data(),
            &PixelData::I16(vec![1, -2, 0x1234, i16::MIN])
        );
        assert_eq!(reader.position(), 8);
    }

    #[test]
    fn packed_two_bit_samples() {
        // 0b11_10_01_00, 0b01_00_00_00 (last byte padded)
        let data = [0b1110_0100, 0b0100_0000];
        let mut reader = WkbReader::new(&data[..]);

        let grid =
            decode_grid(&mut reader, 5, 1, PixelType::UInt2, SubBytePacking::Packed).unwrap();

        assert_eq!(grid.data(), &PixelData::U8(vec![3, 2, 1, 0, 1]));
        assert_eq!(reader.position(), 2);
    }

    #[test]
    fn packed_bits_span_rows() {
        let data = [0b1010_1100];
        let mut reader = WkbReader::new(&data[..]);

        let grid =
            decode_grid(&mut reader, 3, 2, PixelType::Bool1, SubBytePacking::Packed).unwrap();

        assert_eq!(grid.row(0).unwrap().to_vec(), [Sample::U8(1), Sample::U8(0), Sample::U8(1)]);
        assert_eq!(grid.row(1).unwrap().to_vec(), [Sample::U8(0), Sample::U8(1), Sample::U8(1)]);
    }

    #[test]
    fn truncated_rows_fail() {
        let data = [0_u8; 7];
        let mut reader = WkbReader::new(&data[..]);

        assert!(decode_grid(
            &mut reader,
            2,
            1,
            PixelType::Float64,
            SubBytePacking::BytePerSample
        )
        .is_err());
    }
}
