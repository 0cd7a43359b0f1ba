/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */
#![allow(dead_code)]

use zune_wkb::{GeoTransform, PixelType, Sample};

/// Minimal WKB raster writer for building test inputs
pub struct WkbWriter {
    little_endian: bool,
    out:           Vec<u8>
}

macro_rules! endian_bytes {
    ($self:expr, $value:expr) => {
        if $self.little_endian {
            $self.out.extend_from_slice(&$value.to_le_bytes())
        } else {
            $self.out.extend_from_slice(&$value.to_be_bytes())
        }
    };
}

impl WkbWriter {
    pub fn new(little_endian: bool) -> WkbWriter {
        WkbWriter {
            little_endian,
            out: vec![u8::from(little_endian)]
        }
    }

    pub fn header(
        mut self, version: u16, num_bands: u16, transform: GeoTransform, srid: i32, width: u16,
        height: u16
    ) -> WkbWriter {
        endian_bytes!(self, version);
        endian_bytes!(self, num_bands);
        for value in [
            transform.scale_x,
            transform.scale_y,
            transform.origin_x,
            transform.origin_y,
            transform.skew_x,
            transform.skew_y
        ] {
            endian_bytes!(self, value);
        }
        endian_bytes!(self, srid);
        endian_bytes!(self, width);
        endian_bytes!(self, height);
        self
    }

    pub fn sample(&mut self, sample: Sample) {
        match sample {
            Sample::U8(v) => self.out.push(v),
            Sample::I8(v) => endian_bytes!(self, v),
            Sample::U16(v) => endian_bytes!(self, v),
            Sample::I16(v) => endian_bytes!(self, v),
            Sample::U32(v) => endian_bytes!(self, v),
            Sample::I32(v) => endian_bytes!(self, v),
            Sample::F32(v) => endian_bytes!(self, v),
            Sample::F64(v) => endian_bytes!(self, v)
        }
    }

    /// An inline band, `flags` carries the upper nibble only
    pub fn band(mut self, flags: u8, pixel_type: PixelType, nodata: Sample, pixels: &[Sample]) -> WkbWriter {
        self.out.push((flags & 0xF0) | (pixel_type.code() + 1));
        self.sample(nodata);
        for pixel in pixels {
            self.sample(*pixel);
        }
        self
    }

    pub fn offline_band(
        mut self, flags: u8, pixel_type: PixelType, nodata: Sample, band_number: u8, path: &str
    ) -> WkbWriter {
        self.out.push(0x80 | (flags & 0xF0) | (pixel_type.code() + 1));
        self.sample(nodata);
        self.out.push(band_number);
        self.out.extend_from_slice(path.as_bytes());
        self.out.push(0);
        self
    }

    pub fn finish(self) -> Vec<u8> {
        self.out
    }
}

pub const ELEVATION_TRANSFORM: GeoTransform = GeoTransform {
    scale_x:  12.041454266862495,
    scale_y:  -12.041454266862495,
    origin_x: -11799927.868252808,
    origin_y: 5012423.608334331,
    skew_x:   0.0,
    skew_y:   0.0
};

/// Path to a file under `tests/data`
pub fn test_data(name: &str) -> String {
    env!("CARGO_MANIFEST_DIR").to_string() + "/tests/data/" + name
}
