/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use std::borrow::Cow;

use crate::band::{Band, OutDbSource};
use crate::bytestream::ByteOrder;
use crate::errors::WkbDecodeErrors;
use crate::grid::PixelGrid;

/// Affine georeferencing of a raster
#[derive(Copy, Clone, Debug, PartialEq, Default)]
pub struct GeoTransform {
    /// Pixel width in geographical units
    pub scale_x:  f64,
    /// Pixel height in geographical units
    pub scale_y:  f64,
    /// X ordinate of the upper-left corner of the upper-left pixel
    pub origin_x: f64,
    /// Y ordinate of the upper-left corner of the upper-left pixel
    pub origin_y: f64,
    /// Rotation about the Y axis
    pub skew_x:   f64,
    /// Rotation about the X axis
    pub skew_y:   f64
}

/// The fixed size record following the endianness marker
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RasterHeader {
    /// Byte order selected by the marker
    pub endian:    ByteOrder,
    /// Format version, `0` for every raster written so far
    pub version:   u16,
    /// Number of bands following the header
    pub num_bands: u16,
    pub transform: GeoTransform,
    /// Spatial reference id
    pub srid:      i32,
    /// Number of pixel columns
    pub width:     u16,
    /// Number of pixel rows
    pub height:    u16
}

/// A decoded raster
#[derive(Clone, Debug, PartialEq)]
pub struct Raster {
    header: RasterHeader,
    bands:  Vec<Band>
}

impl Raster {
    pub(crate) fn new(header: RasterHeader, bands: Vec<Band>) -> Raster {
        Raster { header, bands }
    }
    pub const fn header(&self) -> &RasterHeader {
        &self.header
    }
    pub const fn endian(&self) -> ByteOrder {
        self.header.endian
    }
    pub const fn version(&self) -> u16 {
        self.header.version
    }
    pub const fn transform(&self) -> GeoTransform {
        self.header.transform
    }
    pub const fn srid(&self) -> i32 {
        self.header.srid
    }
    pub const fn width(&self) -> usize {
        self.header.width as usize
    }
    pub const fn height(&self) -> usize {
        self.header.height as usize
    }
    /// Return `(width, height)` of the raster
    pub const fn dimensions(&self) -> (usize, usize) {
        (self.width(), self.height())
    }
    pub fn bands(&self) -> &[Band] {
        &self.bands
    }
    /// Band at a zero based index
    pub fn band(&self, index: usize) -> Option<&Band> {
        self.bands.get(index)
    }
    pub fn into_bands(self) -> Vec<Band> {
        self.bands
    }

    /// Pixels of the band at `index`, asking `source` for offline bands
    pub fn band_pixels<S: OutDbSource + ?Sized>(
        &self, index: usize, source: &S
    ) -> Result<Cow<'_, PixelGrid>, WkbDecodeErrors> {
        let band = self.band(index).ok_or_else(|| {
            WkbDecodeErrors::Generic(format!(
                "Band index {index} out of range, raster has {} bands",
                self.bands.len()
            ))
        })?;
        band.pixels(source, self.width(), self.height())
    }
}
