/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Band layout and decoding
//!
//! Each band starts with a single byte
//!
//! ```text
//! bit   7          6               5              4          3..0
//!     isOffline  hasNodataValue  isNodataValue  reserved   pixel type + 1
//! ```
//!
//! followed by a no-data value in the width of the pixel type and the band payload.
use std::borrow::Cow;
use std::io::Read;

use log::{trace, warn};

use crate::bytestream::WkbReader;
use crate::errors::WkbDecodeErrors;
use crate::grid::{decode_grid, PixelGrid};
use crate::options::{OfflineBandMode, WkbOptions};
use crate::pixel::{PixelType, Sample};

/// The flag byte that opens every band
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct BandFlags(u8);

impl BandFlags {
    const IS_OFFLINE: u8 = 0b1000_0000;
    const HAS_NODATA_VALUE: u8 = 0b0100_0000;
    const IS_NODATA_VALUE: u8 = 0b0010_0000;
    const RESERVED: u8 = 0b0001_0000;
    const PIXEL_TYPE: u8 = 0b0000_1111;

    pub const fn from_byte(byte: u8) -> BandFlags {
        BandFlags(byte)
    }
    pub const fn bits(self) -> u8 {
        self.0
    }
    /// Pixel data lives outside the stream
    pub const fn is_offline(self) -> bool {
        self.0 & Self::IS_OFFLINE != 0
    }
    /// The stored no-data value is meaningful
    pub const fn has_nodata_value(self) -> bool {
        self.0 & Self::HAS_NODATA_VALUE != 0
    }
    /// All samples are claimed to be no-data.
    ///
    /// This is a dirty flag, nothing checks it against the pixels
    pub const fn is_nodata_value(self) -> bool {
        self.0 & Self::IS_NODATA_VALUE != 0
    }
    pub const fn reserved_bit(self) -> bool {
        self.0 & Self::RESERVED != 0
    }
    /// The low nibble, which stores the pixel type code plus one
    pub const fn pixel_type_nibble(self) -> u8 {
        self.0 & Self::PIXEL_TYPE
    }
    pub fn pixel_type(self) -> Result<PixelType, WkbDecodeErrors> {
        PixelType::from_nibble(self.pixel_type_nibble())
    }
}

/// Where an offline band keeps its pixels
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct OutDbReference {
    band_number: u8,
    path:        String
}

impl OutDbReference {
    pub fn new(band_number: u8, path: String) -> OutDbReference {
        OutDbReference { band_number, path }
    }
    /// Zero based band number inside the external file
    pub const fn band_number(&self) -> u8 {
        self.band_number
    }
    pub fn path(&self) -> &str {
        &self.path
    }
}

/// The pixels of a band, stored inline or referenced externally
#[derive(Clone, Debug, PartialEq)]
pub enum BandPayload {
    InDb(PixelGrid),
    OutDb(OutDbReference)
}

/// Something able to load the pixels of offline bands
///
/// The decoder never opens external files, callers that need the pixels
/// of an offline band provide an implementation to [`Band::pixels`].
pub trait OutDbSource {
    /// Load `width*height` samples of `pixel_type` for the referenced band
    fn load_band(
        &self, reference: &OutDbReference, width: usize, height: usize, pixel_type: PixelType
    ) -> Result<PixelGrid, WkbDecodeErrors>;
}

/// A single decoded band
#[derive(Clone, Debug, PartialEq)]
pub struct Band {
    flags:      BandFlags,
    pixel_type: PixelType,
    nodata:     Sample,
    payload:    BandPayload
}

impl Band {
    pub const fn flags(&self) -> BandFlags {
        self.flags
    }
    pub const fn is_offline(&self) -> bool {
        self.flags.is_offline()
    }
    pub const fn has_nodata_value(&self) -> bool {
        self.flags.has_nodata_value()
    }
    pub const fn is_nodata_value(&self) -> bool {
        self.flags.is_nodata_value()
    }
    pub const fn pixel_type(&self) -> PixelType {
        self.pixel_type
    }
    /// The no-data value as stored, whether or not the band marks it meaningful
    pub const fn raw_nodata(&self) -> Sample {
        self.nodata
    }
    /// The no-data value if the band marks it meaningful
    pub const fn nodata_value(&self) -> Option<Sample> {
        if self.flags.has_nodata_value() {
            Some(self.nodata)
        } else {
            None
        }
    }
    pub const fn payload(&self) -> &BandPayload {
        &self.payload
    }
    pub fn into_payload(self) -> BandPayload {
        self.payload
    }
    /// The inline pixel grid, `None` for bands read as an external reference
    pub const fn grid(&self) -> Option<&PixelGrid> {
        match &self.payload {
            BandPayload::InDb(grid) => Some(grid),
            BandPayload::OutDb(_) => None
        }
    }
    /// The external reference, `None` for inline bands
    pub const fn outdb(&self) -> Option<&OutDbReference> {
        match &self.payload {
            BandPayload::InDb(_) => None,
            BandPayload::OutDb(reference) => Some(reference)
        }
    }

    /// Return the pixels of this band, loading them from `source`
    /// if the band was read as an external reference.
    ///
    /// `width` and `height` are the raster dimensions, a grid returned by
    /// `source` must match them and the band's pixel type.
    pub fn pixels<S: OutDbSource + ?Sized>(
        &self, source: &S, width: usize, height: usize
    ) -> Result<Cow<'_, PixelGrid>, WkbDecodeErrors> {
        match &self.payload {
            BandPayload::InDb(grid) => Ok(Cow::Borrowed(grid)),
            BandPayload::OutDb(reference) => {
                let grid = source.load_band(reference, width, height, self.pixel_type)?;

                let found = (grid.width(), grid.height(), grid.pixel_type());
                let expected = (width, height, self.pixel_type);

                if found != expected {
                    return Err(WkbDecodeErrors::MismatchedOutDbGrid { expected, found });
                }
                Ok(Cow::Owned(grid))
            }
        }
    }

    /// Check the `isNodataValue` claim against the pixels
    ///
    /// Returns `None` when there is nothing to check against,
    /// i.e. the band has no inline grid or its no-data value is not meaningful.
    pub fn verify_all_nodata(&self) -> Option<bool> {
        let nodata = self.nodata_value()?;
        let grid = self.grid()?;

        Some(grid.samples().all(|sample| sample.matches(nodata)))
    }
}

/// Decode one band, flags through payload
pub(crate) fn decode_band<R: Read>(
    stream: &mut WkbReader<R>, width: usize, height: usize, options: &WkbOptions
) -> Result<Band, WkbDecodeErrors> {
    let flags = BandFlags::from_byte(stream.get_u8_err()?);

    if flags.reserved_bit() {
        if options.get_strict_mode() {
            return Err(WkbDecodeErrors::ReservedBitSet(flags.bits()));
        }
        warn!("Reserved bit set in band flags {:#010b}, ignoring", flags.bits());
    }
    let pixel_type = flags.pixel_type()?;
    let nodata = pixel_type.codec().read_sample(stream)?;

    trace!(
        "Band pixel type: {pixel_type}, offline: {}, nodata: {nodata} (meaningful: {}), all nodata: {}",
        flags.is_offline(),
        flags.has_nodata_value(),
        flags.is_nodata_value()
    );

    let payload = if flags.is_offline()
        && options.get_offline_bands() == OfflineBandMode::ExternalReference
    {
        BandPayload::OutDb(decode_outdb_reference(stream, options)?)
    } else {
        let grid = decode_grid(
            stream,
            width,
            height,
            pixel_type,
            options.get_sub_byte_packing()
        )?;
        BandPayload::InDb(grid)
    };

    Ok(Band {
        flags,
        pixel_type,
        nodata,
        payload
    })
}

fn decode_outdb_reference<R: Read>(
    stream: &mut WkbReader<R>, options: &WkbOptions
) -> Result<OutDbReference, WkbDecodeErrors> {
    let band_number = stream.get_u8_err()?;

    let limit = options.get_max_path_length();
    let path = stream.read_nul_terminated(limit)?.ok_or_else(|| {
        WkbDecodeErrors::InvalidOutDbPath(format!("path longer than {limit} bytes"))
    })?;

    if path.is_empty() {
        return Err(WkbDecodeErrors::InvalidOutDbPath("empty path".to_string()));
    }
    let path = String::from_utf8(path)
        .map_err(|e| WkbDecodeErrors::InvalidOutDbPath(format!("path is not UTF-8: {e}")))?;

    trace!("Offline band {band_number} at {path}");

    Ok(OutDbReference::new(band_number, path))
}
