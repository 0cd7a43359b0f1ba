/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */
//! Decoding Well-Known Binary rasters
//!
//! WKB rasters are the binary form raster stores such as PostGIS use to hand
//! out rasters, a small header with the georeferencing of the raster followed
//! by one or more bands of pixels.
//!
//! # Features
//! - Decoding from any [`std::io::Read`] source, strictly forward, no seeking
//! - All eleven pixel types, samples keep their native width
//! - Offline (out-db) bands, read inline or, with
//!   [`OfflineBandMode::ExternalReference`], as a band number and path
//! - `serde`: Serializing pixel types, samples and transforms
//!
//! # Example
//! ```no_run
//! use zune_wkb::WkbDecoder;
//!
//! let bytes = std::fs::read("raster.wkb").unwrap();
//! let mut decoder = WkbDecoder::new(bytes.as_slice());
//! let raster = decoder.decode().unwrap();
//!
//! for band in raster.bands() {
//!     if let Some(grid) = band.grid() {
//!         println!("{} {:?}", band.pixel_type(), grid.get(0, 0));
//!     }
//! }
//! ```
//!
//! # Security
//! Dimensions are bounded by [`WkbOptions`] and pixel storage grows with the
//! bytes actually read, so a header claiming a huge raster over a short stream
//! fails early instead of allocating the whole grid.

pub use band::{Band, BandFlags, BandPayload, OutDbReference, OutDbSource};
pub use bytestream::ByteOrder;
pub use decoder::{decode, WkbDecoder, HEADER_SIZE};
pub use errors::{WkbDecodeErrors, WkbErrorKind};
pub use grid::{PixelData, PixelGrid, PixelRow};
pub use options::{OfflineBandMode, SubBytePacking, WkbOptions};
pub use pixel::{PixelType, Sample, SampleCodec, SampleFormat};
pub use raster::{GeoTransform, Raster, RasterHeader};

mod band;
mod bytestream;
mod decoder;
mod errors;
mod grid;
mod options;
mod pixel;
mod raster;
mod serde;
