/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use std::io::{self, ErrorKind, Read};

use log::{trace, warn};

use crate::band::decode_band;
use crate::bytestream::{ByteOrder, WkbReader};
use crate::errors::WkbDecodeErrors;
use crate::options::WkbOptions;
use crate::raster::{GeoTransform, Raster, RasterHeader};

/// Size of the endianness marker plus the fixed header record
pub const HEADER_SIZE: usize = 61;

const MAX_PREALLOCATED_BANDS: usize = 16;

/// A WKB raster decoder
///
/// The decoder is initialized by calling `new`
/// and either [`decode_headers`] to read the raster header
/// or [`decode`] to read the whole raster.
///
/// The decoder reads its source strictly forward, one field at a time,
/// and never reads past the last band.
///
/// [`decode_headers`]:WkbDecoder::decode_headers
/// [`decode`]:WkbDecoder::decode
pub struct WkbDecoder<R: Read> {
    stream:        WkbReader<R>,
    options:       WkbOptions,
    header:        Option<RasterHeader>,
    decoded_bands: bool
}

impl<R: Read> WkbDecoder<R> {
    /// Create a new decoder with the default options
    ///
    /// # Arguments
    /// - `data`: Any byte source, e.g. a `&[u8]`, a file or a database blob reader
    ///
    /// # Example
    /// ```
    /// use zune_wkb::WkbDecoder;
    /// let mut decoder = WkbDecoder::new(&[2_u8][..]);
    ///
    /// assert!(decoder.decode().is_err());
    /// ```
    pub fn new(data: R) -> WkbDecoder<R> {
        WkbDecoder::new_with_options(data, WkbOptions::default())
    }

    /// Create a new decoder that obeys the specified options
    ///
    /// # Example
    /// ```
    /// use zune_wkb::{SubBytePacking, WkbDecoder, WkbOptions};
    ///
    /// let options = WkbOptions::default()
    ///     .set_max_width(512)
    ///     .set_sub_byte_packing(SubBytePacking::Packed);
    ///
    /// let decoder = WkbDecoder::new_with_options(&[0_u8; 0][..], options);
    /// ```
    pub fn new_with_options(data: R, options: WkbOptions) -> WkbDecoder<R> {
        WkbDecoder {
            stream: WkbReader::new(data),
            options,
            header: None,
            decoded_bands: false
        }
    }

    /// Read the endianness marker and the raster header,
    /// storing them in the decoder.
    ///
    /// Calling this more than once is a no-op.
    pub fn decode_headers(&mut self) -> Result<(), WkbDecodeErrors> {
        if self.header.is_some() {
            return Ok(());
        }
        let marker = self.stream.get_u8_err()?;

        let endian =
            ByteOrder::from_marker(marker).ok_or(WkbDecodeErrors::InvalidEndianMarker(marker))?;

        self.stream.set_endian(endian);

        let stream = &mut self.stream;

        let version = header_field(stream.get_u16(), "version")?;
        let num_bands = header_field(stream.get_u16(), "num_bands")?;
        let transform = GeoTransform {
            scale_x:  header_field(stream.get_f64(), "scale_x")?,
            scale_y:  header_field(stream.get_f64(), "scale_y")?,
            origin_x: header_field(stream.get_f64(), "origin_x")?,
            origin_y: header_field(stream.get_f64(), "origin_y")?,
            skew_x:   header_field(stream.get_f64(), "skew_x")?,
            skew_y:   header_field(stream.get_f64(), "skew_y")?
        };
        let srid = header_field(stream.get_i32(), "srid")?;
        let width = header_field(stream.get_u16(), "width")?;
        let height = header_field(stream.get_u16(), "height")?;

        trace!("Byte order: {endian:?}");
        trace!("Version: {version}, bands: {num_bands}, srid: {srid}");
        trace!("Raster width: {width}, height: {height}");
        trace!("Transform: {transform:?}");

        if version != 0 {
            if self.options.get_strict_mode() {
                return Err(WkbDecodeErrors::UnsupportedVersion(version));
            }
            warn!("Unknown raster version {version}, decoding as version 0");
        }

        if usize::from(width) > self.options.get_max_width() {
            return Err(WkbDecodeErrors::LargeDimensions(
                "width",
                self.options.get_max_width(),
                usize::from(width)
            ));
        }
        if usize::from(height) > self.options.get_max_height() {
            return Err(WkbDecodeErrors::LargeDimensions(
                "height",
                self.options.get_max_height(),
                usize::from(height)
            ));
        }

        self.header = Some(RasterHeader {
            endian,
            version,
            num_bands,
            transform,
            srid,
            width,
            height
        });
        Ok(())
    }

    /// Decode the whole raster, reading the header first
    /// if it hasn't been read yet.
    ///
    /// A decoder decodes a single raster, calling this again after
    /// bands were read returns an error.
    ///
    /// # Returns
    /// - On success: The raster with all its bands
    /// - On error: The first error encountered, any partially decoded
    ///   bands are discarded
    pub fn decode(&mut self) -> Result<Raster, WkbDecodeErrors> {
        self.decode_headers()?;

        if self.decoded_bands {
            return Err("Raster bands were already decoded".into());
        }
        let header = self.header.ok_or("Raster header not decoded")?;
        self.decoded_bands = true;

        let width = usize::from(header.width);
        let height = usize::from(header.height);

        // the band count is untrusted, grow with bands actually read
        let mut bands =
            Vec::with_capacity(usize::from(header.num_bands).min(MAX_PREALLOCATED_BANDS));

        for index in 0..header.num_bands {
            trace!("Decoding band {index}");
            bands.push(decode_band(&mut self.stream, width, height, &self.options)?);
        }

        trace!("Finished decoding raster, {} bytes read", self.stream.position());

        Ok(Raster::new(header, bands))
    }

    /// The raster header, or `None` if it hasn't been decoded
    pub const fn header(&self) -> Option<&RasterHeader> {
        self.header.as_ref()
    }

    /// Return the width and height of the raster,
    /// or `None` if the header hasn't been decoded
    pub fn dimensions(&self) -> Option<(usize, usize)> {
        self.header
            .map(|header| (usize::from(header.width), usize::from(header.height)))
    }

    /// Number of bytes consumed from the source so far
    pub const fn bytes_read(&self) -> u64 {
        self.stream.position()
    }

    /// Destroy the decoder returning the source, positioned
    /// right after the last byte read
    pub fn into_inner(self) -> R {
        self.stream.consume()
    }
}

/// A stream ending inside the header is a malformed raster
/// rather than an I/O failure
fn header_field<T>(value: io::Result<T>, field: &'static str) -> Result<T, WkbDecodeErrors> {
    value.map_err(|err| match err.kind() {
        ErrorKind::UnexpectedEof => WkbDecodeErrors::TruncatedHeader(field),
        _ => WkbDecodeErrors::IoErrors(err)
    })
}

/// Decode a WKB raster from `stream` with the default options
///
/// # Example
/// ```no_run
/// let file = std::fs::File::open("raster.wkb").unwrap();
/// let raster = zune_wkb::decode(std::io::BufReader::new(file)).unwrap();
///
/// println!("{}x{} with {} bands", raster.width(), raster.height(), raster.bands().len());
/// ```
pub fn decode<R: Read>(stream: R) -> Result<Raster, WkbDecodeErrors> {
    WkbDecoder::new(stream).decode()
}
