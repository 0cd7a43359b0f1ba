/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use core::fmt::{Debug, Display, Formatter};

use crate::pixel::PixelType;

/// Coarse classification of a [`WkbDecodeErrors`]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum WkbErrorKind {
    /// The underlying source failed or ended early
    Io,
    /// The bytes do not follow the WKB raster layout
    Format,
    /// A band declared a pixel type outside the known table
    UnknownPixelType,
    /// The raster exceeds a limit configured in the options
    Limits,
    /// Anything else
    Other
}

/// Possible errors that may occur during decoding
#[non_exhaustive]
pub enum WkbDecodeErrors {
    /// The first byte is neither `0` (big endian) nor `1` (little endian)
    InvalidEndianMarker(u8),
    /// The stream ended inside the fixed size header,
    /// the argument names the field that could not be read
    TruncatedHeader(&'static str),
    /// A band flag byte carries a pixel type nibble that
    /// does not map to a known pixel type.
    ///
    /// The argument is the raw nibble, the pixel type code is one less
    UnknownPixelType(u8),
    /// Header version other than `0`, only raised in strict mode
    UnsupportedVersion(u16),
    /// The reserved bit of a band flag byte is set, only raised in strict mode
    ///
    /// The argument is the whole flag byte
    ReservedBitSet(u8),
    /// Too large dimensions for a given width or height
    ///
    /// # Arguments
    /// - the dimension name
    /// - the configured maximum
    /// - the value found in the header
    LargeDimensions(&'static str, usize, usize),
    /// The external path of an offline band is not valid
    InvalidOutDbPath(String),
    /// A grid handed back for an offline band does not match the band
    MismatchedOutDbGrid {
        expected: (usize, usize, PixelType),
        found:    (usize, usize, PixelType)
    },
    /// Generic message
    Generic(String),
    /// Generic message that does not need heap allocation
    GenericStatic(&'static str),
    IoErrors(std::io::Error)
}

impl WkbDecodeErrors {
    pub fn kind(&self) -> WkbErrorKind {
        match self {
            Self::IoErrors(_) => WkbErrorKind::Io,
            Self::InvalidEndianMarker(_)
            | Self::TruncatedHeader(_)
            | Self::UnsupportedVersion(_)
            | Self::ReservedBitSet(_)
            | Self::InvalidOutDbPath(_) => WkbErrorKind::Format,
            Self::UnknownPixelType(_) => WkbErrorKind::UnknownPixelType,
            Self::LargeDimensions(..) => WkbErrorKind::Limits,
            Self::MismatchedOutDbGrid { .. } | Self::Generic(_) | Self::GenericStatic(_) => {
                WkbErrorKind::Other
            }
        }
    }
}

impl Debug for WkbDecodeErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::InvalidEndianMarker(marker) => {
                writeln!(
                    f,
                    "Invalid endianness marker {marker}, expected 0 (big endian) or 1 (little endian)"
                )
            }
            Self::TruncatedHeader(field) => {
                writeln!(f, "Raster header truncated, stream ended while reading `{field}`")
            }
            Self::UnknownPixelType(nibble) => {
                writeln!(
                    f,
                    "Unknown pixel type nibble {nibble} (type code {}), expected a nibble between 1 and 11",
                    i16::from(*nibble) - 1
                )
            }
            Self::UnsupportedVersion(version) => {
                writeln!(f, "Unsupported raster version {version}, expected 0")
            }
            Self::ReservedBitSet(flags) => {
                writeln!(f, "Reserved bit set in band flags {flags:#010b}")
            }
            Self::LargeDimensions(dimension, expected, found) => {
                writeln!(
                    f,
                    "Too large dimensions for {dimension}, {found} exceeds {expected}"
                )
            }
            Self::InvalidOutDbPath(reason) => {
                writeln!(f, "Invalid offline band path: {reason}")
            }
            Self::MismatchedOutDbGrid { expected, found } => {
                writeln!(
                    f,
                    "Offline band grid mismatch, expected {}x{} {} but found {}x{} {}",
                    expected.0, expected.1, expected.2, found.0, found.1, found.2
                )
            }
            Self::Generic(message) => {
                writeln!(f, "{message}")
            }
            Self::GenericStatic(message) => {
                writeln!(f, "{message}")
            }
            Self::IoErrors(err) => {
                writeln!(f, "I/O error {err}")
            }
        }
    }
}

impl Display for WkbDecodeErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        writeln!(f, "{:?}", self)
    }
}

impl std::error::Error for WkbDecodeErrors {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::IoErrors(err) => Some(err),
            _ => None
        }
    }
}

impl From<&'static str> for WkbDecodeErrors {
    fn from(r: &'static str) -> Self {
        Self::GenericStatic(r)
    }
}

impl From<std::io::Error> for WkbDecodeErrors {
    fn from(value: std::io::Error) -> Self {
        Self::IoErrors(value)
    }
}
