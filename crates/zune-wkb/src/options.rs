/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

/// How pixels of the sub-byte types (`1BB`, `2BUI`, `4BUI`) are laid out
#[derive(Copy, Clone, Debug, Eq, PartialEq, Default)]
pub enum SubBytePacking {
    /// One full byte per sample, the layout raster stores write
    #[default]
    BytePerSample,
    /// Samples packed most significant bits first across the whole grid,
    /// the final byte zero padded
    Packed
}

/// What follows the no-data value of a band with the offline bit set
#[derive(Copy, Clone, Debug, Eq, PartialEq, Default)]
pub enum OfflineBandMode {
    /// Inline pixels, exactly like an online band
    #[default]
    Inline,
    /// An external band number and a NUL terminated path
    ExternalReference
}

/// Options respected by the WKB raster decoder
///
/// The defaults accept every raster the format can encode.
///
/// # Example
/// ```
/// use zune_wkb::WkbOptions;
///
/// let options = WkbOptions::default().set_max_width(1024).set_strict_mode(true);
/// assert_eq!(options.get_max_width(), 1024);
/// ```
#[derive(Copy, Clone, Debug)]
pub struct WkbOptions {
    /// Maximum raster width accepted
    ///
    /// - Default value: 65535
    max_width:        usize,
    /// Maximum raster height accepted
    ///
    /// - Default value: 65535
    max_height:       usize,
    /// Maximum length in bytes of an offline band path,
    /// terminator excluded
    ///
    /// - Default value: 4096
    max_path_length:  usize,
    /// Turn tolerated anomalies (non zero version, reserved flag bit)
    /// into errors
    ///
    /// - Default value: false
    strict_mode:      bool,
    sub_byte_packing: SubBytePacking,
    /// Payload layout of bands with the offline bit set
    ///
    /// - Default value: [`OfflineBandMode::Inline`]
    offline_bands:    OfflineBandMode
}

impl Default for WkbOptions {
    fn default() -> Self {
        WkbOptions {
            max_width:        usize::from(u16::MAX),
            max_height:       usize::from(u16::MAX),
            max_path_length:  4096,
            strict_mode:      false,
            sub_byte_packing: SubBytePacking::BytePerSample,
            offline_bands:    OfflineBandMode::Inline
        }
    }
}

impl WkbOptions {
    pub const fn get_max_width(&self) -> usize {
        self.max_width
    }
    pub const fn get_max_height(&self) -> usize {
        self.max_height
    }
    pub const fn get_max_path_length(&self) -> usize {
        self.max_path_length
    }
    pub const fn get_strict_mode(&self) -> bool {
        self.strict_mode
    }
    pub const fn get_sub_byte_packing(&self) -> SubBytePacking {
        self.sub_byte_packing
    }
    pub const fn get_offline_bands(&self) -> OfflineBandMode {
        self.offline_bands
    }

    /// Set the maximum width of rasters the decoder will decode
    pub fn set_max_width(mut self, width: usize) -> Self {
        self.max_width = width;
        self
    }
    /// Set the maximum height of rasters the decoder will decode
    pub fn set_max_height(mut self, height: usize) -> Self {
        self.max_height = height;
        self
    }
    pub fn set_max_path_length(mut self, length: usize) -> Self {
        self.max_path_length = length;
        self
    }
    /// Whether the decoder should reject rasters that are
    /// readable but not well formed
    pub fn set_strict_mode(mut self, yes: bool) -> Self {
        self.strict_mode = yes;
        self
    }
    pub fn set_sub_byte_packing(mut self, packing: SubBytePacking) -> Self {
        self.sub_byte_packing = packing;
        self
    }
    pub fn set_offline_bands(mut self, mode: OfflineBandMode) -> Self {
        self.offline_bands = mode;
        self
    }
}
