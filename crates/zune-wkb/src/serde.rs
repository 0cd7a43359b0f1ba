/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

#![cfg(feature = "serde")]

use serde::ser::*;

use crate::bytestream::ByteOrder;
use crate::pixel::{PixelType, Sample};
use crate::raster::GeoTransform;

impl Serialize for PixelType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer
    {
        // the name raster stores use, e.g `16BSI`
        serializer.serialize_str(self.name())
    }
}

impl Serialize for ByteOrder {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer
    {
        match self {
            ByteOrder::BigEndian => serializer.serialize_str("BigEndian"),
            ByteOrder::LittleEndian => serializer.serialize_str("LittleEndian")
        }
    }
}

impl Serialize for Sample {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer
    {
        match *self {
            Sample::U8(v) => serializer.serialize_u8(v),
            Sample::I8(v) => serializer.serialize_i8(v),
            Sample::U16(v) => serializer.serialize_u16(v),
            Sample::I16(v) => serializer.serialize_i16(v),
            Sample::U32(v) => serializer.serialize_u32(v),
            Sample::I32(v) => serializer.serialize_i32(v),
            Sample::F32(v) => serializer.serialize_f32(v),
            Sample::F64(v) => serializer.serialize_f64(v)
        }
    }
}

impl Serialize for GeoTransform {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer
    {
        let mut state = serializer.serialize_struct("GeoTransform", 6)?;
        state.serialize_field("scale_x", &self.scale_x)?;
        state.serialize_field("scale_y", &self.scale_y)?;
        state.serialize_field("origin_x", &self.origin_x)?;
        state.serialize_field("origin_y", &self.origin_y)?;
        state.serialize_field("skew_x", &self.skew_x)?;
        state.serialize_field("skew_y", &self.skew_y)?;
        state.end()
    }
}
