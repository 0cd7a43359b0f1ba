/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

#![no_main]

use libfuzzer_sys::fuzz_target;
use zune_wkb::{OfflineBandMode, SubBytePacking, WkbDecoder, WkbOptions};

fuzz_target!(|data: &[u8]| {
    // keep allocations bounded, fuzzed headers claim huge rasters
    let options = WkbOptions::default()
        .set_max_width(1024)
        .set_max_height(1024);

    let _ = WkbDecoder::new_with_options(data, options).decode();

    let packed = options
        .set_sub_byte_packing(SubBytePacking::Packed)
        .set_offline_bands(OfflineBandMode::ExternalReference);
    let _ = WkbDecoder::new_with_options(data, packed).decode();
});
