/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Endian aware reads over a forward only byte source
//!
//! WKB rasters fix their byte order once, with the first byte of the stream,
//! and every multi-byte field after that (header, no-data values, pixels) uses it.
//! The reader carries that byte order so callers never pass it around.
use std::io::{self, Read};

/// Byte order of multi-byte fields in a WKB raster
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ByteOrder {
    /// `XDR`, selected by a marker byte of `0`
    BigEndian,
    /// `NDR`, selected by a marker byte of `1`
    LittleEndian
}

impl ByteOrder {
    /// Map the leading marker byte to a byte order
    ///
    /// Returns `None` for anything other than `0` and `1`
    pub const fn from_marker(marker: u8) -> Option<ByteOrder> {
        match marker {
            0 => Some(ByteOrder::BigEndian),
            1 => Some(ByteOrder::LittleEndian),
            _ => None
        }
    }
    /// The marker byte that selects this byte order
    pub const fn marker(self) -> u8 {
        match self {
            ByteOrder::BigEndian => 0,
            ByteOrder::LittleEndian => 1
        }
    }
}

/// A forward only reader that remembers the byte order of the stream
/// and how many bytes it has consumed.
///
/// The reader never seeks and never buffers ahead, every method reads
/// exactly the bytes of the value it returns.
pub(crate) struct WkbReader<R: Read> {
    inner:    R,
    endian:   ByteOrder,
    position: u64
}

impl<R: Read> WkbReader<R> {
    pub fn new(source: R) -> WkbReader<R> {
        WkbReader {
            inner:    source,
            // overwritten once the marker is read
            endian:   ByteOrder::LittleEndian,
            position: 0
        }
    }

    #[inline(always)]
    pub fn set_endian(&mut self, endian: ByteOrder) {
        self.endian = endian;
    }

    #[inline(always)]
    pub const fn endian(&self) -> ByteOrder {
        self.endian
    }

    /// Number of bytes consumed from the underlying source
    #[inline(always)]
    pub const fn position(&self) -> u64 {
        self.position
    }

    /// Destroy this reader returning the underlying source
    pub fn consume(self) -> R {
        self.inner
    }

    pub fn read_exact_bytes(&mut self, buf: &mut [u8]) -> io::Result<()> {
        self.inner.read_exact(buf)?;
        self.position += buf.len() as u64;
        Ok(())
    }

    #[inline(always)]
    pub fn read_fixed_bytes_or_error<const N: usize>(&mut self) -> io::Result<[u8; N]> {
        let mut byte_store: [u8; N] = [0; N];
        self.read_exact_bytes(&mut byte_store)?;
        Ok(byte_store)
    }

    #[inline(always)]
    pub fn get_u8_err(&mut self) -> io::Result<u8> {
        let [byte] = self.read_fixed_bytes_or_error::<1>()?;
        Ok(byte)
    }

    /// Read bytes up to and including a NUL terminator, returning
    /// the bytes before it.
    ///
    /// Returns `Ok(None)` if `limit` bytes were read without finding a terminator,
    /// the stream is left positioned right after the last byte read.
    pub fn read_nul_terminated(&mut self, limit: usize) -> io::Result<Option<Vec<u8>>> {
        let mut bytes = Vec::new();

        loop {
            let byte = self.get_u8_err()?;

            if byte == 0 {
                return Ok(Some(bytes));
            }
            if bytes.len() == limit {
                return Ok(None);
            }
            bytes.push(byte);
        }
    }
}

macro_rules! get_single_type {
    ($name:tt,$int_type:tt) => {
        impl<R: Read> WkbReader<R> {
            #[doc=concat!("Read a ",stringify!($int_type)," in the byte order of the stream")]
            #[doc=concat!("Returning an error if the underlying source cannot support a ",stringify!($int_type)," read.")]
            #[inline]
            pub fn $name(&mut self) -> io::Result<$int_type> {
                const SIZE_OF_VAL: usize = core::mem::size_of::<$int_type>();

                let space = self.read_fixed_bytes_or_error::<SIZE_OF_VAL>()?;

                match self.endian {
                    ByteOrder::BigEndian => Ok($int_type::from_be_bytes(space)),
                    ByteOrder::LittleEndian => Ok($int_type::from_le_bytes(space))
                }
            }
        }
    };
}

get_single_type!(get_i8, i8);
get_single_type!(get_u16, u16);
get_single_type!(get_i16, i16);
get_single_type!(get_u32, u32);
get_single_type!(get_i32, i32);
get_single_type!(get_f32, f32);
get_single_type!(get_f64, f64);
