//! Low-level byte packing primitives
//!
//! Pure, total functions over fixed-length buffers. A buffer of the wrong
//! length is a caller contract violation and fails with
//! [`EmbError::InvalidLength`] rather than being silently tolerated.

use byteorder::{ByteOrder, LittleEndian};
use super::error::{EmbError, Result};

fn check_len(context: &'static str, expected: usize, buf: &[u8]) -> Result<()> {
    if buf.len() != expected {
        return Err(EmbError::InvalidLength {
            context,
            expected,
            actual: buf.len(),
        });
    }
    Ok(())
}

/// Unpack a single unsigned byte from a 1-byte buffer.
pub fn unpack_u8(buf: &[u8]) -> Result<u8> {
    check_len("u8", 1, buf)?;
    Ok(buf[0])
}

/// Pack a single unsigned byte.
pub fn pack_u8(value: u8) -> [u8; 1] {
    [value]
}

/// Unpack a pair of unsigned bytes from a 2-byte buffer.
pub fn unpack_u8_pair(buf: &[u8]) -> Result<(u8, u8)> {
    check_len("u8 pair", 2, buf)?;
    Ok((buf[0], buf[1]))
}

/// Pack a pair of unsigned bytes.
pub fn pack_u8_pair(first: u8, second: u8) -> [u8; 2] {
    [first, second]
}

/// Assemble three bytes into an unsigned 24-bit little-endian integer
/// (`b0 | b1<<8 | b2<<16`).
pub fn unpack_u24le(buf: &[u8]) -> Result<u32> {
    check_len("u24le", 3, buf)?;
    Ok(LittleEndian::read_u24(buf))
}

/// Split an unsigned 24-bit integer into three little-endian bytes.
///
/// Values above 2^24 - 1 are rejected rather than truncated.
pub fn pack_u24le(value: u32) -> Result<[u8; 3]> {
    if value > 0x00FF_FFFF {
        return Err(EmbError::OutOfRange {
            what: "u24le value",
            value: value as i64,
            max: 0x00FF_FFFF,
        });
    }
    let mut buf = [0u8; 3];
    LittleEndian::write_u24(&mut buf, value);
    Ok(buf)
}
