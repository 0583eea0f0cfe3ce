//! Brother PES format (stub)
//!
//! Only the 24-bit little-endian section-length helper of this format is
//! verified (see [`crate::emb::utils::unpack_u24le`]). The stitch bit
//! layout has no trusted documentation, so decoding refuses rather than
//! guessing and corrupting geometry.

use crate::emb::error::{EmbError, Result};
use crate::emb::utils;

pub const FORMAT_NAME: &str = "Brother PES";

/// Length of a PES stitch record.
pub const STITCH_SIZE: usize = 2;

/// Read a PES section length: three bytes, little-endian.
pub fn section_length(buf: &[u8]) -> Result<u32> {
    utils::unpack_u24le(buf)
}

/// Decode a PES stitch record.
///
/// Validates the record shape, then refuses: the bit layout is not yet
/// verified against real files.
pub fn unpack_stitch(chunk: &[u8]) -> Result<(i32, i32, u8)> {
    if chunk.len() != STITCH_SIZE {
        return Err(EmbError::InvalidLength {
            context: "PES stitch record",
            expected: STITCH_SIZE,
            actual: chunk.len(),
        });
    }
    Err(EmbError::Unsupported(
        "PES stitch bit layout is not verified; decoding is disabled",
    ))
}
