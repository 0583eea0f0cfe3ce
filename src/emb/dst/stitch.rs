//! Tajima stitch-command codec
//!
//! DST encodes relative motion in 3-byte records. Each byte contributes
//! independently-weighted bits to the X and Y deltas (bit numbering 7..0):
//!
//! ```text
//! byte 1   y+1   y-1   y+9   y-9   x-9   x+9   x-1   x+1
//! byte 2   y+3   y-3   y+27  y-27  x-27  x+27  x-3   x+3
//! byte 3   c0    c1    y+81  y-81  x-81  x+81  set   set
//! ```
//!
//! The `(c0, c1)` pair selects the command: `00` normal stitch, `10` jump,
//! `11` color change, `01` sequin mode. The two `set` bits are always 1.
//! A single terminator byte ends the stream.

use super::DATA_TERMINATOR;
use crate::emb::error::{EmbError, Result};

/// Maximum displacement one record can carry on either axis
/// (1 + 3 + 9 + 27 + 81).
pub const MAX_DELTA: i32 = 121;

/// Ternary digit weights, least significant first.
const WEIGHTS: [i32; 5] = [1, 3, 9, 27, 81];

/// Command selected by the top two bits of byte 3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    Stitch,
    Jump,
    ColorChange,
    Sequin,
}

/// A classified stitch-command chunk.
///
/// Every input buffer classifies into exactly one variant; there is no
/// partial decode. `Unknown` keeps the original bytes so that re-encoding
/// loses nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StitchChunk {
    Terminator,
    Motion { dx: i32, dy: i32, command: Command },
    Unknown(Vec<u8>),
}

/// Bit positions for one axis: `(byte index, mask)` per weight, positive
/// direction first.
type AxisBits = [[(usize, u8); 2]; 5];

const X_BITS: AxisBits = [
    [(0, 0x01), (0, 0x02)], // ±1
    [(1, 0x01), (1, 0x02)], // ±3
    [(0, 0x04), (0, 0x08)], // ±9
    [(1, 0x04), (1, 0x08)], // ±27
    [(2, 0x04), (2, 0x08)], // ±81
];

const Y_BITS: AxisBits = [
    [(0, 0x80), (0, 0x40)], // ±1
    [(1, 0x80), (1, 0x40)], // ±3
    [(0, 0x20), (0, 0x10)], // ±9
    [(1, 0x20), (1, 0x10)], // ±27
    [(2, 0x20), (2, 0x10)], // ±81
];

fn decode_axis(bytes: &[u8; 3], bits: &AxisBits) -> i32 {
    let mut delta = 0;
    for (weight, [(pos_byte, pos_mask), (neg_byte, neg_mask)]) in WEIGHTS.iter().zip(bits) {
        if bytes[*pos_byte] & pos_mask != 0 {
            delta += weight;
        }
        if bytes[*neg_byte] & neg_mask != 0 {
            delta -= weight;
        }
    }
    delta
}

/// Decompose a delta into balanced-ternary digits over [`WEIGHTS`].
///
/// Unique for every value in `[-121, 121]`, which is what makes the codec
/// exactly invertible.
fn balanced_digits(what: &'static str, delta: i32) -> Result<[i8; 5]> {
    if delta.abs() > MAX_DELTA {
        return Err(EmbError::OutOfRange {
            what,
            value: delta as i64,
            max: MAX_DELTA as i64,
        });
    }
    let mut digits = [0i8; 5];
    let mut rest = delta;
    for digit in digits.iter_mut() {
        let mut r = rest % 3;
        rest /= 3;
        if r == 2 {
            r = -1;
            rest += 1;
        } else if r == -2 {
            r = 1;
            rest -= 1;
        }
        *digit = r as i8;
    }
    Ok(digits)
}

fn encode_axis(bytes: &mut [u8; 3], bits: &AxisBits, digits: &[i8; 5]) {
    for (digit, [(pos_byte, pos_mask), (neg_byte, neg_mask)]) in digits.iter().zip(bits) {
        match digit {
            1 => bytes[*pos_byte] |= pos_mask,
            -1 => bytes[*neg_byte] |= neg_mask,
            _ => {}
        }
    }
}

fn decode_command(byte3: u8) -> Command {
    match (byte3 & 0x80 != 0, byte3 & 0x40 != 0) {
        (false, false) => Command::Stitch,
        (true, false) => Command::Jump,
        (true, true) => Command::ColorChange,
        (false, true) => Command::Sequin,
    }
}

fn command_bits(command: Command) -> u8 {
    match command {
        Command::Stitch => 0x00,
        Command::Jump => 0x80,
        Command::ColorChange => 0xC0,
        Command::Sequin => 0x40,
    }
}

/// Classify and decode a raw stitch-command chunk.
///
/// Total over all inputs: a 3-byte chunk decodes as motion, the 1-byte
/// terminator as `Terminator`, and everything else is preserved as
/// `Unknown`.
pub fn decode(chunk: &[u8]) -> StitchChunk {
    match chunk {
        [byte] if *byte == DATA_TERMINATOR => StitchChunk::Terminator,
        [b0, b1, b2] => {
            let bytes = [*b0, *b1, *b2];
            StitchChunk::Motion {
                dx: decode_axis(&bytes, &X_BITS),
                dy: decode_axis(&bytes, &Y_BITS),
                command: decode_command(bytes[2]),
            }
        }
        other => StitchChunk::Unknown(other.to_vec()),
    }
}

/// Encode a stitch-command chunk back to its byte form.
///
/// Motion deltas outside `[-121, 121]` fail with `OutOfRange` and produce
/// no output. Unknown chunks re-emit their stored bytes unchanged.
pub fn encode(chunk: &StitchChunk) -> Result<Vec<u8>> {
    match chunk {
        StitchChunk::Terminator => Ok(vec![DATA_TERMINATOR]),
        StitchChunk::Motion { dx, dy, command } => {
            let x_digits = balanced_digits("stitch dx", *dx)?;
            let y_digits = balanced_digits("stitch dy", *dy)?;
            let mut bytes = [0u8, 0u8, 0x03];
            encode_axis(&mut bytes, &X_BITS, &x_digits);
            encode_axis(&mut bytes, &Y_BITS, &y_digits);
            bytes[2] |= command_bits(*command);
            Ok(bytes.to_vec())
        }
        StitchChunk::Unknown(bytes) => Ok(bytes.clone()),
    }
}
