//! DST document-header codec
//!
//! The header is a fixed 512-byte text record of `XX:value\r` lines:
//!
//! ```text
//! code  meaning             width
//! LA    Label               16
//! ST    Stitches            7
//! CO    Colors              3
//! +X    +X Extents          5
//! -X    -X Extents          5
//! +Y    +Y Extents          5
//! -Y    -Y Extents          5
//! AX    X Difference        6 (explicit sign)
//! AY    Y Difference        6 (explicit sign)
//! MX    Multi-Design Start  6 (explicit sign)
//! MY    Multi-Design Start  6 (explicit sign)
//! PD    Previous Design     9
//! ```
//!
//! Machines read these fields directly (e.g. ST for percent-complete, the
//! extents for hoop-fit checks), so every field is written on encode even
//! when the caller left it unset. AX/AY/MX/MY are almost always zero and PD
//! is almost always `"******"`.

use encoding_rs::WINDOWS_1252;
use indexmap::IndexMap;
use log::debug;

use super::{DATA_TERMINATOR, HEADER_SIZE};
use crate::emb::error::{EmbError, Result};
use crate::emb::models::{HeaderMetadata, MetaValue};

/// Formatting rule for one header field.
enum FieldRule {
    /// Left-justified text, space padded to the width.
    LeftText(usize),
    /// Right-justified decimal, space padded to the width.
    RightNum(usize),
    /// Explicit sign, then the absolute value right-justified in the
    /// remaining width.
    SignedNum(usize),
}

enum FieldDefault {
    Text(&'static str),
    Number(i64),
}

/// The fixed field table: code, rule, default, in output order.
const FIELDS: &[(&str, FieldRule, FieldDefault)] = &[
    ("LA", FieldRule::LeftText(16), FieldDefault::Text("Untitled")),
    ("ST", FieldRule::RightNum(7), FieldDefault::Number(0)),
    ("CO", FieldRule::RightNum(3), FieldDefault::Number(0)),
    ("+X", FieldRule::RightNum(5), FieldDefault::Number(0)),
    ("-X", FieldRule::RightNum(5), FieldDefault::Number(0)),
    ("+Y", FieldRule::RightNum(5), FieldDefault::Number(0)),
    ("-Y", FieldRule::RightNum(5), FieldDefault::Number(0)),
    ("AX", FieldRule::SignedNum(6), FieldDefault::Number(0)),
    ("AY", FieldRule::SignedNum(6), FieldDefault::Number(0)),
    ("MX", FieldRule::SignedNum(6), FieldDefault::Number(0)),
    ("MY", FieldRule::SignedNum(6), FieldDefault::Number(0)),
    ("PD", FieldRule::LeftText(9), FieldDefault::Text("******")),
];

fn numeric_value(code: &str, value: Option<&MetaValue>, default: i64) -> Result<i64> {
    match value {
        None => Ok(default),
        Some(v) => v.as_number().ok_or_else(|| {
            EmbError::InvalidFormat(format!("header field {code} requires an integer, got {v:?}"))
        }),
    }
}

fn render_field(code: &str, rule: &FieldRule, default: &FieldDefault, value: Option<&MetaValue>) -> Result<String> {
    let body = match rule {
        FieldRule::LeftText(width) => {
            let width = *width;
            let text = match (value, default) {
                (Some(v), _) => v.as_text(),
                (None, FieldDefault::Text(t)) => (*t).to_string(),
                (None, FieldDefault::Number(n)) => n.to_string(),
            };
            format!("{text:<width$}")
        }
        FieldRule::RightNum(width) => {
            let width = *width;
            let default = match default {
                FieldDefault::Number(n) => *n,
                FieldDefault::Text(_) => 0,
            };
            let n = numeric_value(code, value, default)?;
            format!("{n:>width$}")
        }
        FieldRule::SignedNum(width) => {
            let default = match default {
                FieldDefault::Number(n) => *n,
                FieldDefault::Text(_) => 0,
            };
            let n = numeric_value(code, value, default)?;
            let sign = if n < 0 { '-' } else { '+' };
            let digits = n.abs();
            let digit_width = *width - 1;
            format!("{sign}{digits:>digit_width$}")
        }
    };
    Ok(format!("{code}:{body}\r"))
}

/// Encode a metadata mapping into the exact 512-byte header record.
///
/// Missing fields take their format defaults; the record ends with the data
/// terminator byte and is space-padded to [`HEADER_SIZE`]. The 512-byte
/// budget is a hard invariant: content that overflows it is rejected.
pub fn encode(metadata: &HeaderMetadata) -> Result<Vec<u8>> {
    let mut record = Vec::with_capacity(HEADER_SIZE);
    for (code, rule, default) in FIELDS {
        let line = render_field(code, rule, default, metadata.get(*code))?;
        record.extend_from_slice(line.as_bytes());
    }
    record.push(DATA_TERMINATOR);

    if record.len() > HEADER_SIZE {
        return Err(EmbError::InvalidFormat(format!(
            "header record is {} bytes, exceeding the {} byte budget",
            record.len(),
            HEADER_SIZE
        )));
    }
    record.resize(HEADER_SIZE, b' ');
    Ok(record)
}

/// Decode a raw header record into its metadata mapping.
///
/// Lines are split on `\r`; a line whose third byte is `:` yields a
/// 2-character key and a value with spaces stripped. Values that parse as
/// integers become [`MetaValue::Number`]. Lines of any other shape are
/// skipped, never fatal.
pub fn decode(raw: &[u8]) -> HeaderMetadata {
    let mut metadata = IndexMap::new();
    for line in raw.split(|&b| b == b'\r') {
        if line.len() < 3 || line[2] != b':' {
            if !line.iter().all(|&b| b == b' ' || b == DATA_TERMINATOR || b == 0) {
                debug!("skipping malformed header line: {:?}", decode_text(line));
            }
            continue;
        }
        let key = decode_text(&line[..2]);
        let raw_value = decode_text(&line[3..]).replace(' ', "");
        let value = match raw_value.parse::<i64>() {
            Ok(n) => MetaValue::Number(n),
            Err(_) => MetaValue::Text(raw_value),
        };
        metadata.insert(key, value);
    }
    metadata
}

/// One physical header line, with its offset inside the raw record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderLine {
    pub offset: usize,
    pub len: usize,
    pub text: String,
}

/// Scan a raw header record into per-line offset records for inspection
/// tooling. Line lengths include the `\r` delimiter, so the records
/// partition the input.
pub fn scan_lines(raw: &[u8]) -> Vec<HeaderLine> {
    let mut lines = Vec::new();
    let mut offset = 0;
    while offset < raw.len() {
        let rest = &raw[offset..];
        let len = match rest.iter().position(|&b| b == b'\r') {
            Some(pos) => pos + 1,
            None => rest.len(),
        };
        lines.push(HeaderLine {
            offset,
            len,
            text: decode_text(&rest[..len]),
        });
        offset += len;
    }
    lines
}

/// Decode header bytes as text. DST labels are arbitrary 8-bit data, so
/// this must never fail; Windows-1252 maps every byte.
fn decode_text(bytes: &[u8]) -> String {
    let (text, _, _) = WINDOWS_1252.decode(bytes);
    text.into_owned()
}
