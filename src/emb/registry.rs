//! Chunk identifier registry
//!
//! Maps each chunk type tag to a human-readable display name. Tags are a
//! closed enum per format, with [`ChunkTag::Unknown`] as the open extension
//! point for vendor data the codec does not recognize.

/// Semantic kind of a chunk within an embroidery document tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChunkTag {
    /// Document root; owns the whole tree.
    Document,
    /// Fixed-width text-record header.
    Header,
    /// Normal stitch (relative motion).
    Stitch,
    /// Jump stitch (motion without needle down).
    Jump,
    /// Color change command.
    ColorChange,
    /// Sequin mode command.
    Sequin,
    /// End-of-stream sentinel.
    Terminator,
    /// Unrecognized chunk; raw bytes are preserved verbatim.
    Unknown,
}

const TAG_NAMES: &[(ChunkTag, &str)] = &[
    (ChunkTag::Document, "DST_DOCUMENT"),
    (ChunkTag::Header, "DST_HEADER"),
    (ChunkTag::Stitch, "DST_STITCH"),
    (ChunkTag::Jump, "DST_JUMP"),
    (ChunkTag::ColorChange, "DST_COLOR_CHANGE"),
    (ChunkTag::Sequin, "DST_SEQUIN"),
    (ChunkTag::Terminator, "DATA_TERMINATOR"),
    (ChunkTag::Unknown, "DST_UNKNOWN"),
];

/// Look up the display name for a tag, falling back to the tag's debug
/// rendering if it has no registered name.
pub fn display_name(tag: ChunkTag) -> String {
    TAG_NAMES
        .iter()
        .find(|(t, _)| *t == tag)
        .map(|(_, name)| (*name).to_string())
        .unwrap_or_else(|| format!("{:?}", tag))
}
