//! Data structures representing the chunk-oriented document model

use indexmap::IndexMap;
use super::registry::ChunkTag;

/// A header metadata value: free text or an integer quantity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetaValue {
    Text(String),
    Number(i64),
}

impl MetaValue {
    /// The value as an integer, if it is one or parses as one.
    pub fn as_number(&self) -> Option<i64> {
        match self {
            MetaValue::Number(n) => Some(*n),
            MetaValue::Text(s) => s.trim().parse().ok(),
        }
    }

    /// The value rendered as text.
    pub fn as_text(&self) -> String {
        match self {
            MetaValue::Text(s) => s.clone(),
            MetaValue::Number(n) => n.to_string(),
        }
    }
}

impl From<&str> for MetaValue {
    fn from(s: &str) -> Self {
        MetaValue::Text(s.to_string())
    }
}

impl From<i64> for MetaValue {
    fn from(n: i64) -> Self {
        MetaValue::Number(n)
    }
}

/// Ordered mapping of 2-character field codes to header values.
///
/// Insertion order is preserved so that decoded headers can be inspected in
/// file order. Fields absent at encode time receive format defaults.
pub type HeaderMetadata = IndexMap<String, MetaValue>;

/// Decoded, chunk-kind-specific fields.
#[derive(Debug, Clone, PartialEq)]
pub enum ChunkFields {
    /// Document root carries no payload of its own.
    Document,
    /// Header key/value metadata.
    Header(HeaderMetadata),
    /// Relative motion deltas of a stitch command.
    Motion { dx: i32, dy: i32 },
    /// End-of-stream sentinel.
    Terminator,
    /// Unrecognized chunk; original bytes kept verbatim for lossless
    /// re-encoding.
    Opaque(Vec<u8>),
}

/// Payload state of a node: undecoded source bytes, or decoded fields.
///
/// A node is in exactly one of the two states. Decoding replaces `Raw` with
/// `Decoded`; encoding regenerates the byte form from `Decoded` on demand.
#[derive(Debug, Clone, PartialEq)]
pub enum NodePayload {
    Raw(Vec<u8>),
    Decoded(ChunkFields),
}

/// The generic tree unit of a parsed document.
///
/// Ownership is a strict tree: each child is owned by exactly one parent and
/// the document root owns everything. A node is a leaf iff it has no
/// children, independent of its tag.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelNode {
    pub tag: ChunkTag,
    /// Offset of this chunk in the source stream, for diagnostics.
    pub offset: u64,
    pub payload: NodePayload,
    pub children: Vec<ModelNode>,
}

impl ModelNode {
    /// Create a raw node straight from a format reader.
    pub fn raw(tag: ChunkTag, offset: u64, bytes: Vec<u8>) -> Self {
        Self {
            tag,
            offset,
            payload: NodePayload::Raw(bytes),
            children: Vec::new(),
        }
    }

    /// Create a decoded node, as an authoring or conversion step does.
    pub fn decoded(tag: ChunkTag, fields: ChunkFields) -> Self {
        Self {
            tag,
            offset: 0,
            payload: NodePayload::Decoded(fields),
            children: Vec::new(),
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Byte length of the chunk in raw form, if known.
    pub fn raw_len(&self) -> Option<usize> {
        match &self.payload {
            NodePayload::Raw(bytes) => Some(bytes.len()),
            NodePayload::Decoded(ChunkFields::Opaque(bytes)) => Some(bytes.len()),
            NodePayload::Decoded(_) => None,
        }
    }
}
