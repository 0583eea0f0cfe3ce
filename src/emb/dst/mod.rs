//! Tajima DST format support
//!
//! A DST file is a 512-byte text header followed by a stream of 3-byte
//! stitch commands, closed by a single terminator byte. This module splits
//! an input buffer into raw chunks, decodes them into a document tree, and
//! re-encodes a tree back to bytes.
//!
//! The terminator is in-band: a 3-byte motion record may legitimately begin
//! with the terminator value, so splitting is ambiguous at that boundary.
//! The rule here is that the terminator always wins; everything after it is
//! kept as one opaque chunk, verbatim. The splitter is exhaustive (every
//! input byte lands in exactly one chunk) and terminator, unknown, and
//! trailing chunks re-encode verbatim, so a parsed document re-encodes to
//! the original bytes.

pub mod header;
pub mod stitch;

use log::{debug, info};

use crate::emb::error::{EmbError, Result};
use crate::emb::models::{ChunkFields, ModelNode, NodePayload};
use crate::emb::registry::ChunkTag;
use stitch::{Command, StitchChunk};

/// Fixed size of the DST header record.
pub const HEADER_SIZE: usize = 512;

/// Sentinel byte closing the header record and the stitch stream.
pub const DATA_TERMINATOR: u8 = 0x1A;

pub const FORMAT_NAME: &str = "Tajima DST";

fn tag_for_command(command: Command) -> ChunkTag {
    match command {
        Command::Stitch => ChunkTag::Stitch,
        Command::Jump => ChunkTag::Jump,
        Command::ColorChange => ChunkTag::ColorChange,
        Command::Sequin => ChunkTag::Sequin,
    }
}

fn command_for_tag(tag: ChunkTag) -> Option<Command> {
    match tag {
        ChunkTag::Stitch => Some(Command::Stitch),
        ChunkTag::Jump => Some(Command::Jump),
        ChunkTag::ColorChange => Some(Command::ColorChange),
        ChunkTag::Sequin => Some(Command::Sequin),
        _ => None,
    }
}

/// Transition a node from raw bytes to decoded fields.
///
/// Already-decoded nodes are left untouched. Stitch-stream chunks are
/// classified by shape, so this never rejects vendor data: anything the
/// codec does not recognize becomes an opaque node that re-encodes
/// verbatim.
pub fn decode_node(node: &mut ModelNode) -> Result<()> {
    let bytes = match &node.payload {
        NodePayload::Raw(bytes) => bytes,
        NodePayload::Decoded(_) => return Ok(()),
    };

    let (tag, fields) = match node.tag {
        ChunkTag::Header => {
            let metadata = header::decode(bytes);
            (ChunkTag::Header, ChunkFields::Header(metadata))
        }
        ChunkTag::Document => (ChunkTag::Document, ChunkFields::Document),
        _ => match stitch::decode(bytes) {
            StitchChunk::Terminator => (ChunkTag::Terminator, ChunkFields::Terminator),
            StitchChunk::Motion { dx, dy, command } => {
                (tag_for_command(command), ChunkFields::Motion { dx, dy })
            }
            StitchChunk::Unknown(bytes) => (ChunkTag::Unknown, ChunkFields::Opaque(bytes)),
        },
    };

    node.tag = tag;
    node.payload = NodePayload::Decoded(fields);
    Ok(())
}

/// Produce the byte form of a single node.
///
/// Raw nodes pass through unchanged; decoded nodes are re-packed per their
/// chunk kind. Errors carry the node's stream offset and length.
pub fn encode_node(node: &ModelNode) -> Result<Vec<u8>> {
    let fields = match &node.payload {
        NodePayload::Raw(bytes) => return Ok(bytes.clone()),
        NodePayload::Decoded(fields) => fields,
    };

    let encoded = match fields {
        ChunkFields::Document => Ok(Vec::new()),
        ChunkFields::Header(metadata) => header::encode(metadata),
        ChunkFields::Terminator => stitch::encode(&StitchChunk::Terminator),
        ChunkFields::Opaque(bytes) => stitch::encode(&StitchChunk::Unknown(bytes.clone())),
        ChunkFields::Motion { dx, dy } => match command_for_tag(node.tag) {
            Some(command) => stitch::encode(&StitchChunk::Motion {
                dx: *dx,
                dy: *dy,
                command,
            }),
            None => Err(EmbError::InvalidFormat(format!(
                "motion fields on a non-command node ({:?})",
                node.tag
            ))),
        },
    };

    encoded.map_err(|e| e.at_chunk(node.offset, node.raw_len().unwrap_or(0)))
}

/// Split the stitch-stream region into chunks: 3 bytes at a time, a 1-byte
/// chunk where the terminator starts, and whatever follows the terminator
/// (or a short tail) as one final chunk.
///
/// The terminator takes precedence over a motion record starting with the
/// same byte value. Bytes after the terminator are emitted as an
/// already-classified opaque chunk: they are past the end of the stream and
/// must never be re-interpreted as records, only reproduced verbatim.
fn split_stream(data: &[u8], base_offset: u64) -> Vec<ModelNode> {
    let mut chunks = Vec::new();
    let mut pos = 0usize;
    while pos < data.len() {
        let rest = &data[pos..];
        let offset = base_offset + pos as u64;
        if rest[0] == DATA_TERMINATOR {
            chunks.push(ModelNode::raw(ChunkTag::Unknown, offset, vec![rest[0]]));
            if rest.len() > 1 {
                let mut tail = ModelNode::decoded(
                    ChunkTag::Unknown,
                    ChunkFields::Opaque(rest[1..].to_vec()),
                );
                tail.offset = offset + 1;
                chunks.push(tail);
            }
            break;
        }
        let take = rest.len().min(3);
        chunks.push(ModelNode::raw(ChunkTag::Unknown, offset, rest[..take].to_vec()));
        pos += take;
    }
    chunks
}

/// Parse a whole DST file buffer into a decoded document tree.
///
/// The input must be fully buffered; no I/O happens here. The first 512
/// bytes are the header, the remainder the stitch stream. Chunks are
/// decoded in stream order.
pub fn parse_document(data: &[u8]) -> Result<ModelNode> {
    if data.len() < HEADER_SIZE {
        return Err(EmbError::InvalidLength {
            context: "DST header record",
            expected: HEADER_SIZE,
            actual: data.len(),
        });
    }

    let mut root = ModelNode::decoded(ChunkTag::Document, ChunkFields::Document);

    let mut header_node = ModelNode::raw(ChunkTag::Header, 0, data[..HEADER_SIZE].to_vec());
    decode_node(&mut header_node)?;
    root.children.push(header_node);

    for mut chunk in split_stream(&data[HEADER_SIZE..], HEADER_SIZE as u64) {
        decode_node(&mut chunk)?;
        root.children.push(chunk);
    }

    let unknown = root
        .children
        .iter()
        .filter(|c| c.tag == ChunkTag::Unknown)
        .count();
    if unknown > 0 {
        debug!("{} unrecognized chunks preserved verbatim", unknown);
    }
    info!(
        "parsed {} document: {} bytes, {} chunks",
        FORMAT_NAME,
        data.len(),
        root.children.len()
    );
    Ok(root)
}

/// Serialize a document tree back to DST bytes.
///
/// Children are emitted in order, depth first. A tree that came from
/// [`parse_document`] reproduces its source buffer byte for byte.
pub fn encode_document(root: &ModelNode) -> Result<Vec<u8>> {
    let mut out = encode_node(root)?;
    for child in &root.children {
        out.extend(encode_document(child)?);
    }
    Ok(out)
}
