//! # emb-codec
//!
//! A chunk-oriented binary document model and codecs for embroidery file
//! formats. Tajima DST is fully supported (header and stitch-command
//! codecs, lossless round trip); Brother PES is a stub pending a verified
//! stitch bit layout.
//!
//! The core consumes and produces immutable byte buffers only; file I/O is
//! a caller concern. Parsing one document is strictly sequential, but
//! documents share no state, so batches parallelize trivially: every
//! exported type is plain owned data (`Send + Sync`).
//!
//! ```
//! use emb_codec::{dst, ChunkTag};
//!
//! let mut file = dst::header::encode(&Default::default()).unwrap();
//! file.extend_from_slice(&[0x00, 0x00, 0x03]); // one zero-motion stitch
//! file.push(dst::DATA_TERMINATOR);
//!
//! let doc = dst::parse_document(&file).unwrap();
//! assert_eq!(doc.children[1].tag, ChunkTag::Stitch);
//! assert_eq!(dst::encode_document(&doc).unwrap(), file);
//! ```
pub mod emb;

// Re-export the main types for convenience
pub use emb::{
    dst, inspect, pes, registry, utils,
    ChunkFields, ChunkTag, EmbError, HeaderMetadata, MetaValue, ModelNode, NodePayload,
    NodeSummary, Result,
};
