//! Core embroidery document model and codec module

pub mod error;
pub mod models;
pub mod registry;
pub mod utils;
pub mod inspect;
pub mod dst;
pub mod pes;

pub use error::{EmbError, Result};
pub use inspect::{resolve, NodeSummary};
pub use models::{ChunkFields, HeaderMetadata, MetaValue, ModelNode, NodePayload};
pub use registry::ChunkTag;
