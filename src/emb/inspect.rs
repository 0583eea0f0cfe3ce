//! Tree introspection for presentation layers
//!
//! Produces a lazy, human-oriented summary of any node. Pure queries only;
//! node state is never mutated here.

use super::models::{ChunkFields, ModelNode, NodePayload};
use super::registry;

/// Summary tuple consumed by an external presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeSummary {
    pub is_leaf: bool,
    pub name: String,
    pub info: String,
}

/// Resolve a node into its display summary.
///
/// Leafness is purely structural (no children). The name comes from the
/// chunk registry. Geometry-bearing nodes report their motion deltas;
/// everything else reports the zero pair.
pub fn resolve(node: &ModelNode) -> NodeSummary {
    let info = match &node.payload {
        NodePayload::Decoded(ChunkFields::Motion { dx, dy }) => format!("{} x {}", dx, dy),
        _ => "0 x 0".to_string(),
    };
    NodeSummary {
        is_leaf: node.is_leaf(),
        name: registry::display_name(node.tag),
        info,
    }
}
