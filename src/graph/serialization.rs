//! Wire format for `Graph<TNode>`, used for worker transfer and cache
//! restore.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::adjacency::SerializedAdjacencyList;
use crate::error::{GraphError, Result};
use crate::ids::NodeId;

use super::{Graph, GraphInner, NodePayload};

/// Current wire format version. Readers reject any other value.
pub const WIRE_VERSION: u32 = 1;

/// Self-contained, serializable snapshot of a [`Graph`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SerializedGraph<TNode> {
    version: u32,
    nodes: Vec<(NodeId, TNode)>,
    adjacency_list: SerializedAdjacencyList,
    root_node_id: Option<NodeId>,
    next_node_id: u32,
}

impl<TNode: Clone + NodePayload + Serialize + DeserializeOwned> Graph<TNode> {
    /// Snapshot this graph into its wire form.
    pub fn serialize(&self) -> SerializedGraph<TNode> {
        let inner = self.inner.read();
        SerializedGraph {
            version: WIRE_VERSION,
            nodes: inner.nodes.iter().map(|(id, n)| (*id, n.clone())).collect(),
            adjacency_list: inner.adjacency.serialize(),
            root_node_id: inner.root,
            next_node_id: inner.adjacency.node_count(),
        }
    }

    /// Restore a graph from its wire form.
    pub fn deserialize(data: &SerializedGraph<TNode>) -> Result<Self> {
        if data.version != WIRE_VERSION {
            return Err(GraphError::UnsupportedVersion {
                found: data.version,
                expected: WIRE_VERSION,
            });
        }
        let adjacency = crate::adjacency::AdjacencyList::deserialize(&data.adjacency_list)?;
        if adjacency.node_count() != data.next_node_id {
            return Err(GraphError::CorruptWireFormat(
                "adjacency node_count does not match next_node_id".to_string(),
            ));
        }

        let mut nodes = rustc_hash::FxHashMap::default();
        let mut content_keys = rustc_hash::FxHashMap::default();
        for (id, node) in &data.nodes {
            content_keys.insert(node.content_key().clone(), *id);
            nodes.insert(*id, node.clone());
        }

        let graph = Graph {
            inner: std::sync::Arc::new(parking_lot::RwLock::new(GraphInner {
                nodes,
                adjacency,
                content_keys,
                root: data.root_node_id,
            })),
        };
        Ok(graph)
    }
}
