//! Read-only query methods for `Graph`.

use crate::ids::{EdgeType, EdgeTypeSpec, NodeId};

use super::{Graph, NodePayload};

impl<TNode: Clone + NodePayload> Graph<TNode> {
    /// De-duplicated outbound neighbours of `id` matching `types`.
    pub fn get_node_ids_connected_from(&self, id: NodeId, types: EdgeTypeSpec) -> Vec<NodeId> {
        let inner = self.inner.read();
        let mut seen = rustc_hash::FxHashSet::default();
        inner
            .adjacency
            .nodes_connected_from(id, &types)
            .filter(|n| seen.insert(*n))
            .collect()
    }

    /// De-duplicated inbound neighbours of `id` matching `types`.
    pub fn get_node_ids_connected_to(&self, id: NodeId, types: EdgeTypeSpec) -> Vec<NodeId> {
        let inner = self.inner.read();
        let mut seen = rustc_hash::FxHashSet::default();
        inner
            .adjacency
            .nodes_connected_to(id, &types)
            .filter(|n| seen.insert(*n))
            .collect()
    }

    /// Stream every live edge in the graph.
    pub fn get_all_edges(&self) -> Vec<(NodeId, NodeId, EdgeType)> {
        self.inner.read().adjacency.all_edges().collect()
    }

    /// Whether `id` is orphaned: unreachable from the root (or, if the
    /// graph has no root, has no inbound edges at all).
    pub fn is_orphaned_node(&self, id: NodeId) -> bool {
        if !self.has_node(id) {
            return false;
        }

        let root = match self.root_node_id() {
            Some(root) => root,
            None => {
                return self
                    .inner
                    .read()
                    .adjacency
                    .inbound_edges_by_type(id)
                    .next()
                    .is_none();
            }
        };

        if root == id {
            return false;
        }

        let mut reachable = false;
        let _ = self.traverse_ancestors(id, EdgeTypeSpec::All, |node, _payload, actions| {
            if node == root {
                reachable = true;
                actions.stop();
            }
        });
        reachable
    }
}
