//! Node and edge mutation methods for `Graph`.

use crate::error::{GraphError, Result};
use crate::ids::{EdgeType, EdgeTypeSpec, NodeId};

use super::{Graph, NodePayload};

impl<TNode: Clone + NodePayload> Graph<TNode> {
    /// Insert a new node, delegating id allocation to the adjacency list.
    pub fn add_node(&self, node: TNode) -> NodeId {
        let mut inner = self.inner.write();
        let id = inner.adjacency.add_node();
        let key = node.content_key().clone();
        inner.nodes.insert(id, node);
        inner.content_keys.insert(key, id);
        id
    }

    /// Whether `id` is a live node.
    pub fn has_node(&self, id: NodeId) -> bool {
        self.inner.read().nodes.contains_key(&id)
    }

    /// Look the node up by its owner-assigned content key.
    pub fn node_id_for_content_key(&self, key: &str) -> Option<NodeId> {
        self.inner.read().content_keys.get(key).copied()
    }

    /// Retrieve an owned clone of the node payload.
    pub fn get_node(&self, id: NodeId) -> Result<TNode> {
        self.inner
            .read()
            .nodes
            .get(&id)
            .cloned()
            .ok_or(GraphError::NodeNotFound(id))
    }

    /// Replace the payload stored at `id`. Fails if `id` is absent.
    pub fn update_node(&self, id: NodeId, node: TNode) -> Result<()> {
        let mut inner = self.inner.write();
        if !inner.nodes.contains_key(&id) {
            return Err(GraphError::NodeNotFound(id));
        }
        let old_key = inner.nodes.get(&id).unwrap().content_key().clone();
        let new_key = node.content_key().clone();
        inner.nodes.insert(id, node);
        if old_key != new_key {
            inner.content_keys.remove(&old_key);
            inner.content_keys.insert(new_key, id);
        }
        Ok(())
    }

    /// Insert a typed edge. Default edge type is `1` ("null edge /
    /// untyped"), matching the Graph API default.
    pub fn add_edge(&self, from: NodeId, to: NodeId, edge_type: EdgeType) -> Result<bool> {
        self.inner.write().adjacency.add_edge(from, to, edge_type)
    }

    /// Hash lookup for a typed edge.
    pub fn has_edge(&self, from: NodeId, to: NodeId, edge_type: EdgeType) -> bool {
        self.inner.read().adjacency.has_edge(from, to, edge_type)
    }

    /// Remove `(from, to, edge_type)`. When `remove_orphans` is set, `to`
    /// is additionally removed if it becomes orphaned (invariant 5).
    pub fn remove_edge(
        &self,
        from: NodeId,
        to: NodeId,
        edge_type: EdgeType,
        remove_orphans: bool,
    ) -> Result<()> {
        self.inner.write().adjacency.remove_edge(from, to, edge_type)?;

        if remove_orphans && self.is_orphaned_node(to) {
            self.remove_node(to)?;
        }
        Ok(())
    }

    /// Remove every outbound edge of `edge_type` from `node`.
    pub fn remove_edges(&self, node: NodeId, edge_type: EdgeType) -> Result<()> {
        let targets: Vec<NodeId> = self
            .inner
            .read()
            .adjacency
            .nodes_connected_from(node, &EdgeTypeSpec::Single(edge_type))
            .collect();
        for to in targets {
            self.inner.write().adjacency.remove_edge(node, to, edge_type)?;
        }
        Ok(())
    }

    /// Remove a node and every edge incident to it.
    ///
    /// Inbound edges are removed with orphan pruning disabled - `id`
    /// itself is about to disappear, so any node that would only become
    /// orphaned by losing its edge *to* `id` is not this call's business.
    /// Outbound edges are removed with orphan pruning enabled, since
    /// those targets may now be legitimately unreachable.
    pub fn remove_node(&self, id: NodeId) -> Result<()> {
        if !self.has_node(id) {
            return Err(GraphError::NodeNotFound(id));
        }

        let inbound_sources: Vec<(NodeId, EdgeType)> = self
            .inner
            .read()
            .adjacency
            .inbound_edges_by_type(id)
            .map(|(ty, from)| (from, ty))
            .collect();
        for (from, ty) in inbound_sources {
            let _ = self.inner.write().adjacency.remove_edge(from, id, ty);
        }

        let outbound_targets: Vec<(NodeId, EdgeType)> = self
            .inner
            .read()
            .adjacency
            .outbound_edges_by_type(id)
            .map(|(ty, to)| (to, ty))
            .collect();
        for (to, ty) in outbound_targets {
            // A self-loop's far endpoint is `id` itself, already mid-removal;
            // orphan pruning on it would recurse back into this call.
            let _ = self.remove_edge(id, to, ty, to != id);
        }

        let mut inner = self.inner.write();
        if let Some(node) = inner.nodes.remove(&id) {
            inner.content_keys.remove(node.content_key());
        }
        if inner.root == Some(id) {
            inner.root = None;
        }
        Ok(())
    }

    /// Set semantics: after this call, `from`'s outbound neighbours of
    /// `edge_type` equal `new_tos` unioned with the pre-existing
    /// neighbours that do NOT match `filter`. Edges added are fresh
    /// `add_edge` calls; edges removed obey orphan pruning.
    pub fn replace_node_ids_connected_to(
        &self,
        from: NodeId,
        new_tos: impl IntoIterator<Item = NodeId>,
        filter: Option<&dyn Fn(NodeId) -> bool>,
        edge_type: EdgeType,
    ) -> Result<()> {
        let new_tos: std::collections::HashSet<NodeId> = new_tos.into_iter().collect();

        let existing: Vec<NodeId> = self
            .inner
            .read()
            .adjacency
            .nodes_connected_from(from, &EdgeTypeSpec::Single(edge_type))
            .collect();

        for to in existing {
            if new_tos.contains(&to) {
                continue;
            }
            let matches_filter = filter.map(|f| f(to)).unwrap_or(true);
            if matches_filter {
                self.remove_edge(from, to, edge_type, true)?;
            }
        }

        for to in new_tos {
            self.add_edge(from, to, edge_type)?;
        }
        Ok(())
    }
}
