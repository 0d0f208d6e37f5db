//! Generic labelled multigraph built on top of [`crate::adjacency::AdjacencyList`].
//!
//! `Graph<TNode>` owns node payloads (`NodeId -> TNode`) and a side index
//! from each node's [`ContentKey`] to its `NodeId`, and exposes the
//! mutation, query, and traversal surface consumed by the rest of the
//! bundler. It is deliberately dumb about what `TNode` means - the
//! propagator specializes it with its own tagged node enum.

mod mutations;
mod queries;
mod serialization;
mod traversal;

pub use serialization::SerializedGraph;
pub use traversal::{Actions, DfsOptions, Visitor};

use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap as HashMap;

use crate::adjacency::AdjacencyList;
use crate::ids::{ContentKey, NodeId};

/// Implemented by node payload types so `Graph` can maintain the
/// `ContentKey -> NodeId` side index described in the specification.
pub trait NodePayload {
    /// The owner-assigned key identifying this node, distinct from its
    /// `NodeId`.
    fn content_key(&self) -> &ContentKey;
}

/// Generic labelled directed multigraph.
///
/// Cloning a `Graph` is cheap and shares the same underlying storage (it is
/// `Arc`-backed, like the teacher's own `ModuleGraph`), which lets a handle
/// be passed to worker threads between build steps even though the graph's
/// mutation contract remains single-writer.
#[derive(Debug, Clone)]
pub struct Graph<TNode> {
    inner: Arc<RwLock<GraphInner<TNode>>>,
}

#[derive(Debug)]
pub(crate) struct GraphInner<TNode> {
    pub(crate) nodes: HashMap<NodeId, TNode>,
    pub(crate) adjacency: AdjacencyList,
    pub(crate) content_keys: HashMap<ContentKey, NodeId>,
    pub(crate) root: Option<NodeId>,
}

impl<TNode> Default for GraphInner<TNode> {
    fn default() -> Self {
        Self {
            nodes: HashMap::default(),
            adjacency: AdjacencyList::new(),
            content_keys: HashMap::default(),
            root: None,
        }
    }
}

impl<TNode> Default for Graph<TNode> {
    fn default() -> Self {
        Self::new()
    }
}

impl<TNode> Graph<TNode> {
    /// Create a new, empty graph with no root.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(GraphInner::default())),
        }
    }

    /// Set the node traversals and orphan checks treat as the graph root.
    pub fn set_root_node_id(&self, root: NodeId) {
        self.inner.write().root = Some(root);
    }

    /// The current root, if one has been set.
    pub fn root_node_id(&self) -> Option<NodeId> {
        self.inner.read().root
    }

    /// Total number of live nodes.
    pub fn len(&self) -> usize {
        self.inner.read().nodes.len()
    }

    /// Whether the graph has no nodes.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests;
