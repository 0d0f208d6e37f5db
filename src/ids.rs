//! Opaque identifiers shared by the adjacency list, graph, and propagator.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Dense, monotonically increasing node identifier.
///
/// `NodeId`s are allocated by [`crate::adjacency::AdjacencyList::add_node`]
/// and are never reused while the owning graph is alive; they stay stable
/// across any sequence of edge mutations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Sentinel used by callers that need to represent "no node" inline
    /// (e.g. a root slot before `setRootNodeId` has been called).
    pub const NULL: NodeId = NodeId(u32::MAX);

    /// Raw dense index backing this id, for use as a `Vec` index.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Typed edge discriminator.
///
/// Type `0` is reserved as "no edge / tombstone" and is rejected by
/// [`crate::adjacency::AdjacencyList::add_edge`]. [`Graph`](crate::graph::Graph)
/// mutators that don't care about edge typing default to [`EdgeType::NULL`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EdgeType(pub u16);

impl EdgeType {
    /// Reserved tombstone value; never a valid edge type.
    pub const TOMBSTONE: EdgeType = EdgeType(0);

    /// Default "untyped" edge used when a caller doesn't distinguish edge
    /// kinds, matching the Graph API's `type = 1` default.
    pub const NULL: EdgeType = EdgeType(1);
}

impl fmt::Display for EdgeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "edge#{}", self.0)
    }
}

/// A query-side specification of which edge types to consider.
///
/// Passed to the inbound/outbound lookup and traversal APIs; `All` is the
/// `ALL_EDGE_TYPES` sentinel from the specification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EdgeTypeSpec {
    /// Every edge type, regardless of value.
    All,
    /// Exactly one edge type.
    Single(EdgeType),
    /// Any of the listed edge types.
    Many(Vec<EdgeType>),
}

impl EdgeTypeSpec {
    /// Whether `ty` matches this specification.
    pub fn matches(&self, ty: EdgeType) -> bool {
        match self {
            EdgeTypeSpec::All => true,
            EdgeTypeSpec::Single(t) => *t == ty,
            EdgeTypeSpec::Many(ts) => ts.contains(&ty),
        }
    }
}

impl From<EdgeType> for EdgeTypeSpec {
    fn from(ty: EdgeType) -> Self {
        EdgeTypeSpec::Single(ty)
    }
}

impl From<Vec<EdgeType>> for EdgeTypeSpec {
    fn from(types: Vec<EdgeType>) -> Self {
        EdgeTypeSpec::Many(types)
    }
}

/// Interned symbol identifier.
///
/// Two values are distinguished by every symbol table: [`SymbolId::STAR`]
/// ("*", the module namespace) and [`SymbolId::DEFAULT`] ("default").
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SymbolId(pub u32);

impl SymbolId {
    /// The namespace symbol, `*`.
    pub const STAR: SymbolId = SymbolId(0);
    /// The default export symbol, `default`.
    pub const DEFAULT: SymbolId = SymbolId(1);
}

impl fmt::Display for SymbolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sym#{}", self.0)
    }
}

/// String key assigned to a node by its owner, distinct from [`NodeId`].
///
/// The graph maintains a side index from `ContentKey` to `NodeId` so that
/// owners (the asset graph) can look nodes up by their own stable keys.
pub type ContentKey = String;
