//! Error taxonomy for the asset-graph core.
//!
//! Two different failure shapes exist in this crate, matching the split in
//! the specification: contract violations on [`crate::graph::Graph`] and
//! [`crate::adjacency::AdjacencyList`] are fatal, programmer-facing errors
//! returned as `Result<T, GraphError>`. Symbol misresolution discovered by
//! the propagator is not a contract violation at all - it is collected as a
//! [`crate::propagator::Diagnostic`] and never constructs a `GraphError`.

use crate::ids::{EdgeType, NodeId};

/// Fatal, programmer-facing errors raised by graph mutation and traversal.
///
/// None of these are expected to occur in a correctly-driven build; they
/// indicate the caller violated the graph's contract and are never retried
/// or downgraded to diagnostics.
#[derive(Debug, thiserror::Error, PartialEq, Eq, Clone)]
pub enum GraphError {
    /// Edge type `0` is reserved as "no edge" and may never be inserted.
    #[error("edge type 0 is reserved and cannot be used")]
    EdgeTypeZero,

    /// One or both endpoints referenced by an edge operation do not exist.
    #[error("node {0:?} does not exist")]
    UnknownNode(NodeId),

    /// `removeEdge` was called for a triple that has no live edge.
    #[error("no edge ({from:?}, {to:?}, {edge_type:?}) exists")]
    EdgeNotFound {
        from: NodeId,
        to: NodeId,
        edge_type: EdgeType,
    },

    /// A traversal was started with neither an explicit start node nor a
    /// root node set on the graph.
    #[error("traversal has no start node and the graph has no root")]
    NoRootOrStart,

    /// `updateNode` (or `getNode`) was called for an id absent from the
    /// node map.
    #[error("node {0:?} not found")]
    NodeNotFound(NodeId),

    /// The wire format produced by `serialize` carries a version the reader
    /// does not understand.
    #[error("unsupported serialized graph version {found}, expected {expected}")]
    UnsupportedVersion { found: u32, expected: u32 },

    /// Deserialization failed because the packed byte strings were
    /// malformed (wrong length, truncated record, etc.).
    #[error("corrupt serialized adjacency list: {0}")]
    CorruptWireFormat(String),
}

/// Result alias used throughout the crate for fallible graph operations.
pub type Result<T> = std::result::Result<T, GraphError>;
