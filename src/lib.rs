//! # assetgraph-core
//!
//! Typed multigraph storage and cross-module symbol propagation for
//! tree shaking.
//!
//! ## Overview
//!
//! This crate provides the storage layer a bundler builds its module graph
//! on top of, and the two-phase fixpoint pass that decides which exports
//! are actually reachable from the build's entry points:
//!
//! - **[`adjacency`]** - a bit-packed edge list with O(1) `(from, to, type)`
//!   lookup, doubly-linked inbound/outbound adjacency, and load-factor
//!   triggered resizing.
//! - **[`graph`]** - a generic labelled directed multigraph over
//!   `adjacency`, with content-key indexing, orphan pruning, and
//!   DFS/BFS traversals.
//! - **[`asset_graph`]** - the tagged node payload (`Root` / `AssetGroup` /
//!   `Asset` / `Dependency`) the propagator specializes `Graph` with.
//! - **[`propagator`]** - the down pass / up pass symbol propagation that
//!   computes, for every dependency edge, which export it actually
//!   resolves to (or the diagnostic explaining why it doesn't).
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                      AdjacencyList                           │
//! │   packed edges, hash-chained (from,to,type) lookup,          │
//! │   doubly-linked in/out lists per node                        │
//! └───────────────────────────┬────────────────────────────────--┘
//!                             │
//!                             ▼
//! ┌──────────────────────────────────────────────────────────────┐
//! │                      Graph<TNode>                             │
//! │   NodeId -> TNode, ContentKey -> NodeId, root, traversals      │
//! └───────────────────────────┬────────────────────────────────--┘
//!                             │ specialized with
//!                             ▼
//! ┌──────────────────────────────────────────────────────────────┐
//! │                    AssetGraphNode                              │
//! │        Root | AssetGroup | Asset | Dependency                 │
//! └───────────────────────────┬────────────────────────────────--┘
//!                             │ walked by
//!                             ▼
//! ┌──────────────────────────────────────────────────────────────┐
//! │                  propagate_symbols                             │
//! │      down pass (requested symbols) -> up pass (resolutions)    │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use assetgraph_core::{AssetGraphNode, AssetNode, DependencyNode, RootNode};
//! use assetgraph_core::{Graph, EdgeType};
//! use assetgraph_core::{InMemoryDb, PropagationInput, PropagatorConfig, propagate_symbols};
//! use rustc_hash::FxHashSet;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let graph: Graph<AssetGraphNode> = Graph::new();
//! let root = graph.add_node(AssetGraphNode::Root(RootNode { content_key: "root".into() }));
//! let entry = graph.add_node(AssetGraphNode::Asset(AssetNode::new("entry.js")));
//! graph.add_edge(root, entry, EdgeType(1))?;
//! graph.set_root_node_id(root);
//!
//! let db = InMemoryDb::new();
//! let mut changed = FxHashSet::default();
//! changed.insert("entry.js".to_string());
//!
//! let diagnostics = propagate_symbols(
//!     &db,
//!     &graph,
//!     PropagationInput {
//!         changed_assets: &changed,
//!         asset_groups_with_removed_parents: &FxHashSet::default(),
//!         previous_errors: None,
//!     },
//!     &PropagatorConfig::default(),
//! )?;
//! assert!(diagnostics.is_empty());
//! # let _ = DependencyNode::new("unused");
//! # Ok(())
//! # }
//! ```
//!
//! ## Thread Safety
//!
//! [`Graph`] is `Arc`-backed internally, like the adjacency list it wraps,
//! so a handle can be cloned and shared across worker threads between build
//! steps; the mutation contract is still single-writer.

pub mod adjacency;
pub mod asset_graph;
pub mod error;
pub mod graph;
pub mod ids;
pub mod propagator;
pub mod symbols;

pub use adjacency::AdjacencyList;
pub use asset_graph::{AssetGraphNode, AssetGroupNode, AssetNode, DependencyNode, RootNode, SymbolResolution};
pub use error::{GraphError, Result};
pub use graph::{Actions, DfsOptions, Graph, NodePayload, SerializedGraph, Visitor};
pub use ids::{ContentKey, EdgeType, EdgeTypeSpec, NodeId, SymbolId};
pub use propagator::{
    propagate_symbols, AssetRecord, BundleBehavior, DeclaredSymbol, DependencyRecord, Diagnostic, InMemoryDb,
    PropagationInput, PropagatorConfig, PropagatorDb, SourceLocation, DEPENDS_ON, RESOLVES_TO,
};
pub use symbols::SymbolTable;

#[cfg(test)]
mod tests;
