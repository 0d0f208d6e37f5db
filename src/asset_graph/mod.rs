//! Tagged node payload for the asset/dependency graph the propagator walks.
//!
//! Mirrors the specification's "dynamic typing of node variants": a tagged
//! sum type with discriminant checks driving the propagator, rather than
//! virtual dispatch on the hot path. The heavier, caller-owned data
//! (declared symbols, file paths, side-effect flags) is deliberately kept
//! out of these structs - it lives behind [`crate::propagator::PropagatorDb`]
//! and is looked up by content key, matching the "Asset payload bodies
//! live in an external database keyed by handle" design note.

use std::collections::BTreeMap;

use rustc_hash::FxHashSet as HashSet;
use serde::{Deserialize, Serialize};

use crate::graph::NodePayload;
use crate::ids::{ContentKey, SymbolId};

/// Resolution recorded for a single requested symbol on a dependency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolResolution {
    pub asset: ContentKey,
    pub symbol: Option<SymbolId>,
}

/// The build's single runtime-root node, or an entry point with no asset
/// of its own yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RootNode {
    pub content_key: ContentKey,
}

/// An indirection node that may resolve to one of several candidate
/// assets (e.g. platform-conditional exports).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetGroupNode {
    pub content_key: ContentKey,
}

/// Propagation state tracked on an asset node.
///
/// `usedSymbols` and the dirty flags are the only fields the propagator
/// itself mutates; everything else about the asset (declared exports,
/// side effects, file path) comes from [`crate::propagator::PropagatorDb`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetNode {
    pub content_key: ContentKey,
    pub used_symbols: HashSet<SymbolId>,
    pub used_symbols_down_dirty: bool,
    pub used_symbols_up_dirty: bool,
}

impl AssetNode {
    pub fn new(content_key: impl Into<ContentKey>) -> Self {
        Self {
            content_key: content_key.into(),
            used_symbols: HashSet::default(),
            used_symbols_down_dirty: true,
            used_symbols_up_dirty: true,
        }
    }
}

/// Propagation state tracked on a dependency node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyNode {
    pub content_key: ContentKey,
    pub used_symbols_down: HashSet<SymbolId>,
    /// Kept as a `BTreeMap` rather than a hash map so the finalisation
    /// step's "re-sort by ascending SymbolId" requirement (§4.3) is an
    /// invariant of the type rather than a pass that has to run.
    pub used_symbols_up: BTreeMap<SymbolId, Option<SymbolResolution>>,
    pub used_symbols_down_dirty: bool,
    pub used_symbols_up_dirty_down: bool,
    pub used_symbols_up_dirty_up: bool,
    pub excluded: bool,
}

impl DependencyNode {
    pub fn new(content_key: impl Into<ContentKey>) -> Self {
        Self {
            content_key: content_key.into(),
            used_symbols_down: HashSet::default(),
            used_symbols_up: BTreeMap::new(),
            used_symbols_down_dirty: true,
            used_symbols_up_dirty_down: true,
            used_symbols_up_dirty_up: true,
            excluded: false,
        }
    }
}

/// Tagged node payload stored in the propagator's `Graph<AssetGraphNode>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssetGraphNode {
    Root(RootNode),
    AssetGroup(AssetGroupNode),
    Asset(AssetNode),
    Dependency(DependencyNode),
}

impl AssetGraphNode {
    pub fn as_asset(&self) -> Option<&AssetNode> {
        match self {
            Self::Asset(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_asset_mut(&mut self) -> Option<&mut AssetNode> {
        match self {
            Self::Asset(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_dependency(&self) -> Option<&DependencyNode> {
        match self {
            Self::Dependency(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_dependency_mut(&mut self) -> Option<&mut DependencyNode> {
        match self {
            Self::Dependency(d) => Some(d),
            _ => None,
        }
    }
}

impl NodePayload for AssetGraphNode {
    fn content_key(&self) -> &ContentKey {
        match self {
            Self::Root(n) => &n.content_key,
            Self::AssetGroup(n) => &n.content_key,
            Self::Asset(n) => &n.content_key,
            Self::Dependency(n) => &n.content_key,
        }
    }
}
