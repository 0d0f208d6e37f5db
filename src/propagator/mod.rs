//! Two-phase fixpoint symbol propagation over an asset/dependency graph.
//!
//! Specializes [`crate::graph::Graph`] with [`AssetGraphNode`] and runs a
//! root-to-leaves "requested symbols" pass followed by a leaves-to-root
//! "resolved symbols" pass, the dataflow that drives dead-code elimination
//! over the module graph. See [`down`] and [`up`] for the two passes.

mod config;
mod db;
mod diagnostic;
mod down;
mod up;

pub use config::PropagatorConfig;
pub use db::{AssetRecord, BundleBehavior, DeclaredSymbol, DependencyRecord, InMemoryDb, PropagatorDb};
pub use diagnostic::{Diagnostic, SourceLocation};

use rustc_hash::{FxHashMap as HashMap, FxHashSet as HashSet};

use crate::asset_graph::AssetGraphNode;
use crate::error::Result;
use crate::graph::Graph;
use crate::ids::{ContentKey, EdgeType, EdgeTypeSpec, NodeId};

/// Edge from an asset (or the root) to one of its dependencies.
pub const DEPENDS_ON: EdgeType = EdgeType(1);
/// Edge from a dependency (or an intermediate asset group) to the asset
/// or asset group it resolves to.
pub const RESOLVES_TO: EdgeType = EdgeType(2);

/// Input to a [`propagate_symbols`] call.
pub struct PropagationInput<'a> {
    pub changed_assets: &'a HashSet<ContentKey>,
    pub asset_groups_with_removed_parents: &'a HashSet<NodeId>,
    pub previous_errors: Option<HashMap<NodeId, Vec<Diagnostic>>>,
}

/// Run a full down pass then up pass over `asset_graph`, returning the
/// per-node diagnostics produced by the up pass (merged with whatever of
/// `previous_errors` remains valid).
pub fn propagate_symbols(
    db: &dyn PropagatorDb,
    asset_graph: &Graph<AssetGraphNode>,
    input: PropagationInput<'_>,
    config: &PropagatorConfig,
) -> Result<HashMap<NodeId, Vec<Diagnostic>>> {
    let mut down_seeds: HashSet<NodeId> = HashSet::default();
    for key in input.changed_assets {
        if let Some(id) = asset_graph.node_id_for_content_key(key) {
            down_seeds.insert(id);
        }
    }
    down_seeds.extend(input.asset_groups_with_removed_parents.iter().copied());

    let down_result = down::run(asset_graph, db, &down_seeds)?;

    let mut up_seeds: HashSet<NodeId> = HashSet::default();
    for dep_id in &down_result.changed_deps_up_dirty_down {
        for target in resolved_targets(asset_graph, *dep_id)? {
            up_seeds.insert(target);
        }
    }
    for key in input.changed_assets {
        if let Some(id) = asset_graph.node_id_for_content_key(key) {
            up_seeds.insert(id);
        }
    }

    let mut diagnostics = up::run(asset_graph, db, &up_seeds, config)?;

    let mut previous = input.previous_errors.unwrap_or_default();
    previous.retain(|id, _| asset_graph.has_node(*id));
    for (id, diags) in previous {
        diagnostics.entry(id).or_insert(diags);
    }

    Ok(diagnostics)
}

pub(crate) fn outgoing_dependencies(graph: &Graph<AssetGraphNode>, node: NodeId) -> Vec<NodeId> {
    graph.get_node_ids_connected_from(node, EdgeTypeSpec::Single(DEPENDS_ON))
}

/// Children of `node` in the asset-graph topology, following whichever
/// edge type that node's variant actually has outgoing edges of: `Root`/
/// `Asset` nodes only have `DEPENDS_ON` successors, `Dependency`/
/// `AssetGroup` nodes only have `RESOLVES_TO` ones. Used to drive a single
/// traversal across both edge types, e.g. the up pass's full-graph DFS
/// fallback.
pub(crate) fn graph_successors(graph: &Graph<AssetGraphNode>, node: NodeId) -> Result<Vec<NodeId>> {
    let edge_type = match graph.get_node(node)? {
        AssetGraphNode::Root(_) | AssetGraphNode::Asset(_) => DEPENDS_ON,
        AssetGraphNode::AssetGroup(_) | AssetGraphNode::Dependency(_) => RESOLVES_TO,
    };
    Ok(graph.get_node_ids_connected_from(node, EdgeTypeSpec::Single(edge_type)))
}

/// Dependency nodes whose resolution (possibly through an intermediate
/// asset group) reaches `asset_id`.
pub(crate) fn incoming_dependencies(graph: &Graph<AssetGraphNode>, asset_id: NodeId) -> Result<Vec<NodeId>> {
    let mut deps = Vec::new();
    let mut frontier = vec![asset_id];
    let mut seen = HashSet::default();
    while let Some(current) = frontier.pop() {
        for pred in graph.get_node_ids_connected_to(current, EdgeTypeSpec::Single(RESOLVES_TO)) {
            if !seen.insert(pred) {
                continue;
            }
            match graph.get_node(pred)? {
                AssetGraphNode::Dependency(_) => deps.push(pred),
                AssetGraphNode::AssetGroup(_) => frontier.push(pred),
                _ => {}
            }
        }
    }
    Ok(deps)
}

/// Asset nodes reached from `dep_id`, unwrapping any intermediate asset
/// group indirection.
pub(crate) fn resolved_targets(graph: &Graph<AssetGraphNode>, dep_id: NodeId) -> Result<Vec<NodeId>> {
    let mut targets = Vec::new();
    let mut frontier: Vec<NodeId> =
        graph.get_node_ids_connected_from(dep_id, EdgeTypeSpec::Single(RESOLVES_TO));
    let mut seen = HashSet::default();
    while let Some(current) = frontier.pop() {
        if !seen.insert(current) {
            continue;
        }
        match graph.get_node(current)? {
            AssetGraphNode::Asset(_) => targets.push(current),
            AssetGraphNode::AssetGroup(_) => frontier.extend(graph.get_node_ids_connected_from(
                current,
                EdgeTypeSpec::Single(RESOLVES_TO),
            )),
            _ => {}
        }
    }
    Ok(targets)
}

/// The asset (or root) that declared a dependency, if any.
pub(crate) fn source_asset_of(graph: &Graph<AssetGraphNode>, dep_id: NodeId) -> Vec<NodeId> {
    graph.get_node_ids_connected_to(dep_id, EdgeTypeSpec::Single(DEPENDS_ON))
}
