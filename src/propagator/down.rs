//! Down pass: root-to-leaves propagation of "what symbols are requested".

use std::collections::VecDeque;

use rustc_hash::{FxHashMap as HashMap, FxHashSet as HashSet};

use crate::asset_graph::AssetGraphNode;
use crate::error::Result;
use crate::graph::Graph;
use crate::ids::{NodeId, SymbolId};

use super::db::PropagatorDb;
use super::{incoming_dependencies, outgoing_dependencies, resolved_targets, RESOLVES_TO};
use crate::ids::EdgeTypeSpec;

pub(super) struct DownPassResult {
    /// Dependency nodes whose `usedSymbolsDown` changed this pass - the up
    /// pass seeds from the assets these resolve to.
    pub changed_deps_up_dirty_down: HashSet<NodeId>,
}

pub(super) fn run(
    graph: &Graph<AssetGraphNode>,
    db: &dyn PropagatorDb,
    seeds: &HashSet<NodeId>,
) -> Result<DownPassResult> {
    tracing::debug!(seed_count = seeds.len(), "down pass start");

    let mut queue: VecDeque<NodeId> = seeds.iter().copied().collect();
    let mut in_queue: HashSet<NodeId> = seeds.iter().copied().collect();
    let mut unreached: HashSet<NodeId> = seeds.iter().copied().collect();
    let mut changed_deps_up_dirty_down = HashSet::default();

    while let Some(node_id) = queue.pop_front().or_else(|| {
        let next = unreached.iter().next().copied();
        if let Some(id) = next {
            unreached.remove(&id);
        }
        next
    }) {
        in_queue.remove(&node_id);
        unreached.remove(&node_id);

        if !graph.has_node(node_id) {
            continue;
        }

        match graph.get_node(node_id)? {
            AssetGraphNode::Asset(_) => {
                let changed = visit_asset_down(graph, db, node_id)?;
                for dep_id in changed {
                    changed_deps_up_dirty_down.insert(dep_id);
                    for target in resolved_targets(graph, dep_id)? {
                        if in_queue.insert(target) {
                            queue.push_back(target);
                        }
                        unreached.remove(&target);
                    }
                }
            }
            _ => {
                // Root / asset group / dependency seed: nothing to
                // recompute, just forward reachability so the seed still
                // reaches a real asset.
                for target in graph.get_node_ids_connected_from(node_id, EdgeTypeSpec::Single(RESOLVES_TO)) {
                    if in_queue.insert(target) {
                        queue.push_back(target);
                    }
                    unreached.remove(&target);
                }
            }
        }
    }

    Ok(DownPassResult {
        changed_deps_up_dirty_down,
    })
}

/// Recompute `asset_id`'s `usedSymbols` from its incoming dependencies and
/// its outgoing dependencies' `usedSymbolsDown` from the result. Returns
/// the outgoing dependency ids whose set changed.
fn visit_asset_down(graph: &Graph<AssetGraphNode>, db: &dyn PropagatorDb, asset_id: NodeId) -> Result<Vec<NodeId>> {
    let mut asset = match graph.get_node(asset_id)? {
        AssetGraphNode::Asset(a) => a,
        _ => return Ok(Vec::new()),
    };

    let record = db.asset(&asset.content_key);
    let asset_symbols = record.and_then(|r| r.symbols.as_ref());
    let side_effects = record.map(|r| r.side_effects).unwrap_or(true);

    let mut inverse: HashMap<SymbolId, HashSet<SymbolId>> = HashMap::default();
    if let Some(syms) = asset_symbols {
        for sym in syms {
            inverse.entry(sym.local).or_default().insert(sym.exported);
        }
    }

    let outgoing = outgoing_dependencies(graph, asset_id);
    let has_namespace_reexport = outgoing.iter().any(|dep_id| {
        let Ok(AssetGraphNode::Dependency(d)) = graph.get_node(*dep_id) else {
            return false;
        };
        db.dependency(&d.content_key)
            .and_then(|r| r.symbols.as_ref())
            .map(|syms| syms.iter().any(|s| s.exported == SymbolId::STAR && s.local == SymbolId::STAR))
            .unwrap_or(false)
    });

    let mut used_symbols: HashSet<SymbolId> = HashSet::default();
    let mut namespace_reexported_symbols: HashSet<SymbolId> = HashSet::default();
    let mut add_all = false;
    let mut is_entry = false;

    let incoming = incoming_dependencies(graph, asset_id)?;
    if incoming.is_empty() {
        used_symbols.insert(SymbolId::STAR);
        namespace_reexported_symbols.insert(SymbolId::STAR);
    } else {
        for dep_id in &incoming {
            let AssetGraphNode::Dependency(dep) = graph.get_node(*dep_id)? else {
                continue;
            };
            let dep_record = db.dependency(&dep.content_key);
            match dep_record.and_then(|r| r.symbols.as_ref()) {
                None => {
                    let has_source = dep_record.and_then(|r| r.source_asset_id.as_ref()).is_some();
                    if has_source {
                        add_all = true;
                    } else {
                        is_entry = true;
                    }
                }
                Some(_declared) => {
                    for s in &dep.used_symbols_down {
                        let s = *s;
                        if s == SymbolId::STAR {
                            used_symbols.insert(SymbolId::STAR);
                            namespace_reexported_symbols.insert(SymbolId::STAR);
                            continue;
                        }
                        let declares_s = asset_symbols
                            .map(|syms| syms.iter().any(|d| d.exported == s || d.exported == SymbolId::STAR))
                            .unwrap_or(true);
                        if declares_s {
                            used_symbols.insert(s);
                        } else if has_namespace_reexport && s != SymbolId::DEFAULT {
                            namespace_reexported_symbols.insert(s);
                        }
                    }
                }
            }
        }
    }

    if add_all {
        if let Some(syms) = asset_symbols {
            for s in syms {
                used_symbols.insert(s.exported);
            }
        }
    }

    let mut changed = Vec::new();
    for dep_id in outgoing {
        let AssetGraphNode::Dependency(mut dep) = graph.get_node(dep_id)? else {
            continue;
        };
        let Some(dep_record) = db.dependency(&dep.content_key) else {
            continue;
        };
        let Some(declared) = dep_record.symbols.as_ref() else {
            continue;
        };

        let mut new_down: HashSet<SymbolId> = HashSet::default();
        let condition =
            side_effects || add_all || is_entry || !used_symbols.is_empty() || !namespace_reexported_symbols.is_empty();

        if condition {
            if declared
                .iter()
                .any(|s| s.exported == SymbolId::STAR && s.local == SymbolId::STAR)
            {
                if add_all {
                    new_down.insert(SymbolId::STAR);
                } else {
                    new_down.extend(namespace_reexported_symbols.iter().copied());
                }
            }

            for decl in declared
                .iter()
                .filter(|s| !(s.exported == SymbolId::STAR && s.local == SymbolId::STAR))
            {
                let s = decl.exported;
                if inverse.is_empty() || !decl.is_weak {
                    new_down.insert(s);
                    continue;
                }
                match inverse.get(&decl.local) {
                    None => {
                        new_down.insert(s);
                    }
                    Some(r) => {
                        if used_symbols.contains(&SymbolId::STAR) {
                            new_down.insert(s);
                            for x in r {
                                used_symbols.remove(x);
                            }
                        } else {
                            let intersects: Vec<SymbolId> =
                                r.iter().copied().filter(|x| used_symbols.contains(x)).collect();
                            if !intersects.is_empty() {
                                new_down.insert(s);
                                for x in &intersects {
                                    used_symbols.remove(x);
                                }
                            }
                        }
                    }
                }
            }
        }

        if new_down != dep.used_symbols_down {
            dep.used_symbols_down = new_down;
            dep.used_symbols_down_dirty = true;
            dep.used_symbols_up_dirty_down = true;
            graph.update_node(dep_id, AssetGraphNode::Dependency(dep))?;
            changed.push(dep_id);
        }
    }

    asset.used_symbols = used_symbols;
    asset.used_symbols_down_dirty = false;
    graph.update_node(asset_id, AssetGraphNode::Asset(asset))?;

    Ok(changed)
}
