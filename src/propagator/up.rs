//! Up pass: leaves-to-root propagation of "where does each request
//! resolve", plus the symbol-misresolution diagnostics it produces.

use std::cell::RefCell;
use std::collections::{BTreeMap, VecDeque};

use rustc_hash::{FxHashMap as HashMap, FxHashSet as HashSet};

use crate::asset_graph::{AssetGraphNode, SymbolResolution};
use crate::error::Result;
use crate::graph::{DfsOptions, Graph, Visitor};
use crate::ids::{NodeId, SymbolId};

use super::db::{BundleBehavior, PropagatorDb};
use super::{graph_successors, incoming_dependencies, outgoing_dependencies, resolved_targets, source_asset_of};
use super::{Diagnostic, PropagatorConfig};

pub(super) fn run(
    graph: &Graph<AssetGraphNode>,
    db: &dyn PropagatorDb,
    seeds: &HashSet<NodeId>,
    config: &PropagatorConfig,
) -> Result<HashMap<NodeId, Vec<Diagnostic>>> {
    tracing::debug!(seed_count = seeds.len(), "up pass start");

    let total_nodes = graph.len();
    let threshold = config.full_dfs_threshold(total_nodes);

    if seeds.len() > threshold {
        tracing::trace!(threshold, "up pass falling back to full post-order dfs");
        return run_full_dfs(graph, db, config);
    }

    let mut diagnostics = HashMap::default();
    let mut queue: VecDeque<NodeId> = seeds.iter().copied().collect();
    let mut in_queue: HashSet<NodeId> = seeds.iter().copied().collect();

    while let Some(asset_id) = queue.pop_front() {
        in_queue.remove(&asset_id);
        if !graph.has_node(asset_id) {
            continue;
        }
        let (diags, changed_incoming) = visit_asset_up(graph, db, asset_id, config)?;
        if !diags.is_empty() {
            diagnostics.insert(asset_id, diags);
        }
        for dep_id in changed_incoming {
            for source in source_asset_of(graph, dep_id) {
                if in_queue.insert(source) {
                    queue.push_back(source);
                }
            }
        }
    }

    Ok(diagnostics)
}

fn run_full_dfs(
    graph: &Graph<AssetGraphNode>,
    db: &dyn PropagatorDb,
    config: &PropagatorConfig,
) -> Result<HashMap<NodeId, Vec<Diagnostic>>> {
    let Some(root) = graph.root_node_id() else {
        return Ok(HashMap::default());
    };
    let diagnostics = RefCell::new(HashMap::default());
    let graph_for_children = graph.clone();

    graph.dfs(DfsOptions {
        start_node_id: Some(root),
        initial_context: (),
        get_children: Box::new(move |n| graph_successors(&graph_for_children, n).unwrap_or_default()),
        visitor: Visitor {
            enter: Box::new(|_id, _payload, _ctx, _actions| {}),
            exit: Some(Box::new(|id, payload, _ctx| {
                if matches!(payload, AssetGraphNode::Asset(_)) {
                    if let Ok((diags, _changed)) = visit_asset_up(graph, db, id, config) {
                        if !diags.is_empty() {
                            diagnostics.borrow_mut().insert(id, diags);
                        }
                    }
                }
            })),
        },
    })?;

    Ok(diagnostics.into_inner())
}

/// Recompute `asset_id`'s outgoing re-export table and every incoming
/// dependency's `usedSymbolsUp`. Returns this asset's diagnostics and the
/// incoming dependency ids whose resolution changed.
fn visit_asset_up(
    graph: &Graph<AssetGraphNode>,
    db: &dyn PropagatorDb,
    asset_id: NodeId,
    config: &PropagatorConfig,
) -> Result<(Vec<Diagnostic>, Vec<NodeId>)> {
    let mut asset = match graph.get_node(asset_id)? {
        AssetGraphNode::Asset(a) => a,
        _ => return Ok((Vec::new(), Vec::new())),
    };
    let asset_key = asset.content_key.clone();
    let record = db.asset(&asset_key);
    let asset_symbols = record.and_then(|r| r.symbols.as_ref());
    let side_effects = record.map(|r| r.side_effects).unwrap_or(true);
    let bundle_behavior = record.map(|r| r.bundle_behavior).unwrap_or_default();

    let mut inverse: HashMap<SymbolId, HashSet<SymbolId>> = HashMap::default();
    if let Some(syms) = asset_symbols {
        for sym in syms {
            inverse.entry(sym.local).or_default().insert(sym.exported);
        }
    }

    let mut reexported: BTreeMap<SymbolId, Option<SymbolResolution>> = BTreeMap::new();
    let mut reexported_source: HashMap<SymbolId, NodeId> = HashMap::default();

    let outgoing = outgoing_dependencies(graph, asset_id);
    for dep_id in &outgoing {
        let AssetGraphNode::Dependency(mut dep) = graph.get_node(*dep_id)? else {
            continue;
        };
        let targets = resolved_targets(graph, *dep_id)?;
        if targets.is_empty() {
            let mut new_up = dep.used_symbols_up.clone();
            for s in &dep.used_symbols_down {
                new_up.insert(*s, None);
            }
            if new_up != dep.used_symbols_up {
                dep.used_symbols_up = new_up;
                graph.update_node(*dep_id, AssetGraphNode::Dependency(dep))?;
            }
            continue;
        }

        let Some(dep_record) = db.dependency(&dep.content_key) else {
            continue;
        };
        let has_star_reexport = dep_record
            .symbols
            .as_ref()
            .map(|syms| syms.iter().any(|s| s.exported == SymbolId::STAR && s.local == SymbolId::STAR))
            .unwrap_or(false);

        if has_star_reexport {
            for (s, resolved) in dep.used_symbols_up.iter() {
                if *s == SymbolId::DEFAULT {
                    continue;
                }
                merge_reexport(
                    &mut reexported,
                    &mut reexported_source,
                    &mut asset.used_symbols,
                    *s,
                    resolved.clone(),
                    *dep_id,
                    &asset_key,
                    config,
                );
            }
        }

        if let Some(declared) = dep_record.symbols.as_ref() {
            for (s, resolved) in dep.used_symbols_up.iter() {
                if !dep.used_symbols_down.contains(s) {
                    continue;
                }
                let Some(local) = declared.iter().find(|d| d.exported == *s).map(|d| d.local) else {
                    continue;
                };
                let Some(r) = inverse.get(&local).cloned() else {
                    continue;
                };
                for re in r {
                    merge_reexport(
                        &mut reexported,
                        &mut reexported_source,
                        &mut asset.used_symbols,
                        re,
                        resolved.clone(),
                        *dep_id,
                        &asset_key,
                        config,
                    );
                }
            }
        }
    }

    let mut diagnostics = Vec::new();
    let mut changed_incoming = Vec::new();
    let incoming = incoming_dependencies(graph, asset_id)?;

    for dep_id in incoming {
        let AssetGraphNode::Dependency(mut dep) = graph.get_node(dep_id)? else {
            continue;
        };
        let Some(dep_record) = db.dependency(&dep.content_key) else {
            continue;
        };
        let Some(declared) = dep_record.symbols.as_ref() else {
            continue;
        };

        let previous = dep.used_symbols_up.clone();
        let mut new_up: BTreeMap<SymbolId, Option<SymbolResolution>> = BTreeMap::new();
        let has_star_import = declared
            .iter()
            .any(|s| s.exported == SymbolId::STAR && s.local == SymbolId::STAR);

        for s in dep.used_symbols_down.iter().copied() {
            let resolves_locally = asset_symbols.is_none()
                || matches!(bundle_behavior, BundleBehavior::Isolated | BundleBehavior::Inline)
                || s == SymbolId::STAR
                || asset.used_symbols.contains(&s);

            if resolves_locally {
                new_up.insert(
                    s,
                    Some(SymbolResolution {
                        asset: asset_key.clone(),
                        symbol: Some(s),
                    }),
                );
            } else if let Some(resolution) = reexported.get(&s) {
                if side_effects {
                    new_up.insert(
                        s,
                        Some(SymbolResolution {
                            asset: asset_key.clone(),
                            symbol: Some(s),
                        }),
                    );
                } else {
                    new_up.insert(s, resolution.clone());
                }
            } else if !has_star_import {
                let loc = declared.iter().find(|d| d.exported == s).and_then(|d| d.loc);
                let symbol_name = db.resolve_symbol_name(s);
                let file_path = record.map(|r| r.file_path.as_str()).unwrap_or("");
                diagnostics.push(Diagnostic::missing_export(file_path, symbol_name, loc));
            }
        }

        if new_up != previous {
            dep.used_symbols_up = new_up;
            dep.used_symbols_up_dirty_up = true;
            changed_incoming.push(dep_id);
        }

        let resolved = resolved_targets(graph, dep_id)?;
        let mut excluded = dep.used_symbols_up.is_empty() && resolved.len() == 1;
        if excluded {
            excluded = match graph.get_node(resolved[0])? {
                AssetGraphNode::Asset(target) => db.asset(&target.content_key).map(|r| !r.side_effects).unwrap_or(false),
                _ => false,
            };
        }
        dep.excluded = excluded;

        graph.update_node(dep_id, AssetGraphNode::Dependency(dep))?;
    }

    asset.used_symbols_up_dirty = false;
    graph.update_node(asset_id, AssetGraphNode::Asset(asset))?;

    Ok((diagnostics, changed_incoming))
}

#[allow(clippy::too_many_arguments)]
fn merge_reexport(
    reexported: &mut BTreeMap<SymbolId, Option<SymbolResolution>>,
    reexported_source: &mut HashMap<SymbolId, NodeId>,
    asset_used_symbols: &mut HashSet<SymbolId>,
    symbol: SymbolId,
    resolution: Option<SymbolResolution>,
    source_dep: NodeId,
    asset_key: &str,
    config: &PropagatorConfig,
) {
    match reexported_source.get(&symbol) {
        Some(existing_source) if *existing_source != source_dep => {
            if config.log_ambiguous_namespace_at_warn {
                tracing::warn!(symbol = %symbol, "ambiguous namespace re-export");
            } else {
                tracing::debug!(symbol = %symbol, "ambiguous namespace re-export");
            }
            reexported.insert(
                symbol,
                Some(SymbolResolution {
                    asset: asset_key.to_string(),
                    symbol: Some(symbol),
                }),
            );
            asset_used_symbols.insert(SymbolId::STAR);
        }
        _ => {
            reexported.insert(symbol, resolution);
            reexported_source.insert(symbol, source_dep);
        }
    }
}
