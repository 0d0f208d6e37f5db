//! Fast, deterministic end-to-end tests exercising `adjacency`, `graph`,
//! and `propagator` together, the way a real incremental build would.

use rustc_hash::FxHashSet;

use crate::asset_graph::{AssetGraphNode, AssetNode, DependencyNode, RootNode};
use crate::propagator::{
    propagate_symbols, AssetRecord, DeclaredSymbol, DependencyRecord, InMemoryDb, PropagationInput,
    PropagatorConfig, DEPENDS_ON, RESOLVES_TO,
};
use crate::{EdgeType, Graph};

fn changed(keys: &[&str]) -> FxHashSet<String> {
    keys.iter().map(|k| k.to_string()).collect()
}

/// entry.js imports `{used}` from lib.js and never touches `{unused}`;
/// propagation should leave `unused` out of lib.js's `used_symbols`.
#[test]
fn dead_export_is_excluded_from_used_symbols() {
    let graph: Graph<AssetGraphNode> = Graph::new();
    let mut db = InMemoryDb::new();
    let used = db.intern("used");
    let unused = db.intern("unused");

    let root = graph.add_node(AssetGraphNode::Root(RootNode {
        content_key: "root".to_string(),
    }));
    let entry = graph.add_node(AssetGraphNode::Asset(AssetNode::new("entry.js")));
    let lib = graph.add_node(AssetGraphNode::Asset(AssetNode::new("lib.js")));

    let mut d = DependencyNode::new("entry->lib");
    d.used_symbols_down.insert(used);
    let dep = graph.add_node(AssetGraphNode::Dependency(d));

    graph.add_edge(entry, dep, DEPENDS_ON).unwrap();
    graph.add_edge(dep, lib, RESOLVES_TO).unwrap();
    graph.set_root_node_id(root);

    db.insert_asset(
        "lib.js",
        AssetRecord {
            symbols: Some(vec![
                DeclaredSymbol { exported: used, local: used, is_weak: false, loc: None },
                DeclaredSymbol { exported: unused, local: unused, is_weak: false, loc: None },
            ]),
            file_path: "lib.js".to_string(),
            side_effects: false,
            bundle_behavior: Default::default(),
        },
    );
    db.insert_dependency(
        "entry->lib",
        DependencyRecord {
            symbols: Some(vec![DeclaredSymbol { exported: used, local: used, is_weak: false, loc: None }]),
            specifier: "./lib".to_string(),
            source_asset_id: None,
        },
    );

    let diagnostics = propagate_symbols(
        &db,
        &graph,
        PropagationInput {
            changed_assets: &changed(&["lib.js"]),
            asset_groups_with_removed_parents: &FxHashSet::default(),
            previous_errors: None,
        },
        &PropagatorConfig::default(),
    )
    .unwrap();
    assert!(diagnostics.values().all(|d| d.is_empty()));

    let AssetGraphNode::Asset(lib_node) = graph.get_node(lib).unwrap() else {
        panic!("expected asset");
    };
    assert!(lib_node.used_symbols.contains(&used));
    assert!(!lib_node.used_symbols.contains(&unused));
}

/// An entry asset with no incoming dependencies gets treated as a runtime
/// root and keeps its whole namespace live.
#[test]
fn entry_asset_without_incoming_deps_is_treated_as_runtime_root() {
    let graph: Graph<AssetGraphNode> = Graph::new();
    let db = InMemoryDb::new();

    let root = graph.add_node(AssetGraphNode::Root(RootNode {
        content_key: "root".to_string(),
    }));
    let entry = graph.add_node(AssetGraphNode::Asset(AssetNode::new("entry.js")));
    graph.set_root_node_id(root);
    // No edge at all from root to entry: entry has zero incoming deps.

    propagate_symbols(
        &db,
        &graph,
        PropagationInput {
            changed_assets: &changed(&["entry.js"]),
            asset_groups_with_removed_parents: &FxHashSet::default(),
            previous_errors: None,
        },
        &PropagatorConfig::default(),
    )
    .unwrap();

    let AssetGraphNode::Asset(entry_node) = graph.get_node(entry).unwrap() else {
        panic!("expected asset");
    };
    assert!(entry_node.used_symbols.contains(&crate::ids::SymbolId::STAR));
}

/// `add_edge` twice for the same `(from, to, type)` is a no-op, matching
/// the underlying adjacency list's idempotence, all the way through the
/// `Graph` API.
#[test]
fn graph_add_edge_is_idempotent() {
    let graph: Graph<AssetGraphNode> = Graph::new();
    let a = graph.add_node(AssetGraphNode::Asset(AssetNode::new("a")));
    let b = graph.add_node(AssetGraphNode::Asset(AssetNode::new("b")));

    assert!(graph.add_edge(a, b, EdgeType(5)).unwrap());
    assert!(!graph.add_edge(a, b, EdgeType(5)).unwrap());
    assert_eq!(graph.get_all_edges().len(), 1);
}

/// Re-running propagation after a round trip through the wire format
/// reaches the same fixpoint as the live graph.
#[test]
fn propagation_survives_a_serialize_roundtrip() {
    let graph: Graph<AssetGraphNode> = Graph::new();
    let mut db = InMemoryDb::new();
    let bar = db.intern("bar");

    let root = graph.add_node(AssetGraphNode::Root(RootNode {
        content_key: "root".to_string(),
    }));
    let a = graph.add_node(AssetGraphNode::Asset(AssetNode::new("a.js")));
    let mut d = DependencyNode::new("d");
    d.used_symbols_down.insert(bar);
    let dep = graph.add_node(AssetGraphNode::Dependency(d));

    graph.add_edge(root, a, DEPENDS_ON).unwrap();
    graph.add_edge(a, dep, DEPENDS_ON).unwrap();
    graph.set_root_node_id(root);
    db.insert_asset(
        "a.js",
        AssetRecord {
            symbols: Some(vec![DeclaredSymbol { exported: bar, local: bar, is_weak: false, loc: None }]),
            file_path: "a.js".to_string(),
            side_effects: false,
            bundle_behavior: Default::default(),
        },
    );
    db.insert_dependency(
        "d",
        DependencyRecord {
            symbols: Some(vec![]),
            specifier: "./a".to_string(),
            source_asset_id: None,
        },
    );

    propagate_symbols(
        &db,
        &graph,
        PropagationInput {
            changed_assets: &changed(&["a.js"]),
            asset_groups_with_removed_parents: &FxHashSet::default(),
            previous_errors: None,
        },
        &PropagatorConfig::default(),
    )
    .unwrap();

    let snapshot = graph.serialize();
    let restored: Graph<AssetGraphNode> = Graph::deserialize(&snapshot).unwrap();

    assert_eq!(
        restored.get_node(a).unwrap(),
        graph.get_node(a).unwrap(),
        "restored asset state must match the live graph after propagation"
    );
}
