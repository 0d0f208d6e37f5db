//! Property-based tests for the invariants a correctly-driven `Graph`
//! must never violate, run over randomly generated edge-mutation
//! sequences.
//!
//! Run with: cargo test --features proptest property_tests

#![cfg(feature = "proptest")]

use proptest::prelude::*;

use crate::graph::NodePayload;
use crate::ids::{ContentKey, EdgeType, EdgeTypeSpec};
use crate::Graph;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Node(ContentKey);

impl NodePayload for Node {
    fn content_key(&self) -> &ContentKey {
        &self.0
    }
}

#[derive(Debug, Clone)]
enum Op {
    AddEdge(usize, usize, u16),
    RemoveEdge(usize, usize, u16),
}

fn op_strategy(node_count: usize) -> impl Strategy<Value = Op> {
    let idx = 0..node_count;
    prop_oneof![
        (idx.clone(), idx.clone(), 1u16..4).prop_map(|(f, t, ty)| Op::AddEdge(f, t, ty)),
        (idx.clone(), idx, 1u16..4).prop_map(|(f, t, ty)| Op::RemoveEdge(f, t, ty)),
    ]
}

fn ops_strategy() -> impl Strategy<Value = (usize, Vec<Op>)> {
    (2usize..8).prop_flat_map(|n| (Just(n), prop::collection::vec(op_strategy(n), 0..40)))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Property: bidirectional consistency.
    /// ∀ (from, to, ty) live: to ∈ connected_from(from, ty) ⟺ from ∈ connected_to(to, ty)
    #[test]
    fn prop_bidirectional_consistency((node_count, ops) in ops_strategy()) {
        let graph: Graph<Node> = Graph::new();
        let ids: Vec<_> = (0..node_count).map(|i| graph.add_node(Node(format!("n{i}")))).collect();

        for op in ops {
            match op {
                Op::AddEdge(f, t, ty) => {
                    let _ = graph.add_edge(ids[f], ids[t], EdgeType(ty));
                }
                Op::RemoveEdge(f, t, ty) => {
                    let _ = graph.remove_edge(ids[f], ids[t], EdgeType(ty), false);
                }
            }
        }

        for (from, to, ty) in graph.get_all_edges() {
            let forward = graph.get_node_ids_connected_from(from, EdgeTypeSpec::Single(ty));
            let backward = graph.get_node_ids_connected_to(to, EdgeTypeSpec::Single(ty));
            prop_assert!(forward.contains(&to), "edge not visible from its source's outbound list");
            prop_assert!(backward.contains(&from), "edge not visible from its target's inbound list");
        }
    }

    /// Property: no duplicate `(from, to, type)` triples survive any
    /// sequence of add/remove, regardless of how many times the same
    /// triple is inserted.
    #[test]
    fn prop_no_duplicate_edges((node_count, ops) in ops_strategy()) {
        let graph: Graph<Node> = Graph::new();
        let ids: Vec<_> = (0..node_count).map(|i| graph.add_node(Node(format!("n{i}")))).collect();

        for op in ops {
            match op {
                Op::AddEdge(f, t, ty) => {
                    let _ = graph.add_edge(ids[f], ids[t], EdgeType(ty));
                }
                Op::RemoveEdge(f, t, ty) => {
                    let _ = graph.remove_edge(ids[f], ids[t], EdgeType(ty), false);
                }
            }
        }

        let mut edges = graph.get_all_edges();
        let before = edges.len();
        edges.sort();
        edges.dedup();
        prop_assert_eq!(before, edges.len());
    }

    /// Property: removing a node clears every edge that mentions it.
    #[test]
    fn prop_remove_node_clears_incident_edges((node_count, ops) in ops_strategy()) {
        let graph: Graph<Node> = Graph::new();
        let ids: Vec<_> = (0..node_count).map(|i| graph.add_node(Node(format!("n{i}")))).collect();

        for op in ops {
            match op {
                Op::AddEdge(f, t, ty) => {
                    let _ = graph.add_edge(ids[f], ids[t], EdgeType(ty));
                }
                Op::RemoveEdge(f, t, ty) => {
                    let _ = graph.remove_edge(ids[f], ids[t], EdgeType(ty), false);
                }
            }
        }

        let victim = ids[0];
        if graph.has_node(victim) {
            let _ = graph.remove_node(victim);
            prop_assert!(graph.get_all_edges().iter().all(|(f, t, _)| *f != victim && *t != victim));
        }
    }
}
