use serde::{Deserialize, Serialize};

use crate::error::GraphError;
use crate::ids::{EdgeType, EdgeTypeSpec};

use super::*;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct TestNode {
    key: String,
}

impl TestNode {
    fn new(key: &str) -> Self {
        Self { key: key.to_string() }
    }
}

impl NodePayload for TestNode {
    fn content_key(&self) -> &ContentKey {
        &self.key
    }
}

const EDGE: EdgeType = EdgeType(1);
const OTHER_EDGE: EdgeType = EdgeType(2);

fn chain(graph: &Graph<TestNode>, keys: &[&str]) -> Vec<NodeId> {
    let ids: Vec<NodeId> = keys.iter().map(|k| graph.add_node(TestNode::new(k))).collect();
    for pair in ids.windows(2) {
        graph.add_edge(pair[0], pair[1], EDGE).unwrap();
    }
    ids
}

#[test]
fn add_node_indexes_by_content_key() {
    let graph: Graph<TestNode> = Graph::new();
    let id = graph.add_node(TestNode::new("a.js"));
    assert_eq!(graph.node_id_for_content_key("a.js"), Some(id));
    assert_eq!(graph.get_node(id).unwrap().key, "a.js");
}

#[test]
fn update_node_reindexes_content_key() {
    let graph: Graph<TestNode> = Graph::new();
    let id = graph.add_node(TestNode::new("a.js"));
    graph.update_node(id, TestNode::new("b.js")).unwrap();
    assert_eq!(graph.node_id_for_content_key("a.js"), None);
    assert_eq!(graph.node_id_for_content_key("b.js"), Some(id));
}

#[test]
fn update_node_missing_id_fails() {
    let graph: Graph<TestNode> = Graph::new();
    let bogus = NodeId(999);
    assert!(matches!(
        graph.update_node(bogus, TestNode::new("x")),
        Err(GraphError::NodeNotFound(_))
    ));
}

#[test]
fn add_edge_and_has_edge() {
    let graph: Graph<TestNode> = Graph::new();
    let ids = chain(&graph, &["a", "b"]);
    assert!(graph.has_edge(ids[0], ids[1], EDGE));
    assert!(!graph.has_edge(ids[0], ids[1], OTHER_EDGE));
}

#[test]
fn remove_edge_without_orphan_pruning_keeps_target() {
    let graph: Graph<TestNode> = Graph::new();
    let ids = chain(&graph, &["a", "b"]);
    graph.set_root_node_id(ids[0]);
    graph.remove_edge(ids[0], ids[1], EDGE, false).unwrap();
    assert!(graph.has_node(ids[1]));
}

#[test]
fn remove_edge_with_orphan_pruning_cascades() {
    // a -> b -> c, rooted at a; severing a->b orphans both b and c.
    let graph: Graph<TestNode> = Graph::new();
    let ids = chain(&graph, &["a", "b", "c"]);
    graph.set_root_node_id(ids[0]);

    graph.remove_edge(ids[0], ids[1], EDGE, true).unwrap();

    assert!(graph.has_node(ids[0]));
    assert!(!graph.has_node(ids[1]));
    assert!(!graph.has_node(ids[2]));
}

#[test]
fn remove_node_clears_all_incident_edges() {
    let graph: Graph<TestNode> = Graph::new();
    let ids = chain(&graph, &["a", "b", "c"]);
    graph.add_edge(ids[2], ids[0], OTHER_EDGE).unwrap();

    graph.remove_node(ids[1]).unwrap();

    assert!(graph.get_all_edges().iter().all(|(f, t, _)| *f != ids[1] && *t != ids[1]));
}

#[test]
fn remove_node_self_loop_does_not_recurse_infinitely() {
    let graph: Graph<TestNode> = Graph::new();
    let a = graph.add_node(TestNode::new("a"));
    graph.add_edge(a, a, EDGE).unwrap();
    graph.remove_node(a).unwrap();
    assert!(!graph.has_node(a));
}

#[test]
fn remove_node_clears_root() {
    let graph: Graph<TestNode> = Graph::new();
    let a = graph.add_node(TestNode::new("a"));
    graph.set_root_node_id(a);
    graph.remove_node(a).unwrap();
    assert_eq!(graph.root_node_id(), None);
}

#[test]
fn is_orphaned_node_without_root_checks_inbound_edges() {
    let graph: Graph<TestNode> = Graph::new();
    let ids = chain(&graph, &["a", "b"]);
    assert!(graph.is_orphaned_node(ids[0]));
    assert!(!graph.is_orphaned_node(ids[1]));
}

#[test]
fn is_orphaned_node_with_root_checks_reachability() {
    let graph: Graph<TestNode> = Graph::new();
    let a = graph.add_node(TestNode::new("a"));
    let b = graph.add_node(TestNode::new("b"));
    let detached = graph.add_node(TestNode::new("detached"));
    graph.add_edge(a, b, EDGE).unwrap();
    graph.set_root_node_id(a);

    assert!(!graph.is_orphaned_node(b));
    assert!(graph.is_orphaned_node(detached));
    assert!(!graph.is_orphaned_node(a), "root is never orphaned");
}

#[test]
fn replace_node_ids_connected_to_applies_set_semantics() {
    let graph: Graph<TestNode> = Graph::new();
    let a = graph.add_node(TestNode::new("a"));
    let b = graph.add_node(TestNode::new("b"));
    let c = graph.add_node(TestNode::new("c"));
    let d = graph.add_node(TestNode::new("d"));
    graph.add_edge(a, b, EDGE).unwrap();
    graph.add_edge(a, c, EDGE).unwrap();

    graph
        .replace_node_ids_connected_to(a, vec![c, d], None, EDGE)
        .unwrap();

    let connected = graph.get_node_ids_connected_from(a, EdgeTypeSpec::Single(EDGE));
    assert_eq!(connected.len(), 2);
    assert!(connected.contains(&c));
    assert!(connected.contains(&d));
    assert!(!connected.contains(&b));
}

#[test]
fn dfs_visits_preorder_and_tracks_context() {
    let graph: Graph<TestNode> = Graph::new();
    let ids = chain(&graph, &["a", "b", "c"]);
    graph.set_root_node_id(ids[0]);

    let order = std::cell::RefCell::new(Vec::new());
    let graph_for_children = graph.clone();
    graph
        .dfs(DfsOptions {
            start_node_id: None,
            initial_context: 0u32,
            get_children: Box::new(move |n| {
                graph_for_children.get_node_ids_connected_from(n, EdgeTypeSpec::All)
            }),
            visitor: Visitor::enter(|id, _payload, parent_depth, _actions| {
                order.borrow_mut().push(id);
                *parent_depth + 1
            }),
        })
        .unwrap();

    assert_eq!(*order.borrow(), ids);
}

#[test]
fn dfs_stop_aborts_remaining_traversal() {
    let graph: Graph<TestNode> = Graph::new();
    let ids = chain(&graph, &["a", "b", "c"]);
    graph.set_root_node_id(ids[0]);

    let mut visited = Vec::new();
    graph
        .traverse(None, EdgeTypeSpec::All, |id, _payload, actions| {
            visited.push(id);
            if id == ids[1] {
                actions.stop();
            }
        })
        .unwrap();

    assert_eq!(visited, vec![ids[0], ids[1]]);
}

#[test]
fn dfs_skip_children_elides_subtree_but_still_exits() {
    let graph: Graph<TestNode> = Graph::new();
    let ids = chain(&graph, &["a", "b", "c"]);
    graph.set_root_node_id(ids[0]);

    let entered = std::cell::RefCell::new(Vec::new());
    let exited = std::cell::RefCell::new(Vec::new());
    let graph_for_children = graph.clone();
    graph
        .dfs(DfsOptions {
            start_node_id: None,
            initial_context: (),
            get_children: Box::new(move |n| {
                graph_for_children.get_node_ids_connected_from(n, EdgeTypeSpec::All)
            }),
            visitor: Visitor {
                enter: Box::new(|id, _payload, _ctx, actions| {
                    entered.borrow_mut().push(id);
                    if id == ids[1] {
                        actions.skip_children();
                    }
                }),
                exit: Some(Box::new(|id, _payload, _ctx| {
                    exited.borrow_mut().push(id);
                })),
            },
        })
        .unwrap();

    assert_eq!(*entered.borrow(), vec![ids[0], ids[1]]);
    assert_eq!(*exited.borrow(), vec![ids[1], ids[0]]);
}

#[test]
fn traverse_ancestors_walks_inbound_edges() {
    let graph: Graph<TestNode> = Graph::new();
    let ids = chain(&graph, &["a", "b", "c"]);

    let mut visited = Vec::new();
    graph
        .traverse_ancestors(ids[2], EdgeTypeSpec::All, |id, _payload, _actions| {
            visited.push(id);
        })
        .unwrap();

    assert_eq!(visited, vec![ids[2], ids[1], ids[0]]);
}

#[test]
fn bfs_returns_first_matching_node_not_a_fixed_variable() {
    let graph: Graph<TestNode> = Graph::new();
    let a = graph.add_node(TestNode::new("a"));
    let b = graph.add_node(TestNode::new("b"));
    let c = graph.add_node(TestNode::new("c"));
    graph.add_edge(a, b, EDGE).unwrap();
    graph.add_edge(a, c, EDGE).unwrap();
    graph.set_root_node_id(a);

    let found = graph.bfs(|id, _payload| id == c).unwrap();
    assert_eq!(found, Some(c));
}

#[test]
fn find_descendant_and_find_descendants() {
    let graph: Graph<TestNode> = Graph::new();
    let ids = chain(&graph, &["a", "b", "c"]);

    let first = graph.find_descendant(ids[0], |_id, n| n.key == "c").unwrap();
    assert_eq!(first, Some(ids[2]));

    let all = graph.find_descendants(ids[0], |_id, _n| true).unwrap();
    assert_eq!(all, vec![ids[1], ids[2]]);
}

#[test]
fn find_ancestor_and_find_ancestors() {
    let graph: Graph<TestNode> = Graph::new();
    let ids = chain(&graph, &["a", "b", "c"]);

    let first = graph.find_ancestor(ids[2], |_id, n| n.key == "a").unwrap();
    assert_eq!(first, Some(ids[0]));

    let all = graph.find_ancestors(ids[2], |_id, _n| true).unwrap();
    assert_eq!(all, vec![ids[1], ids[0]]);
}

#[test]
fn dfs_without_start_or_root_fails() {
    let graph: Graph<TestNode> = Graph::new();
    graph.add_node(TestNode::new("a"));
    let graph_for_children = graph.clone();
    let result = graph.dfs(DfsOptions {
        start_node_id: None,
        initial_context: (),
        get_children: Box::new(move |n| graph_for_children.get_node_ids_connected_from(n, EdgeTypeSpec::All)),
        visitor: Visitor::enter(|_id, _payload, _ctx, _actions| {}),
    });
    assert!(matches!(result, Err(GraphError::NoRootOrStart)));
}

#[test]
fn serialize_deserialize_round_trip() {
    let graph: Graph<TestNode> = Graph::new();
    let ids = chain(&graph, &["a", "b", "c"]);
    graph.add_edge(ids[2], ids[0], OTHER_EDGE).unwrap();
    graph.set_root_node_id(ids[0]);

    let snapshot = graph.serialize();
    let restored: Graph<TestNode> = Graph::deserialize(&snapshot).unwrap();

    assert_eq!(restored.root_node_id(), graph.root_node_id());
    assert_eq!(restored.len(), graph.len());
    let mut original_edges = graph.get_all_edges();
    let mut restored_edges = restored.get_all_edges();
    original_edges.sort();
    restored_edges.sort();
    assert_eq!(original_edges, restored_edges);
    for id in &ids {
        assert_eq!(restored.get_node(*id).unwrap(), graph.get_node(*id).unwrap());
    }
}
