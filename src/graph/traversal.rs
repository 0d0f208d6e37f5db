//! DFS/BFS traversals with enter/exit visitors and skip/stop actions.

use rustc_hash::FxHashSet as HashSet;
use std::collections::VecDeque;

use crate::error::{GraphError, Result};
use crate::ids::{EdgeTypeSpec, NodeId};

use super::{Graph, NodePayload};

/// Handle a `dfs` visitor uses to control the remainder of the traversal.
///
/// `stop()` aborts the whole traversal immediately - no pending `exit`
/// callbacks on the stack are invoked. `skip_children()` only affects the
/// node currently being entered: its subtree is not descended into, but
/// its own `exit` callback still runs.
#[derive(Debug, Default)]
pub struct Actions {
    stop: bool,
    skip_children: bool,
}

impl Actions {
    fn reset(&mut self) {
        self.skip_children = false;
    }

    /// Abort the entire traversal after the current `enter` call returns.
    pub fn stop(&mut self) {
        self.stop = true;
    }

    /// Skip the subtree of the node currently being entered.
    pub fn skip_children(&mut self) {
        self.skip_children = true;
    }
}

/// Pre/post-order callbacks for a [`Graph::dfs`] traversal.
///
/// Modelled as a small product type rather than a trait so that callers
/// can supply only the half they need - most traversals only need `enter`.
pub struct Visitor<'a, TNode, C> {
    /// Called on pre-order entry. Receives the context propagated down
    /// from the parent (or the traversal's initial context, for the
    /// start node) and returns the context to propagate to this node's
    /// children and to its own `exit` call.
    pub enter: Box<dyn FnMut(NodeId, &TNode, &C, &mut Actions) -> C + 'a>,
    /// Called on post-order exit, with the context this node's `enter`
    /// returned. Still called for a node whose subtree was skipped via
    /// `Actions::skip_children`, since skipping only elides descending
    /// into children, not the skipped node's own exit.
    pub exit: Option<Box<dyn FnMut(NodeId, &TNode, &C) + 'a>>,
}

impl<'a, TNode, C> Visitor<'a, TNode, C> {
    /// Construct a visitor with only an `enter` callback.
    pub fn enter(f: impl FnMut(NodeId, &TNode, &C, &mut Actions) -> C + 'a) -> Self {
        Self {
            enter: Box::new(f),
            exit: None,
        }
    }
}

/// Parameters for a [`Graph::dfs`] call.
pub struct DfsOptions<'a, TNode, C> {
    /// Node to start from; defaults to the graph's root if `None`.
    pub start_node_id: Option<NodeId>,
    /// Context passed to the start node's `enter` call.
    pub initial_context: C,
    /// Computes the children of a node to descend into, in the order they
    /// should be visited.
    pub get_children: Box<dyn Fn(NodeId) -> Vec<NodeId> + 'a>,
    pub visitor: Visitor<'a, TNode, C>,
}

struct StackFrame<C> {
    node: NodeId,
    context: C,
    children: std::vec::IntoIter<NodeId>,
}

impl<TNode: Clone + NodePayload> Graph<TNode> {
    /// Pre-order depth-first traversal with an optional post-order `exit`,
    /// context propagation, and `stop`/`skip_children` control.
    ///
    /// Iterative (an explicit stack, not recursion) so it scales to large
    /// graphs. `start_node_id` defaults to the graph's root; if neither is
    /// set, fails with [`GraphError::NoRootOrStart`].
    pub fn dfs<C: Clone>(&self, mut opts: DfsOptions<TNode, C>) -> Result<Option<C>> {
        let start = opts
            .start_node_id
            .or_else(|| self.root_node_id())
            .ok_or(GraphError::NoRootOrStart)?;

        let mut visited = HashSet::default();
        let mut actions = Actions::default();
        let mut last_context: Option<C> = None;
        let mut stack: Vec<StackFrame<C>> = Vec::new();

        visited.insert(start);
        let payload = self.get_node(start)?;
        actions.reset();
        let ctx = (opts.visitor.enter)(start, &payload, &opts.initial_context, &mut actions);
        last_context = Some(ctx.clone());

        if actions.stop {
            return Ok(last_context);
        }
        if actions.skip_children {
            if let Some(exit) = opts.visitor.exit.as_mut() {
                exit(start, &payload, &ctx);
            }
            return Ok(last_context);
        }
        let children = (opts.get_children)(start);
        stack.push(StackFrame {
            node: start,
            context: ctx,
            children: children.into_iter(),
        });

        'walk: loop {
            let Some(top) = stack.len().checked_sub(1) else {
                break;
            };
            let next_child = stack[top].children.next();
            match next_child {
                Some(child) => {
                    if visited.contains(&child) {
                        continue 'walk;
                    }
                    visited.insert(child);
                    let child_payload = self.get_node(child)?;
                    let parent_ctx = stack[top].context.clone();
                    actions.reset();
                    let child_ctx =
                        (opts.visitor.enter)(child, &child_payload, &parent_ctx, &mut actions);
                    last_context = Some(child_ctx.clone());

                    if actions.stop {
                        break 'walk;
                    }
                    if actions.skip_children {
                        if let Some(exit) = opts.visitor.exit.as_mut() {
                            exit(child, &child_payload, &child_ctx);
                        }
                        continue 'walk;
                    }
                    let grandchildren = (opts.get_children)(child);
                    stack.push(StackFrame {
                        node: child,
                        context: child_ctx,
                        children: grandchildren.into_iter(),
                    });
                }
                None => {
                    let frame = stack.pop().expect("top frame exists");
                    if let Some(exit) = opts.visitor.exit.as_mut() {
                        let payload = self.get_node(frame.node)?;
                        exit(frame.node, &payload, &frame.context);
                    }
                }
            }
        }

        Ok(last_context)
    }

    /// Forward DFS: children are outbound neighbours of `typeSpec`.
    pub fn traverse(
        &self,
        start: Option<NodeId>,
        types: EdgeTypeSpec,
        mut visit: impl FnMut(NodeId, &TNode, &mut Actions),
    ) -> Result<()> {
        let graph = self.clone();
        let types_cloned = types.clone();
        self.dfs(DfsOptions {
            start_node_id: start,
            initial_context: (),
            get_children: Box::new(move |n| graph.get_node_ids_connected_from(n, types_cloned.clone())),
            visitor: Visitor::enter(move |id, payload, _ctx, actions| visit(id, payload, actions)),
        })?;
        Ok(())
    }

    /// Backward DFS: children are inbound neighbours of `typeSpec`.
    pub fn traverse_ancestors(
        &self,
        start: NodeId,
        types: EdgeTypeSpec,
        mut visit: impl FnMut(NodeId, &TNode, &mut Actions),
    ) -> Result<()> {
        let graph = self.clone();
        let types_cloned = types.clone();
        self.dfs(DfsOptions {
            start_node_id: Some(start),
            initial_context: (),
            get_children: Box::new(move |n| graph.get_node_ids_connected_to(n, types_cloned.clone())),
            visitor: Visitor::enter(move |id, payload, _ctx, actions| visit(id, payload, actions)),
        })?;
        Ok(())
    }

    /// Queue-based forward BFS from the root. Returns the first node for
    /// which `visit` returns `true`.
    pub fn bfs(&self, mut visit: impl FnMut(NodeId, &TNode) -> bool) -> Result<Option<NodeId>> {
        let root = self.root_node_id().ok_or(GraphError::NoRootOrStart)?;
        let mut visited = HashSet::default();
        let mut queue = VecDeque::new();
        queue.push_back(root);
        visited.insert(root);

        while let Some(current) = queue.pop_front() {
            let payload = self.get_node(current)?;
            if visit(current, &payload) {
                return Ok(Some(current));
            }
            for next in self.get_node_ids_connected_from(current, EdgeTypeSpec::All) {
                if visited.insert(next) {
                    queue.push_back(next);
                }
            }
        }
        Ok(None)
    }

    /// First ancestor (via `traverse_ancestors`) matching `predicate`.
    pub fn find_ancestor(
        &self,
        start: NodeId,
        mut predicate: impl FnMut(NodeId, &TNode) -> bool,
    ) -> Result<Option<NodeId>> {
        let mut found = None;
        self.traverse_ancestors(start, EdgeTypeSpec::All, |id, payload, actions| {
            if id != start && predicate(id, payload) {
                found = Some(id);
                actions.stop();
            }
        })?;
        Ok(found)
    }

    /// Every ancestor matching `predicate`, collected in traversal order.
    pub fn find_ancestors(
        &self,
        start: NodeId,
        mut predicate: impl FnMut(NodeId, &TNode) -> bool,
    ) -> Result<Vec<NodeId>> {
        let mut found = Vec::new();
        self.traverse_ancestors(start, EdgeTypeSpec::All, |id, payload, _actions| {
            if id != start && predicate(id, payload) {
                found.push(id);
            }
        })?;
        Ok(found)
    }

    /// First descendant (via `traverse`) matching `predicate`.
    pub fn find_descendant(
        &self,
        start: NodeId,
        mut predicate: impl FnMut(NodeId, &TNode) -> bool,
    ) -> Result<Option<NodeId>> {
        let mut found = None;
        self.traverse(Some(start), EdgeTypeSpec::All, |id, payload, actions| {
            if id != start && predicate(id, payload) {
                found = Some(id);
                actions.stop();
            }
        })?;
        Ok(found)
    }

    /// Every descendant matching `predicate`, collected in traversal order.
    pub fn find_descendants(
        &self,
        start: NodeId,
        mut predicate: impl FnMut(NodeId, &TNode) -> bool,
    ) -> Result<Vec<NodeId>> {
        let mut found = Vec::new();
        self.traverse(Some(start), EdgeTypeSpec::All, |id, payload, _actions| {
            if id != start && predicate(id, payload) {
                found.push(id);
            }
        })?;
        Ok(found)
    }
}
