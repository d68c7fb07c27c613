//! Weighted directed graph with mirrored adjacency lists.
//!
//! Every node stores an ordered list of outgoing edges and an ordered list of incoming edges. An
//! outgoing edge `u -> v` is always mirrored by an incoming entry at `v` pointing back to `u` with
//! the same weight and kind; every mutation below keeps the two lists in sync.
//!
//! Edges are addressed by [`EdgeHandle`]s, which are plain `(node, slot)` indices into a node's
//! outgoing list. Deleting an outgoing edge compacts that list, so every handle on the same node
//! with a higher slot is stale afterwards. Reordering a node's successors (see
//! [`Graph::sort_outgoing_by_key`]) invalidates all of that node's handles.

use ordered_float::OrderedFloat;
use petgraph::graph::DiGraph;
use serde::Serialize;

/// Dense node identifier in `0..num_nodes`.
pub type NodeId = u32;

/// Edge weight. Non-negative; compared and summed exactly.
pub type Weight = OrderedFloat<f64>;

/// Distance label for unreachable nodes.
pub const INFINITY: Weight = OrderedFloat(f64::INFINITY);

/// Whether an edge comes from the input graph or was inserted by contraction.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum EdgeKind {
    /// An edge of the input graph.
    Original,
    /// A shortcut bypassing `via`, inserted when `via` was contracted.
    Shortcut {
        /// The contracted node the shortcut bypasses.
        via: NodeId,
    },
}

/// One adjacency entry. In an outgoing list `node_id` is the head, in an incoming list the tail.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub struct Edge {
    /// The node at the other end of the edge.
    pub node_id: NodeId,
    /// Edge weight.
    pub wt: Weight,
    /// Original edge or shortcut.
    pub kind: EdgeKind,
}

impl Edge {
    /// An original edge towards `node_id`.
    #[must_use]
    pub fn new(node_id: NodeId, wt: impl Into<Weight>) -> Self {
        Self { node_id, wt: wt.into(), kind: EdgeKind::Original }
    }

    /// A shortcut edge towards `node_id` bypassing `via`.
    #[must_use]
    pub fn shortcut(node_id: NodeId, wt: impl Into<Weight>, via: NodeId) -> Self {
        Self { node_id, wt: wt.into(), kind: EdgeKind::Shortcut { via } }
    }

    /// True if the edge was inserted by contraction.
    #[must_use]
    pub const fn is_shortcut(&self) -> bool {
        matches!(self.kind, EdgeKind::Shortcut { .. })
    }
}

/// Index-based handle to an outgoing edge: slot `slot` of `node`'s outgoing list.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct EdgeHandle {
    /// Tail of the edge.
    pub node: NodeId,
    /// Position in the tail's outgoing list.
    pub slot: usize,
}

impl EdgeHandle {
    /// Handle to slot `slot` of `node`.
    #[must_use]
    pub const fn new(node: NodeId, slot: usize) -> Self {
        Self { node, slot }
    }
}

/// Outcome of [`Graph::insert_or_decrease_shortcut`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShortcutResult {
    /// No usable edge existed; a shortcut was appended.
    NewShortcut,
    /// An existing shortcut was heavier and has been shortened.
    ShortenedExisting,
    /// An edge at least as short already exists; nothing changed.
    ShorterExisting,
}

/// A node's adjacency lists.
#[derive(Clone, Debug, Default)]
pub struct Node {
    outgoing: Vec<Edge>,
    incoming: Vec<Edge>,
}

impl Node {
    /// Outgoing edges, in list order.
    #[must_use]
    pub fn outgoing(&self) -> &[Edge] {
        &self.outgoing
    }

    /// Incoming edges, in list order.
    #[must_use]
    pub fn incoming(&self) -> &[Edge] {
        &self.incoming
    }

    /// Number of outgoing edges.
    #[must_use]
    pub fn out_degree(&self) -> usize {
        self.outgoing.len()
    }

    /// Number of incoming edges.
    #[must_use]
    pub fn in_degree(&self) -> usize {
        self.incoming.len()
    }

    /// Slot of the first outgoing edge towards `target`.
    #[must_use]
    pub fn find_edge(&self, target: NodeId) -> Option<usize> {
        self.find_edge_from(target, 0)
    }

    /// Slot of the first outgoing edge towards `target` at or after slot `start`.
    #[must_use]
    pub fn find_edge_from(&self, target: NodeId, start: usize) -> Option<usize> {
        self.outgoing
            .get(start..)?
            .iter()
            .position(|e| e.node_id == target)
            .map(|offset| start + offset)
    }

    /// Weight of the lightest outgoing edge towards `target`, if any.
    #[must_use]
    pub fn min_edge_weight(&self, target: NodeId) -> Option<Weight> {
        self.outgoing.iter().filter(|e| e.node_id == target).map(|e| e.wt).min()
    }
}

/// Directed weighted graph over dense node ids. Nodes are fixed at construction; only edges change.
#[derive(Clone, Debug, Default)]
pub struct Graph {
    nodes: Vec<Node>,
}

impl Graph {
    /// A graph with `num_nodes` isolated nodes.
    #[must_use]
    pub fn new(num_nodes: usize) -> Self {
        Self { nodes: vec![Node::default(); num_nodes] }
    }

    /// Build a graph from `(tail, head, weight)` triples.
    ///
    /// # Panics
    ///
    /// If an endpoint is not below `num_nodes`.
    pub fn from_edges<I, W>(num_nodes: usize, edges: I) -> Self
    where
        I: IntoIterator<Item = (NodeId, NodeId, W)>,
        W: Into<Weight>,
    {
        let mut graph = Self::new(num_nodes);
        for (tail, head, wt) in edges {
            graph.add_edge(tail, head, wt.into());
        }
        graph
    }

    /// Number of nodes.
    #[must_use]
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Number of edges, counted once (outgoing side).
    #[must_use]
    pub fn num_edges(&self) -> usize {
        self.nodes.iter().map(Node::out_degree).sum()
    }

    /// True if `id` names a node of this graph.
    #[must_use]
    pub fn contains_node(&self, id: NodeId) -> bool {
        (id as usize) < self.nodes.len()
    }

    /// The node with id `id`.
    ///
    /// # Panics
    ///
    /// If `id` is out of range.
    #[must_use]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id as usize]
    }

    /// All nodes with their ids.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        (0..).zip(self.nodes.iter())
    }

    /// The edge behind `handle`.
    ///
    /// # Panics
    ///
    /// If the handle is stale or out of range.
    #[must_use]
    pub fn edge(&self, handle: EdgeHandle) -> &Edge {
        &self.node(handle.node).outgoing[handle.slot]
    }

    /// Every shortcut as `(tail, edge)`.
    pub fn shortcuts(&self) -> impl Iterator<Item = (NodeId, &Edge)> {
        self.nodes().flat_map(|(tail, node)| node.outgoing.iter().filter(|e| e.is_shortcut()).map(move |e| (tail, e)))
    }

    /// Append an original edge `tail -> head`.
    pub fn add_edge(&mut self, tail: NodeId, head: NodeId, wt: Weight) {
        self.push_edge(tail, Edge::new(head, wt));
    }

    fn push_edge(&mut self, tail: NodeId, edge: Edge) {
        let head = edge.node_id;
        self.nodes[tail as usize].outgoing.push(edge);
        self.nodes[head as usize].incoming.push(Edge { node_id: tail, ..edge });
    }

    /// Insert the shortcut `tail -> head` bypassing `via`, or shorten an existing one.
    ///
    /// Original edges are never rewritten: if one is heavier than `wt` the shortcut is added
    /// alongside it.
    pub fn insert_or_decrease_shortcut(&mut self, tail: NodeId, head: NodeId, wt: Weight, via: NodeId) -> ShortcutResult {
        let tail_node = &self.nodes[tail as usize];
        if tail_node.min_edge_weight(head).is_some_and(|existing| existing <= wt) {
            return ShortcutResult::ShorterExisting;
        }

        let existing = tail_node.outgoing.iter().position(|e| e.node_id == head && e.is_shortcut());
        let Some(slot) = existing else {
            self.push_edge(tail, Edge::shortcut(head, wt, via));
            return ShortcutResult::NewShortcut;
        };

        let old = self.nodes[tail as usize].outgoing[slot];
        let kind = EdgeKind::Shortcut { via };
        self.nodes[tail as usize].outgoing[slot] = Edge { wt, kind, ..old };

        let mirror = self.nodes[head as usize]
            .incoming
            .iter_mut()
            .find(|e| e.node_id == tail && e.wt == old.wt && e.kind == old.kind);
        debug_assert!(mirror.is_some(), "shortcut {tail}->{head} has no incoming mirror");
        if let Some(mirror) = mirror {
            mirror.wt = wt;
            mirror.kind = kind;
        }
        ShortcutResult::ShortenedExisting
    }

    /// Delete the outgoing edge behind `handle` together with its incoming mirror.
    ///
    /// Later slots of the same node shift down by one.
    ///
    /// # Panics
    ///
    /// If the handle is stale or out of range.
    pub fn del_outgoing(&mut self, handle: EdgeHandle) -> Edge {
        let edge = self.nodes[handle.node as usize].outgoing.remove(handle.slot);

        let incoming = &mut self.nodes[edge.node_id as usize].incoming;
        let mirror = incoming
            .iter()
            .position(|e| e.node_id == handle.node && e.wt == edge.wt && e.kind == edge.kind);
        debug_assert!(mirror.is_some(), "edge {}->{} has no incoming mirror", handle.node, edge.node_id);
        if let Some(pos) = mirror {
            incoming.remove(pos);
        }
        edge
    }

    /// Stably reorder `node`'s outgoing list by `key`. Incoming lists are untouched.
    pub fn sort_outgoing_by_key<K, F>(&mut self, node: NodeId, key: F)
    where
        K: Ord,
        F: FnMut(&Edge) -> K,
    {
        self.nodes[node as usize].outgoing.sort_by_key(key);
    }

    /// Check that every outgoing edge has exactly one matching incoming entry and vice versa.
    #[must_use]
    pub fn is_symmetric(&self) -> bool {
        let mut forward: Vec<_> = self
            .nodes()
            .flat_map(|(tail, n)| n.outgoing.iter().map(move |e| (tail, e.node_id, e.wt, e.kind)))
            .collect();
        let mut backward: Vec<_> = self
            .nodes()
            .flat_map(|(head, n)| n.incoming.iter().map(move |e| (e.node_id, head, e.wt, e.kind)))
            .collect();
        forward.sort_unstable();
        backward.sort_unstable();
        forward == backward
    }

    /// Copy into a petgraph graph whose node weights are the node ids.
    #[must_use]
    pub fn to_petgraph(&self) -> DiGraph<NodeId, Edge> {
        let mut graph = DiGraph::with_capacity(self.num_nodes(), self.num_edges());
        let indices: Vec<_> = self.nodes().map(|(id, _)| graph.add_node(id)).collect();
        for (tail, node) in self.nodes() {
            for edge in &node.outgoing {
                graph.add_edge(indices[tail as usize], indices[edge.node_id as usize], *edge);
            }
        }
        graph
    }
}

#[cfg(test)]
mod tests;
