//! The contraction hierarchy dataset handed from one preprocessing stage to the next.

use serde::Serialize;

use crate::graph::{
    Edge,
    Graph,
    NodeId,
};

/// Which edges a bidirectional search may follow out of a node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum SearchDirection {
    /// Edges towards nodes of equal or higher rank.
    Up,
    /// Edges towards nodes of strictly lower rank.
    Down,
    /// Every edge.
    Any,
}

/// A graph together with its contraction ranks and per-node up-degrees.
///
/// The contractor fills `level`, the successor sorter fills `up_degree` and reorders each outgoing
/// list so that the first `up_degree[n]` edges of `n` are its up edges.
#[derive(Clone, Debug)]
pub struct ChData {
    /// The graph, including inserted shortcuts.
    pub graph: Graph,
    /// `level[n]` is the position of `n` in the contraction order.
    pub level: Vec<u32>,
    /// `up_degree[n]` is the length of `n`'s up-edge prefix.
    pub up_degree: Vec<u32>,
}

impl ChData {
    /// Wrap `graph`; ranks and up-degrees start zeroed.
    #[must_use]
    pub fn new(graph: Graph) -> Self {
        let n = graph.num_nodes();
        Self { graph, level: vec![0; n], up_degree: vec![0; n] }
    }

    /// Number of nodes.
    #[must_use]
    pub fn num_nodes(&self) -> usize {
        self.graph.num_nodes()
    }

    /// True if `from -> to` leads up the hierarchy.
    #[must_use]
    pub fn is_up(&self, from: NodeId, to: NodeId) -> bool {
        self.level[to as usize] >= self.level[from as usize]
    }

    /// Outgoing edges of `node` in `direction`.
    ///
    /// Only meaningful once successors are sorted; before that the up/down prefix is not
    /// established.
    #[must_use]
    pub fn edges(&self, node: NodeId, direction: SearchDirection) -> &[Edge] {
        let outgoing = self.graph.node(node).outgoing();
        let split = (self.up_degree[node as usize] as usize).min(outgoing.len());
        match direction {
            SearchDirection::Up => &outgoing[..split],
            SearchDirection::Down => &outgoing[split..],
            SearchDirection::Any => outgoing,
        }
    }

    /// Number of shortcut edges in the graph.
    #[must_use]
    pub fn num_shortcuts(&self) -> usize {
        self.graph.shortcuts().count()
    }
}

#[cfg(test)]
mod tests;
