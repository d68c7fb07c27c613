use std::cmp::Reverse;
use std::collections::BinaryHeap;

use chp_core::graph::INFINITY;
use chp_core::{
    Graph,
    NodeId,
    Weight,
};
use ordered_float::OrderedFloat;
use tracing::trace;

use super::contractor::NodeState;

/// Input of a single witness search.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WitnessQuery {
    /// Tail of the candidate shortcut.
    pub from: NodeId,
    /// Head of the candidate shortcut.
    pub to: NodeId,
    /// Length of the path through the node being contracted.
    pub via_len: Weight,
    /// Number of node expansions after which the search gives up.
    pub max_expand: u32,
}

/// Result of a witness search.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WitnessOutcome {
    /// Shortest `from -> to` distance found avoiding excluded nodes; [`INFINITY`] if none.
    ///
    /// Only an upper bound when the search stopped early.
    pub distance: Weight,
    /// Nodes expanded by the search, over both directions.
    pub expanded: u32,
}

impl WitnessOutcome {
    /// True if the search proved a path no longer than `via_len` that avoids the excluded nodes.
    #[must_use]
    pub fn is_witness_for(&self, via_len: Weight) -> bool {
        self.distance <= via_len
    }
}

/// Decides whether a shortcut is needed by looking for a short enough path that avoids every node
/// whose state is not [`NodeState::Uncontracted`].
///
/// Implementations may stop early, but must never report a distance that is not the length of an
/// actual path: a missed witness costs an extra shortcut, an invented one breaks the hierarchy.
#[cfg_attr(any(test, feature = "testutils"), mockall::automock)]
pub trait WitnessSearch {
    /// Run one query against the current graph.
    fn search(&mut self, g: &Graph, states: &[NodeState], query: WitnessQuery) -> WitnessOutcome;
}

/// Bidirectional Dijkstra (A* with a zero heuristic) restricted to uncontracted nodes.
///
/// Stops as soon as a witness is found, as soon as no path of at most `via_len` can be found any
/// more, or once the expansion budget is spent. Scratch space is kept between searches and reset
/// lazily.
#[derive(Debug, Default)]
pub struct BidirectionalWitness {
    forward: SearchSpace,
    backward: SearchSpace,
}

impl BidirectionalWitness {
    /// A searcher with empty scratch space.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl WitnessSearch for BidirectionalWitness {
    fn search(&mut self, g: &Graph, states: &[NodeState], query: WitnessQuery) -> WitnessOutcome {
        let zero = OrderedFloat(0.0);
        self.forward.reset(g.num_nodes());
        self.backward.reset(g.num_nodes());

        if query.from == query.to {
            return WitnessOutcome { distance: zero, expanded: 0 };
        }

        self.forward.relax(query.from, zero);
        self.backward.relax(query.to, zero);

        let mut best = INFINITY;
        let mut expanded = 0;
        loop {
            if best <= query.via_len {
                break;
            }

            // nothing left to discover can be shorter than this
            let (fmin, bmin) = (self.forward.min_key(), self.backward.min_key());
            let bound = fmin + bmin;
            if bound >= best || bound > query.via_len {
                break;
            }

            if expanded >= query.max_expand {
                trace!(from = query.from, to = query.to, expanded, "witness search budget exhausted");
                break;
            }

            let forward = fmin <= bmin;
            let (this, other) =
                if forward { (&mut self.forward, &self.backward) } else { (&mut self.backward, &self.forward) };
            let Some((dist, node)) = this.pop() else { break };
            expanded += 1;

            let node = g.node(node);
            let adjacent = if forward { node.outgoing() } else { node.incoming() };
            for e in adjacent {
                if states[e.node_id as usize] != NodeState::Uncontracted {
                    continue;
                }
                let tentative = dist + e.wt;
                this.relax(e.node_id, tentative);
                best = best.min(tentative + other.label(e.node_id));
            }
        }

        WitnessOutcome { distance: best, expanded }
    }
}

/// One direction's labels and queue.
#[derive(Debug, Default)]
struct SearchSpace {
    dist: Vec<Weight>,
    touched: Vec<NodeId>,
    open: BinaryHeap<Reverse<(Weight, NodeId)>>,
}

impl SearchSpace {
    fn reset(&mut self, num_nodes: usize) {
        if self.dist.len() == num_nodes {
            for n in self.touched.drain(..) {
                self.dist[n as usize] = INFINITY;
            }
        } else {
            self.dist = vec![INFINITY; num_nodes];
            self.touched.clear();
        }
        self.open.clear();
    }

    fn label(&self, node: NodeId) -> Weight {
        self.dist[node as usize]
    }

    fn relax(&mut self, node: NodeId, dist: Weight) {
        let label = &mut self.dist[node as usize];
        if dist < *label {
            if *label == INFINITY {
                self.touched.push(node);
            }
            *label = dist;
            self.open.push(Reverse((dist, node)));
        }
    }

    fn min_key(&self) -> Weight {
        self.open.peek().map_or(INFINITY, |Reverse((d, _))| *d)
    }

    /// Pop the closest node, skipping entries superseded by a later decrease.
    fn pop(&mut self) -> Option<(Weight, NodeId)> {
        while let Some(Reverse((d, n))) = self.open.pop() {
            if d <= self.dist[n as usize] {
                return Some((d, n));
            }
        }
        None
    }
}
