use std::cmp::Reverse;
use std::collections::BinaryHeap;

use petgraph::algo::dijkstra;
use petgraph::graph::NodeIndex;
use petgraph::visit::EdgeRef;

use crate::graph::{
    Graph,
    NodeId,
    Weight,
    INFINITY,
};
use crate::hierarchy::{
    ChData,
    SearchDirection,
};

/// Plain Dijkstra distance on `g`, computed with petgraph.
#[must_use]
pub fn reference_distance(g: &Graph, from: NodeId, to: NodeId) -> Option<Weight> {
    let pg = g.to_petgraph();
    let dist = dijkstra(&pg, NodeIndex::new(from as usize), Some(NodeIndex::new(to as usize)), |e| e.weight().wt);
    dist.get(&NodeIndex::new(to as usize)).copied()
}

/// Distances from `from` to every node; unreachable nodes get [`INFINITY`].
#[must_use]
pub fn reference_distances(g: &Graph, from: NodeId) -> Vec<Weight> {
    let pg = g.to_petgraph();
    let dist = dijkstra(&pg, NodeIndex::new(from as usize), None, |e| e.weight().wt);
    (0..g.num_nodes()).map(|n| dist.get(&NodeIndex::new(n)).copied().unwrap_or(INFINITY)).collect()
}

/// Query a fully contracted, successor-sorted hierarchy the way a query-time search would: the
/// forward search only follows up edges out of `from`, the backward search only follows incoming
/// edges from higher-ranked tails into `to`, and the two meet at the top.
#[must_use]
pub fn upward_distance(ch: &ChData, from: NodeId, to: NodeId) -> Option<Weight> {
    let forward = upward_search(ch, from, |n| {
        ch.edges(n, SearchDirection::Up).iter().map(|e| (e.node_id, e.wt)).collect()
    });
    let backward = upward_search(ch, to, |n| {
        ch.graph
            .node(n)
            .incoming()
            .iter()
            .filter(|e| ch.is_up(n, e.node_id))
            .map(|e| (e.node_id, e.wt))
            .collect()
    });

    let best = forward.iter().zip(&backward).map(|(f, b)| *f + *b).min().unwrap_or(INFINITY);
    (best < INFINITY).then_some(best)
}

fn upward_search(ch: &ChData, source: NodeId, successors: impl Fn(NodeId) -> Vec<(NodeId, Weight)>) -> Vec<Weight> {
    let mut dist = vec![INFINITY; ch.num_nodes()];
    let mut open = BinaryHeap::new();
    dist[source as usize] = Weight::from(0.0);
    open.push(Reverse((dist[source as usize], source)));

    while let Some(Reverse((d, n))) = open.pop() {
        if d > dist[n as usize] {
            continue;
        }
        for (m, wt) in successors(n) {
            let nd = d + wt;
            if nd < dist[m as usize] {
                dist[m as usize] = nd;
                open.push(Reverse((nd, m)));
            }
        }
    }
    dist
}
