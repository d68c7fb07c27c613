use std::collections::btree_map::Entry;
use std::collections::{
    BTreeMap,
    BTreeSet,
};

use chp_core::{
    Graph,
    NodeId,
};

/// Nodes reachable from `source` over outgoing edges in at most `maxdepth` hops (unbounded when
/// `None`). `source` itself is always included.
///
/// Traversal is depth-first over an explicit stack. With a depth bound a node that is first reached
/// along a long path is expanded again if a shorter path to it turns up later, so the result is the
/// same whatever order the edges are stored in, and it only grows as `maxdepth` grows.
#[must_use]
pub fn compute_closure(source: NodeId, g: &Graph, maxdepth: Option<u32>) -> BTreeSet<NodeId> {
    // node -> fewest hops it was reached with
    let mut reached = BTreeMap::new();
    let mut stack = vec![(source, 0_u32)];

    while let Some((id, depth)) = stack.pop() {
        match reached.entry(id) {
            Entry::Vacant(e) => {
                e.insert(depth);
            },
            Entry::Occupied(mut e) => {
                if maxdepth.is_none() || *e.get() <= depth {
                    continue;
                }
                e.insert(depth);
            },
        }

        if maxdepth.is_some_and(|max| depth >= max) {
            continue;
        }
        stack.extend(g.node(id).outgoing().iter().map(|e| (e.node_id, depth + 1)));
    }

    reached.into_keys().collect()
}

/// Nodes reachable from `source` using only edges that lead to a strictly lower rank.
///
/// `source` is always part of the result.
#[must_use]
pub fn compute_down_closure(source: NodeId, g: &Graph, rank: &[u32]) -> BTreeSet<NodeId> {
    let mut closure = BTreeSet::from([source]);
    let mut stack = vec![source];

    while let Some(top) = stack.pop() {
        let top_rank = rank[top as usize];
        for e in g.node(top).outgoing() {
            if rank[e.node_id as usize] < top_rank && closure.insert(e.node_id) {
                stack.push(e.node_id);
            }
        }
    }
    closure
}
