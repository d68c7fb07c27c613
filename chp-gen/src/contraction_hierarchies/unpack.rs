use std::collections::BTreeSet;

use chp_core::{
    EdgeHandle,
    EdgeKind,
    Graph,
    NodeId,
};
use tracing::warn;

/// The two edges `tail -> via -> head` a shortcut `tail -> head` stands for.
///
/// The middle node is the one whose contraction produced the shortcut. Among parallel edges the
/// first pair in list order whose weights sum exactly to the shortcut's weight is taken. Original
/// edges are never split.
///
/// Every edge touching `via` was fixed when `via` was contracted, and any shortcut among them
/// bypasses a node contracted even earlier, so repeated splitting always terminates, zero-weight
/// edges included.
fn split(handle: EdgeHandle, g: &Graph) -> Option<(EdgeHandle, EdgeHandle)> {
    let tail = handle.node;
    let shortcut = g.edge(handle);
    let EdgeKind::Shortcut { via } = shortcut.kind else {
        return None;
    };
    let head = shortcut.node_id;
    if via == tail || via == head {
        return None;
    }

    g.node(tail).outgoing().iter().enumerate().find_map(|(first_slot, first)| {
        if first.node_id != via {
            return None;
        }
        let second_slot = g
            .node(via)
            .outgoing()
            .iter()
            .position(|second| second.node_id == head && first.wt + second.wt == shortcut.wt)?;
        Some((EdgeHandle::new(tail, first_slot), EdgeHandle::new(via, second_slot)))
    })
}

/// List the edges the shortcut behind `shortcut` bypasses.
///
/// Without `recurse` the result is the two edges of the decomposition. With `recurse` every
/// decomposable edge is replaced by its own decomposition, so the result holds only the edges that
/// cannot be split any further, in travel order; their weights sum to the shortcut's. The two
/// intermediate halves are not listed ahead of their expansions.
///
/// The result is empty if the edge is not a shortcut or has no exact decomposition left (for
/// example after pruning): it is then a base edge.
#[must_use]
pub fn unpack_and_list_edges(shortcut: EdgeHandle, g: &Graph, recurse: bool) -> Vec<EdgeHandle> {
    let mut unpacked = vec![];
    let Some((first, second)) = split(shortcut, g) else {
        return unpacked;
    };

    if recurse {
        let depth = g.num_nodes();
        list_base_edges(first, g, depth, &mut unpacked);
        list_base_edges(second, g, depth, &mut unpacked);
    } else {
        unpacked.extend([first, second]);
    }
    unpacked
}

fn list_base_edges(handle: EdgeHandle, g: &Graph, depth: usize, unpacked: &mut Vec<EdgeHandle>) {
    match split(handle, g) {
        Some((first, second)) if depth > 0 => {
            list_base_edges(first, g, depth - 1, unpacked);
            list_base_edges(second, g, depth - 1, unpacked);
        },
        Some(_) => {
            warn!(tail = handle.node, slot = handle.slot, "unpacking deeper than the hierarchy, keeping edge as is");
            unpacked.push(handle);
        },
        None => unpacked.push(handle),
    }
}

/// Add to `intermediate` every node on the path the edge behind `edge` stands for, except its
/// head.
///
/// The tail and the middle node of each decomposition are added, recursing into both halves, so
/// for a shortcut `u -> v` the set ends up holding `u` and every node strictly between `u` and
/// `v`. Nothing is added for an edge that cannot be split.
pub fn unpack(edge: EdgeHandle, g: &Graph, intermediate: &mut BTreeSet<NodeId>) {
    unpack_bounded(edge, g, g.num_nodes(), intermediate);
}

fn unpack_bounded(edge: EdgeHandle, g: &Graph, depth: usize, intermediate: &mut BTreeSet<NodeId>) {
    let Some((first, second)) = split(edge, g) else {
        return;
    };
    intermediate.insert(first.node);
    intermediate.insert(second.node);

    if depth == 0 {
        warn!(tail = edge.node, slot = edge.slot, "unpacking deeper than the hierarchy, stopping");
        return;
    }
    unpack_bounded(first, g, depth - 1, intermediate);
    unpack_bounded(second, g, depth - 1, intermediate);
}
