use chp_core::{
    EdgeHandle,
    Graph,
    NodeId,
};
use itertools::Itertools;
use tracing::{
    debug,
    info,
    instrument,
};

/// Delete up edges that are never part of a shortest up-down path.
///
/// For a source `s` with up edges `s -> a` and `s -> b`, let `high` be the higher ranked of the two
/// heads and `low` the other. If `s -> high -> low` is strictly lighter than `s -> low`, the edge
/// `s -> low` can be dropped together with its incoming mirror. Each source is scanned once; there
/// is no iteration to a fixed point.
///
/// Related rules that do not hold: "down-up beats down" fails because the two down frontiers may
/// never meet, and "up-down beats down" rarely fires since up edges lead far away.
///
/// Returns the number of deleted edges.
#[instrument(skip_all, fields(num_nodes = g.num_nodes()))]
pub fn sod_pruning(g: &mut Graph, rank: &[u32]) -> usize {
    let mut removed = 0;
    for source in (0..).take(g.num_nodes()) {
        let stalled = stalled_edges(g, rank, source);
        removed += stalled.len();

        // highest slot first, so the remaining slots stay valid
        for &slot in stalled.iter().rev() {
            let edge = g.del_outgoing(EdgeHandle::new(source, slot));
            debug!("pruned {source} -> {} ({})", edge.node_id, edge.wt);
        }
    }
    debug_assert!(g.is_symmetric(), "pruning broke adjacency mirroring");

    info!(removed, "stall-on-demand pruning finished");
    removed
}

/// Slots of `source`'s outgoing edges to delete, ascending.
fn stalled_edges(g: &Graph, rank: &[u32], source: NodeId) -> Vec<usize> {
    let rank_of = |n: NodeId| rank[n as usize];
    let out = g.node(source).outgoing();
    let mut stalled = vec![false; out.len()];

    let up_slots = (0..out.len()).filter(|&slot| rank_of(out[slot].node_id) >= rank_of(source));
    for (i, j) in up_slots.tuple_combinations() {
        if stalled[i] || stalled[j] || out[i].node_id == out[j].node_id {
            continue;
        }

        let (high, low) = if rank_of(out[i].node_id) < rank_of(out[j].node_id) { (j, i) } else { (i, j) };
        let bypass = g.node(out[high].node_id).min_edge_weight(out[low].node_id);
        if bypass.is_some_and(|wt| out[high].wt + wt < out[low].wt) {
            stalled[low] = true;
        }
    }

    (0..out.len()).filter(|&slot| stalled[slot]).collect()
}
