use std::cmp::Reverse;

use chp_core::errors::*;
use chp_core::ChData;
use tracing::{
    info,
    instrument,
};

/// Reorder every successor list by descending rank of the edge head and record each node's
/// up-degree.
///
/// Afterwards the first `up_degree[n]` edges of `n` lead to nodes of equal or higher rank and the
/// rest lead strictly down, which is what [`ChData::edges`] relies on. The partition is checked,
/// not assumed: a violation fails with [`HierarchyError::PartitionViolation`].
///
/// The sort is stable, so equal-rank heads (parallel edges) keep their relative order.
#[instrument(skip_all, fields(num_nodes = ch.num_nodes()))]
pub fn sort_successors(ch: &mut ChData) -> EmptyResult {
    let ChData { graph, level, up_degree } = ch;
    ensure!(
        level.len() == graph.num_nodes() && up_degree.len() == graph.num_nodes(),
        "rank arrays do not match the graph: {} levels, {} up-degrees, {} nodes",
        level.len(),
        up_degree.len(),
        graph.num_nodes()
    );

    let mut num_up = 0;
    for node in (0..).take(graph.num_nodes()) {
        graph.sort_outgoing_by_key(node, |e| Reverse(level[e.node_id as usize]));

        let node_level = level[node as usize];
        let out = graph.node(node).outgoing();
        let degree = out.iter().take_while(|e| level[e.node_id as usize] >= node_level).count();

        if let Some(offset) = out[degree..].iter().position(|e| level[e.node_id as usize] >= node_level) {
            bail!(HierarchyError::PartitionViolation { node, slot: degree + offset });
        }

        up_degree[node as usize] = u32::try_from(degree)?;
        num_up += degree;
    }

    info!(up_edges = num_up, down_edges = graph.num_edges() - num_up, "successor lists sorted");
    Ok(())
}
