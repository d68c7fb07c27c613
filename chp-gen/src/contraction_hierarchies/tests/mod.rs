mod unpack_test;
mod witness_test;

use chp_core::testutils::*;
use chp_core::{
    ChData,
    EdgeHandle,
    Graph,
    NodeId,
};
use rstest::*;

use super::*;

/// Witness searches that never give up, so every shortcut is a proven necessity.
fn unbounded() -> ContractionConfig {
    ContractionConfig { max_expand: Some(u32::MAX), ..Default::default() }
}

/// Contract every node of `g` in `order` and sort the successor lists.
fn build_hierarchy(g: Graph, order: &[NodeId], config: ContractionConfig) -> (ChData, ContractionStats) {
    let mut ch = ChData::new(g);
    let stats = FixedGraphContraction::new(config).contract(&mut ch, order, 100).unwrap();
    sort_successors(&mut ch).unwrap();
    (ch, stats)
}

/// Handles of every shortcut in `g`.
fn shortcut_handles(g: &Graph) -> Vec<EdgeHandle> {
    g.nodes()
        .flat_map(|(tail, n)| {
            n.outgoing()
                .iter()
                .enumerate()
                .filter(|(_, e)| e.is_shortcut())
                .map(move |(slot, _)| EdgeHandle::new(tail, slot))
        })
        .collect()
}
