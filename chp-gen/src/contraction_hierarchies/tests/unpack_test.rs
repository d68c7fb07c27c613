use std::collections::BTreeSet;

use chp_core::{
    EdgeKind,
    Weight,
};
use ordered_float::OrderedFloat;

use super::*;

#[fixture]
fn contracted_four_nodes(four_node_graph: Graph) -> ChData {
    let mut ch = ChData::new(four_node_graph);
    FixedGraphContraction::new(unbounded()).contract(&mut ch, &[B, A, C, D], 100).unwrap();
    ch
}

fn path_weight(g: &Graph, edges: &[EdgeHandle]) -> Weight {
    edges.iter().map(|&h| g.edge(h).wt).sum()
}

#[rstest]
fn test_unpack_single_level(contracted_four_nodes: ChData) {
    let g = &contracted_four_nodes.graph;
    let shortcut = EdgeHandle::new(A, 2);
    assert!(g.edge(shortcut).is_shortcut());

    let unpacked = unpack_and_list_edges(shortcut, g, false);

    assert_eq!(unpacked, vec![EdgeHandle::new(A, 0), EdgeHandle::new(B, 0)]);
    assert_eq!(path_weight(g, &unpacked), OrderedFloat(2.0));
    assert_eq!(unpack_and_list_edges(shortcut, g, true), unpacked);
}

#[rstest]
fn test_original_edge_is_not_unpacked(contracted_four_nodes: ChData) {
    let g = &contracted_four_nodes.graph;
    let mut intermediate = BTreeSet::new();

    assert_eq!(unpack_and_list_edges(EdgeHandle::new(A, 1), g, true), vec![]);
    unpack(EdgeHandle::new(A, 1), g, &mut intermediate);
    assert!(intermediate.is_empty());
}

#[rstest]
fn test_unpack_collects_nodes(contracted_four_nodes: ChData) {
    let mut intermediate = BTreeSet::new();
    unpack(EdgeHandle::new(A, 2), &contracted_four_nodes.graph, &mut intermediate);
    assert_eq!(intermediate, BTreeSet::from([A, B]));
}

#[rstest]
fn test_split_goes_through_bypassed_node() {
    // 0 -> 2 -> 3 sums to the shortcut's weight too, but the shortcut bypasses 1
    let mut g = Graph::from_edges(4, [(0, 2, 1.0), (0, 1, 1.0), (1, 3, 1.0), (2, 3, 1.0)]);
    g.insert_or_decrease_shortcut(0, 3, OrderedFloat(2.0), 1);

    let unpacked = unpack_and_list_edges(EdgeHandle::new(0, 2), &g, false);

    assert_eq!(unpacked, vec![EdgeHandle::new(0, 1), EdgeHandle::new(1, 0)]);
}

#[rstest]
fn test_first_parallel_pair_in_list_order() {
    // 1 + 1 and 0.5 + 1.5 both match; the pair listed first wins
    let mut g = Graph::from_edges(3, [(0, 1, 1.0), (0, 1, 0.5), (1, 2, 1.5), (1, 2, 1.0)]);
    g.insert_or_decrease_shortcut(0, 2, OrderedFloat(2.0), 1);

    let unpacked = unpack_and_list_edges(EdgeHandle::new(0, 2), &g, false);

    assert_eq!(unpacked, vec![EdgeHandle::new(0, 0), EdgeHandle::new(1, 1)]);
}

#[rstest]
fn test_zero_weight_cycle_does_not_loop() {
    // With zero weights 0 -> 3 -> 2 also sums to the weight of 0 -> 2, and 3 -> 2 in turn
    // decomposes into 3 -> 0 -> 2: only the bypassed node keeps the recursion from going round.
    let mut g = Graph::from_edges(4, [(0, 3, 0.0), (3, 0, 0.0), (0, 1, 0.0), (1, 2, 0.0)]);
    g.insert_or_decrease_shortcut(0, 2, OrderedFloat(0.0), 1);
    g.insert_or_decrease_shortcut(3, 2, OrderedFloat(0.0), 0);

    let path = unpack_and_list_edges(EdgeHandle::new(3, 1), &g, true);
    assert_eq!(path, vec![EdgeHandle::new(3, 0), EdgeHandle::new(0, 1), EdgeHandle::new(1, 0)]);

    let mut intermediate = BTreeSet::new();
    unpack(EdgeHandle::new(3, 1), &g, &mut intermediate);
    assert_eq!(intermediate, BTreeSet::from([3, 0, 1]));
}

// A two-way street of zero-weight edges: every node is a cut node, so shortcuts nest.
#[rstest]
#[case::odd_first(vec![1, 3, 5, 2, 6, 4, 0, 7])]
#[case::ends_first(vec![0, 7, 1, 6, 2, 5, 3, 4])]
#[case::scrambled(strided_order(8, 3))]
fn test_zero_weight_shortcuts_unpack_to_paths(#[case] order: Vec<NodeId>) {
    let street = Graph::from_edges(8, (0..7).flat_map(|i| [(i, i + 1, 0.0), (i + 1, i, 0.0)]));
    let (ch, _) = build_hierarchy(street, &order, unbounded());
    let g = &ch.graph;

    for shortcut in shortcut_handles(g) {
        let head = g.edge(shortcut).node_id;
        let path = unpack_and_list_edges(shortcut, g, true);

        assert_eq!(path.len(), shortcut.node.abs_diff(head) as usize, "{shortcut:?}");
        assert_eq!(path.first().map(|h| h.node), Some(shortcut.node));
        assert_eq!(path.last().map(|&h| g.edge(h).node_id), Some(head));
        for pair in path.windows(2) {
            assert_eq!(g.edge(pair[0]).node_id, pair[1].node);
        }
        assert!(path.iter().all(|&h| g.edge(h).kind == EdgeKind::Original));
    }
}

#[rstest]
fn test_missing_decomposition_is_a_base_edge() {
    let mut g = Graph::from_edges(3, [(0, 1, 1.0), (1, 2, 1.5)]);
    g.insert_or_decrease_shortcut(0, 2, OrderedFloat(2.0), 1);
    assert_eq!(unpack_and_list_edges(EdgeHandle::new(0, 1), &g, true), vec![]);
}

// Every shortcut unpacks into a path of original edges from its tail to its head whose weights add
// up to the shortcut's.
#[rstest]
#[case::unit_grid(unit_grid(), strided_order(25, 7))]
#[case::weighted_grid(weighted_grid(), strided_order(36, 5))]
fn test_recursive_unpack_reaches_original_edges(#[case] g: Graph, #[case] order: Vec<NodeId>) {
    let original = g.clone();
    let (ch, _) = build_hierarchy(g, &order, ContractionConfig::default());
    let g = &ch.graph;

    let shortcuts = shortcut_handles(g);
    assert!(!shortcuts.is_empty());
    for shortcut in shortcuts {
        let scut = g.edge(shortcut);
        let path = unpack_and_list_edges(shortcut, g, true);

        assert_eq!(path_weight(g, &path), scut.wt, "{shortcut:?}");
        assert_eq!(path.first().map(|h| h.node), Some(shortcut.node));
        assert_eq!(path.last().map(|&h| g.edge(h).node_id), Some(scut.node_id));
        for pair in path.windows(2) {
            assert_eq!(g.edge(pair[0]).node_id, pair[1].node);
        }
        for &h in &path {
            let e = g.edge(h);
            assert_eq!(e.kind, EdgeKind::Original);
            assert!(original.node(h.node).outgoing().iter().any(|o| o.node_id == e.node_id && o.wt == e.wt));
        }

        let mut intermediate = BTreeSet::new();
        unpack(shortcut, g, &mut intermediate);
        assert_eq!(intermediate, path.iter().map(|h| h.node).collect());
    }
}
