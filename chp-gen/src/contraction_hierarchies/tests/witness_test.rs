use chp_core::graph::INFINITY;
use ordered_float::OrderedFloat;

use super::*;

fn query(from: NodeId, to: NodeId, via_len: f64, max_expand: u32) -> WitnessQuery {
    WitnessQuery { from, to, via_len: OrderedFloat(via_len), max_expand }
}

fn states_with(n: usize, excluded: &[NodeId]) -> Vec<NodeState> {
    let mut states = vec![NodeState::Uncontracted; n];
    for &x in excluded {
        states[x as usize] = NodeState::BeingContracted;
    }
    states
}

#[rstest]
fn test_no_witness_around_contracted_node(four_node_graph: Graph) {
    let states = states_with(4, &[B]);
    let outcome = BidirectionalWitness::new().search(&four_node_graph, &states, query(A, C, 2.0, 100));

    assert!(!outcome.is_witness_for(OrderedFloat(2.0)));
    assert!(outcome.distance > OrderedFloat(2.0));
}

#[rstest]
fn test_direct_edge_is_a_witness(four_node_graph: Graph) {
    let states = states_with(4, &[B]);
    let outcome = BidirectionalWitness::new().search(&four_node_graph, &states, query(A, C, 6.0, 100));

    assert!(outcome.is_witness_for(OrderedFloat(6.0)));
    assert_eq!(outcome.distance, OrderedFloat(5.0));
}

#[rstest]
fn test_contracted_nodes_are_skipped() {
    let line = grid_graph(3, 1, |_, _| 1.0);
    let mut states = states_with(3, &[]);
    states[1] = NodeState::Contracted { iteration: 0 };

    let outcome = BidirectionalWitness::new().search(&line, &states, query(0, 2, 100.0, 100));

    assert_eq!(outcome.distance, INFINITY);
}

#[rstest]
fn test_same_endpoints() {
    let g = Graph::new(2);
    let outcome = BidirectionalWitness::new().search(&g, &states_with(2, &[]), query(1, 1, 0.0, 0));
    assert_eq!(outcome, WitnessOutcome { distance: OrderedFloat(0.0), expanded: 0 });
}

#[rstest]
fn test_budget_exhaustion_is_no_witness(unit_grid: Graph) {
    let outcome = BidirectionalWitness::new().search(&unit_grid, &states_with(25, &[]), query(0, 24, 8.0, 0));

    assert_eq!(outcome.expanded, 0);
    assert!(!outcome.is_witness_for(OrderedFloat(8.0)));
}

#[rstest]
fn test_budget_caps_expansions(unit_grid: Graph) {
    let outcome = BidirectionalWitness::new().search(&unit_grid, &states_with(25, &[]), query(0, 24, 8.0, 5));
    assert!(outcome.expanded <= 5);
}

// With an unlimited budget the search finds a witness exactly when one exists, and never reports a
// distance shorter than the real one.
#[rstest]
fn test_agrees_with_reference(weighted_grid: Graph) {
    let mut witness = BidirectionalWitness::new();
    let states = states_with(weighted_grid.num_nodes(), &[]);

    for from in [0, 7, 20, 35] {
        let reference = reference_distances(&weighted_grid, from);
        for to in (0..).take(weighted_grid.num_nodes()) {
            if to == from {
                continue;
            }
            let d = reference[to as usize].into_inner();

            let exact = witness.search(&weighted_grid, &states, query(from, to, d, u32::MAX));
            assert_eq!(exact.distance, OrderedFloat(d), "{from} -> {to}");

            // weights are integral, so nothing lies strictly between d - 1 and d
            let short = witness.search(&weighted_grid, &states, query(from, to, d - 1.0, u32::MAX));
            assert!(!short.is_witness_for(OrderedFloat(d - 1.0)), "{from} -> {to}");
            assert!(short.distance >= OrderedFloat(d));
        }
    }
}

#[rstest]
fn test_scratch_space_is_reset_between_graphs(four_node_graph: Graph, unit_grid: Graph) {
    let mut witness = BidirectionalWitness::new();
    witness.search(&unit_grid, &states_with(25, &[]), query(0, 24, 8.0, u32::MAX));

    let outcome = witness.search(&four_node_graph, &states_with(4, &[]), query(A, D, 4.0, u32::MAX));
    assert_eq!(outcome.distance, OrderedFloat(4.0));

    let outcome = witness.search(&four_node_graph, &states_with(4, &[]), query(A, D, 4.0, u32::MAX));
    assert_eq!(outcome.distance, OrderedFloat(4.0));
}
