use std::fs;

use assertables::*;
use chp_core::graph::INFINITY;
use ordered_float::OrderedFloat;
use tracing_test::traced_test;

use super::*;

#[rstest]
fn test_run_without_order_file(four_node_graph: Graph) {
    let (ch, summary) = run(four_node_graph, &PipelineOptions::default()).unwrap();

    assert_eq!(summary.order, OrderSource::Identity);
    assert_eq!(ch.level, vec![0, 1, 2, 3]);
    assert_eq!(summary.input_edges, 4);
    assert_eq!(summary.output_edges, 4 + summary.shortcuts);
    assert_eq!(summary.contraction.contracted, 4);
    assert_eq!(upward_distance(&ch, A, D), Some(OrderedFloat(4.0)));
}

#[rstest]
fn test_run_writes_artefacts(four_node_graph: Graph) {
    let dir = tempfile::tempdir().unwrap();
    let order_path = dir.path().join("in.order");
    fs::write(&order_path, "# contraction order\n1\n0\n2\n3\n").unwrap();

    let options = PipelineOptions {
        order: Some(order_path.clone()),
        write_order: Some(dir.path().join("out.order")),
        dot: Some(dir.path().join("ch.dot")),
        summary: Some(dir.path().join("summary.json")),
        sod: true,
        ..Default::default()
    };
    let (ch, summary) = run(four_node_graph, &options).unwrap();

    assert_eq!(summary.order, OrderSource::File(order_path));
    assert_eq!(summary.shortcuts, 1);
    assert_eq!(ch.level, vec![1, 0, 2, 3]);
    assert_eq!(load_node_order(&dir.path().join("out.order"), false).unwrap(), vec![1, 0, 2, 3]);

    let dot = fs::read_to_string(dir.path().join("ch.dot")).unwrap();
    assert_starts_with!(dot, "digraph");
    assert_contains!(dot, "2 via 1");

    let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(dir.path().join("summary.json")).unwrap()).unwrap();
    assert_eq!(json["shortcuts"], 1);
    assert_eq!(json["contraction"]["contracted"], 4);
}

// 0 -> 2 is beaten by going up to 1 and back down
#[rstest]
fn test_run_with_pruning_counts_stalled_edges() {
    let g = Graph::from_edges(3, [(0, 1, 1.0), (1, 2, 1.0), (0, 2, 5.0)]);
    let dir = tempfile::tempdir().unwrap();
    let order_path = dir.path().join("order");
    fs::write(&order_path, "#\n0\n2\n1\n").unwrap();

    let options = PipelineOptions { order: Some(order_path), sod: true, ..Default::default() };
    let (ch, summary) = run(g, &options).unwrap();

    assert_eq!(summary.stalled, 1);
    assert_eq!(summary.output_edges, 2);
    assert_eq!(upward_distance(&ch, 0, 2), Some(OrderedFloat(2.0)));
}

#[rstest]
#[traced_test]
fn test_unreadable_order_falls_back_to_identity() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.order");

    let (order, source) = resolve_order(Some(&path), 3).unwrap();

    assert_eq!(order, vec![0, 1, 2]);
    assert_eq!(source, OrderSource::Identity);
    assert!(logs_contain("contracting in node id order instead"));
}

#[rstest]
fn test_incomplete_order_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("short.order");
    fs::write(&path, "# two of three\n2\n0\nx\n1\n").unwrap();

    let err = resolve_order(Some(&path), 3).unwrap_err();

    assert!(matches!(err.downcast_ref::<HierarchyError>(), Some(HierarchyError::InvalidOrder { .. })));
}

#[rstest]
#[traced_test]
fn test_unwritable_order_does_not_fail_run(four_node_graph: Graph) {
    let dir = tempfile::tempdir().unwrap();
    let options = PipelineOptions {
        write_order: Some(dir.path().join("no-such-dir").join("out.order")),
        ..Default::default()
    };

    assert_ok!(run(four_node_graph, &options));
    assert!(logs_contain("cannot write node order"));
}

#[rstest]
fn test_partial_contraction_leaves_core(weighted_grid: Graph) {
    let options = PipelineOptions { c_pct: 50, ..Default::default() };
    let (ch, summary) = run(weighted_grid, &options).unwrap();

    assert_eq!(summary.contraction.contracted, 18);
    assert_eq!(summary.contraction.core_size, 18);
    let mut ranks = ch.level.clone();
    ranks.sort_unstable();
    assert_eq!(ranks, identity_order(36));
}

#[rstest]
fn test_inspect_node(four_node_graph: Graph) {
    let dir = tempfile::tempdir().unwrap();
    let order_path = dir.path().join("order");
    fs::write(&order_path, "1\n0\n2\n3\n").unwrap();
    let options = PipelineOptions { order: Some(order_path), ..Default::default() };
    let (ch, _) = run(four_node_graph, &options).unwrap();

    let report = inspect_node(&ch, A).unwrap();

    assert_eq!(report.level, 1);
    assert_eq!(report.up.len(), 2);
    let shortcut = report.up.iter().find(|e| e.via.is_some()).unwrap();
    assert_eq!(shortcut.node, C);
    assert_eq!(shortcut.wt, OrderedFloat(2.0));
    assert_eq!(shortcut.via, Some(B));
    assert_eq!(shortcut.unpacked, vec![B]);
    assert_eq!(report.down.len(), 1);
    assert_eq!(report.down[0].node, B);
}

#[rstest]
fn test_inspect_unknown_node(four_node_graph: Graph) {
    let (ch, _) = run(four_node_graph, &PipelineOptions::default()).unwrap();

    let err = inspect_node(&ch, 9).unwrap_err();

    assert_eq!(err.downcast_ref::<HierarchyError>(), Some(&HierarchyError::NodeOutOfRange { node: 9, num_nodes: 4 }));
}

#[rstest]
fn test_tight_budget_stays_correct(weighted_grid: Graph) {
    let original = weighted_grid.clone();
    let options = PipelineOptions {
        contraction: ContractionConfig { max_expand: Some(1), ..Default::default() },
        sod: true,
        ..Default::default()
    };
    let (ch, summary) = run(weighted_grid, &options).unwrap();

    assert_gt!(summary.contraction.budget_exhausted, 0);
    for from in [0, 13, 35] {
        let reference = reference_distances(&original, from);
        for to in (0..).take(36) {
            assert_eq!(upward_distance(&ch, from, to).unwrap_or(INFINITY), reference[to as usize]);
        }
    }
}
