use rstest::*;

use crate::graph::{
    Graph,
    NodeId,
};

/// Node names of [`four_node_graph`].
pub const A: NodeId = 0;
/// Node names of [`four_node_graph`].
pub const B: NodeId = 1;
/// Node names of [`four_node_graph`].
pub const C: NodeId = 2;
/// Node names of [`four_node_graph`].
pub const D: NodeId = 3;

/// `A->B(1), B->C(1), A->C(5), C->D(2)`.
#[fixture]
pub fn four_node_graph() -> Graph {
    Graph::from_edges(4, [(A, B, 1.0), (B, C, 1.0), (A, C, 5.0), (C, D, 2.0)])
}

/// Bidirectional 4-neighbour grid; `weight(tail, head)` gives each arc's weight.
pub fn grid_graph(width: u32, height: u32, weight: impl Fn(NodeId, NodeId) -> f64) -> Graph {
    let mut edges = vec![];
    for y in 0..height {
        for x in 0..width {
            let id = y * width + x;
            if x + 1 < width {
                edges.push((id, id + 1, weight(id, id + 1)));
                edges.push((id + 1, id, weight(id + 1, id)));
            }
            if y + 1 < height {
                edges.push((id, id + width, weight(id, id + width)));
                edges.push((id + width, id, weight(id + width, id)));
            }
        }
    }
    Graph::from_edges((width * height) as usize, edges)
}

/// 5x5 grid with unit weights, so every edge is a shortest path.
#[fixture]
pub fn unit_grid() -> Graph {
    grid_graph(5, 5, |_, _| 1.0)
}

/// 6x6 grid with small integral, direction-dependent weights.
#[fixture]
pub fn weighted_grid() -> Graph {
    grid_graph(6, 6, |u, v| f64::from((u * 31 + v * 17) % 7 + 1))
}

/// A sparse graph with one-way streets, parallel edges and a self-loop.
#[fixture]
pub fn tangled_graph() -> Graph {
    Graph::from_edges(
        8,
        [
            (0, 1, 2.0),
            (1, 2, 2.0),
            (2, 3, 1.0),
            (3, 0, 4.0),
            (0, 4, 7.0),
            (4, 5, 1.0),
            (5, 6, 1.0),
            (6, 7, 3.0),
            (7, 4, 1.0),
            (1, 5, 3.0),
            (1, 5, 6.0),
            (5, 1, 2.0),
            (3, 7, 2.0),
            (6, 2, 5.0),
            (2, 2, 1.0),
        ],
    )
}

/// `0, 1, .., n - 1`.
#[must_use]
pub fn identity_order(n: usize) -> Vec<NodeId> {
    (0..).take(n).collect()
}

/// The permutation `i -> i * stride mod n`.
///
/// # Panics
///
/// If `stride` and `n` are not coprime.
#[must_use]
pub fn strided_order(n: usize, stride: usize) -> Vec<NodeId> {
    let order: Vec<NodeId> = (0..n).map(|i| ((i * stride) % n) as NodeId).collect();
    let mut seen = order.clone();
    seen.sort_unstable();
    seen.dedup();
    assert_eq!(seen.len(), n, "stride {stride} is not coprime with {n}");
    order
}
