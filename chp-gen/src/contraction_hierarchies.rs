//! Contraction Hierarchies speed up shortest path queries on large static weighted graphs, such as
//! road networks or graphs derived from grid maps.
//!
//! Preprocessing runs in stages, each consuming the previous stage's [`ChData`](chp_core::ChData):
//! 1. Load (or make up) a contraction order: a permutation of the node ids, lowest rank first.
//! 2. Contract the nodes in that order. Before a node is removed from the remaining "core" graph,
//!    every in/out neighbour pair is checked with a bounded witness search; if the only short
//!    path between the pair runs through the node, a shortcut edge is inserted so the core keeps
//!    its distances. Contraction can stop early, leaving an uncontracted core.
//! 3. Optionally prune up edges that are dominated by an up-then-down alternative
//!    (stall-on-demand as preprocessing).
//! 4. Sort every successor list so up edges come first and record the up-degree; a bidirectional
//!    query-time search relies on this partition to only ever climb the hierarchy.
//!
//! Shortcuts carry no list of the edges they replace, only the node they bypass. They are unpacked
//! on demand by finding the two edges through that node whose weights sum exactly to the
//! shortcut's weight.

/// Reachability closures over outgoing and down edges
mod closure;
/// The fixed-order contraction driver
mod contractor;
/// Node order files
mod order;
/// Stall-on-demand pruning of dominated up edges
mod stall;
/// Up/down partitioning of successor lists
mod successors;
/// Recovering the edges and nodes a shortcut stands for
mod unpack;
/// Bounded bidirectional search over the uncontracted core
mod witness;

pub use closure::{
    compute_closure,
    compute_down_closure,
};
pub use contractor::{
    ContractionConfig,
    ContractionStats,
    FixedGraphContraction,
    NodeState,
};
pub use order::{
    load_node_order,
    validate_order,
    value_index_swap,
    write_node_order,
    COMMENT_MARKER,
};
pub use stall::sod_pruning;
pub use successors::sort_successors;
pub use unpack::{
    unpack,
    unpack_and_list_edges,
};
#[cfg(any(test, feature = "testutils"))]
pub use witness::MockWitnessSearch;
pub use witness::{
    BidirectionalWitness,
    WitnessOutcome,
    WitnessQuery,
    WitnessSearch,
};

#[cfg(test)]
mod tests;
