//! Error taxonomy shared by every preprocessing stage.
//!
//! Library code returns [`anyhow::Result`] so that callers can attach context while propagating
//! with `?`; the expected failure kinds are the [`HierarchyError`] variants below, which callers can
//! recover with [`anyhow::Error::downcast_ref`].

use std::path::PathBuf;

pub use anyhow::{
    anyhow,
    bail,
    ensure,
    Context,
};
pub use thiserror::Error;

use crate::graph::NodeId;

/// Result type for operations that produce nothing on success.
pub type EmptyResult = anyhow::Result<()>;

/// Expected failures of the contraction hierarchy pipeline.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum HierarchyError {
    /// The order file could not be opened for reading.
    #[error("cannot load node order from {}", path.display())]
    OrderUnreadable {
        /// File that was requested.
        path: PathBuf,
    },

    /// The order file could not be created or written.
    #[error("cannot write node order to {}", path.display())]
    OrderUnwritable {
        /// File that was requested.
        path: PathBuf,
    },

    /// The contraction order is not a permutation of the graph's node ids.
    #[error("invalid contraction order: {reason}")]
    InvalidOrder {
        /// What is wrong with the order.
        reason: String,
    },

    /// A node id does not exist in the graph.
    #[error("node {node} is out of range (graph has {num_nodes} nodes)")]
    NodeOutOfRange {
        /// Offending id.
        node: NodeId,
        /// Number of nodes in the graph.
        num_nodes: usize,
    },

    /// An edge after the up-degree boundary does not point down.
    #[error("edge {slot} of node {node} breaks the up/down partition")]
    PartitionViolation {
        /// Node whose successor list is broken.
        node: NodeId,
        /// Position of the first offending edge.
        slot: usize,
    },

    /// A contraction percentage outside `0..=100`.
    #[error("contraction percentage must be within 0..=100, got {value}")]
    InvalidPercentage {
        /// Rejected value.
        value: String,
    },
}

impl HierarchyError {
    /// Shorthand for [`HierarchyError::InvalidOrder`].
    pub fn invalid_order(reason: impl Into<String>) -> Self {
        Self::InvalidOrder { reason: reason.into() }
    }
}
