#![warn(
    // The intent is a "quality seal": allow locally, with a reason, rather than globally.
    clippy::nursery,
    clippy::pedantic,
    missing_docs,
)]
//! Shared building blocks for contraction hierarchy preprocessing: the mutable weighted graph the
//! contractor works on, the hierarchy dataset it produces, the error taxonomy and logging setup.

pub mod errors;
pub mod graph;
pub mod hierarchy;
pub mod logging;

#[cfg(feature = "testutils")]
pub mod testutils;

pub use graph::{
    Edge,
    EdgeHandle,
    EdgeKind,
    Graph,
    NodeId,
    Weight,
};
pub use hierarchy::{
    ChData,
    SearchDirection,
};
