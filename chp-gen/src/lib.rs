#![deny(
    // This is overly strict, of course. The intent is somewhat of a "quality seal," less to fix everything, and more to force us to add inline allows, which give us a mechanism to say "we think this is okay, but you might want to take a second look here."
    clippy::nursery,
    clippy::pedantic,
)]
#![warn(missing_docs)]

//! # chp-gen – contraction hierarchy preprocessing
//!
//! chp-gen turns a static weighted directed graph into a contraction hierarchy: a rank for every
//! node, shortcut edges that preserve shortest path distances once lower ranked nodes are skipped,
//! and successor lists split into up and down edges for a bidirectional query-time search.
//!
//! ## Pipeline overview
//! 1. Order selection ([`resolve_order`](crate::pipeline::resolve_order)) – load a contraction
//!    order from a file, or fall back to node id order.
//! 2. Contraction ([`FixedGraphContraction`](crate::contraction_hierarchies::FixedGraphContraction))
//!    – contract nodes in that order, possibly stopping early, inserting shortcuts wherever a
//!    bounded witness search cannot prove them redundant.
//! 3. Pruning ([`sod_pruning`](crate::contraction_hierarchies::sod_pruning)) – optionally drop up
//!    edges beaten by an up-then-down detour.
//! 4. Partitioning ([`sort_successors`](crate::contraction_hierarchies::sort_successors)) – put up
//!    edges first in every successor list and record the up-degrees.
//!
//! The entry point [`pipeline::run`] chains these stages and writes the requested artefacts (the
//! order used, a DOT rendering, a JSON summary).
//!
//! All long-running stages are annotated with [`tracing`] spans so that callers can observe
//! progress and timing.

pub mod contraction_hierarchies;
pub mod pipeline;
pub mod utils;

pub use pipeline::{
    PipelineOptions,
    Summary,
};
