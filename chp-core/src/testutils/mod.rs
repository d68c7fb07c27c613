//! Shared fixtures and reference algorithms for tests across the workspace.

mod fixtures;
mod oracle;

pub use fixtures::*;
pub use oracle::*;
