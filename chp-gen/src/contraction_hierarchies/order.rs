use std::fs::File;
use std::io::{
    BufRead,
    BufReader,
    BufWriter,
    Write,
};
use std::path::Path;

use anyhow::Result;
use chp_core::errors::*;
use chp_core::NodeId;
use tracing::{
    debug,
    instrument,
    warn,
};

/// Lines starting with this character are comments.
pub const COMMENT_MARKER: char = '#';

/// First line of every order file this crate writes.
const HEADER: &str = "# node ids, in order of contraction";

/// Write `order` to `path`, one node id per line after a comment header.
///
/// A failure leaves preprocessing untouched; the caller decides whether it matters.
#[instrument(skip(order), fields(len = order.len()))]
pub fn write_node_order(path: &Path, order: &[NodeId]) -> EmptyResult {
    let unwritable = || HierarchyError::OrderUnwritable { path: path.to_path_buf() };

    let file = File::create(path).with_context(unwritable)?;
    let mut out = BufWriter::new(file);
    writeln!(out, "{HEADER}").with_context(unwritable)?;
    for id in order {
        writeln!(out, "{id}").with_context(unwritable)?;
    }
    out.flush().with_context(unwritable)?;

    debug!("node order written to {}", path.display());
    Ok(())
}

/// Load a node order from `path`.
///
/// The file holds node ids in contraction order, whitespace separated; comment lines are skipped.
/// Reading stops at the first token that is not a valid node id (with `lex_order`, also at the
/// first id not below the number of ids read), and the ids read so far are returned, so callers must check the result with [`validate_order`] before contracting.
///
/// With `lex_order` the contraction sequence is turned into rank-at-node form before returning
/// (see [`value_index_swap`]): the result is indexed by node id rather than by position.
#[instrument]
pub fn load_node_order(path: &Path, lex_order: bool) -> Result<Vec<NodeId>> {
    let unreadable = || HierarchyError::OrderUnreadable { path: path.to_path_buf() };
    let file = File::open(path).with_context(unreadable)?;

    let mut order = vec![];
    'lines: for line in BufReader::new(file).lines() {
        let line = line.with_context(unreadable)?;
        let line = line.trim_start();
        if line.starts_with(COMMENT_MARKER) {
            continue;
        }

        for token in line.split_whitespace() {
            let Ok(id) = token.parse::<NodeId>() else {
                warn!(token, parsed = order.len(), "ignoring the rest of the order file after a malformed id");
                break 'lines;
            };
            order.push(id);
        }
    }
    debug!(len = order.len(), "node order loaded");

    if lex_order {
        if let Some(pos) = order.iter().position(|&id| id as usize >= order.len()) {
            warn!(id = order[pos], parsed = pos, "ignoring the rest of the order file after an out-of-range id");
            order.truncate(pos);
        }
        order = value_index_swap(&order);
    }
    Ok(order)
}

/// Swap values and indices: given a contraction sequence, return `rank` with `rank[id]` the
/// position of `id` in the sequence.
///
/// The result has one entry per position of the sequence. Ids missing from the sequence get
/// `NodeId::MAX`; ids too large to index it are dropped.
#[must_use]
pub fn value_index_swap(order: &[NodeId]) -> Vec<NodeId> {
    let mut rank = vec![NodeId::MAX; order.len()];
    for (pos, &id) in (0..).zip(order) {
        if let Some(slot) = rank.get_mut(id as usize) {
            *slot = pos;
        }
    }
    rank
}

/// Check that `order` is a permutation of `0..num_nodes`.
pub fn validate_order(order: &[NodeId], num_nodes: usize) -> EmptyResult {
    if order.len() != num_nodes {
        bail!(HierarchyError::invalid_order(format!("expected {num_nodes} node ids, found {}", order.len())));
    }

    let mut seen = vec![false; num_nodes];
    for &id in order {
        let Some(slot) = seen.get_mut(id as usize) else {
            bail!(HierarchyError::invalid_order(format!("node {id} is out of range")));
        };
        if *slot {
            bail!(HierarchyError::invalid_order(format!("node {id} appears more than once")));
        }
        *slot = true;
    }
    Ok(())
}
