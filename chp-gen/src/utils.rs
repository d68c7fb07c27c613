//! File formats around the preprocessing stages: the input edge list, DOT rendering of a
//! hierarchy, and the JSON run summary.

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
use chp_core::{
    ChData,
    EdgeKind,
    Graph,
    NodeId,
};
use ordered_float::OrderedFloat;
use petgraph::dot::Dot;
use serde::Serialize;
use tracing::{
    debug,
    instrument,
};

use crate::contraction_hierarchies::COMMENT_MARKER;

/// Read a graph from a text edge list at `path`.
///
/// See [`parse_edge_list`] for the format.
#[instrument]
pub fn read_edge_list(path: &Path) -> Result<Graph> {
    let file = File::open(path).with_context(|| format!("cannot open edge list {}", path.display()))?;
    let graph = parse_edge_list(BufReader::new(file)).with_context(|| format!("in {}", path.display()))?;

    debug!(nodes = graph.num_nodes(), edges = graph.num_edges(), "edge list loaded");
    Ok(graph)
}

/// Parse a text edge list: one `tail head weight` triple per line, blank lines and lines starting
/// with `#` ignored. The graph has `max id + 1` nodes.
pub fn parse_edge_list(reader: impl BufRead) -> Result<Graph> {
    let mut edges = vec![];
    let mut max_id = None;

    for (lineno, line) in (1..).zip(reader.lines()) {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with(COMMENT_MARKER) {
            continue;
        }

        let fields: Vec<_> = line.split_whitespace().collect();
        let &[tail, head, wt] = fields.as_slice() else {
            bail!("line {lineno}: expected `tail head weight`, got {line:?}");
        };
        let tail: NodeId = tail.parse().with_context(|| format!("line {lineno}: bad tail {tail:?}"))?;
        let head: NodeId = head.parse().with_context(|| format!("line {lineno}: bad head {head:?}"))?;
        let wt: f64 = wt.parse().with_context(|| format!("line {lineno}: bad weight {wt:?}"))?;
        ensure!(wt.is_finite() && wt >= 0.0, "line {lineno}: weight {wt} is not a finite non-negative number");

        max_id = max_id.max(Some(tail.max(head)));
        edges.push((tail, head, OrderedFloat(wt)));
    }

    let num_nodes = max_id.map_or(0, |id| id as usize + 1);
    Ok(Graph::from_edges(num_nodes, edges))
}

/// Render `ch` as a DOT digraph. Nodes are labelled with their id and rank, shortcuts with the node
/// they bypass.
#[must_use]
pub fn hierarchy_dot(ch: &ChData) -> String {
    let graphable = ch.graph.to_petgraph().map(
        |_, &id| format!("{id} (rank {})", ch.level[id as usize]),
        |_, e| match e.kind {
            EdgeKind::Original => format!("{}", e.wt),
            EdgeKind::Shortcut { via } => format!("{} via {via}", e.wt),
        },
    );
    format!("{}", Dot::new(&graphable))
}

/// Write the DOT rendering of `ch` to `path`.
#[instrument(skip(ch))]
pub fn write_dot_file(path: &Path, ch: &ChData) -> EmptyResult {
    let mut file = File::create(path).with_context(|| format!("cannot create {}", path.display()))?;
    write!(file, "{}", hierarchy_dot(ch))?;

    debug!("hierarchy written to: {}", path.display());
    Ok(())
}

/// Write `value` as pretty-printed JSON to `path`.
#[instrument(skip(value))]
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> EmptyResult {
    let file = File::create(path).with_context(|| format!("cannot create {}", path.display()))?;
    let mut out = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut out, value)?;
    writeln!(out)?;
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests;
