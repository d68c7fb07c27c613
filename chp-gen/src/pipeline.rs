//! End-to-end preprocessing run: pick an order, contract, prune, partition, and write the
//! requested artefacts.
//!
//! Each stage is a separate function coordinated by [`run`], so that the stages can also be driven
//! one by one.

use std::collections::BTreeSet;
use std::path::{
    Path,
    PathBuf,
};

use anyhow::Result;
use chp_core::errors::*;
use chp_core::{
    ChData,
    EdgeHandle,
    EdgeKind,
    Graph,
    NodeId,
    SearchDirection,
    Weight,
};
use indicatif::{
    ProgressBar,
    ProgressFinish,
    ProgressStyle,
};
use serde::Serialize;
use tracing::{
    error,
    info,
    instrument,
};

use crate::contraction_hierarchies::{
    load_node_order,
    sod_pruning,
    sort_successors,
    unpack,
    validate_order,
    write_node_order,
    ContractionConfig,
    ContractionStats,
    FixedGraphContraction,
};
use crate::utils::{
    write_dot_file,
    write_json,
};

/// What to do in a [`run`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PipelineOptions {
    /// Order file to contract by; the identity order is used without one.
    pub order: Option<PathBuf>,
    /// Where to write the order that was used.
    pub write_order: Option<PathBuf>,
    /// Percentage of the order to contract.
    pub c_pct: u32,
    /// Witness search budget.
    pub contraction: ContractionConfig,
    /// Run stall-on-demand pruning after contraction.
    pub sod: bool,
    /// Where to write a DOT rendering of the hierarchy.
    pub dot: Option<PathBuf>,
    /// Where to write the JSON [`Summary`].
    pub summary: Option<PathBuf>,
    /// Draw a progress bar while contracting.
    pub show_progress: bool,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            order: None,
            write_order: None,
            c_pct: 100,
            contraction: ContractionConfig::default(),
            sod: false,
            dot: None,
            summary: None,
            show_progress: false,
        }
    }
}

/// Where the contraction order came from.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderSource {
    /// Loaded from this file.
    File(PathBuf),
    /// No usable file; node ids in increasing order.
    Identity,
}

/// Outcome of a [`run`], written out as JSON on request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Summary {
    /// Nodes in the graph.
    pub num_nodes: usize,
    /// Edges of the input graph.
    pub input_edges: usize,
    /// Edges of the finished hierarchy, shortcuts included.
    pub output_edges: usize,
    /// Shortcuts in the finished hierarchy.
    pub shortcuts: usize,
    /// Edges deleted by stall-on-demand pruning.
    pub stalled: usize,
    /// Origin of the contraction order.
    pub order: OrderSource,
    /// Contraction counters.
    pub contraction: ContractionStats,
}

/// Preprocess `graph` into a contraction hierarchy.
#[instrument(skip_all, fields(nodes = graph.num_nodes(), edges = graph.num_edges()))]
pub fn run(graph: Graph, options: &PipelineOptions) -> Result<(ChData, Summary)> {
    let input_edges = graph.num_edges();
    let mut ch = ChData::new(graph);

    let (order, source) = resolve_order(options.order.as_deref(), ch.num_nodes())?;
    let contraction = contract(&mut ch, &order, options)?;

    let stalled = if options.sod { sod_pruning(&mut ch.graph, &ch.level) } else { 0 };
    sort_successors(&mut ch)?;

    if let Some(path) = &options.write_order {
        // a failed write is reported but does not spoil the run
        if let Err(err) = write_node_order(path, &order) {
            error!("{err:#}");
        }
    }

    if let Some(path) = &options.dot {
        write_dot_file(path, &ch)?;
        info!("hierarchy written to: {}", path.display());
    }

    let summary = Summary {
        num_nodes: ch.num_nodes(),
        input_edges,
        output_edges: ch.graph.num_edges(),
        shortcuts: ch.num_shortcuts(),
        stalled,
        order: source,
        contraction,
    };
    if let Some(path) = &options.summary {
        write_json(path, &summary)?;
        info!("summary written to: {}", path.display());
    }

    Ok((ch, summary))
}

/// Load the contraction order from `path`, falling back to the identity order when there is no
/// file or it cannot be read.
///
/// An order file that can be read but is not a permutation of the graph's nodes is an error: a
/// partial order would silently under-contract.
#[instrument]
pub fn resolve_order(path: Option<&Path>, num_nodes: usize) -> Result<(Vec<NodeId>, OrderSource)> {
    let identity = || ((0..).take(num_nodes).collect(), OrderSource::Identity);

    let Some(path) = path else {
        info!("no order file given, contracting in node id order");
        return Ok(identity());
    };

    match load_node_order(path, false) {
        Ok(order) => {
            validate_order(&order, num_nodes).with_context(|| format!("order file {}", path.display()))?;
            Ok((order, OrderSource::File(path.to_path_buf())))
        },
        Err(err) => {
            error!("{err:#}; contracting in node id order instead");
            Ok(identity())
        },
    }
}

/// Contract `ch` by `order`, drawing a progress bar if asked to.
#[instrument(skip(ch, order, options), fields(c_pct = options.c_pct))]
pub fn contract(ch: &mut ChData, order: &[NodeId], options: &PipelineOptions) -> Result<ContractionStats> {
    let mut contractor = FixedGraphContraction::new(options.contraction.clone());
    if !options.show_progress {
        return contractor.contract(ch, order, options.c_pct);
    }

    let target = ch.num_nodes() * options.c_pct.min(100) as usize / 100;
    let pb = ProgressBar::new(target as u64)
        .with_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.yellow/blue}] {pos}/{len} contractions ({percent}%) {msg}")?,
        )
        .with_message(format!("contracting {}% of nodes", options.c_pct.min(100)))
        .with_finish(ProgressFinish::AndLeave);
    pb.enable_steady_tick(std::time::Duration::from_millis(100));

    let stats = contractor.contract_with_progress(ch, order, options.c_pct, |i| pb.set_position(i as u64))?;
    pb.finish_using_style();
    Ok(stats)
}

/// An edge as listed by [`inspect_node`].
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EdgeReport {
    /// The other end of the edge.
    pub node: NodeId,
    /// Edge weight.
    pub wt: Weight,
    /// Node a shortcut bypasses.
    pub via: Option<NodeId>,
    /// Nodes strictly inside the path a shortcut stands for.
    pub unpacked: Vec<NodeId>,
}

/// One node of a finished hierarchy.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NodeReport {
    /// Node id.
    pub node: NodeId,
    /// Contraction rank.
    pub level: u32,
    /// Edges towards higher ranks.
    pub up: Vec<EdgeReport>,
    /// Edges towards lower ranks.
    pub down: Vec<EdgeReport>,
}

/// Describe `node`'s place in a finished hierarchy, unpacking every shortcut leaving it.
pub fn inspect_node(ch: &ChData, node: NodeId) -> Result<NodeReport> {
    if !ch.graph.contains_node(node) {
        bail!(HierarchyError::NodeOutOfRange { node, num_nodes: ch.num_nodes() });
    }

    let up_degree = ch.up_degree[node as usize] as usize;
    let report = |slot: usize| {
        let e = ch.graph.edge(EdgeHandle::new(node, slot));
        let via = match e.kind {
            EdgeKind::Original => None,
            EdgeKind::Shortcut { via } => Some(via),
        };
        let mut inside = BTreeSet::new();
        unpack(EdgeHandle::new(node, slot), &ch.graph, &mut inside);
        inside.remove(&node);
        EdgeReport { node: e.node_id, wt: e.wt, via, unpacked: inside.into_iter().collect() }
    };

    let out_degree = ch.edges(node, SearchDirection::Any).len();
    Ok(NodeReport {
        node,
        level: ch.level[node as usize],
        up: (0..up_degree.min(out_degree)).map(&report).collect(),
        down: (up_degree.min(out_degree)..out_degree).map(&report).collect(),
    })
}

#[cfg(test)]
mod tests;
