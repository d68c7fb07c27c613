#![deny(
    // This is overly strict, of course. The intent is somewhat of a "quality seal," less to fix everything, and more to force us to add inline allows, which give us a mechanism to say "we think this is okay, but you might want to take a second look here."
    clippy::nursery,
    clippy::pedantic,
)]
//! Contraction hierarchy preprocessor command line interface.
//!
//! Reads a graph from a text edge list, builds a contraction hierarchy for it and writes the
//! artefacts asked for. See binary --help for more information.

use std::path::PathBuf;

use anyhow::Result;
use chp_core::errors::HierarchyError;
use chp_core::NodeId;
use chp_gen::contraction_hierarchies::ContractionConfig;
use chp_gen::pipeline::{
    self,
    inspect_node,
    PipelineOptions,
};
use chp_gen::utils::read_edge_list;
use clap::Parser;
use tracing::info;

/// chp-gen command-line interface to preprocess a weighted directed graph into a contraction
/// hierarchy
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Edge list to preprocess: one `tail head weight` triple per line, `#` starts a comment line.
    #[arg(short, long)]
    graph: PathBuf,

    /// Order file listing node ids in contraction order; node id order is used if it is missing or
    /// unreadable.
    #[arg(short, long)]
    order: Option<PathBuf>,

    /// Write the contraction order that was used to this file.
    #[arg(long)]
    write_order: Option<PathBuf>,

    /// Percentage of nodes to contract (0-100); the rest stay in an uncontracted core.
    #[arg(short = 'c', long, default_value_t = 100, value_parser = parse_contraction_pct)]
    contraction_pct: u32,

    /// Fixed node expansion budget for every witness search; derived from each node's
    /// neighbourhood if not given.
    #[arg(long)]
    max_expand: Option<u32>,

    /// Prune up edges beaten by an up-then-down detour after contraction.
    #[arg(long)]
    sod: bool,

    /// Write a DOT rendering of the hierarchy to this file.
    #[arg(long)]
    dot: Option<PathBuf>,

    /// Write a JSON summary of the run to this file.
    #[arg(long)]
    summary: Option<PathBuf>,

    /// Print the up and down edges of these nodes, with shortcuts unpacked.
    #[arg(long)]
    inspect: Vec<NodeId>,

    /// Logging verbosity level (`trace`, `debug`, `info`, `warn`, `error`).
    #[arg(short, long, default_value = "info")]
    verbosity: String,
}

impl Cli {
    fn pipeline_options(&self) -> PipelineOptions {
        PipelineOptions {
            order: self.order.clone(),
            write_order: self.write_order.clone(),
            c_pct: self.contraction_pct,
            contraction: ContractionConfig { max_expand: self.max_expand, ..Default::default() },
            sod: self.sod,
            dot: self.dot.clone(),
            summary: self.summary.clone(),
            show_progress: true,
        }
    }
}

/// Custom parser for `contraction_pct` to enforce range [0, 100]
fn parse_contraction_pct(s: &str) -> Result<u32, String> {
    let invalid = || HierarchyError::InvalidPercentage { value: s.to_owned() }.to_string();
    match s.parse::<u32>() {
        Ok(val) if val <= 100 => Ok(val),
        _ => Err(invalid()),
    }
}

fn main() -> Result<()> {
    let args = Cli::parse();

    // Conform to crate-standard logging.
    chp_core::logging::setup(&args.verbosity);
    info!("preprocessing {}", args.graph.display());

    let graph = read_edge_list(&args.graph)?;
    let (ch, summary) = pipeline::run(graph, &args.pipeline_options())?;
    info!(
        nodes = summary.num_nodes,
        edges = summary.output_edges,
        shortcuts = summary.shortcuts,
        stalled = summary.stalled,
        "contraction hierarchy ready"
    );

    for &node in &args.inspect {
        let report = inspect_node(&ch, node)?;
        println!("{}", serde_json::to_string_pretty(&report)?);
    }
    Ok(())
}
