use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use anyhow::Result;
use chp_core::errors::*;
use chp_core::graph::ShortcutResult;
use chp_core::{
    ChData,
    Edge,
    Graph,
    NodeId,
    Weight,
};
use itertools::Itertools;
use serde::Serialize;
use tracing::{
    debug,
    info,
    instrument,
};

use super::closure::compute_closure;
use super::order::validate_order;
use super::witness::{
    BidirectionalWitness,
    WitnessQuery,
    WitnessSearch,
};

/// Where a node stands in the contraction sequence.
///
/// Contracted nodes keep all of their edges in the graph; witness searches skip every node that is
/// not [`NodeState::Uncontracted`] instead. The graph at any point is therefore the union of every
/// core graph seen so far, and the final graph is the hierarchy.
#[derive(Clone, Copy, Debug, Default, Hash, PartialEq, Eq, Serialize)]
pub enum NodeState {
    /// Still part of the core graph.
    #[default]
    Uncontracted,
    /// Its neighbour pairs are being examined right now.
    BeingContracted,
    /// Removed from the core graph.
    Contracted {
        /// Position of the node in the contraction sequence.
        iteration: usize,
    },
}

/// Tuning knobs for the witness search budget.
///
/// Unless `max_expand` pins it, the budget for contracting `x` is the size of `x`'s
/// `neighbourhood_depth`-hop out-neighbourhood times `expansion_factor`, and never less than
/// `min_expand`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ContractionConfig {
    /// Fixed expansion budget for every witness search.
    pub max_expand: Option<u32>,
    /// Hop depth of the neighbourhood the derived budget is based on.
    pub neighbourhood_depth: u32,
    /// Expansions allowed per node of that neighbourhood.
    pub expansion_factor: u32,
    /// Lower bound of the derived budget.
    pub min_expand: u32,
}

impl Default for ContractionConfig {
    fn default() -> Self {
        Self { max_expand: None, neighbourhood_depth: 2, expansion_factor: 8, min_expand: 64 }
    }
}

/// Counters collected during one [`FixedGraphContraction::contract`] run.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ContractionStats {
    /// Nodes contracted.
    pub contracted: usize,
    /// Nodes left in the uncontracted core.
    pub core_size: usize,
    /// Shortcuts appended to the graph.
    pub shortcuts_added: usize,
    /// Existing shortcuts that got a lighter weight.
    pub shortcuts_shortened: usize,
    /// Witness searches run.
    pub witness_searches: u64,
    /// Searches that proved a shortcut redundant.
    pub witnesses_found: u64,
    /// Searches that ran out of budget before finding a witness.
    pub budget_exhausted: u64,
    /// Node expansions over all witness searches.
    pub witness_expansions: u64,
}

/// Contracts the nodes of a graph in a fixed, caller-supplied order.
///
/// The contractor is reusable: every call to [`contract`](Self::contract) starts from a clean
/// slate, and the witness search's scratch space is kept across calls.
#[derive(Debug)]
pub struct FixedGraphContraction<W = BidirectionalWitness> {
    config: ContractionConfig,
    witness: W,
    order: Vec<NodeId>,
    order_index: usize,
    states: Vec<NodeState>,
    stats: ContractionStats,
}

impl FixedGraphContraction {
    /// A contractor using bidirectional witness searches.
    #[must_use]
    pub fn new(config: ContractionConfig) -> Self {
        Self::with_witness(config, BidirectionalWitness::new())
    }
}

impl<W: WitnessSearch> FixedGraphContraction<W> {
    /// A contractor using `witness` to decide which shortcuts are needed.
    pub fn with_witness(config: ContractionConfig, witness: W) -> Self {
        Self {
            config,
            witness,
            order: vec![],
            order_index: 0,
            states: vec![],
            stats: ContractionStats::default(),
        }
    }

    /// The order used by the last contraction run, lowest rank first.
    #[must_use]
    pub fn get_order(&self) -> &[NodeId] {
        &self.order
    }

    /// State of `node` after the last run.
    #[must_use]
    pub fn node_state(&self, node: NodeId) -> NodeState {
        self.states.get(node as usize).copied().unwrap_or_default()
    }

    /// Counters of the last run.
    #[must_use]
    pub const fn stats(&self) -> &ContractionStats {
        &self.stats
    }

    /// Contract the nodes of `ch.graph` in `order`, inserting shortcuts, and assign
    /// `ch.level[order[i]] = i` for every node.
    ///
    /// Only the first `floor(n * c_pct / 100)` nodes of the order are contracted; the rest form an
    /// uncontracted core that keeps its ranks. `c_pct` is clamped to 100.
    ///
    /// Fails without touching `ch` if `order` is not a permutation of the graph's node ids.
    pub fn contract(&mut self, ch: &mut ChData, order: &[NodeId], c_pct: u32) -> Result<ContractionStats> {
        self.contract_with_progress(ch, order, c_pct, |_| {})
    }

    /// Like [`contract`](Self::contract), calling `progress_callback` with the number of contracted
    /// nodes after each contraction.
    #[instrument(skip_all, fields(num_nodes = ch.num_nodes(), c_pct = c_pct))]
    pub fn contract_with_progress<F>(
        &mut self,
        ch: &mut ChData,
        order: &[NodeId],
        c_pct: u32,
        mut progress_callback: F,
    ) -> Result<ContractionStats>
    where
        F: FnMut(usize),
    {
        let num_nodes = ch.num_nodes();
        validate_order(order, num_nodes).context("refusing to contract")?;
        self.preliminaries(ch, order);

        let target = contraction_target(num_nodes, c_pct);
        info!(target, core = num_nodes - target, "contracting nodes in fixed order");

        while self.order_index < target {
            let Some(x) = self.next_contraction() else { break };
            self.contract_node(ch, x);
            progress_callback(self.order_index);
        }

        self.stats.contracted = self.order_index;
        self.stats.core_size = num_nodes - self.order_index;
        debug_assert!(ch.graph.is_symmetric(), "contraction broke adjacency mirroring");

        info!(
            contracted = self.stats.contracted,
            shortcuts = self.stats.shortcuts_added,
            shortened = self.stats.shortcuts_shortened,
            searches = self.stats.witness_searches,
            "contraction finished"
        );
        Ok(self.stats.clone())
    }

    /// Reset per-run state and store the ranks.
    fn preliminaries(&mut self, ch: &mut ChData, order: &[NodeId]) {
        let num_nodes = ch.num_nodes();
        self.order = order.to_vec();
        self.order_index = 0;
        self.states = vec![NodeState::Uncontracted; num_nodes];
        self.stats = ContractionStats::default();

        ch.level = vec![0; num_nodes];
        for (rank, &id) in (0..).zip(order) {
            ch.level[id as usize] = rank;
        }
        ch.up_degree = vec![0; num_nodes];
    }

    fn next_contraction(&mut self) -> Option<NodeId> {
        let next = *self.order.get(self.order_index)?;
        self.order_index += 1;
        Some(next)
    }

    fn witness_budget(&self, g: &Graph, x: NodeId) -> u32 {
        self.config.max_expand.unwrap_or_else(|| {
            let neighbourhood = compute_closure(x, g, Some(self.config.neighbourhood_depth)).len();
            u32::try_from(neighbourhood)
                .unwrap_or(u32::MAX)
                .saturating_mul(self.config.expansion_factor)
                .max(self.config.min_expand)
        })
    }

    /// Remove `x` from the core, inserting a shortcut `u -> v` for every uncontracted in/out
    /// neighbour pair whose shortest path needs `x`.
    fn contract_node(&mut self, ch: &mut ChData, x: NodeId) {
        let iteration = self.order_index - 1;
        self.states[x as usize] = NodeState::BeingContracted;

        let g = &ch.graph;
        let incoming = lightest_neighbours(g.node(x).incoming(), x, &self.states);
        let outgoing = lightest_neighbours(g.node(x).outgoing(), x, &self.states);
        let max_expand = self.witness_budget(g, x);

        // Shortcuts are applied only once every pair has been examined, so all searches for `x`
        // see the same core graph.
        let mut shortcuts = vec![];
        for (&(u, w_in), &(v, w_out)) in incoming.iter().cartesian_product(outgoing.iter()) {
            if u == v {
                continue;
            }

            let via_len = w_in + w_out;
            let outcome = self.witness.search(g, &self.states, WitnessQuery { from: u, to: v, via_len, max_expand });
            self.stats.witness_searches += 1;
            self.stats.witness_expansions += u64::from(outcome.expanded);

            if outcome.is_witness_for(via_len) {
                self.stats.witnesses_found += 1;
                continue;
            }
            if outcome.expanded >= max_expand {
                self.stats.budget_exhausted += 1;
            }
            shortcuts.push((u, v, via_len));
        }

        for (u, v, wt) in shortcuts {
            match ch.graph.insert_or_decrease_shortcut(u, v, wt, x) {
                ShortcutResult::NewShortcut => {
                    debug!("adding shortcut {u} -> {v} ({wt}) via {x}");
                    self.stats.shortcuts_added += 1;
                },
                ShortcutResult::ShortenedExisting => {
                    debug!("shortening shortcut {u} -> {v} to {wt} via {x}");
                    self.stats.shortcuts_shortened += 1;
                },
                ShortcutResult::ShorterExisting => (),
            }
        }

        self.states[x as usize] = NodeState::Contracted { iteration };
    }
}

/// Uncontracted neighbours other than `x` with the lightest weight of their parallel edges,
/// ordered by node id.
fn lightest_neighbours(edges: &[Edge], x: NodeId, states: &[NodeState]) -> Vec<(NodeId, Weight)> {
    let mut lightest = BTreeMap::new();
    for e in edges {
        if e.node_id == x || states[e.node_id as usize] != NodeState::Uncontracted {
            continue;
        }
        match lightest.entry(e.node_id) {
            Entry::Vacant(slot) => {
                slot.insert(e.wt);
            },
            Entry::Occupied(mut slot) => {
                if e.wt < *slot.get() {
                    slot.insert(e.wt);
                }
            },
        }
    }
    lightest.into_iter().collect()
}

/// Number of nodes to contract for a contraction percentage, clamped to 100.
fn contraction_target(num_nodes: usize, c_pct: u32) -> usize {
    num_nodes * c_pct.min(100) as usize / 100
}
