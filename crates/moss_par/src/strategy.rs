//! Device-specific placement hooks.
//!
//! The engine itself is generic: it knows how to pair labels, swap mates,
//! and score a mating, but not which cells are worth moving or which sites
//! are worth trying. That intelligence lives behind [`PlacementStrategy`],
//! implemented once per device family. [`NaiveStrategy`] is the baseline
//! implementation the engine's own tests run against.

use crate::cost;
use moss_graph::{Edge, Mating, NodeId, ParGraph};
use rand::rngs::StdRng;
use rand::Rng;

/// The engine state handed to strategy hooks: both graphs and the current
/// mating, all read-only.
pub struct ParContext<'a, N, D> {
    /// The synthesized netlist graph.
    pub netlist: &'a ParGraph<N>,
    /// The fixed device graph.
    pub device: &'a ParGraph<D>,
    /// The current cell-to-site pairing.
    pub mating: &'a Mating,
}

/// Hooks a device family implements to steer the placement search.
///
/// The two required methods concentrate all device-aware intelligence; the
/// engine stays generic. Implementations must be deterministic given the
/// same random draws. All randomness flows through the `rng` the engine
/// passes in, so that a fixed seed reproduces a run exactly.
pub trait PlacementStrategy<N, D> {
    /// Returns the netlist nodes currently considered badly placed.
    ///
    /// An empty result tells the engine there is nothing left to improve and
    /// ends the optimization loop. The engine picks its pivot uniformly at
    /// random from this set, so the order should be deterministic.
    fn find_suboptimal_placements(&mut self, ctx: &ParContext<'_, N, D>) -> Vec<NodeId>;

    /// Proposes a candidate device site for the pivot node, or `None` if the
    /// strategy has no suggestion this iteration.
    ///
    /// The returned site must carry the pivot's label; proposing an
    /// incompatible site is a strategy bug and aborts the run.
    fn new_placement_for(
        &mut self,
        ctx: &ParContext<'_, N, D>,
        pivot: NodeId,
        rng: &mut StdRng,
    ) -> Option<NodeId>;

    /// Congestion sub-cost for the current mating.
    ///
    /// The base implementation performs no congestion analysis. Device
    /// strategies typically report
    /// [`CongestionMap::overused_count`](crate::cost::CongestionMap::overused_count).
    fn congestion_cost(&self, _ctx: &ParContext<'_, N, D>) -> u32 {
        0
    }

    /// Timing sub-cost for the current mating.
    ///
    /// The base implementation performs no timing analysis.
    fn timing_cost(&self, _ctx: &ParContext<'_, N, D>) -> u32 {
        0
    }

    /// Renders the final unroute list when the run fails.
    ///
    /// The default prints one stderr line per edge in terms of node handles
    /// and port names; device strategies usually override this with cell
    /// names from their payloads.
    fn print_unroutes(&self, _ctx: &ParContext<'_, N, D>, unroutes: &[Edge]) {
        for edge in unroutes {
            eprintln!(
                "    unroutable: node {} port {} -> node {} port {}",
                edge.source, edge.source_port, edge.dest, edge.dest_port
            );
        }
    }
}

/// The baseline strategy: move the endpoints of unrouted edges to random
/// compatible sites.
///
/// Suboptimal nodes are exactly the netlist endpoints of currently-unrouted
/// edges, deduplicated and in ascending handle order. A candidate site is
/// drawn uniformly from the device nodes carrying the pivot's label, the
/// current site excluded. No congestion or timing analysis is performed.
#[derive(Debug, Default)]
pub struct NaiveStrategy;

impl<N, D> PlacementStrategy<N, D> for NaiveStrategy {
    fn find_suboptimal_placements(&mut self, ctx: &ParContext<'_, N, D>) -> Vec<NodeId> {
        let mut bad = std::collections::BTreeSet::new();
        for edge in cost::unroutable_edges(ctx) {
            bad.insert(edge.source);
            bad.insert(edge.dest);
        }
        bad.into_iter().collect()
    }

    fn new_placement_for(
        &mut self,
        ctx: &ParContext<'_, N, D>,
        pivot: NodeId,
        rng: &mut StdRng,
    ) -> Option<NodeId> {
        let label = ctx.netlist.node(pivot).label();
        let current = ctx.mating.site_of(pivot);
        let candidates: Vec<NodeId> = ctx
            .device
            .nodes()
            .filter(|(id, node)| node.label() == label && Some(*id) != current)
            .map(|(id, _)| id)
            .collect();
        if candidates.is_empty() {
            return None;
        }
        Some(candidates[rng.gen_range(0..candidates.len())])
    }
}
