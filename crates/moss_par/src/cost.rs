//! Placement cost functions.
//!
//! Evaluates the quality of a mating as the unweighted sum of three
//! nonnegative sub-costs: unroutability (netlist edges with no matching
//! routing resource between the mated sites), congestion, and timing. The
//! base engine computes unroutability here; congestion and timing default to
//! zero and are supplied by device-specific strategies.
//!
//! Every function is a pure function of the current mating and the two
//! graphs, so an engine that rejects a move can revert by undoing the swap
//! alone.

use crate::strategy::ParContext;
use moss_graph::{Edge, NodeId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The three sub-costs of a placement and their sum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CostBreakdown {
    /// Number of netlist edges with no corresponding device routing edge.
    pub unroutability: u32,
    /// Strategy-computed congestion cost (0 for the base engine).
    pub congestion: u32,
    /// Strategy-computed timing cost (0 for the base engine).
    pub timing: u32,
}

impl CostBreakdown {
    /// Returns the total cost, the unweighted sum of the three sub-costs.
    pub fn total(&self) -> u32 {
        self.unroutability + self.congestion + self.timing
    }
}

/// Returns whether a single netlist edge is routable under the current mating.
///
/// The edge routes iff some outgoing edge of the mated source site reaches
/// the mated destination site on the same destination port. The source port
/// is intentionally not compared: sites on this class of device expose a
/// single outbound signal, so only the destination contract matters. An edge
/// with an unmated endpoint does not route.
pub fn edge_is_routable<N, D>(ctx: &ParContext<'_, N, D>, edge: &Edge) -> bool {
    let (Some(src_site), Some(dst_site)) = (
        ctx.mating.site_of(edge.source),
        ctx.mating.site_of(edge.dest),
    ) else {
        return false;
    };
    ctx.device
        .node(src_site)
        .edges()
        .any(|de| de.dest == dst_site && de.dest_port == edge.dest_port)
}

/// Enumerates every unroutable netlist edge under the current mating.
///
/// The returned list doubles as the unroutability cost (its length) and as
/// the diagnostic unroute list handed to
/// [`PlacementStrategy::print_unroutes`](crate::strategy::PlacementStrategy::print_unroutes).
pub fn unroutable_edges<N, D>(ctx: &ParContext<'_, N, D>) -> Vec<Edge> {
    let mut unroutes = Vec::new();
    for (_, node) in ctx.netlist.nodes() {
        for edge in node.edges() {
            if !edge_is_routable(ctx, edge) {
                unroutes.push(edge.clone());
            }
        }
    }
    unroutes
}

/// Per-routing-resource claim counts for congestion estimation.
///
/// Each routed netlist edge claims the first device edge that satisfies it.
/// A device edge claimed by more than one netlist edge is overused; the
/// overuse count is the congestion figure a device-aware strategy reports
/// through its congestion hook. The base engine does not consult this map.
#[derive(Debug, Clone, Default)]
pub struct CongestionMap {
    /// Claims per device edge, keyed by (source site, edge index).
    demand: HashMap<(NodeId, usize), u32>,
}

impl CongestionMap {
    /// Builds the claim map for the current mating.
    pub fn from_context<N, D>(ctx: &ParContext<'_, N, D>) -> Self {
        let mut map = Self::default();
        for (_, node) in ctx.netlist.nodes() {
            for edge in node.edges() {
                let (Some(src_site), Some(dst_site)) = (
                    ctx.mating.site_of(edge.source),
                    ctx.mating.site_of(edge.dest),
                ) else {
                    continue;
                };
                let claimed = ctx
                    .device
                    .node(src_site)
                    .edges()
                    .position(|de| de.dest == dst_site && de.dest_port == edge.dest_port);
                if let Some(index) = claimed {
                    map.add_claim(src_site, index);
                }
            }
        }
        map
    }

    /// Records a claim on the given device edge.
    pub fn add_claim(&mut self, site: NodeId, edge_index: usize) {
        *self.demand.entry((site, edge_index)).or_insert(0) += 1;
    }

    /// Returns whether any device edge carries more than one signal.
    pub fn has_congestion(&self) -> bool {
        self.demand.values().any(|&d| d > 1)
    }

    /// Returns the number of device edges claimed by more than one netlist edge.
    pub fn overused_count(&self) -> u32 {
        self.demand.values().filter(|&&d| d > 1).count() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use moss_graph::{Mating, ParGraph};

    fn ctx<'a>(
        netlist: &'a ParGraph<()>,
        device: &'a ParGraph<()>,
        mating: &'a Mating,
    ) -> ParContext<'a, (), ()> {
        ParContext {
            netlist,
            device,
            mating,
        }
    }

    /// One netlist edge A->B on port "D", one matching device edge.
    fn routed_pair() -> (ParGraph<()>, ParGraph<()>, Mating) {
        let mut netlist = ParGraph::new();
        let na = netlist.add_node(0, ());
        let nb = netlist.add_node(1, ());
        netlist.add_edge(na, "OUT", nb, "D");

        let mut device = ParGraph::new();
        let da = device.add_node(0, ());
        let db = device.add_node(1, ());
        device.add_edge(da, "OUT", db, "D");

        let mut mating = Mating::new(2, 2);
        mating.mate(na, da);
        mating.mate(nb, db);
        (netlist, device, mating)
    }

    #[test]
    fn cost_breakdown_total() {
        let cost = CostBreakdown {
            unroutability: 3,
            congestion: 2,
            timing: 1,
        };
        assert_eq!(cost.total(), 6);
        assert_eq!(CostBreakdown::default().total(), 0);
    }

    #[test]
    fn matched_edge_routes() {
        let (netlist, device, mating) = routed_pair();
        let c = ctx(&netlist, &device, &mating);
        assert!(unroutable_edges(&c).is_empty());
    }

    #[test]
    fn wrong_dest_port_does_not_route() {
        let mut netlist = ParGraph::new();
        let na = netlist.add_node(0, ());
        let nb = netlist.add_node(1, ());
        netlist.add_edge(na, "OUT", nb, "CLK");

        let mut device = ParGraph::new();
        let da = device.add_node(0, ());
        let db = device.add_node(1, ());
        device.add_edge(da, "OUT", db, "D");

        let mut mating = Mating::new(2, 2);
        mating.mate(na, da);
        mating.mate(nb, db);

        let c = ctx(&netlist, &device, &mating);
        let unroutes = unroutable_edges(&c);
        assert_eq!(unroutes.len(), 1);
        assert_eq!(unroutes[0].dest_port, "CLK");
    }

    #[test]
    fn source_port_is_not_compared() {
        let mut netlist = ParGraph::new();
        let na = netlist.add_node(0, ());
        let nb = netlist.add_node(1, ());
        netlist.add_edge(na, "Q", nb, "D");

        let mut device = ParGraph::new();
        let da = device.add_node(0, ());
        let db = device.add_node(1, ());
        device.add_edge(da, "OUT3", db, "D");

        let mut mating = Mating::new(2, 2);
        mating.mate(na, da);
        mating.mate(nb, db);

        let c = ctx(&netlist, &device, &mating);
        assert!(unroutable_edges(&c).is_empty());
    }

    #[test]
    fn wrong_dest_site_does_not_route() {
        let mut netlist = ParGraph::new();
        let na = netlist.add_node(0, ());
        let nb = netlist.add_node(0, ());
        netlist.add_edge(na, "OUT", nb, "D");

        let mut device = ParGraph::new();
        let da = device.add_node(0, ());
        let db = device.add_node(0, ());
        let dc = device.add_node(0, ());
        // The only edge from da goes to dc, but nb sits on db
        device.add_edge(da, "OUT", dc, "D");

        let mut mating = Mating::new(2, 3);
        mating.mate(na, da);
        mating.mate(nb, db);

        let c = ctx(&netlist, &device, &mating);
        assert_eq!(unroutable_edges(&c).len(), 1);
    }

    #[test]
    fn unmated_endpoint_does_not_route() {
        let (netlist, device, _) = routed_pair();
        let mating = Mating::new(2, 2);
        let c = ctx(&netlist, &device, &mating);
        assert_eq!(unroutable_edges(&c).len(), 1);
    }

    #[test]
    fn congestion_single_claim() {
        let (netlist, device, mating) = routed_pair();
        let c = ctx(&netlist, &device, &mating);
        let map = CongestionMap::from_context(&c);
        assert!(!map.has_congestion());
        assert_eq!(map.overused_count(), 0);
    }

    #[test]
    fn congestion_double_claim() {
        // Two netlist edges A->B on the same port, one device routing edge
        let mut netlist = ParGraph::new();
        let na = netlist.add_node(0, ());
        let nb = netlist.add_node(1, ());
        netlist.add_edge(na, "OUT", nb, "D");
        netlist.add_edge(na, "OUT2", nb, "D");

        let mut device = ParGraph::new();
        let da = device.add_node(0, ());
        let db = device.add_node(1, ());
        device.add_edge(da, "OUT", db, "D");

        let mut mating = Mating::new(2, 2);
        mating.mate(na, da);
        mating.mate(nb, db);

        let c = ctx(&netlist, &device, &mating);
        let map = CongestionMap::from_context(&c);
        assert!(map.has_congestion());
        assert_eq!(map.overused_count(), 1);
    }

    #[test]
    fn unrouted_edges_claim_nothing() {
        let (netlist, device, _) = routed_pair();
        let mating = Mating::new(2, 2);
        let c = ctx(&netlist, &device, &mating);
        let map = CongestionMap::from_context(&c);
        assert!(!map.has_congestion());
    }

    #[test]
    fn cost_breakdown_serde_roundtrip() {
        let cost = CostBreakdown {
            unroutability: 1,
            congestion: 0,
            timing: 2,
        };
        let json = serde_json::to_string(&cost).unwrap();
        let back: CostBreakdown = serde_json::from_str(&json).unwrap();
        assert_eq!(cost, back);
    }
}
