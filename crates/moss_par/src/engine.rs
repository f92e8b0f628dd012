//! The annealing place-and-route engine.
//!
//! Pairs every netlist node with a compatible device site, then refines the
//! pairing with temperature-driven local search until nothing improves. The
//! flow is: feasibility gate, deterministic initial placement, iterative
//! move/accept loop, final routability audit. Device-specific intelligence
//! enters through a [`PlacementStrategy`].

use crate::cost::{self, CostBreakdown};
use crate::error::PlaceAndRouteError;
use crate::strategy::{ParContext, PlacementStrategy};
use moss_diagnostics::{Category, Diagnostic, DiagnosticCode, DiagnosticSink};
use moss_graph::{Edge, Mating, NodeId, ParGraph};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Starting value of the annealing temperature.
///
/// Acceptance of cost-increasing moves is `rng % 100 < temperature`, so the
/// search begins fully permissive and cools linearly to pure greed.
pub const INITIAL_TEMPERATURE: u32 = 100;

/// Number of consecutive iterations without a new best cost before the loop
/// gives up.
pub const STAGNATION_LIMIT: u32 = 5;

/// The place-and-route engine.
///
/// Borrows the netlist and device graphs for the duration of the run; only
/// the engine-owned [`Mating`] mutates after construction (the graphs'
/// derived label tables are rebuilt in place during the run, but the node
/// and edge structure is never touched). All randomness flows through a
/// single PRNG seeded in [`Self::place_and_route`], so identical
/// `(netlist, device, seed)` triples reproduce identical runs.
pub struct ParEngine<'g, N, D, S> {
    netlist: &'g mut ParGraph<N>,
    device: &'g mut ParGraph<D>,
    strategy: S,
    sink: &'g DiagnosticSink,
    mating: Mating,
    temperature: u32,
    cost_history: Vec<CostBreakdown>,
    unroutes: Vec<Edge>,
    error: Option<PlaceAndRouteError>,
}

impl<'g, N, D, S: PlacementStrategy<N, D>> ParEngine<'g, N, D, S> {
    /// Creates an engine over the given graphs.
    pub fn new(
        netlist: &'g mut ParGraph<N>,
        device: &'g mut ParGraph<D>,
        strategy: S,
        sink: &'g DiagnosticSink,
    ) -> Self {
        let mating = Mating::new(netlist.num_nodes(), device.num_nodes());
        Self {
            netlist,
            device,
            strategy,
            sink,
            mating,
            temperature: INITIAL_TEMPERATURE,
            cost_history: Vec::new(),
            unroutes: Vec::new(),
            error: None,
        }
    }

    /// Runs the complete place-and-route flow.
    ///
    /// Returns `true` iff the final mating has zero unroutable edges.
    /// Progress goes to stdout (initialization and placement messages only
    /// when `verbose`; the per-iteration cost line always); failures go to
    /// stderr and the diagnostic sink.
    pub fn place_and_route(&mut self, verbose: bool, seed: u32) -> bool {
        if verbose {
            println!("\nMoss PAR initializing...");
        }
        self.temperature = INITIAL_TEMPERATURE;
        self.mating = Mating::new(self.netlist.num_nodes(), self.device.num_nodes());
        self.cost_history.clear();
        self.unroutes.clear();
        self.error = None;
        let mut rng = StdRng::seed_from_u64(u64::from(seed));

        if let Err(err) = self.sanity_check(verbose) {
            let number = match err {
                PlaceAndRouteError::LabelOutOfRange { .. } => 102,
                _ => 101,
            };
            return self.fail(DiagnosticCode::new(Category::Feasibility, number), err);
        }

        self.initial_placement(verbose);
        self.optimize(&mut rng);

        // The loop may exit on stagnation or temperature with work left over
        let ctx = ParContext {
            netlist: &*self.netlist,
            device: &*self.device,
            mating: &self.mating,
        };
        let unroutes = cost::unroutable_edges(&ctx);
        if !unroutes.is_empty() {
            let err = PlaceAndRouteError::Unroutable {
                unrouted: unroutes.len(),
            };
            eprintln!("ERROR: {err}");
            self.strategy.print_unroutes(&ctx, &unroutes);
            self.sink.emit(Diagnostic::error(
                DiagnosticCode::new(Category::Routing, 301),
                err.to_string(),
            ));
            self.unroutes = unroutes;
            self.error = Some(err);
            return false;
        }

        true
    }

    /// Rejects designs that cannot fit no matter how they are placed.
    ///
    /// A netlist label past the device's largest, or more netlist nodes of
    /// some label than the device has sites, is unfixable by search; the
    /// check runs in O(nodes + labels) before any placement work.
    fn sanity_check(&mut self, verbose: bool) -> Result<(), PlaceAndRouteError> {
        if verbose {
            println!("Initial design feasibility check...");
        }

        let netlist_max = self.netlist.max_label();
        let device_max = self.device.max_label();
        if netlist_max > device_max {
            return Err(PlaceAndRouteError::LabelOutOfRange {
                netlist_max,
                device_max,
            });
        }

        self.netlist.count_labels();
        self.device.count_labels();

        for label in 0..=netlist_max {
            let required = self.netlist.num_nodes_with_label(label);
            let available = self.device.num_nodes_with_label(label);
            if required > available {
                return Err(PlaceAndRouteError::CapacityExceeded {
                    label,
                    required,
                    available,
                });
            }
        }

        Ok(())
    }

    /// Produces a legal but not necessarily routable starting mating.
    ///
    /// Pairs netlist and device nodes in label-then-index order. Deliberately
    /// deterministic: a reproducible starting state is worth more than a
    /// good one, since the optimizer owns quality. The feasibility gate has
    /// already guaranteed enough sites for every label.
    fn initial_placement(&mut self, verbose: bool) {
        if verbose {
            println!(
                "Global placement of {} instances into {} sites...",
                self.netlist.num_nodes(),
                self.device.num_nodes()
            );
            println!(
                "    {} nets, {} routing channels available",
                self.netlist.num_edges(),
                self.device.num_edges()
            );
        }

        self.netlist.index_nodes_by_label();
        self.device.index_nodes_by_label();

        for label in 0..=self.netlist.max_label() {
            for k in 0..self.netlist.num_nodes_with_label(label) {
                let cell = self.netlist.node_by_label_and_index(label, k);
                let site = self.device.node_by_label_and_index(label, k);
                self.mating.mate(cell, site);
            }
        }
    }

    /// The temperature-driven move/accept loop.
    ///
    /// Each pass scores and prints the current mating, then asks the
    /// strategy for a pivot pool and a candidate site, swaps, and keeps or
    /// reverts the swap. Exits when the temperature reaches zero, the
    /// strategy has nothing to offer, or the best cost stagnates.
    fn optimize(&mut self, rng: &mut StdRng) {
        let mut iteration: u32 = 0;
        let mut best_cost = u32::MAX;
        let mut iterations_since_best: u32 = 0;

        loop {
            let cost = self.compute_cost();
            println!(
                "Optimizing placement (iteration {})\n    \
                 unroutability cost {}, congestion cost {}, timing cost {} (total {})",
                iteration,
                cost.unroutability,
                cost.congestion,
                cost.timing,
                cost.total()
            );
            self.cost_history.push(cost);
            iterations_since_best += 1;
            iteration += 1;

            if cost.total() < best_cost {
                best_cost = cost.total();
                iterations_since_best = 0;
            }
            if iterations_since_best >= STAGNATION_LIMIT {
                break;
            }
            if self.temperature == 0 {
                break;
            }

            let ctx = ParContext {
                netlist: &*self.netlist,
                device: &*self.device,
                mating: &self.mating,
            };
            let bad = self.strategy.find_suboptimal_placements(&ctx);
            if bad.is_empty() {
                break;
            }

            let pivot = bad[rng.gen_range(0..bad.len())];
            self.try_move(pivot, rng);
            self.temperature -= 1;
        }
    }

    /// Attempts one move of `pivot` to a strategy-proposed site.
    ///
    /// A strictly better mating is kept; a worse-or-equal one is kept with
    /// probability `temperature / 100` and reverted otherwise. A declined
    /// proposal (no candidate site) leaves the mating untouched.
    fn try_move(&mut self, pivot: NodeId, rng: &mut StdRng) {
        let ctx = ParContext {
            netlist: &*self.netlist,
            device: &*self.device,
            mating: &self.mating,
        };
        let Some(new_site) = self.strategy.new_placement_for(&ctx, pivot, rng) else {
            return;
        };
        let old_site = self
            .mating
            .site_of(pivot)
            .expect("pivot must be mated after initial placement");

        let old_cost = self.compute_cost().total();
        self.move_node(pivot, new_site);
        let new_cost = self.compute_cost().total();

        if new_cost < old_cost {
            return;
        }
        if rng.gen_range(0..100) < self.temperature {
            return;
        }
        self.move_node(pivot, old_site);
    }

    /// Moves a netlist node to a new device site, swapping with any current
    /// occupant.
    ///
    /// The swap preserves both the mating symmetry invariant and the
    /// per-label mated counts. A label mismatch means a strategy proposed an
    /// incompatible site; the engine panics rather than continue with a
    /// mating it can no longer trust.
    pub fn move_node(&mut self, cell: NodeId, new_site: NodeId) {
        let cell_label = self.netlist.node(cell).label();
        let site_label = self.device.node(new_site).label();
        if cell_label != site_label {
            panic!(
                "internal error: tried to assign netlist node {cell} (label {cell_label}) \
                 to device site {new_site} (label {site_label})"
            );
        }

        if let Some(displaced) = self.mating.cell_at(new_site) {
            if let Some(old_site) = self.mating.site_of(cell) {
                self.mating.mate(displaced, old_site);
            }
        }
        self.mating.mate(cell, new_site);
    }

    /// Scores the current mating. Pure in the mating: two calls with no
    /// intervening move return the same breakdown.
    fn compute_cost(&self) -> CostBreakdown {
        let ctx = ParContext {
            netlist: &*self.netlist,
            device: &*self.device,
            mating: &self.mating,
        };
        CostBreakdown {
            unroutability: cost::unroutable_edges(&ctx).len() as u32,
            congestion: self.strategy.congestion_cost(&ctx),
            timing: self.strategy.timing_cost(&ctx),
        }
    }

    /// Reports a failure to stderr and the sink, records it, and returns `false`.
    fn fail(&mut self, code: DiagnosticCode, err: PlaceAndRouteError) -> bool {
        eprintln!("ERROR: {err}");
        self.sink.emit(Diagnostic::error(code, err.to_string()));
        self.error = Some(err);
        false
    }

    /// Returns the current mating.
    pub fn mating(&self) -> &Mating {
        &self.mating
    }

    /// Consumes the engine, releasing the graph borrows and yielding the
    /// final mating for downstream bitstream serialization.
    pub fn into_mating(self) -> Mating {
        self.mating
    }

    /// Returns the per-iteration cost breakdowns of the last run.
    pub fn cost_history(&self) -> &[CostBreakdown] {
        &self.cost_history
    }

    /// Returns the unrouted edges left by a failed run.
    pub fn unroutes(&self) -> &[Edge] {
        &self.unroutes
    }

    /// Returns the failure of the last run, if any.
    pub fn error(&self) -> Option<&PlaceAndRouteError> {
        self.error.as_ref()
    }
}
