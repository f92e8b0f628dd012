//! Annealing place-and-route engine for the Moss toolchain.
//!
//! This crate assigns every node of a synthesized netlist graph to a
//! compatible site of a fixed device graph such that each netlist edge lands
//! on an available routing resource. The search runs in four stages:
//!
//! 1. **Feasibility** — reject designs whose per-label node counts exceed
//!    device capacity before any placement work
//! 2. **Initial placement** — deterministic label-then-index pairing
//! 3. **Optimization** — temperature-driven move/accept refinement steered
//!    by a device-specific [`PlacementStrategy`]
//! 4. **Audit** — enumerate any netlist edges still without a routing
//!    resource and report them
//!
//! # Usage
//!
//! ```
//! use moss_diagnostics::DiagnosticSink;
//! use moss_graph::ParGraph;
//! use moss_par::{place_and_route, NaiveStrategy};
//!
//! let mut netlist: ParGraph<&str> = ParGraph::new();
//! let mut device: ParGraph<&str> = ParGraph::new();
//! let lut = netlist.allocate_label();
//! assert_eq!(lut, device.allocate_label());
//!
//! let cell = netlist.add_node(lut, "inv_0");
//! let site = device.add_node(lut, "LUT2_0");
//!
//! let sink = DiagnosticSink::new();
//! let mating =
//!     place_and_route(&mut netlist, &mut device, NaiveStrategy, &sink, false, 0).unwrap();
//! assert_eq!(mating.site_of(cell), Some(site));
//! ```

#![warn(missing_docs)]

pub mod cost;
pub mod engine;
pub mod error;
pub mod strategy;

pub use cost::{edge_is_routable, unroutable_edges, CongestionMap, CostBreakdown};
pub use engine::{ParEngine, INITIAL_TEMPERATURE, STAGNATION_LIMIT};
pub use error::PlaceAndRouteError;
pub use strategy::{NaiveStrategy, ParContext, PlacementStrategy};

use moss_diagnostics::DiagnosticSink;
use moss_graph::{Mating, ParGraph};

/// Performs the complete place-and-route flow on a netlist/device pair.
///
/// Convenience wrapper over [`ParEngine`]: runs feasibility, initial
/// placement, and annealing refinement, and returns the final [`Mating`]
/// for downstream bitstream serialization. Identical
/// `(netlist, device, seed)` triples yield identical matings.
pub fn place_and_route<N, D, S>(
    netlist: &mut ParGraph<N>,
    device: &mut ParGraph<D>,
    strategy: S,
    sink: &DiagnosticSink,
    verbose: bool,
    seed: u32,
) -> Result<Mating, PlaceAndRouteError>
where
    S: PlacementStrategy<N, D>,
{
    let mut engine = ParEngine::new(netlist, device, strategy, sink);
    if engine.place_and_route(verbose, seed) {
        Ok(engine.into_mating())
    } else {
        Err(engine
            .error()
            .cloned()
            .expect("failed run must record an error"))
    }
}
