//! Bipartite graph model for the Moss place-and-route core.
//!
//! This crate provides the two graphs that participate in place and route
//! (the synthesized *netlist* and the fixed *device* fabric) as instances of
//! one structurally identical type, [`ParGraph`], plus the [`Mating`] table
//! that pairs their nodes. Nodes carry integer site-type labels and opaque
//! payloads; edges carry named source/destination ports.
//!
//! # Usage
//!
//! ```
//! use moss_graph::{Mating, ParGraph};
//!
//! let mut netlist: ParGraph<&str> = ParGraph::new();
//! let mut device: ParGraph<&str> = ParGraph::new();
//!
//! // Allocate labels in lockstep so both graphs agree on site types.
//! let lut = netlist.allocate_label();
//! assert_eq!(lut, device.allocate_label());
//!
//! let cell = netlist.add_node(lut, "my_lut");
//! let site = device.add_node(lut, "LUT0");
//!
//! let mut mating = Mating::new(netlist.num_nodes(), device.num_nodes());
//! mating.mate(cell, site);
//! assert_eq!(mating.site_of(cell), Some(site));
//! ```

#![warn(missing_docs)]

pub mod graph;
pub mod ids;
pub mod mating;

pub use graph::{Edge, Node, ParGraph};
pub use ids::NodeId;
pub use mating::Mating;
