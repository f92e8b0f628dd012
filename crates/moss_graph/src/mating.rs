//! The cross-graph mating table pairing netlist cells with device sites.
//!
//! A mating is a partial bijection between the node sets of the netlist and
//! device graphs. It is kept as a side table rather than as mate pointers on
//! the nodes themselves, which leaves both graphs immutable during the
//! placement search and gives the engine an O(1) symmetric swap.

use crate::ids::NodeId;
use serde::{Deserialize, Serialize};

/// A partial bijection between netlist nodes and device nodes.
///
/// Symmetry is an invariant of this type: `site_of(n) == Some(s)` exactly
/// when `cell_at(s) == Some(n)`. Every mutation goes through [`Self::mate`],
/// which unlinks any prior partners of both endpoints before pairing them,
/// so the invariant cannot be observed broken.
///
/// Label compatibility between mates is *not* checked here; that is the
/// placement engine's contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mating {
    net_to_dev: Vec<Option<NodeId>>,
    dev_to_net: Vec<Option<NodeId>>,
}

impl Mating {
    /// Creates an empty mating for graphs of the given sizes.
    pub fn new(netlist_nodes: usize, device_nodes: usize) -> Self {
        Self {
            net_to_dev: vec![None; netlist_nodes],
            dev_to_net: vec![None; device_nodes],
        }
    }

    /// Returns the device site the given netlist cell is placed on.
    pub fn site_of(&self, cell: NodeId) -> Option<NodeId> {
        self.net_to_dev[cell.as_raw() as usize]
    }

    /// Returns the netlist cell occupying the given device site.
    pub fn cell_at(&self, site: NodeId) -> Option<NodeId> {
        self.dev_to_net[site.as_raw() as usize]
    }

    /// Pairs `cell` with `site`, unlinking any prior partner of either.
    ///
    /// After this call `site_of(cell) == Some(site)` and
    /// `cell_at(site) == Some(cell)`; the previous site of `cell` and the
    /// previous occupant of `site` (if any) are left unmated.
    pub fn mate(&mut self, cell: NodeId, site: NodeId) {
        if let Some(old_site) = self.net_to_dev[cell.as_raw() as usize] {
            self.dev_to_net[old_site.as_raw() as usize] = None;
        }
        if let Some(old_cell) = self.dev_to_net[site.as_raw() as usize] {
            self.net_to_dev[old_cell.as_raw() as usize] = None;
        }
        self.net_to_dev[cell.as_raw() as usize] = Some(site);
        self.dev_to_net[site.as_raw() as usize] = Some(cell);
    }

    /// Returns the number of mated netlist cells.
    pub fn mated_count(&self) -> usize {
        self.net_to_dev.iter().filter(|m| m.is_some()).count()
    }

    /// Returns whether every netlist cell has a site.
    pub fn is_complete(&self) -> bool {
        self.net_to_dev.iter().all(|m| m.is_some())
    }

    /// Verifies the symmetry invariant in both directions.
    ///
    /// Always true for matings mutated only through [`Self::mate`]; exposed
    /// so engine tests can assert it at arbitrary points in the search.
    pub fn is_symmetric(&self) -> bool {
        let forward = self.net_to_dev.iter().enumerate().all(|(i, m)| match m {
            Some(site) => {
                self.dev_to_net[site.as_raw() as usize] == Some(NodeId::from_raw(i as u32))
            }
            None => true,
        });
        let backward = self.dev_to_net.iter().enumerate().all(|(i, m)| match m {
            Some(cell) => {
                self.net_to_dev[cell.as_raw() as usize] == Some(NodeId::from_raw(i as u32))
            }
            None => true,
        });
        forward && backward
    }
}
