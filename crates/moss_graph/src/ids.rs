//! Opaque ID newtype for graph nodes.
//!
//! [`NodeId`] is a thin `u32` wrapper used as an arena index into a
//! [`ParGraph`](crate::ParGraph). It is `Copy`, `Hash`, and
//! `Serialize`/`Deserialize`. A `NodeId` is only meaningful together with
//! the graph that issued it; the netlist and device graphs each have their
//! own independent ID space.

use serde::{Deserialize, Serialize};

/// Opaque, copyable ID for a node in a [`ParGraph`](crate::ParGraph).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub struct NodeId(u32);

impl NodeId {
    /// Creates an ID from a raw `u32` index.
    pub fn from_raw(index: u32) -> Self {
        Self(index)
    }

    /// Returns the raw `u32` index.
    pub fn as_raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
