//! The PAR graph: typed nodes with labeled, port-named multi-edges.
//!
//! Two structurally identical [`ParGraph`] instances participate in place
//! and route: the *netlist* (cell instances connected by signals) and the
//! *device* (physical sites connected by routing resources). Node labels are
//! caller-defined integers naming site types; equal labels across the two
//! graphs mean the nodes are interchangeable for placement.
//!
//! The graph is populated once via [`ParGraph::add_node`] and
//! [`ParGraph::add_edge`], then treated as immutable for the duration of
//! place and route. The per-label count and index tables are derived data,
//! built explicitly with [`ParGraph::count_labels`] and
//! [`ParGraph::index_nodes_by_label`] and invalidated by any structural
//! change.

use crate::ids::NodeId;
use serde::{Deserialize, Serialize};

/// A directed edge between two nodes of the same graph.
///
/// Edges are owned by their source node. The port names identify which
/// physical port of each endpoint carries the signal: in the device graph
/// they name real routing resources, in the netlist they name the logical
/// connection points on the cells.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    /// The node this edge leaves from.
    pub source: NodeId,
    /// The node this edge arrives at.
    pub dest: NodeId,
    /// Name of the port on the source node.
    pub source_port: String,
    /// Name of the port on the destination node.
    pub dest_port: String,
}

/// A node in a [`ParGraph`]: a site-type label, an opaque payload, and the
/// outgoing edges.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node<T> {
    label: u32,
    payload: T,
    edges: Vec<Edge>,
}

impl<T> Node<T> {
    /// Returns the site-type label of this node.
    pub fn label(&self) -> u32 {
        self.label
    }

    /// Returns the number of outgoing edges.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Returns the `index`-th outgoing edge.
    pub fn edge(&self, index: usize) -> &Edge {
        &self.edges[index]
    }

    /// Iterates over the outgoing edges in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.iter()
    }

    /// Returns the opaque payload attached to this node.
    pub fn payload(&self) -> &T {
        &self.payload
    }

    /// Returns a mutable reference to the payload.
    pub fn payload_mut(&mut self) -> &mut T {
        &mut self.payload
    }
}

/// A directed multigraph of labeled nodes, used for both the netlist and the
/// device fabric.
///
/// The payload type `T` is opaque to place and route; callers typically
/// store the cell object that will later serialize configuration bits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParGraph<T> {
    nodes: Vec<Node<T>>,
    edge_count: usize,
    next_label: u32,
    /// Per-label node counts; `None` until [`Self::count_labels`] runs.
    #[serde(skip)]
    label_counts: Option<Vec<u32>>,
    /// Per-label node lists; `None` until [`Self::index_nodes_by_label`] runs.
    #[serde(skip)]
    label_index: Option<Vec<Vec<NodeId>>>,
}

impl<T> ParGraph<T> {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            edge_count: 0,
            next_label: 0,
            label_counts: None,
            label_index: None,
        }
    }

    /// Reserves a fresh label, one greater than any label seen so far.
    ///
    /// Callers building a netlist/device pair allocate labels on both graphs
    /// in lockstep so that the same integer names the same site type in each.
    pub fn allocate_label(&mut self) -> u32 {
        let label = self.next_label;
        self.next_label += 1;
        label
    }

    /// Adds a node with the given label and payload, returning its handle.
    ///
    /// Invalidates the label tables.
    pub fn add_node(&mut self, label: u32, payload: T) -> NodeId {
        let id = NodeId::from_raw(self.nodes.len() as u32);
        self.nodes.push(Node {
            label,
            payload,
            edges: Vec::new(),
        });
        self.next_label = self.next_label.max(label + 1);
        self.label_counts = None;
        self.label_index = None;
        id
    }

    /// Adds a directed edge from `source` to `dest` with the given port names.
    ///
    /// Invalidates the label tables.
    pub fn add_edge(&mut self, source: NodeId, source_port: &str, dest: NodeId, dest_port: &str) {
        assert!(
            (dest.as_raw() as usize) < self.nodes.len(),
            "edge destination {dest} is not a node of this graph"
        );
        let edge = Edge {
            source,
            dest,
            source_port: source_port.to_owned(),
            dest_port: dest_port.to_owned(),
        };
        self.nodes[source.as_raw() as usize].edges.push(edge);
        self.edge_count += 1;
        self.label_counts = None;
        self.label_index = None;
    }

    /// Returns the number of nodes.
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the total number of edges across all nodes.
    pub fn num_edges(&self) -> usize {
        self.edge_count
    }

    /// Returns the node with the given handle.
    pub fn node(&self, id: NodeId) -> &Node<T> {
        &self.nodes[id.as_raw() as usize]
    }

    /// Returns a mutable reference to the node with the given handle.
    pub fn node_mut(&mut self, id: NodeId) -> &mut Node<T> {
        &mut self.nodes[id.as_raw() as usize]
    }

    /// Returns the largest label used or allocated anywhere in the graph,
    /// or 0 for a graph with no labels.
    pub fn max_label(&self) -> u32 {
        self.next_label.saturating_sub(1)
    }

    /// Iterates over all node handles in index order.
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> {
        (0..self.nodes.len() as u32).map(NodeId::from_raw)
    }

    /// Iterates over `(handle, node)` pairs in index order.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &Node<T>)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (NodeId::from_raw(i as u32), n))
    }

    /// Builds the per-label node count table.
    ///
    /// Must be called (after the last structural change) before
    /// [`Self::num_nodes_with_label`].
    pub fn count_labels(&mut self) {
        let mut counts = vec![0u32; self.max_label() as usize + 1];
        for node in &self.nodes {
            counts[node.label as usize] += 1;
        }
        self.label_counts = Some(counts);
    }

    /// Builds the label-to-nodes index table.
    ///
    /// Must be called (after the last structural change) before
    /// [`Self::node_by_label_and_index`].
    pub fn index_nodes_by_label(&mut self) {
        let mut index = vec![Vec::new(); self.max_label() as usize + 1];
        for (i, node) in self.nodes.iter().enumerate() {
            index[node.label as usize].push(NodeId::from_raw(i as u32));
        }
        self.label_index = Some(index);
    }

    /// Returns the number of nodes carrying the given label.
    ///
    /// Labels the graph has never seen count zero nodes.
    pub fn num_nodes_with_label(&self, label: u32) -> u32 {
        let counts = self
            .label_counts
            .as_ref()
            .expect("count_labels() must run before label count queries");
        counts.get(label as usize).copied().unwrap_or(0)
    }

    /// Returns the `index`-th node (in insertion order) carrying `label`.
    pub fn node_by_label_and_index(&self, label: u32, index: u32) -> NodeId {
        let table = self
            .label_index
            .as_ref()
            .expect("index_nodes_by_label() must run before label index queries");
        table[label as usize][index as usize]
    }
}

impl<T> Default for ParGraph<T> {
    fn default() -> Self {
        Self::new()
    }
}
