//! Graph: the bipartite operation/variable container.
//!
//! [`Graph`] owns every [`Node`] and the directed links between them. Links
//! added through [`Graph::add_link`] always join an operation and a variable:
//! `var -> op` means the operation reads the variable, `op -> var` means it
//! produces it. A deserialized graph is taken as-is; links that break this
//! shape are reported by the analyses in `opgraph-analysis` as malformed.
//! Those analyses only ever read a graph.
//!
//! # Ordering
//!
//! Node handles are assigned in creation order and
//! [`node_ids`](Graph::node_ids) yields them in that order. Input and output
//! neighbor lists come back in link-insertion order. Nodes and links are
//! never removed, so both orders are stable for the lifetime of the graph.

use std::ops::Index;

use petgraph::graph::{EdgeIndex, NodeIndex};
use petgraph::stable_graph::StableGraph;
use petgraph::visit::EdgeRef;
use petgraph::{Directed, Direction};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::id::NodeId;
use crate::node::Node;
use crate::op_desc::OpDescriptor;

/// The bipartite dependency graph.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Graph {
    inner: StableGraph<Node, (), Directed, u32>,
    /// Canonical operation order supplied by whoever built the graph.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    op_sequence: Option<Vec<OpDescriptor>>,
}

impl Graph {
    pub fn new() -> Self {
        Graph::default()
    }

    // -----------------------------------------------------------------------
    // Construction
    // -----------------------------------------------------------------------

    /// Adds an operation node carrying `desc`.
    pub fn add_operation(&mut self, name: impl Into<String>, desc: OpDescriptor) -> NodeId {
        NodeId::from(self.inner.add_node(Node::operation(name, desc)))
    }

    /// Adds a variable node.
    pub fn add_variable(&mut self, name: impl Into<String>) -> NodeId {
        NodeId::from(self.inner.add_node(Node::variable(name)))
    }

    /// Adds a directed link `from -> to`.
    ///
    /// Both nodes must exist and be of different kinds. A variable may be
    /// given several producers here; that shape is rejected by the analyses,
    /// not by construction.
    pub fn add_link(&mut self, from: NodeId, to: NodeId) -> Result<(), CoreError> {
        let from_node = self.node(from).ok_or(CoreError::NodeNotFound { id: from })?;
        let to_node = self.node(to).ok_or(CoreError::NodeNotFound { id: to })?;

        if from_node.is_op() == to_node.is_op() {
            return Err(CoreError::InvalidEdge {
                reason: format!(
                    "cannot link {} '{}' to {} '{}': links must join an operation and a variable",
                    from_node.kind_label(),
                    from_node.name,
                    to_node.kind_label(),
                    to_node.name
                ),
            });
        }

        self.inner.add_edge(from.into(), to.into(), ());
        Ok(())
    }

    /// Attaches the canonical operation order, replacing any previous one.
    pub fn set_op_sequence(&mut self, sequence: Vec<OpDescriptor>) {
        self.op_sequence = Some(sequence);
    }

    // -----------------------------------------------------------------------
    // Read-only accessors
    // -----------------------------------------------------------------------

    /// Looks up a node by handle.
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.inner.node_weight(NodeIndex::from(id))
    }

    /// All node handles in creation order.
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.inner.node_indices().map(NodeId::from)
    }

    /// All nodes with their handles, in creation order.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &Node)> + '_ {
        self.inner
            .node_indices()
            .map(move |idx| (NodeId::from(idx), &self.inner[idx]))
    }

    /// Operation nodes with their descriptors, in creation order.
    pub fn operations(&self) -> impl Iterator<Item = (NodeId, &OpDescriptor)> + '_ {
        self.nodes()
            .filter_map(|(id, node)| node.op().map(|desc| (id, desc)))
    }

    /// First node named `name`, in creation order.
    pub fn find_by_name(&self, name: &str) -> Option<NodeId> {
        self.nodes()
            .find(|(_, node)| node.name == name)
            .map(|(id, _)| id)
    }

    /// Nodes with a link into `id`, in link-insertion order.
    pub fn inputs(&self, id: NodeId) -> Vec<NodeId> {
        self.neighbors_in_order(id, Direction::Incoming)
    }

    /// Nodes `id` links to, in link-insertion order.
    pub fn outputs(&self, id: NodeId) -> Vec<NodeId> {
        self.neighbors_in_order(id, Direction::Outgoing)
    }

    /// The canonical operation order, if one was attached.
    pub fn op_sequence(&self) -> Option<&[OpDescriptor]> {
        self.op_sequence.as_deref()
    }

    pub fn has_op_sequence(&self) -> bool {
        self.op_sequence.is_some()
    }

    pub fn node_count(&self) -> usize {
        self.inner.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.inner.edge_count()
    }

    // petgraph yields adjacent edges newest-first; edge indices restore
    // insertion order since edges are never removed.
    fn neighbors_in_order(&self, id: NodeId, dir: Direction) -> Vec<NodeId> {
        let mut edges: Vec<(EdgeIndex<u32>, NodeId)> = self
            .inner
            .edges_directed(id.into(), dir)
            .map(|edge| {
                let other = match dir {
                    Direction::Incoming => edge.source(),
                    Direction::Outgoing => edge.target(),
                };
                (edge.id(), NodeId::from(other))
            })
            .collect();
        edges.sort_by_key(|(edge, _)| *edge);
        edges.into_iter().map(|(_, node)| node).collect()
    }
}

impl Index<NodeId> for Graph {
    type Output = Node;

    /// Panics if `id` does not belong to this graph.
    fn index(&self, id: NodeId) -> &Node {
        &self.inner[NodeIndex::from(id)]
    }
}
