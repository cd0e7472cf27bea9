//! Graph vertices.
//!
//! The graph is bipartite: every [`Node`] is either an operation carrying an
//! [`OpDescriptor`] or a variable naming a value that flows between
//! operations. Neighbor lists live in the [`Graph`](crate::graph::Graph), not
//! on the node.

use serde::{Deserialize, Serialize};

use crate::op_desc::OpDescriptor;

/// The two vertex kinds of the bipartite graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeKind {
    /// A computational step.
    Operation(OpDescriptor),
    /// A named value produced by at most one operation.
    Variable,
}

/// A vertex with its display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub name: String,
    pub kind: NodeKind,
}

impl Node {
    /// Creates an operation node.
    pub fn operation(name: impl Into<String>, desc: OpDescriptor) -> Self {
        Node {
            name: name.into(),
            kind: NodeKind::Operation(desc),
        }
    }

    /// Creates a variable node.
    pub fn variable(name: impl Into<String>) -> Self {
        Node {
            name: name.into(),
            kind: NodeKind::Variable,
        }
    }

    pub fn is_op(&self) -> bool {
        matches!(self.kind, NodeKind::Operation(_))
    }

    pub fn is_var(&self) -> bool {
        matches!(self.kind, NodeKind::Variable)
    }

    /// Returns the descriptor of an operation node, `None` for variables.
    pub fn op(&self) -> Option<&OpDescriptor> {
        match &self.kind {
            NodeKind::Operation(desc) => Some(desc),
            NodeKind::Variable => None,
        }
    }

    /// Short kind label used in diagnostics.
    pub fn kind_label(&self) -> &'static str {
        match self.kind {
            NodeKind::Operation(_) => "operation",
            NodeKind::Variable => "variable",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_predicates() {
        let op = Node::operation("A", OpDescriptor::new("fill"));
        let var = Node::variable("x");

        assert!(op.is_op() && !op.is_var());
        assert!(var.is_var() && !var.is_op());
        assert_eq!(op.op().map(|d| d.op_type.as_str()), Some("fill"));
        assert!(var.op().is_none());
        assert_eq!(op.kind_label(), "operation");
        assert_eq!(var.kind_label(), "variable");
    }
}
