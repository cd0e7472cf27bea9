//! Human-writable graph description.
//!
//! A [`GraphFile`] lists variables and operations by name; [`GraphFile::build`]
//! derives every link from the operations' descriptors, so a file never
//! spells out edges by hand:
//!
//! ```json
//! {
//!   "variables": ["x"],
//!   "operations": [
//!     {"name": "A", "type": "fill", "outputs": {"Out": ["x"]}},
//!     {"name": "B", "type": "relu", "inputs": {"X": ["x"]}, "outputs": {"Out": ["y"]}}
//!   ]
//! }
//! ```

use std::collections::BTreeMap;

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::graph::Graph;
use crate::id::NodeId;
use crate::op_desc::OpDescriptor;

/// One operation entry of a [`GraphFile`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpEntry {
    /// Display name of the operation node.
    pub name: String,
    #[serde(rename = "type")]
    pub op_type: String,
    #[serde(default)]
    pub inputs: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub outputs: BTreeMap<String, Vec<String>>,
}

impl OpEntry {
    pub fn descriptor(&self) -> OpDescriptor {
        OpDescriptor {
            op_type: self.op_type.clone(),
            inputs: self.inputs.clone(),
            outputs: self.outputs.clone(),
        }
    }
}

/// Serialized graph description consumed by the `opgraph` CLI.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphFile {
    /// Variables to create up front. Variables referenced only by operations
    /// are created on first use.
    #[serde(default)]
    pub variables: Vec<String>,
    #[serde(default)]
    pub operations: Vec<OpEntry>,
    /// Optional canonical operation order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sequence: Option<Vec<OpDescriptor>>,
}

impl GraphFile {
    /// Builds the graph.
    ///
    /// Nodes are created in this order: declared variables, then for each
    /// operation its not-yet-seen input variables, the operation itself, and
    /// its not-yet-seen output variables. A variable listed more than once by
    /// the same operation on the same side is linked once.
    pub fn build(&self) -> Result<Graph, CoreError> {
        let mut graph = Graph::new();
        let mut vars: IndexMap<String, NodeId> = IndexMap::new();

        for name in &self.variables {
            if vars.contains_key(name) {
                return Err(CoreError::InvalidGraphFile {
                    reason: format!("variable '{}' declared twice", name),
                });
            }
            vars.insert(name.clone(), graph.add_variable(name.as_str()));
        }

        for entry in &self.operations {
            if entry.op_type.is_empty() {
                return Err(CoreError::InvalidGraphFile {
                    reason: format!("operation '{}' has an empty type", entry.name),
                });
            }
            let desc = entry.descriptor();

            let inputs: IndexSet<&str> = desc.input_vars().collect();
            let input_ids: Vec<NodeId> = inputs
                .iter()
                .map(|&name| variable_id(&mut graph, &mut vars, name))
                .collect();

            let outputs: IndexSet<&str> = desc.output_vars().collect();
            let op = graph.add_operation(entry.name.as_str(), desc.clone());
            for var in input_ids {
                graph.add_link(var, op)?;
            }
            for &name in &outputs {
                let var = variable_id(&mut graph, &mut vars, name);
                graph.add_link(op, var)?;
            }
        }

        if let Some(sequence) = &self.sequence {
            graph.set_op_sequence(sequence.clone());
        }

        Ok(graph)
    }
}

fn variable_id(graph: &mut Graph, vars: &mut IndexMap<String, NodeId>, name: &str) -> NodeId {
    if let Some(&id) = vars.get(name) {
        return id;
    }
    let id = graph.add_variable(name);
    vars.insert(name.to_string(), id);
    id
}
