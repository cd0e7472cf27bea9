//! Operation descriptors.
//!
//! An [`OpDescriptor`] is the declarative form of an operation: its type name
//! plus which variables it reads and writes, keyed by parameter name. It says
//! nothing about which concrete graph node carries it, which is why the
//! sequence reconciler has to re-identify descriptors as nodes.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Declarative description of one operation.
///
/// Two descriptors are equal iff the type name and both parameter mappings
/// are equal. Mappings are keyed by parameter name; the variable lists keep
/// their order and that order takes part in equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct OpDescriptor {
    /// Operation type name, e.g. `"matmul"`.
    #[serde(rename = "type")]
    pub op_type: String,
    /// Input parameter name to the variables bound to it.
    #[serde(default)]
    pub inputs: BTreeMap<String, Vec<String>>,
    /// Output parameter name to the variables bound to it.
    #[serde(default)]
    pub outputs: BTreeMap<String, Vec<String>>,
}

impl OpDescriptor {
    /// Creates a descriptor with no inputs or outputs.
    pub fn new(op_type: impl Into<String>) -> Self {
        OpDescriptor {
            op_type: op_type.into(),
            inputs: BTreeMap::new(),
            outputs: BTreeMap::new(),
        }
    }

    /// Binds `vars` to the input parameter `param`, replacing any previous binding.
    pub fn with_input<S: Into<String>>(
        mut self,
        param: impl Into<String>,
        vars: impl IntoIterator<Item = S>,
    ) -> Self {
        self.inputs
            .insert(param.into(), vars.into_iter().map(Into::into).collect());
        self
    }

    /// Binds `vars` to the output parameter `param`, replacing any previous binding.
    pub fn with_output<S: Into<String>>(
        mut self,
        param: impl Into<String>,
        vars: impl IntoIterator<Item = S>,
    ) -> Self {
        self.outputs
            .insert(param.into(), vars.into_iter().map(Into::into).collect());
        self
    }

    /// All input variable names, in parameter order.
    pub fn input_vars(&self) -> impl Iterator<Item = &str> {
        self.inputs.values().flatten().map(String::as_str)
    }

    /// All output variable names, in parameter order.
    pub fn output_vars(&self) -> impl Iterator<Item = &str> {
        self.outputs.values().flatten().map(String::as_str)
    }
}
