//! Structural analyses over the bipartite operation/variable graph.
//!
//! - [`build_predecessor_map`]: operation -> operations producing its inputs.
//! - [`has_cycle`] / [`has_cycle_in`]: acyclicity of the predecessor relation.
//! - [`topology_sort_operations`] / [`topological_order`]: one valid
//!   producer-before-consumer order of all operations.
//! - [`sort_operations_in_sequence`] / [`reconcile_sequence`]: re-identify a
//!   canonical descriptor list as concrete nodes, checking it is executable.
//! - [`count_components`] / [`weak_components`]: weak connectivity over all
//!   nodes, with an optional sub-graph report.
//!
//! All functions are pure reads of the graph, except that
//! [`count_components`] may write the report file.

pub mod adjacency;
pub mod components;
pub mod cycle;
pub mod error;
pub mod sequence;
pub mod toposort;

pub use adjacency::{build_predecessor_map, PredecessorMap};
pub use components::{count_components, render_component_report, weak_components, ComponentOptions};
pub use cycle::{has_cycle, has_cycle_in};
pub use error::AnalysisError;
pub use sequence::{reconcile_sequence, sort_operations_in_sequence, OP_SEQUENCE_ATTR};
pub use toposort::{topological_order, topology_sort_operations};

#[cfg(test)]
pub(crate) mod fixtures;
