//! Analysis errors.
//!
//! Every variant is a fatal precondition violation: the invoked analysis
//! stops and returns no partial result.

use std::io;
use std::path::PathBuf;

use opgraph_core::NodeId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalysisError {
    /// A variable has several producers, a producer is not an operation, or
    /// an operation reads something that is not a variable.
    #[error("malformed graph at node {node}: {reason}")]
    MalformedGraph { node: NodeId, reason: String },

    /// The predecessor relation is cyclic; `node` was reached again while
    /// still on the traversal stack.
    #[error("cycle detected in operation dependencies at node {node}")]
    CycleDetected { node: NodeId },

    /// The graph does not carry a required attribute.
    #[error("graph has no attribute '{name}'")]
    MissingAttribute { name: &'static str },

    /// No dependency-ready operation matches the requested descriptor.
    #[error(
        "cannot find op_desc '{op_type}' (sequence position {position}) among ready operations"
    )]
    NoMatchingOperation { op_type: String, position: usize },

    /// Several dependency-ready operations match the requested descriptor.
    #[error(
        "found multiple ready operations for op_desc '{op_type}' \
         (sequence position {position}): nodes {first} and {second}"
    )]
    AmbiguousMatch {
        op_type: String,
        position: usize,
        first: NodeId,
        second: NodeId,
    },

    /// The sub-graph report could not be written.
    #[error("cannot write sub-graph report to {}", .path.display())]
    DiagnosticIoFailure {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
