//! Core error types for opgraph-core.
//!
//! Uses `thiserror` for structured, matchable error variants covering the
//! failure modes of graph construction. Analysis failures live in
//! `opgraph-analysis`.

use crate::id::NodeId;
use thiserror::Error;

/// Core errors produced while building or loading a graph.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A node handle was not found in the graph.
    #[error("node not found: NodeId({id})")]
    NodeNotFound { id: NodeId },

    /// A link failed validation (e.g. it would join two operations).
    #[error("invalid edge: {reason}")]
    InvalidEdge { reason: String },

    /// A graph file could not be turned into a graph.
    #[error("invalid graph file: {reason}")]
    InvalidGraphFile { reason: String },
}
