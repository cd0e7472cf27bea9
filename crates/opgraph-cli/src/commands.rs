//! Subcommand implementations.
//!
//! Each command loads the graph, runs one analysis, and returns the JSON
//! value `main` prints.

use std::fs;
use std::path::{Path, PathBuf};

use opgraph_analysis::{
    build_predecessor_map, count_components, sort_operations_in_sequence,
    topology_sort_operations, AnalysisError, ComponentOptions,
};
use opgraph_core::{CoreError, Graph, GraphFile, NodeId, OpDescriptor};
use serde_json::{json, Value};
use tracing::debug;

/// Errors surfaced by the CLI.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("failed to read '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse '{}': {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error(transparent)]
    Graph(#[from] CoreError),

    #[error(transparent)]
    Analysis(#[from] AnalysisError),
}

impl CliError {
    /// Process exit code: 1 for analysis failures, 3 for I/O and parse errors.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Analysis(AnalysisError::DiagnosticIoFailure { .. }) => 3,
            CliError::Analysis(_) => 1,
            CliError::Read { .. } | CliError::Parse { .. } | CliError::Graph(_) => 3,
        }
    }
}

pub fn adjacency(path: &Path) -> Result<Value, CliError> {
    let graph = load_graph(path)?;
    let preds = build_predecessor_map(&graph)?;

    let operations: Vec<Value> = preds
        .iter()
        .map(|(&op, set)| {
            let names: Vec<&str> = set.iter().map(|&p| graph[p].name.as_str()).collect();
            json!({ "id": op.0, "name": graph[op].name, "predecessors": names })
        })
        .collect();
    Ok(json!({ "operations": operations }))
}

pub fn has_cycle(path: &Path) -> Result<Value, CliError> {
    let graph = load_graph(path)?;
    Ok(json!({ "has_cycle": opgraph_analysis::has_cycle(&graph)? }))
}

pub fn toposort(path: &Path) -> Result<Value, CliError> {
    let graph = load_graph(path)?;
    let order = topology_sort_operations(&graph)?;
    Ok(json!({ "order": node_list(&graph, &order) }))
}

pub fn sequence(path: &Path, sequence: Option<&Path>) -> Result<Value, CliError> {
    let mut graph = load_graph(path)?;
    if let Some(seq_path) = sequence {
        let descs: Vec<OpDescriptor> = read_json(seq_path)?;
        debug!("loaded {} descriptors from {}", descs.len(), seq_path.display());
        graph.set_op_sequence(descs);
    }
    let order = sort_operations_in_sequence(&graph)?;
    Ok(json!({ "order": node_list(&graph, &order) }))
}

pub fn components(path: &Path, dump: Option<PathBuf>) -> Result<Value, CliError> {
    let graph = load_graph(path)?;
    let options = ComponentOptions { dump_path: dump };
    let count = count_components(&graph, &options)?;
    Ok(json!({ "components": count }))
}

fn load_graph(path: &Path) -> Result<Graph, CliError> {
    let file: GraphFile = read_json(path)?;
    let graph = file.build()?;
    debug!(
        "loaded graph from {}: {} nodes, {} links",
        path.display(),
        graph.node_count(),
        graph.edge_count()
    );
    Ok(graph)
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, CliError> {
    let text = fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| CliError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn node_list(graph: &Graph, nodes: &[NodeId]) -> Vec<Value> {
    nodes
        .iter()
        .map(|&id| json!({ "id": id.0, "name": graph[id].name }))
        .collect()
}
