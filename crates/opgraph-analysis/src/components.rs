//! Weak connectivity over the whole graph.
//!
//! Operations and variables are traversed together and links are followed in
//! both directions. More than one component usually means a graph was
//! assembled from pieces that never got connected, so [`count_components`]
//! can dump each component's nodes for inspection.

use std::collections::{HashSet, VecDeque};
use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexSet;
use opgraph_core::{Graph, NodeId};
use tracing::{debug, info};

use crate::error::AnalysisError;

/// Options for [`count_components`].
#[derive(Debug, Clone, Default)]
pub struct ComponentOptions {
    /// Where to write the sub-graph report. `None` or an empty path disables it.
    pub dump_path: Option<PathBuf>,
}

impl ComponentOptions {
    pub fn with_dump_path(path: impl Into<PathBuf>) -> Self {
        ComponentOptions {
            dump_path: Some(path.into()),
        }
    }

    fn dump_target(&self) -> Option<&Path> {
        self.dump_path
            .as_deref()
            .filter(|path| !path.as_os_str().is_empty())
    }
}

/// Counts weakly connected components of `graph`.
///
/// An empty graph has zero components. When a dump path is configured and
/// more than one component is found, the report from
/// [`render_component_report`] is written there; failing to write it is an
/// error.
pub fn count_components(graph: &Graph, options: &ComponentOptions) -> Result<usize, AnalysisError> {
    let components = weak_components(graph);
    let count = components.len();
    debug!("graph has {} weakly connected component(s)", count);

    if let Some(path) = options.dump_target() {
        if count > 1 {
            let report = render_component_report(graph, &components);
            fs::write(path, report).map_err(|source| AnalysisError::DiagnosticIoFailure {
                path: path.to_path_buf(),
                source,
            })?;
            info!("wrote {} sub-graphs to {}", count, path.display());
        }
    }

    Ok(count)
}

/// Returns the weakly connected components of `graph`.
///
/// Breadth-first from the earliest-created unvisited node. Components come
/// out in order of their first-created node; nodes within a component in
/// visit order.
pub fn weak_components(graph: &Graph) -> Vec<IndexSet<NodeId>> {
    let total = graph.node_count();
    let mut visited: HashSet<NodeId> = HashSet::with_capacity(total);
    let mut queued: HashSet<NodeId> = HashSet::new();
    let mut queue: VecDeque<NodeId> = VecDeque::new();
    let mut components = Vec::new();
    let mut current: IndexSet<NodeId> = IndexSet::new();
    let mut seeds = graph.node_ids();

    while visited.len() != total {
        if let Some(node) = queue.pop_front() {
            queued.remove(&node);
            visited.insert(node);
            current.insert(node);
            for neighbor in graph.inputs(node).into_iter().chain(graph.outputs(node)) {
                if !visited.contains(&neighbor) && queued.insert(neighbor) {
                    queue.push_back(neighbor);
                }
            }
        } else {
            if !current.is_empty() {
                components.push(std::mem::take(&mut current));
            }
            match seeds.find(|id| !visited.contains(id)) {
                Some(seed) => {
                    queued.insert(seed);
                    queue.push_back(seed);
                }
                None => break,
            }
        }
    }

    if !current.is_empty() {
        components.push(current);
    }
    components
}

/// Renders the sub-graph report.
///
/// A size line per component, then per component its size followed by one
/// line per node listing input and output neighbor names:
///
/// ```text
/// graph_nodes: 2
/// graph_nodes: 1
///
///
/// graph_nodes: 2
/// Node: A in [], out[x, ]
/// Node: x in [A, ], out[]
///
///
/// graph_nodes: 1
/// Node: C in [], out[]
///
///
/// ```
pub fn render_component_report(graph: &Graph, components: &[IndexSet<NodeId>]) -> String {
    let mut out = String::new();
    for component in components {
        out.push_str(&format!("graph_nodes: {}\n", component.len()));
    }
    out.push_str("\n\n");

    for component in components {
        out.push_str(&format!("graph_nodes: {}", component.len()));
        for &node in component {
            out.push_str(&format!("\nNode: {} in [", graph[node].name));
            for input in graph.inputs(node) {
                out.push_str(&graph[input].name);
                out.push_str(", ");
            }
            out.push_str("], out[");
            for output in graph.outputs(node) {
                out.push_str(&graph[output].name);
                out.push_str(", ");
            }
            out.push(']');
        }
        out.push_str("\n\n\n");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{chain, fill, op, unary};
    use opgraph_core::OpDescriptor;

    /// A -> x -> B -> y, plus isolated C.
    fn two_components() -> Graph {
        let mut graph = Graph::new();
        let x = graph.add_variable("x");
        let y = graph.add_variable("y");
        op(&mut graph, "A", fill("x"), &[], &[x]);
        op(&mut graph, "B", unary("relu", "x", "y"), &[x], &[y]);
        graph.add_operation("C", OpDescriptor::new("noop"));
        graph
    }

    #[test]
    fn empty_graph_has_no_components() {
        assert_eq!(count_components(&Graph::new(), &ComponentOptions::default()).unwrap(), 0);
        assert!(weak_components(&Graph::new()).is_empty());
    }

    #[test]
    fn connected_chain_is_one_component() {
        let c = chain();
        assert_eq!(count_components(&c.graph, &ComponentOptions::default()).unwrap(), 1);
    }

    #[test]
    fn isolated_operation_adds_a_component() {
        let graph = two_components();
        assert_eq!(count_components(&graph, &ComponentOptions::default()).unwrap(), 2);
    }

    #[test]
    fn isolated_variables_count_too() {
        let mut graph = Graph::new();
        graph.add_variable("u");
        graph.add_variable("v");
        assert_eq!(weak_components(&graph).len(), 2);
    }

    #[test]
    fn components_partition_the_graph() {
        let graph = two_components();
        let components = weak_components(&graph);

        let sizes: Vec<usize> = components.iter().map(IndexSet::len).collect();
        assert_eq!(sizes, vec![4, 1]);

        let all: HashSet<NodeId> = components.iter().flatten().copied().collect();
        assert_eq!(all.len(), graph.node_count());
    }

    #[test]
    fn bfs_visits_both_link_directions() {
        // Seed is variable x, reached first; A and B hang off it in opposite directions.
        let c = chain();
        let components = weak_components(&c.graph);
        assert_eq!(components.len(), 1);
        let order: Vec<NodeId> = components[0].iter().copied().collect();
        assert_eq!(order[0], c.x);
        assert_eq!(&order[1..3], &[c.a, c.b]);
    }

    #[test]
    fn report_format() {
        let graph = two_components();
        let report = render_component_report(&graph, &weak_components(&graph));

        let expected = "graph_nodes: 4\n\
                        graph_nodes: 1\n\
                        \n\n\
                        graph_nodes: 4\n\
                        Node: x in [A, ], out[B, ]\n\
                        Node: A in [], out[x, ]\n\
                        Node: B in [x, ], out[y, ]\n\
                        Node: y in [B, ], out[]\n\n\n\
                        graph_nodes: 1\n\
                        Node: C in [], out[]\n\n\n";
        assert_eq!(report, expected);
    }

    #[test]
    fn dump_written_when_fragmented() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sub_graphs.txt");
        let graph = two_components();

        let count = count_components(&graph, &ComponentOptions::with_dump_path(&path)).unwrap();
        assert_eq!(count, 2);

        let written = fs::read_to_string(&path).unwrap();
        assert_eq!(written, render_component_report(&graph, &weak_components(&graph)));
    }

    #[test]
    fn no_dump_for_single_component() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sub_graphs.txt");

        let options = ComponentOptions::with_dump_path(&path);
        let count = count_components(&chain().graph, &options).unwrap();
        assert_eq!(count, 1);
        assert!(!path.exists());
    }

    #[test]
    fn empty_dump_path_disables_report() {
        let graph = two_components();
        let options = ComponentOptions::with_dump_path("");
        assert_eq!(count_components(&graph, &options).unwrap(), 2);
    }

    #[test]
    fn unwritable_dump_path_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("sub_graphs.txt");
        let graph = two_components();

        match count_components(&graph, &ComponentOptions::with_dump_path(&path)) {
            Err(AnalysisError::DiagnosticIoFailure { path: reported, .. }) => {
                assert_eq!(reported, path)
            }
            other => panic!("expected DiagnosticIoFailure, got {other:?}"),
        }
    }
}
