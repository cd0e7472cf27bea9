//! Predecessor map construction.
//!
//! For each operation, the set of operations producing one of its input
//! variables. Despite being an adjacency list, the relation points backwards:
//! `map[op]` holds the ops `op` depends on, not the ops depending on it.

use indexmap::{IndexMap, IndexSet};
use opgraph_core::{Graph, NodeId};
use tracing::trace;

use crate::error::AnalysisError;

/// Operation -> its direct predecessor operations.
///
/// Keys are every operation of the graph in creation order, including ones
/// with no predecessors, so each can serve as a traversal root.
pub type PredecessorMap = IndexMap<NodeId, IndexSet<NodeId>>;

/// Builds the predecessor map of `graph`.
///
/// Fails with [`AnalysisError::MalformedGraph`] when an operation reads a
/// non-variable, or when an input variable has more than one producer or a
/// producer that is not an operation.
pub fn build_predecessor_map(graph: &Graph) -> Result<PredecessorMap, AnalysisError> {
    let mut preds = PredecessorMap::new();

    for (op, _) in graph.operations() {
        let entry = preds.entry(op).or_default();
        for var in graph.inputs(op) {
            if let Some(producer) = producer_of(graph, op, var)? {
                trace!(
                    "adj {}({}) -> {}({}) via {}({})",
                    graph[producer].name,
                    producer,
                    graph[op].name,
                    op,
                    graph[var].name,
                    var
                );
                entry.insert(producer);
            }
        }
    }

    Ok(preds)
}

/// Returns the single producer of `var`, an input of `consumer`.
pub(crate) fn producer_of(
    graph: &Graph,
    consumer: NodeId,
    var: NodeId,
) -> Result<Option<NodeId>, AnalysisError> {
    if !graph[var].is_var() {
        return Err(AnalysisError::MalformedGraph {
            node: consumer,
            reason: format!(
                "input '{}' of operation '{}' is not a variable",
                graph[var].name, graph[consumer].name
            ),
        });
    }

    match graph.inputs(var).as_slice() {
        [] => Ok(None),
        [producer] if graph[*producer].is_op() => Ok(Some(*producer)),
        [producer] => Err(AnalysisError::MalformedGraph {
            node: var,
            reason: format!(
                "producer '{}' of variable '{}' is not an operation",
                graph[*producer].name, graph[var].name
            ),
        }),
        producers => Err(AnalysisError::MalformedGraph {
            node: var,
            reason: format!(
                "variable '{}' has {} producers, expected at most one",
                graph[var].name,
                producers.len()
            ),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{chain, fill, op, unary, variable_producer, with_raw_link};
    use opgraph_core::OpDescriptor;

    #[test]
    fn two_op_chain() {
        let mut graph = Graph::new();
        let x = graph.add_variable("x");
        let a = op(&mut graph, "A", fill("x"), &[], &[x]);
        let b = op(&mut graph, "B", unary("relu", "x", "y"), &[x], &[]);

        let preds = build_predecessor_map(&graph).unwrap();

        assert_eq!(preds.keys().copied().collect::<Vec<_>>(), vec![a, b]);
        assert!(preds[&a].is_empty());
        assert_eq!(preds[&b].iter().copied().collect::<Vec<_>>(), vec![a]);
    }

    #[test]
    fn isolated_operation_gets_an_entry() {
        let mut graph = Graph::new();
        let lone = graph.add_operation("C", OpDescriptor::new("noop"));

        let preds = build_predecessor_map(&graph).unwrap();
        assert_eq!(preds.len(), 1);
        assert!(preds[&lone].is_empty());
    }

    #[test]
    fn predecessors_are_deduplicated() {
        let mut graph = Graph::new();
        let x = graph.add_variable("x");
        let y = graph.add_variable("y");
        let a = op(&mut graph, "A", OpDescriptor::new("split"), &[], &[x, y]);
        let b = op(&mut graph, "B", OpDescriptor::new("add"), &[x, y], &[]);

        let preds = build_predecessor_map(&graph).unwrap();
        assert_eq!(preds[&b].len(), 1);
        assert!(preds[&b].contains(&a));
    }

    #[test]
    fn variables_are_not_keys() {
        let c = chain();
        let preds = build_predecessor_map(&c.graph).unwrap();
        assert_eq!(preds.len(), 3);
        for var in [c.x, c.y, c.z] {
            assert!(!preds.contains_key(&var));
        }
        assert!(preds[&c.c].contains(&c.b));
    }

    #[test]
    fn builder_is_idempotent() {
        let c = chain();
        let first = build_predecessor_map(&c.graph).unwrap();
        let second = build_predecessor_map(&c.graph).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn variable_with_two_producers_is_malformed() {
        let mut graph = Graph::new();
        let x = graph.add_variable("x");
        op(&mut graph, "A", fill("x"), &[], &[x]);
        op(&mut graph, "B", fill("x"), &[], &[x]);
        op(&mut graph, "C", unary("relu", "x", "y"), &[x], &[]);

        match build_predecessor_map(&graph) {
            Err(AnalysisError::MalformedGraph { node, reason }) => {
                assert_eq!(node, x);
                assert!(reason.contains("2 producers"), "reason: {reason}");
            }
            other => panic!("expected MalformedGraph, got {other:?}"),
        }
    }

    #[test]
    fn variable_producing_a_variable_is_malformed() {
        let (graph, x) = variable_producer();
        assert_eq!(graph.inputs(x).len(), 1);

        match build_predecessor_map(&graph) {
            Err(AnalysisError::MalformedGraph { node, reason }) => {
                assert_eq!(node, x);
                assert!(reason.contains("is not an operation"), "reason: {reason}");
            }
            other => panic!("expected MalformedGraph, got {other:?}"),
        }
    }

    #[test]
    fn operation_reading_an_operation_is_malformed() {
        let mut graph = Graph::new();
        let a = graph.add_operation("A", OpDescriptor::new("fill"));
        let b = graph.add_operation("B", OpDescriptor::new("relu"));
        let graph = with_raw_link(&graph, a, b);

        match build_predecessor_map(&graph) {
            Err(AnalysisError::MalformedGraph { node, reason }) => {
                assert_eq!(node, b);
                assert!(reason.contains("is not a variable"), "reason: {reason}");
            }
            other => panic!("expected MalformedGraph, got {other:?}"),
        }
    }

    #[test]
    fn unconsumed_multi_producer_variable_is_not_inspected() {
        let mut graph = Graph::new();
        let x = graph.add_variable("x");
        op(&mut graph, "A", fill("x"), &[], &[x]);
        op(&mut graph, "B", fill("x"), &[], &[x]);

        assert!(build_predecessor_map(&graph).is_ok());
    }
}
