//! Topological ordering of operations.
//!
//! Depth-first postorder over the predecessor relation: a node is appended
//! only after all of its predecessors, so producers precede consumers.
//! Ties between independent operations follow key order, then predecessor
//! insertion order.

use std::collections::HashSet;

use opgraph_core::{Graph, NodeId};
use tracing::{debug, trace, Level};

use crate::adjacency::{build_predecessor_map, PredecessorMap};
use crate::error::AnalysisError;

/// Orders every operation of `graph` so that producers precede consumers.
///
/// Fails with [`AnalysisError::CycleDetected`] if the operations depend on
/// each other cyclically.
pub fn topology_sort_operations(graph: &Graph) -> Result<Vec<NodeId>, AnalysisError> {
    let preds = build_predecessor_map(graph)?;
    let order = topological_order(&preds)?;
    if tracing::enabled!(Level::TRACE) {
        for &node in &order {
            trace!(
                "topology sort insert: {}({}) input {}",
                graph[node].name,
                node,
                graph.inputs(node).len()
            );
        }
    }
    debug!("sorted {} operations", order.len());
    Ok(order)
}

/// Orders the keys of `preds` so that every predecessor precedes its dependents.
///
/// Uses the same visited / in-trace bookkeeping as
/// [`has_cycle_in`](crate::cycle::has_cycle_in) and rejects a cyclic map with
/// [`AnalysisError::CycleDetected`] instead of returning a wrong order.
pub fn topological_order(preds: &PredecessorMap) -> Result<Vec<NodeId>, AnalysisError> {
    let mut order = Vec::with_capacity(preds.len());
    let mut visited: HashSet<NodeId> = HashSet::with_capacity(preds.len());
    let mut in_trace: HashSet<NodeId> = HashSet::new();
    let mut stack: Vec<(NodeId, usize)> = Vec::new();

    for &root in preds.keys() {
        if !visited.insert(root) {
            continue;
        }
        in_trace.insert(root);
        stack.push((root, 0));

        while let Some(frame) = stack.last_mut() {
            let node = frame.0;
            let next = preds
                .get(&node)
                .and_then(|set| set.get_index(frame.1))
                .copied();
            frame.1 += 1;

            match next {
                Some(pred) if in_trace.contains(&pred) => {
                    return Err(AnalysisError::CycleDetected { node: pred });
                }
                Some(pred) => {
                    if visited.insert(pred) {
                        in_trace.insert(pred);
                        stack.push((pred, 0));
                    }
                }
                None => {
                    in_trace.remove(&node);
                    stack.pop();
                    order.push(node);
                }
            }
        }
    }

    Ok(order)
}
