//! Cycle detection over the predecessor relation.
//!
//! Iterative depth-first search with an explicit stack of
//! `(node, next predecessor index)` frames. `visited` holds every node ever
//! entered, `in_trace` the nodes whose frame is still on the stack. Reaching
//! a node that is in `in_trace` closes a cycle.

use std::collections::HashSet;

use opgraph_core::{Graph, NodeId};

use crate::adjacency::{build_predecessor_map, PredecessorMap};
use crate::error::AnalysisError;

/// Returns `true` iff the operations of `graph` depend on each other cyclically.
pub fn has_cycle(graph: &Graph) -> Result<bool, AnalysisError> {
    Ok(has_cycle_in(&build_predecessor_map(graph)?))
}

/// Returns `true` iff `preds`, read as edges `node -> predecessor`, has a cycle.
///
/// Every key is tried as a root, so disconnected parts are all covered.
/// Predecessors that are not keys are treated as having no predecessors.
pub fn has_cycle_in(preds: &PredecessorMap) -> bool {
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
                Some(pred) if in_trace.contains(&pred) => return true,
                Some(pred) => {
                    if visited.insert(pred) {
                        in_trace.insert(pred);
                        stack.push((pred, 0));
                    }
                }
                None => {
                    in_trace.remove(&node);
                    stack.pop();
                }
            }
        }
    }

    false
}
