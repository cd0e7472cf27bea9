//! Reconciling a graph with a canonical operation order.
//!
//! The canonical order is a list of [`OpDescriptor`]s: a schedule stated in
//! terms of what each operation is, not which node carries it. Reconciling
//! walks the list and, at each step, picks the one dependency-ready node
//! whose descriptor equals the requested one. The result names the concrete
//! nodes in list order and, because only ready nodes may match, proves the
//! list respects the graph's data dependencies.

use indexmap::{IndexMap, IndexSet};
use opgraph_core::{Graph, NodeId, OpDescriptor};
use tracing::{debug, trace};

use crate::adjacency::build_predecessor_map;
use crate::error::AnalysisError;

/// Name reported when a graph has no canonical operation order attached.
pub const OP_SEQUENCE_ATTR: &str = "op_sequence";

/// Reconciles `graph` against the canonical order it carries.
///
/// Fails with [`AnalysisError::MissingAttribute`] if no order was attached
/// via [`Graph::set_op_sequence`].
pub fn sort_operations_in_sequence(graph: &Graph) -> Result<Vec<NodeId>, AnalysisError> {
    let sequence = graph
        .op_sequence()
        .ok_or(AnalysisError::MissingAttribute {
            name: OP_SEQUENCE_ATTR,
        })?;
    reconcile_sequence(graph, sequence)
}

/// Returns the operation nodes matching `sequence`, one per descriptor, in order.
///
/// Each descriptor must match exactly one node among those whose preceding
/// operations have all been matched already. No match fails with
/// [`AnalysisError::NoMatchingOperation`], several with
/// [`AnalysisError::AmbiguousMatch`].
pub fn reconcile_sequence(
    graph: &Graph,
    sequence: &[OpDescriptor],
) -> Result<Vec<NodeId>, AnalysisError> {
    let preds = build_predecessor_map(graph)?;

    let mut remaining: IndexMap<NodeId, usize> = IndexMap::with_capacity(preds.len());
    let mut pending: IndexMap<NodeId, IndexSet<NodeId>> = IndexMap::new();
    let mut ready: IndexSet<NodeId> = IndexSet::new();

    for (&op, preceding) in &preds {
        remaining.insert(op, preceding.len());
        if preceding.is_empty() {
            ready.insert(op);
        }
        for &pred in preceding {
            pending.entry(pred).or_default().insert(op);
        }
    }

    let mut ordered = Vec::with_capacity(sequence.len());
    for (position, desc) in sequence.iter().enumerate() {
        let found = find_ready(graph, &ready, desc, position)?;
        trace!("sequence[{}] '{}' -> {}({})", position, desc.op_type, graph[found].name, found);

        ready.shift_remove(&found);
        for &succ in pending.get(&found).into_iter().flatten() {
            if let Some(count) = remaining.get_mut(&succ) {
                *count -= 1;
                if *count == 0 {
                    ready.insert(succ);
                }
            }
        }
        ordered.push(found);
    }

    debug!(
        "reconciled {} of {} operations with the canonical order",
        ordered.len(),
        preds.len()
    );
    Ok(ordered)
}

fn find_ready(
    graph: &Graph,
    ready: &IndexSet<NodeId>,
    desc: &OpDescriptor,
    position: usize,
) -> Result<NodeId, AnalysisError> {
    let mut matches = ready
        .iter()
        .copied()
        .filter(|&node| graph[node].op() == Some(desc));

    match (matches.next(), matches.next()) {
        (Some(found), None) => Ok(found),
        (None, _) => Err(AnalysisError::NoMatchingOperation {
            op_type: desc.op_type.clone(),
            position,
        }),
        (Some(first), Some(second)) => Err(AnalysisError::AmbiguousMatch {
            op_type: desc.op_type.clone(),
            position,
            first,
            second,
        }),
    }
}
