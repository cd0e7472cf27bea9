//! Small graphs shared by the unit tests.

use opgraph_core::{Graph, NodeId, OpDescriptor};

/// Adds an operation linked to existing variables.
pub fn op(
    graph: &mut Graph,
    name: &str,
    desc: OpDescriptor,
    inputs: &[NodeId],
    outputs: &[NodeId],
) -> NodeId {
    let id = graph.add_operation(name, desc);
    for &var in inputs {
        graph.add_link(var, id).unwrap();
    }
    for &var in outputs {
        graph.add_link(id, var).unwrap();
    }
    id
}

pub fn fill(out: &str) -> OpDescriptor {
    OpDescriptor::new("fill").with_output("Out", [out])
}

pub fn unary(op_type: &str, input: &str, out: &str) -> OpDescriptor {
    OpDescriptor::new(op_type)
        .with_input("X", [input])
        .with_output("Out", [out])
}

/// Handles of the three-op chain `A -> x -> B -> y -> C -> z`.
pub struct Chain {
    pub graph: Graph,
    pub a: NodeId,
    pub b: NodeId,
    pub c: NodeId,
    pub x: NodeId,
    pub y: NodeId,
    pub z: NodeId,
}

impl Chain {
    pub fn descriptors(&self) -> [OpDescriptor; 3] {
        [fill("x"), unary("relu", "x", "y"), unary("scale", "y", "z")]
    }
}

pub fn chain() -> Chain {
    let mut graph = Graph::new();
    let x = graph.add_variable("x");
    let y = graph.add_variable("y");
    let z = graph.add_variable("z");
    let a = op(&mut graph, "A", fill("x"), &[], &[x]);
    let b = op(&mut graph, "B", unary("relu", "x", "y"), &[x], &[y]);
    let c = op(&mut graph, "C", unary("scale", "y", "z"), &[y], &[z]);
    Chain { graph, a, b, c, x, y, z }
}

/// `A -> x -> B`, plus two-node cycle `P <-> Q` through variables `p`, `q`.
pub fn with_cycle() -> (Graph, NodeId, NodeId) {
    let mut graph = Graph::new();
    let x = graph.add_variable("x");
    op(&mut graph, "A", fill("x"), &[], &[x]);
    op(&mut graph, "B", unary("relu", "x", "y"), &[x], &[]);

    let p = graph.add_variable("p");
    let q = graph.add_variable("q");
    let p_op = op(&mut graph, "P", unary("relu", "q", "p"), &[q], &[p]);
    let q_op = op(&mut graph, "Q", unary("relu", "p", "q"), &[p], &[q]);
    (graph, p_op, q_op)
}

/// Copy of `graph` with an extra link `from -> to` inserted through
/// serialization, skipping the kind check done by `Graph::add_link`.
pub fn with_raw_link(graph: &Graph, from: NodeId, to: NodeId) -> Graph {
    let mut value = serde_json::to_value(graph).unwrap();
    value["inner"]["edges"]
        .as_array_mut()
        .unwrap()
        .push(serde_json::json!([from.0, to.0, null]));
    serde_json::from_value(value).unwrap()
}

/// Operation `C` reading variable `x`, whose only producer is variable `y`.
pub fn variable_producer() -> (Graph, NodeId) {
    let mut graph = Graph::new();
    let x = graph.add_variable("x");
    let y = graph.add_variable("y");
    op(&mut graph, "C", unary("relu", "x", "z"), &[x], &[]);
    (with_raw_link(&graph, y, x), x)
}
