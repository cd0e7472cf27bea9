pub mod error;
pub mod graph;
pub mod graph_file;
pub mod id;
pub mod node;
pub mod op_desc;

// Re-export commonly used types
pub use error::CoreError;
pub use graph::Graph;
pub use graph_file::{GraphFile, OpEntry};
pub use id::NodeId;
pub use node::{Node, NodeKind};
pub use op_desc::OpDescriptor;
