// pipegraph/src/graph/mod.rs

//! The graph data model: node identity, edges, the execution graph and its shared handle.

pub mod definition;
pub mod edge;
pub mod handle;

pub use definition::ExecutionGraph;
pub use edge::{Edge, EdgeMeta, NodeId};
pub use handle::GraphHandle;
