// pipegraph/src/order/mod.rs

//! Ordering algorithms over an `ExecutionGraph`: the topological linearizer
//! and the multi-root traverser, both driven by the same canonical index.

pub(crate) mod canonical;
pub mod linearize;
pub mod traverse;

pub use linearize::linearize;
pub use traverse::{traverse, Traversal};
