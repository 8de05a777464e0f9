// src/lib.rs

//! Pipegraph: deterministic capture, ordering and traversal of pipeline graphs.
//!
//! Pipegraph records the dependencies declared while a pipeline is built and
//! turns them into something an execution backend can drive:
//!  - An append-only `ExecutionGraph<N>` of `(caller, callee, slot)` edges,
//!    generic over the caller's node identifier.
//!  - A nestable `GraphContext<N>` capture stack, so construction code can
//!    record edges without threading a graph through every call.
//!  - A topological linearizer whose output depends only on graph content,
//!    never on insertion order or hashing.
//!  - A lazy multi-root breadth-first traversal yielding every edge once.
//!  - An `InterpreterRegistry` that asks each registered backend whether it
//!    can run a graph and keeps every verdict for diagnostics.

pub mod context;
pub mod error;
pub mod graph;
pub mod order;
pub mod registry;

// --- Re-exports for the Public API ---

pub use crate::graph::{Edge, EdgeMeta, ExecutionGraph, GraphHandle, NodeId};

pub use crate::context::{CaptureGuard, GraphContext};

pub use crate::order::{linearize, traverse, Traversal};

pub use crate::registry::{Interpreter, InterpreterRegistry, InterpreterVerdict, Selection, SelectionPolicy};

pub use crate::error::{GraphError, GraphResult};

/*
    Typical flow:
    1. Create one `GraphContext<MyNode>` for the process.
    2. Wrap pipeline declaration in `context.capture(|graph| ...)` (or hold a
       `context.scope()` guard). Authoring code calls `context.record_edge(..)`
       for every dependency it declares; nested captures go to their own graph.
    3. Take the captured `GraphHandle`, and `snapshot()` or `read()` the graph.
    4. Ask an `InterpreterRegistry` to `select` a backend for it.
    5. Hand the backend either `graph.linearize()?` or `graph.traverse()`.
*/
