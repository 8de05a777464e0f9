// pipegraph/src/graph/handle.rs
use crate::graph::definition::ExecutionGraph;
use crate::graph::edge::{EdgeMeta, NodeId};
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::sync::Arc;

/// Shared ownership of an `ExecutionGraph` being captured.
///
/// A capture context hands these out on `enter()`. Construction code appends
/// through its clone while the context is active, and the caller keeps the
/// graph after the context is exited.
///
/// Lock guards are blocking; do not hold one while calling back into the
/// owning `GraphContext`.
#[derive(Debug)]
pub struct GraphHandle<N: NodeId>(Arc<RwLock<ExecutionGraph<N>>>);

impl<N: NodeId> GraphHandle<N> {
  pub fn new(graph: ExecutionGraph<N>) -> Self {
    GraphHandle(Arc::new(RwLock::new(graph)))
  }

  /// Acquires a read lock.
  pub fn read(&self) -> RwLockReadGuard<'_, ExecutionGraph<N>> {
    self.0.read()
  }

  /// Acquires a write lock.
  pub fn write(&self) -> RwLockWriteGuard<'_, ExecutionGraph<N>> {
    self.0.write()
  }

  pub fn put_edge(&self, caller: N, callee: N, meta: EdgeMeta) {
    self.write().put_edge(caller, callee, meta);
  }

  /// Clones the current state of the graph out of the lock.
  pub fn snapshot(&self) -> ExecutionGraph<N> {
    self.read().clone()
  }

  /// True when both handles point at the same graph.
  pub fn ptr_eq(&self, other: &Self) -> bool {
    Arc::ptr_eq(&self.0, &other.0)
  }
}

impl<N: NodeId> Clone for GraphHandle<N> {
  fn clone(&self) -> Self {
    GraphHandle(Arc::clone(&self.0))
  }
}

impl<N: NodeId> Default for GraphHandle<N> {
  fn default() -> Self {
    Self::new(ExecutionGraph::new())
  }
}
