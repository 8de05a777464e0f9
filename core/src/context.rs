// pipegraph/src/context.rs

//! Defines `GraphContext<N>`, the nestable capture stack that pipeline
//! construction code records edges into, and `CaptureGuard`, its scoped
//! acquisition.
//!
//! A process normally owns a single context (for example in a `static`
//! initialised lazily) and passes references to it around. It is an ordinary
//! value rather than a singleton so that tests can create or `reset` their own.

use crate::error::{GraphError, GraphResult};
use crate::graph::edge::{EdgeMeta, NodeId};
use crate::graph::handle::GraphHandle;
use parking_lot::Mutex;
use tracing::{event, instrument, Level};

/// Stack of graphs under construction. The innermost (top) graph receives
/// every recorded edge; outer graphs are untouched while an inner one is active.
///
/// The stack is guarded by a mutex, but capture is designed for a single
/// logical thread of control: interleaving `enter`/`exit` from several threads
/// makes "innermost" meaningless.
pub struct GraphContext<N: NodeId> {
  stack: Mutex<Vec<GraphHandle<N>>>,
}

impl<N: NodeId> Default for GraphContext<N> {
  fn default() -> Self {
    Self::new()
  }
}

impl<N: NodeId> GraphContext<N> {
  /// Creates a context with an empty stack.
  pub fn new() -> Self {
    Self {
      stack: Mutex::new(Vec::new()),
    }
  }

  /// Pushes a fresh, empty graph and returns a handle to it.
  ///
  /// Prefer [`GraphContext::scope`] or [`GraphContext::capture`], which
  /// guarantee the matching `exit`.
  #[instrument(name = "GraphContext::enter", skip_all)]
  pub fn enter(&self) -> GraphHandle<N> {
    let handle = GraphHandle::default();
    let mut stack = self.stack.lock();
    stack.push(handle.clone());
    event!(Level::DEBUG, depth = stack.len(), "Entered graph context.");
    handle
  }

  /// Pops the innermost graph and returns it.
  #[instrument(name = "GraphContext::exit", skip_all, err(Display))]
  pub fn exit(&self) -> GraphResult<GraphHandle<N>> {
    self.pop("exit")
  }

  fn pop(&self, operation: &str) -> GraphResult<GraphHandle<N>> {
    let mut stack = self.stack.lock();
    match stack.pop() {
      Some(handle) => {
        event!(Level::DEBUG, depth = stack.len(), "Exited graph context.");
        Ok(handle)
      }
      None => {
        event!(Level::ERROR, operation = operation, "Exit requested with no active graph context.");
        Err(GraphError::EmptyContext {
          operation: operation.to_string(),
        })
      }
    }
  }

  /// Removes `graph`'s own entry, wherever it sits in the stack. Scopes closed
  /// out of order leave every other entry, and the innermost one, in place.
  fn remove_entry(&self, graph: &GraphHandle<N>, operation: &str) -> GraphResult<()> {
    let mut stack = self.stack.lock();
    match stack.iter().rposition(|entry| entry.ptr_eq(graph)) {
      Some(pos) => {
        if pos + 1 != stack.len() {
          event!(
            Level::WARN,
            depth = stack.len(),
            position = pos,
            "Capture scope exited while inner scopes are still active."
          );
        }
        stack.remove(pos);
        event!(Level::DEBUG, depth = stack.len(), "Exited graph context.");
        Ok(())
      }
      None => {
        event!(Level::ERROR, operation = operation, "Capture scope is no longer on the stack.");
        Err(GraphError::EmptyContext {
          operation: operation.to_string(),
        })
      }
    }
  }

  /// The innermost graph, if any context is active.
  pub fn current(&self) -> Option<GraphHandle<N>> {
    self.stack.lock().last().cloned()
  }

  pub fn is_active(&self) -> bool {
    !self.stack.lock().is_empty()
  }

  /// Number of nested contexts currently active.
  pub fn depth(&self) -> usize {
    self.stack.lock().len()
  }

  /// Appends an edge to the innermost graph. Outside any context nothing is
  /// recorded and `false` is returned.
  pub fn record_edge(&self, caller: N, callee: N, meta: EdgeMeta) -> bool {
    // The stack lock is released before the graph lock is taken.
    match self.current() {
      Some(graph) => {
        graph.put_edge(caller, callee, meta);
        true
      }
      None => {
        event!(Level::TRACE, caller = ?caller, callee = ?callee, "No active context, edge not recorded.");
        false
      }
    }
  }

  /// Enters a context and returns a guard that exits it when dropped,
  /// including during unwinding.
  pub fn scope(&self) -> CaptureGuard<'_, N> {
    let graph = self.enter();
    CaptureGuard {
      context: self,
      graph,
      finished: false,
    }
  }

  /// Runs `build` inside a fresh context and returns its result together with
  /// the captured graph.
  pub fn capture<R>(&self, build: impl FnOnce(&GraphHandle<N>) -> R) -> GraphResult<(R, GraphHandle<N>)> {
    let guard = self.scope();
    let result = build(guard.graph());
    let graph = guard.finish()?;
    Ok((result, graph))
  }

  /// Fallible form of [`GraphContext::capture`]. An error from `build` is
  /// returned unchanged, after the context has been exited.
  pub fn try_capture<R, E>(
    &self,
    build: impl FnOnce(&GraphHandle<N>) -> Result<R, E>,
  ) -> Result<(R, GraphHandle<N>), E>
  where
    E: From<GraphError>,
  {
    let guard = self.scope();
    let result = build(guard.graph())?;
    let graph = guard.finish()?;
    Ok((result, graph))
  }

  /// Drops every active context.
  pub fn reset(&self) {
    let mut stack = self.stack.lock();
    if !stack.is_empty() {
      event!(Level::DEBUG, depth = stack.len(), "Resetting graph context stack.");
    }
    stack.clear();
  }
}

/// Scoped acquisition of a capture context. Exits the context on drop.
///
/// Finishing or dropping a guard removes exactly the graph it entered, even if
/// scopes opened after it are still active.
pub struct CaptureGuard<'c, N: NodeId> {
  context: &'c GraphContext<N>,
  graph: GraphHandle<N>,
  finished: bool,
}

impl<'c, N: NodeId> CaptureGuard<'c, N> {
  /// The graph this scope records into.
  pub fn graph(&self) -> &GraphHandle<N> {
    &self.graph
  }

  /// Exits the context explicitly and returns the captured graph.
  pub fn finish(mut self) -> GraphResult<GraphHandle<N>> {
    self.finished = true;
    self.context.remove_entry(&self.graph, "CaptureGuard::finish")?;
    Ok(self.graph.clone())
  }
}

impl<'c, N: NodeId> Drop for CaptureGuard<'c, N> {
  fn drop(&mut self) {
    if self.finished {
      return;
    }
    if let Err(e) = self.context.remove_entry(&self.graph, "CaptureGuard::drop") {
      event!(Level::WARN, error = %e, "Capture scope dropped after its context was cleared.");
    }
  }
}
