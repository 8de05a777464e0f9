// pipegraph/src/registry.rs

//! Defines `InterpreterRegistry<N, E>`, the ordered list of execution backends
//! consulted to decide which one may run a finished graph.
//! Backends report capability through the `Interpreter<N, E>` trait, where `E`
//! is the backend's own error type.

use crate::error::{GraphError, GraphResult};
use crate::graph::definition::ExecutionGraph;
use crate::graph::edge::NodeId;
use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;
use tracing::{event, instrument, Level};

/// A backend's answer to "can you run this graph?".
///
/// `reason` is kept even for positive verdicts so that a full verdict list
/// can be shown when nobody accepts a graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterpreterVerdict {
  pub interpreter_name: String,
  pub verdict: bool,
  pub reason: String,
}

impl InterpreterVerdict {
  pub fn capable(interpreter_name: impl Into<String>, reason: impl Into<String>) -> Self {
    Self {
      interpreter_name: interpreter_name.into(),
      verdict: true,
      reason: reason.into(),
    }
  }

  pub fn declined(interpreter_name: impl Into<String>, reason: impl Into<String>) -> Self {
    Self {
      interpreter_name: interpreter_name.into(),
      verdict: false,
      reason: reason.into(),
    }
  }
}

/// An execution backend as seen by the registry.
///
/// An `Err` from `can_interpret` means the backend could not even evaluate the
/// graph. The registry propagates it unchanged instead of treating it as a
/// negative verdict.
pub trait Interpreter<N: NodeId, E = anyhow::Error>: Send + Sync {
  fn name(&self) -> &str;

  fn can_interpret(&self, graph: &ExecutionGraph<N>) -> Result<InterpreterVerdict, E>;
}

/// Which positive verdict wins when several backends accept a graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionPolicy {
  /// The last registered capable backend wins, letting specific backends
  /// registered later override a generic default.
  #[default]
  LastMatch,
  /// The first registered capable backend wins.
  FirstMatch,
}

/// Outcome of one `select` call: the chosen backend, if any, and every verdict
/// in registration order.
pub struct Selection<N: NodeId, E = anyhow::Error> {
  selected: Option<Arc<dyn Interpreter<N, E>>>,
  verdicts: Vec<InterpreterVerdict>,
}

impl<N: NodeId, E> Selection<N, E> {
  pub fn selected(&self) -> Option<&Arc<dyn Interpreter<N, E>>> {
    self.selected.as_ref()
  }

  pub fn is_selected(&self) -> bool {
    self.selected.is_some()
  }

  pub fn verdicts(&self) -> &[InterpreterVerdict] {
    &self.verdicts
  }

  pub fn into_parts(self) -> (Option<Arc<dyn Interpreter<N, E>>>, Vec<InterpreterVerdict>) {
    (self.selected, self.verdicts)
  }

  /// One line per consulted backend: `name: reason`.
  pub fn rejection_summary(&self) -> String {
    if self.verdicts.is_empty() {
      return "  (no interpreters registered)".to_string();
    }
    self
      .verdicts
      .iter()
      .map(|v| format!("  {}: {}", v.interpreter_name, v.reason))
      .collect::<Vec<_>>()
      .join("\n")
  }

  /// Returns the selected backend, or `GraphError::NoCapableInterpreter`
  /// carrying the rejection summary.
  pub fn require(self) -> GraphResult<Arc<dyn Interpreter<N, E>>> {
    match self.selected {
      Some(interpreter) => Ok(interpreter),
      None => {
        let summary = self.rejection_summary();
        event!(Level::ERROR, "No interpreter accepted the graph.");
        Err(GraphError::NoCapableInterpreter { summary })
      }
    }
  }
}

impl<N: NodeId, E> fmt::Debug for Selection<N, E> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Selection")
      .field("selected", &self.selected.as_ref().map(|i| i.name().to_string()))
      .field("verdicts", &self.verdicts)
      .finish()
  }
}

/// The interpreter registry. Backends are kept in registration order.
pub struct InterpreterRegistry<N: NodeId, E = anyhow::Error> {
  interpreters: RwLock<Vec<Arc<dyn Interpreter<N, E>>>>,
  policy: SelectionPolicy,
}

impl<N: NodeId, E> Default for InterpreterRegistry<N, E> {
  fn default() -> Self {
    Self::new()
  }
}

impl<N: NodeId, E> InterpreterRegistry<N, E> {
  /// Creates an empty registry using `SelectionPolicy::LastMatch`.
  pub fn new() -> Self {
    Self::with_policy(SelectionPolicy::default())
  }

  pub fn with_policy(policy: SelectionPolicy) -> Self {
    Self {
      interpreters: RwLock::new(Vec::new()),
      policy,
    }
  }

  pub fn policy(&self) -> SelectionPolicy {
    self.policy
  }

  pub fn register<I>(&self, interpreter: I)
  where
    I: Interpreter<N, E> + 'static,
  {
    self.register_arc(Arc::new(interpreter));
  }

  pub fn register_arc(&self, interpreter: Arc<dyn Interpreter<N, E>>) {
    event!(Level::DEBUG, interpreter = %interpreter.name(), "Registering interpreter.");
    self.interpreters.write().push(interpreter);
  }

  pub fn len(&self) -> usize {
    self.interpreters.read().len()
  }

  pub fn is_empty(&self) -> bool {
    self.interpreters.read().is_empty()
  }

  /// Names of the registered backends in registration order.
  pub fn names(&self) -> Vec<String> {
    self.interpreters.read().iter().map(|i| i.name().to_string()).collect()
  }

  /// Asks every registered backend, in registration order, whether it can run
  /// `graph`, and picks one according to the registry's policy.
  ///
  /// Every backend is queried on every call, even after a positive verdict.
  /// Each verdict carries the backend's registered `name()`, whatever name the
  /// backend put in it.
  /// When nobody accepts, the returned `Selection` has no backend and carries
  /// all negative verdicts. A backend error aborts the selection and is
  /// returned as is.
  #[instrument(
    name = "InterpreterRegistry::select",
    skip_all,
    fields(policy = ?self.policy, num_edges = graph.len())
  )]
  pub fn select(&self, graph: &ExecutionGraph<N>) -> Result<Selection<N, E>, E> {
    // Backends may do arbitrary work; query them outside the lock.
    let interpreters: Vec<Arc<dyn Interpreter<N, E>>> = self.interpreters.read().clone();

    let mut verdicts = Vec::with_capacity(interpreters.len());
    let mut selected: Option<Arc<dyn Interpreter<N, E>>> = None;

    for interpreter in interpreters {
      let mut verdict = interpreter.can_interpret(graph)?;
      if verdict.interpreter_name != interpreter.name() {
        event!(
          Level::WARN,
          registered = %interpreter.name(),
          reported = %verdict.interpreter_name,
          "Verdict names a different interpreter; using the registered name."
        );
        verdict.interpreter_name = interpreter.name().to_string();
      }
      event!(
        Level::DEBUG,
        interpreter = %verdict.interpreter_name,
        capable = verdict.verdict,
        reason = %verdict.reason,
        "Interpreter verdict."
      );

      if verdict.verdict {
        match self.policy {
          SelectionPolicy::LastMatch => selected = Some(interpreter),
          SelectionPolicy::FirstMatch if selected.is_none() => selected = Some(interpreter),
          SelectionPolicy::FirstMatch => {}
        }
      }
      verdicts.push(verdict);
    }

    match &selected {
      Some(interpreter) => event!(Level::DEBUG, interpreter = %interpreter.name(), "Interpreter selected."),
      None => event!(Level::INFO, num_verdicts = verdicts.len(), "No interpreter accepted the graph."),
    }

    Ok(Selection { selected, verdicts })
  }
}
