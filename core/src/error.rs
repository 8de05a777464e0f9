// pipegraph/src/error.rs
use anyhow::Error as AnyhowError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GraphError {
  /// `exit()` was called while no capture context was active.
  #[error("No active graph context for '{operation}'")]
  EmptyContext { operation: String },

  /// Linearization was requested on a graph that contains a cycle.
  #[error("Cycle detected at node {node} ({unresolved} node(s) could not be ordered)")]
  CycleDetected { node: String, unresolved: usize },

  /// Returned by `Selection::require` when every backend declined.
  #[error("No interpreter accepted this graph:\n{summary}")]
  NoCapableInterpreter { summary: String },

  /// Available to backends that want to report their own failures in
  /// terms of this crate. The registry never wraps errors itself.
  #[error("Interpreter '{interpreter_name}' failed. Source: {source}")]
  Interpreter {
    interpreter_name: String,
    #[source]
    source: AnyhowError,
  },
}

impl GraphError {
  pub fn interpreter(interpreter_name: impl Into<String>, source: impl Into<AnyhowError>) -> Self {
    GraphError::Interpreter {
      interpreter_name: interpreter_name.into(),
      source: source.into(),
    }
  }
}

pub type GraphResult<T, E = GraphError> = std::result::Result<T, E>;
