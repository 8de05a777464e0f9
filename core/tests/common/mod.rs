// tests/common/mod.rs
#![allow(dead_code)] // Allow unused code in this common test module

use pipegraph::{EdgeMeta, ExecutionGraph, GraphContext, GraphError, Interpreter, InterpreterVerdict, NodeId};
use std::collections::HashMap;
use std::sync::{
  atomic::{AtomicUsize, Ordering},
  Arc,
};
use tracing::Level;

// --- Common Error Type for Tests ---
#[derive(Debug, thiserror::Error)]
pub enum TestError {
  #[error("Graph error: {0}")]
  Graph(#[from] GraphError),

  #[error("Authoring failed: {0}")]
  Authoring(String),
}

// --- Graph builders ---

pub fn slot(index: usize) -> EdgeMeta {
  EdgeMeta::new(index, format!("in{}", index))
}

pub fn build_graph<N: NodeId>(edges: &[(N, N, usize)]) -> ExecutionGraph<N> {
  let mut graph = ExecutionGraph::new();
  for (caller, callee, index) in edges {
    graph.put_edge(caller.clone(), callee.clone(), slot(*index));
  }
  graph
}

/// Layered DAG: every node of layer `l` feeds two nodes of layer `l + 1`.
/// Node ids are `layer * width + position`.
pub fn layered_edges(layers: u32, width: u32) -> Vec<(u32, u32, usize)> {
  let mut edges = Vec::new();
  for layer in 0..layers.saturating_sub(1) {
    for pos in 0..width {
      let from = layer * width + pos;
      let next = (layer + 1) * width;
      edges.push((from, next + pos, 0));
      if width > 1 {
        edges.push((from, next + (pos + 1) % width, 1));
      }
    }
  }
  edges
}

/// Deterministic Fisher-Yates shuffle driven by a small LCG.
pub fn shuffled<T: Clone>(items: &[T], seed: u64) -> Vec<T> {
  let mut out = items.to_vec();
  let mut state = seed;
  for i in (1..out.len()).rev() {
    state = state
      .wrapping_mul(6364136223846793005)
      .wrapping_add(1442695040888963407);
    let j = ((state >> 33) as usize) % (i + 1);
    out.swap(i, j);
  }
  out
}

/// Checks that `order` is a permutation of the graph's nodes respecting every edge.
pub fn assert_topological<N: NodeId>(graph: &ExecutionGraph<N>, order: &[N]) {
  let position: HashMap<&N, usize> = order.iter().enumerate().map(|(i, n)| (n, i)).collect();
  assert_eq!(position.len(), order.len(), "order contains duplicates: {:?}", order);

  let mut expected = graph.nodes();
  expected.sort();
  let mut actual = order.to_vec();
  actual.sort();
  assert_eq!(actual, expected, "order is not a permutation of the graph's nodes");

  for edge in graph.edges() {
    assert!(
      position[edge.caller()] < position[edge.callee()],
      "edge {} violated by order {:?}",
      edge,
      order
    );
  }
}

// --- Test interpreters ---

/// Always returns the same verdict and counts how often it was asked.
pub struct StaticInterpreter {
  name: String,
  capable: bool,
  reason: String,
  pub calls: Arc<AtomicUsize>,
}

impl StaticInterpreter {
  pub fn new(name: &str, capable: bool, reason: &str) -> Self {
    Self {
      name: name.to_string(),
      capable,
      reason: reason.to_string(),
      calls: Arc::new(AtomicUsize::new(0)),
    }
  }

  pub fn call_count(&self) -> usize {
    self.calls.load(Ordering::SeqCst)
  }
}

impl<N: NodeId> Interpreter<N> for StaticInterpreter {
  fn name(&self) -> &str {
    &self.name
  }

  fn can_interpret(&self, _graph: &ExecutionGraph<N>) -> anyhow::Result<InterpreterVerdict> {
    self.calls.fetch_add(1, Ordering::SeqCst);
    Ok(InterpreterVerdict {
      interpreter_name: self.name.clone(),
      verdict: self.capable,
      reason: self.reason.clone(),
    })
  }
}

/// Accepts graphs of at most `max_edges` edges.
pub struct SizeLimitedInterpreter {
  pub name: String,
  pub max_edges: usize,
}

impl<N: NodeId> Interpreter<N> for SizeLimitedInterpreter {
  fn name(&self) -> &str {
    &self.name
  }

  fn can_interpret(&self, graph: &ExecutionGraph<N>) -> anyhow::Result<InterpreterVerdict> {
    if graph.len() <= self.max_edges {
      Ok(InterpreterVerdict::capable(&self.name, ""))
    } else {
      Ok(InterpreterVerdict::declined(
        &self.name,
        format!("graph has {} edges, limit is {}", graph.len(), self.max_edges),
      ))
    }
  }
}

/// Fails to evaluate any graph.
pub struct FailingInterpreter {
  pub name: String,
  pub message: String,
}

impl<N: NodeId> Interpreter<N> for FailingInterpreter {
  fn name(&self) -> &str {
    &self.name
  }

  fn can_interpret(&self, _graph: &ExecutionGraph<N>) -> anyhow::Result<InterpreterVerdict> {
    Err(anyhow::anyhow!(self.message.clone()))
  }
}

// --- Process-wide capture context shared by serial tests ---
use once_cell::sync::Lazy;
pub static SHARED_CONTEXT: Lazy<GraphContext<&'static str>> = Lazy::new(GraphContext::new);

// --- Helper for Tracing Setup (call once per test run if needed) ---
static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer() // Important for tests to capture output
    .try_init()
    .ok(); // Allow multiple initializations in tests (ok if fails)
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}
