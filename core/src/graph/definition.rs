// pipegraph/src/graph/definition.rs

//! Contains the `ExecutionGraph<N>` struct: an append-only list of edges
//! captured while a pipeline is declared, plus read-only structural queries.

use crate::graph::edge::{Edge, EdgeMeta, NodeId};
use crate::order::canonical::CanonicalIndex;
use std::fmt::Write as _;

/// Ordered collection of `(caller, callee, meta)` triples.
///
/// Insertion order is retained for inspection only. Every ordering this crate
/// produces (node order, root order, traversal order) is derived from edge
/// content, so two graphs holding the same edges yield the same results no
/// matter how they were built. Cycles are accepted here; they are reported by
/// the linearizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionGraph<N: NodeId> {
  pub(crate) edges: Vec<Edge<N>>,
}

impl<N: NodeId> Default for ExecutionGraph<N> {
  fn default() -> Self {
    Self::new()
  }
}

impl<N: NodeId> ExecutionGraph<N> {
  /// Creates an empty graph.
  pub fn new() -> Self {
    Self { edges: Vec::new() }
  }

  /// Appends one edge. No validation is performed.
  pub fn put_edge(&mut self, caller: N, callee: N, meta: EdgeMeta) {
    tracing::trace!(caller = ?caller, callee = ?callee, slot = meta.slot_index(), "put_edge");
    self.edges.push(Edge::new(caller, callee, meta));
  }

  /// Appends an already built edge.
  pub fn push(&mut self, edge: Edge<N>) {
    self.edges.push(edge);
  }

  /// All edges in insertion order.
  pub fn edges(&self) -> &[Edge<N>] {
    &self.edges
  }

  pub fn len(&self) -> usize {
    self.edges.len()
  }

  pub fn is_empty(&self) -> bool {
    self.edges.is_empty()
  }

  /// All edges sorted by their canonical content key.
  pub fn canonical_edges(&self) -> Vec<&Edge<N>> {
    let mut sorted: Vec<&Edge<N>> = self.edges.iter().collect();
    sorted.sort();
    sorted
  }

  /// Every distinct node, in canonical order.
  pub fn nodes(&self) -> Vec<N> {
    let index = CanonicalIndex::build(self);
    index.nodes().into_iter().cloned().collect()
  }

  /// Nodes that never appear as a callee, in canonical order.
  pub fn roots(&self) -> Vec<N> {
    let index = CanonicalIndex::build(self);
    index.roots().map(|rank| index.node(rank).clone()).collect()
  }

  /// Nodes that never appear as a caller, in canonical order.
  /// These are the usual candidates for pipeline outputs.
  pub fn leaves(&self) -> Vec<N> {
    let index = CanonicalIndex::build(self);
    index.leaves().map(|rank| index.node(rank).clone()).collect()
  }

  /// Outgoing edges of `node`, in insertion order.
  pub fn edges_from<'a>(&'a self, node: &'a N) -> impl Iterator<Item = &'a Edge<N>> + 'a {
    self.edges.iter().filter(move |e| e.caller() == node)
  }

  /// Incoming edges of `node`, in insertion order.
  pub fn edges_into<'a>(&'a self, node: &'a N) -> impl Iterator<Item = &'a Edge<N>> + 'a {
    self.edges.iter().filter(move |e| e.callee() == node)
  }

  /// Multi-line, human-readable rendering of the canonical edge list.
  pub fn dump(&self) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "ExecutionGraph ({} edges)", self.edges.len());
    for edge in self.canonical_edges() {
      let _ = writeln!(out, "  {}", edge);
    }
    out
  }
}

impl<N: NodeId> Extend<Edge<N>> for ExecutionGraph<N> {
  fn extend<I: IntoIterator<Item = Edge<N>>>(&mut self, iter: I) {
    self.edges.extend(iter);
  }
}

impl<N: NodeId> FromIterator<Edge<N>> for ExecutionGraph<N> {
  fn from_iter<I: IntoIterator<Item = Edge<N>>>(iter: I) -> Self {
    Self {
      edges: iter.into_iter().collect(),
    }
  }
}
