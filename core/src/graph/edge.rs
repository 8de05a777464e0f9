// pipegraph/src/graph/edge.rs

//! Defines node identity, edge metadata, and the immutable `Edge<N>` value.

use std::fmt;
use std::hash::Hash;

/// Bound for caller-supplied node identifiers.
///
/// The graph never looks inside a node. `Ord` is required so that every
/// ordering decision can be derived from content alone, never from hash
/// values or insertion position.
pub trait NodeId: Clone + Eq + Hash + Ord + fmt::Debug {}

impl<T> NodeId for T where T: Clone + Eq + Hash + Ord + fmt::Debug {}

/// Describes the consumer input slot an edge feeds.
///
/// Field order matters: the derived `Ord` is part of the canonical edge key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeMeta {
  slot_index: usize,
  slot_name: String,
  is_sink: bool,
}

impl EdgeMeta {
  /// Metadata for a regular single-producer slot.
  pub fn new(slot_index: usize, slot_name: impl Into<String>) -> Self {
    Self {
      slot_index,
      slot_name: slot_name.into(),
      is_sink: false,
    }
  }

  /// Metadata for a variadic slot. Several edges may target the same sink index.
  pub fn sink(slot_index: usize, slot_name: impl Into<String>) -> Self {
    Self {
      slot_index,
      slot_name: slot_name.into(),
      is_sink: true,
    }
  }

  pub fn slot_index(&self) -> usize {
    self.slot_index
  }

  pub fn slot_name(&self) -> &str {
    &self.slot_name
  }

  pub fn is_sink(&self) -> bool {
    self.is_sink
  }
}

/// One dependency: `callee`'s input described by `meta` is produced by `caller`.
///
/// The derived `Ord` compares `(caller, callee, meta)` and is the canonical
/// content key used by the linearizer and the traverser.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Edge<N: NodeId> {
  caller: N,
  callee: N,
  meta: EdgeMeta,
}

impl<N: NodeId> Edge<N> {
  pub fn new(caller: N, callee: N, meta: EdgeMeta) -> Self {
    Self { caller, callee, meta }
  }

  pub fn caller(&self) -> &N {
    &self.caller
  }

  pub fn callee(&self) -> &N {
    &self.callee
  }

  pub fn meta(&self) -> &EdgeMeta {
    &self.meta
  }

  pub fn into_parts(self) -> (N, N, EdgeMeta) {
    (self.caller, self.callee, self.meta)
  }
}

impl<N: NodeId> fmt::Display for Edge<N> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(
      f,
      "{:?} -[{}:{}{}]-> {:?}",
      self.caller,
      self.meta.slot_index,
      self.meta.slot_name,
      if self.meta.is_sink { "*" } else { "" },
      self.callee
    )
  }
}
