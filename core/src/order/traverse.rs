// pipegraph/src/order/traverse.rs

//! Lazy multi-root breadth-first traversal over the edges of an `ExecutionGraph`.

use crate::graph::definition::ExecutionGraph;
use crate::graph::edge::{Edge, NodeId};
use crate::order::canonical::CanonicalIndex;
use std::collections::VecDeque;
use tracing::{event, Level};

/// Iterator yielding every edge of a graph exactly once.
///
/// Each root (a node that is never a callee) gets its own breadth-first
/// expansion, in canonical root order. The visitation unit is the edge, so a
/// node reached again through a different edge is expanded again, while an
/// edge already yielded is skipped. That keeps the walk finite on cyclic
/// graphs. Edges are tracked by position, not by value: the same
/// `(caller, callee, meta)` inserted twice is yielded twice.
///
/// Components without any root (pure cycles) are picked up once all roots
/// are exhausted, starting from the first unvisited edge in canonical order.
///
/// The iterator is not restartable; build a new one with [`traverse`].
pub struct Traversal<'g, N: NodeId> {
  index: CanonicalIndex<'g, N>,
  roots: Vec<usize>,
  next_root: usize,
  queue: VecDeque<usize>,
  visited: Vec<bool>,
  yielded: usize,
  // Cursor over canonical positions for rootless components.
  next_unvisited: usize,
}

/// Starts a traversal over `graph`. Nothing is walked until the iterator is polled.
pub fn traverse<N: NodeId>(graph: &ExecutionGraph<N>) -> Traversal<'_, N> {
  let index = CanonicalIndex::build(graph);
  let roots: Vec<usize> = index.roots().collect();
  let edge_count = index.edge_count();
  event!(Level::DEBUG, num_edges = edge_count, num_roots = roots.len(), "Traversal created.");
  Traversal {
    index,
    roots,
    next_root: 0,
    queue: VecDeque::new(),
    visited: vec![false; edge_count],
    yielded: 0,
    next_unvisited: 0,
  }
}

impl<'g, N: NodeId> Traversal<'g, N> {
  /// The roots this traversal starts from, in discovery order.
  pub fn roots(&self) -> Vec<&'g N> {
    self.roots.iter().map(|&rank| self.index.node(rank)).collect()
  }

  /// Queues the next expansion seed. Returns false once the graph is exhausted.
  fn seed_next(&mut self) -> bool {
    if self.next_root < self.roots.len() {
      let root = self.roots[self.next_root];
      self.next_root += 1;
      event!(Level::TRACE, root = ?self.index.node(root), "Expanding root.");
      self.queue.extend(self.index.outgoing(root).iter().copied());
      return true;
    }

    while self.next_unvisited < self.visited.len() && self.visited[self.next_unvisited] {
      self.next_unvisited += 1;
    }
    if self.next_unvisited < self.visited.len() {
      let pos = self.next_unvisited;
      event!(
        Level::TRACE,
        caller = ?self.index.node(self.index.caller_rank(pos)),
        "Expanding rootless component."
      );
      self.queue.push_back(pos);
      return true;
    }
    false
  }
}

impl<'g, N: NodeId> Iterator for Traversal<'g, N> {
  type Item = &'g Edge<N>;

  fn next(&mut self) -> Option<Self::Item> {
    loop {
      if let Some(pos) = self.queue.pop_front() {
        if self.visited[pos] {
          continue;
        }
        self.visited[pos] = true;
        self.yielded += 1;

        let callee = self.index.callee_rank(pos);
        for &out in self.index.outgoing(callee) {
          if !self.visited[out] {
            self.queue.push_back(out);
          }
        }
        return Some(self.index.edge(pos));
      }

      if !self.seed_next() {
        return None;
      }
    }
  }

  fn size_hint(&self) -> (usize, Option<usize>) {
    let remaining = self.visited.len() - self.yielded;
    (remaining, Some(remaining))
  }
}

impl<'g, N: NodeId> ExactSizeIterator for Traversal<'g, N> {}

impl<N: NodeId> ExecutionGraph<N> {
  /// Method form of [`traverse`].
  pub fn traverse(&self) -> Traversal<'_, N> {
    traverse(self)
  }
}
