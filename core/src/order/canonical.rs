// pipegraph/src/order/canonical.rs

//! Content-derived indexing shared by every ordering algorithm.
//!
//! Edges are sorted by their canonical key `(caller, callee, meta)`. Nodes are
//! ranked by first appearance in that sorted list, caller before callee. All
//! tie-breaks downstream compare ranks or canonical edge positions, so results
//! depend only on what the graph contains.

use crate::graph::definition::ExecutionGraph;
use crate::graph::edge::{Edge, NodeId};
use std::collections::HashMap;

pub(crate) struct CanonicalIndex<'g, N: NodeId> {
  edges: Vec<&'g Edge<N>>,
  /// (caller rank, callee rank) for each canonical edge position.
  ends: Vec<(usize, usize)>,
  nodes: Vec<&'g N>,
  /// Canonical edge positions leaving / entering each node rank.
  outgoing: Vec<Vec<usize>>,
  incoming: Vec<Vec<usize>>,
}

impl<'g, N: NodeId> CanonicalIndex<'g, N> {
  pub(crate) fn build(graph: &'g ExecutionGraph<N>) -> Self {
    let mut edges: Vec<&'g Edge<N>> = graph.edges.iter().collect();
    edges.sort();

    let mut rank: HashMap<&'g N, usize> = HashMap::with_capacity(edges.len());
    let mut nodes: Vec<&'g N> = Vec::new();
    let mut ends = Vec::with_capacity(edges.len());

    let mut rank_of = |node: &'g N, nodes: &mut Vec<&'g N>| -> usize {
      *rank.entry(node).or_insert_with(|| {
        nodes.push(node);
        nodes.len() - 1
      })
    };

    for edge in &edges {
      let caller = rank_of(edge.caller(), &mut nodes);
      let callee = rank_of(edge.callee(), &mut nodes);
      ends.push((caller, callee));
    }

    let mut outgoing = vec![Vec::new(); nodes.len()];
    let mut incoming = vec![Vec::new(); nodes.len()];
    for (pos, &(caller, callee)) in ends.iter().enumerate() {
      outgoing[caller].push(pos);
      incoming[callee].push(pos);
    }

    Self {
      edges,
      ends,
      nodes,
      outgoing,
      incoming,
    }
  }

  pub(crate) fn node_count(&self) -> usize {
    self.nodes.len()
  }

  pub(crate) fn edge_count(&self) -> usize {
    self.edges.len()
  }

  pub(crate) fn node(&self, rank: usize) -> &'g N {
    self.nodes[rank]
  }

  pub(crate) fn nodes(&self) -> Vec<&'g N> {
    self.nodes.clone()
  }

  pub(crate) fn edge(&self, pos: usize) -> &'g Edge<N> {
    self.edges[pos]
  }

  pub(crate) fn caller_rank(&self, pos: usize) -> usize {
    self.ends[pos].0
  }

  pub(crate) fn callee_rank(&self, pos: usize) -> usize {
    self.ends[pos].1
  }

  pub(crate) fn outgoing(&self, rank: usize) -> &[usize] {
    &self.outgoing[rank]
  }

  pub(crate) fn incoming(&self, rank: usize) -> &[usize] {
    &self.incoming[rank]
  }

  pub(crate) fn roots(&self) -> impl Iterator<Item = usize> + '_ {
    (0..self.nodes.len()).filter(move |&r| self.incoming[r].is_empty())
  }

  pub(crate) fn leaves(&self) -> impl Iterator<Item = usize> + '_ {
    (0..self.nodes.len()).filter(move |&r| self.outgoing[r].is_empty())
  }
}
