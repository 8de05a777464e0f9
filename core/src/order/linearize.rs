// pipegraph/src/order/linearize.rs

//! Deterministic topological ordering of an `ExecutionGraph`.

use crate::error::{GraphError, GraphResult};
use crate::graph::definition::ExecutionGraph;
use crate::graph::edge::NodeId;
use crate::order::canonical::CanonicalIndex;
use std::collections::VecDeque;
use tracing::{event, instrument, Level};

/// Produces one total order of the graph's nodes in which every caller
/// precedes its callees.
///
/// Zero in-degree nodes are seeded in canonical rank order and successors are
/// released following canonical edge order, so graphs holding the same edges
/// always produce the same order. A node targeted by several (sink) edges is
/// emitted exactly once. An empty graph yields an empty order.
///
/// Fails with `GraphError::CycleDetected` naming a node that lies on a cycle;
/// no partial order is ever returned.
#[instrument(name = "linearize", skip_all, fields(num_edges = graph.len()), err(Display))]
pub fn linearize<N: NodeId>(graph: &ExecutionGraph<N>) -> GraphResult<Vec<N>> {
  let index = CanonicalIndex::build(graph);
  let node_count = index.node_count();

  let mut in_degree: Vec<usize> = (0..node_count).map(|rank| index.incoming(rank).len()).collect();
  let mut queue: VecDeque<usize> = index.roots().collect();
  let mut order = Vec::with_capacity(node_count);

  event!(Level::DEBUG, num_nodes = node_count, num_roots = queue.len(), "Linearization starting.");

  while let Some(rank) = queue.pop_front() {
    event!(Level::TRACE, node = ?index.node(rank), "Emitting node.");
    order.push(index.node(rank).clone());

    for &pos in index.outgoing(rank) {
      let callee = index.callee_rank(pos);
      in_degree[callee] -= 1;
      if in_degree[callee] == 0 {
        queue.push_back(callee);
      }
    }
  }

  if order.len() < node_count {
    let witness = cycle_witness(&index, &in_degree);
    let unresolved = node_count - order.len();
    event!(
      Level::ERROR,
      node = ?index.node(witness),
      unresolved = unresolved,
      "Graph contains a cycle."
    );
    return Err(GraphError::CycleDetected {
      node: format!("{:?}", index.node(witness)),
      unresolved,
    });
  }

  event!(Level::DEBUG, "Linearization completed.");
  Ok(order)
}

/// Finds a node that lies on a cycle among the unresolved nodes.
///
/// Every unresolved node still has an incoming edge from another unresolved
/// node, so walking those predecessors must eventually revisit a node.
fn cycle_witness<N: NodeId>(index: &CanonicalIndex<'_, N>, in_degree: &[usize]) -> usize {
  let mut seen = vec![false; index.node_count()];
  let mut current = match in_degree.iter().position(|&d| d > 0) {
    Some(rank) => rank,
    None => return 0,
  };

  loop {
    if seen[current] {
      return current;
    }
    seen[current] = true;

    let predecessor = index
      .incoming(current)
      .iter()
      .map(|&pos| index.caller_rank(pos))
      .find(|&caller| in_degree[caller] > 0);

    match predecessor {
      Some(caller) => current = caller,
      None => return current,
    }
  }
}

impl<N: NodeId> ExecutionGraph<N> {
  /// Method form of [`linearize`].
  pub fn linearize(&self) -> GraphResult<Vec<N>> {
    linearize(self)
  }
}
