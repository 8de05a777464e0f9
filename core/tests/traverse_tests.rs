// tests/traverse_tests.rs
mod common;

use common::*;
use pipegraph::{traverse, Edge, EdgeMeta, ExecutionGraph};
use std::collections::HashMap;

fn pairs<'g>(edges: impl Iterator<Item = &'g Edge<&'static str>>) -> Vec<(&'static str, &'static str)> {
  edges.map(|e| (*e.caller(), *e.callee())).collect()
}

#[test]
fn test_traverse_breadth_first_from_single_root() {
  setup_tracing();
  let graph = build_graph(&[("b", "d", 0), ("a", "c", 0), ("c", "d", 1), ("a", "b", 0)]);

  let walked = pairs(traverse(&graph));
  assert_eq!(walked, vec![("a", "b"), ("a", "c"), ("b", "d"), ("c", "d")]);
}

#[test]
fn test_traverse_multiple_roots_first_visitor_wins() {
  setup_tracing();
  let graph = build_graph(&[("x", "z", 0), ("y", "z", 1), ("z", "w", 0)]);

  let traversal = graph.traverse();
  assert_eq!(traversal.roots(), vec![&"x", &"y"]);
  // z -> w is reached from x first and is not repeated for y.
  assert_eq!(pairs(traversal), vec![("x", "z"), ("z", "w"), ("y", "z")]);
}

#[test]
fn test_traverse_yields_every_edge_exactly_once() {
  setup_tracing();
  let edges = layered_edges(5, 4);
  let mut all = edges.clone();
  // A second, disconnected component.
  all.extend([(100, 101, 0), (101, 102, 0), (100, 102, 1)]);
  let graph = build_graph(&all);

  let mut seen: HashMap<&Edge<u32>, usize> = HashMap::new();
  for edge in graph.traverse() {
    *seen.entry(edge).or_default() += 1;
  }
  assert_eq!(seen.len(), graph.len());
  assert!(seen.values().all(|&count| count == 1));
}

#[test]
fn test_traverse_identical_edges_each_yielded_once() {
  setup_tracing();
  let graph = build_graph(&[(1u32, 2u32, 0), (1, 2, 0)]);
  assert_eq!(graph.traverse().count(), 2);
}

#[test]
fn test_traverse_sink_edges_all_appear() {
  setup_tracing();
  let mut graph = ExecutionGraph::new();
  graph.put_edge("left", "join", EdgeMeta::sink(0, "inputs"));
  graph.put_edge("right", "join", EdgeMeta::sink(0, "inputs"));
  graph.put_edge("join", "report", EdgeMeta::new(0, "table"));

  let walked = pairs(graph.traverse());
  assert_eq!(walked, vec![("left", "join"), ("join", "report"), ("right", "join")]);
}

#[test]
fn test_traverse_terminates_on_cycle_reachable_from_root() {
  setup_tracing();
  let graph = build_graph(&[("r", "a", 0), ("a", "b", 0), ("b", "a", 1)]);

  let walked = pairs(graph.traverse());
  assert_eq!(walked, vec![("r", "a"), ("a", "b"), ("b", "a")]);
}

#[test]
fn test_traverse_covers_rootless_cycle_component() {
  setup_tracing();
  let graph = build_graph(&[("a", "b", 0), ("b", "a", 0), ("r", "s", 0)]);

  let traversal = graph.traverse();
  assert_eq!(traversal.roots(), vec![&"r"]);
  assert_eq!(pairs(traversal), vec![("r", "s"), ("a", "b"), ("b", "a")]);
}

#[test]
fn test_traverse_is_independent_of_insertion_order() {
  setup_tracing();
  let edges = layered_edges(4, 3);
  let reference: Vec<Edge<u32>> = build_graph(&edges).traverse().cloned().collect();

  for seed in 1..=6 {
    let graph = build_graph(&shuffled(&edges, seed));
    let walked: Vec<Edge<u32>> = graph.traverse().cloned().collect();
    assert_eq!(walked, reference, "seed {} walked differently", seed);
  }
}

#[test]
fn test_traverse_is_lazy_and_sized() {
  setup_tracing();
  let graph = build_graph(&layered_edges(3, 3));
  let mut traversal = graph.traverse();
  assert_eq!(traversal.len(), graph.len());

  let first = traversal.next().unwrap();
  assert_eq!(*first.caller(), 0);
  assert_eq!(traversal.len(), graph.len() - 1);

  // A fresh traversal starts over.
  assert_eq!(graph.traverse().next(), Some(first));
}

#[test]
fn test_traverse_empty_graph() {
  setup_tracing();
  let graph: ExecutionGraph<u32> = ExecutionGraph::new();
  assert_eq!(graph.traverse().next(), None);
  assert!(graph.traverse().roots().is_empty());
}
