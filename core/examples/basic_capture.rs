//! Declares a small ETL pipeline inside a capture context, including a nested
//! sub-pipeline, then orders it and picks a backend to run it.

use pipegraph::{
  EdgeMeta, ExecutionGraph, GraphContext, Interpreter, InterpreterRegistry, InterpreterVerdict,
};

// A pretend authoring layer: declaring an operation records its inputs.
fn op(ctx: &GraphContext<&'static str>, name: &'static str, inputs: &[&'static str]) -> &'static str {
  for (slot, input) in inputs.iter().enumerate() {
    ctx.record_edge(*input, name, EdgeMeta::new(slot, format!("arg{}", slot)));
  }
  name
}

fn merge(ctx: &GraphContext<&'static str>, name: &'static str, parts: &[&'static str]) -> &'static str {
  for part in parts {
    ctx.record_edge(*part, name, EdgeMeta::sink(0, "parts"));
  }
  name
}

struct LocalRunner;

impl Interpreter<&'static str> for LocalRunner {
  fn name(&self) -> &str {
    "local"
  }

  fn can_interpret(&self, graph: &ExecutionGraph<&'static str>) -> anyhow::Result<InterpreterVerdict> {
    let has_sinks = graph.edges().iter().any(|e| e.meta().is_sink());
    if has_sinks {
      Ok(InterpreterVerdict::declined("local", "sink slots are not supported"))
    } else {
      Ok(InterpreterVerdict::capable("local", ""))
    }
  }
}

struct ClusterRunner;

impl Interpreter<&'static str> for ClusterRunner {
  fn name(&self) -> &str {
    "cluster"
  }

  fn can_interpret(&self, graph: &ExecutionGraph<&'static str>) -> anyhow::Result<InterpreterVerdict> {
    Ok(InterpreterVerdict::capable("cluster", format!("{} edges", graph.len())))
  }
}

fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).init();

  let ctx: GraphContext<&'static str> = GraphContext::new();

  let (_, pipeline) = ctx.try_capture(|_| -> anyhow::Result<()> {
    let raw = op(&ctx, "extract", &[]);
    let us = op(&ctx, "clean_us", &[raw]);
    let eu = op(&ctx, "clean_eu", &[raw]);

    // A nested sub-pipeline lands in its own graph.
    let (_, normalizer) = ctx.capture(|_| {
      op(&ctx, "normalize", &["rows"]);
      op(&ctx, "dedupe", &["normalize"]);
    })?;
    println!("Nested sub-pipeline:\n{}", normalizer.read().dump());

    let all = merge(&ctx, "concat", &[us, eu]);
    op(&ctx, "load", &[all]);
    Ok(())
  })?;
  let graph = pipeline.snapshot();

  println!("Captured pipeline:\n{}", graph.dump());
  println!("Execution order: {:?}", graph.linearize()?);
  for edge in graph.traverse() {
    println!("  visit {}", edge);
  }

  let registry = InterpreterRegistry::<&'static str>::new();
  registry.register(ClusterRunner);
  registry.register(LocalRunner);

  let selection = registry.select(&graph)?;
  match selection.selected() {
    Some(backend) => println!("Selected interpreter: {}", backend.name()),
    None => println!("No interpreter accepted the graph:\n{}", selection.rejection_summary()),
  }
  Ok(())
}
