//! `tfdeps order`: resolve and print the deployment order.

use anyhow::{Context, Result};
use std::path::Path;
use tfdeps_core::{
    deployment_order, render_dot, to_json, topological_sort, DependencyGraph, DescriptorLoader,
};
use tracing::info;

/// Resolve the stack tree under `root` and print the ordering to stdout as a
/// JSON list. With `dot` set, the graph rendering additionally goes to stderr
/// so the primary output stays consumable by a matrix fan-out.
pub fn order(root: &Path, reverse: bool, max_depth: Option<usize>, dot: bool) -> Result<()> {
    let stacks = DescriptorLoader::discover(root, max_depth)
        .with_context(|| format!("Failed to scan stack tree at {}", root.display()))?;
    info!(stacks = stacks.len(), "Stack discovery complete");

    let graph = DependencyGraph::from_stacks(&stacks)?;

    if dot {
        eprint!("{}", render_dot(&graph));
    }

    let sorted = topological_sort(&graph)?;
    let order = deployment_order(&sorted, reverse);

    println!("{}", to_json(&order)?);
    Ok(())
}
