//! `tfdeps graph`: print the dependency graph in DOT format.

use anyhow::{Context, Result};
use std::path::Path;
use tfdeps_core::{render_dot, DependencyGraph, DescriptorLoader};

/// Build the graph under `root` and print its DOT rendering to stdout.
///
/// Skips the sort, so a cyclic tree still renders.
pub fn graph(root: &Path, max_depth: Option<usize>) -> Result<()> {
    let stacks = DescriptorLoader::discover(root, max_depth)
        .with_context(|| format!("Failed to scan stack tree at {}", root.display()))?;

    let graph = DependencyGraph::from_stacks(&stacks)?;
    print!("{}", render_dot(&graph));
    Ok(())
}
