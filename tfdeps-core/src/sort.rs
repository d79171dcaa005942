//! Combined cycle detection and topological sort.
//!
//! Depth-first traversal with three-state coloring: a node is unvisited,
//! in-progress (on the current traversal path), or done. Hitting an
//! in-progress node means a back edge, i.e. a cycle. Nodes are appended in
//! post-order, so every dependency precedes its dependents in the result.
//!
//! The traversal uses an explicit frame stack rather than call recursion, so
//! pathologically deep dependency chains cannot exhaust the call stack.

use crate::error::{Result, TfdepsError};
use crate::graph::{display_path, DependencyGraph};
use std::collections::HashMap;
use tracing::{debug, instrument};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    InProgress,
    Done,
}

struct Frame<'a> {
    node: &'a str,
    deps: Vec<&'a str>,
    next: usize,
}

impl<'a> Frame<'a> {
    fn new(node: &'a str, graph: &'a DependencyGraph) -> Self {
        Self { node, deps: graph.dependencies_of(node).collect(), next: 0 }
    }
}

enum Step<'a> {
    Descend(&'a str),
    Finish(&'a str),
}

/// Sort the graph into deployment order (dependencies first).
///
/// Roots and outgoing edges are visited in lexicographic order of canonical
/// identifier, so the ordering is fully deterministic for a given graph.
///
/// # Errors
///
/// Returns `CircularDependency`, carrying the closed loop of display-form
/// identifiers, as soon as any cycle (including a self-edge) is found. No
/// partial ordering is returned in that case.
#[instrument(skip(graph), fields(nodes = graph.len()))]
pub fn topological_sort(graph: &DependencyGraph) -> Result<Vec<String>> {
    let mut marks: HashMap<&str, Mark> = HashMap::with_capacity(graph.len());
    let mut order: Vec<String> = Vec::with_capacity(graph.len());

    for start in graph.nodes() {
        if marks.contains_key(start) {
            continue;
        }
        marks.insert(start, Mark::InProgress);
        let mut stack = vec![Frame::new(start, graph)];

        loop {
            let step = match stack.last_mut() {
                None => break,
                Some(frame) => {
                    if frame.next < frame.deps.len() {
                        let dep = frame.deps[frame.next];
                        frame.next += 1;
                        Step::Descend(dep)
                    } else {
                        Step::Finish(frame.node)
                    }
                }
            };

            match step {
                Step::Descend(dep) => match marks.get(dep).copied() {
                    None => {
                        marks.insert(dep, Mark::InProgress);
                        stack.push(Frame::new(dep, graph));
                    }
                    Some(Mark::InProgress) => {
                        return Err(TfdepsError::CircularDependency {
                            cycle: close_cycle(&stack, dep),
                        });
                    }
                    Some(Mark::Done) => {}
                },
                Step::Finish(node) => {
                    marks.insert(node, Mark::Done);
                    order.push(node.to_string());
                    stack.pop();
                }
            }
        }
    }

    debug!(ordered = order.len(), "Topological sort complete");
    Ok(order)
}

/// Build the closed cycle path from the traversal stack: the back-edge target,
/// the path down to the current node, and the target again to close the loop.
fn close_cycle(stack: &[Frame<'_>], target: &str) -> Vec<String> {
    let first = stack.iter().position(|f| f.node == target).unwrap_or(0);
    let mut cycle: Vec<String> =
        stack[first..].iter().map(|f| display_path(f.node)).collect();
    cycle.push(display_path(target));
    cycle
}
