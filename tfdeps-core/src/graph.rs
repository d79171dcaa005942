//! Dependency graph construction.
//!
//! One node per discovered stack, one edge per declared dependency. Node
//! identity is the canonical root-relative path, so textually different paths
//! referring to the same directory collapse to a single node. Storage is
//! `BTreeMap`/`BTreeSet` so iteration order is lexicographic and stable.

use crate::descriptor::DiscoveredStack;
use crate::error::{Result, TfdepsError};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, instrument};

/// Normalize a root-relative path to its canonical identifier.
///
/// Lexical only: strips `.` segments and trailing slashes and collapses `..`
/// against preceding segments. `./a/b`, `a/b/` and `a/c/../b` all normalize
/// to the same identifier. The root itself is `.`. Leading `..` segments that
/// would escape the root are kept, so an escaping path can never alias an
/// in-root stack identifier.
pub fn canonicalize(path: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                if matches!(segments.last(), None | Some(&"..")) {
                    segments.push("..");
                } else {
                    segments.pop();
                }
            }
            other => segments.push(other),
        }
    }
    if segments.is_empty() {
        ".".to_string()
    } else {
        segments.join("/")
    }
}

/// Render a canonical identifier in the `./<path>` form used by descriptors
/// and expected by consumers of the ordering. Root-escaping identifiers are
/// already in their declared form and pass through unchanged.
pub fn display_path(id: &str) -> String {
    if id == ".." || id.starts_with("../") {
        id.to_string()
    } else {
        format!("./{}", id)
    }
}

/// Directed dependency graph over discovered stacks.
///
/// Adjacency is by outgoing edge: each node maps to the set of stacks it
/// depends on. Immutable once built; the sorter only reads it.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    edges: BTreeMap<String, BTreeSet<String>>,
}

impl DependencyGraph {
    /// Build the graph from the loader's output.
    ///
    /// Every declared dependency must resolve to a discovered stack; a path
    /// pointing anywhere else is a hard `UnknownDependency` failure, never a
    /// silently dropped edge. Self-edges are representable here and rejected
    /// later by the sorter as length-1 cycles.
    #[instrument(skip(stacks), fields(stacks = stacks.len()))]
    pub fn from_stacks(stacks: &[DiscoveredStack]) -> Result<Self> {
        let nodes: BTreeSet<String> =
            stacks.iter().map(|s| canonicalize(&s.dir)).collect();

        let mut edges: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for stack in stacks {
            let id = canonicalize(&stack.dir);
            let mut deps = BTreeSet::new();
            for declared in &stack.dependencies {
                let target = canonicalize(declared);
                if !nodes.contains(&target) {
                    return Err(TfdepsError::UnknownDependency {
                        stack: display_path(&id),
                        dependency: display_path(&target),
                    });
                }
                deps.insert(target);
            }
            edges.insert(id, deps);
        }

        debug!(nodes = edges.len(), "Dependency graph built");
        Ok(Self { edges })
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.edges.contains_key(id)
    }

    /// Node identifiers in lexicographic order.
    pub fn nodes(&self) -> impl Iterator<Item = &str> {
        self.edges.keys().map(String::as_str)
    }

    /// Direct dependencies of a node, in lexicographic order.
    /// Empty for unknown nodes.
    pub fn dependencies_of(&self, id: &str) -> impl Iterator<Item = &str> {
        self.edges.get(id).into_iter().flatten().map(String::as_str)
    }

    /// Iterate over (node, dependency set) pairs in lexicographic order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &BTreeSet<String>)> {
        self.edges.iter().map(|(node, deps)| (node.as_str(), deps))
    }
}
