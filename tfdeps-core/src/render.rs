//! Output rendering: the final ordering and the optional DOT visualization.
//!
//! Identifiers leave the system in the same `./<path>` form callers use to
//! declare stacks, so the output is directly usable as a set of working
//! directories. Rendering is pure and never entangled with the sort itself.

use crate::error::{Result, TfdepsError};
use crate::graph::{display_path, DependencyGraph};
use std::fmt::Write;

/// Convert a sorted sequence of canonical identifiers into the externally
/// consumed ordering, inverted when `reverse` is set (teardown order:
/// dependents before dependencies).
pub fn deployment_order(sorted: &[String], reverse: bool) -> Vec<String> {
    let mut order: Vec<String> = sorted.iter().map(|id| display_path(id)).collect();
    if reverse {
        order.reverse();
    }
    order
}

/// Serialize an ordering as a JSON array, suitable for a matrix-style fan-out.
pub fn to_json(order: &[String]) -> Result<String> {
    serde_json::to_string(order).map_err(|e| TfdepsError::Internal(e.to_string()))
}

/// Render the graph in Graphviz DOT form: one statement per node, one per
/// edge, in lexicographic order. Works on cyclic graphs too.
pub fn render_dot(graph: &DependencyGraph) -> String {
    let mut dot = String::from("digraph dependencies {\n");
    for (node, deps) in graph.iter() {
        let _ = writeln!(dot, "    {:?};", display_path(node));
        for dep in deps {
            let _ = writeln!(dot, "    {:?} -> {:?};", display_path(node), display_path(dep));
        }
    }
    dot.push_str("}\n");
    dot
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::DiscoveredStack;

    fn sample_graph() -> DependencyGraph {
        let stacks = vec![
            DiscoveredStack { dir: "ecs".into(), dependencies: vec!["./network".into()] },
            DiscoveredStack { dir: "network".into(), dependencies: vec![] },
        ];
        DependencyGraph::from_stacks(&stacks).unwrap()
    }

    #[test]
    fn test_deployment_order_forward() {
        let sorted = vec!["network".to_string(), "ecs".to_string()];
        assert_eq!(deployment_order(&sorted, false), vec!["./network", "./ecs"]);
    }

    #[test]
    fn test_deployment_order_reverse() {
        let sorted = vec!["network".to_string(), "ecs".to_string()];
        assert_eq!(deployment_order(&sorted, true), vec!["./ecs", "./network"]);
    }

    #[test]
    fn test_to_json() {
        let order = vec!["./network".to_string(), "./ecs".to_string()];
        assert_eq!(to_json(&order).unwrap(), r#"["./network","./ecs"]"#);
    }

    #[test]
    fn test_to_json_empty() {
        assert_eq!(to_json(&[]).unwrap(), "[]");
    }

    #[test]
    fn test_render_dot_lists_nodes_and_edges() {
        let dot = render_dot(&sample_graph());

        assert!(dot.starts_with("digraph dependencies {\n"));
        assert!(dot.ends_with("}\n"));
        assert!(dot.contains("\"./network\";"));
        assert!(dot.contains("\"./ecs\" -> \"./network\";"));
        // No fabricated edges.
        assert!(!dot.contains("\"./network\" -> "));
    }

    #[test]
    fn test_render_dot_is_deterministic() {
        assert_eq!(render_dot(&sample_graph()), render_dot(&sample_graph()));
    }
}
