//! tfdeps Core Library
//!
//! Discovery, graph construction, cycle detection, and deployment ordering for
//! directory trees of infrastructure stacks. The whole pipeline is a pure
//! function from "directory tree" to "ordered list or error":
//! descriptor loader -> graph builder -> topological sorter -> presenter.

pub mod descriptor;
pub mod error;
pub mod graph;
pub mod render;
pub mod sort;

// Re-export commonly used items
pub use descriptor::{Descriptor, DescriptorLoader, DiscoveredStack, DESCRIPTOR_FILE};
pub use error::{Result, TfdepsError};
pub use graph::{canonicalize, display_path, DependencyGraph};
pub use render::{deployment_order, render_dot, to_json};
pub use sort::topological_sort;
