//! CLI command implementations.

mod graph;
mod order;

pub use graph::graph;
pub use order::order;
