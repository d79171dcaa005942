//! Error types for tfdeps.
//!
//! All errors use `thiserror` for ergonomic error handling and proper error chains.
//! Every variant is fatal: each one indicates a problem with the input tree that
//! re-running cannot fix, so nothing here is retried or recovered locally.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for tfdeps operations.
pub type Result<T> = std::result::Result<T, TfdepsError>;

/// Main error type for tfdeps.
#[derive(Error, Debug)]
pub enum TfdepsError {
    /// The scan root does not exist, is not a directory, or cannot be traversed.
    #[error("Cannot read stack root {path:?}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A descriptor file exists but is not valid JSON or does not match the
    /// expected `{"dependencies": {"paths": [...]}}` shape.
    #[error("Malformed descriptor at {path:?}: {reason}")]
    MalformedDescriptor { path: PathBuf, reason: String },

    /// A stack declares a dependency that does not resolve to any discovered stack.
    #[error("Unknown dependency: stack '{stack}' depends on '{dependency}' which does not exist")]
    UnknownDependency { stack: String, dependency: String },

    /// The dependency graph contains a cycle. Carries the full closed loop so
    /// operators can see exactly which stacks form it.
    #[error("Circular dependency detected: {}", .cycle.join(" -> "))]
    CircularDependency { cycle: Vec<String> },

    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Internal error: {0}")]
    Internal(String),
}
