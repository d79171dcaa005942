//! Stack descriptor discovery and parsing.
//!
//! Every stack directory owns at most one `dependencies.json` describing which
//! other stacks it depends on. Discovery walks the tree, parsing is serde, and
//! the output is a plain list so the graph layer never touches the filesystem.

use crate::error::{Result, TfdepsError};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};

/// File name of the per-stack dependency descriptor.
pub const DESCRIPTOR_FILE: &str = "dependencies.json";

/// On-disk shape of a dependency descriptor.
///
/// The whole `dependencies` object may be absent, meaning "no dependencies".
/// When present, `paths` is required and must be a list of strings. Extra keys
/// elsewhere in the document are tolerated.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Descriptor {
    #[serde(default)]
    pub dependencies: Option<DependencySection>,
}

/// The `dependencies` object inside a descriptor.
#[derive(Debug, Clone, Deserialize)]
pub struct DependencySection {
    /// Dependency paths, relative to the dependency-tree root.
    pub paths: Vec<String>,
}

impl Descriptor {
    /// Declared dependency paths, as written in the file.
    pub fn dependency_paths(&self) -> Vec<String> {
        self.dependencies.as_ref().map(|d| d.paths.clone()).unwrap_or_default()
    }
}

/// A stack found during the directory walk, before any path resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredStack {
    /// Directory of the stack, relative to the scan root (`.` for the root itself).
    pub dir: String,

    /// Dependency paths exactly as declared in the descriptor.
    pub dependencies: Vec<String>,
}

/// Loader for stack dependency descriptors.
pub struct DescriptorLoader;

impl DescriptorLoader {
    /// Walk the tree beneath `root` and collect every stack that carries a
    /// descriptor. Directories without one are not stacks and produce nothing.
    ///
    /// The walk visits directory entries in lexicographic order and the result
    /// is sorted by stack directory, so repeated runs over an unchanged tree
    /// return an identical list. `max_depth` bounds how many levels below the
    /// root are searched (`None` means unbounded). Directory symlinks are not
    /// followed: every stack is discovered under exactly one identity.
    ///
    /// # Errors
    ///
    /// Returns `Unreadable` if `root` does not exist, is not a directory, or a
    /// subdirectory cannot be listed, and `MalformedDescriptor` if any
    /// descriptor fails to parse (see [`parse_file`](Self::parse_file)).
    #[instrument]
    pub fn discover(root: &Path, max_depth: Option<usize>) -> Result<Vec<DiscoveredStack>> {
        let meta = std::fs::metadata(root)
            .map_err(|e| TfdepsError::Unreadable { path: root.to_path_buf(), source: e })?;
        if !meta.is_dir() {
            return Err(TfdepsError::Unreadable {
                path: root.to_path_buf(),
                source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "not a directory"),
            });
        }

        let mut stacks = Vec::new();
        // Work list of (directory, root-relative path, depth). Explicit stack
        // instead of recursion so tree depth cannot exhaust the call stack.
        let mut pending: Vec<(PathBuf, String, usize)> =
            vec![(root.to_path_buf(), String::new(), 0)];

        while let Some((dir, rel, depth)) = pending.pop() {
            let descriptor_path = dir.join(DESCRIPTOR_FILE);
            if descriptor_path.is_file() {
                let descriptor = Self::parse_file(&descriptor_path)?;
                let stack_dir = if rel.is_empty() { ".".to_string() } else { rel.clone() };
                debug!(stack = %stack_dir, "Discovered stack");
                stacks.push(DiscoveredStack {
                    dir: stack_dir,
                    dependencies: descriptor.dependency_paths(),
                });
            }

            if let Some(limit) = max_depth {
                if depth >= limit {
                    continue;
                }
            }

            let entries = std::fs::read_dir(&dir)
                .map_err(|e| TfdepsError::Unreadable { path: dir.clone(), source: e })?;

            let mut subdirs: Vec<(String, PathBuf)> = Vec::new();
            for entry in entries {
                let entry = entry
                    .map_err(|e| TfdepsError::Unreadable { path: dir.clone(), source: e })?;
                // file_type() does not follow symlinks. Symlinked directories
                // are skipped so one physical stack cannot be discovered under
                // two identities (and a self-referencing link cannot loop).
                let file_type = entry
                    .file_type()
                    .map_err(|e| TfdepsError::Unreadable { path: entry.path(), source: e })?;
                if file_type.is_dir() {
                    let name = entry.file_name().to_string_lossy().into_owned();
                    subdirs.push((name, entry.path()));
                }
            }

            // Reverse-sorted so popping off the work list yields lexicographic order.
            subdirs.sort_by(|a, b| b.0.cmp(&a.0));
            for (name, path) in subdirs {
                let child_rel =
                    if rel.is_empty() { name } else { format!("{}/{}", rel, name) };
                pending.push((path, child_rel, depth + 1));
            }
        }

        stacks.sort_by(|a, b| a.dir.cmp(&b.dir));
        debug!(count = stacks.len(), "Descriptor discovery complete");
        Ok(stacks)
    }

    /// Parse a single descriptor file.
    ///
    /// # Errors
    ///
    /// Returns `Io` if the file cannot be read and `MalformedDescriptor`,
    /// naming the offending file, if the content is invalid JSON or does not
    /// match the descriptor shape.
    pub fn parse_file(path: &Path) -> Result<Descriptor> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| TfdepsError::Io { path: path.to_path_buf(), source: e })?;

        serde_json::from_str(&content).map_err(|e| TfdepsError::MalformedDescriptor {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_descriptor() {
        let descriptor: Descriptor =
            serde_json::from_str(r#"{"dependencies": {"paths": ["./network", "./ecs"]}}"#)
                .unwrap();
        assert_eq!(descriptor.dependency_paths(), vec!["./network", "./ecs"]);
    }

    #[test]
    fn test_parse_empty_paths() {
        let descriptor: Descriptor =
            serde_json::from_str(r#"{"dependencies": {"paths": []}}"#).unwrap();
        assert!(descriptor.dependency_paths().is_empty());
    }

    #[test]
    fn test_parse_absent_dependencies_object() {
        let descriptor: Descriptor = serde_json::from_str("{}").unwrap();
        assert!(descriptor.dependency_paths().is_empty());
    }

    #[test]
    fn test_parse_extra_keys_tolerated() {
        let descriptor: Descriptor = serde_json::from_str(
            r#"{"dependencies": {"paths": ["./a"], "note": "ignored"}, "owner": "platform"}"#,
        )
        .unwrap();
        assert_eq!(descriptor.dependency_paths(), vec!["./a"]);
    }

    #[test]
    fn test_parse_paths_missing_is_invalid() {
        let result: std::result::Result<Descriptor, _> =
            serde_json::from_str(r#"{"dependencies": {}}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_paths_wrong_type_is_invalid() {
        let result: std::result::Result<Descriptor, _> =
            serde_json::from_str(r#"{"dependencies": {"paths": [1, 2]}}"#);
        assert!(result.is_err());

        let result: std::result::Result<Descriptor, _> =
            serde_json::from_str(r#"{"dependencies": {"paths": "./a"}}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_discover_nonexistent_root() {
        let result = DescriptorLoader::discover(Path::new("/nonexistent/tfdeps-test"), None);
        assert!(matches!(result, Err(TfdepsError::Unreadable { .. })));
    }

    #[test]
    fn test_discover_root_is_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("not-a-dir");
        std::fs::write(&file, "x").unwrap();

        let result = DescriptorLoader::discover(&file, None);
        assert!(matches!(result, Err(TfdepsError::Unreadable { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn test_discover_does_not_follow_directory_symlinks() {
        let dir = tempfile::tempdir().unwrap();
        let network = dir.path().join("network");
        std::fs::create_dir(&network).unwrap();
        std::fs::write(network.join(DESCRIPTOR_FILE), r#"{"dependencies": {"paths": []}}"#)
            .unwrap();
        std::os::unix::fs::symlink(&network, dir.path().join("alias")).unwrap();

        let stacks = DescriptorLoader::discover(dir.path(), None).unwrap();
        let dirs: Vec<&str> = stacks.iter().map(|s| s.dir.as_str()).collect();
        assert_eq!(dirs, vec!["network"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_discover_ignores_self_referencing_symlink() {
        let dir = tempfile::tempdir().unwrap();
        let stack = dir.path().join("a");
        std::fs::create_dir(&stack).unwrap();
        std::fs::write(stack.join(DESCRIPTOR_FILE), r#"{"dependencies": {"paths": []}}"#)
            .unwrap();
        std::os::unix::fs::symlink(&stack, stack.join("loop")).unwrap();

        let stacks = DescriptorLoader::discover(dir.path(), None).unwrap();
        assert_eq!(stacks.len(), 1);
        assert_eq!(stacks[0].dir, "a");
    }

    #[test]
    fn test_discover_malformed_descriptor_names_file() {
        let dir = tempfile::tempdir().unwrap();
        let stack = dir.path().join("stack1");
        std::fs::create_dir(&stack).unwrap();
        std::fs::write(stack.join(DESCRIPTOR_FILE), "{not json").unwrap();

        let result = DescriptorLoader::discover(dir.path(), None);
        match result {
            Err(TfdepsError::MalformedDescriptor { path, .. }) => {
                assert!(path.ends_with("stack1/dependencies.json"));
            }
            other => panic!("expected MalformedDescriptor, got {:?}", other.err()),
        }
    }
}
