use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{NavError, Result};

/// Immutable snapshot of the configured project environment.
///
/// Every analysis operation receives one of these; reconfiguration produces a
/// new snapshot instead of mutating fields in place, so a request never sees
/// a mix of old root and new interpreter.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProjectContext {
    pub root_path: PathBuf,
    pub interpreter_path: Option<PathBuf>,
}

impl ProjectContext {
    /// Resolve a possibly relative file path against the project root.
    pub fn resolve(&self, file_path: &Path) -> PathBuf {
        if file_path.is_absolute() {
            file_path.to_path_buf()
        } else {
            self.root_path.join(file_path)
        }
    }
}

/// Process-wide holder for the current [`ProjectContext`].
///
/// Writes are serialized by the lock; readers get an `Arc` clone of the
/// current snapshot and keep using it even if a reconfiguration lands
/// mid-request.
#[derive(Default)]
pub struct ProjectState {
    current: RwLock<Option<Arc<ProjectContext>>>,
}

impl ProjectState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and install a new project configuration.
    ///
    /// The root must exist and be a directory. When no interpreter is given,
    /// falls back to `<root>/.venv/bin/python` if present.
    pub fn configure(
        &self,
        root_path: &Path,
        interpreter_path: Option<&Path>,
    ) -> Result<Arc<ProjectContext>> {
        let root = root_path
            .canonicalize()
            .map_err(|_| NavError::FileNotFound(root_path.to_path_buf()))?;
        if !root.is_dir() {
            return Err(NavError::InvalidQuery(format!(
                "project root is not a directory: {}",
                root.display()
            )));
        }

        let interpreter = match interpreter_path {
            Some(path) => Some(
                path.canonicalize()
                    .map_err(|_| NavError::FileNotFound(path.to_path_buf()))?,
            ),
            None => detect_interpreter(&root),
        };

        let context = Arc::new(ProjectContext {
            root_path: root,
            interpreter_path: interpreter,
        });

        info!(
            root = %context.root_path.display(),
            interpreter = ?context.interpreter_path,
            "project configured"
        );

        let mut guard = self.current.write().expect("project lock poisoned");
        *guard = Some(Arc::clone(&context));
        Ok(context)
    }

    /// Current configuration, or `NotConfigured` if never set.
    pub fn snapshot(&self) -> Result<Arc<ProjectContext>> {
        self.current
            .read()
            .expect("project lock poisoned")
            .clone()
            .ok_or(NavError::NotConfigured)
    }
}

fn detect_interpreter(root: &Path) -> Option<PathBuf> {
    let candidate = root.join(".venv").join("bin").join("python");
    candidate.is_file().then_some(candidate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_configure_valid_root() {
        let dir = TempDir::new().unwrap();
        let state = ProjectState::new();

        let ctx = state.configure(dir.path(), None).unwrap();
        assert_eq!(ctx.root_path, dir.path().canonicalize().unwrap());
        assert!(ctx.interpreter_path.is_none());
    }

    #[test]
    fn test_configure_missing_root() {
        let state = ProjectState::new();
        let err = state
            .configure(Path::new("/nonexistent/project/root"), None)
            .unwrap_err();
        assert!(matches!(err, NavError::FileNotFound(_)));
    }

    #[test]
    fn test_configure_missing_interpreter() {
        let dir = TempDir::new().unwrap();
        let state = ProjectState::new();
        let err = state
            .configure(dir.path(), Some(Path::new("/nonexistent/python")))
            .unwrap_err();
        assert!(matches!(err, NavError::FileNotFound(_)));
    }

    #[test]
    fn test_snapshot_before_configure() {
        let state = ProjectState::new();
        assert!(matches!(state.snapshot(), Err(NavError::NotConfigured)));
    }

    #[test]
    fn test_detects_venv_interpreter() {
        let dir = TempDir::new().unwrap();
        let bin = dir.path().join(".venv").join("bin");
        fs::create_dir_all(&bin).unwrap();
        fs::write(bin.join("python"), "").unwrap();

        let state = ProjectState::new();
        let ctx = state.configure(dir.path(), None).unwrap();
        assert!(ctx.interpreter_path.is_some());
    }

    #[test]
    fn test_reconfigure_replaces_snapshot() {
        let dir_a = TempDir::new().unwrap();
        let dir_b = TempDir::new().unwrap();
        let state = ProjectState::new();

        state.configure(dir_a.path(), None).unwrap();
        let old = state.snapshot().unwrap();
        state.configure(dir_b.path(), None).unwrap();
        let new = state.snapshot().unwrap();

        assert_ne!(old.root_path, new.root_path);
        // The old snapshot is still intact for requests that hold it.
        assert_eq!(old.root_path, dir_a.path().canonicalize().unwrap());
    }

    #[test]
    fn test_resolve_relative_path() {
        let dir = TempDir::new().unwrap();
        let state = ProjectState::new();
        let ctx = state.configure(dir.path(), None).unwrap();

        let resolved = ctx.resolve(Path::new("pkg/mod.py"));
        assert!(resolved.starts_with(&ctx.root_path));
    }
}
