use std::path::{Path, PathBuf};

use ignore::WalkBuilder;

use crate::error::Result;

const PYTHON_EXTENSIONS: &[&str] = &["py", "pyi"];

/// Enumerates the Python files under a project root.
pub struct PyFileWalker;

impl PyFileWalker {
    pub fn new() -> Self {
        Self
    }

    /// All Python files under `root`, honoring gitignore rules, in sorted
    /// order so project-wide scans are deterministic.
    pub fn walk(&self, root: &Path) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();

        let walker = WalkBuilder::new(root)
            .hidden(true)
            .git_ignore(true)
            .git_global(true)
            .git_exclude(true)
            .ignore(true)
            .build();

        for entry in walker.flatten() {
            let path = entry.path();
            if path.is_file() && is_python(path) {
                files.push(path.to_path_buf());
            }
        }

        files.sort();
        Ok(files)
    }
}

impl Default for PyFileWalker {
    fn default() -> Self {
        Self::new()
    }
}

fn is_python(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| PYTHON_EXTENSIONS.contains(&e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn create_file(dir: &Path, name: &str, content: &str) {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_walk_finds_python_files() {
        let dir = TempDir::new().unwrap();
        create_file(dir.path(), "main.py", "x = 1");
        create_file(dir.path(), "pkg/mod.py", "y = 2");
        create_file(dir.path(), "stubs.pyi", "z: int");
        create_file(dir.path(), "README.md", "# readme");

        let files = PyFileWalker::new().walk(dir.path()).unwrap();
        assert_eq!(files.len(), 3);
        assert!(files.iter().all(|p| is_python(p)));
    }

    #[test]
    fn test_walk_order_is_deterministic() {
        let dir = TempDir::new().unwrap();
        create_file(dir.path(), "b.py", "");
        create_file(dir.path(), "a.py", "");
        create_file(dir.path(), "c.py", "");

        let walker = PyFileWalker::new();
        let first = walker.walk(dir.path()).unwrap();
        let second = walker.walk(dir.path()).unwrap();

        assert_eq!(first, second);
        let names: Vec<_> = first
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap())
            .collect();
        assert_eq!(names, vec!["a.py", "b.py", "c.py"]);
    }

    #[test]
    fn test_walk_empty_directory() {
        let dir = TempDir::new().unwrap();
        let files = PyFileWalker::new().walk(dir.path()).unwrap();
        assert!(files.is_empty());
    }
}
