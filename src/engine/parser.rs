use std::path::{Path, PathBuf};

use tree_sitter::{Node, Tree};

use crate::error::{NavError, Result};

/// A parsed Python source file.
#[derive(Debug)]
pub struct ParsedFile {
    pub tree: Tree,
    pub source: String,
    pub path: PathBuf,
}

impl ParsedFile {
    pub fn root_node(&self) -> Node<'_> {
        self.tree.root_node()
    }

    pub fn source_bytes(&self) -> &[u8] {
        self.source.as_bytes()
    }

    pub fn node_text(&self, node: &Node) -> &str {
        node.utf8_text(self.source_bytes()).unwrap_or("")
    }

    /// Full text of the 1-based line a node starts on.
    pub fn line_text(&self, line: u32) -> &str {
        self.source.lines().nth(line as usize - 1).unwrap_or("")
    }
}

pub struct PythonParser;

impl PythonParser {
    pub fn new() -> Self {
        Self
    }

    /// Read and parse a file, failing with `ParseFailure` on syntax errors.
    pub fn parse_file(&self, path: &Path) -> Result<ParsedFile> {
        let source = read_source(path)?;
        let parsed = self.parse_source(source, path)?;
        if parsed.root_node().has_error() {
            return Err(NavError::ParseFailure {
                file: path.to_path_buf(),
                line: first_error_line(&parsed.root_node()),
            });
        }
        Ok(parsed)
    }

    /// Read and parse a file, keeping whatever tree-sitter could recover.
    ///
    /// Used for project-wide scans where one broken file must not abort the
    /// whole search.
    pub fn parse_file_lenient(&self, path: &Path) -> Result<ParsedFile> {
        let source = read_source(path)?;
        self.parse_source(source, path)
    }

    pub fn parse_source(&self, source: String, path: &Path) -> Result<ParsedFile> {
        let mut parser = tree_sitter::Parser::new();
        parser
            .set_language(&tree_sitter_python::LANGUAGE.into())
            .map_err(|e| NavError::Engine(e.to_string()))?;

        let tree = parser
            .parse(&source, None)
            .ok_or_else(|| NavError::Engine("tree-sitter returned no tree".to_string()))?;

        Ok(ParsedFile {
            tree,
            source,
            path: path.to_path_buf(),
        })
    }
}

impl Default for PythonParser {
    fn default() -> Self {
        Self::new()
    }
}

pub fn read_source(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            NavError::FileNotFound(path.to_path_buf())
        } else {
            NavError::Io(e)
        }
    })
}

/// 1-based line of the first ERROR or MISSING node, if any.
fn first_error_line(root: &Node) -> Option<u32> {
    fn visit(node: Node) -> Option<u32> {
        if node.is_error() || node.is_missing() {
            return Some(node.start_position().row as u32 + 1);
        }
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            if let Some(line) = visit(child) {
                return Some(line);
            }
        }
        None
    }
    visit(*root)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_py(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_parse_valid_file() {
        let dir = TempDir::new().unwrap();
        let path = write_py(&dir, "ok.py", "def foo():\n    pass\n");

        let parsed = PythonParser::new().parse_file(&path).unwrap();
        assert_eq!(parsed.root_node().kind(), "module");
        assert!(!parsed.root_node().has_error());
    }

    #[test]
    fn test_parse_syntax_error() {
        let dir = TempDir::new().unwrap();
        let path = write_py(&dir, "broken.py", "def foo(:\n    pass\n");

        let err = PythonParser::new().parse_file(&path).unwrap_err();
        match err {
            NavError::ParseFailure { file, line } => {
                assert_eq!(file, path);
                assert!(line.is_some());
            }
            other => panic!("expected ParseFailure, got {other:?}"),
        }
    }

    #[test]
    fn test_lenient_parse_keeps_partial_tree() {
        let dir = TempDir::new().unwrap();
        let path = write_py(&dir, "broken.py", "def foo(:\n    pass\n\ndef bar():\n    pass\n");

        let parsed = PythonParser::new().parse_file_lenient(&path).unwrap();
        assert!(parsed.root_node().has_error());
        assert!(parsed.source.contains("bar"));
    }

    #[test]
    fn test_parse_missing_file() {
        let err = PythonParser::new()
            .parse_file(Path::new("/nonexistent/missing.py"))
            .unwrap_err();
        assert!(matches!(err, NavError::FileNotFound(_)));
    }

    #[test]
    fn test_line_text() {
        let dir = TempDir::new().unwrap();
        let path = write_py(&dir, "ok.py", "x = 1\ny = 2\n");

        let parsed = PythonParser::new().parse_file(&path).unwrap();
        assert_eq!(parsed.line_text(2), "y = 2");
        assert_eq!(parsed.line_text(10), "");
    }
}
