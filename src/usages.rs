use std::path::Path;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::engine::AnalysisEngine;
use crate::error::{NavError, Result};
use crate::project::ProjectContext;

/// One whole-identifier occurrence of a name within a single file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct FileMatch {
    pub line: u32,
    pub column: u32,
    pub line_text: String,
}

/// Every place `symbol_name` appears as a whole identifier in one file.
///
/// This is a single-file scan over the engine's symbol occurrences, not a
/// project-wide semantic reference search: a same-named symbol in an
/// unrelated scope still matches. Identifier-boundary matching falls out of
/// scanning tokens, so `foo` never matches inside `food`.
pub fn find_in_file(
    engine: &AnalysisEngine,
    ctx: &ProjectContext,
    file_path: &Path,
    symbol_name: &str,
) -> Result<Vec<FileMatch>> {
    if symbol_name.is_empty() {
        return Err(NavError::InvalidQuery("empty symbol name".to_string()));
    }

    let matches = engine
        .names_in(ctx, file_path)?
        .into_iter()
        .filter(|symbol| symbol.name == symbol_name)
        .map(|symbol| FileMatch {
            line: symbol.position.line,
            column: symbol.position.column,
            line_text: symbol.line_text,
        })
        .collect();

    Ok(matches)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn context_with(source: &str) -> (TempDir, ProjectContext) {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.py"), source).unwrap();
        let ctx = ProjectContext {
            root_path: dir.path().to_path_buf(),
            interpreter_path: None,
        };
        (dir, ctx)
    }

    #[test]
    fn test_finds_definition_and_usage() {
        let (_dir, ctx) = context_with("def foo():\n    pass\n\nfoo()\n");
        let engine = AnalysisEngine::new();

        let matches = find_in_file(&engine, &ctx, Path::new("a.py"), "foo").unwrap();
        assert_eq!(matches.len(), 2);
        assert_eq!((matches[0].line, matches[0].column), (1, 4));
        assert_eq!((matches[1].line, matches[1].column), (4, 0));
        assert_eq!(matches[1].line_text, "foo()");
    }

    #[test]
    fn test_excludes_longer_identifiers() {
        let (_dir, ctx) = context_with("def foo():\n    pass\n\nfood = 1\nfoo()\n");
        let engine = AnalysisEngine::new();

        let matches = find_in_file(&engine, &ctx, Path::new("a.py"), "foo").unwrap();
        assert_eq!(matches.len(), 2);
        assert!(matches.iter().all(|m| !m.line_text.contains("food")));
    }

    #[test]
    fn test_no_matches() {
        let (_dir, ctx) = context_with("x = 1\n");
        let engine = AnalysisEngine::new();

        let matches = find_in_file(&engine, &ctx, Path::new("a.py"), "missing").unwrap();
        assert!(matches.is_empty());
    }

    #[test]
    fn test_empty_name_is_invalid() {
        let (_dir, ctx) = context_with("x = 1\n");
        let engine = AnalysisEngine::new();

        let err = find_in_file(&engine, &ctx, Path::new("a.py"), "").unwrap_err();
        assert!(matches!(err, NavError::InvalidQuery(_)));
    }
}
