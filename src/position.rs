use std::path::PathBuf;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{NavError, Result};

/// Exact cursor location in a source file. Lines are 1-based, columns
/// 0-based, matching the tree-sitter convention used by the engine.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
pub struct Position {
    pub file_path: PathBuf,
    pub line: u32,
    pub column: u32,
}

impl Position {
    pub fn new(file_path: impl Into<PathBuf>, line: u32, column: u32) -> Self {
        Self {
            file_path: file_path.into(),
            line,
            column,
        }
    }
}

/// A navigation request before position resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SymbolQuery {
    ExactPosition {
        file_path: PathBuf,
        line: u32,
        column: u32,
    },
    NamedOccurrence {
        file_path: PathBuf,
        line: u32,
        symbol_name: String,
        occurrence: u32,
    },
}

impl SymbolQuery {
    /// Resolve this query to an exact position against the file's source
    /// text.
    ///
    /// For a named occurrence, finds all non-overlapping substring matches of
    /// the symbol name on the requested line, ordered left to right, and
    /// picks the one at `occurrence`. Purely textual, no semantic analysis.
    pub fn resolve(&self, source: &str) -> Result<Position> {
        match self {
            SymbolQuery::ExactPosition {
                file_path,
                line,
                column,
            } => Ok(Position::new(file_path.clone(), *line, *column)),
            SymbolQuery::NamedOccurrence {
                file_path,
                line,
                symbol_name,
                occurrence,
            } => {
                if symbol_name.is_empty() {
                    return Err(NavError::InvalidQuery("empty symbol name".to_string()));
                }

                let line_text = line_at(source, *line)?;
                let matches = substring_matches(line_text, symbol_name);

                match matches.get(*occurrence as usize) {
                    Some(&column) => Ok(Position::new(file_path.clone(), *line, column)),
                    None => Err(NavError::OccurrenceNotFound {
                        symbol: symbol_name.clone(),
                        line: *line,
                        occurrence: *occurrence,
                        found: matches.len(),
                    }),
                }
            }
        }
    }
}

/// The 1-based `line` of `source`, or `OutOfRange`.
pub fn line_at(source: &str, line: u32) -> Result<&str> {
    if line == 0 {
        return Err(NavError::OutOfRange {
            line,
            reason: "lines are numbered from 1".to_string(),
        });
    }
    source
        .lines()
        .nth(line as usize - 1)
        .ok_or_else(|| NavError::OutOfRange {
            line,
            reason: format!("file has {} lines", source.lines().count()),
        })
}

/// Start columns of all non-overlapping matches of `needle`, left to right.
fn substring_matches(line_text: &str, needle: &str) -> Vec<u32> {
    let mut columns = Vec::new();
    let mut start = 0;
    while let Some(found) = line_text[start..].find(needle) {
        let column = start + found;
        columns.push(column as u32);
        start = column + needle.len();
    }
    columns
}
