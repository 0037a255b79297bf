use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum NavError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("No project configured. Call configure_project first")]
    NotConfigured,

    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("Line {line} is out of range: {reason}")]
    OutOfRange { line: u32, reason: String },

    #[error("Occurrence {occurrence} of '{symbol}' not found on line {line} ({found} matches)")]
    OccurrenceNotFound {
        symbol: String,
        line: u32,
        occurrence: u32,
        found: usize,
    },

    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Failed to parse {}{}", .file.display(), .line.map(|l| format!(" (syntax error near line {})", l)).unwrap_or_default())]
    ParseFailure { file: PathBuf, line: Option<u32> },

    #[error("Engine error: {0}")]
    Engine(String),
}

pub type Result<T> = std::result::Result<T, NavError>;
