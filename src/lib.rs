pub mod catalog;
pub mod engine;
pub mod error;
pub mod nav;
pub mod position;
pub mod project;
pub mod usages;

pub use catalog::SymbolCatalog;
pub use engine::{
    AnalysisEngine, DefinitionResult, PyFileWalker, PythonParser, RawSymbol, ReferenceResult,
    SymbolKind,
};
pub use error::{NavError, Result};
pub use nav::Navigator;
pub use position::{Position, SymbolQuery};
pub use project::{ProjectContext, ProjectState};
pub use usages::FileMatch;
