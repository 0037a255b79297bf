//! The navigation operations exposed to callers, one function per tool.
//!
//! Each call takes the shared [`ProjectState`], grabs a context snapshot,
//! and runs to completion against it; a reconfiguration landing mid-request
//! never changes what an in-flight request observes.

use std::path::Path;
use std::sync::Arc;

use crate::catalog::SymbolCatalog;
use crate::engine::{AnalysisEngine, DefinitionResult, ReferenceResult};
use crate::error::Result;
use crate::position::{Position, SymbolQuery};
use crate::project::{ProjectContext, ProjectState};
use crate::usages::{self, FileMatch};

pub struct Navigator {
    state: ProjectState,
    engine: AnalysisEngine,
}

impl Navigator {
    pub fn new() -> Self {
        Self {
            state: ProjectState::new(),
            engine: AnalysisEngine::new(),
        }
    }

    pub fn configure_project(
        &self,
        root_path: &Path,
        interpreter_path: Option<&Path>,
    ) -> Result<Arc<ProjectContext>> {
        self.state.configure(root_path, interpreter_path)
    }

    pub fn get_project_configuration(&self) -> Result<Arc<ProjectContext>> {
        self.state.snapshot()
    }

    /// Resolve the `occurrence`-th textual match of `symbol_name` on `line`
    /// to a column, then look up definitions at that exact position.
    pub fn find_definition_by_name(
        &self,
        file_path: &Path,
        line: u32,
        symbol_name: &str,
        occurrence: u32,
    ) -> Result<Vec<DefinitionResult>> {
        let ctx = self.state.snapshot()?;
        let resolved = ctx.resolve(file_path);
        let source = crate::engine::parser::read_source(&resolved)?;

        let query = SymbolQuery::NamedOccurrence {
            file_path: file_path.to_path_buf(),
            line,
            symbol_name: symbol_name.to_string(),
            occurrence,
        };
        let position = query.resolve(&source)?;

        self.engine.definitions_at(&ctx, &position)
    }

    pub fn find_definition(
        &self,
        file_path: &Path,
        line: u32,
        column: u32,
    ) -> Result<Vec<DefinitionResult>> {
        let ctx = self.state.snapshot()?;
        let position = Position::new(file_path, line, column);
        self.engine.definitions_at(&ctx, &position)
    }

    pub fn list_symbols(&self, file_path: &Path) -> Result<SymbolCatalog> {
        let ctx = self.state.snapshot()?;
        let raw = self.engine.names_in(&ctx, file_path)?;
        Ok(SymbolCatalog::build(raw))
    }

    pub fn find_references(
        &self,
        file_path: &Path,
        line: u32,
        column: u32,
    ) -> Result<Vec<ReferenceResult>> {
        let ctx = self.state.snapshot()?;
        let position = Position::new(file_path, line, column);
        self.engine.references_to(&ctx, &position)
    }

    pub fn find_in_file(&self, file_path: &Path, symbol_name: &str) -> Result<Vec<FileMatch>> {
        let ctx = self.state.snapshot()?;
        usages::find_in_file(&self.engine, &ctx, file_path, symbol_name)
    }
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new()
    }
}
