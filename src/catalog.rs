use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::engine::{RawSymbol, SymbolKind};

/// Symbols of one file grouped by category, each list in order of first
/// appearance. Every raw symbol lands in exactly one category, so the
/// per-category counts always sum to the engine's total.
#[derive(Debug, Default, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SymbolCatalog {
    pub functions: Vec<String>,
    pub classes: Vec<String>,
    pub variables: Vec<String>,
    pub params: Vec<String>,
    pub imports: Vec<String>,
    pub other: Vec<String>,
}

impl SymbolCatalog {
    pub fn build(raw: Vec<RawSymbol>) -> Self {
        let mut catalog = Self::default();
        for symbol in raw {
            catalog.category_mut(symbol.kind).push(symbol.name);
        }
        catalog
    }

    pub fn total(&self) -> usize {
        self.functions.len()
            + self.classes.len()
            + self.variables.len()
            + self.params.len()
            + self.imports.len()
            + self.other.len()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    // Total classification: anything without its own category is "other".
    fn category_mut(&mut self, kind: SymbolKind) -> &mut Vec<String> {
        match kind {
            SymbolKind::Function => &mut self.functions,
            SymbolKind::Class => &mut self.classes,
            SymbolKind::Variable => &mut self.variables,
            SymbolKind::Param => &mut self.params,
            SymbolKind::Import => &mut self.imports,
            SymbolKind::Reference => &mut self.other,
        }
    }
}
