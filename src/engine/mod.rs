pub mod parser;
pub mod queries;
pub mod walker;

use std::path::PathBuf;

use rayon::prelude::*;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::debug;
use tree_sitter::{Node, Point, QueryCursor, StreamingIterator};

use crate::error::{NavError, Result};
use crate::position::Position;
use crate::project::ProjectContext;

pub use parser::{ParsedFile, PythonParser};
pub use walker::PyFileWalker;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum SymbolKind {
    Function,
    Class,
    Variable,
    Param,
    Import,
    Reference,
}

impl SymbolKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SymbolKind::Function => "function",
            SymbolKind::Class => "class",
            SymbolKind::Variable => "variable",
            SymbolKind::Param => "param",
            SymbolKind::Import => "import",
            SymbolKind::Reference => "reference",
        }
    }
}

/// A resolved definition site, normalized from the raw tree.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DefinitionResult {
    pub name: String,
    pub kind: SymbolKind,
    pub defined_at: Option<Position>,
    pub docstring: Option<String>,
    pub signature: Option<String>,
}

/// One reference to a symbol somewhere in the project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ReferenceResult {
    pub file_path: PathBuf,
    pub position: Position,
    pub context_line_text: String,
}

/// Raw symbol descriptor as reported by `names_in`: one entry per named
/// occurrence in the file, declaration or usage, in document order.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct RawSymbol {
    pub name: String,
    pub kind: SymbolKind,
    pub position: Position,
    pub line_text: String,
}

/// The sole component that touches tree-sitter. Everything it returns is one
/// of the plain result records above; callers never see engine nodes.
pub struct AnalysisEngine {
    parser: PythonParser,
    walker: PyFileWalker,
}

impl AnalysisEngine {
    pub fn new() -> Self {
        Self {
            parser: PythonParser::new(),
            walker: PyFileWalker::new(),
        }
    }

    /// Definitions of the symbol under `position`.
    ///
    /// Same-file definition sites win; when the file has none, falls back to
    /// module-level definitions across the project root. An empty result
    /// means "no definition found" and is not an error.
    pub fn definitions_at(
        &self,
        ctx: &ProjectContext,
        position: &Position,
    ) -> Result<Vec<DefinitionResult>> {
        let path = ctx.resolve(&position.file_path);
        let parsed = self.parser.parse_file(&path)?;
        check_bounds(&parsed, position)?;

        let Some(ident) = identifier_at(&parsed, position) else {
            return Ok(Vec::new());
        };
        let name = parsed.node_text(&ident).to_string();
        debug!(symbol = %name, file = %path.display(), "resolving definitions");

        let mut results = collect_definitions(&parsed, &name, false)?;

        if results.is_empty() {
            for file in self.walker.walk(&ctx.root_path)? {
                if file == path {
                    continue;
                }
                let Ok(other) = self.parser.parse_file_lenient(&file) else {
                    continue;
                };
                results.extend(collect_definitions(&other, &name, true)?);
            }
        }

        results.sort_by(|a, b| a.defined_at.cmp(&b.defined_at));
        Ok(results)
    }

    /// Every occurrence of the symbol under `position` across the project
    /// root, ordered by (file, line, column).
    pub fn references_to(
        &self,
        ctx: &ProjectContext,
        position: &Position,
    ) -> Result<Vec<ReferenceResult>> {
        let path = ctx.resolve(&position.file_path);
        let parsed = self.parser.parse_file(&path)?;
        check_bounds(&parsed, position)?;

        let Some(ident) = identifier_at(&parsed, position) else {
            return Ok(Vec::new());
        };
        let name = parsed.node_text(&ident).to_string();

        let files = self.walker.walk(&ctx.root_path)?;
        debug!(symbol = %name, files = files.len(), "scanning for references");

        let mut references: Vec<ReferenceResult> = files
            .par_iter()
            .filter_map(|file| self.parser.parse_file_lenient(file).ok())
            .map(|parsed| identifier_occurrences(&parsed, &name))
            .collect::<Result<Vec<_>>>()?
            .into_iter()
            .flatten()
            .collect();

        references.sort_by(|a, b| {
            (&a.file_path, &a.position)
                .cmp(&(&b.file_path, &b.position))
        });
        Ok(references)
    }

    /// Every named occurrence in one file, with its kind, in document order.
    pub fn names_in(&self, ctx: &ProjectContext, file_path: &std::path::Path) -> Result<Vec<RawSymbol>> {
        let path = ctx.resolve(file_path);
        let parsed = self.parser.parse_file(&path)?;

        let mut symbols = Vec::new();
        collect_names(&parsed, parsed.root_node(), &mut symbols);
        Ok(symbols)
    }
}

impl Default for AnalysisEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn check_bounds(parsed: &ParsedFile, position: &Position) -> Result<()> {
    let line_text = crate::position::line_at(&parsed.source, position.line)?;
    if position.column as usize > line_text.len() {
        return Err(NavError::OutOfRange {
            line: position.line,
            reason: format!(
                "column {} is beyond line length {}",
                position.column,
                line_text.len()
            ),
        });
    }
    Ok(())
}

fn identifier_at<'a>(parsed: &'a ParsedFile, position: &Position) -> Option<Node<'a>> {
    let point = Point {
        row: position.line as usize - 1,
        column: position.column as usize,
    };
    let node = parsed
        .root_node()
        .named_descendant_for_point_range(point, point)?;
    (node.kind() == "identifier").then_some(node)
}

fn node_position(parsed: &ParsedFile, node: &Node) -> Position {
    Position::new(
        parsed.path.clone(),
        node.start_position().row as u32 + 1,
        node.start_position().column as u32,
    )
}

/// Definition sites in one file whose name matches `name`. With
/// `module_level_only`, keeps only functions, classes, and assignments
/// declared at the top of the module (the cross-file fallback).
fn collect_definitions(
    parsed: &ParsedFile,
    name: &str,
    module_level_only: bool,
) -> Result<Vec<DefinitionResult>> {
    let query = queries::definitions_query()?;
    let mut results = Vec::new();

    let mut cursor = QueryCursor::new();
    let mut matches = cursor.matches(query, parsed.root_node(), parsed.source_bytes());

    while let Some(m) = matches.next() {
        let mut name_node: Option<Node> = None;
        let mut def_node: Option<Node> = None;
        let mut kind: Option<SymbolKind> = None;

        for capture in m.captures {
            let capture_name = query.capture_names()[capture.index as usize];
            match capture_name {
                "function.name" => {
                    name_node = Some(capture.node);
                    kind = Some(SymbolKind::Function);
                }
                "class.name" => {
                    name_node = Some(capture.node);
                    kind = Some(SymbolKind::Class);
                }
                "variable.name" => {
                    name_node = Some(capture.node);
                    kind = Some(SymbolKind::Variable);
                }
                "param.name" => {
                    name_node = Some(capture.node);
                    kind = Some(SymbolKind::Param);
                }
                "import.name" => {
                    name_node = Some(capture.node);
                    kind = Some(SymbolKind::Import);
                }
                "function.def" | "class.def" => {
                    def_node = Some(capture.node);
                }
                _ => {}
            }
        }

        let (Some(name_node), Some(kind)) = (name_node, kind) else {
            continue;
        };
        if parsed.node_text(&name_node) != name {
            continue;
        }
        if module_level_only && !is_module_level(kind, &name_node, def_node.as_ref()) {
            continue;
        }

        let (docstring, signature) = match def_node {
            Some(def) => (extract_docstring(parsed, &def), extract_signature(parsed, &def)),
            None => (None, None),
        };

        results.push(DefinitionResult {
            name: name.to_string(),
            kind,
            defined_at: Some(node_position(parsed, &name_node)),
            docstring,
            signature,
        });
    }

    Ok(results)
}

fn is_module_level(kind: SymbolKind, name_node: &Node, def_node: Option<&Node>) -> bool {
    match kind {
        SymbolKind::Function | SymbolKind::Class => def_node
            .and_then(|d| d.parent())
            .is_some_and(|p| p.kind() == "module"),
        SymbolKind::Variable => name_node
            .parent()
            .and_then(|assign| assign.parent())
            .and_then(|stmt| stmt.parent())
            .is_some_and(|p| p.kind() == "module"),
        _ => false,
    }
}

/// All identifier occurrences of `name` in one parsed file, document order.
fn identifier_occurrences(parsed: &ParsedFile, name: &str) -> Result<Vec<ReferenceResult>> {
    let query = queries::identifiers_query()?;
    let mut occurrences = Vec::new();

    let mut cursor = QueryCursor::new();
    let mut matches = cursor.matches(query, parsed.root_node(), parsed.source_bytes());

    while let Some(m) = matches.next() {
        for capture in m.captures {
            if parsed.node_text(&capture.node) != name {
                continue;
            }
            let position = node_position(parsed, &capture.node);
            let context_line_text = parsed.line_text(position.line).to_string();
            occurrences.push(ReferenceResult {
                file_path: parsed.path.clone(),
                position,
                context_line_text,
            });
        }
    }

    Ok(occurrences)
}

/// Pre-order walk classifying every identifier by its syntactic role.
fn collect_names(parsed: &ParsedFile, node: Node, out: &mut Vec<RawSymbol>) {
    if node.kind() == "identifier" {
        let position = node_position(parsed, &node);
        let line_text = parsed.line_text(position.line).to_string();
        out.push(RawSymbol {
            name: parsed.node_text(&node).to_string(),
            kind: classify_identifier(&node),
            position,
            line_text,
        });
        return;
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_names(parsed, child, out);
    }
}

fn classify_identifier(node: &Node) -> SymbolKind {
    let Some(parent) = node.parent() else {
        return SymbolKind::Reference;
    };

    if within_import(node) {
        return SymbolKind::Import;
    }

    match parent.kind() {
        "function_definition" => SymbolKind::Function,
        "class_definition" => SymbolKind::Class,
        "parameters" | "typed_parameter" | "lambda_parameters" => SymbolKind::Param,
        "default_parameter" | "typed_default_parameter" => {
            if is_field_child(&parent, "name", node) {
                SymbolKind::Param
            } else {
                SymbolKind::Reference
            }
        }
        "assignment" | "augmented_assignment" => {
            if is_field_child(&parent, "left", node) {
                SymbolKind::Variable
            } else {
                SymbolKind::Reference
            }
        }
        "for_statement" => {
            if is_field_child(&parent, "left", node) {
                SymbolKind::Variable
            } else {
                SymbolKind::Reference
            }
        }
        "global_statement" | "nonlocal_statement" | "as_pattern_target" => SymbolKind::Variable,
        _ => SymbolKind::Reference,
    }
}

fn within_import(node: &Node) -> bool {
    let mut current = node.parent();
    while let Some(n) = current {
        match n.kind() {
            "import_statement" | "import_from_statement" | "future_import_statement" => {
                return true
            }
            "dotted_name" | "aliased_import" | "relative_import" | "import_prefix" => {
                current = n.parent();
            }
            _ => return false,
        }
    }
    false
}

fn is_field_child(parent: &Node, field: &str, node: &Node) -> bool {
    parent
        .child_by_field_name(field)
        .is_some_and(|c| c.id() == node.id())
}

/// First string expression of a function or class body, quotes stripped.
fn extract_docstring(parsed: &ParsedFile, def_node: &Node) -> Option<String> {
    let body = def_node.child_by_field_name("body")?;
    let first = body.named_child(0)?;
    if first.kind() != "expression_statement" {
        return None;
    }
    let string = first.named_child(0)?;
    if string.kind() != "string" {
        return None;
    }

    let mut content = String::new();
    let mut cursor = string.walk();
    for child in string.children(&mut cursor) {
        if child.kind() == "string_content" {
            content.push_str(parsed.node_text(&child));
        }
    }
    let trimmed = content.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// The `def`/`class` header, from the keyword up to the colon before the body.
fn extract_signature(parsed: &ParsedFile, def_node: &Node) -> Option<String> {
    let body = def_node.child_by_field_name("body")?;
    let header = parsed
        .source
        .get(def_node.start_byte()..body.start_byte())?;
    let signature = header.trim().trim_end_matches(':').trim_end();
    (!signature.is_empty()).then(|| signature.to_string())
}
