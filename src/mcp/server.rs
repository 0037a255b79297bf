use std::path::{Path, PathBuf};
use std::sync::Arc;

use rmcp::handler::server::ServerHandler;
use rmcp::model::{
    CallToolRequestParams, CallToolResult, Content, Implementation, ListToolsResult,
    PaginatedRequestParams, ServerCapabilities, ServerInfo, Tool, ToolsCapability,
};
use rmcp::service::RequestContext;
use rmcp::{ErrorData as McpError, RoleServer};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::nav::Navigator;

/// MCP surface over [`Navigator`]: a pure dispatch layer, one tool per
/// navigation operation, no business logic of its own.
#[derive(Clone)]
pub struct McpServer {
    navigator: Arc<Navigator>,
}

impl McpServer {
    pub fn new(navigator: Arc<Navigator>) -> Self {
        Self { navigator }
    }

    fn configure_project_impl(
        &self,
        root_path: &Path,
        interpreter_path: Option<&Path>,
    ) -> Result<String> {
        let ctx = self.navigator.configure_project(root_path, interpreter_path)?;
        Ok(serde_json::to_string_pretty(&*ctx).unwrap_or_default())
    }

    fn get_project_configuration_impl(&self) -> Result<String> {
        let ctx = self.navigator.get_project_configuration()?;
        Ok(serde_json::to_string_pretty(&*ctx).unwrap_or_default())
    }

    fn find_definition_by_name_impl(
        &self,
        file_path: &Path,
        line: u32,
        symbol_name: &str,
        occurrence: u32,
    ) -> Result<String> {
        let defs = self
            .navigator
            .find_definition_by_name(file_path, line, symbol_name, occurrence)?;
        Ok(serde_json::to_string_pretty(&defs).unwrap_or_default())
    }

    fn find_definition_impl(&self, file_path: &Path, line: u32, column: u32) -> Result<String> {
        let defs = self.navigator.find_definition(file_path, line, column)?;
        Ok(serde_json::to_string_pretty(&defs).unwrap_or_default())
    }

    fn list_symbols_impl(&self, file_path: &Path) -> Result<String> {
        let catalog = self.navigator.list_symbols(file_path)?;
        Ok(serde_json::to_string_pretty(&catalog).unwrap_or_default())
    }

    fn find_references_impl(&self, file_path: &Path, line: u32, column: u32) -> Result<String> {
        let refs = self.navigator.find_references(file_path, line, column)?;
        Ok(serde_json::to_string_pretty(&refs).unwrap_or_default())
    }

    fn find_in_file_impl(&self, file_path: &Path, symbol_name: &str) -> Result<String> {
        let matches = self.navigator.find_in_file(file_path, symbol_name)?;
        Ok(serde_json::to_string_pretty(&matches).unwrap_or_default())
    }
}

fn schema_for<T: JsonSchema>() -> Arc<serde_json::Map<String, serde_json::Value>> {
    let schema = schemars::schema_for!(T);
    let value = serde_json::to_value(&schema).expect("Failed to serialize schema");
    match value {
        serde_json::Value::Object(map) => Arc::new(map),
        _ => Arc::new(serde_json::Map::new()),
    }
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct ConfigureProjectParams {
    /// Root directory of the Python project to analyze
    pub root_path: PathBuf,
    /// Python interpreter to analyze against (e.g. .venv/bin/python)
    #[serde(default)]
    pub interpreter_path: Option<PathBuf>,
}

#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
pub struct EmptyParams {}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct FindDefinitionByNameParams {
    /// Path to the Python file
    pub file_path: PathBuf,
    /// Line number where the symbol appears (1-based)
    pub line: u32,
    /// Name of the symbol to look up
    pub symbol_name: String,
    /// Which textual occurrence on the line (0-based, default first)
    #[serde(default)]
    pub occurrence: Option<u32>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct FindDefinitionParams {
    /// Path to the Python file
    pub file_path: PathBuf,
    /// Line number (1-based)
    pub line: u32,
    /// Column number (0-based)
    pub column: u32,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct ListSymbolsParams {
    /// Path to the Python file
    pub file_path: PathBuf,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct FindReferencesParams {
    /// Path to the Python file
    pub file_path: PathBuf,
    /// Line number (1-based)
    pub line: u32,
    /// Column number (0-based)
    pub column: u32,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct FindInFileParams {
    /// Path to the Python file
    pub file_path: PathBuf,
    /// Symbol name to search for
    pub symbol_name: String,
}

impl ServerHandler for McpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: Default::default(),
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability {
                    list_changed: Some(true),
                }),
                ..Default::default()
            },
            server_info: Implementation {
                name: "pynav".to_string(),
                title: Some("Python Navigator".to_string()),
                version: env!("CARGO_PKG_VERSION").to_string(),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Python code navigation tools. Call configure_project first, \
                 then use the find/list tools for definitions, references, \
                 and symbol listings."
                    .to_string(),
            ),
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<ListToolsResult, McpError> {
        let tools = vec![
            Tool {
                name: "configure_project".into(),
                title: Some("Configure Project".to_string()),
                description: Some(
                    "Set the project root and interpreter used by all other tools".into(),
                ),
                input_schema: schema_for::<ConfigureProjectParams>(),
                output_schema: None,
                annotations: None,
                icons: None,
                meta: None,
            },
            Tool {
                name: "get_project_configuration".into(),
                title: Some("Get Project Configuration".to_string()),
                description: Some("Current project root and interpreter".into()),
                input_schema: schema_for::<EmptyParams>(),
                output_schema: None,
                annotations: None,
                icons: None,
                meta: None,
            },
            Tool {
                name: "find_definition_by_name".into(),
                title: Some("Find Definition By Name".to_string()),
                description: Some(
                    "Find a symbol's definition given its name and the line it appears on".into(),
                ),
                input_schema: schema_for::<FindDefinitionByNameParams>(),
                output_schema: None,
                annotations: None,
                icons: None,
                meta: None,
            },
            Tool {
                name: "find_definition".into(),
                title: Some("Find Definition".to_string()),
                description: Some("Find a symbol's definition by exact position".into()),
                input_schema: schema_for::<FindDefinitionParams>(),
                output_schema: None,
                annotations: None,
                icons: None,
                meta: None,
            },
            Tool {
                name: "list_symbols".into(),
                title: Some("List Symbols".to_string()),
                description: Some("List every symbol in a file, grouped by category".into()),
                input_schema: schema_for::<ListSymbolsParams>(),
                output_schema: None,
                annotations: None,
                icons: None,
                meta: None,
            },
            Tool {
                name: "find_references".into(),
                title: Some("Find References".to_string()),
                description: Some(
                    "Find all references to the symbol at a position, project-wide".into(),
                ),
                input_schema: schema_for::<FindReferencesParams>(),
                output_schema: None,
                annotations: None,
                icons: None,
                meta: None,
            },
            Tool {
                name: "find_in_file".into(),
                title: Some("Find In File".to_string()),
                description: Some(
                    "Find every whole-identifier occurrence of a name in one file".into(),
                ),
                input_schema: schema_for::<FindInFileParams>(),
                output_schema: None,
                annotations: None,
                icons: None,
                meta: None,
            },
        ];

        Ok(ListToolsResult {
            next_cursor: None,
            tools,
            meta: None,
        })
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<CallToolResult, McpError> {
        let result = match request.name.as_ref() {
            "configure_project" => {
                let params: ConfigureProjectParams = serde_json::from_value(
                    serde_json::Value::Object(request.arguments.unwrap_or_default()),
                )
                .map_err(|e| McpError::invalid_params(e.to_string(), None))?;

                match self
                    .configure_project_impl(&params.root_path, params.interpreter_path.as_deref())
                {
                    Ok(json) => CallToolResult::success(vec![Content::text(json)]),
                    Err(e) => CallToolResult::error(vec![Content::text(e.to_string())]),
                }
            }
            "get_project_configuration" => match self.get_project_configuration_impl() {
                Ok(json) => CallToolResult::success(vec![Content::text(json)]),
                Err(e) => CallToolResult::error(vec![Content::text(e.to_string())]),
            },
            "find_definition_by_name" => {
                let params: FindDefinitionByNameParams = serde_json::from_value(
                    serde_json::Value::Object(request.arguments.unwrap_or_default()),
                )
                .map_err(|e| McpError::invalid_params(e.to_string(), None))?;

                match self.find_definition_by_name_impl(
                    &params.file_path,
                    params.line,
                    &params.symbol_name,
                    params.occurrence.unwrap_or(0),
                ) {
                    Ok(json) => CallToolResult::success(vec![Content::text(json)]),
                    Err(e) => CallToolResult::error(vec![Content::text(e.to_string())]),
                }
            }
            "find_definition" => {
                let params: FindDefinitionParams = serde_json::from_value(
                    serde_json::Value::Object(request.arguments.unwrap_or_default()),
                )
                .map_err(|e| McpError::invalid_params(e.to_string(), None))?;

                match self.find_definition_impl(&params.file_path, params.line, params.column) {
                    Ok(json) => CallToolResult::success(vec![Content::text(json)]),
                    Err(e) => CallToolResult::error(vec![Content::text(e.to_string())]),
                }
            }
            "list_symbols" => {
                let params: ListSymbolsParams = serde_json::from_value(serde_json::Value::Object(
                    request.arguments.unwrap_or_default(),
                ))
                .map_err(|e| McpError::invalid_params(e.to_string(), None))?;

                match self.list_symbols_impl(&params.file_path) {
                    Ok(json) => CallToolResult::success(vec![Content::text(json)]),
                    Err(e) => CallToolResult::error(vec![Content::text(e.to_string())]),
                }
            }
            "find_references" => {
                let params: FindReferencesParams = serde_json::from_value(
                    serde_json::Value::Object(request.arguments.unwrap_or_default()),
                )
                .map_err(|e| McpError::invalid_params(e.to_string(), None))?;

                match self.find_references_impl(&params.file_path, params.line, params.column) {
                    Ok(json) => CallToolResult::success(vec![Content::text(json)]),
                    Err(e) => CallToolResult::error(vec![Content::text(e.to_string())]),
                }
            }
            "find_in_file" => {
                let params: FindInFileParams = serde_json::from_value(serde_json::Value::Object(
                    request.arguments.unwrap_or_default(),
                ))
                .map_err(|e| McpError::invalid_params(e.to_string(), None))?;

                match self.find_in_file_impl(&params.file_path, &params.symbol_name) {
                    Ok(json) => CallToolResult::success(vec![Content::text(json)]),
                    Err(e) => CallToolResult::error(vec![Content::text(e.to_string())]),
                }
            }
            _ => {
                return Err(McpError::invalid_params(
                    format!("Unknown tool: {}", request.name),
                    None,
                ));
            }
        };

        Ok(result)
    }
}
