use once_cell::sync::OnceCell;
use tree_sitter::Query;

use crate::error::{NavError, Result};

static DEFINITIONS_QUERY: OnceCell<Query> = OnceCell::new();
static IDENTIFIERS_QUERY: OnceCell<Query> = OnceCell::new();

/// Definition sites a name can resolve to: functions, classes, assignments,
/// parameters, and import bindings. Capture names double as kind tags.
const DEFINITIONS: &str = r#"
(function_definition
    name: (identifier) @function.name
) @function.def

(class_definition
    name: (identifier) @class.name
) @class.def

(assignment
    left: (identifier) @variable.name
)

(parameters
    (identifier) @param.name
)

(typed_parameter
    (identifier) @param.name
)

(default_parameter
    name: (identifier) @param.name
)

(typed_default_parameter
    name: (identifier) @param.name
)

(import_statement
    name: (dotted_name . (identifier) @import.name)
)

(import_statement
    name: (aliased_import
        alias: (identifier) @import.name
    )
)

(import_from_statement
    name: (dotted_name . (identifier) @import.name)
)

(import_from_statement
    name: (aliased_import
        alias: (identifier) @import.name
    )
)
"#;

const IDENTIFIERS: &str = "(identifier) @id";

pub fn definitions_query() -> Result<&'static Query> {
    cached(&DEFINITIONS_QUERY, DEFINITIONS)
}

pub fn identifiers_query() -> Result<&'static Query> {
    cached(&IDENTIFIERS_QUERY, IDENTIFIERS)
}

fn cached(cell: &'static OnceCell<Query>, source: &str) -> Result<&'static Query> {
    cell.get_or_try_init(|| {
        Query::new(&tree_sitter_python::LANGUAGE.into(), source)
            .map_err(|e| NavError::Engine(format!("invalid tree-sitter query: {e}")))
    })
}
