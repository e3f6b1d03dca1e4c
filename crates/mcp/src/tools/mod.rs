pub mod arguments;
pub mod documents;
pub mod knowledge;
pub mod memory;
pub mod search;
mod registry;

pub use arguments::{DateWindow, ToolArguments};
pub use registry::{
    json_schema_datetime, json_schema_empty_object, json_schema_integer, json_schema_object,
    json_schema_string, ToolCatalog, ToolName,
};

use rememberizer_sdk::RememberizerResult;
use serde::Serialize;

/// Render a structured tool payload as indented JSON text.
pub(crate) fn to_pretty_json<T: Serialize>(value: &T) -> RememberizerResult<String> {
    Ok(serde_json::to_string_pretty(value)?)
}
