// Tool catalog: the fixed set of tools advertised to the host

use crate::error::GatewayError;
use crate::protocol::ToolSchema;
use crate::tools::{documents, knowledge, memory, search};
use std::collections::HashMap;

/// Every tool the gateway serves, in catalog order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolName {
    RetrieveSemanticallySimilar,
    SmartSearch,
    ListKnowledgeSystems,
    AccountInformation,
    ListDocuments,
    RememberThis,
}

impl ToolName {
    pub const ALL: [ToolName; 6] = [
        ToolName::RetrieveSemanticallySimilar,
        ToolName::SmartSearch,
        ToolName::ListKnowledgeSystems,
        ToolName::AccountInformation,
        ToolName::ListDocuments,
        ToolName::RememberThis,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::RetrieveSemanticallySimilar => "retrieve_semantically_similar_internal_knowledge",
            Self::SmartSearch => "smart_search_internal_knowledge",
            Self::ListKnowledgeSystems => "list_internal_knowledge_systems",
            Self::AccountInformation => "rememberizer_account_information",
            Self::ListDocuments => "list_personal_team_knowledge_documents",
            Self::RememberThis => "remember_this",
        }
    }

    /// Only `remember_this` writes to the repository.
    pub fn is_read_only(self) -> bool {
        !matches!(self, Self::RememberThis)
    }

    fn schema(self) -> ToolSchema {
        match self {
            Self::RetrieveSemanticallySimilar => search::retrieve_similar_schema(),
            Self::SmartSearch => search::smart_search_schema(),
            Self::ListKnowledgeSystems => knowledge::list_knowledge_systems_schema(),
            Self::AccountInformation => knowledge::account_information_schema(),
            Self::ListDocuments => documents::list_documents_schema(),
            Self::RememberThis => memory::remember_this_schema(),
        }
    }
}

impl std::fmt::Display for ToolName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Read-only registry built once at startup.
pub struct ToolCatalog {
    schemas: Vec<ToolSchema>,
    by_name: HashMap<&'static str, ToolName>,
}

impl ToolCatalog {
    pub fn new() -> Self {
        let schemas = ToolName::ALL.iter().map(|tool| tool.schema()).collect();
        let by_name = ToolName::ALL.iter().map(|tool| (tool.as_str(), *tool)).collect();
        Self { schemas, by_name }
    }

    /// All tool schemas, in stable catalog order.
    pub fn list_schemas(&self) -> &[ToolSchema] {
        &self.schemas
    }

    /// Resolve a tool by name
    pub fn resolve(&self, name: &str) -> Result<ToolName, GatewayError> {
        self.by_name
            .get(name)
            .copied()
            .ok_or_else(|| GatewayError::UnknownTool(name.to_string()))
    }
}

impl Default for ToolCatalog {
    fn default() -> Self {
        Self::new()
    }
}

// Helper functions for creating tool schemas

pub fn json_schema_object(properties: serde_json::Value, required: Vec<&str>) -> serde_json::Value {
    serde_json::json!({
        "type": "object",
        "properties": properties,
        "required": required
    })
}

pub fn json_schema_empty_object() -> serde_json::Value {
    json_schema_object(serde_json::json!({}), vec![])
}

pub fn json_schema_string(description: &str) -> serde_json::Value {
    serde_json::json!({
        "type": "string",
        "description": description
    })
}

pub fn json_schema_datetime(description: &str) -> serde_json::Value {
    serde_json::json!({
        "type": "string",
        "format": "date-time",
        "description": description
    })
}

pub fn json_schema_integer(
    description: &str,
    minimum: Option<i64>,
    maximum: Option<i64>,
    default: Option<i64>,
) -> serde_json::Value {
    let mut schema = serde_json::json!({
        "type": "integer",
        "description": description
    });
    if let Some(minimum) = minimum {
        schema["minimum"] = minimum.into();
    }
    if let Some(maximum) = maximum {
        schema["maximum"] = maximum.into();
    }
    if let Some(default) = default {
        schema["default"] = default.into();
    }
    schema
}
