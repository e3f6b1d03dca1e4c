// Memory writes: the only tool that mutates the repository

use crate::protocol::ToolSchema;
use crate::tools::arguments::RememberThisArgs;
use crate::tools::{json_schema_object, json_schema_string, to_pretty_json, ToolName};
use rememberizer_sdk::api::{MemorizeRequest, MemorizeResponse};
use rememberizer_sdk::{RememberizerClient, RememberizerResult};
use serde::Serialize;

pub fn remember_this_schema() -> ToolSchema {
    ToolSchema {
        name: ToolName::RememberThis.to_string(),
        description: "Save a piece of text information in your Rememberizer.ai knowledge system so that \
            it may be recalled in future through tools retrieve_semantically_similar_internal_knowledge \
            or smart_search_internal_knowledge."
            .to_string(),
        input_schema: json_schema_object(
            serde_json::json!({
                "name": json_schema_string(
                    "Name of the information. This is used to identify the information in the future."
                ),
                "content": json_schema_string("The information you wish to memorize."),
            }),
            vec!["name", "content"],
        ),
    }
}

#[derive(Debug, PartialEq, Serialize)]
pub struct MemoryConfirmation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<serde_json::Value>,
    pub name: String,
    pub status: String,
}

impl MemoryConfirmation {
    fn new(response: MemorizeResponse, requested_name: String) -> Self {
        Self {
            id: response.identifier(),
            name: response.name.unwrap_or(requested_name),
            status: response.status.unwrap_or_else(|| "saved".to_string()),
        }
    }
}

pub async fn remember_this(
    client: &RememberizerClient,
    args: RememberThisArgs,
) -> RememberizerResult<String> {
    let name = args.name.clone();
    let request = MemorizeRequest {
        name: args.name,
        content: args.content,
    };
    let response = client.memories().memorize(&request).await?;
    tracing::info!(name = %name, "Stored memory");
    to_pretty_json(&MemoryConfirmation::new(response, name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confirmation_from_echo() {
        let response: MemorizeResponse =
            serde_json::from_value(serde_json::json!({"id": "abc123"})).unwrap();
        let confirmation = MemoryConfirmation::new(response, "test".to_string());

        assert_eq!(
            confirmation,
            MemoryConfirmation {
                id: Some(serde_json::json!("abc123")),
                name: "test".to_string(),
                status: "saved".to_string(),
            }
        );
    }

    #[test]
    fn test_confirmation_uses_upstream_status() {
        let response: MemorizeResponse = serde_json::from_value(serde_json::json!({
            "pk": 55,
            "name": "test",
            "status": "indexing"
        }))
        .unwrap();
        let confirmation = MemoryConfirmation::new(response, "ignored".to_string());

        assert_eq!(confirmation.id, Some(serde_json::json!(55)));
        assert_eq!(confirmation.name, "test");
        assert_eq!(confirmation.status, "indexing");
    }
}
