// Knowledge source and account lookups

use crate::protocol::ToolSchema;
use crate::tools::{json_schema_empty_object, to_pretty_json, ToolName};
use rememberizer_sdk::api::{AccountInfo, Integration};
use rememberizer_sdk::{RememberizerClient, RememberizerResult};
use serde::Serialize;

pub fn list_knowledge_systems_schema() -> ToolSchema {
    ToolSchema {
        name: ToolName::ListKnowledgeSystems.to_string(),
        description: "List the sources of personal/team internal knowledge. These may include Slack \
            discussions, Gmail, Dropbox documents, Google Drive documents, and uploaded files."
            .to_string(),
        input_schema: json_schema_empty_object(),
    }
}

pub fn account_information_schema() -> ToolSchema {
    ToolSchema {
        name: ToolName::AccountInformation.to_string(),
        description: "Get information about your Rememberizer.ai personal/team knowledge repository \
            account. This includes account holder name and email address."
            .to_string(),
        input_schema: json_schema_empty_object(),
    }
}

/// What the host sees for each connected source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IntegrationDescriptor {
    pub name: String,
    #[serde(rename = "type")]
    pub integration_type: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_type: Option<String>,
}

impl From<&Integration> for IntegrationDescriptor {
    fn from(integration: &Integration) -> Self {
        let name = integration
            .source
            .clone()
            .filter(|source| !source.is_empty())
            .unwrap_or_else(|| integration.integration_type.clone());
        Self {
            name,
            integration_type: integration.integration_type.clone(),
            status: integration
                .integration_step
                .clone()
                .unwrap_or_else(|| "unknown".to_string()),
            document_type: integration.document_type.clone(),
        }
    }
}

pub async fn list_knowledge_systems(client: &RememberizerClient) -> RememberizerResult<String> {
    let integrations = client.integrations().list().await?;
    let descriptors: Vec<IntegrationDescriptor> =
        integrations.iter().map(IntegrationDescriptor::from).collect();
    to_pretty_json(&descriptors)
}

pub async fn account_information(client: &RememberizerClient) -> RememberizerResult<String> {
    let account = client.account().get().await?;
    to_pretty_json(&account_summary(account))
}

fn account_summary(account: AccountInfo) -> serde_json::Value {
    let mut summary = serde_json::Map::new();
    summary.insert("account_holder_name".to_string(), account.name.into());
    summary.insert("email".to_string(), account.email.into());
    if let Some(id) = account.id {
        summary.insert("id".to_string(), id);
    }
    for (key, value) in account.extra {
        summary.entry(key).or_insert(value);
    }
    serde_json::Value::Object(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_prefers_source_as_name() {
        let integration: Integration = serde_json::from_value(serde_json::json!({
            "id": 101,
            "integration_type": "gmail",
            "integration_step": "done",
            "source": "me@example.com",
            "document_type": "email"
        }))
        .unwrap();

        assert_eq!(
            IntegrationDescriptor::from(&integration),
            IntegrationDescriptor {
                name: "me@example.com".to_string(),
                integration_type: "gmail".to_string(),
                status: "done".to_string(),
                document_type: Some("email".to_string()),
            }
        );
    }

    #[test]
    fn test_descriptor_defaults() {
        let integration: Integration =
            serde_json::from_value(serde_json::json!({"integration_type": "slack"})).unwrap();
        let descriptor = IntegrationDescriptor::from(&integration);
        assert_eq!(descriptor.name, "slack");
        assert_eq!(descriptor.status, "unknown");
    }

    #[test]
    fn test_account_summary_fields() {
        let account: AccountInfo = serde_json::from_value(serde_json::json!({
            "id": 7,
            "name": "Ada Lovelace",
            "email": "ada@example.com",
            "plan": "team"
        }))
        .unwrap();

        let summary = account_summary(account);
        assert_eq!(summary["account_holder_name"], "Ada Lovelace");
        assert_eq!(summary["email"], "ada@example.com");
        assert_eq!(summary["id"], 7);
        assert_eq!(summary["plan"], "team");
    }
}
