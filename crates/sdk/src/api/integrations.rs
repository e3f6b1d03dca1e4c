//! Integrations API endpoints.

use crate::client::RememberizerClient;
use crate::error::RememberizerResult;
use serde::{Deserialize, Serialize};

const INTEGRATIONS_PATH: &str = "integrations/";

/// Integrations API for the connected knowledge sources.
pub struct IntegrationsApi<'a> {
    client: &'a RememberizerClient,
}

impl<'a> IntegrationsApi<'a> {
    pub(crate) fn new(client: &'a RememberizerClient) -> Self {
        Self { client }
    }

    /// List connected knowledge sources (Slack, Gmail, Drive, uploads, ...).
    pub async fn list(&self) -> RememberizerResult<Vec<Integration>> {
        let response: IntegrationList = self.client.http.get(INTEGRATIONS_PATH).await?;
        Ok(response.data)
    }
}

#[derive(Debug, Deserialize)]
struct IntegrationList {
    #[serde(default)]
    data: Vec<Integration>,
}

/// One connected knowledge source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Integration {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<serde_json::Value>,
    #[serde(default)]
    pub integration_type: String,
    /// Connection progress, e.g. `done`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub integration_step: Option<String>,
    /// Account or workspace the source is connected to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_stats: Option<serde_json::Value>,
}
