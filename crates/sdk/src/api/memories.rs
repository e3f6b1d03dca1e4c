//! Memory creation endpoint.

use crate::client::RememberizerClient;
use crate::error::RememberizerResult;
use serde::{Deserialize, Serialize};

const MEMORIZE_PATH: &str = "documents/memorize/";

/// Memories API for writing new knowledge.
pub struct MemoriesApi<'a> {
    client: &'a RememberizerClient,
}

impl<'a> MemoriesApi<'a> {
    pub(crate) fn new(client: &'a RememberizerClient) -> Self {
        Self { client }
    }

    /// Store a named piece of text.
    pub async fn memorize(
        &self,
        request: &MemorizeRequest,
    ) -> RememberizerResult<MemorizeResponse> {
        self.client.http.post(MEMORIZE_PATH, request).await
    }
}

/// Request to store a memory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemorizeRequest {
    pub name: String,
    pub content: String,
}

/// Response from storing a memory.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemorizeResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pk: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl MemorizeResponse {
    /// Identifier assigned by the upstream, if it returned one.
    pub fn identifier(&self) -> Option<serde_json::Value> {
        self.id.clone().or_else(|| self.pk.clone())
    }
}
