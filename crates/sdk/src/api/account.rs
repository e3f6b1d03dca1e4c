//! Account API endpoints.

use crate::client::RememberizerClient;
use crate::error::RememberizerResult;
use serde::{Deserialize, Serialize};

const ACCOUNT_PATH: &str = "account/";

/// Account API for the authenticated key holder.
pub struct AccountApi<'a> {
    client: &'a RememberizerClient,
}

impl<'a> AccountApi<'a> {
    pub(crate) fn new(client: &'a RememberizerClient) -> Self {
        Self { client }
    }

    /// Get the account behind the configured API key.
    pub async fn get(&self) -> RememberizerResult<AccountInfo> {
        self.client.http.get(ACCOUNT_PATH).await
    }
}

/// Account details. Fields beyond name and email are kept verbatim.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}
