//! Main client for the Rememberizer SDK.

use crate::api::*;
use crate::config::{ClientConfig, RetryConfig, DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
use crate::error::{RememberizerError, RememberizerResult};
use crate::transport::HttpTransport;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Main client for interacting with the Rememberizer API.
///
/// Cheap to clone; all clones share one connection pool and one immutable
/// configuration.
#[derive(Clone)]
pub struct RememberizerClient {
    config: Arc<ClientConfig>,
    pub(crate) http: HttpTransport,
}

impl RememberizerClient {
    /// Create a new client builder.
    pub fn builder() -> RememberizerClientBuilder {
        RememberizerClientBuilder::new()
    }

    /// Create a client from configuration.
    pub fn from_config(config: ClientConfig) -> RememberizerResult<Self> {
        let config = Arc::new(config);
        let http = HttpTransport::new(config.clone())?;

        Ok(Self { config, http })
    }

    /// Configuration this client was built with.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Get the search API.
    pub fn search(&self) -> SearchApi<'_> {
        SearchApi::new(self)
    }

    /// Get the integrations API.
    pub fn integrations(&self) -> IntegrationsApi<'_> {
        IntegrationsApi::new(self)
    }

    /// Get the account API.
    pub fn account(&self) -> AccountApi<'_> {
        AccountApi::new(self)
    }

    /// Get the documents API.
    pub fn documents(&self) -> DocumentsApi<'_> {
        DocumentsApi::new(self)
    }

    /// Get the memories API.
    pub fn memories(&self) -> MemoriesApi<'_> {
        MemoriesApi::new(self)
    }
}

/// Builder for creating a RememberizerClient.
pub struct RememberizerClientBuilder {
    base_url: Option<String>,
    api_key: Option<String>,
    timeout: Duration,
    retry_config: RetryConfig,
}

impl RememberizerClientBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            base_url: None,
            api_key: None,
            timeout: DEFAULT_TIMEOUT,
            retry_config: RetryConfig::default(),
        }
    }

    /// Set the base URL of the Rememberizer API. Defaults to the public endpoint.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the API key for authentication.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the retry configuration.
    pub fn retry_config(mut self, config: RetryConfig) -> Self {
        self.retry_config = config;
        self
    }

    /// Build the client.
    pub fn build(self) -> RememberizerResult<RememberizerClient> {
        let api_key = self
            .api_key
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| RememberizerError::Config("api_key is required".to_string()))?;

        if self.timeout.is_zero() {
            return Err(RememberizerError::Config("timeout must be greater than zero".to_string()));
        }

        let base_url = Url::parse(self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL))?;

        let mut config = ClientConfig::new(base_url, api_key);
        config.timeout = self.timeout;
        config.retry_config = self.retry_config;

        RememberizerClient::from_config(config)
    }
}

impl Default for RememberizerClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
