//! HTTP transport layer for the Rememberizer SDK.

use crate::config::ClientConfig;
use crate::error::{RememberizerError, RememberizerResult};
use reqwest::{header, Client, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

const API_KEY_HEADER: &str = "x-api-key";

/// HTTP transport for making API requests.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    config: Arc<ClientConfig>,
}

impl HttpTransport {
    /// Create a new HTTP transport with the given configuration.
    pub fn new(config: Arc<ClientConfig>) -> RememberizerResult<Self> {
        if config.api_key.trim().is_empty() {
            return Err(RememberizerError::Config("API key must not be empty".to_string()));
        }

        let mut api_key = header::HeaderValue::from_str(config.api_key.trim())
            .map_err(|_| RememberizerError::Config("Invalid API key format".to_string()))?;
        api_key.set_sensitive(true);

        let mut headers = header::HeaderMap::new();
        headers.insert(header::HeaderName::from_static(API_KEY_HEADER), api_key);
        headers.insert(header::ACCEPT, header::HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .user_agent(concat!("rememberizer-sdk/", env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| RememberizerError::Config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    /// Build a URL for the given path, relative to the base URL.
    fn build_url(&self, path: &str) -> RememberizerResult<url::Url> {
        Ok(self.config.base_url.join(path.trim_start_matches('/'))?)
    }

    /// Send a request, retrying only when `idempotent` is set.
    async fn execute(
        &self,
        request_builder: RequestBuilder,
        idempotent: bool,
    ) -> RememberizerResult<Response> {
        let retry_config = &self.config.retry_config;
        let max_retries = if idempotent { retry_config.max_retries } else { 0 };
        let mut attempts = 0;

        loop {
            let request = request_builder
                .try_clone()
                .ok_or_else(|| RememberizerError::Config("Request cannot be cloned".to_string()))?;

            match request.send().await {
                Ok(response) => {
                    if response.status().is_success() {
                        return Ok(response);
                    }

                    let status = response.status().as_u16();
                    if attempts < max_retries && retry_config.should_retry_status(status) {
                        let backoff = retry_config.backoff_for_attempt(attempts);
                        warn!(
                            status = status,
                            attempt = attempts + 1,
                            backoff_ms = backoff.as_millis(),
                            "Request failed, retrying"
                        );
                        tokio::time::sleep(backoff).await;
                        attempts += 1;
                        continue;
                    }

                    let retry_after = retry_after_secs(&response);
                    let body = response.text().await.unwrap_or_default();
                    return Err(RememberizerError::from_response(status, retry_after, &body));
                }
                Err(e) => {
                    let err = RememberizerError::from(e);
                    if attempts < max_retries && err.is_retryable() {
                        let backoff = retry_config.backoff_for_attempt(attempts);
                        warn!(
                            attempt = attempts + 1,
                            backoff_ms = backoff.as_millis(),
                            error = %err,
                            "Request did not complete, retrying"
                        );
                        tokio::time::sleep(backoff).await;
                        attempts += 1;
                        continue;
                    }
                    return Err(err);
                }
            }
        }
    }

    /// Execute a GET request.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> RememberizerResult<T> {
        let url = self.build_url(path)?;
        debug!(url = %url, "GET request");

        let response = self.execute(self.client.get(url), true).await?;
        parse_body(response).await
    }

    /// Execute a GET request with query parameters.
    pub async fn get_with_query<T: DeserializeOwned, Q: Serialize + ?Sized>(
        &self,
        path: &str,
        query: &Q,
    ) -> RememberizerResult<T> {
        let url = self.build_url(path)?;
        debug!(url = %url, "GET request with query");

        let response = self.execute(self.client.get(url).query(query), true).await?;
        parse_body(response).await
    }

    /// Execute a POST request with a JSON body. Never retried.
    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> RememberizerResult<T> {
        let url = self.build_url(path)?;
        debug!(url = %url, "POST request");

        let response = self.execute(self.client.post(url).json(body), false).await?;
        parse_body(response).await
    }
}

fn retry_after_secs(response: &Response) -> Option<u64> {
    response
        .headers()
        .get(header::RETRY_AFTER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse().ok())
}

async fn parse_body<T: DeserializeOwned>(response: Response) -> RememberizerResult<T> {
    let text = response.text().await?;
    serde_json::from_str(&text).map_err(|e| {
        tracing::error!(error = %e, "Upstream body does not match the expected shape");
        RememberizerError::MalformedResponse(e.to_string())
    })
}
