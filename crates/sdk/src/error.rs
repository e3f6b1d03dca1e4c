//! Error types for the Rememberizer SDK.

use serde::{Deserialize, Serialize};

/// Result type for SDK operations.
pub type RememberizerResult<T> = Result<T, RememberizerError>;

/// Error types that can occur when talking to the Rememberizer API.
#[derive(Debug, thiserror::Error)]
pub enum RememberizerError {
    /// The request did not complete within the configured timeout.
    #[error("Request timed out")]
    Timeout,

    /// Connection or transport failure before a response arrived.
    #[error("Network error: {0}")]
    Network(#[source] reqwest::Error),

    /// Credential rejected (401/403).
    #[error("Authentication failed (status {status}): {message}")]
    Authentication { status: u16, message: String },

    /// Resource not found (404).
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Rate limited (429).
    #[error("Rate limited, retry after {retry_after_secs:?} seconds")]
    RateLimited { retry_after_secs: Option<u64> },

    /// Upstream server failure (5xx).
    #[error("Upstream server error (status {status}): {message}")]
    Server { status: u16, message: String },

    /// Body was not JSON, or did not match the expected shape.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// Any other non-success status (e.g. 400, 422).
    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// Coarse classification of a [`RememberizerError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Timeout,
    Network,
    Authentication,
    NotFound,
    RateLimited,
    Server,
    MalformedResponse,
    Api,
    Config,
}

impl RememberizerError {
    /// Check if this error is retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Timeout | Self::Network(_) | Self::RateLimited { .. } | Self::Server { .. }
        )
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Timeout => ErrorKind::Timeout,
            Self::Network(_) => ErrorKind::Network,
            Self::Authentication { .. } => ErrorKind::Authentication,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::RateLimited { .. } => ErrorKind::RateLimited,
            Self::Server { .. } => ErrorKind::Server,
            Self::MalformedResponse(_) => ErrorKind::MalformedResponse,
            Self::Api { .. } => ErrorKind::Api,
            Self::Config(_) | Self::InvalidUrl(_) => ErrorKind::Config,
        }
    }

    /// Classify a non-success response by status code.
    pub fn from_response(status: u16, retry_after_secs: Option<u64>, body: &str) -> Self {
        let message = error_message(body);
        match status {
            401 | 403 => Self::Authentication { status, message },
            404 => Self::NotFound(message),
            429 => Self::RateLimited { retry_after_secs },
            500..=599 => Self::Server { status, message },
            _ => Self::Api { status, message },
        }
    }
}

impl From<reqwest::Error> for RememberizerError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_decode() {
            Self::MalformedResponse(err.to_string())
        } else {
            Self::Network(err.without_url())
        }
    }
}

impl From<serde_json::Error> for RememberizerError {
    fn from(err: serde_json::Error) -> Self {
        Self::MalformedResponse(err.to_string())
    }
}

/// Error body returned by the Rememberizer API.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    #[serde(alias = "error", alias = "message")]
    pub detail: String,
}

const MAX_ERROR_BODY_CHARS: usize = 200;

fn error_message(body: &str) -> String {
    if let Ok(error_response) = serde_json::from_str::<ErrorResponse>(body) {
        return error_response.detail;
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "no details provided".to_string();
    }
    trimmed.chars().take(MAX_ERROR_BODY_CHARS).collect()
}
