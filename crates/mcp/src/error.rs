// Gateway error taxonomy and its translation into tool results

use crate::protocol::CallToolResult;
use rememberizer_sdk::RememberizerError;

/// An argument failed local validation. Never reaches the network.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid argument `{field}`: {constraint}")]
pub struct ValidationError {
    pub field: String,
    pub constraint: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, constraint: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            constraint: constraint.into(),
        }
    }
}

/// Anything that can go wrong while serving one tool invocation.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("unknown tool: {0}")]
    UnknownTool(String),

    #[error(transparent)]
    Upstream(#[from] RememberizerError),
}

impl GatewayError {
    /// Caller-facing result for this failure. Always `isError: true`.
    pub fn into_tool_result(self) -> CallToolResult {
        let message = match &self {
            Self::Validation(err) => format!(
                "Invalid arguments: `{}` {}. Fix the argument and call the tool again.",
                err.field, err.constraint
            ),
            Self::UnknownTool(name) => format!(
                "Unknown tool '{}'. Call tools/list to see the available tools.",
                name
            ),
            Self::Upstream(err) => describe_upstream_error(err),
        };
        CallToolResult::error(message)
    }
}

/// Human-readable text for an upstream failure. Never includes the credential.
pub fn describe_upstream_error(err: &RememberizerError) -> String {
    match err {
        RememberizerError::Timeout => {
            "Timeout: the Rememberizer API did not respond in time. The request may be retried."
                .to_string()
        }
        RememberizerError::Network(e) => format!(
            "Network error: could not reach the Rememberizer API ({}). The request may be retried.",
            e
        ),
        RememberizerError::Authentication { status, .. } => format!(
            "Authentication failed (status {}): the Rememberizer API rejected the credential. \
             Check REMEMBERIZER_API_TOKEN and re-authenticate.",
            status
        ),
        RememberizerError::NotFound(message) => format!(
            "Not found: {}. The requested page or resource does not exist.",
            message
        ),
        RememberizerError::RateLimited { retry_after_secs } => match retry_after_secs {
            Some(secs) => format!(
                "Rate limit exceeded: the Rememberizer API is throttling requests. Retry after {} seconds.",
                secs
            ),
            None => "Rate limit exceeded: the Rememberizer API is throttling requests. Retry later."
                .to_string(),
        },
        RememberizerError::Server { status, .. } => format!(
            "Upstream server error (status {}): the Rememberizer API failed temporarily. \
             The request may be retried.",
            status
        ),
        RememberizerError::MalformedResponse(detail) => {
            tracing::error!(detail = %detail, "Malformed response from Rememberizer API");
            "Malformed response: the Rememberizer API returned data in an unexpected format."
                .to_string()
        }
        RememberizerError::Api { status, message } => format!(
            "Request rejected by the Rememberizer API (status {}): {}",
            status, message
        ),
        RememberizerError::Config(_) | RememberizerError::InvalidUrl(_) => {
            format!("Gateway configuration error: {}", err)
        }
    }
}
