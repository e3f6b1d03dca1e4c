//! Documents API endpoints.

use crate::client::RememberizerClient;
use crate::error::{RememberizerError, RememberizerResult};
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use serde::{Deserialize, Serialize};

const DOCUMENTS_PATH: &str = "documents/";

/// Bytes escaped when an id is placed in a single URL path segment.
pub const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Documents API for browsing stored knowledge.
pub struct DocumentsApi<'a> {
    client: &'a RememberizerClient,
}

impl<'a> DocumentsApi<'a> {
    pub(crate) fn new(client: &'a RememberizerClient) -> Self {
        Self { client }
    }

    /// List the first page of documents using upstream paging defaults.
    pub async fn list_default(&self) -> RememberizerResult<DocumentPage> {
        self.client.http.get(DOCUMENTS_PATH).await
    }

    /// List one page of documents. Pages start at 1.
    pub async fn list(&self, request: &ListDocumentsRequest) -> RememberizerResult<DocumentPage> {
        self.client.http.get_with_query(DOCUMENTS_PATH, request).await
    }

    /// Get the stored contents of a document.
    pub async fn contents(&self, id: &str) -> RememberizerResult<serde_json::Value> {
        let path = format!("documents/{}/contents/", encode_id(id)?);
        self.client.http.get(&path).await
    }

    /// Get the contents of a Slack discussion.
    pub async fn slack_contents(&self, id: &str) -> RememberizerResult<serde_json::Value> {
        let path = format!("discussions/{}/contents/", encode_id(id)?);
        self.client
            .http
            .get_with_query(&path, &[("integration_type", "slack")])
            .await
    }
}

fn encode_id(id: &str) -> RememberizerResult<String> {
    let id = id.trim();
    if id.is_empty() {
        return Err(RememberizerError::NotFound("empty document id".to_string()));
    }
    Ok(utf8_percent_encode(id, PATH_SEGMENT).to_string())
}

/// Query parameters for listing documents.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ListDocumentsRequest {
    pub page: u32,
    pub page_size: u32,
}

/// One page of documents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentPage {
    /// Total number of documents, when the upstream reports it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous: Option<String>,
    pub results: Vec<Document>,
}

/// Descriptor of a stored document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Document {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pk: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_id: Option<serde_json::Value>,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub doc_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub indexed_on: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub integration: Option<IntegrationRef>,
}

impl Document {
    /// Identifier used by the contents endpoints.
    pub fn identifier(&self) -> Option<String> {
        [self.pk.as_ref(), self.document_id.as_ref()]
            .into_iter()
            .flatten()
            .find_map(|value| match value {
                serde_json::Value::String(s) if !s.is_empty() => Some(s.clone()),
                serde_json::Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
    }

    /// Whether the document is a Slack discussion.
    pub fn is_slack(&self) -> bool {
        let integration_is_slack = self
            .integration
            .as_ref()
            .and_then(|i| i.integration_type.as_deref())
            .is_some_and(|t| t.eq_ignore_ascii_case("slack"));
        integration_is_slack
            || self
                .doc_type
                .as_deref()
                .is_some_and(|t| t.eq_ignore_ascii_case("slack"))
    }
}

/// Reference to the integration a document came from.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IntegrationRef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub integration_type: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_prefers_pk() {
        let doc: Document = serde_json::from_value(serde_json::json!({
            "pk": 42,
            "document_id": "1abc",
            "name": "notes.txt"
        }))
        .unwrap();
        assert_eq!(doc.identifier().as_deref(), Some("42"));
    }

    #[test]
    fn test_identifier_falls_back_to_document_id() {
        let doc: Document = serde_json::from_value(serde_json::json!({
            "document_id": "1abc",
            "name": "notes.txt"
        }))
        .unwrap();
        assert_eq!(doc.identifier().as_deref(), Some("1abc"));
    }

    #[test]
    fn test_is_slack() {
        let doc: Document = serde_json::from_value(serde_json::json!({
            "pk": 1,
            "name": "#general",
            "integration": {"id": 9, "integration_type": "slack"}
        }))
        .unwrap();
        assert!(doc.is_slack());
        assert!(!Document::default().is_slack());
    }

    #[test]
    fn test_page_without_results_is_rejected() {
        let page = serde_json::from_value::<DocumentPage>(serde_json::json!({"count": 3}));
        assert!(page.is_err());
    }

    #[test]
    fn test_encode_id() {
        assert_eq!(encode_id("C0123/1700000000.1").unwrap(), "C0123%2F1700000000.1");
        assert_eq!(encode_id("my doc+v2").unwrap(), "my%20doc+v2");
        assert_eq!(encode_id("100%").unwrap(), "100%25");
        assert!(encode_id("  ").is_err());
    }
}
