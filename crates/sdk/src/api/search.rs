//! Semantic and agentic search endpoints.

use crate::api::IntegrationRef;
use crate::client::RememberizerClient;
use crate::error::RememberizerResult;
use serde::{Deserialize, Serialize};

const SEARCH_PATH: &str = "documents/search/";
const AGENTIC_SEARCH_PATH: &str = "documents/agentic_search/";

/// Search API over the knowledge repository.
pub struct SearchApi<'a> {
    client: &'a RememberizerClient,
}

impl<'a> SearchApi<'a> {
    pub(crate) fn new(client: &'a RememberizerClient) -> Self {
        Self { client }
    }

    /// Vector-similarity search for chunks close to a block of text.
    pub async fn semantic(
        &self,
        request: &SemanticSearchRequest,
    ) -> RememberizerResult<SearchResponse> {
        self.client.http.get_with_query(SEARCH_PATH, request).await
    }

    /// Agentic multi-source search.
    pub async fn agentic(
        &self,
        request: &AgenticSearchRequest,
    ) -> RememberizerResult<SearchResponse> {
        self.client.http.post(AGENTIC_SEARCH_PATH, request).await
    }
}

/// Query parameters for a similarity search.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SemanticSearchRequest {
    #[serde(rename = "q")]
    pub query: String,
    #[serde(rename = "n", skip_serializing_if = "Option::is_none")]
    pub n_results: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
}

/// Body of an agentic search.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AgenticSearchRequest {
    pub query: String,
    #[serde(rename = "n_chunks", skip_serializing_if = "Option::is_none")]
    pub n_results: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_context: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
}

/// Search results. Unknown top-level fields are kept in `extra`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub data_sources: Vec<DataSource>,
    #[serde(default)]
    pub matched_chunks: Vec<MatchedChunk>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DataSource {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documents: Option<u64>,
}

/// A chunk of text matched by a search, with its source document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MatchedChunk {
    #[serde(default)]
    pub document: ChunkDocument,
    #[serde(default)]
    pub matched_content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChunkDocument {
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
    pub modified_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub integration: Option<IntegrationRef>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_semantic_request_omits_absent_fields() {
        let request = SemanticSearchRequest {
            query: "revenue".to_string(),
            ..Default::default()
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value, serde_json::json!({"q": "revenue"}));
    }

    #[test]
    fn test_agentic_request_field_names() {
        let request = AgenticSearchRequest {
            query: "roadmap".to_string(),
            n_results: Some(10),
            user_context: Some("planning Q3".to_string()),
            from: Some("2024-01-01T00:00:00Z".to_string()),
            to: None,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "query": "roadmap",
                "n_chunks": 10,
                "user_context": "planning Q3",
                "from": "2024-01-01T00:00:00Z"
            })
        );
    }

    #[test]
    fn test_response_keeps_unknown_fields() {
        let response: SearchResponse = serde_json::from_value(serde_json::json!({
            "matched_chunks": [{
                "document": {
                    "name": "Q3 report.pdf",
                    "integration": {"integration_type": "google_drive"}
                },
                "matched_content": "Revenue grew 12%",
                "distance": 0.21
            }],
            "answer": "Revenue grew."
        }))
        .unwrap();

        assert_eq!(response.matched_chunks.len(), 1);
        assert_eq!(response.matched_chunks[0].document.name, "Q3 report.pdf");
        assert_eq!(response.extra["answer"], "Revenue grew.");
    }

    #[test]
    fn test_response_rejects_wrong_shape() {
        let response =
            serde_json::from_value::<SearchResponse>(serde_json::json!({"matched_chunks": "nope"}));
        assert!(response.is_err());
    }
}
