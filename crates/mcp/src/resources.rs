// Stored documents exposed as readable MCP resources

use crate::protocol::{Resource, ResourceContents};
use percent_encoding::{percent_decode_str, utf8_percent_encode};
use rememberizer_sdk::api::{Document, PATH_SEGMENT};
use rememberizer_sdk::{RememberizerClient, RememberizerError};
use url::Url;

pub const RESOURCE_SCHEME: &str = "rememberizer";
const RESOURCE_MIME_TYPE: &str = "text/json";

#[derive(Debug, thiserror::Error)]
pub enum ResourceError {
    #[error("Unknown resource: {0}")]
    InvalidUri(String),

    #[error(transparent)]
    Upstream(#[from] RememberizerError),
}

/// Where a resource URI points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceLocator {
    Document(String),
    Slack(String),
}

impl ResourceLocator {
    /// Parse `rememberizer://document/{id}` or `rememberizer://slack/{id}`.
    ///
    /// The id is a single percent-encoded path segment.
    pub fn parse(uri: &str) -> Result<Self, ResourceError> {
        let invalid = || ResourceError::InvalidUri(uri.to_string());
        let url = Url::parse(uri).map_err(|_| invalid())?;
        if url.scheme() != RESOURCE_SCHEME {
            return Err(invalid());
        }

        let mut segments = url.path_segments().ok_or_else(invalid)?;
        let segment = match (segments.next(), segments.next()) {
            (Some(segment), None) if !segment.is_empty() => segment,
            _ => return Err(invalid()),
        };
        let id = percent_decode_str(segment)
            .decode_utf8()
            .map_err(|_| invalid())?
            .into_owned();

        match url.host_str() {
            Some("document") => Ok(Self::Document(id)),
            Some("slack") => Ok(Self::Slack(id)),
            _ => Err(invalid()),
        }
    }

    pub fn for_document(document: &Document) -> Option<Self> {
        let id = document.identifier()?;
        Some(if document.is_slack() {
            Self::Slack(id)
        } else {
            Self::Document(id)
        })
    }

    pub fn uri(&self) -> String {
        let (kind, id) = match self {
            Self::Document(id) => ("document", id),
            Self::Slack(id) => ("slack", id),
        };
        format!("{}://{}/{}", RESOURCE_SCHEME, kind, utf8_percent_encode(id, PATH_SEGMENT))
    }
}

/// Resources for the first page of stored documents.
pub async fn list_resources(client: &RememberizerClient) -> Result<Vec<Resource>, ResourceError> {
    let page = client.documents().list_default().await?;
    let resources = page
        .results
        .iter()
        .filter_map(|document| {
            let locator = ResourceLocator::for_document(document)?;
            Some(Resource {
                uri: locator.uri(),
                name: document.name.clone(),
                mime_type: RESOURCE_MIME_TYPE.to_string(),
            })
        })
        .collect();
    Ok(resources)
}

/// Fetch the contents behind a resource URI as pretty-printed JSON.
pub async fn read_resource(
    client: &RememberizerClient,
    uri: &str,
) -> Result<ResourceContents, ResourceError> {
    let contents = match ResourceLocator::parse(uri)? {
        ResourceLocator::Document(id) => client.documents().contents(&id).await?,
        ResourceLocator::Slack(id) => client.documents().slack_contents(&id).await?,
    };
    let text = serde_json::to_string_pretty(&contents).map_err(RememberizerError::from)?;

    Ok(ResourceContents {
        uri: uri.to_string(),
        mime_type: RESOURCE_MIME_TYPE.to_string(),
        text,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{any, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> RememberizerClient {
        RememberizerClient::builder()
            .base_url(server.uri())
            .api_key("test-token")
            .build()
            .unwrap()
    }

    #[test]
    fn test_parse_locators() {
        assert_eq!(
            ResourceLocator::parse("rememberizer://document/42").unwrap(),
            ResourceLocator::Document("42".to_string())
        );
        assert_eq!(
            ResourceLocator::parse("rememberizer://slack/C01ABC").unwrap(),
            ResourceLocator::Slack("C01ABC".to_string())
        );
        assert_eq!(
            ResourceLocator::parse("rememberizer://document/my%20doc").unwrap(),
            ResourceLocator::Document("my doc".to_string())
        );
        for bad in [
            "rememberizer://email/1",
            "rememberizer://document/",
            "rememberizer://document/1/2",
            "rememberizer://document",
            "https://document/1",
            "not a uri",
        ] {
            assert!(
                matches!(ResourceLocator::parse(bad), Err(ResourceError::InvalidUri(_))),
                "{bad}"
            );
        }
    }

    #[test]
    fn test_uri_round_trip() {
        for locator in [
            ResourceLocator::Slack("C01ABC".to_string()),
            ResourceLocator::Slack("C0123/1700000000.1".to_string()),
            ResourceLocator::Document("my doc+v2 100%".to_string()),
        ] {
            assert_eq!(ResourceLocator::parse(&locator.uri()).unwrap(), locator);
        }
        assert_eq!(
            ResourceLocator::Slack("C0123/1700000000.1".to_string()).uri(),
            "rememberizer://slack/C0123%2F1700000000.1"
        );
    }

    #[tokio::test]
    async fn test_listed_resources_are_readable() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/documents/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": [
                    {
                        "document_id": "C0123/1700000000.1",
                        "name": "#general",
                        "integration": {"integration_type": "slack"}
                    },
                    {"document_id": "my doc", "name": "my doc.txt"}
                ]
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/discussions/C0123%2F1700000000.1/contents/"))
            .and(query_param("integration_type", "slack"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"messages": ["hi"]})))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/documents/my%20doc/contents/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"content": "notes"})))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let resources = list_resources(&client).await.unwrap();
        assert_eq!(resources.len(), 2);

        for resource in &resources {
            let contents = read_resource(&client, &resource.uri).await.unwrap();
            assert_eq!(contents.uri, resource.uri);
        }
    }

    #[tokio::test]
    async fn test_list_resources() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/documents/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": [
                    {"pk": 1, "name": "plan.docx"},
                    {"pk": 2, "name": "#general", "integration": {"integration_type": "slack"}},
                    {"name": "no id"}
                ]
            })))
            .mount(&server)
            .await;

        let resources = list_resources(&client_for(&server)).await.unwrap();

        assert_eq!(resources.len(), 2);
        assert_eq!(resources[0].uri, "rememberizer://document/1");
        assert_eq!(resources[0].name, "plan.docx");
        assert_eq!(resources[1].uri, "rememberizer://slack/2");
        assert_eq!(resources[1].mime_type, "text/json");
    }

    #[tokio::test]
    async fn test_read_slack_resource() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/discussions/C01ABC/contents/"))
            .and(query_param("integration_type", "slack"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"messages": ["hi"]})))
            .expect(1)
            .mount(&server)
            .await;

        let contents = read_resource(&client_for(&server), "rememberizer://slack/C01ABC")
            .await
            .unwrap();

        assert_eq!(contents.uri, "rememberizer://slack/C01ABC");
        assert!(contents.text.contains("\"messages\""));
    }

    #[tokio::test]
    async fn test_read_invalid_uri_makes_no_calls() {
        let server = MockServer::start().await;
        Mock::given(any())
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let result = read_resource(&client_for(&server), "rememberizer://unknown/1").await;
        assert!(matches!(result, Err(ResourceError::InvalidUri(_))));
    }
}
