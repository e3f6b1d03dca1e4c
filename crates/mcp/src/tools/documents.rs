// Paginated document listing

use crate::protocol::ToolSchema;
use crate::tools::arguments::{ListDocumentsArgs, DEFAULT_PAGE, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use crate::tools::{json_schema_integer, json_schema_object, to_pretty_json, ToolName};
use rememberizer_sdk::api::{Document, DocumentPage, ListDocumentsRequest};
use rememberizer_sdk::{RememberizerClient, RememberizerResult};
use serde::Serialize;

pub fn list_documents_schema() -> ToolSchema {
    ToolSchema {
        name: ToolName::ListDocuments.to_string(),
        description: "Retrieves a paginated list of all documents in your personal/team knowledge \
            system. Sources could include Slack discussions, Gmail, Dropbox documents, Google Drive \
            documents, and uploaded files. Consider using the tool list_internal_knowledge_systems \
            to find out which are available.\n\n\
            Use this tool to browse through available documents and their metadata.\n\n\
            Examples:\n\
            - List first 100 documents: {\"page\": 1, \"page_size\": 100}\n\
            - Get next page: {\"page\": 2, \"page_size\": 100}\n\
            - Get maximum allowed documents: {\"page\": 1, \"page_size\": 1000}"
            .to_string(),
        input_schema: json_schema_object(
            serde_json::json!({
                "page": json_schema_integer(
                    "Page number for pagination (starts at 1)",
                    Some(1),
                    None,
                    Some(i64::from(DEFAULT_PAGE)),
                ),
                "page_size": json_schema_integer(
                    "Number of documents per page (1-1000)",
                    Some(1),
                    Some(i64::from(MAX_PAGE_SIZE)),
                    Some(i64::from(DEFAULT_PAGE_SIZE)),
                ),
            }),
            vec![],
        ),
    }
}

/// One page of documents as returned to the host. The host asks for
/// further pages itself.
#[derive(Debug, Serialize)]
pub struct DocumentListing {
    pub items: Vec<Document>,
    pub page: u32,
    pub page_size: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
    pub has_more: bool,
}

impl DocumentListing {
    fn from_page(page: DocumentPage, args: ListDocumentsArgs) -> Self {
        Self {
            has_more: page.next.is_some(),
            total: page.count,
            items: page.results,
            page: args.page,
            page_size: args.page_size,
        }
    }
}

pub async fn list_documents(
    client: &RememberizerClient,
    args: ListDocumentsArgs,
) -> RememberizerResult<String> {
    let request = ListDocumentsRequest {
        page: args.page,
        page_size: args.page_size,
    };
    let page = client.documents().list(&request).await?;
    to_pretty_json(&DocumentListing::from_page(page, args))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listing_shape() {
        let page: DocumentPage = serde_json::from_value(serde_json::json!({
            "count": 250,
            "next": "https://api.rememberizer.ai/api/v1/documents/?page=3",
            "previous": null,
            "results": [{"pk": 1, "name": "a.txt"}, {"pk": 2, "name": "b.txt"}]
        }))
        .unwrap();

        let listing = DocumentListing::from_page(page, ListDocumentsArgs { page: 2, page_size: 2 });
        let value = serde_json::to_value(&listing).unwrap();

        assert_eq!(value["page"], 2);
        assert_eq!(value["page_size"], 2);
        assert_eq!(value["total"], 250);
        assert_eq!(value["has_more"], true);
        assert_eq!(value["items"][1]["name"], "b.txt");
    }

    #[test]
    fn test_listing_without_total() {
        let page: DocumentPage =
            serde_json::from_value(serde_json::json!({"results": []})).unwrap();
        let args = ListDocumentsArgs {
            page: 1,
            page_size: 100,
        };
        let listing = DocumentListing::from_page(page, args);
        let value = serde_json::to_value(&listing).unwrap();

        assert!(value.get("total").is_none());
        assert_eq!(value["has_more"], false);
    }
}
