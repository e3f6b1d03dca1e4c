// Similarity and agentic search tools

use crate::protocol::ToolSchema;
use crate::tools::arguments::{RetrieveSimilarArgs, SmartSearchArgs};
use crate::tools::{
    json_schema_datetime, json_schema_integer, json_schema_object, json_schema_string, ToolName,
};
use rememberizer_sdk::api::{
    AgenticSearchRequest, MatchedChunk, SearchResponse, SemanticSearchRequest,
};
use rememberizer_sdk::{RememberizerClient, RememberizerResult};
use std::fmt::Write;

const QUERY_DESCRIPTION: &str =
    "Up to a 400-word sentence for which you wish to find semantically similar chunks of knowledge.";

const N_RESULTS_DESCRIPTION: &str = "Number of semantically similar chunks of text to return. \
    Use 'n_results=3' for up to 5, and 'n_results=10' for more information. \
    If you do not receive enough information, consider trying again with a larger 'n_results' value.";

const FROM_DESCRIPTION: &str = "Start date in ISO 8601 format with timezone (e.g., 2023-01-01T00:00:00Z). \
    Use this to filter results from a specific date.";

const TO_DESCRIPTION: &str = "End date in ISO 8601 format with timezone (e.g., 2024-01-01T00:00:00Z). \
    Use this to filter results until a specific date.";

pub fn retrieve_similar_schema() -> ToolSchema {
    ToolSchema {
        name: ToolName::RetrieveSemanticallySimilar.to_string(),
        description: "Send a block of text and retrieve cosine similar matches from your connected \
            Rememberizer personal/team internal knowledge and memory repository."
            .to_string(),
        input_schema: json_schema_object(
            serde_json::json!({
                "match_this": json_schema_string(QUERY_DESCRIPTION),
                "n_results": json_schema_integer(N_RESULTS_DESCRIPTION, Some(1), None, None),
                "from_datetime_ISO8601": json_schema_datetime(FROM_DESCRIPTION),
                "to_datetime_ISO8601": json_schema_datetime(TO_DESCRIPTION),
            }),
            vec!["match_this"],
        ),
    }
}

pub fn smart_search_schema() -> ToolSchema {
    ToolSchema {
        name: ToolName::SmartSearch.to_string(),
        description: "Search for documents in Rememberizer in its personal/team internal knowledge and \
            memory repository using a simple query that returns the results of an agentic search. \
            The search may include sources such as Slack discussions, Gmail, Dropbox documents, \
            Google Drive documents, and uploaded files. Use the tool list_internal_knowledge_systems \
            to find out which sources are available.\n\n\
            You can specify a from_datetime_ISO8601 and a to_datetime_ISO8601, and you should look at \
            the context of your request to make sure you put reasonable parameters around this by, for \
            example, converting a reference to recently to a start date two weeks before today, or \
            converting yesterday to a timeframe during the last day. But do be aware of the effect of \
            time zone differences in the source data and for the requestor."
            .to_string(),
        input_schema: json_schema_object(
            serde_json::json!({
                "query": json_schema_string(QUERY_DESCRIPTION),
                "user_context": json_schema_string(
                    "The additional context for the query. You might need to summarize the conversation \
                     up to this point for better context-aware results."
                ),
                "n_results": json_schema_integer(N_RESULTS_DESCRIPTION, Some(1), None, None),
                "from_datetime_ISO8601": json_schema_datetime(FROM_DESCRIPTION),
                "to_datetime_ISO8601": json_schema_datetime(TO_DESCRIPTION),
            }),
            vec!["query"],
        ),
    }
}

pub async fn retrieve_similar(
    client: &RememberizerClient,
    args: RetrieveSimilarArgs,
) -> RememberizerResult<String> {
    let request = SemanticSearchRequest {
        from: args.window.from_param(),
        to: args.window.to_param(),
        query: args.match_this,
        n_results: args.n_results,
    };
    let response = client.search().semantic(&request).await?;
    Ok(format_search_response(&response))
}

pub async fn smart_search(
    client: &RememberizerClient,
    args: SmartSearchArgs,
) -> RememberizerResult<String> {
    let request = AgenticSearchRequest {
        from: args.window.from_param(),
        to: args.window.to_param(),
        query: args.query,
        n_results: args.n_results,
        user_context: args.user_context,
    };
    let response = client.search().agentic(&request).await?;
    Ok(format_search_response(&response))
}

/// Numbered list of matched chunks, each attributed to its source document.
pub fn format_search_response(response: &SearchResponse) -> String {
    let mut output = String::new();

    if response.matched_chunks.is_empty() {
        output.push_str("No matching knowledge found.\n");
    } else {
        let _ = writeln!(output, "Found {} matching chunk(s).", response.matched_chunks.len());
        for (index, chunk) in response.matched_chunks.iter().enumerate() {
            output.push('\n');
            write_chunk(&mut output, index + 1, chunk);
        }
    }

    let sources: Vec<String> = response
        .data_sources
        .iter()
        .filter(|source| !source.name.is_empty())
        .map(|source| match source.documents {
            Some(count) => format!("{} ({} documents)", source.name, count),
            None => source.name.clone(),
        })
        .collect();
    if !sources.is_empty() {
        let _ = writeln!(output, "\nSearched sources: {}", sources.join(", "));
    }

    // Agentic search may answer with fields beyond the chunk list.
    if !response.extra.is_empty() {
        let extra = serde_json::Value::Object(response.extra.clone());
        let rendered = serde_json::to_string_pretty(&extra).unwrap_or_else(|_| extra.to_string());
        let _ = writeln!(output, "\nAdditional response data:\n{}", rendered);
    }

    output.trim_end().to_string()
}

fn write_chunk(output: &mut String, position: usize, chunk: &MatchedChunk) {
    let document = &chunk.document;
    let name = if document.name.is_empty() {
        "Untitled document"
    } else {
        document.name.as_str()
    };
    let source = document
        .integration
        .as_ref()
        .and_then(|integration| integration.integration_type.as_deref())
        .or(document.doc_type.as_deref());

    let _ = match source {
        Some(source) => writeln!(output, "{}. {} [{}]", position, name, source),
        None => writeln!(output, "{}. {}", position, name),
    };
    if let Some(location) = document.url.as_deref().or(document.path.as_deref()) {
        let _ = writeln!(output, "   Location: {}", location);
    }
    if let Some(modified) = &document.modified_time {
        let _ = writeln!(output, "   Modified: {}", modified);
    }
    if let Some(distance) = chunk.distance {
        let _ = writeln!(output, "   Distance: {:.4}", distance);
    }
    for line in chunk.matched_content.trim().lines() {
        let _ = writeln!(output, "   {}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_attributes_sources() {
        let response: SearchResponse = serde_json::from_value(serde_json::json!({
            "data_sources": [{"name": "Google Drive", "documents": 2}],
            "matched_chunks": [{
                "document": {
                    "name": "Q3 report.pdf",
                    "url": "https://drive.example.com/q3",
                    "integration": {"integration_type": "google_drive"}
                },
                "matched_content": "Revenue grew 12%\nMargins held",
                "distance": 0.2
            }]
        }))
        .unwrap();

        let text = format_search_response(&response);
        assert!(text.starts_with("Found 1 matching chunk(s)."));
        assert!(text.contains("1. Q3 report.pdf [google_drive]"));
        assert!(text.contains("Location: https://drive.example.com/q3"));
        assert!(text.contains("   Revenue grew 12%\n   Margins held"));
        assert!(text.contains("Searched sources: Google Drive (2 documents)"));
        assert!(!text.contains("Additional response data"));
    }

    #[test]
    fn test_format_empty_response() {
        let text = format_search_response(&SearchResponse::default());
        assert_eq!(text, "No matching knowledge found.");
    }

    #[test]
    fn test_format_keeps_extra_fields() {
        let response: SearchResponse =
            serde_json::from_value(serde_json::json!({"summary": "nothing relevant"})).unwrap();
        let text = format_search_response(&response);
        assert!(text.contains("Additional response data"));
        assert!(text.contains("nothing relevant"));
    }
}
