// Tool-invocation gateway: catalog lookup, validation, dispatch, result mapping

use crate::error::GatewayError;
use crate::protocol::{CallToolResult, ToolSchema};
use crate::tools::{documents, knowledge, memory, search, ToolArguments, ToolCatalog};
use rememberizer_sdk::RememberizerClient;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Serves tool invocations against one upstream client. Immutable after
/// construction, so it can be shared across concurrent invocations.
pub struct ToolGateway {
    catalog: ToolCatalog,
    client: RememberizerClient,
}

impl ToolGateway {
    pub fn new(client: RememberizerClient) -> Self {
        Self {
            catalog: ToolCatalog::new(),
            client,
        }
    }

    /// The advertised tools, in stable order.
    pub fn list_tools(&self) -> &[ToolSchema] {
        self.catalog.list_schemas()
    }

    pub fn client(&self) -> &RememberizerClient {
        &self.client
    }

    /// Run one invocation. Every outcome, including failures, is a result.
    pub async fn call_tool(&self, name: &str, arguments: serde_json::Value) -> CallToolResult {
        let started = Instant::now();
        match self.try_call_tool(name, arguments).await {
            Ok(text) => {
                let elapsed_ms = started.elapsed().as_millis();
                info!(tool = name, elapsed_ms, "Tool call succeeded");
                CallToolResult::text(text)
            }
            Err(err) => {
                let elapsed_ms = started.elapsed().as_millis();
                warn!(tool = name, elapsed_ms, error = %err, "Tool call failed");
                err.into_tool_result()
            }
        }
    }

    async fn try_call_tool(
        &self,
        name: &str,
        arguments: serde_json::Value,
    ) -> Result<String, GatewayError> {
        let tool = self.catalog.resolve(name)?;
        let arguments = ToolArguments::validate(tool, &arguments)?;
        debug!(tool = %tool, read_only = tool.is_read_only(), "Dispatching tool call");

        let client = &self.client;
        let text = match arguments {
            ToolArguments::RetrieveSemanticallySimilar(args) => {
                search::retrieve_similar(client, args).await?
            }
            ToolArguments::SmartSearch(args) => search::smart_search(client, args).await?,
            ToolArguments::ListKnowledgeSystems => knowledge::list_knowledge_systems(client).await?,
            ToolArguments::AccountInformation => knowledge::account_information(client).await?,
            ToolArguments::ListDocuments(args) => documents::list_documents(client, args).await?,
            ToolArguments::RememberThis(args) => memory::remember_this(client, args).await?,
        };
        Ok(text)
    }
}
