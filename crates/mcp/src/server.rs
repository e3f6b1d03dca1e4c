// MCP server: JSON-RPC 2.0 over newline-delimited stdio

use crate::error::describe_upstream_error;
use crate::gateway::ToolGateway;
use crate::protocol::*;
use crate::resources::{self, ResourceError};
use anyhow::{Context, Result};
use futures_util::{SinkExt, StreamExt};
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio_util::codec::{FramedRead, FramedWrite, LinesCodec};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Upper bound on a single incoming message.
const MAX_LINE_LENGTH: usize = 8 * 1024 * 1024;

#[derive(Clone)]
pub struct McpServer {
    gateway: Arc<ToolGateway>,
    in_flight: Arc<Mutex<InFlight>>,
}

/// Cancellation tokens of running tool calls, keyed by request id.
///
/// Each entry carries the generation it was registered with so a finished call
/// never removes the token of a later call that reused its id.
#[derive(Default)]
struct InFlight {
    next_generation: u64,
    calls: HashMap<String, (u64, CancellationToken)>,
}

impl McpServer {
    pub fn new(gateway: ToolGateway) -> Self {
        Self {
            gateway: Arc::new(gateway),
            in_flight: Arc::new(Mutex::new(InFlight::default())),
        }
    }

    /// Serve on the process's stdin/stdout until stdin closes.
    pub async fn start(&self) -> Result<()> {
        info!(tools = self.gateway.list_tools().len(), "MCP server listening on stdio");
        self.serve(tokio::io::stdin(), tokio::io::stdout()).await
    }

    /// Serve until `reader` reaches EOF, then drain in-flight requests.
    pub async fn serve<R, W>(&self, reader: R, writer: W) -> Result<()>
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let mut lines = FramedRead::new(reader, LinesCodec::new_with_max_length(MAX_LINE_LENGTH));
        let (tx, mut rx) = mpsc::unbounded_channel::<JsonRpcResponse>();

        // One writer so responses never interleave.
        let writer_task = tokio::spawn(async move {
            let mut sink = FramedWrite::new(writer, LinesCodec::new());
            while let Some(response) = rx.recv().await {
                let line = serde_json::to_string(&response).context("Failed to encode response")?;
                sink.send(line).await.context("Failed to write response")?;
            }
            Ok::<_, anyhow::Error>(())
        });

        let mut tasks = JoinSet::new();
        let mut writer_alive = true;
        loop {
            let line = tokio::select! {
                line = lines.next() => match line {
                    Some(line) => line,
                    None => break,
                },
                Some(_) = tasks.join_next(), if !tasks.is_empty() => continue,
                _ = tx.closed() => {
                    warn!("Response writer stopped, no longer reading input");
                    writer_alive = false;
                    break;
                }
            };

            let line = match line {
                Ok(line) => line,
                Err(e) => {
                    warn!(error = %e, "Discarding unreadable input line");
                    if !send_response(&tx, parse_error_response()) {
                        writer_alive = false;
                        break;
                    }
                    continue;
                }
            };
            if line.trim().is_empty() {
                continue;
            }

            let request: JsonRpcRequest = match serde_json::from_str(&line) {
                Ok(request) => request,
                Err(e) => {
                    debug!(error = %e, "Failed to parse JSON-RPC message");
                    if !send_response(&tx, parse_error_response()) {
                        writer_alive = false;
                        break;
                    }
                    continue;
                }
            };

            if request.is_notification() {
                self.handle_notification(&request);
                continue;
            }

            let server = self.clone();
            let tx = tx.clone();
            if request.method == "tools/call" {
                let key = request_key(request.id.as_ref().unwrap_or(&serde_json::Value::Null));
                let (generation, token) = self.register(&key);
                tasks.spawn(async move {
                    tokio::select! {
                        _ = token.cancelled() => {
                            info!(request_id = %key, "Tool call cancelled by client");
                        }
                        response = server.handle_request(request) => {
                            send_response(&tx, response);
                        }
                    }
                    server.unregister(&key, generation);
                });
            } else {
                tasks.spawn(async move {
                    send_response(&tx, server.handle_request(request).await);
                });
            }
        }

        if writer_alive {
            while tasks.join_next().await.is_some() {}
        } else {
            tasks.shutdown().await;
        }
        drop(tx);
        writer_task.await.context("Response writer panicked")??;

        info!("Input closed, MCP server shutting down");
        Ok(())
    }

    /// Handle a request that expects a response.
    pub async fn handle_request(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        let id = request.id.clone().unwrap_or(serde_json::Value::Null);
        if request.jsonrpc != "2.0" {
            return JsonRpcResponse::error(id, JsonRpcError::invalid_request());
        }
        debug!(method = %request.method, "Handling request");

        match request.method.as_str() {
            "initialize" => {
                let params: InitializeParams = request
                    .params
                    .and_then(|params| serde_json::from_value(params).ok())
                    .unwrap_or_default();
                if let Some(client) = &params.client_info {
                    info!(client = %client.name, version = %client.version, "Client connected");
                }
                JsonRpcResponse::success(id, self.initialize_result(&params))
            }
            "ping" => JsonRpcResponse::success(id, serde_json::json!({})),
            "tools/list" => JsonRpcResponse::success(
                id,
                ListToolsResult {
                    tools: self.gateway.list_tools().to_vec(),
                },
            ),
            "tools/call" => match parse_params::<CallToolParams>(request.params) {
                Ok(params) => {
                    let result = self.gateway.call_tool(&params.name, params.arguments).await;
                    JsonRpcResponse::success(id, result)
                }
                Err(e) => JsonRpcResponse::error(id, e),
            },
            "resources/list" => match resources::list_resources(self.gateway.client()).await {
                Ok(resources) => JsonRpcResponse::success(id, ListResourcesResult { resources }),
                Err(e) => JsonRpcResponse::error(id, resource_error(e)),
            },
            "resources/read" => match parse_params::<ReadResourceParams>(request.params) {
                Ok(params) => {
                    let client = self.gateway.client();
                    match resources::read_resource(client, &params.uri).await {
                        Ok(contents) => JsonRpcResponse::success(
                            id,
                            ReadResourceResult {
                                contents: vec![contents],
                            },
                        ),
                        Err(e) => JsonRpcResponse::error(id, resource_error(e)),
                    }
                }
                Err(e) => JsonRpcResponse::error(id, e),
            },
            method => JsonRpcResponse::error(id, JsonRpcError::method_not_found(method)),
        }
    }

    fn handle_notification(&self, request: &JsonRpcRequest) {
        match request.method.as_str() {
            "notifications/initialized" => info!("Client initialization complete"),
            "notifications/cancelled" => {
                match parse_params::<CancelledParams>(request.params.clone()) {
                    Ok(params) => {
                        self.cancel(&request_key(&params.request_id), params.reason.as_deref())
                    }
                    Err(e) => warn!(error = %e.message, "Ignoring malformed cancellation"),
                }
            }
            method => debug!(method, "Ignoring notification"),
        }
    }

    fn initialize_result(&self, params: &InitializeParams) -> InitializeResult {
        InitializeResult {
            protocol_version: params
                .protocol_version
                .clone()
                .unwrap_or_else(|| PROTOCOL_VERSION.to_string()),
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability { list_changed: false }),
                resources: Some(ResourcesCapability {
                    subscribe: false,
                    list_changed: false,
                }),
            },
            server_info: ServerInfo {
                name: env!("CARGO_PKG_NAME").to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
        }
    }

    fn register(&self, key: &str) -> (u64, CancellationToken) {
        let token = CancellationToken::new();
        let mut in_flight = self.lock_in_flight();
        in_flight.next_generation += 1;
        let generation = in_flight.next_generation;
        let replaced = in_flight
            .calls
            .insert(key.to_string(), (generation, token.clone()))
            .is_some();
        if replaced {
            // The earlier call can no longer be cancelled by id.
            warn!(request_id = %key, "Request id reused while a tool call is still running");
        }
        (generation, token)
    }

    fn unregister(&self, key: &str, generation: u64) {
        let mut in_flight = self.lock_in_flight();
        if in_flight.calls.get(key).is_some_and(|(current, _)| *current == generation) {
            in_flight.calls.remove(key);
        }
    }

    fn cancel(&self, key: &str, reason: Option<&str>) {
        match self.lock_in_flight().calls.get(key) {
            Some((_, token)) => {
                debug!(request_id = %key, reason, "Cancelling in-flight tool call");
                token.cancel();
            }
            None => debug!(request_id = %key, "Cancellation for unknown or finished request"),
        }
    }

    fn lock_in_flight(&self) -> std::sync::MutexGuard<'_, InFlight> {
        // Entries stay consistent even if a holder panicked.
        self.in_flight.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Queue a response for the writer. Returns false once the writer has stopped.
fn send_response(tx: &mpsc::UnboundedSender<JsonRpcResponse>, response: JsonRpcResponse) -> bool {
    if tx.send(response).is_err() {
        debug!("Dropping response, writer has stopped");
        return false;
    }
    true
}

fn parse_error_response() -> JsonRpcResponse {
    JsonRpcResponse::error(serde_json::Value::Null, JsonRpcError::parse_error())
}

fn request_key(id: &serde_json::Value) -> String {
    id.to_string()
}

fn parse_params<T: DeserializeOwned>(
    params: Option<serde_json::Value>,
) -> Result<T, JsonRpcError> {
    let params = params.ok_or_else(|| JsonRpcError::invalid_params("Missing params"))?;
    serde_json::from_value(params)
        .map_err(|e| JsonRpcError::invalid_params(format!("Invalid params: {}", e)))
}

fn resource_error(err: ResourceError) -> JsonRpcError {
    match err {
        ResourceError::InvalidUri(_) => JsonRpcError::invalid_params(err.to_string()),
        ResourceError::Upstream(e) => JsonRpcError::internal_error(describe_upstream_error(&e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rememberizer_sdk::RememberizerClient;
    use serde_json::json;
    use std::time::Duration;
    use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn server_for(base_url: &str) -> McpServer {
        let client = RememberizerClient::builder()
            .base_url(base_url)
            .api_key("test-token")
            .build()
            .unwrap();
        McpServer::new(ToolGateway::new(client))
    }

    fn request(id: i64, method: &str, params: serde_json::Value) -> JsonRpcRequest {
        serde_json::from_value(json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params
        }))
        .unwrap()
    }

    /// Feed `input` lines to the server and collect every response line.
    async fn run_session(server: McpServer, input: &[serde_json::Value]) -> Vec<serde_json::Value> {
        let (mut client_in, server_in) = tokio::io::duplex(64 * 1024);
        let (server_out, client_out) = tokio::io::duplex(64 * 1024);

        let serving = tokio::spawn(async move { server.serve(server_in, server_out).await });

        for message in input {
            client_in.write_all(format!("{}\n", message).as_bytes()).await.unwrap();
        }
        client_in.write_all(b"this is not json\n").await.unwrap();
        drop(client_in);

        serving.await.unwrap().unwrap();

        let mut responses = Vec::new();
        let mut lines = BufReader::new(client_out).lines();
        while let Some(line) = lines.next_line().await.unwrap() {
            responses.push(serde_json::from_str(&line).unwrap());
        }
        responses
    }

    #[tokio::test]
    async fn test_initialize() {
        let server = server_for("http://127.0.0.1:9/");
        let response = server
            .handle_request(request(1, "initialize", json!({
                "protocolVersion": "2024-11-05",
                "capabilities": {},
                "clientInfo": {"name": "test-host", "version": "1.0"}
            })))
            .await;

        let result = response.result.unwrap();
        assert_eq!(result["protocolVersion"], "2024-11-05");
        assert_eq!(result["serverInfo"]["name"], "rememberizer-mcp");
        assert_eq!(result["capabilities"]["tools"]["listChanged"], false);
        assert!(result["capabilities"]["resources"].is_object());
    }

    #[tokio::test]
    async fn test_tools_list() {
        let server = server_for("http://127.0.0.1:9/");
        let response = server.handle_request(request(2, "tools/list", json!({}))).await;

        let tools = response.result.unwrap()["tools"].as_array().unwrap().clone();
        assert_eq!(tools.len(), 6);
        assert!(tools.iter().all(|tool| tool["inputSchema"]["type"] == "object"));
    }

    #[tokio::test]
    async fn test_unknown_method() {
        let server = server_for("http://127.0.0.1:9/");
        let response = server.handle_request(request(3, "prompts/list", json!({}))).await;

        assert_eq!(response.error.unwrap().code, -32601);
    }

    #[tokio::test]
    async fn test_tools_call_without_params() {
        let server = server_for("http://127.0.0.1:9/");
        let mut call = request(4, "tools/call", json!({}));
        call.params = None;

        let response = server.handle_request(call).await;
        assert_eq!(response.error.unwrap().code, -32602);
    }

    #[tokio::test]
    async fn test_unknown_tool_is_tool_error() {
        let server = server_for("http://127.0.0.1:9/");
        let response = server
            .handle_request(request(
                5,
                "tools/call",
                json!({"name": "delete_everything", "arguments": {}}),
            ))
            .await;

        let result = response.result.unwrap();
        assert_eq!(result["isError"], true);
        assert!(result["content"][0]["text"].as_str().unwrap().contains("Unknown tool"));
    }

    #[tokio::test]
    async fn test_read_resource_with_bad_uri() {
        let server = server_for("http://127.0.0.1:9/");
        let response = server
            .handle_request(request(
                6,
                "resources/read",
                json!({"uri": "rememberizer://nowhere/1"}),
            ))
            .await;

        assert_eq!(response.error.unwrap().code, -32602);
    }

    #[tokio::test]
    async fn test_stdio_session() {
        let server = server_for("http://127.0.0.1:9/");
        let responses = run_session(
            server,
            &[
                json!({"jsonrpc": "2.0", "id": 1, "method": "initialize", "params": {}}),
                json!({"jsonrpc": "2.0", "method": "notifications/initialized"}),
                json!({"jsonrpc": "2.0", "id": 2, "method": "ping"}),
            ],
        )
        .await;

        // initialize, ping and the parse error; the notification gets nothing.
        assert_eq!(responses.len(), 3);
        assert!(responses.iter().any(|r| r["id"] == 1 && r["result"]["serverInfo"].is_object()));
        assert!(responses.iter().any(|r| r["id"] == 2 && r["result"] == json!({})));
        assert!(responses.iter().any(|r| r["id"].is_null() && r["error"]["code"] == -32700));
    }

    #[tokio::test]
    async fn test_cancelled_call_gets_no_response() {
        let upstream = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/account/"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"name": "slow"}))
                    .set_delay(Duration::from_secs(10)),
            )
            .mount(&upstream)
            .await;

        let responses = run_session(
            server_for(&upstream.uri()),
            &[
                json!({
                    "jsonrpc": "2.0", "id": 7, "method": "tools/call",
                    "params": {"name": "rememberizer_account_information", "arguments": {}}
                }),
                json!({
                    "jsonrpc": "2.0",
                    "method": "notifications/cancelled",
                    "params": {"requestId": 7}
                }),
                json!({"jsonrpc": "2.0", "id": 8, "method": "ping"}),
            ],
        )
        .await;

        assert!(responses.iter().all(|r| r["id"] != 7));
        assert!(responses.iter().any(|r| r["id"] == 8));
    }

    #[tokio::test]
    async fn test_long_session_answers_every_request() {
        let server = server_for("http://127.0.0.1:9/");
        let input: Vec<_> = (1..=200)
            .map(|id| json!({"jsonrpc": "2.0", "id": id, "method": "ping"}))
            .collect();

        let responses = run_session(server, &input).await;

        // 200 pings plus the trailing parse error.
        assert_eq!(responses.len(), 201);
        for id in 1..=200 {
            assert!(responses.iter().any(|r| r["id"] == id), "missing response {id}");
        }
    }

    #[tokio::test]
    async fn test_reused_request_id_stays_cancellable() {
        let server = server_for("http://127.0.0.1:9/");
        let (first_generation, first) = server.register("7");
        let (_, second) = server.register("7");

        // The first call finishing must not drop the second call's entry.
        server.unregister("7", first_generation);
        server.cancel("7", Some("user abort"));

        assert!(second.is_cancelled());
        assert!(!first.is_cancelled());
    }

    #[tokio::test]
    async fn test_unregister_removes_finished_call() {
        let server = server_for("http://127.0.0.1:9/");
        let (generation, token) = server.register("9");
        server.unregister("9", generation);
        server.cancel("9", None);

        assert!(!token.is_cancelled());
        assert!(server.lock_in_flight().calls.is_empty());
    }

    #[tokio::test]
    async fn test_stops_when_output_is_closed() {
        let server = server_for("http://127.0.0.1:9/");
        let (mut client_in, server_in) = tokio::io::duplex(1024);
        let (server_out, client_out) = tokio::io::duplex(1024);
        drop(client_out);

        let serving = tokio::spawn(async move { server.serve(server_in, server_out).await });
        client_in
            .write_all(b"{\"jsonrpc\": \"2.0\", \"id\": 1, \"method\": \"ping\"}\n")
            .await
            .unwrap();

        // Input stays open; the server must still return.
        let result = tokio::time::timeout(Duration::from_secs(5), serving)
            .await
            .expect("server kept reading after its output closed")
            .unwrap();
        assert!(result.is_err());
        drop(client_in);
    }
}
