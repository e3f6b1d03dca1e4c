// Standalone MCP server binary

use anyhow::Result;
use clap::Parser;
use rememberizer_mcp::{Cli, GatewayConfig, McpServer, ToolGateway};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // stdout carries the protocol, so logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    tracing::info!("Rememberizer MCP Server starting...");

    let config = GatewayConfig::resolve(&cli)?;
    tracing::info!(
        base_url = %config.base_url,
        timeout_secs = config.timeout.as_secs(),
        max_retries = config.max_retries,
        "Configuration loaded"
    );

    let client = config.build_client()?;
    let gateway = ToolGateway::new(client);
    tracing::info!("Registered {} tools", gateway.list_tools().len());

    let server = McpServer::new(gateway);
    server.start().await?;

    Ok(())
}
