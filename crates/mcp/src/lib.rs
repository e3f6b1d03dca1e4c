// MCP (Model Context Protocol) server for the Rememberizer knowledge repository.
// Exposes search, listing and memory tools to LLM hosts over stdio.

pub mod config;
pub mod error;
pub mod gateway;
pub mod protocol;
pub mod resources;
pub mod server;
pub mod tools;

pub use config::{Cli, GatewayConfig};
pub use error::{GatewayError, ValidationError};
pub use gateway::ToolGateway;
pub use server::McpServer;
