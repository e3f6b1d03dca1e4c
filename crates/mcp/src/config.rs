// Startup configuration: CLI flags, environment and an optional TOML file

use anyhow::{bail, Context, Result};
use clap::Parser;
use rememberizer_sdk::{RememberizerClient, RetryConfig, DEFAULT_BASE_URL};
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Command line and environment options for the server binary.
#[derive(Debug, Parser)]
#[command(
    name = "rememberizer-mcp",
    version,
    about = "MCP server for the Rememberizer knowledge repository"
)]
pub struct Cli {
    /// Rememberizer API key
    #[arg(long, env = "REMEMBERIZER_API_TOKEN", hide_env_values = true)]
    pub api_token: Option<String>,

    /// Base URL of the Rememberizer API
    #[arg(long, env = "REMEMBERIZER_BASE_URL")]
    pub base_url: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long, env = "REMEMBERIZER_TIMEOUT_SECS")]
    pub timeout_secs: Option<u64>,

    /// Retries for idempotent upstream reads (0 disables)
    #[arg(long, env = "REMEMBERIZER_MAX_RETRIES")]
    pub max_retries: Option<u32>,

    /// Optional TOML configuration file
    #[arg(long, env = "REMEMBERIZER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

/// Keys accepted in the TOML configuration file.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default)]
    pub api_token: Option<String>,
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    #[serde(default)]
    pub max_retries: Option<u32>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file {}", path.display()))?;
        toml::from_str(&content).context("Failed to parse configuration file")
    }
}

/// Resolved startup configuration. Built once, read-only afterwards.
#[derive(Clone)]
pub struct GatewayConfig {
    pub api_token: String,
    pub base_url: Url,
    pub timeout: Duration,
    pub max_retries: u32,
}

impl GatewayConfig {
    /// Resolve configuration with precedence CLI/env > file > defaults.
    pub fn resolve(cli: &Cli) -> Result<Self> {
        let file = match &cli.config {
            Some(path) => FileConfig::load(path)?,
            None => FileConfig::default(),
        };
        Self::merge(cli, file)
    }

    fn merge(cli: &Cli, file: FileConfig) -> Result<Self> {
        let api_token = cli
            .api_token
            .clone()
            .or(file.api_token)
            .map(|token| token.trim().to_string())
            .filter(|token| !token.is_empty());
        let Some(api_token) = api_token else {
            bail!("REMEMBERIZER_API_TOKEN is not set; an API key is required to start");
        };

        let base_url = cli
            .base_url
            .clone()
            .or(file.base_url)
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let base_url = Url::parse(&base_url)
            .with_context(|| format!("Invalid base URL: {}", base_url))?;
        if !matches!(base_url.scheme(), "http" | "https") {
            bail!("Base URL must use http or https: {}", base_url);
        }

        let timeout_secs = cli
            .timeout_secs
            .or(file.timeout_secs)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);
        if timeout_secs == 0 {
            bail!("Timeout must be at least one second");
        }

        Ok(Self {
            api_token,
            base_url,
            timeout: Duration::from_secs(timeout_secs),
            max_retries: cli.max_retries.or(file.max_retries).unwrap_or(0),
        })
    }

    /// Build the upstream client this configuration describes.
    pub fn build_client(&self) -> Result<RememberizerClient> {
        RememberizerClient::builder()
            .base_url(self.base_url.as_str())
            .api_key(self.api_token.clone())
            .timeout(self.timeout)
            .retry_config(RetryConfig::with_max_retries(self.max_retries))
            .build()
            .context("Failed to create Rememberizer client")
    }
}

impl fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("api_token", &"<redacted>")
            .field("base_url", &self.base_url.as_str())
            .field("timeout", &self.timeout)
            .field("max_retries", &self.max_retries)
            .finish()
    }
}
