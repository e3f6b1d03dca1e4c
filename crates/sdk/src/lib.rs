//! # Rememberizer SDK
//!
//! Rust client for the Rememberizer personal/team knowledge repository API.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use rememberizer_sdk::{RememberizerClient, RememberizerResult};
//! use rememberizer_sdk::api::SemanticSearchRequest;
//!
//! #[tokio::main]
//! async fn main() -> RememberizerResult<()> {
//!     let client = RememberizerClient::builder()
//!         .api_key("your-api-key")
//!         .build()?;
//!
//!     let account = client.account().get().await?;
//!     println!("Account holder: {:?}", account.name);
//!
//!     let results = client
//!         .search()
//!         .semantic(&SemanticSearchRequest {
//!             query: "quarterly revenue report".to_string(),
//!             n_results: Some(3),
//!             ..Default::default()
//!         })
//!         .await?;
//!     println!("Found {} chunks", results.matched_chunks.len());
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod transport;

pub use client::{RememberizerClient, RememberizerClientBuilder};
pub use config::{ClientConfig, RetryConfig, DEFAULT_BASE_URL};
pub use error::{ErrorKind, RememberizerError, RememberizerResult};
