//! Transport layer for the Rememberizer SDK.

pub mod http;

pub use http::HttpTransport;
