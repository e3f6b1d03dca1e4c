//! API endpoint groups for the Rememberizer SDK.

pub mod account;
pub mod documents;
pub mod integrations;
pub mod memories;
pub mod search;

pub use account::{AccountApi, AccountInfo};
pub use documents::{
    Document, DocumentPage, DocumentsApi, IntegrationRef, ListDocumentsRequest,
    PATH_SEGMENT,
};
pub use integrations::{Integration, IntegrationsApi};
pub use memories::{MemoriesApi, MemorizeRequest, MemorizeResponse};
pub use search::{
    AgenticSearchRequest, ChunkDocument, DataSource, MatchedChunk, SearchApi, SearchResponse,
    SemanticSearchRequest,
};
