// file: src/store/mod.rs
// description: document store capability and backend implementations
// reference: internal module structure

pub mod elasticsearch;
pub mod query;
pub mod response;

pub use elasticsearch::ElasticsearchStore;
pub use query::{Aggregation, Query, SearchRequest};
pub use response::{AggregationResult, Bucket, SearchHit, SearchResponse};

use crate::error::Result;
use async_trait::async_trait;

/// Full-text and geo search over business and review indices.
///
/// Implementations return an empty response, not an error, when nothing
/// matches.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn search(&self, index: &str, request: &SearchRequest) -> Result<SearchResponse>;

    /// Fetches one document by id; `None` when it does not exist.
    async fn get(&self, index: &str, id: &str) -> Result<Option<SearchHit>>;
}
