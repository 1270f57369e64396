// file: src/store/elasticsearch.rs
// description: Elasticsearch REST client implementing the document store capability
// reference: https://www.elastic.co/guide/en/elasticsearch/reference/current/search-search.html

use crate::config::StoreConfig;
use crate::error::{Result, SummaryError};
use crate::store::{DocumentStore, SearchHit, SearchRequest, SearchResponse};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode, Url};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::time::Duration;
use tracing::{debug, info};

#[derive(Debug, Deserialize)]
struct GetResponse {
    #[serde(rename = "_id")]
    id: String,
    #[serde(default)]
    found: bool,
    #[serde(rename = "_source", default)]
    source: Map<String, Value>,
}

#[derive(Clone)]
pub struct ElasticsearchStore {
    client: Client,
    endpoint: String,
    base_url: Url,
    api_key: Option<String>,
}

impl ElasticsearchStore {
    pub fn new(config: &StoreConfig) -> Result<Self> {
        let endpoint = config.endpoint()?;
        let base_url = Url::parse(&endpoint).map_err(|e| {
            SummaryError::Config(format!("Invalid document store URL {}: {}", endpoint, e))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(SummaryError::Config(format!(
                "Document store URL {} cannot hold a path",
                endpoint
            )));
        }
        info!("Using document store at {}", endpoint);

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| SummaryError::Backend(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint,
            base_url,
            api_key: config.api_key.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub async fn ping(&self) -> Result<bool> {
        let response = self
            .authorize(self.client.get(&self.endpoint))
            .send()
            .await
            .map_err(|e| SummaryError::Backend(format!("Document store unreachable: {}", e)))?;

        Ok(response.status().is_success())
    }

    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.api_key {
            Some(api_key) => builder.header("Authorization", format!("ApiKey {}", api_key)),
            None => builder,
        }
    }

    /// Appends path segments to the endpoint, percent-encoding each one so
    /// ids containing `/`, `?` or spaces stay a single segment.
    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn search_url(&self, index: &str) -> Url {
        self.url(&[index, "_search"])
    }

    fn doc_url(&self, index: &str, id: &str) -> Url {
        self.url(&[index, "_doc", id])
    }
}

#[async_trait]
impl DocumentStore for ElasticsearchStore {
    async fn search(&self, index: &str, request: &SearchRequest) -> Result<SearchResponse> {
        let body = request.to_json();
        debug!("Searching {} with {}", index, body);

        let response = self
            .authorize(self.client.post(self.search_url(index)))
            .json(&body)
            .send()
            .await
            .map_err(|e| SummaryError::Backend(format!("Search request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(SummaryError::Backend(format!(
                "Search on {} failed with status {}: {}",
                index, status, error_text
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| SummaryError::Backend(format!("Failed to read search response: {}", e)))?;

        let parsed = SearchResponse::from_json(body)?;
        debug!("{} returned {} hits", index, parsed.hits.len());
        Ok(parsed)
    }

    async fn get(&self, index: &str, id: &str) -> Result<Option<SearchHit>> {
        let response = self
            .authorize(self.client.get(self.doc_url(index, id)))
            .send()
            .await
            .map_err(|e| SummaryError::Backend(format!("Get request failed: {}", e)))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        if !response.status().is_success() {
            return Err(SummaryError::Backend(format!(
                "Get {}/{} failed with status {}",
                index,
                id,
                response.status()
            )));
        }

        let doc: GetResponse = response
            .json()
            .await
            .map_err(|e| SummaryError::Backend(format!("Failed to read document: {}", e)))?;

        if !doc.found {
            return Ok(None);
        }

        Ok(Some(SearchHit::new(doc.id, 0.0, doc.source)))
    }
}
