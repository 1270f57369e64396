// file: src/store/response.rs
// description: search hits and aggregation results returned by the document store
// reference: Elasticsearch _search response body

use crate::error::{Result, SummaryError};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    pub id: String,
    /// Backend relevance; only comparable within one response.
    pub score: f64,
    pub source: Map<String, Value>,
}

impl SearchHit {
    pub fn new(id: impl Into<String>, score: f64, source: Map<String, Value>) -> Self {
        Self {
            id: id.into(),
            score,
            source,
        }
    }

    pub fn str_field(&self, field: &str) -> Option<&str> {
        self.source.get(field).and_then(Value::as_str)
    }

    pub fn f64_field(&self, field: &str) -> Option<f64> {
        self.source.get(field).and_then(Value::as_f64)
    }

    pub fn require_str(&self, field: &str) -> Result<&str> {
        self.str_field(field).ok_or_else(|| {
            SummaryError::Backend(format!("Document {} is missing '{}'", self.id, field))
        })
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Bucket {
    #[serde(deserialize_with = "key_as_string")]
    pub key: String,
    pub doc_count: u64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum AggregationResult {
    Buckets { buckets: Vec<Bucket> },
    Value { value: Option<f64> },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchResponse {
    /// Matching documents in the index, which may exceed `hits.len()`.
    pub total: u64,
    pub hits: Vec<SearchHit>,
    pub aggregations: HashMap<String, AggregationResult>,
}

impl SearchResponse {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn value(&self, name: &str) -> Option<f64> {
        match self.aggregations.get(name) {
            Some(AggregationResult::Value { value }) => *value,
            _ => None,
        }
    }

    pub fn bucket_keys(&self, name: &str) -> Vec<String> {
        match self.aggregations.get(name) {
            Some(AggregationResult::Buckets { buckets }) => {
                buckets.iter().map(|bucket| bucket.key.clone()).collect()
            }
            _ => Vec::new(),
        }
    }

    pub fn from_json(body: Value) -> Result<Self> {
        let raw: RawResponse = serde_json::from_value(body)?;

        let hits = raw
            .hits
            .hits
            .into_iter()
            .map(|hit| SearchHit {
                id: hit.id,
                score: hit.score.unwrap_or(0.0),
                source: hit.source,
            })
            .collect();

        Ok(Self {
            total: raw.hits.total.map(|t| t.value).unwrap_or(0),
            hits,
            aggregations: raw.aggregations,
        })
    }
}

#[derive(Debug, Deserialize)]
struct RawResponse {
    hits: RawHits,
    #[serde(default)]
    aggregations: HashMap<String, AggregationResult>,
}

#[derive(Debug, Deserialize)]
struct RawHits {
    total: Option<RawTotal>,
    #[serde(default)]
    hits: Vec<RawHit>,
}

#[derive(Debug, Deserialize)]
struct RawTotal {
    value: u64,
}

#[derive(Debug, Deserialize)]
struct RawHit {
    #[serde(rename = "_id")]
    id: String,
    #[serde(rename = "_score", default)]
    score: Option<f64>,
    #[serde(rename = "_source", default)]
    source: Map<String, Value>,
}

fn key_as_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) => s,
        other => other.to_string(),
    })
}
