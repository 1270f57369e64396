// file: src/testing.rs
// description: deterministic in-memory document store and sentiment oracles for tests
// reference: capability fakes

use crate::error::{Result, SummaryError};
use crate::sentiment::{RawPrediction, SentimentOracle};
use crate::store::{
    Aggregation, AggregationResult, Bucket, DocumentStore, Query, SearchHit, SearchRequest,
    SearchResponse,
};
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

const NEGATIVE_WORDS: &[&str] = &["terrible", "bad", "awful", "worst", "slow", "rude"];

/// Labels a text NEGATIVE when it contains a known negative word. Longer
/// texts get higher confidence so rankings are predictable.
#[derive(Default)]
pub struct KeywordOracle {
    calls: AtomicUsize,
    texts_seen: AtomicUsize,
}

impl KeywordOracle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn texts_seen(&self) -> usize {
        self.texts_seen.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SentimentOracle for KeywordOracle {
    async fn classify(&self, texts: &[String]) -> Result<Vec<RawPrediction>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.texts_seen.fetch_add(texts.len(), Ordering::SeqCst);

        Ok(texts
            .iter()
            .map(|text| {
                let lowered = text.to_lowercase();
                let negative = NEGATIVE_WORDS.iter().any(|word| lowered.contains(word));
                let words = text.split_whitespace().count().min(9) as f64;
                let score = 0.5 + 0.05 * words;
                RawPrediction::new(if negative { "NEGATIVE" } else { "POSITIVE" }, score)
            })
            .collect())
    }
}

/// Drops the last prediction of every batch.
pub struct ShortOracle;

#[async_trait]
impl SentimentOracle for ShortOracle {
    async fn classify(&self, texts: &[String]) -> Result<Vec<RawPrediction>> {
        Ok(texts
            .iter()
            .skip(1)
            .map(|_| RawPrediction::new("POSITIVE", 0.9))
            .collect())
    }
}

pub struct UnavailableOracle;

#[async_trait]
impl SentimentOracle for UnavailableOracle {
    async fn classify(&self, _texts: &[String]) -> Result<Vec<RawPrediction>> {
        Err(SummaryError::Oracle("classifier offline".to_string()))
    }
}

/// Evaluates the query DSL over documents held in memory, scoring matches
/// roughly the way a full-text engine would.
#[derive(Default)]
pub struct MemoryStore {
    indices: HashMap<String, Vec<SearchHit>>,
    searches: Mutex<Vec<(String, SearchRequest)>>,
    gets: AtomicUsize,
    failing: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    pub fn with_doc(mut self, index: &str, id: &str, source: Value) -> Self {
        let source = match source {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        self.indices
            .entry(index.to_string())
            .or_default()
            .push(SearchHit::new(id, 0.0, source));
        self
    }

    pub fn searches(&self) -> Vec<(String, SearchRequest)> {
        self.searches.lock().unwrap().clone()
    }

    pub fn gets(&self) -> usize {
        self.gets.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn search(&self, index: &str, request: &SearchRequest) -> Result<SearchResponse> {
        self.searches
            .lock()
            .unwrap()
            .push((index.to_string(), request.clone()));

        if self.failing {
            return Err(SummaryError::Backend("connection refused".to_string()));
        }

        let docs = self.indices.get(index).map(Vec::as_slice).unwrap_or(&[]);
        let mut matched: Vec<SearchHit> = docs
            .iter()
            .filter_map(|doc| {
                evaluate(&request.query, doc).map(|score| {
                    let mut hit = doc.clone();
                    hit.score = score;
                    hit
                })
            })
            .collect();
        matched.sort_by(|a, b| b.score.total_cmp(&a.score));

        let aggregations = request
            .aggregations
            .iter()
            .map(|(name, agg)| (name.clone(), aggregate(agg, &matched)))
            .collect();

        let total = matched.len() as u64;
        matched.truncate(request.size);

        Ok(SearchResponse {
            total,
            hits: matched,
            aggregations,
        })
    }

    async fn get(&self, index: &str, id: &str) -> Result<Option<SearchHit>> {
        self.gets.fetch_add(1, Ordering::SeqCst);

        if self.failing {
            return Err(SummaryError::Backend("connection refused".to_string()));
        }

        Ok(self
            .indices
            .get(index)
            .and_then(|docs| docs.iter().find(|doc| doc.id == id))
            .cloned())
    }
}

fn words(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect()
}

fn evaluate(query: &Query, doc: &SearchHit) -> Option<f64> {
    match query {
        Query::Match { field, text } => {
            let haystack = words(doc.str_field(field)?);
            let hits = words(text)
                .iter()
                .filter(|word| haystack.contains(word))
                .count();
            (hits > 0).then_some(hits as f64)
        }
        Query::MatchPhrase { field, text } => {
            let haystack = words(doc.str_field(field)?).join(" ");
            let needle = words(text).join(" ");
            (!needle.is_empty() && haystack.contains(&needle)).then_some(1.0)
        }
        Query::Term { field, value } => (doc.str_field(field)? == value.as_str()).then_some(1.0),
        Query::Terms { field, values } => {
            let found = doc.str_field(field)?;
            values.iter().any(|value| value.as_str() == found).then_some(1.0)
        }
        Query::Should(clauses) => {
            if clauses.is_empty() {
                return Some(1.0);
            }
            let scores: Vec<f64> = clauses.iter().filter_map(|c| evaluate(c, doc)).collect();
            (!scores.is_empty()).then(|| scores.iter().sum())
        }
        Query::GeoBoundingBox {
            top_left,
            bottom_right,
            ..
        } => {
            let lat = doc.f64_field("latitude")?;
            let lon = doc.f64_field("longitude")?;
            let inside = lat <= top_left.lat
                && lat >= bottom_right.lat
                && lon >= top_left.lon
                && lon <= bottom_right.lon;
            inside.then_some(1.0)
        }
    }
}

fn aggregate(aggregation: &Aggregation, matched: &[SearchHit]) -> AggregationResult {
    match aggregation {
        Aggregation::ValueCount { field } => {
            let count = matched.iter().filter(|hit| hit.source.contains_key(field)).count();
            AggregationResult::Value {
                value: Some(count as f64),
            }
        }
        Aggregation::Terms { field, size } => {
            let mut buckets: Vec<Bucket> = Vec::new();
            for key in matched.iter().filter_map(|hit| hit.str_field(field)) {
                match buckets.iter_mut().find(|bucket| bucket.key == key) {
                    Some(bucket) => bucket.doc_count += 1,
                    None => buckets.push(Bucket {
                        key: key.to_string(),
                        doc_count: 1,
                    }),
                }
            }
            buckets.sort_by(|a, b| b.doc_count.cmp(&a.doc_count));
            buckets.truncate(*size);
            AggregationResult::Buckets { buckets }
        }
    }
}
