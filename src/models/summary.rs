// file: src/models/summary.rs
// description: ranked summary structures produced by the orchestrator flows
// reference: presentation-ready results, no formatting concerns

use crate::analysis::{Bigram, BoundingBox, FrequencyEntry, GeoPoint};
use crate::models::document::{Business, Review};
use crate::sentiment::SentimentResult;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentMajority {
    Positive,
    Negative,
}

impl SentimentMajority {
    /// Strictly more positive reviews wins; a tie counts as negative.
    pub fn from_counts(positive: usize, negative: usize) -> Self {
        if positive > negative {
            SentimentMajority::Positive
        } else {
            SentimentMajority::Negative
        }
    }
}

impl fmt::Display for SentimentMajority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SentimentMajority::Positive => write!(f, "positive"),
            SentimentMajority::Negative => write!(f, "negative"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusinessSentimentSummary {
    pub business_id: String,
    pub business_name: String,
    /// Other hits for the same name that were not picked.
    pub other_matches: u64,
    pub reviews_analyzed: usize,
    /// Full word table for word-cloud rendering, most frequent first.
    pub word_frequencies: Vec<FrequencyEntry<String>>,
    pub top_positive: Vec<SentimentResult>,
    pub top_negative: Vec<SentimentResult>,
    pub positive_count: usize,
    pub negative_count: usize,
    /// Based on the classified sample, not the business's true review total.
    pub majority: SentimentMajority,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisitedBusiness {
    pub business_id: String,
    pub name: String,
    pub bounding_box: BoundingBox,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSummary {
    pub user_id: String,
    /// Backend count; can exceed `reviews_retrieved` because of size caps.
    pub review_count: u64,
    pub reviews_retrieved: usize,
    pub business_ids: Vec<String>,
    /// Capped subset in backend relevance order.
    pub bounding_boxes: Vec<VisitedBusiness>,
    pub top_words: Vec<FrequencyEntry<String>>,
    pub top_phrases: Vec<FrequencyEntry<Bigram>>,
    pub representative_sentences: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewMatch {
    pub review: Review,
    pub business_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextSearchResults {
    pub query: String,
    pub alternate_phrase: Option<String>,
    pub businesses: Vec<Business>,
    /// Empty for single-word queries, which only search businesses.
    pub reviews: Vec<ReviewMatch>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoSearchResults {
    pub top_left: GeoPoint,
    pub bottom_right: GeoPoint,
    pub businesses: Vec<Business>,
}
