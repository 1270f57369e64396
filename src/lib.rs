// file: src/lib.rs
// description: library entry point and public api exports
// reference: rust library patterns
#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/readme.md"))]

pub mod analysis;
pub mod config;
pub mod error;
pub mod exporter;
pub mod models;
pub mod pipeline;
pub mod sentiment;
pub mod store;
pub mod text;
pub mod utils;

#[cfg(test)]
pub(crate) mod testing;

pub use analysis::{Bigram, BoundingBox, FrequencyAggregator, FrequencyEntry, GeoPoint, bounding_box};
pub use config::{AnalysisConfig, ClassifierConfig, Config, StoreConfig, SynonymConfig};
pub use error::{Outcome, Result, SummaryError};
pub use exporter::json::JsonExporter;
pub use models::{
    Business, BusinessSentimentSummary, GeoSearchResults, Review, ReviewMatch,
    SentimentMajority, TextSearchResults, UserSummary, VisitedBusiness,
};
pub use pipeline::{MapThesaurus, NoThesaurus, QueryProgress, SummaryOrchestrator, Thesaurus};
pub use sentiment::{
    HttpSentimentOracle, SentimentAdapter, SentimentLabel, SentimentOracle, SentimentResult,
};
pub use store::{DocumentStore, ElasticsearchStore};
pub use text::{NormalizationConfig, SentenceSelector, TextNormalizer, TokenMode};
pub use utils::{OperationTimer, Validator};
