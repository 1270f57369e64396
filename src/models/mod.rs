// file: src/models/mod.rs
// description: data models module exports
// reference: internal module structure

pub mod document;
pub mod summary;

pub use document::{Business, Review};
pub use summary::{
    BusinessSentimentSummary, GeoSearchResults, ReviewMatch, SentimentMajority,
    TextSearchResults, UserSummary, VisitedBusiness,
};
