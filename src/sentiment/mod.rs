// file: src/sentiment/mod.rs
// description: sentiment classification module exports
// reference: internal module structure

pub mod adapter;
pub mod oracle;

pub use adapter::{RankedSentiment, SentimentAdapter, SentimentLabel, SentimentResult};
pub use oracle::{HttpSentimentOracle, RawPrediction, SentimentOracle};
