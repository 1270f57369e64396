// file: src/analysis/mod.rs
// description: frequency and geo analytics module exports
// reference: internal module structure

pub mod frequency;
pub mod geo;

pub use frequency::{Bigram, FrequencyAggregator, FrequencyEntry};
pub use geo::{BoundingBox, GeoPoint, bounding_box};
