// file: src/text/mod.rs
// description: text normalization module exports
// reference: internal module structure

pub mod normalizer;
pub mod sentences;
pub mod stopwords;

pub use normalizer::{TextNormalizer, TokenMode};
pub use sentences::SentenceSelector;
pub use stopwords::{ENGLISH_STOPWORDS, NormalizationConfig};
