// file: src/text/normalizer.rs
// description: lowercasing word tokenizer with stopword removal
// reference: https://docs.rs/regex

use crate::text::stopwords::NormalizationConfig;
use lazy_static::lazy_static;
use regex::Regex;
use std::sync::Arc;

lazy_static! {
    // Unicode-aware: \w covers letters, marks, digits and connector punctuation
    static ref WORD: Regex = Regex::new(r"\b\w+\b").expect("WORD regex is valid");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenMode {
    /// Word characters, stopwords removed. Used for sentiment and word clouds.
    General,
    /// General mode restricted to purely alphabetic tokens. Used for word and
    /// phrase frequency.
    Strict,
}

#[derive(Debug, Clone)]
pub struct TextNormalizer {
    config: Arc<NormalizationConfig>,
}

impl TextNormalizer {
    pub fn new(config: Arc<NormalizationConfig>) -> Self {
        Self { config }
    }

    pub fn normalize(&self, text: &str) -> Vec<String> {
        self.tokenize(text, TokenMode::General)
    }

    pub fn normalize_strict(&self, text: &str) -> Vec<String> {
        self.tokenize(text, TokenMode::Strict)
    }

    pub fn tokenize(&self, text: &str, mode: TokenMode) -> Vec<String> {
        let lowered = text.to_lowercase();

        WORD.find_iter(&lowered)
            .map(|m| m.as_str())
            .filter(|token| !self.config.is_stopword(token))
            .filter(|token| mode == TokenMode::General || is_alphabetic(token))
            .map(str::to_string)
            .collect()
    }

    /// Tokenizes each text separately and concatenates the streams in order.
    pub fn tokenize_all<'a, I>(&self, texts: I, mode: TokenMode) -> Vec<String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        texts
            .into_iter()
            .flat_map(|text| self.tokenize(text, mode))
            .collect()
    }
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self::new(Arc::new(NormalizationConfig::english()))
    }
}

fn is_alphabetic(token: &str) -> bool {
    !token.is_empty() && token.chars().all(char::is_alphabetic)
}
