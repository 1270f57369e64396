// file: src/text/sentences.rs
// description: sentence splitting and length-based representative sentence selection
// reference: https://docs.rs/unicode-segmentation

use std::cmp::Reverse;
use unicode_segmentation::UnicodeSegmentation;

/// Picks "representative" sentences by length alone.
///
/// Sentences are split on UAX #29 boundaries and the longest ones win. No
/// semantic scoring happens here: a long rambling sentence beats a short
/// informative one. Abbreviations such as "Dr. Smith" may split early.
#[derive(Debug, Clone, Copy, Default)]
pub struct SentenceSelector;

impl SentenceSelector {
    pub fn new() -> Self {
        Self
    }

    pub fn split_sentences(&self, text: &str) -> Vec<String> {
        text.unicode_sentences()
            .map(str::trim)
            .filter(|sentence| !sentence.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Returns up to `n` sentences ordered by character length, longest first.
    /// Equal lengths keep their original order.
    pub fn top_representative_sentences(&self, text: &str, n: usize) -> Vec<String> {
        let mut sentences = self.split_sentences(text);
        sentences.sort_by_key(|sentence| Reverse(sentence.chars().count()));
        sentences.truncate(n);
        sentences
    }
}
