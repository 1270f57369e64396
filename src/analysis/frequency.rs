// file: src/analysis/frequency.rs
// description: unigram and bigram frequency ranking over normalized token streams
// reference: counter with first-occurrence tie breaking

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrequencyEntry<T> {
    pub ngram: T,
    pub count: usize,
}

impl<T> FrequencyEntry<T> {
    pub fn new(ngram: T, count: usize) -> Self {
        Self { ngram, count }
    }
}

/// Ordered pair of adjacent tokens.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Bigram(pub String, pub String);

impl Bigram {
    pub fn new(first: impl Into<String>, second: impl Into<String>) -> Self {
        Self(first.into(), second.into())
    }
}

impl fmt::Display for Bigram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.0, self.1)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FrequencyAggregator;

impl FrequencyAggregator {
    pub fn new() -> Self {
        Self
    }

    /// Full frequency table, most frequent first.
    pub fn word_frequencies(&self, tokens: &[String]) -> Vec<FrequencyEntry<String>> {
        rank(tokens.iter().cloned())
    }

    pub fn top_unigrams(&self, tokens: &[String], n: usize) -> Vec<FrequencyEntry<String>> {
        let mut ranked = self.word_frequencies(tokens);
        ranked.truncate(n);
        ranked
    }

    /// Bigrams come from adjacency in the already-normalized stream, so words
    /// separated only by stopwords pair up.
    pub fn top_bigrams(&self, tokens: &[String], n: usize) -> Vec<FrequencyEntry<Bigram>> {
        let pairs = tokens
            .windows(2)
            .map(|pair| Bigram::new(pair[0].as_str(), pair[1].as_str()));

        let mut ranked = rank(pairs);
        ranked.truncate(n);
        ranked
    }
}

/// Counts items and sorts by count descending. Entries are created in
/// first-occurrence order and the sort is stable, so ties keep that order.
fn rank<K, I>(items: I) -> Vec<FrequencyEntry<K>>
where
    K: Eq + Hash + Clone,
    I: IntoIterator<Item = K>,
{
    let mut positions: HashMap<K, usize> = HashMap::new();
    let mut entries: Vec<FrequencyEntry<K>> = Vec::new();

    for item in items {
        match positions.get(&item) {
            Some(&position) => entries[position].count += 1,
            None => {
                positions.insert(item.clone(), entries.len());
                entries.push(FrequencyEntry::new(item, 1));
            }
        }
    }

    entries.sort_by(|a, b| b.count.cmp(&a.count));
    entries
}
