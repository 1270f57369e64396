// file: src/pipeline/synonyms.rs
// description: best-effort query broadening through per-word synonym lookup
// reference: lexical thesaurus stored as json

use crate::error::{Result, SummaryError};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::debug;

pub trait Thesaurus: Send + Sync {
    /// A replacement for `word`, or `None` to keep the word as is.
    fn lookup(&self, word: &str) -> Option<String>;
}

/// Thesaurus with no entries: every phrase is its own alternate.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoThesaurus;

impl Thesaurus for NoThesaurus {
    fn lookup(&self, _word: &str) -> Option<String> {
        None
    }
}

/// `word -> [synonym, ...]` table. The first synonym that differs from the
/// word itself is used.
#[derive(Debug, Clone, Default)]
pub struct MapThesaurus {
    entries: HashMap<String, Vec<String>>,
}

impl MapThesaurus {
    /// Keys differing only in case are merged; their synonyms are appended
    /// in key order so the result does not depend on map iteration.
    pub fn new(entries: HashMap<String, Vec<String>>) -> Self {
        let mut sorted: Vec<(String, Vec<String>)> = entries.into_iter().collect();
        sorted.sort_by(|a, b| a.0.cmp(&b.0));

        let mut merged: HashMap<String, Vec<String>> = HashMap::new();
        for (word, synonyms) in sorted {
            let list = merged.entry(word.to_lowercase()).or_default();
            for synonym in synonyms {
                if !list.contains(&synonym) {
                    list.push(synonym);
                }
            }
        }

        Self { entries: merged }
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let entries: HashMap<String, Vec<String>> = serde_json::from_str(&content)
            .map_err(|e| {
                SummaryError::Config(format!(
                    "Invalid thesaurus {}: {}",
                    path.display(),
                    e
                ))
            })?;

        debug!("Loaded {} thesaurus entries", entries.len());
        Ok(Self::new(entries))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Thesaurus for MapThesaurus {
    fn lookup(&self, word: &str) -> Option<String> {
        let key = word.to_lowercase();
        self.entries
            .get(&key)?
            .iter()
            .map(|synonym| synonym.trim())
            .find(|synonym| !synonym.is_empty() && synonym.to_lowercase() != key)
            .map(|synonym| synonym.replace('_', " "))
    }
}

/// Swaps each word for its synonym where one exists. Never fails.
pub fn alternate_phrase(thesaurus: &dyn Thesaurus, phrase: &str) -> String {
    phrase
        .split_whitespace()
        .map(|word| thesaurus.lookup(word).unwrap_or_else(|| word.to_string()))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn thesaurus() -> MapThesaurus {
        let mut entries = HashMap::new();
        entries.insert(
            "cheap".to_string(),
            vec!["cheap".to_string(), "inexpensive".to_string()],
        );
        entries.insert("Pizza".to_string(), vec!["pizza_pie".to_string()]);
        entries.insert("empty".to_string(), vec![]);
        MapThesaurus::new(entries)
    }

    #[test]
    fn test_lookup_skips_identity_synonym() {
        assert_eq!(thesaurus().lookup("cheap"), Some("inexpensive".to_string()));
        assert_eq!(thesaurus().lookup("CHEAP"), Some("inexpensive".to_string()));
    }

    #[test]
    fn test_case_variants_are_merged() {
        let mut entries = HashMap::new();
        entries.insert("pizza".to_string(), vec!["flatbread".to_string()]);
        entries.insert("Pizza".to_string(), vec!["pizza_pie".to_string()]);
        entries.insert("PIZZA".to_string(), vec!["pie".to_string(), "flatbread".to_string()]);

        let thesaurus = MapThesaurus::new(entries);
        assert_eq!(thesaurus.len(), 1);
        assert_eq!(thesaurus.entries["pizza"], vec!["pie", "flatbread", "pizza_pie"]);
        assert_eq!(thesaurus.lookup("Pizza"), Some("pie".to_string()));
    }

    #[test]
    fn test_lookup_missing_or_empty() {
        assert_eq!(thesaurus().lookup("burrito"), None);
        assert_eq!(thesaurus().lookup("empty"), None);
    }

    #[test]
    fn test_alternate_phrase_keeps_unknown_words() {
        let alternate = alternate_phrase(&thesaurus(), "  cheap   pizza near me ");
        assert_eq!(alternate, "inexpensive pizza pie near me");
    }

    #[test]
    fn test_no_thesaurus_is_identity() {
        assert_eq!(alternate_phrase(&NoThesaurus, "late night ramen"), "late night ramen");
        assert_eq!(alternate_phrase(&NoThesaurus, ""), "");
    }

    #[test]
    fn test_from_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("thesaurus.json");
        let mut file = fs::File::create(&path).unwrap();
        write!(file, r#"{{"quick": ["fast", "speedy"]}}"#).unwrap();

        let loaded = MapThesaurus::from_json_file(&path).unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded.lookup("quick"), Some("fast".to_string()));
    }

    #[test]
    fn test_from_invalid_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "not json").unwrap();
        assert!(matches!(
            MapThesaurus::from_json_file(&path),
            Err(SummaryError::Config(_))
        ));
    }
}
