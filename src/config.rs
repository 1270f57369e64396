// file: src/config.rs
// description: application configuration management with toml support
// reference: https://docs.rs/config

use crate::error::{Result, SummaryError};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub store: StoreConfig,
    pub classifier: ClassifierConfig,
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub synonyms: SynonymConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StoreConfig {
    pub url: Option<String>,
    pub cloud_id: Option<String>,
    pub api_key: Option<String>,
    pub business_index: String,
    pub review_index: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ClassifierConfig {
    pub endpoint: String,
    pub model: String,
    pub api_key: Option<String>,
    pub batch_size: usize,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AnalysisConfig {
    pub top_words: usize,
    pub top_phrases: usize,
    pub top_sentences: usize,
    pub top_reviews: usize,
    pub bounding_box_businesses: usize,
    pub radius_km: f64,
    pub earth_radius_km: f64,
    pub max_business_reviews: usize,
    pub max_user_reviews: usize,
    pub max_distinct_businesses: usize,
    pub search_top_n: usize,
    #[serde(default)]
    pub extra_stopwords: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SynonymConfig {
    pub path: Option<PathBuf>,
}

impl StoreConfig {
    /// Resolves the HTTP endpoint, preferring an explicit url over a cloud id.
    pub fn endpoint(&self) -> Result<String> {
        if let Some(url) = &self.url {
            return Ok(url.trim_end_matches('/').to_string());
        }

        match &self.cloud_id {
            Some(cloud_id) => decode_cloud_id(cloud_id),
            None => Err(SummaryError::Config(
                "store.url or store.cloud_id must be set".to_string(),
            )),
        }
    }
}

/// Elastic cloud ids look like `name:base64(host$es_uuid$kibana_uuid)`.
fn decode_cloud_id(cloud_id: &str) -> Result<String> {
    let encoded = cloud_id
        .split_once(':')
        .map(|(_, rest)| rest)
        .unwrap_or(cloud_id);

    let decoded = STANDARD
        .decode(encoded)
        .map_err(|e| SummaryError::Config(format!("Invalid cloud_id encoding: {}", e)))?;
    let decoded = String::from_utf8(decoded)
        .map_err(|e| SummaryError::Config(format!("Invalid cloud_id payload: {}", e)))?;

    let mut parts = decoded.split('$');
    let host = parts.next().unwrap_or_default();
    let es_uuid = parts.next().unwrap_or_default();
    if host.is_empty() || es_uuid.is_empty() {
        return Err(SummaryError::Config(
            "cloud_id is missing host or cluster id".to_string(),
        ));
    }

    let (host, port) = match host.split_once(':') {
        Some((host, port)) => (host, port),
        None => (host, "443"),
    };

    Ok(format!("https://{}.{}:{}", es_uuid, host, port))
}

impl Config {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        dotenv().ok();

        let mut builder = config::Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path));
        } else {
            builder = builder.add_source(config::File::from(Path::new("config/default.toml")));
        }

        builder = builder.add_source(
            config::Environment::with_prefix("REVIEW_SUMMARIZE")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .map_err(|e| SummaryError::Config(e.to_string()))?;

        let config: Config = settings
            .try_deserialize()
            .map_err(|e| SummaryError::Config(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    pub fn default_config() -> Self {
        Self {
            store: StoreConfig {
                url: Some("http://localhost:9200".to_string()),
                cloud_id: None,
                api_key: None,
                business_index: "business_data".to_string(),
                review_index: "review_index".to_string(),
                timeout_secs: 30,
            },
            classifier: ClassifierConfig {
                endpoint: "https://api-inference.huggingface.co/models".to_string(),
                model: "distilbert-base-uncased-finetuned-sst-2-english".to_string(),
                api_key: None,
                batch_size: 16,
                timeout_secs: 120,
            },
            analysis: AnalysisConfig {
                top_words: 10,
                top_phrases: 10,
                top_sentences: 3,
                top_reviews: 3,
                bounding_box_businesses: 10,
                radius_km: 10.0,
                earth_radius_km: 6.4,
                max_business_reviews: 1000,
                max_user_reviews: 1000,
                max_distinct_businesses: 5000,
                search_top_n: 10,
                extra_stopwords: vec![],
            },
            synonyms: SynonymConfig::default(),
        }
    }

    fn validate(&self) -> Result<()> {
        if self.classifier.batch_size == 0 {
            return Err(SummaryError::Config(
                "classifier.batch_size must be greater than 0".to_string(),
            ));
        }

        let analysis = &self.analysis;
        let limits = [
            ("top_words", analysis.top_words),
            ("top_phrases", analysis.top_phrases),
            ("top_sentences", analysis.top_sentences),
            ("top_reviews", analysis.top_reviews),
            ("bounding_box_businesses", analysis.bounding_box_businesses),
            ("max_business_reviews", analysis.max_business_reviews),
            ("max_user_reviews", analysis.max_user_reviews),
            ("max_distinct_businesses", analysis.max_distinct_businesses),
            ("search_top_n", analysis.search_top_n),
        ];
        for (name, value) in limits {
            if value == 0 {
                return Err(SummaryError::Config(format!(
                    "analysis.{} must be greater than 0",
                    name
                )));
            }
        }

        if !(analysis.radius_km > 0.0) || !(analysis.earth_radius_km > 0.0) {
            return Err(SummaryError::Config(
                "analysis radii must be positive".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default_config();
        assert!(config.validate().is_ok());
        assert_eq!(config.analysis.bounding_box_businesses, 10);
        assert_eq!(config.classifier.batch_size, 16);
    }

    #[test]
    fn test_zero_batch_size_rejected() {
        let mut config = Config::default_config();
        config.classifier.batch_size = 0;
        assert!(matches!(config.validate(), Err(SummaryError::Config(_))));
    }

    #[test]
    fn test_non_positive_radius_rejected() {
        let mut config = Config::default_config();
        config.analysis.radius_km = 0.0;
        assert!(config.validate().is_err());
        config.analysis.radius_km = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_endpoint_prefers_url() {
        let mut store = Config::default_config().store;
        store.url = Some("http://search:9200/".to_string());
        store.cloud_id = Some("ignored".to_string());
        assert_eq!(store.endpoint().unwrap(), "http://search:9200");
    }

    #[test]
    fn test_endpoint_from_cloud_id() {
        let mut store = Config::default_config().store;
        store.url = None;
        let payload = STANDARD.encode("us-east-1.aws.found.io$abc123$kib456");
        store.cloud_id = Some(format!("my-deployment:{}", payload));

        assert_eq!(
            store.endpoint().unwrap(),
            "https://abc123.us-east-1.aws.found.io:443"
        );
    }

    #[test]
    fn test_endpoint_missing() {
        let mut store = Config::default_config().store;
        store.url = None;
        assert!(store.endpoint().is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        write!(
            file,
            r#"
[store]
url = "http://localhost:9200"
business_index = "businesses"
review_index = "reviews"
timeout_secs = 5

[classifier]
endpoint = "http://localhost:8080"
model = "sst2"
batch_size = 8
timeout_secs = 5

[analysis]
top_words = 5
top_phrases = 5
top_sentences = 2
top_reviews = 3
bounding_box_businesses = 10
radius_km = 10.0
earth_radius_km = 6.4
max_business_reviews = 1000
max_user_reviews = 500
max_distinct_businesses = 5000
search_top_n = 10
extra_stopwords = ["yelp"]
"#
        )
        .unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.store.business_index, "businesses");
        assert_eq!(config.classifier.batch_size, 8);
        assert_eq!(config.analysis.extra_stopwords, vec!["yelp".to_string()]);
        assert!(config.synonyms.path.is_none());
    }
}
