// file: src/sentiment/oracle.rs
// description: sentiment classifier capability and HTTP text-classification client
// reference: https://huggingface.co/docs/api-inference/tasks/text-classification

use crate::config::ClassifierConfig;
use crate::error::{Result, SummaryError};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Label and confidence exactly as the classifier reported them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawPrediction {
    pub label: String,
    pub score: f64,
}

impl RawPrediction {
    pub fn new(label: impl Into<String>, score: f64) -> Self {
        Self {
            label: label.into(),
            score,
        }
    }
}

/// Batch classifier treated as a black box. Must answer with one prediction
/// per input, in input order.
#[async_trait]
pub trait SentimentOracle: Send + Sync {
    async fn classify(&self, texts: &[String]) -> Result<Vec<RawPrediction>>;
}

#[derive(Debug, Serialize)]
struct ClassificationRequest<'a> {
    inputs: &'a [String],
    options: RequestOptions,
}

#[derive(Debug, Serialize)]
struct RequestOptions {
    wait_for_model: bool,
}

/// Endpoints answer either one prediction per input or every label's
/// prediction per input.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ClassificationResponse {
    Flat(Vec<RawPrediction>),
    Nested(Vec<Vec<RawPrediction>>),
}

impl ClassificationResponse {
    fn into_predictions(self) -> Result<Vec<RawPrediction>> {
        match self {
            ClassificationResponse::Flat(predictions) => Ok(predictions),
            ClassificationResponse::Nested(rows) => rows
                .into_iter()
                .map(|row| {
                    row.into_iter()
                        .max_by(|a, b| a.score.total_cmp(&b.score))
                        .ok_or_else(|| {
                            SummaryError::Oracle("Empty prediction row in response".to_string())
                        })
                })
                .collect(),
        }
    }
}

pub struct HttpSentimentOracle {
    client: Client,
    url: String,
    api_key: Option<String>,
}

impl HttpSentimentOracle {
    pub fn new(config: &ClassifierConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| SummaryError::Oracle(format!("Failed to build HTTP client: {}", e)))?;

        let url = format!(
            "{}/{}",
            config.endpoint.trim_end_matches('/'),
            config.model
        );

        Ok(Self {
            client,
            url,
            api_key: config.api_key.clone(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl SentimentOracle for HttpSentimentOracle {
    async fn classify(&self, texts: &[String]) -> Result<Vec<RawPrediction>> {
        let request = ClassificationRequest {
            inputs: texts,
            options: RequestOptions {
                wait_for_model: true,
            },
        };

        debug!("Requesting sentiment for {} texts from {}", texts.len(), self.url);

        let mut builder = self.client.post(&self.url).json(&request);
        if let Some(api_key) = &self.api_key {
            builder = builder.header("Authorization", format!("Bearer {}", api_key));
        }

        let response = builder.send().await.map_err(|e| {
            SummaryError::Oracle(format!("Failed to send classification request: {}", e))
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(SummaryError::Oracle(format!(
                "Classification request failed with status {}: {}",
                status, error_text
            )));
        }

        let parsed: ClassificationResponse = response.json().await.map_err(|e| {
            SummaryError::Oracle(format!("Failed to parse classification response: {}", e))
        })?;

        parsed.into_predictions()
    }
}
