// file: src/sentiment/adapter.rs
// description: batches texts through the sentiment oracle and ranks the results
// reference: positional pairing of classifier output with its input text

use crate::error::{Result, SummaryError};
use crate::sentiment::oracle::{RawPrediction, SentimentOracle};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SentimentLabel {
    Positive,
    Negative,
}

impl FromStr for SentimentLabel {
    type Err = SummaryError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "POSITIVE" => Ok(SentimentLabel::Positive),
            "NEGATIVE" => Ok(SentimentLabel::Negative),
            other => Err(SummaryError::Oracle(format!(
                "Unexpected sentiment label: {}",
                other
            ))),
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SentimentLabel::Positive => write!(f, "POSITIVE"),
            SentimentLabel::Negative => write!(f, "NEGATIVE"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentResult {
    pub text: String,
    pub label: SentimentLabel,
    /// Classifier confidence in `label`. Comparable only within one label.
    pub score: f64,
}

/// Classified texts split by label, each side ordered by confidence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RankedSentiment {
    pub positive: Vec<SentimentResult>,
    pub negative: Vec<SentimentResult>,
}

impl RankedSentiment {
    pub fn total(&self) -> usize {
        self.positive.len() + self.negative.len()
    }
}

pub struct SentimentAdapter {
    oracle: Arc<dyn SentimentOracle>,
    batch_size: usize,
}

impl SentimentAdapter {
    pub fn new(oracle: Arc<dyn SentimentOracle>, batch_size: usize) -> Self {
        Self {
            oracle,
            batch_size: batch_size.max(1),
        }
    }

    /// Classifies every text, returning one result per input in input order.
    ///
    /// A chunk whose answer count differs from its input count fails the whole
    /// batch: positional pairing would attach labels to the wrong reviews.
    pub async fn classify_batch(&self, texts: &[String]) -> Result<Vec<SentimentResult>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        info!(
            "Classifying {} texts in chunks of {}",
            texts.len(),
            self.batch_size
        );

        let mut results = Vec::with_capacity(texts.len());

        for (index, chunk) in texts.chunks(self.batch_size).enumerate() {
            let predictions = self.oracle.classify(chunk).await?;

            if predictions.len() != chunk.len() {
                return Err(SummaryError::Oracle(format!(
                    "Chunk {} returned {} predictions for {} texts",
                    index,
                    predictions.len(),
                    chunk.len()
                )));
            }

            for (text, prediction) in chunk.iter().zip(predictions) {
                results.push(pair(text, prediction)?);
            }

            debug!("Classified chunk {} ({} texts)", index, chunk.len());
        }

        Ok(results)
    }

    /// Partitions by label and orders each side by descending score. Equal
    /// scores keep batch order.
    pub fn split_and_rank(results: Vec<SentimentResult>) -> RankedSentiment {
        let (mut positive, mut negative): (Vec<_>, Vec<_>) = results
            .into_iter()
            .partition(|result| result.label == SentimentLabel::Positive);

        positive.sort_by(|a, b| b.score.total_cmp(&a.score));
        negative.sort_by(|a, b| b.score.total_cmp(&a.score));

        RankedSentiment { positive, negative }
    }
}

fn pair(text: &str, prediction: RawPrediction) -> Result<SentimentResult> {
    let label = prediction.label.parse::<SentimentLabel>()?;

    if !(0.0..=1.0).contains(&prediction.score) {
        return Err(SummaryError::Oracle(format!(
            "Score {} outside [0, 1]",
            prediction.score
        )));
    }

    Ok(SentimentResult {
        text: text.to_string(),
        label,
        score: prediction.score,
    })
}
