// file: src/pipeline/orchestrator.rs
// description: composes retrieval, normalization, aggregation and sentiment into summaries
// reference: one independent request flow per summary type

use crate::analysis::{FrequencyAggregator, GeoPoint, bounding_box};
use crate::config::{AnalysisConfig, Config};
use crate::error::{Outcome, Result};
use crate::models::{
    Business, BusinessSentimentSummary, GeoSearchResults, Review, ReviewMatch,
    SentimentMajority, TextSearchResults, UserSummary, VisitedBusiness,
};
use crate::pipeline::synonyms::{Thesaurus, alternate_phrase};
use crate::sentiment::{SentimentAdapter, SentimentOracle};
use crate::store::{Aggregation, DocumentStore, Query, SearchHit, SearchRequest};
use crate::text::{NormalizationConfig, SentenceSelector, TextNormalizer, TokenMode};
use crate::utils::telemetry::OperationTimer;
use crate::utils::validation::Validator;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

const SLOW_FLOW: Duration = Duration::from_secs(10);
const REVIEW_COUNT_AGG: &str = "review_count";
const UNIQUE_BUSINESSES_AGG: &str = "unique_businesses";

pub struct SummaryOrchestrator {
    store: Arc<dyn DocumentStore>,
    sentiment: SentimentAdapter,
    thesaurus: Arc<dyn Thesaurus>,
    normalizer: TextNormalizer,
    aggregator: FrequencyAggregator,
    selector: SentenceSelector,
    business_index: String,
    review_index: String,
    analysis: AnalysisConfig,
}

impl SummaryOrchestrator {
    pub fn new(
        config: &Config,
        store: Arc<dyn DocumentStore>,
        oracle: Arc<dyn SentimentOracle>,
        thesaurus: Arc<dyn Thesaurus>,
        normalization: Arc<NormalizationConfig>,
    ) -> Self {
        Self {
            store,
            sentiment: SentimentAdapter::new(oracle, config.classifier.batch_size),
            thesaurus,
            normalizer: TextNormalizer::new(normalization),
            aggregator: FrequencyAggregator::new(),
            selector: SentenceSelector::new(),
            business_index: config.store.business_index.clone(),
            review_index: config.store.review_index.clone(),
            analysis: config.analysis.clone(),
        }
    }

    pub async fn business_sentiment_summary(
        &self,
        business_name: &str,
    ) -> Result<Outcome<BusinessSentimentSummary>> {
        Validator::validate_query_not_empty(business_name)?;
        let business_name = business_name.trim();
        let timer = OperationTimer::new("business sentiment summary");

        let Some((business, other_matches)) = self.resolve_business(business_name).await? else {
            info!("No business found for name: {}", business_name);
            return Ok(Outcome::NotFound(format!(
                "No business found for name: {}",
                business_name
            )));
        };

        let reviews = self.fetch_business_reviews(&business.business_id).await?;
        if reviews.is_empty() {
            info!("No reviews found for business: {}", business.name);
            return Ok(Outcome::Empty(format!(
                "No reviews found for business: {}",
                business.name
            )));
        }

        let texts: Vec<String> = reviews.into_iter().map(|review| review.text).collect();

        let tokens = self
            .normalizer
            .tokenize_all(texts.iter().map(String::as_str), TokenMode::General);
        let word_frequencies = self.aggregator.word_frequencies(&tokens);

        let classified = self.sentiment.classify_batch(&texts).await?;
        timer.checkpoint("classification complete");

        let ranked = SentimentAdapter::split_and_rank(classified);
        let positive_count = ranked.positive.len();
        let negative_count = ranked.negative.len();
        let top_n = self.analysis.top_reviews;

        let summary = BusinessSentimentSummary {
            business_id: business.business_id,
            business_name: business.name,
            other_matches,
            reviews_analyzed: texts.len(),
            word_frequencies,
            top_positive: ranked.positive.into_iter().take(top_n).collect(),
            top_negative: ranked.negative.into_iter().take(top_n).collect(),
            positive_count,
            negative_count,
            majority: SentimentMajority::from_counts(positive_count, negative_count),
        };

        timer.warn_if_slow(SLOW_FLOW, "business sentiment summary");
        timer.finish_with_count(summary.reviews_analyzed);
        Ok(Outcome::Ready(summary))
    }

    pub async fn user_review_summary(&self, user_id: &str) -> Result<Outcome<UserSummary>> {
        Validator::validate_identifier("user id", user_id)?;
        let user_id = user_id.trim();
        let timer = OperationTimer::new("user review summary");

        let request = SearchRequest::new(
            Query::term("user_id", user_id),
            self.analysis.max_user_reviews,
        )
        .aggregate(
            REVIEW_COUNT_AGG,
            Aggregation::ValueCount {
                field: "user_id".to_string(),
            },
        )
        .aggregate(
            UNIQUE_BUSINESSES_AGG,
            Aggregation::Terms {
                field: "business_id".to_string(),
                size: self.analysis.max_distinct_businesses,
            },
        )
        .with_source(&["business_id", "user_id", "text"]);

        let response = self.store.search(&self.review_index, &request).await?;

        if response.hits.is_empty() {
            info!("No reviews found for user ID: {}", user_id);
            return Ok(Outcome::Empty(format!(
                "No reviews found for user ID: {}",
                user_id
            )));
        }

        let reviews = decode_reviews(&response.hits)?;
        let review_count = response
            .value(REVIEW_COUNT_AGG)
            .map(|count| count as u64)
            .unwrap_or(response.total);
        let business_ids = response.bucket_keys(UNIQUE_BUSINESSES_AGG);

        if review_count > reviews.len() as u64 {
            debug!(
                "User {} has {} reviews, analyzing the {} retrieved",
                user_id,
                review_count,
                reviews.len()
            );
        }

        let bounding_boxes = self.visited_businesses(&business_ids).await?;
        timer.checkpoint("bounding boxes computed");

        let texts: Vec<&str> = reviews.iter().map(|review| review.text.as_str()).collect();
        let tokens = self
            .normalizer
            .tokenize_all(texts.iter().copied(), TokenMode::Strict);

        let summary = UserSummary {
            user_id: user_id.to_string(),
            review_count,
            reviews_retrieved: reviews.len(),
            business_ids,
            bounding_boxes,
            top_words: self.aggregator.top_unigrams(&tokens, self.analysis.top_words),
            top_phrases: self.aggregator.top_bigrams(&tokens, self.analysis.top_phrases),
            representative_sentences: self
                .selector
                .top_representative_sentences(&texts.join(" "), self.analysis.top_sentences),
        };

        timer.warn_if_slow(SLOW_FLOW, "user review summary");
        timer.finish_with_count(summary.reviews_retrieved);
        Ok(Outcome::Ready(summary))
    }

    /// Single words search business names only; longer phrases also search
    /// review text. Both use the phrase and its synonym alternate.
    pub async fn text_search(&self, phrase: &str) -> Result<TextSearchResults> {
        Validator::validate_query_not_empty(phrase)?;
        let words: Vec<&str> = phrase.split_whitespace().collect();
        let phrase = words.join(" ");
        let timer = OperationTimer::new("text search");

        let alternate = alternate_phrase(self.thesaurus.as_ref(), &phrase);
        let mut phrases = vec![phrase.clone()];
        if alternate != phrase {
            debug!("Broadened '{}' to '{}'", phrase, alternate);
            phrases.push(alternate.clone());
        }

        let (businesses, reviews) = if words.len() == 1 {
            (self.search_businesses(&phrases).await?, Vec::new())
        } else {
            futures::try_join!(self.search_businesses(&phrases), self.search_reviews(&phrases))?
        };

        timer.finish_with_count(businesses.len() + reviews.len());

        Ok(TextSearchResults {
            query: phrase.clone(),
            alternate_phrase: (alternate != phrase).then_some(alternate),
            businesses,
            reviews,
        })
    }

    /// Businesses inside a caller-supplied rectangle.
    pub async fn geo_search(
        &self,
        top_left: GeoPoint,
        bottom_right: GeoPoint,
    ) -> Result<GeoSearchResults> {
        Validator::validate_box(&top_left, &bottom_right)?;

        let request = SearchRequest::new(
            Query::GeoBoundingBox {
                field: "location".to_string(),
                top_left,
                bottom_right,
            },
            self.analysis.search_top_n,
        );

        let response = self.store.search(&self.business_index, &request).await?;
        let businesses = response
            .hits
            .iter()
            .map(Business::from_hit)
            .collect::<Result<Vec<_>>>()?;

        info!("Geo search matched {} businesses", businesses.len());

        Ok(GeoSearchResults {
            top_left,
            bottom_right,
            businesses,
        })
    }

    /// First hit wins; the number of other candidates is returned alongside.
    async fn resolve_business(&self, name: &str) -> Result<Option<(Business, u64)>> {
        let request = SearchRequest::new(Query::phrase("name", name), 1);
        let response = self.store.search(&self.business_index, &request).await?;

        let Some(hit) = response.hits.first() else {
            return Ok(None);
        };

        let business = Business::from_hit(hit)?;
        let other_matches = response.total.saturating_sub(1);
        if other_matches > 0 {
            warn!(
                "'{}' matched {} other businesses, using {} ({})",
                name, other_matches, business.name, business.business_id
            );
        }

        Ok(Some((business, other_matches)))
    }

    async fn fetch_business_reviews(&self, business_id: &str) -> Result<Vec<Review>> {
        let request = SearchRequest::new(
            Query::term("business_id", business_id),
            self.analysis.max_business_reviews,
        );

        let response = self.store.search(&self.review_index, &request).await?;
        if response.total > response.hits.len() as u64 {
            warn!(
                "Business {} has {} reviews, classifying the first {}",
                business_id,
                response.total,
                response.hits.len()
            );
        }

        decode_reviews(&response.hits)
    }

    /// Bounding boxes for the top-ranked visited businesses. The order is the
    /// backend's relevance order, not any property of the businesses.
    async fn visited_businesses(&self, business_ids: &[String]) -> Result<Vec<VisitedBusiness>> {
        if business_ids.is_empty() {
            return Ok(Vec::new());
        }

        let cap = self.analysis.bounding_box_businesses;
        let request = SearchRequest::new(Query::terms("business_id", business_ids), cap);

        let response = self.store.search(&self.business_index, &request).await?;

        let mut visited = Vec::with_capacity(cap.min(response.hits.len()));
        for hit in response.hits.iter().take(cap) {
            let business = Business::from_hit(hit)?;
            let Some(location) = business.location else {
                warn!(
                    "Business {} has no coordinates, skipping its bounding box",
                    business.business_id
                );
                continue;
            };

            visited.push(VisitedBusiness {
                bounding_box: bounding_box(
                    location.lon,
                    location.lat,
                    self.analysis.radius_km,
                    self.analysis.earth_radius_km,
                ),
                business_id: business.business_id,
                name: business.name,
                score: business.score,
            });
        }

        Ok(visited)
    }

    async fn search_businesses(&self, phrases: &[String]) -> Result<Vec<Business>> {
        let request = SearchRequest::new(should_match("name", phrases), self.analysis.search_top_n);
        let mut hits = self.store.search(&self.business_index, &request).await?.hits;
        sort_by_score(&mut hits);

        hits.iter().map(Business::from_hit).collect()
    }

    async fn search_reviews(&self, phrases: &[String]) -> Result<Vec<ReviewMatch>> {
        let request = SearchRequest::new(should_match("text", phrases), self.analysis.search_top_n);
        let mut hits = self.store.search(&self.review_index, &request).await?.hits;
        sort_by_score(&mut hits);

        let reviews = decode_reviews(&hits)?;
        let mut names: HashMap<String, Option<String>> = HashMap::new();
        let mut matches = Vec::with_capacity(reviews.len());

        for review in reviews {
            let business_name = match &review.business_id {
                Some(id) => match names.get(id).cloned() {
                    Some(name) => name,
                    None => {
                        let name = self
                            .store
                            .get(&self.business_index, id)
                            .await?
                            .and_then(|hit| hit.str_field("name").map(str::to_string));
                        names.insert(id.clone(), name.clone());
                        name
                    }
                },
                None => None,
            };

            matches.push(ReviewMatch {
                review,
                business_name,
            });
        }

        Ok(matches)
    }
}

fn should_match(field: &str, phrases: &[String]) -> Query {
    Query::Should(
        phrases
            .iter()
            .map(|phrase| Query::matching(field, phrase))
            .collect(),
    )
}

fn sort_by_score(hits: &mut [SearchHit]) {
    hits.sort_by(|a, b| b.score.total_cmp(&a.score));
}

fn decode_reviews(hits: &[SearchHit]) -> Result<Vec<Review>> {
    hits.iter().map(Review::from_hit).collect()
}
