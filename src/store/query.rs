// file: src/store/query.rs
// description: typed subset of the Elasticsearch query DSL used by the summary flows
// reference: https://www.elastic.co/guide/en/elasticsearch/reference/current/query-dsl.html

use crate::analysis::GeoPoint;
use serde_json::{Map, Value, json};

#[derive(Debug, Clone, PartialEq)]
pub enum Query {
    /// Full-text match on an analyzed field.
    Match { field: String, text: String },
    /// All terms in order on an analyzed field.
    MatchPhrase { field: String, text: String },
    /// Exact value on a keyword field.
    Term { field: String, value: String },
    /// Any of several exact values on a keyword field. A single clause, so
    /// it is not bounded by the bool clause limit.
    Terms { field: String, values: Vec<String> },
    /// OR over clauses; a hit needs at least one.
    Should(Vec<Query>),
    GeoBoundingBox {
        field: String,
        top_left: GeoPoint,
        bottom_right: GeoPoint,
    },
}

impl Query {
    pub fn matching(field: &str, text: &str) -> Self {
        Query::Match {
            field: field.to_string(),
            text: text.to_string(),
        }
    }

    pub fn phrase(field: &str, text: &str) -> Self {
        Query::MatchPhrase {
            field: field.to_string(),
            text: text.to_string(),
        }
    }

    pub fn term(field: &str, value: &str) -> Self {
        Query::Term {
            field: field.to_string(),
            value: value.to_string(),
        }
    }

    pub fn terms(field: &str, values: &[String]) -> Self {
        Query::Terms {
            field: field.to_string(),
            values: values.to_vec(),
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            Query::Match { field, text } => json!({ "match": { field: text } }),
            Query::MatchPhrase { field, text } => json!({ "match_phrase": { field: text } }),
            Query::Term { field, value } => json!({ "term": { field: value } }),
            Query::Terms { field, values } => json!({ "terms": { field: values } }),
            Query::Should(clauses) => {
                let should: Vec<Value> = clauses.iter().map(Query::to_json).collect();
                json!({ "bool": { "should": should } })
            }
            Query::GeoBoundingBox {
                field,
                top_left,
                bottom_right,
            } => json!({
                "geo_bounding_box": {
                    field: {
                        "top_left": { "lat": top_left.lat, "lon": top_left.lon },
                        "bottom_right": { "lat": bottom_right.lat, "lon": bottom_right.lon },
                    }
                }
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Aggregation {
    ValueCount { field: String },
    Terms { field: String, size: usize },
}

impl Aggregation {
    pub fn to_json(&self) -> Value {
        match self {
            Aggregation::ValueCount { field } => json!({ "value_count": { "field": field } }),
            Aggregation::Terms { field, size } => {
                json!({ "terms": { "field": field, "size": size } })
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    pub query: Query,
    pub size: usize,
    pub aggregations: Vec<(String, Aggregation)>,
    pub source: Option<Vec<String>>,
}

impl SearchRequest {
    pub fn new(query: Query, size: usize) -> Self {
        Self {
            query,
            size,
            aggregations: Vec::new(),
            source: None,
        }
    }

    pub fn aggregate(mut self, name: &str, aggregation: Aggregation) -> Self {
        self.aggregations.push((name.to_string(), aggregation));
        self
    }

    pub fn with_source(mut self, fields: &[&str]) -> Self {
        self.source = Some(fields.iter().map(|f| f.to_string()).collect());
        self
    }

    pub fn to_json(&self) -> Value {
        let mut body = Map::new();
        body.insert("query".to_string(), self.query.to_json());
        body.insert("size".to_string(), json!(self.size));

        if !self.aggregations.is_empty() {
            let aggs: Map<String, Value> = self
                .aggregations
                .iter()
                .map(|(name, agg)| (name.clone(), agg.to_json()))
                .collect();
            body.insert("aggs".to_string(), Value::Object(aggs));
        }

        if let Some(fields) = &self.source {
            body.insert("_source".to_string(), json!(fields));
        }

        Value::Object(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_should_query_json() {
        let query = Query::Should(vec![
            Query::matching("text", "spicy noodles"),
            Query::matching("text", "hot noodles"),
        ]);

        assert_eq!(
            query.to_json(),
            json!({
                "bool": {
                    "should": [
                        { "match": { "text": "spicy noodles" } },
                        { "match": { "text": "hot noodles" } }
                    ]
                }
            })
        );
    }

    #[test]
    fn test_terms_query_json() {
        let ids = vec!["b1".to_string(), "b2".to_string()];
        assert_eq!(
            Query::terms("business_id", &ids).to_json(),
            json!({ "terms": { "business_id": ["b1", "b2"] } })
        );
    }

    #[test]
    fn test_geo_query_json() {
        let query = Query::GeoBoundingBox {
            field: "location".to_string(),
            top_left: GeoPoint::new(40.8, -74.1),
            bottom_right: GeoPoint::new(40.6, -73.9),
        };

        assert_eq!(
            query.to_json(),
            json!({
                "geo_bounding_box": {
                    "location": {
                        "top_left": { "lat": 40.8, "lon": -74.1 },
                        "bottom_right": { "lat": 40.6, "lon": -73.9 }
                    }
                }
            })
        );
    }

    #[test]
    fn test_search_request_json() {
        let request = SearchRequest::new(Query::term("user_id", "u1"), 10)
            .aggregate(
                "review_count",
                Aggregation::ValueCount {
                    field: "user_id".to_string(),
                },
            )
            .aggregate(
                "unique_businesses",
                Aggregation::Terms {
                    field: "business_id".to_string(),
                    size: 5000,
                },
            )
            .with_source(&["business_id", "text"]);

        assert_eq!(
            request.to_json(),
            json!({
                "query": { "term": { "user_id": "u1" } },
                "size": 10,
                "aggs": {
                    "review_count": { "value_count": { "field": "user_id" } },
                    "unique_businesses": { "terms": { "field": "business_id", "size": 5000 } }
                },
                "_source": ["business_id", "text"]
            })
        );
    }

    #[test]
    fn test_plain_request_omits_optional_sections() {
        let body = SearchRequest::new(Query::phrase("name", "Joe's Pizza"), 1).to_json();
        assert!(body.get("aggs").is_none());
        assert!(body.get("_source").is_none());
        assert_eq!(body["query"], json!({ "match_phrase": { "name": "Joe's Pizza" } }));
    }
}
