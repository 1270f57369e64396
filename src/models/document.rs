// file: src/models/document.rs
// description: business and review records decoded from search hits
// reference: internal data structures

use crate::analysis::GeoPoint;
use crate::error::Result;
use crate::store::SearchHit;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Business {
    pub business_id: String,
    pub name: String,
    pub address: Option<String>,
    pub location: Option<GeoPoint>,
    pub score: f64,
}

impl Business {
    pub fn from_hit(hit: &SearchHit) -> Result<Self> {
        let business_id = hit
            .str_field("business_id")
            .unwrap_or(hit.id.as_str())
            .to_string();

        Ok(Self {
            business_id,
            name: hit.require_str("name")?.to_string(),
            address: hit.str_field("address").map(str::to_string),
            location: location_of(hit),
            score: hit.score,
        })
    }
}

/// Coordinates come either as flat `latitude`/`longitude` fields or as a
/// `location` geo point object.
fn location_of(hit: &SearchHit) -> Option<GeoPoint> {
    if let (Some(lat), Some(lon)) = (hit.f64_field("latitude"), hit.f64_field("longitude")) {
        return Some(GeoPoint::new(lat, lon));
    }

    match hit.source.get("location") {
        Some(Value::Object(point)) => {
            let lat = point.get("lat").and_then(Value::as_f64)?;
            let lon = point.get("lon").and_then(Value::as_f64)?;
            Some(GeoPoint::new(lat, lon))
        }
        _ => None,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub review_id: String,
    pub business_id: Option<String>,
    pub user_id: Option<String>,
    pub text: String,
    pub score: f64,
}

impl Review {
    pub fn from_hit(hit: &SearchHit) -> Result<Self> {
        let review_id = hit
            .str_field("review_id")
            .unwrap_or(hit.id.as_str())
            .to_string();

        Ok(Self {
            review_id,
            business_id: hit.str_field("business_id").map(str::to_string),
            user_id: hit.str_field("user_id").map(str::to_string),
            text: hit.require_str("text")?.to_string(),
            score: hit.score,
        })
    }
}
