// file: src/utils/validation.rs
// description: input validation for queries, identifiers and coordinates
// reference: input validation patterns

use crate::analysis::GeoPoint;
use crate::error::{Result, SummaryError};

pub struct Validator;

impl Validator {
    pub fn validate_query_not_empty(query: &str) -> Result<()> {
        if query.trim().is_empty() {
            return Err(SummaryError::Input("Query is empty".to_string()));
        }
        Ok(())
    }

    pub fn validate_identifier(kind: &str, id: &str) -> Result<()> {
        let trimmed = id.trim();
        if trimmed.is_empty() {
            return Err(SummaryError::Input(format!("No {} specified", kind)));
        }

        if trimmed.chars().any(char::is_whitespace) {
            return Err(SummaryError::Input(format!(
                "Invalid {} (contains whitespace): {}",
                kind, trimmed
            )));
        }

        Ok(())
    }

    pub fn parse_coordinate(raw: &str) -> Result<f64> {
        let value: f64 = raw.trim().parse().map_err(|_| {
            SummaryError::Input(format!("lat/lon value is not a real number: {}", raw))
        })?;

        if !value.is_finite() {
            return Err(SummaryError::Input(format!(
                "lat/lon value is not finite: {}",
                raw
            )));
        }

        Ok(value)
    }

    pub fn validate_point(point: &GeoPoint) -> Result<()> {
        if !(-90.0..=90.0).contains(&point.lat) {
            return Err(SummaryError::Input(format!(
                "Latitude {} outside [-90, 90]",
                point.lat
            )));
        }

        if !(-180.0..=180.0).contains(&point.lon) {
            return Err(SummaryError::Input(format!(
                "Longitude {} outside [-180, 180]",
                point.lon
            )));
        }

        Ok(())
    }

    /// Both corners in range and the top edge not below the bottom one.
    /// Longitudes are unordered since a box may cross the antimeridian.
    pub fn validate_box(top_left: &GeoPoint, bottom_right: &GeoPoint) -> Result<()> {
        Self::validate_point(top_left)?;
        Self::validate_point(bottom_right)?;

        if top_left.lat < bottom_right.lat {
            return Err(SummaryError::Input(format!(
                "Top latitude {} is below bottom latitude {}",
                top_left.lat, bottom_right.lat
            )));
        }

        Ok(())
    }

    /// Parses `top_lat top_lon bottom_lat bottom_lon` into the two corners.
    pub fn parse_geo_args<S: AsRef<str>>(args: &[S]) -> Result<(GeoPoint, GeoPoint)> {
        if args.len() < 4 {
            return Err(SummaryError::Input(format!(
                "Geo query needs 4 values (top_lat top_lon bottom_lat bottom_lon), got {}",
                args.len()
            )));
        }

        let values = args[..4]
            .iter()
            .map(|raw| Self::parse_coordinate(raw.as_ref()))
            .collect::<Result<Vec<f64>>>()?;

        let top_left = GeoPoint::new(values[0], values[1]);
        let bottom_right = GeoPoint::new(values[2], values[3]);
        Self::validate_box(&top_left, &bottom_right)?;

        Ok((top_left, bottom_right))
    }

    pub fn truncate_text(text: &str, max_chars: usize) -> String {
        match text.char_indices().nth(max_chars) {
            Some((byte_index, _)) => format!("{}...", &text[..byte_index]),
            None => text.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_query_not_empty() {
        assert!(Validator::validate_query_not_empty("tacos").is_ok());
        assert!(Validator::validate_query_not_empty("").is_err());
        assert!(Validator::validate_query_not_empty("   ").is_err());
    }

    #[test]
    fn test_validate_identifier() {
        assert!(Validator::validate_identifier("user id", "mh_-eMZ6K5RLWhZyISBhwA").is_ok());
        assert!(Validator::validate_identifier("user id", " ").is_err());
        assert!(Validator::validate_identifier("user id", "two words").is_err());
    }

    #[test]
    fn test_parse_coordinate() {
        assert_eq!(Validator::parse_coordinate(" 40.5 ").unwrap(), 40.5);
        assert!(matches!(
            Validator::parse_coordinate("north"),
            Err(SummaryError::Input(_))
        ));
        assert!(Validator::parse_coordinate("NaN").is_err());
        assert!(Validator::parse_coordinate("inf").is_err());
    }

    #[test]
    fn test_parse_geo_args() {
        let (top_left, bottom_right) =
            Validator::parse_geo_args(&["40.8", "-74.1", "40.6", "-73.9"]).unwrap();
        assert_eq!(top_left, GeoPoint::new(40.8, -74.1));
        assert_eq!(bottom_right, GeoPoint::new(40.6, -73.9));
    }

    #[test]
    fn test_parse_geo_args_rejects_bad_input() {
        assert!(Validator::parse_geo_args(&["40.8", "-74.1", "40.6"]).is_err());
        assert!(Validator::parse_geo_args(&["40.8", "west", "40.6", "-73.9"]).is_err());
        assert!(Validator::parse_geo_args(&["95.0", "-74.1", "40.6", "-73.9"]).is_err());
        assert!(Validator::parse_geo_args(&["40.8", "-74.1", "40.6", "190"]).is_err());
        assert!(matches!(
            Validator::parse_geo_args(&["40.6", "-74.1", "40.8", "-73.9"]),
            Err(SummaryError::Input(_))
        ));
    }

    #[test]
    fn test_truncate_text() {
        assert_eq!(Validator::truncate_text("short", 10), "short");
        assert_eq!(
            Validator::truncate_text("this is a very long text", 10),
            "this is a ..."
        );
        assert_eq!(Validator::truncate_text("crème brûlée", 4), "crèm...");
    }
}
