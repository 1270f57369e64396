// file: src/analysis/geo.rs
// description: point plus radius to lat/lon bounding box on a spherical earth
// reference: equirectangular approximation with cosine-corrected longitude

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
}

impl BoundingBox {
    pub fn as_tuple(&self) -> (f64, f64, f64, f64) {
        (self.min_lon, self.min_lat, self.max_lon, self.max_lat)
    }
}

/// Derives a box around `(lon, lat)`.
///
/// `C = 2πR`, `dLat = radius·C/360`, `dLon = dLat·cos(lat)`. Flat near the
/// point, so only meaningful for small radii. Toward the poles `cos(lat)`
/// shrinks to ~0 and the box collapses to a thin meridian strip instead of
/// widening as a true circle would. Never divides, so it cannot fail.
pub fn bounding_box(lon: f64, lat: f64, radius_km: f64, earth_radius_km: f64) -> BoundingBox {
    let circumference = 2.0 * std::f64::consts::PI * earth_radius_km;
    let d_lat = radius_km * circumference / 360.0;
    let d_lon = d_lat * lat.to_radians().cos();

    BoundingBox {
        min_lon: lon - d_lon,
        min_lat: lat - d_lat,
        max_lon: lon + d_lon,
        max_lat: lat + d_lat,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_symmetric_at_origin() {
        let bbox = bounding_box(0.0, 0.0, 10.0, 6.4);
        assert!(bbox.max_lon > 0.0 && bbox.max_lat > 0.0);
        assert!((bbox.min_lon + bbox.max_lon).abs() < EPS);
        assert!((bbox.min_lat + bbox.max_lat).abs() < EPS);
        // cos(0) = 1, so both deltas match
        assert!((bbox.max_lon - bbox.max_lat).abs() < EPS);
    }

    #[test]
    fn test_formula_values() {
        let bbox = bounding_box(-75.0, 40.0, 10.0, 6.4);
        let d_lat = 10.0 * 2.0 * std::f64::consts::PI * 6.4 / 360.0;
        let d_lon = d_lat * 40.0_f64.to_radians().cos();

        assert!((bbox.max_lat - (40.0 + d_lat)).abs() < EPS);
        assert!((bbox.min_lat - (40.0 - d_lat)).abs() < EPS);
        assert!((bbox.max_lon - (-75.0 + d_lon)).abs() < EPS);
        assert!((bbox.min_lon - (-75.0 - d_lon)).abs() < EPS);
    }

    #[test]
    fn test_pole_collapses_longitude() {
        let bbox = bounding_box(12.0, 90.0, 10.0, 6.4);
        assert!(bbox.min_lon.is_finite() && bbox.max_lon.is_finite());
        assert!((bbox.max_lon - bbox.min_lon).abs() < 1e-9);
        assert!(bbox.max_lat > bbox.min_lat);
    }

    #[test]
    fn test_tuple_order() {
        let bbox = bounding_box(10.0, 20.0, 1.0, 6.4);
        assert_eq!(
            bbox.as_tuple(),
            (bbox.min_lon, bbox.min_lat, bbox.max_lon, bbox.max_lat)
        );
    }
}
