use serde::{Deserialize, Serialize};

use crate::error::{GeofenceError, Result};

/// A WGS84 coordinate in degrees.
///
/// Equality is exact floating-point equality.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Build a coordinate, rejecting NaN/Inf and out-of-range degrees
    pub fn validated(lat: f64, lng: f64) -> Result<Self> {
        Self::new(lat, lng).validate()
    }

    /// Check an already constructed coordinate (e.g. one deserialized from JSON)
    pub fn validate(self) -> Result<Self> {
        if !self.is_finite() {
            return Err(GeofenceError::NonFiniteCoordinate {
                lat: self.lat,
                lng: self.lng,
            });
        }
        if !(-90.0..=90.0).contains(&self.lat) {
            return Err(GeofenceError::LatitudeOutOfRange(self.lat));
        }
        if !(-180.0..=180.0).contains(&self.lng) {
            return Err(GeofenceError::LongitudeOutOfRange(self.lng));
        }
        Ok(self)
    }

    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }

    /// Shift both components by the given offsets
    pub fn offset(&self, d_lat: f64, d_lng: f64) -> Self {
        Self::new(self.lat + d_lat, self.lng + d_lng)
    }
}

impl From<(f64, f64)> for LatLng {
    /// Tuples follow the `(lat, lon)` convention used throughout the crate
    fn from((lat, lng): (f64, f64)) -> Self {
        Self::new(lat, lng)
    }
}

impl From<LatLng> for geo::Coord<f64> {
    fn from(p: LatLng) -> Self {
        geo::coord! { x: p.lng, y: p.lat }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validated_accepts_bogota() {
        let p = LatLng::validated(4.711, -74.0721).unwrap();
        assert_eq!(p, LatLng::new(4.711, -74.0721));
    }

    #[test]
    fn test_validated_rejects_nan_and_inf() {
        assert!(matches!(
            LatLng::validated(f64::NAN, 0.0),
            Err(GeofenceError::NonFiniteCoordinate { .. })
        ));
        assert!(matches!(
            LatLng::validated(0.0, f64::INFINITY),
            Err(GeofenceError::NonFiniteCoordinate { .. })
        ));
    }

    #[test]
    fn test_validated_rejects_out_of_range() {
        assert_eq!(
            LatLng::validated(90.5, 0.0),
            Err(GeofenceError::LatitudeOutOfRange(90.5))
        );
        assert_eq!(
            LatLng::validated(0.0, -180.1),
            Err(GeofenceError::LongitudeOutOfRange(-180.1))
        );
    }

    #[test]
    fn test_json_shape() {
        let p: LatLng = serde_json::from_str(r#"{"lat":4.6,"lng":-74.1}"#).unwrap();
        assert_eq!(p, LatLng::new(4.6, -74.1));
        assert_eq!(
            serde_json::to_string(&p).unwrap(),
            r#"{"lat":4.6,"lng":-74.1}"#
        );
    }

    #[test]
    fn test_geo_coord_axis_order() {
        let c: geo::Coord<f64> = LatLng::new(1.0, 2.0).into();
        assert_eq!(c.x, 2.0);
        assert_eq!(c.y, 1.0);
    }
}
