use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{GeofenceError, Result};
use crate::geometry::meters_to_degrees;

/// Default tolerance around a zone boundary, in meters
pub const DEFAULT_GRACE_MARGIN_M: f64 = 300.0;

/// Distance in meters a point may sit outside a polygon and still be served.
///
/// Always finite and non-negative; zero disables the buffer.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct GraceMargin(f64);

impl GraceMargin {
    pub const NONE: GraceMargin = GraceMargin(0.0);

    pub fn new(meters: f64) -> Result<Self> {
        if !meters.is_finite() || meters < 0.0 {
            return Err(GeofenceError::InvalidGraceMargin(meters));
        }
        Ok(Self(meters))
    }

    pub fn meters(self) -> f64 {
        self.0
    }

    /// Angular threshold under the flat-earth approximation
    pub fn degrees(self) -> f64 {
        meters_to_degrees(self.0)
    }

    pub fn is_enabled(self) -> bool {
        self.0 > 0.0
    }
}

impl Default for GraceMargin {
    fn default() -> Self {
        Self(DEFAULT_GRACE_MARGIN_M)
    }
}

impl TryFrom<f64> for GraceMargin {
    type Error = GeofenceError;

    fn try_from(meters: f64) -> Result<Self> {
        Self::new(meters)
    }
}

impl From<GraceMargin> for f64 {
    fn from(margin: GraceMargin) -> Self {
        margin.0
    }
}

impl fmt::Display for GraceMargin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}m", self.0)
    }
}
