//! Geofence membership evaluation
//!
//! Two phases, in order:
//! 1. Strict ray-casting containment
//! 2. Boundary proximity within the grace margin (only if phase 1 fails)
//!
//! Everything here is pure: polygons are borrowed for the duration of a call
//! and nothing is cached between calls.

pub mod margin;

pub use margin::{DEFAULT_GRACE_MARGIN_M, GraceMargin};

use serde::Serialize;

use crate::domain::{LatLng, ZonePolygon};
use crate::geometry::{min_distance_to_boundary, ray_cast_contains};

/// Outcome of a membership check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Membership {
    /// Strictly inside the polygon
    Inside,
    /// Outside, but within the grace margin of the boundary
    WithinMargin,
    Outside,
}

impl Membership {
    /// Whether the point should be treated as served by the zone
    pub fn is_served(self) -> bool {
        !matches!(self, Membership::Outside)
    }
}

/// Classify `point` against `polygon`
///
/// Polygons with fewer than 3 vertices are no region and always yield
/// `Outside`. Non-finite coordinates give an unspecified result; validate with
/// [`LatLng::validated`] first when that matters.
pub fn classify(point: LatLng, polygon: &ZonePolygon, margin: GraceMargin) -> Membership {
    let vertices = polygon.vertices.as_slice();
    if vertices.len() < 3 {
        return Membership::Outside;
    }

    if ray_cast_contains(point, vertices) {
        return Membership::Inside;
    }

    if margin.is_enabled() {
        let threshold = margin.degrees();
        if let Some(distance) = min_distance_to_boundary(point, vertices)
            && distance < threshold
        {
            tracing::trace!(
                lat = point.lat,
                lng = point.lng,
                distance,
                threshold,
                "point rescued by grace margin"
            );
            return Membership::WithinMargin;
        }
    }

    Membership::Outside
}

/// Whether `point` is served by `polygon`, tolerating `margin` outside the boundary
pub fn is_inside(point: LatLng, polygon: &ZonePolygon, margin: GraceMargin) -> bool {
    classify(point, polygon, margin).is_served()
}

/// Evaluator configured with a grace margin, applied to polygons supplied per call
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GeofenceEvaluator {
    margin: GraceMargin,
}

impl GeofenceEvaluator {
    pub fn new(margin: GraceMargin) -> Self {
        Self { margin }
    }

    /// Strict ray casting only
    pub fn strict() -> Self {
        Self::new(GraceMargin::NONE)
    }

    pub fn with_margin(mut self, margin: GraceMargin) -> Self {
        self.margin = margin;
        self
    }

    pub fn margin(&self) -> GraceMargin {
        self.margin
    }

    pub fn classify(&self, point: LatLng, polygon: &ZonePolygon) -> Membership {
        classify(point, polygon, self.margin)
    }

    pub fn is_inside(&self, point: LatLng, polygon: &ZonePolygon) -> bool {
        is_inside(point, polygon, self.margin)
    }
}
