//! geofence - Service-area membership checks with a boundary grace margin

pub mod config;
pub mod domain;
pub mod editor;
pub mod error;
pub mod evaluator;
pub mod geometry;
pub mod zones;

pub use domain::{LatLng, ZoneKind, ZonePolygon};
pub use error::GeofenceError;
pub use evaluator::{GeofenceEvaluator, GraceMargin, Membership, classify, is_inside};
pub use zones::ZoneSet;
