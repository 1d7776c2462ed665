use thiserror::Error;

use crate::domain::ZoneKind;

/// Errors raised at the validated boundaries of the crate.
///
/// The evaluator itself is total over finite input and never returns these;
/// they come from constructing inputs, loading zones and driving the editor.
#[derive(Debug, Error, PartialEq)]
pub enum GeofenceError {
    #[error("coordinate is not finite: ({lat}, {lng})")]
    NonFiniteCoordinate { lat: f64, lng: f64 },

    #[error("latitude {0} is outside [-90, 90]")]
    LatitudeOutOfRange(f64),

    #[error("longitude {0} is outside [-180, 180]")]
    LongitudeOutOfRange(f64),

    #[error("grace margin must be a finite, non-negative number of meters, got {0}")]
    InvalidGraceMargin(f64),

    #[error("zone {key} could not be parsed: {reason}")]
    InvalidZone { key: String, reason: String },

    #[error("no polygon configured for the {0} zone")]
    ZoneNotConfigured(ZoneKind),

    #[error("vertex index {index} is out of range for a path of {len} vertices")]
    VertexOutOfRange { index: usize, len: usize },

    #[error("cannot apply {event} while the editor is {state}")]
    InvalidTransition { state: String, event: String },
}

pub type Result<T> = std::result::Result<T, GeofenceError>;
