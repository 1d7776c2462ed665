pub mod point;
pub mod zone;

pub use point::LatLng;
pub use zone::{ZoneBounds, ZoneKind, ZonePolygon};
