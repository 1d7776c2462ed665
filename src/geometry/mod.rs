pub mod distance;
pub mod ray_cast;
pub mod units;

pub use distance::{distance_to_segment, min_distance_to_boundary, planar_distance};
pub use ray_cast::ray_cast_contains;
pub use units::{METERS_PER_DEGREE, degrees_to_meters, meters_to_degrees};
