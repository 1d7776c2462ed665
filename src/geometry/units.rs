/// Flat-earth conversion between meters and degrees
///
/// Uses a single scale for both axes:
/// - 1 degree ≈ 111,111 m
///
/// This is exact only at the equator and ignores longitude convergence, which
/// is acceptable for city-sized service areas.
pub const METERS_PER_DEGREE: f64 = 111_111.0;

/// Convert a distance in meters to the equivalent angular distance in degrees
pub fn meters_to_degrees(meters: f64) -> f64 {
    meters / METERS_PER_DEGREE
}

/// Convert an angular distance in degrees back to approximate meters
pub fn degrees_to_meters(degrees: f64) -> f64 {
    degrees * METERS_PER_DEGREE
}
