use crate::domain::LatLng;

/// Euclidean distance in degree space (not meters)
pub fn planar_distance(a: LatLng, b: LatLng) -> f64 {
    let d_lat = a.lat - b.lat;
    let d_lng = a.lng - b.lng;
    (d_lat * d_lat + d_lng * d_lng).sqrt()
}

/// Shortest degree-space distance from `p` to the segment `a`-`b`
///
/// Projects `p` onto the segment's line, clamps the projection parameter to
/// `[0, 1]` and measures to the projected point. A zero-length segment
/// degenerates to the distance from `p` to `a`.
///
/// Written out instead of using `geo`'s distance traits so the grace-margin
/// `<` comparison runs on exactly this formula, bit for bit.
pub fn distance_to_segment(p: LatLng, a: LatLng, b: LatLng) -> f64 {
    let d_lat = b.lat - a.lat;
    let d_lng = b.lng - a.lng;
    let l2 = d_lat * d_lat + d_lng * d_lng;

    if l2 == 0.0 {
        return planar_distance(p, a);
    }

    let t = ((p.lat - a.lat) * d_lat + (p.lng - a.lng) * d_lng) / l2;
    let t = t.clamp(0.0, 1.0);

    let projected = LatLng::new(a.lat + t * d_lat, a.lng + t * d_lng);
    planar_distance(p, projected)
}

/// Minimum distance from `point` to any edge of the closed loop `vertices`
///
/// # Returns
/// * `None` for fewer than 3 vertices (no boundary to measure against)
pub fn min_distance_to_boundary(point: LatLng, vertices: &[LatLng]) -> Option<f64> {
    let n = vertices.len();
    if n < 3 {
        return None;
    }

    let mut min = f64::INFINITY;
    let mut j = n - 1;
    for i in 0..n {
        min = min.min(distance_to_segment(point, vertices[i], vertices[j]));
        j = i;
    }

    Some(min)
}
