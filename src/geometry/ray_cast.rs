use crate::domain::LatLng;

/// Strict point-in-polygon test using the even-odd rule
///
/// # Algorithm
/// Walks every vertex `V[i]` paired with its predecessor `V[i-1]` (wrapping
/// around) and toggles `inside` whenever the edge straddles the point's
/// longitude and the edge's interpolated latitude lies above the point.
///
/// Edges whose endpoints share a longitude never straddle it, so the
/// interpolation is only evaluated when `yj != yi`.
///
/// Points exactly on the boundary land on one side or the other depending on
/// which edges they touch; callers who need tolerance use the grace margin.
///
/// # Returns
/// * `false` for fewer than 3 vertices
pub fn ray_cast_contains(point: LatLng, vertices: &[LatLng]) -> bool {
    let n = vertices.len();
    if n < 3 {
        return false;
    }

    let (px, py) = (point.lat, point.lng);
    let mut inside = false;
    let mut j = n - 1;

    for i in 0..n {
        let (xi, yi) = (vertices[i].lat, vertices[i].lng);
        let (xj, yj) = (vertices[j].lat, vertices[j].lng);

        if (yi > py) != (yj > py) {
            let edge_lat = (xj - xi) * (py - yi) / (yj - yi) + xi;
            if px < edge_lat {
                inside = !inside;
            }
        }

        j = i;
    }

    inside
}
