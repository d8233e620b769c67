use crate::latlng::LatLng;

/// WGS84 semi-major axis (meters). Used as the sphere radius for ring areas.
pub const WGS84_A: f64 = 6_378_137.0;
/// Mean Earth radius (meters). Used for great-circle distances.
pub const MEAN_EARTH_RADIUS_M: f64 = 6_371_000.0;

pub const SQ_METERS_PER_SQ_KM: f64 = 1_000_000.0;
pub const METERS_PER_KM: f64 = 1_000.0;

/// Great-circle (haversine) distance between two points, in meters.
pub fn haversine_m(a: LatLng, b: LatLng) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let sin_dlat = ((b.lat - a.lat).to_radians() * 0.5).sin();
    let sin_dlon = ((b.lng - a.lng).to_radians() * 0.5).sin();

    let h = sin_dlat * sin_dlat + lat1.cos() * lat2.cos() * sin_dlon * sin_dlon;
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    MEAN_EARTH_RADIUS_M * c
}

/// Length of a path as the sum of great-circle legs, in meters.
pub fn path_length_m(path: &[LatLng]) -> f64 {
    path.windows(2).map(|w| haversine_m(w[0], w[1])).sum()
}

/// Spherical surface area enclosed by a ring, in square meters.
///
/// The ring may or may not repeat its first vertex at the end; the closing
/// edge contributes nothing in that case. Rings with fewer than three
/// vertices have zero area. The result is unsigned, so winding order does
/// not matter.
pub fn geodesic_area_m2(ring: &[LatLng]) -> f64 {
    let n = ring.len();
    if n < 3 {
        return 0.0;
    }

    let mut acc = 0.0;
    for i in 0..n {
        let p1 = ring[i];
        let p2 = ring[(i + 1) % n];
        acc += (p2.lng - p1.lng).to_radians()
            * (2.0 + p1.lat.to_radians().sin() + p2.lat.to_radians().sin());
    }

    (acc * WGS84_A * WGS84_A * 0.5).abs()
}
