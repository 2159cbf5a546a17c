//! Spherical geometry for cross-track distance calculations.
//!
//! All trig happens here; degrees are converted to radians at this boundary
//! and nowhere else.

use crate::models::Coordinate;

/// Mean earth radius in meters (spherical approximation).
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Meters per nautical mile.
pub const NM_IN_METERS: f64 = 1852.0;

/// Convert meters to nautical miles.
pub fn meters_to_nm(meters: f64) -> f64 {
    meters / NM_IN_METERS
}

/// Clamp a value into [-1, 1] before an inverse trig call.
///
/// The cross-track identities can push arguments marginally outside the
/// valid domain through floating-point error; `asin`/`acos` would return
/// NaN for those.
pub fn clamp_unit(x: f64) -> f64 {
    x.clamp(-1.0, 1.0)
}

/// Great-circle distance between two points in meters (haversine formula).
///
/// Symmetric, non-negative, and zero for coincident points.
pub fn haversine_distance(a: Coordinate, b: Coordinate) -> f64 {
    let phi1 = a.lat.to_radians();
    let phi2 = b.lat.to_radians();
    let dphi = (b.lat - a.lat).to_radians();
    let dlambda = (b.lon - a.lon).to_radians();
    let h = (dphi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (dlambda / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * h.sqrt().atan2((1.0 - h).sqrt())
}

/// Initial bearing from `a` to `b` in radians, 0 = north, π/2 = east.
///
/// Undefined for coincident points; callers must not rely on the value then.
pub fn initial_bearing(a: Coordinate, b: Coordinate) -> f64 {
    let phi1 = a.lat.to_radians();
    let phi2 = b.lat.to_radians();
    let delta_lambda = (b.lon - a.lon).to_radians();

    let x = delta_lambda.sin() * phi2.cos();
    let y = phi1.cos() * phi2.sin() - phi1.sin() * phi2.cos() * delta_lambda.cos();

    x.atan2(y)
}

/// Minimum distance in meters from point `p` to the great-circle segment
/// `a`→`b`.
///
/// Uses the spherical cross-track / along-track construction: when the
/// perpendicular projection of `p` lands inside the segment the unsigned
/// cross-track distance is returned, otherwise the distance to the nearer
/// endpoint. `a` and `b` must not coincide; callers skip degenerate
/// segments.
pub fn segment_distance_m(p: Coordinate, a: Coordinate, b: Coordinate) -> f64 {
    // Angular distance from segment start to the point.
    let d13 = haversine_distance(a, p) / EARTH_RADIUS_M;
    let theta12 = initial_bearing(a, b);
    let theta13 = initial_bearing(a, p);

    // Signed cross-track distance off the segment's great circle.
    let sin_xt = d13.sin() * (theta13 - theta12).sin();
    let xt_angular = clamp_unit(sin_xt).asin();
    let abs_xt = (xt_angular * EARTH_RADIUS_M).abs();

    // Along-track distance from `a` toward `b`.
    let d_at = clamp_unit(d13.cos() / xt_angular.cos()).acos() * EARTH_RADIUS_M;
    let seg_len = haversine_distance(a, b);

    if (0.0..=seg_len).contains(&d_at) {
        return abs_xt;
    }

    // Projection falls outside the segment: nearer endpoint wins.
    haversine_distance(p, a).min(haversine_distance(p, b))
}
