//! Great-circle distance.

use crate::domain::Coordinate;

/// Mean Earth radius used for distance calculations, in metres.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Haversine great-circle distance between two coordinates, in metres.
///
/// Raw latitude/longitude degrees are not a distance: a degree of longitude
/// shrinks with latitude, so comparing Euclidean distances in degree space
/// can pick the wrong station.
pub fn haversine_distance(a: Coordinate, b: Coordinate) -> f64 {
    let lat1 = a.lat().to_radians();
    let lat2 = b.lat().to_radians();
    let delta_lat = (b.lat() - a.lat()).to_radians();
    let delta_lon = (b.lon() - a.lon()).to_radians();

    let h = (delta_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (delta_lon / 2.0).sin().powi(2);

    // Rounding can push h a hair over 1 for antipodal points
    2.0 * EARTH_RADIUS_M * h.min(1.0).sqrt().asin()
}
