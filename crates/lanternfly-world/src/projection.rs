//! Geographic helpers: projection and distances.

use lanternfly_core::{CoordinateProjection, DistanceMetric, Position};

pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Project (longitude, latitude) degrees onto an equirectangular plane in km
pub fn equirectangular(lon: f64, lat: f64) -> Position {
    let lat_rad = lat.to_radians();
    let lon_rad = lon.to_radians();
    Position::new(
        EARTH_RADIUS_KM * lon_rad * lat_rad.cos(),
        EARTH_RADIUS_KM * lat_rad,
    )
}

/// Map an input position into grid units
pub fn project(projection: CoordinateProjection, pos: Position) -> Position {
    match projection {
        CoordinateProjection::Identity => pos,
        CoordinateProjection::Equirectangular => equirectangular(pos.x, pos.y),
    }
}

/// Great-circle distance in km between two (longitude, latitude) positions
pub fn haversine_km(a: &Position, b: &Position) -> f64 {
    let lat1 = a.y.to_radians();
    let lat2 = b.y.to_radians();
    let d_lat = lat2 - lat1;
    let d_lon = (b.x - a.x).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * h.sqrt().atan2((1.0 - h).sqrt())
}

pub fn distance(metric: DistanceMetric, a: &Position, b: &Position) -> f64 {
    match metric {
        DistanceMetric::Euclidean => a.distance(b),
        DistanceMetric::GreatCircle => haversine_km(a, b),
    }
}
