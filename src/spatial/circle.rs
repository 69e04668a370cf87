//! Planar circle approximation around a center point.
//!
//! Suitable for city-scale radii: latitude offsets are exact on a spherical
//! Earth, longitude offsets are stretched by `1 / cos(lat)`. No geodesic
//! correction is attempted beyond that.

use geo::{Coord, LineString, Polygon};
use std::f64::consts::TAU;

use crate::models::Center;

/// Mean Earth radius in miles.
pub const EARTH_RADIUS_MILES: f64 = 3958.8;

/// Vertices per circle (before the closing vertex).
pub const CIRCLE_STEPS: usize = 64;

/// Keeps the longitude stretch finite near the poles.
const MIN_COS_LAT: f64 = 1e-6;

/// Build a closed, counter-clockwise polygon approximating a circle of
/// `radius_miles` around `center`.
///
/// Circles built around the same center share vertex angles, so a circle
/// with a smaller radius always lies inside one with a larger radius.
pub fn circle_polygon(center: Center, radius_miles: f64) -> Polygon<f64> {
    let dlat = (radius_miles / EARTH_RADIUS_MILES).to_degrees();
    let cos_lat = center.lat.to_radians().cos().abs().max(MIN_COS_LAT);
    let dlng = dlat / cos_lat;

    let mut coords: Vec<Coord<f64>> = (0..CIRCLE_STEPS)
        .map(|step| {
            let theta = TAU * step as f64 / CIRCLE_STEPS as f64;
            Coord {
                x: center.lng + dlng * theta.cos(),
                y: center.lat + dlat * theta.sin(),
            }
        })
        .collect();
    coords.push(coords[0]);

    Polygon::new(LineString::new(coords), vec![])
}

/// Degrees of latitude spanned by `miles`.
pub fn miles_to_lat_degrees(miles: f64) -> f64 {
    (miles / EARTH_RADIUS_MILES).to_degrees()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use geo::{Contains, Point};

    #[test]
    fn test_circle_is_closed() {
        let circle = circle_polygon(Center::new(32.78, -96.80), 3.0);
        assert!(circle.exterior().is_closed());
        assert_eq!(circle.exterior().0.len(), CIRCLE_STEPS + 1);
    }

    #[test]
    fn test_circle_extent_matches_radius() {
        let center = Center::new(0.0, 0.0);
        let circle = circle_polygon(center, 10.0);
        let north = circle
            .exterior()
            .0
            .iter()
            .map(|c| c.y)
            .fold(f64::MIN, f64::max);
        assert_relative_eq!(north, miles_to_lat_degrees(10.0), epsilon = 1e-12);
        // ~69.1 miles per degree of latitude
        assert_relative_eq!(north, 10.0 / 69.09, epsilon = 1e-3);
    }

    #[test]
    fn test_longitude_stretch_at_latitude() {
        let circle = circle_polygon(Center::new(60.0, 0.0), 1.0);
        let east = circle
            .exterior()
            .0
            .iter()
            .map(|c| c.x)
            .fold(f64::MIN, f64::max);
        // cos(60°) = 0.5, so the east offset is twice the north offset
        assert_relative_eq!(east, 2.0 * miles_to_lat_degrees(1.0), epsilon = 1e-9);
    }

    #[test]
    fn test_smaller_circle_inside_larger() {
        let center = Center::new(32.78, -96.80);
        let small = circle_polygon(center, 1.0);
        let large = circle_polygon(center, 3.0);
        for coord in small.exterior().0.iter() {
            assert!(large.contains(&Point::from(*coord)));
        }
    }
}
