//! Great-circle distance between two coordinates.
//!
//! Straight-line distance ignores the road network, which is the accepted
//! approximation for stop sequencing and drive-time estimates.

use crate::job::Location;

/// Earth radius in miles.
pub const EARTH_RADIUS_MILES: f64 = 3959.0;

/// Haversine distance between two points in miles.
pub fn distance_miles(from: Location, to: Location) -> f64 {
    let (lat1, lng1) = from.coords();
    let (lat2, lng2) = to.coords();

    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lng = (lng2 - lng1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().asin();

    EARTH_RADIUS_MILES * c
}

/// Driving minutes for `miles` at a constant average speed.
pub fn drive_minutes(miles: f64, speed_mph: f64) -> f64 {
    if speed_mph <= 0.0 {
        return 0.0;
    }
    miles / speed_mph * 60.0
}
