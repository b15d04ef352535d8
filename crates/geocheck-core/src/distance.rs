//! Great-circle distance between two coordinates.
//!
//! Uses the haversine formula on a sphere of radius [`EARTH_RADIUS_METERS`].
//! The result is accurate to roughly 0.5% against the WGS-84 ellipsoid, which
//! is well inside the tolerance of a consumer GPS fix.

use crate::Coordinate;
use crate::constants::EARTH_RADIUS_METERS;

/// Compute the great-circle distance between `a` and `b`, in meters.
///
/// Pure and symmetric. Returns `0.0` for identical points and never returns a
/// negative or non-finite value for finite input; antipodal points give
/// about 20,015 km.
///
/// # Examples
///
/// ```
/// use geocheck_core::{Coordinate, haversine_meters};
///
/// let device = Coordinate::new(25.0330, 121.5654).unwrap();
/// let reference = Coordinate::new(25.0530, 121.5654).unwrap();
///
/// let meters = haversine_meters(device, reference);
/// assert!((meters - 2223.9).abs() < 1.0);
/// ```
#[must_use]
pub fn haversine_meters(a: Coordinate, b: Coordinate) -> f64 {
    let phi_a = a.lat().to_radians();
    let phi_b = b.lat().to_radians();
    let delta_phi = (b.lat() - a.lat()).to_radians();
    let delta_lambda = (b.lng() - a.lng()).to_radians();

    let h = (delta_phi / 2.0).sin().powi(2)
        + phi_a.cos() * phi_b.cos() * (delta_lambda / 2.0).sin().powi(2);

    // Rounding can push h a hair past 1 for antipodal points.
    let h = h.clamp(0.0, 1.0);

    let central_angle = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_METERS * central_angle
}
