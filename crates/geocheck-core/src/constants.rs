//! Core constants for location-gated check-in.
//!
//! These values define the geometry model and the default check-in policy.
//! Policy values (threshold, countdown) are defaults only; the engine reads
//! the effective values from its configuration.
//!
//! # Usage
//!
//! ```
//! use geocheck_core::constants::*;
//!
//! fn is_valid_latitude(lat: f64) -> bool {
//!     (MIN_LATITUDE..=MAX_LATITUDE).contains(&lat)
//! }
//!
//! assert!(is_valid_latitude(25.033));
//! assert!(!is_valid_latitude(90.5));
//! assert_eq!(DEFAULT_THRESHOLD_METERS, 2000.0);
//! ```

// ============================================================================
// Geometry
// ============================================================================

/// Mean Earth radius used by the haversine formula, in meters.
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Minimum valid latitude in decimal degrees.
pub const MIN_LATITUDE: f64 = -90.0;

/// Maximum valid latitude in decimal degrees.
pub const MAX_LATITUDE: f64 = 90.0;

/// Minimum valid longitude in decimal degrees.
pub const MIN_LONGITUDE: f64 = -180.0;

/// Maximum valid longitude in decimal degrees.
pub const MAX_LONGITUDE: f64 = 180.0;

/// Tolerance used when comparing coordinates for equality, in degrees.
///
/// Roughly 0.1 mm at the equator.
pub const COORDINATE_EPSILON: f64 = 1e-9;

// ============================================================================
// Check-in Policy Defaults
// ============================================================================

/// Maximum distance between device and reference for a successful check-in.
///
/// # Examples
///
/// ```
/// use geocheck_core::constants::DEFAULT_THRESHOLD_METERS;
/// use geocheck_core::Verdict;
///
/// assert_eq!(Verdict::judge(1999.9, DEFAULT_THRESHOLD_METERS), Verdict::Success);
/// assert_eq!(Verdict::judge(2000.0, DEFAULT_THRESHOLD_METERS), Verdict::Success);
/// assert_eq!(Verdict::judge(2000.1, DEFAULT_THRESHOLD_METERS), Verdict::Failure);
/// ```
pub const DEFAULT_THRESHOLD_METERS: f64 = 2000.0;

/// Seconds a check-in result stays on screen before the automatic reset.
pub const DEFAULT_RESET_COUNTDOWN_SECS: u32 = 5;

// ============================================================================
// Payload Format
// ============================================================================

/// JSON field holding the latitude of a scanned reference position.
pub const PAYLOAD_LAT_FIELD: &str = "lat";

/// JSON field holding the longitude of a scanned reference position.
pub const PAYLOAD_LNG_FIELD: &str = "lng";
