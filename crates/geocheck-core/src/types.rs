use crate::{
    Result,
    constants::{
        COORDINATE_EPSILON, MAX_LATITUDE, MAX_LONGITUDE, MIN_LATITUDE, MIN_LONGITUDE,
        PAYLOAD_LAT_FIELD, PAYLOAD_LNG_FIELD,
    },
    error::Error,
};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Geographic position in decimal degrees.
///
/// Values built through [`Coordinate::new`] always satisfy
/// latitude ∈ [-90, 90] and longitude ∈ [-180, 180]. Out-of-range input is
/// rejected, never clamped.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinate {
    lat: f64,
    lng: f64,
}

impl Coordinate {
    /// Create a coordinate with range validation.
    ///
    /// # Errors
    /// Returns `Error::CoordinateOutOfRange` if either component is not
    /// finite or lies outside its valid range.
    ///
    /// # Examples
    ///
    /// ```
    /// use geocheck_core::Coordinate;
    ///
    /// let taipei = Coordinate::new(25.0330, 121.5654).unwrap();
    /// assert_eq!(taipei.lat(), 25.0330);
    ///
    /// assert!(Coordinate::new(90.1, 0.0).is_err());
    /// assert!(Coordinate::new(0.0, -180.5).is_err());
    /// ```
    pub fn new(lat: f64, lng: f64) -> Result<Self> {
        let coordinate = Coordinate { lat, lng };
        if !coordinate.is_within_range() {
            return Err(Error::CoordinateOutOfRange { lat, lng });
        }
        Ok(coordinate)
    }

    /// Create a coordinate without range validation.
    ///
    /// Intended for readings that come from a trusted location subsystem
    /// and for the permissive payload policy.
    #[must_use]
    pub const fn new_unchecked(lat: f64, lng: f64) -> Self {
        Coordinate { lat, lng }
    }

    /// Latitude in decimal degrees.
    #[inline]
    #[must_use]
    pub fn lat(&self) -> f64 {
        self.lat
    }

    /// Longitude in decimal degrees.
    #[inline]
    #[must_use]
    pub fn lng(&self) -> f64 {
        self.lng
    }

    /// Returns `true` if both components are finite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }

    /// Returns `true` if both components are finite and inside their valid range.
    #[must_use]
    pub fn is_within_range(&self) -> bool {
        self.is_finite()
            && (MIN_LATITUDE..=MAX_LATITUDE).contains(&self.lat)
            && (MIN_LONGITUDE..=MAX_LONGITUDE).contains(&self.lng)
    }

    /// Compare two coordinates component-wise within [`COORDINATE_EPSILON`].
    #[must_use]
    pub fn approx_eq(&self, other: &Coordinate) -> bool {
        (self.lat - other.lat).abs() <= COORDINATE_EPSILON
            && (self.lng - other.lng).abs() <= COORDINATE_EPSILON
    }

    /// Encode as the JSON payload carried by a reference QR code.
    ///
    /// # Examples
    ///
    /// ```
    /// use geocheck_core::Coordinate;
    ///
    /// let point = Coordinate::new(25.03, 121.56).unwrap();
    /// assert_eq!(point.to_payload(), r#"{"lat":25.03,"lng":121.56}"#);
    /// ```
    #[must_use]
    pub fn to_payload(&self) -> String {
        let mut object = serde_json::Map::with_capacity(2);
        object.insert(PAYLOAD_LAT_FIELD.to_string(), self.lat.into());
        object.insert(PAYLOAD_LNG_FIELD.to_string(), self.lng.into());
        serde_json::Value::Object(object).to_string()
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}, {}", self.lat, self.lng)
    }
}

/// Outcome of a check-in attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Success,
    Failure,
}

impl Verdict {
    /// Apply the geofencing rule: `distance <= threshold` passes.
    ///
    /// A NaN distance never passes.
    #[inline]
    #[must_use]
    pub fn judge(distance_meters: f64, threshold_meters: f64) -> Self {
        if distance_meters <= threshold_meters {
            Verdict::Success
        } else {
            Verdict::Failure
        }
    }

    /// Returns `true` if the verdict is Success.
    #[inline]
    #[must_use]
    pub fn is_success(self) -> bool {
        matches!(self, Verdict::Success)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Verdict::Success => write!(f, "Success"),
            Verdict::Failure => write!(f, "Failure"),
        }
    }
}

/// Recorded outcome of one confirmed check-in.
///
/// Derived from exactly one device position and one reference position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckInResult {
    /// Pass/fail outcome.
    pub verdict: Verdict,

    /// Great-circle distance between device and reference, in meters.
    pub distance_meters: f64,

    /// Local wall-clock time of the confirmation.
    pub checked_in_at: DateTime<Local>,
}

impl CheckInResult {
    /// Judge `distance_meters` against `threshold_meters` and record the outcome.
    #[must_use]
    pub fn judge(distance_meters: f64, threshold_meters: f64, at: DateTime<Local>) -> Self {
        Self {
            verdict: Verdict::judge(distance_meters, threshold_meters),
            distance_meters,
            checked_in_at: at,
        }
    }

    /// Distance rounded to two decimal places, as shown to users.
    #[must_use]
    pub fn distance_display(&self) -> String {
        format!("{:.2}", self.distance_meters)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0.0, 0.0)]
    #[case(90.0, 180.0)]
    #[case(-90.0, -180.0)]
    #[case(25.0330, 121.5654)]
    fn test_coordinate_valid(#[case] lat: f64, #[case] lng: f64) {
        let coordinate = Coordinate::new(lat, lng).unwrap();
        assert_eq!(coordinate.lat(), lat);
        assert_eq!(coordinate.lng(), lng);
    }

    #[rstest]
    #[case(90.0001, 0.0)] // latitude too high
    #[case(-91.0, 0.0)] // latitude too low
    #[case(0.0, 180.5)] // longitude too high
    #[case(0.0, -200.0)] // longitude too low
    #[case(f64::NAN, 0.0)] // not a number
    #[case(0.0, f64::INFINITY)] // infinite
    fn test_coordinate_out_of_range(#[case] lat: f64, #[case] lng: f64) {
        let result = Coordinate::new(lat, lng);
        assert!(matches!(result, Err(Error::CoordinateOutOfRange { .. })));
    }

    #[test]
    fn test_coordinate_unchecked_keeps_values() {
        let coordinate = Coordinate::new_unchecked(123.0, 456.0);
        assert_eq!(coordinate.lat(), 123.0);
        assert!(!coordinate.is_within_range());
        assert!(coordinate.is_finite());
    }

    #[test]
    fn test_coordinate_display() {
        let coordinate = Coordinate::new(25.033, 121.5654).unwrap();
        assert_eq!(coordinate.to_string(), "25.033, 121.5654");
    }

    #[test]
    fn test_coordinate_approx_eq() {
        let a = Coordinate::new(25.0, 121.0).unwrap();
        let b = Coordinate::new(25.0 + 1e-12, 121.0).unwrap();
        let c = Coordinate::new(25.0001, 121.0).unwrap();
        assert!(a.approx_eq(&b));
        assert!(!a.approx_eq(&c));
    }

    #[test]
    fn test_coordinate_serialization() {
        let coordinate = Coordinate::new(25.03, 121.56).unwrap();
        let serialized = serde_json::to_string(&coordinate).unwrap();
        assert_eq!(serialized, r#"{"lat":25.03,"lng":121.56}"#);
    }

    #[rstest]
    #[case(0.0, Verdict::Success)]
    #[case(1994.84, Verdict::Success)]
    #[case(2000.0, Verdict::Success)]
    #[case(2000.01, Verdict::Failure)]
    #[case(2223.9, Verdict::Failure)]
    #[case(f64::NAN, Verdict::Failure)]
    fn test_verdict_judge(#[case] distance: f64, #[case] expected: Verdict) {
        assert_eq!(Verdict::judge(distance, 2000.0), expected);
    }

    #[test]
    fn test_result_distance_display_rounds() {
        let result = CheckInResult::judge(1994.8449, 2000.0, Local::now());
        assert_eq!(result.verdict, Verdict::Success);
        assert_eq!(result.distance_display(), "1994.84");

        let result = CheckInResult::judge(0.0, 2000.0, Local::now());
        assert_eq!(result.distance_display(), "0.00");
    }

    #[test]
    fn test_verdict_serialization() {
        assert_eq!(
            serde_json::to_string(&Verdict::Success).unwrap(),
            "\"success\""
        );
        assert_eq!(
            serde_json::from_str::<Verdict>("\"failure\"").unwrap(),
            Verdict::Failure
        );
    }
}
