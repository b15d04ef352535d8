//! Scanned payload parsing and reference position validation.
//!
//! A reference QR code carries a UTF-8 JSON object with numeric `lat` and
//! `lng` fields:
//!
//! ```text
//! {"lat": 25.03, "lng": 121.56}
//! ```
//!
//! The text comes from an untrusted decoder, so every step is checked:
//! the payload must be a JSON object, both fields must be present and
//! numeric, and (under [`RangePolicy::Enforce`]) the values must form a valid
//! [`Coordinate`]. Anything else is rejected as a whole; partial data is
//! never returned. Unknown extra fields are ignored.
//!
//! # Examples
//!
//! ```
//! use geocheck_core::{Error, parse_reference};
//!
//! let reference = parse_reference(r#"{"lat":25.03,"lng":121.56}"#).unwrap();
//! assert_eq!(reference.lat(), 25.03);
//! assert_eq!(reference.lng(), 121.56);
//!
//! assert!(matches!(parse_reference("not json"), Err(Error::MalformedPayload(_))));
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::constants::{PAYLOAD_LAT_FIELD, PAYLOAD_LNG_FIELD};
use crate::{Coordinate, Error, Result};

/// How strictly decoded coordinate values are checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RangePolicy {
    /// Reject values outside latitude [-90, 90] / longitude [-180, 180].
    #[default]
    Enforce,

    /// Accept any finite value.
    FiniteOnly,
}

/// Parse a scanned payload into a reference coordinate, enforcing the
/// coordinate range.
///
/// # Errors
///
/// - `Error::MalformedPayload` if the text is not a JSON object with numeric
///   `lat` and `lng` fields.
/// - `Error::CoordinateOutOfRange` if the values are not a valid coordinate.
pub fn parse_reference(raw: &str) -> Result<Coordinate> {
    parse_reference_with(raw, RangePolicy::Enforce)
}

/// Parse a scanned payload into a reference coordinate under `policy`.
///
/// # Errors
///
/// Same as [`parse_reference`]; under [`RangePolicy::FiniteOnly`] only
/// non-finite values produce `Error::CoordinateOutOfRange`.
pub fn parse_reference_with(raw: &str, policy: RangePolicy) -> Result<Coordinate> {
    let object: Map<String, Value> = serde_json::from_str(raw.trim())
        .map_err(|e| Error::MalformedPayload(format!("expected JSON object: {e}")))?;

    let lat = numeric_field(&object, PAYLOAD_LAT_FIELD)?;
    let lng = numeric_field(&object, PAYLOAD_LNG_FIELD)?;

    match policy {
        RangePolicy::Enforce => Coordinate::new(lat, lng),
        RangePolicy::FiniteOnly => {
            let coordinate = Coordinate::new_unchecked(lat, lng);
            if !coordinate.is_finite() {
                return Err(Error::CoordinateOutOfRange { lat, lng });
            }
            Ok(coordinate)
        }
    }
}

fn numeric_field(object: &Map<String, Value>, name: &str) -> Result<f64> {
    match object.get(name) {
        Some(Value::Number(number)) => number
            .as_f64()
            .ok_or_else(|| Error::MalformedPayload(format!("field `{name}` is not a number"))),
        Some(other) => Err(Error::MalformedPayload(format!(
            "field `{name}` must be numeric, got {}",
            json_kind(other)
        ))),
        None => Err(Error::MalformedPayload(format!(
            "missing required field `{name}`"
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
