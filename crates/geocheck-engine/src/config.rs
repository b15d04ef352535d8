//! Check-in configuration.

use std::fmt;

use serde::{Deserialize, Serialize};

use geocheck_core::constants::{DEFAULT_RESET_COUNTDOWN_SECS, DEFAULT_THRESHOLD_METERS};
use geocheck_core::{Error, RangePolicy, Result};

/// Language used for notices and rendered lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Locale {
    /// Traditional Chinese (Taiwan).
    #[default]
    #[serde(rename = "zh-TW")]
    ZhTw,

    /// English.
    #[serde(rename = "en")]
    En,
}

impl Locale {
    /// BCP 47 tag.
    pub fn code(&self) -> &'static str {
        match self {
            Locale::ZhTw => "zh-TW",
            Locale::En => "en",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Tunables for a check-in machine.
///
/// # Example
///
/// ```
/// use geocheck_engine::{CheckInConfig, Locale};
///
/// let config = CheckInConfig::default()
///     .threshold_meters(500.0)
///     .locale(Locale::En);
///
/// assert!(config.validate().is_ok());
/// assert_eq!(config.countdown_secs, 5);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckInConfig {
    /// Maximum device-to-reference distance for a successful check-in
    pub threshold_meters: f64,

    /// Seconds the result stays on screen before the automatic reset
    pub countdown_secs: u32,

    /// Reject scanned coordinates outside latitude/longitude bounds
    pub enforce_coordinate_range: bool,

    /// Language for user-facing text
    pub locale: Locale,
}

impl Default for CheckInConfig {
    fn default() -> Self {
        Self {
            threshold_meters: DEFAULT_THRESHOLD_METERS,
            countdown_secs: DEFAULT_RESET_COUNTDOWN_SECS,
            enforce_coordinate_range: true,
            locale: Locale::default(),
        }
    }
}

impl CheckInConfig {
    /// Parse and validate a JSON configuration. Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the JSON is invalid or a value fails validation.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Set the success threshold in meters
    pub fn threshold_meters(mut self, meters: f64) -> Self {
        self.threshold_meters = meters;
        self
    }

    /// Set the result display countdown in seconds
    pub fn countdown_secs(mut self, secs: u32) -> Self {
        self.countdown_secs = secs;
        self
    }

    /// Set whether scanned coordinates must be inside valid bounds
    pub fn enforce_coordinate_range(mut self, enforce: bool) -> Self {
        self.enforce_coordinate_range = enforce;
        self
    }

    /// Set the locale for user-facing text
    pub fn locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    /// Payload validation policy implied by this configuration.
    pub fn range_policy(&self) -> RangePolicy {
        if self.enforce_coordinate_range {
            RangePolicy::Enforce
        } else {
            RangePolicy::FiniteOnly
        }
    }

    /// Check that every value is usable.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the threshold is not a positive finite
    /// number or the countdown is zero.
    pub fn validate(&self) -> Result<()> {
        if !self.threshold_meters.is_finite() || self.threshold_meters <= 0.0 {
            return Err(Error::Config(format!(
                "threshold_meters must be a positive number, got {}",
                self.threshold_meters
            )));
        }
        if self.countdown_secs == 0 {
            return Err(Error::Config(
                "countdown_secs must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_default_config() {
        let config = CheckInConfig::default();
        assert_eq!(config.threshold_meters, 2000.0);
        assert_eq!(config.countdown_secs, 5);
        assert!(config.enforce_coordinate_range);
        assert_eq!(config.locale, Locale::ZhTw);
        assert_eq!(config.range_policy(), RangePolicy::Enforce);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_setters() {
        let config = CheckInConfig::default()
            .threshold_meters(150.0)
            .countdown_secs(10)
            .enforce_coordinate_range(false)
            .locale(Locale::En);

        assert_eq!(config.threshold_meters, 150.0);
        assert_eq!(config.countdown_secs, 10);
        assert_eq!(config.range_policy(), RangePolicy::FiniteOnly);
        assert_eq!(config.locale, Locale::En);
    }

    #[test]
    fn test_from_json_partial() {
        let config = CheckInConfig::from_json(r#"{"threshold_meters": 800, "locale": "en"}"#)
            .unwrap();
        assert_eq!(config.threshold_meters, 800.0);
        assert_eq!(config.countdown_secs, 5);
        assert_eq!(config.locale, Locale::En);
    }

    #[rstest]
    #[case(r#"{"threshold_meters": 0}"#)]
    #[case(r#"{"threshold_meters": -5}"#)]
    #[case(r#"{"countdown_secs": 0}"#)]
    #[case(r#"{"locale": "fr"}"#)]
    #[case("not json")]
    fn test_from_json_rejects(#[case] json: &str) {
        assert!(matches!(
            CheckInConfig::from_json(json),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_validate_rejects_nan_threshold() {
        let config = CheckInConfig::default().threshold_meters(f64::NAN);
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_serialize_locale_code() {
        let json = serde_json::to_value(CheckInConfig::default()).unwrap();
        assert_eq!(json["locale"], "zh-TW");
        assert_eq!(Locale::En.to_string(), "en");
    }
}
