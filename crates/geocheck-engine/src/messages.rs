//! User-facing text for notices and rendered check-in lines.
//!
//! Each supported [`Locale`] has one static catalog. Fixed strings are plain
//! fields; strings that carry values (distance, timestamp, seconds) are built
//! by methods so the number formatting stays in one place.
//!
//! # Usage
//!
//! ```
//! use geocheck_engine::{Locale, Messages};
//!
//! let messages = Messages::for_locale(Locale::ZhTw);
//! assert_eq!(messages.scan_success, "QR Code 掃描成功！");
//! assert_eq!(messages.countdown_line(3), "3 秒後返回主畫面...");
//! ```

use chrono::{DateTime, Local};

use geocheck_core::{CheckInResult, Coordinate, Error, Verdict};

use crate::config::Locale;

/// Message catalog for one locale.
#[derive(Debug)]
pub struct Messages {
    /// Locale this catalog serves
    pub locale: Locale,

    /// Reference QR code decoded and accepted
    pub scan_success: &'static str,

    /// Scanned text is not a reference payload
    pub invalid_qr: &'static str,

    /// Scanned coordinates fall outside valid bounds
    pub qr_out_of_range: &'static str,

    /// Location permission refused
    pub location_denied: &'static str,

    /// Platform has no geolocation
    pub location_unsupported: &'static str,

    /// Confirmation attempted without both positions
    pub missing_position: &'static str,

    /// Action not available in the current state
    pub action_unavailable: &'static str,

    /// Login rejected
    pub login_failed: &'static str,

    /// Label for the device position line
    pub device_label: &'static str,

    /// Label for the reference position line
    pub reference_label: &'static str,

    /// Placeholder for a device position not yet acquired
    pub not_acquired: &'static str,

    /// Placeholder for a reference not yet scanned
    pub not_scanned: &'static str,

    success_template: &'static str,
    failure_template: &'static str,
    timestamp_label: &'static str,
    timestamp_format: &'static str,
    countdown_template: &'static str,
    camera_template: &'static str,
    device_template: &'static str,
    config_template: &'static str,
    stopped: &'static str,
}

static ZH_TW: Messages = Messages {
    locale: Locale::ZhTw,
    scan_success: "QR Code 掃描成功！",
    invalid_qr: "掃到無效的 QR Code！",
    qr_out_of_range: "QR Code 座標超出有效範圍！",
    location_denied: "無法取得 GPS 位置，請確認定位權限已開啟",
    location_unsupported: "您的瀏覽器不支援定位功能",
    missing_position: "請先取得 GPS 和掃描 QR Code",
    action_unavailable: "目前無法執行此操作",
    login_failed: "登入失敗，請檢查帳號密碼",
    device_label: "目前 GPS 座標：",
    reference_label: "QR Code 座標：",
    not_acquired: "尚未取得",
    not_scanned: "尚未掃描",
    success_template: "✅ 打卡成功，距離 {distance} 公尺",
    failure_template: "❌ 打卡失敗，距離 {distance} 公尺超過 {limit} 公里限制",
    timestamp_label: "打卡時間：",
    timestamp_format: "%Y/%m/%d %H:%M:%S",
    countdown_template: "{n} 秒後返回主畫面...",
    camera_template: "無法使用相機：{detail}",
    device_template: "裝置錯誤：{detail}",
    config_template: "設定錯誤：{detail}",
    stopped: "打卡服務已停止",
};

static EN: Messages = Messages {
    locale: Locale::En,
    scan_success: "QR code scanned!",
    invalid_qr: "Invalid QR code!",
    qr_out_of_range: "QR code coordinates are out of range!",
    location_denied: "Unable to get GPS position, please check location permission",
    location_unsupported: "This device does not support geolocation",
    missing_position: "Get a GPS fix and scan a QR code first",
    action_unavailable: "That action is not available right now",
    login_failed: "Login failed, please check your user ID and password",
    device_label: "Current GPS: ",
    reference_label: "QR code position: ",
    not_acquired: "not acquired",
    not_scanned: "not scanned",
    success_template: "✅ Check-in succeeded, distance {distance} m",
    failure_template: "❌ Check-in failed, distance {distance} m exceeds the {limit} km limit",
    timestamp_label: "Checked in at: ",
    timestamp_format: "%Y-%m-%d %H:%M:%S",
    countdown_template: "Returning to the main screen in {n} seconds...",
    camera_template: "Camera unavailable: {detail}",
    device_template: "Device error: {detail}",
    config_template: "Configuration error: {detail}",
    stopped: "Check-in service has stopped",
};

impl Messages {
    /// Catalog for `locale`.
    pub fn for_locale(locale: Locale) -> &'static Messages {
        match locale {
            Locale::ZhTw => &ZH_TW,
            Locale::En => &EN,
        }
    }

    /// Localized notice text for an error.
    pub fn describe_error(&self, error: &Error) -> String {
        match error {
            Error::PermissionDenied => self.location_denied.to_string(),
            Error::Unsupported => self.location_unsupported.to_string(),
            Error::MalformedPayload(_) => self.invalid_qr.to_string(),
            Error::CoordinateOutOfRange { .. } => self.qr_out_of_range.to_string(),
            Error::MissingPosition(_) => self.missing_position.to_string(),
            Error::InvalidStateTransition { .. } | Error::UnexpectedEvent { .. } => {
                self.action_unavailable.to_string()
            }
            Error::DriverStopped => self.stopped.to_string(),
            Error::ScannerUnavailable(detail) => self.camera_template.replace("{detail}", detail),
            Error::Device(detail) => self.device_template.replace("{detail}", detail),
            Error::AuthenticationFailed => self.login_failed.to_string(),
            Error::Config(detail) => self.config_template.replace("{detail}", detail),
        }
    }

    /// Outcome line with the distance rounded to two decimals.
    ///
    /// The failure line names the limit in kilometers.
    pub fn result_line(&self, result: &CheckInResult, threshold_meters: f64) -> String {
        let template = match result.verdict {
            Verdict::Success => self.success_template,
            Verdict::Failure => self.failure_template,
        };
        template
            .replace("{distance}", &result.distance_display())
            .replace("{limit}", &(threshold_meters / 1000.0).to_string())
    }

    /// Confirmation timestamp in local time.
    pub fn timestamp_line(&self, at: &DateTime<Local>) -> String {
        format!(
            "{}{}",
            self.timestamp_label,
            at.format(self.timestamp_format)
        )
    }

    /// Seconds left before returning to the main screen.
    pub fn countdown_line(&self, seconds: u32) -> String {
        self.countdown_template.replace("{n}", &seconds.to_string())
    }

    /// Device position line, with a placeholder when absent.
    pub fn device_line(&self, position: Option<&Coordinate>) -> String {
        position_line(self.device_label, position, self.not_acquired)
    }

    /// Reference position line, with a placeholder when absent.
    pub fn reference_line(&self, position: Option<&Coordinate>) -> String {
        position_line(self.reference_label, position, self.not_scanned)
    }
}

fn position_line(label: &str, position: Option<&Coordinate>, placeholder: &str) -> String {
    match position {
        Some(coordinate) => format!("{label}{coordinate}"),
        None => format!("{label}{placeholder}"),
    }
}
