//! Read-only presentation view of a check-in machine.

use serde::Serialize;

use geocheck_core::{CheckInResult, Coordinate};

use crate::messages::Messages;
use crate::state_machine::CheckInState;

/// Everything a screen needs to render the current check-in attempt.
///
/// Snapshots are plain values; holding one never blocks the machine.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckInSnapshot {
    /// Current state.
    pub state: CheckInState,

    /// Admitted user.
    pub user_id: String,

    /// Latest device position for this cycle.
    pub device_position: Option<Coordinate>,

    /// Decoded reference position for this cycle.
    pub reference_position: Option<Coordinate>,

    /// Outcome, while it is displayed.
    pub result: Option<CheckInResult>,

    /// Seconds before the automatic reset.
    pub countdown: Option<u32>,

    /// Camera problem reported during the current scan.
    pub scanner_fault: Option<String>,

    /// Distance limit used for the verdict.
    pub threshold_meters: f64,
}

impl CheckInSnapshot {
    /// The scan button is offered.
    pub fn can_start_scan(&self) -> bool {
        matches!(
            self.state,
            CheckInState::ScanReady | CheckInState::ReferenceAcquired
        )
    }

    /// The confirm button is offered.
    pub fn can_confirm(&self) -> bool {
        self.state == CheckInState::ReferenceAcquired
            && self.device_position.is_some()
            && self.reference_position.is_some()
    }

    /// Camera view is shown, or its unavailable placeholder.
    pub fn is_scanning(&self) -> bool {
        self.state.is_scanning()
    }

    /// Status lines in display order.
    ///
    /// # Examples
    ///
    /// ```
    /// use geocheck_engine::{CheckInSnapshot, CheckInState, Locale, Messages};
    ///
    /// let snapshot = CheckInSnapshot {
    ///     state: CheckInState::ScanReady,
    ///     user_id: "kiosk".to_string(),
    ///     device_position: None,
    ///     reference_position: None,
    ///     result: None,
    ///     countdown: None,
    ///     scanner_fault: None,
    ///     threshold_meters: 2000.0,
    /// };
    ///
    /// let lines = snapshot.render_lines(Messages::for_locale(Locale::En));
    /// assert_eq!(lines, vec!["Current GPS: not acquired", "QR code position: not scanned"]);
    /// ```
    pub fn render_lines(&self, messages: &Messages) -> Vec<String> {
        let mut lines = vec![
            messages.device_line(self.device_position.as_ref()),
            messages.reference_line(self.reference_position.as_ref()),
        ];

        if let Some(fault) = &self.scanner_fault {
            lines.push(messages.describe_error(&geocheck_core::Error::ScannerUnavailable(
                fault.clone(),
            )));
        }

        if let Some(result) = &self.result {
            lines.push(messages.result_line(result, self.threshold_meters));
            lines.push(messages.timestamp_line(&result.checked_in_at));
            if let Some(seconds) = self.countdown {
                lines.push(messages.countdown_line(seconds));
            }
        }

        lines
    }
}
