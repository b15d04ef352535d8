//! Check-in machine: the per-attempt data plus the transition function.
//!
//! [`CheckInMachine::handle_event`] is synchronous and performs no I/O. Every
//! side effect it wants (ask for a position, open or release the camera,
//! schedule the next countdown tick, tell the user something) comes back as
//! an [`Effect`] for the caller to execute.
//!
//! Camera effects are derived from the state before and after each event, so
//! every path out of `Scanning` releases the camera, including error paths
//! and forced resets.
//!
//! # Examples
//!
//! ```
//! use chrono::Local;
//! use geocheck_core::{Coordinate, Verdict};
//! use geocheck_engine::session::{StaticCredentials, admit};
//! use geocheck_engine::{CheckInConfig, CheckInEvent, CheckInMachine, CheckInState, Effect};
//!
//! let gate = StaticCredentials::new("kiosk", "secret");
//! let admission = admit(&gate, "kiosk", "secret").unwrap();
//! let mut machine = CheckInMachine::new(admission, CheckInConfig::default()).unwrap();
//!
//! let reaction = machine.handle_event(CheckInEvent::RequestPosition);
//! let Some(Effect::RequestPosition { generation }) = reaction.effects.first().cloned() else {
//!     panic!("expected a position request");
//! };
//!
//! let here = Coordinate::new(25.0330, 121.5654).unwrap();
//! machine.handle_event(CheckInEvent::PositionAcquired { generation, coordinate: here });
//! machine.handle_event(CheckInEvent::StartScan);
//! machine.handle_event(CheckInEvent::ScanDecoded(here.to_payload()));
//!
//! let reaction = machine.handle_event(CheckInEvent::Confirm { at: Local::now() });
//! assert_eq!(reaction.state, CheckInState::ResultDisplayed(Verdict::Success));
//! ```

use std::fmt;

use chrono::{DateTime, Local};
use serde::Serialize;
use tracing::{debug, info, warn};

use geocheck_core::{
    CheckInResult, Coordinate, Error, Result, haversine_meters, parse_reference_with,
};

use crate::config::CheckInConfig;
use crate::countdown::{Countdown, CountdownStatus};
use crate::messages::Messages;
use crate::session::Admission;
use crate::state_machine::{CheckInState, StateMachine, StateTransition};
use crate::view::CheckInSnapshot;

/// Tag carried by each position request.
///
/// Only completions carrying the machine's current generation are applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
pub struct Generation(u64);

impl Generation {
    /// Raw counter value.
    pub fn value(self) -> u64 {
        self.0
    }

    fn next(self) -> Self {
        Generation(self.0.wrapping_add(1))
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Inputs to the check-in machine.
#[derive(Debug, Clone, PartialEq)]
pub enum CheckInEvent {
    /// Ask for a device position (on admission, or a user retry).
    RequestPosition,

    /// A position request completed.
    PositionAcquired {
        generation: Generation,
        coordinate: Coordinate,
    },

    /// A position request failed.
    PositionFailed { generation: Generation, error: Error },

    /// User opened the scanner.
    StartScan,

    /// User closed the scanner without a result.
    CancelScan,

    /// Decoder produced text.
    ScanDecoded(String),

    /// Decoder or camera reported a problem.
    ScannerFault(String),

    /// User confirmed the check-in.
    Confirm { at: DateTime<Local> },

    /// One second of the result countdown elapsed.
    Tick,
}

impl CheckInEvent {
    /// Event name for logs and errors.
    pub fn name(&self) -> &'static str {
        match self {
            CheckInEvent::RequestPosition => "RequestPosition",
            CheckInEvent::PositionAcquired { .. } => "PositionAcquired",
            CheckInEvent::PositionFailed { .. } => "PositionFailed",
            CheckInEvent::StartScan => "StartScan",
            CheckInEvent::CancelScan => "CancelScan",
            CheckInEvent::ScanDecoded(_) => "ScanDecoded",
            CheckInEvent::ScannerFault(_) => "ScannerFault",
            CheckInEvent::Confirm { .. } => "Confirm",
            CheckInEvent::Tick => "Tick",
        }
    }
}

/// Severity of a user-facing notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Success,
    Error,
}

/// Transient message for the user (toast).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

impl Notice {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            text: text.into(),
        }
    }
}

/// Side effect requested by the machine.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Start a one-shot position request tagged with `generation`.
    RequestPosition { generation: Generation },

    /// Acquire the camera and start decoding.
    StartScanner,

    /// Release the camera.
    StopScanner,

    /// Deliver `Tick` after one second.
    ScheduleTick,

    /// Show a notice.
    Notify(Notice),
}

/// Outcome of handling one event.
#[derive(Debug, Clone, PartialEq)]
pub struct Reaction {
    /// State after the event.
    pub state: CheckInState,

    /// Effects to execute, in order.
    pub effects: Vec<Effect>,
}

impl Reaction {
    /// Notices among the effects.
    pub fn notices(&self) -> impl Iterator<Item = &Notice> {
        self.effects.iter().filter_map(|effect| match effect {
            Effect::Notify(notice) => Some(notice),
            _ => None,
        })
    }

    /// Returns `true` if an error notice was produced.
    pub fn is_error(&self) -> bool {
        self.notices().any(|n| n.level == NoticeLevel::Error)
    }
}

/// All state for one admitted user's check-in attempts.
#[derive(Debug)]
pub struct CheckInMachine {
    fsm: StateMachine,
    config: CheckInConfig,
    messages: &'static Messages,
    admission: Admission,
    device_position: Option<Coordinate>,
    reference_position: Option<Coordinate>,
    result: Option<CheckInResult>,
    countdown: Option<Countdown>,
    generation: Generation,
    scanner_fault: Option<String>,
}

impl CheckInMachine {
    /// Create a machine for an admitted user, in `AwaitingDevicePosition`.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if `config` fails validation.
    pub fn new(admission: Admission, config: CheckInConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            fsm: StateMachine::new(),
            messages: Messages::for_locale(config.locale),
            config,
            admission,
            device_position: None,
            reference_position: None,
            result: None,
            countdown: None,
            generation: Generation::default(),
            scanner_fault: None,
        })
    }

    /// Current state.
    pub fn state(&self) -> CheckInState {
        *self.fsm.current_state()
    }

    pub fn config(&self) -> &CheckInConfig {
        &self.config
    }

    pub fn messages(&self) -> &'static Messages {
        self.messages
    }

    pub fn admission(&self) -> &Admission {
        &self.admission
    }

    pub fn device_position(&self) -> Option<Coordinate> {
        self.device_position
    }

    pub fn reference_position(&self) -> Option<Coordinate> {
        self.reference_position
    }

    pub fn result(&self) -> Option<&CheckInResult> {
        self.result.as_ref()
    }

    /// Seconds left before the automatic reset, while a result is shown.
    pub fn countdown(&self) -> Option<u32> {
        self.countdown.map(|c| c.remaining())
    }

    /// Generation of the most recent position request.
    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn scanner_fault(&self) -> Option<&str> {
        self.scanner_fault.as_deref()
    }

    /// Recent state transitions, oldest first.
    pub fn last_transitions(&self, count: usize) -> Vec<StateTransition> {
        self.fsm.last_transitions(count)
    }

    /// Read-only view for presentation.
    pub fn snapshot(&self) -> CheckInSnapshot {
        CheckInSnapshot {
            state: self.state(),
            user_id: self.admission.user_id().to_string(),
            device_position: self.device_position,
            reference_position: self.reference_position,
            result: self.result.clone(),
            countdown: self.countdown(),
            scanner_fault: self.scanner_fault.clone(),
            threshold_meters: self.config.threshold_meters,
        }
    }

    /// Apply one event and return the resulting state and effects.
    ///
    /// Errors never escape: they become an error notice and leave the state
    /// where it was.
    pub fn handle_event(&mut self, event: CheckInEvent) -> Reaction {
        let name = event.name();
        self.react(name, |machine, effects| machine.apply(event, effects))
    }

    /// Force a full reset to `ScanReady` from any state.
    ///
    /// Clears positions, result and countdown, and invalidates outstanding
    /// position requests.
    pub(crate) fn reset(&mut self) -> Reaction {
        self.react("Reset", |machine, _| {
            let transition = machine.fsm.reset();
            debug!(from = %transition.from, "check-in machine reset");
            machine.clear_cycle();
            Ok(())
        })
    }

    fn react<F>(&mut self, event: &'static str, apply: F) -> Reaction
    where
        F: FnOnce(&mut Self, &mut Vec<Effect>) -> Result<()>,
    {
        let before = self.state();
        let mut produced = Vec::new();
        let outcome = apply(self, &mut produced);
        let after = self.state();

        let mut effects = Vec::with_capacity(produced.len() + 2);
        if before.is_scanning() && !after.is_scanning() {
            effects.push(Effect::StopScanner);
        }
        if !before.is_scanning() && after.is_scanning() {
            effects.push(Effect::StartScanner);
        }
        effects.extend(produced);

        if before != after {
            debug!(event, from = %before, to = %after, "check-in state changed");
        }

        if let Err(error) = outcome {
            warn!(event, state = %after, %error, "check-in event refused");
            effects.push(Effect::Notify(Notice::error(
                self.messages.describe_error(&error),
            )));
        }

        Reaction {
            state: after,
            effects,
        }
    }

    fn apply(&mut self, event: CheckInEvent, effects: &mut Vec<Effect>) -> Result<()> {
        match event {
            CheckInEvent::RequestPosition => {
                if self.state() != CheckInState::AwaitingDevicePosition {
                    return Err(self.unexpected("RequestPosition"));
                }
                self.request_position(effects);
                Ok(())
            }
            CheckInEvent::PositionAcquired {
                generation,
                coordinate,
            } => {
                if self.is_stale(generation, "PositionAcquired") {
                    return Ok(());
                }
                debug!(%generation, position = %coordinate, "device position acquired");
                self.device_position = Some(coordinate);
                if self.state() == CheckInState::AwaitingDevicePosition {
                    self.fsm.transition_to(CheckInState::ScanReady)?;
                }
                Ok(())
            }
            CheckInEvent::PositionFailed { generation, error } => {
                if self.is_stale(generation, "PositionFailed") {
                    return Ok(());
                }
                Err(error)
            }
            CheckInEvent::StartScan => {
                self.fsm.transition_to(CheckInState::Scanning)?;
                self.reference_position = None;
                self.scanner_fault = None;
                // Re-acquire on every scan so the fix is fresh at confirmation.
                self.request_position(effects);
                Ok(())
            }
            CheckInEvent::CancelScan => {
                // ResultDisplayed -> ScanReady belongs to the countdown alone.
                if !self.state().is_scanning() {
                    return Err(self.unexpected("CancelScan"));
                }
                self.fsm.transition_to(CheckInState::ScanReady)?;
                self.scanner_fault = None;
                Ok(())
            }
            CheckInEvent::ScanDecoded(raw) => self.apply_scan(&raw, effects),
            CheckInEvent::ScannerFault(message) => {
                if !self.state().is_scanning() {
                    debug!(%message, "scanner fault outside scanning ignored");
                    return Ok(());
                }
                self.scanner_fault = Some(message.clone());
                Err(Error::ScannerUnavailable(message))
            }
            CheckInEvent::Confirm { at } => self.apply_confirm(at, effects),
            CheckInEvent::Tick => {
                let Some(countdown) = self.countdown.as_mut() else {
                    debug!("tick without a running countdown ignored");
                    return Ok(());
                };
                match countdown.tick() {
                    CountdownStatus::Running(remaining) => {
                        debug!(remaining, "reset countdown");
                        effects.push(Effect::ScheduleTick);
                    }
                    CountdownStatus::Elapsed => {
                        self.fsm.transition_to(CheckInState::ScanReady)?;
                        self.clear_cycle();
                        info!(user_id = self.admission.user_id(), "check-in cycle reset");
                    }
                }
                Ok(())
            }
        }
    }

    fn apply_scan(&mut self, raw: &str, effects: &mut Vec<Effect>) -> Result<()> {
        match self.state() {
            CheckInState::Scanning => {
                let reference = parse_reference_with(raw, self.config.range_policy())?;
                self.reference_position = Some(reference);
                self.scanner_fault = None;
                self.fsm.transition_to(CheckInState::ReferenceAcquired)?;
                debug!(reference = %reference, "reference position decoded");
                effects.push(Effect::Notify(Notice::success(self.messages.scan_success)));
                Ok(())
            }
            CheckInState::ReferenceAcquired => {
                // A decode that was already in flight when scanning stopped.
                match parse_reference_with(raw, self.config.range_policy()) {
                    Ok(reference) => {
                        debug!(reference = %reference, "late scan replaced reference position");
                        self.reference_position = Some(reference);
                    }
                    Err(e) => debug!(error = %e, "late unusable scan ignored"),
                }
                Ok(())
            }
            state => {
                debug!(%state, "scan outside scanning ignored");
                Ok(())
            }
        }
    }

    fn apply_confirm(&mut self, at: DateTime<Local>, effects: &mut Vec<Effect>) -> Result<()> {
        if self.state() != CheckInState::ReferenceAcquired {
            return Err(self.unexpected("Confirm"));
        }
        let device = self.device_position.ok_or(Error::MissingPosition("device"))?;
        let reference = self
            .reference_position
            .ok_or(Error::MissingPosition("reference"))?;

        let distance = haversine_meters(device, reference);
        let result = CheckInResult::judge(distance, self.config.threshold_meters, at);
        self.fsm
            .transition_to(CheckInState::ResultDisplayed(result.verdict))?;

        info!(
            user_id = self.admission.user_id(),
            verdict = %result.verdict,
            distance_meters = distance,
            threshold_meters = self.config.threshold_meters,
            "check-in confirmed"
        );

        let text = self
            .messages
            .result_line(&result, self.config.threshold_meters);
        effects.push(Effect::Notify(if result.verdict.is_success() {
            Notice::success(text)
        } else {
            Notice::error(text)
        }));

        self.result = Some(result);
        self.countdown = Some(Countdown::start(self.config.countdown_secs));
        // The shown result is tied to the positions it was computed from.
        self.generation = self.generation.next();
        effects.push(Effect::ScheduleTick);
        Ok(())
    }

    fn request_position(&mut self, effects: &mut Vec<Effect>) {
        self.generation = self.generation.next();
        debug!(generation = %self.generation, "device position requested");
        effects.push(Effect::RequestPosition {
            generation: self.generation,
        });
    }

    fn is_stale(&self, generation: Generation, event: &'static str) -> bool {
        if generation == self.generation {
            return false;
        }
        warn!(
            event,
            %generation,
            current = %self.generation,
            "stale position completion discarded"
        );
        true
    }

    fn unexpected(&self, event: &str) -> Error {
        Error::UnexpectedEvent {
            event: event.to_string(),
            state: self.state().to_string(),
        }
    }

    fn clear_cycle(&mut self) {
        self.device_position = None;
        self.reference_position = None;
        self.result = None;
        self.countdown = None;
        self.scanner_fault = None;
        // Anything still in flight belongs to the finished cycle.
        self.generation = self.generation.next();
    }
}
