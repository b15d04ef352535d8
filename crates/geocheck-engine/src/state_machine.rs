//! Check-in state machine implementation.
//!
//! This module provides the validated state graph behind a check-in attempt,
//! from waiting on the first device position through scanning, confirmation,
//! result display, and the automatic return to the scan-ready screen.
//!
//! # States
//!
//! - `AwaitingDevicePosition`: Admitted, first position fix outstanding
//! - `ScanReady`: Device position known, waiting for the user to scan
//! - `Scanning`: Camera held, waiting for a decodable reference QR code
//! - `ReferenceAcquired`: Reference position decoded, waiting for confirmation
//! - `ResultDisplayed`: Outcome shown while the reset countdown runs
//!
//! # Valid Transitions
//!
//! - AwaitingDevicePosition → ScanReady
//! - ScanReady → Scanning → ReferenceAcquired → ResultDisplayed → ScanReady
//! - Scanning → ScanReady (cancel)
//! - ReferenceAcquired → Scanning (rescan)
//!
//! There is no terminal state; the machine cycles indefinitely.
//!
//! # Examples
//!
//! ```
//! use geocheck_core::Verdict;
//! use geocheck_engine::{CheckInState, StateMachine};
//!
//! let mut machine = StateMachine::new();
//! assert_eq!(machine.current_state(), &CheckInState::AwaitingDevicePosition);
//!
//! machine.transition_to(CheckInState::ScanReady).unwrap();
//! machine.transition_to(CheckInState::Scanning).unwrap();
//!
//! // A result can only follow an acquired reference
//! let success = CheckInState::ResultDisplayed(Verdict::Success);
//! assert!(machine.transition_to(success).is_err());
//!
//! machine.transition_to(CheckInState::ReferenceAcquired).unwrap();
//! assert!(machine.transition_to(success).is_ok());
//! ```

use std::collections::VecDeque;
use std::fmt;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use geocheck_core::{Error, Result, Verdict};

/// Maximum number of state transitions to keep in history.
///
/// A full check-in cycle is five transitions, so this covers the last
/// twenty attempts.
const MAX_HISTORY_SIZE: usize = 100;

/// Represents all possible states of a check-in attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckInState {
    /// Session admitted, waiting for the first device position.
    AwaitingDevicePosition,

    /// Ready to start scanning a reference QR code.
    ScanReady,

    /// Camera streaming, waiting for a decodable payload.
    Scanning,

    /// Reference position decoded, waiting for the user to confirm.
    ReferenceAcquired,

    /// Outcome displayed while the auto-reset countdown runs.
    ResultDisplayed(Verdict),
}

impl fmt::Display for CheckInState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckInState::AwaitingDevicePosition => write!(f, "AwaitingDevicePosition"),
            CheckInState::ScanReady => write!(f, "ScanReady"),
            CheckInState::Scanning => write!(f, "Scanning"),
            CheckInState::ReferenceAcquired => write!(f, "ReferenceAcquired"),
            CheckInState::ResultDisplayed(verdict) => write!(f, "ResultDisplayed({verdict})"),
        }
    }
}

impl CheckInState {
    /// Check if transition to target state is valid from this state.
    ///
    /// Invalid transitions are rejected by [`StateMachine::transition_to`].
    ///
    /// # Examples
    ///
    /// ```
    /// use geocheck_core::Verdict;
    /// use geocheck_engine::CheckInState;
    ///
    /// assert!(CheckInState::ScanReady.can_transition_to(&CheckInState::Scanning));
    /// assert!(CheckInState::ReferenceAcquired
    ///     .can_transition_to(&CheckInState::ResultDisplayed(Verdict::Failure)));
    /// assert!(!CheckInState::ScanReady
    ///     .can_transition_to(&CheckInState::ResultDisplayed(Verdict::Success)));
    /// ```
    pub fn can_transition_to(&self, target: &CheckInState) -> bool {
        matches!(
            (self, target),
            // From AwaitingDevicePosition
            (CheckInState::AwaitingDevicePosition, CheckInState::ScanReady)
            // From ScanReady
            | (CheckInState::ScanReady, CheckInState::Scanning)
            // From Scanning
            | (CheckInState::Scanning, CheckInState::ReferenceAcquired | CheckInState::ScanReady)
            // From ReferenceAcquired
            | (CheckInState::ReferenceAcquired, CheckInState::Scanning | CheckInState::ResultDisplayed(_))
            // From ResultDisplayed
            | (CheckInState::ResultDisplayed(_), CheckInState::ScanReady)
        )
    }

    /// Returns `true` while the camera must be held.
    #[inline]
    pub fn is_scanning(&self) -> bool {
        matches!(self, CheckInState::Scanning)
    }

    /// Outcome shown in this state, if any.
    pub fn verdict(&self) -> Option<Verdict> {
        match self {
            CheckInState::ResultDisplayed(verdict) => Some(*verdict),
            _ => None,
        }
    }
}

/// Represents a single state transition with timestamp.
///
/// # Serialization Note
///
/// The `timestamp` field is not serialized as `Instant` is process-specific.
/// When deserializing, the timestamp will be set to the current time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateTransition {
    /// The state transitioned from.
    pub from: CheckInState,

    /// The state transitioned to.
    pub to: CheckInState,

    /// When the transition occurred.
    #[serde(skip, default = "Instant::now")]
    pub timestamp: Instant,
}

impl StateTransition {
    /// Create a new state transition record stamped with the current time.
    pub fn new(from: CheckInState, to: CheckInState) -> Self {
        Self {
            from,
            to,
            timestamp: Instant::now(),
        }
    }

    /// Get the duration since this transition occurred.
    pub fn elapsed(&self) -> Duration {
        self.timestamp.elapsed()
    }
}

/// Validated state graph with a bounded transition history.
///
/// This struct only knows which moves are legal. The data that travels with
/// a check-in attempt lives in [`CheckInMachine`](crate::CheckInMachine).
///
/// # Thread Safety
///
/// This struct is not thread-safe by design. The async driver owns it on a
/// single task.
#[derive(Debug)]
pub struct StateMachine {
    /// Current state of the attempt.
    current_state: CheckInState,

    /// When the current state was entered.
    state_entered_at: Instant,

    /// History of state transitions (limited to MAX_HISTORY_SIZE).
    history: VecDeque<StateTransition>,
}

impl StateMachine {
    /// Create a new state machine in the `AwaitingDevicePosition` state.
    pub fn new() -> Self {
        Self {
            current_state: CheckInState::AwaitingDevicePosition,
            state_entered_at: Instant::now(),
            history: VecDeque::with_capacity(MAX_HISTORY_SIZE),
        }
    }

    /// Get the current state of the machine.
    pub fn current_state(&self) -> &CheckInState {
        &self.current_state
    }

    /// Get the time elapsed in the current state.
    pub fn time_in_current_state(&self) -> Duration {
        self.state_entered_at.elapsed()
    }

    /// Get a reference to the state transition history, oldest first.
    pub fn history(&self) -> &VecDeque<StateTransition> {
        &self.history
    }

    /// Get the last `count` state transitions, oldest first.
    pub fn last_transitions(&self, count: usize) -> Vec<StateTransition> {
        self.history
            .iter()
            .rev()
            .take(count)
            .rev()
            .cloned()
            .collect()
    }

    /// Transition to a new state, validating the transition.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidStateTransition` if the requested transition
    /// is not valid for the current state. The machine is left unchanged.
    ///
    /// # Examples
    ///
    /// ```
    /// use geocheck_engine::{CheckInState, StateMachine};
    ///
    /// let mut machine = StateMachine::new();
    ///
    /// let transition = machine.transition_to(CheckInState::ScanReady).unwrap();
    /// assert_eq!(transition.from, CheckInState::AwaitingDevicePosition);
    /// assert_eq!(transition.to, CheckInState::ScanReady);
    ///
    /// assert!(machine.transition_to(CheckInState::ReferenceAcquired).is_err());
    /// ```
    pub fn transition_to(&mut self, new_state: CheckInState) -> Result<StateTransition> {
        if !self.current_state.can_transition_to(&new_state) {
            return Err(Error::InvalidStateTransition {
                from: self.current_state.to_string(),
                to: new_state.to_string(),
            });
        }

        let transition = StateTransition::new(self.current_state, new_state);
        self.perform_state_change(new_state, transition.clone());

        Ok(transition)
    }

    /// Force the machine back to `ScanReady` regardless of current state.
    ///
    /// Used for recovery; the normal path back is the countdown.
    pub fn reset(&mut self) -> StateTransition {
        let transition = StateTransition::new(self.current_state, CheckInState::ScanReady);
        self.perform_state_change(CheckInState::ScanReady, transition.clone());
        transition
    }

    fn perform_state_change(&mut self, new_state: CheckInState, transition: StateTransition) {
        self.current_state = new_state;
        self.state_entered_at = Instant::now();

        self.history.push_back(transition);
        if self.history.len() > MAX_HISTORY_SIZE {
            self.history.pop_front();
        }
    }
}

impl Default for StateMachine {
    fn default() -> Self {
        Self::new()
    }
}
