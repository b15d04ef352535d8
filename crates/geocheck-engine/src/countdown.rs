//! Auto-reset countdown.
//!
//! The countdown is a plain value: whoever owns it calls [`Countdown::tick`]
//! once per elapsed second and reacts to [`CountdownStatus::Elapsed`]. It
//! never schedules itself, so dropping it is all the cancellation needed.

use serde::Serialize;

/// Result of advancing a countdown by one second.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownStatus {
    /// Seconds still remaining after this tick.
    Running(u32),

    /// The countdown reached zero on this tick.
    Elapsed,
}

/// Whole seconds remaining before an automatic reset.
///
/// # Examples
///
/// ```
/// use geocheck_engine::{Countdown, CountdownStatus};
///
/// let mut countdown = Countdown::start(2);
/// assert_eq!(countdown.remaining(), 2);
/// assert_eq!(countdown.tick(), CountdownStatus::Running(1));
/// assert_eq!(countdown.tick(), CountdownStatus::Elapsed);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Countdown {
    remaining: u32,
}

impl Countdown {
    /// Start a countdown at `secs` seconds.
    pub fn start(secs: u32) -> Self {
        Self { remaining: secs }
    }

    /// Seconds remaining.
    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Returns `true` once the countdown has reached zero.
    pub fn is_elapsed(&self) -> bool {
        self.remaining == 0
    }

    /// Advance by one second.
    ///
    /// Ticking an elapsed countdown keeps reporting `Elapsed`.
    pub fn tick(&mut self) -> CountdownStatus {
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            CountdownStatus::Elapsed
        } else {
            CountdownStatus::Running(self.remaining)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_countdown_runs_to_zero() {
        let mut countdown = Countdown::start(5);

        let statuses: Vec<_> = (0..5).map(|_| countdown.tick()).collect();
        assert_eq!(
            statuses,
            vec![
                CountdownStatus::Running(4),
                CountdownStatus::Running(3),
                CountdownStatus::Running(2),
                CountdownStatus::Running(1),
                CountdownStatus::Elapsed,
            ]
        );
        assert!(countdown.is_elapsed());
    }

    #[test]
    fn test_countdown_saturates() {
        let mut countdown = Countdown::start(0);
        assert!(countdown.is_elapsed());
        assert_eq!(countdown.tick(), CountdownStatus::Elapsed);
        assert_eq!(countdown.remaining(), 0);
    }
}
