//! Async driver that connects a [`CheckInMachine`] to real devices.
//!
//! The driver owns the machine, the location provider and the scanner on a
//! single task. It feeds the machine events from four sources (user
//! intents, completed position requests, scanner output, countdown ticks),
//! executes the returned effects in order, and publishes a fresh
//! [`CheckInSnapshot`] after every event.
//!
//! Position requests run concurrently in a `FuturesUnordered`, each tagged
//! with the generation it was issued for, so a slow fix never blocks scan
//! events and a stale one is recognized when it finally lands.
//!
//! # Examples
//!
//! ```no_run
//! use geocheck_engine::driver::CheckInDriver;
//! use geocheck_engine::session::{StaticCredentials, admit};
//! use geocheck_engine::{CheckInConfig, CheckInMachine};
//! use geocheck_hardware::mock::{MockLocation, MockQrScanner};
//!
//! #[tokio::main]
//! async fn main() -> geocheck_core::Result<()> {
//!     let gate = StaticCredentials::new("kiosk", "secret");
//!     let machine = CheckInMachine::new(admit(&gate, "kiosk", "secret")?, CheckInConfig::default())?;
//!
//!     let (location, _gps) = MockLocation::new();
//!     let (scanner, _camera) = MockQrScanner::new();
//!     let (driver, handle) = CheckInDriver::new(machine, location, scanner);
//!
//!     let ui = async move {
//!         handle.start_scan().await?;
//!         handle.confirm().await
//!     };
//!     let (_, ui_result) = tokio::join!(driver.run(), ui);
//!     ui_result
//! }
//! ```

use std::collections::VecDeque;
use std::time::Duration;

use chrono::Local;
use futures::stream::{FuturesUnordered, StreamExt};
use tokio::sync::{broadcast, mpsc, watch};
use tokio::time::{Instant, sleep_until};
use tracing::{debug, info, warn};

use geocheck_core::{Error, Result};
use geocheck_hardware::{DeviceError, LocationProvider, QrScanner, ScanEvent};

use crate::machine::{CheckInEvent, CheckInMachine, Effect, Generation, Notice};
use crate::view::CheckInSnapshot;

/// Interval between countdown ticks.
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

const INTENT_CHANNEL_CAPACITY: usize = 16;
const NOTICE_CHANNEL_CAPACITY: usize = 32;

/// Button presses forwarded from the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserIntent {
    /// Ask for the device position again after a failure.
    RetryPosition,
    StartScan,
    CancelScan,
    /// Confirm the check-in; stamped with local time when handled.
    Confirm,
}

impl UserIntent {
    fn into_event(self) -> CheckInEvent {
        match self {
            UserIntent::RetryPosition => CheckInEvent::RequestPosition,
            UserIntent::StartScan => CheckInEvent::StartScan,
            UserIntent::CancelScan => CheckInEvent::CancelScan,
            UserIntent::Confirm => CheckInEvent::Confirm { at: Local::now() },
        }
    }
}

/// Presentation-side handle to a running driver.
///
/// The driver stops once every clone of the handle has been dropped.
#[derive(Debug, Clone)]
pub struct DriverHandle {
    intents: mpsc::Sender<UserIntent>,
    snapshots: watch::Receiver<CheckInSnapshot>,
    notices: broadcast::Sender<Notice>,
}

impl DriverHandle {
    /// Forward a user intent.
    ///
    /// # Errors
    ///
    /// Returns `Error::DriverStopped` if the driver is no longer running.
    pub async fn send(&self, intent: UserIntent) -> Result<()> {
        self.intents
            .send(intent)
            .await
            .map_err(|_| Error::DriverStopped)
    }

    pub async fn retry_position(&self) -> Result<()> {
        self.send(UserIntent::RetryPosition).await
    }

    pub async fn start_scan(&self) -> Result<()> {
        self.send(UserIntent::StartScan).await
    }

    pub async fn cancel_scan(&self) -> Result<()> {
        self.send(UserIntent::CancelScan).await
    }

    pub async fn confirm(&self) -> Result<()> {
        self.send(UserIntent::Confirm).await
    }

    /// Latest published snapshot.
    pub fn current(&self) -> CheckInSnapshot {
        self.snapshots.borrow().clone()
    }

    /// Receiver that observes every published snapshot.
    pub fn snapshots(&self) -> watch::Receiver<CheckInSnapshot> {
        self.snapshots.clone()
    }

    /// Subscribe to notices published from now on.
    pub fn subscribe_notices(&self) -> broadcast::Receiver<Notice> {
        self.notices.subscribe()
    }
}

/// Owns the machine and its devices for one session.
#[derive(Debug)]
pub struct CheckInDriver<L, S> {
    machine: CheckInMachine,
    location: L,
    scanner: S,
    intents: mpsc::Receiver<UserIntent>,
    snapshots: watch::Sender<CheckInSnapshot>,
    notices: broadcast::Sender<Notice>,
}

impl<L, S> CheckInDriver<L, S>
where
    L: LocationProvider,
    S: QrScanner,
{
    /// Create a driver and the handle used to control it.
    pub fn new(machine: CheckInMachine, location: L, scanner: S) -> (Self, DriverHandle) {
        let (intent_tx, intent_rx) = mpsc::channel(INTENT_CHANNEL_CAPACITY);
        let (snapshot_tx, snapshot_rx) = watch::channel(machine.snapshot());
        let (notice_tx, _) = broadcast::channel(NOTICE_CHANNEL_CAPACITY);

        let handle = DriverHandle {
            intents: intent_tx,
            snapshots: snapshot_rx,
            notices: notice_tx.clone(),
        };

        let driver = Self {
            machine,
            location,
            scanner,
            intents: intent_rx,
            snapshots: snapshot_tx,
            notices: notice_tx,
        };

        (driver, handle)
    }

    /// Run until every [`DriverHandle`] is dropped.
    ///
    /// Requests the first device position immediately. The camera is
    /// released before returning.
    pub async fn run(self) {
        let Self {
            mut machine,
            location,
            mut scanner,
            mut intents,
            snapshots,
            notices,
        } = self;

        info!(user_id = machine.admission().user_id(), "check-in driver started");

        let mut pending = FuturesUnordered::new();
        let mut queue = VecDeque::from([CheckInEvent::RequestPosition]);
        let mut tick_deadline: Option<Instant> = None;

        loop {
            while let Some(event) = queue.pop_front() {
                let reaction = machine.handle_event(event);
                for effect in reaction.effects {
                    match effect {
                        Effect::RequestPosition { generation } => {
                            pending.push(request_fix(&location, generation));
                        }
                        Effect::StartScanner => {
                            if let Err(e) = scanner.start().await {
                                warn!(error = %e, "scanner failed to start");
                                queue.push_back(CheckInEvent::ScannerFault(fault_message(e)));
                            }
                        }
                        Effect::StopScanner => {
                            if let Err(e) = scanner.stop().await {
                                warn!(error = %e, "scanner failed to stop cleanly");
                            }
                        }
                        Effect::ScheduleTick => {
                            tick_deadline = Some(Instant::now() + TICK_INTERVAL);
                        }
                        Effect::Notify(notice) => {
                            // No subscribers is fine; notices are fire-and-forget.
                            let _ = notices.send(notice);
                        }
                    }
                }
                snapshots.send_replace(machine.snapshot());
            }

            let streaming = scanner.is_streaming();
            let deadline = tick_deadline.unwrap_or_else(Instant::now);

            tokio::select! {
                intent = intents.recv() => match intent {
                    Some(intent) => {
                        debug!(?intent, "user intent");
                        queue.push_back(intent.into_event());
                    }
                    None => break,
                },
                Some(event) = pending.next(), if !pending.is_empty() => {
                    queue.push_back(event);
                }
                scan = scanner.next_event(), if streaming => match scan {
                    Ok(ScanEvent::Decoded(text)) => queue.push_back(CheckInEvent::ScanDecoded(text)),
                    Ok(ScanEvent::Fault(message)) => queue.push_back(CheckInEvent::ScannerFault(message)),
                    Err(e) => {
                        // The camera is gone; stop polling it until the next scan.
                        warn!(error = %e, "scanner stream failed");
                        if let Err(stop_error) = scanner.stop().await {
                            warn!(error = %stop_error, "scanner failed to stop after stream failure");
                        }
                        queue.push_back(CheckInEvent::ScannerFault(fault_message(e)));
                    }
                },
                () = sleep_until(deadline), if tick_deadline.is_some() => {
                    tick_deadline = None;
                    queue.push_back(CheckInEvent::Tick);
                }
            }
        }

        if let Err(e) = scanner.stop().await {
            warn!(error = %e, "scanner failed to stop on shutdown");
        }
        info!("check-in driver stopped");
    }
}

async fn request_fix<L: LocationProvider>(location: &L, generation: Generation) -> CheckInEvent {
    match location.acquire().await {
        Ok(coordinate) => CheckInEvent::PositionAcquired {
            generation,
            coordinate,
        },
        Err(e) => CheckInEvent::PositionFailed {
            generation,
            error: e.into(),
        },
    }
}

// Camera failures already carry a user-readable detail; keep it unprefixed.
fn fault_message(error: DeviceError) -> String {
    match Error::from(error) {
        Error::ScannerUnavailable(message) => message,
        other => other.to_string(),
    }
}
