//! Mock location provider for testing and development.
//!
//! The provider answers each request from a script: queued one-off responses
//! first, then a standing default. Every response can carry a latency, which
//! makes it possible to reproduce slow fixes overtaking fast ones under
//! tokio's paused clock.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use geocheck_core::Coordinate;
use tracing::debug;

use crate::{DeviceError, Result, traits::LocationProvider, types::DeviceInfo};

#[derive(Debug, Clone)]
struct ScriptedFix {
    response: Result<Coordinate>,
    latency: Duration,
}

#[derive(Debug)]
struct LocationScript {
    queued: VecDeque<ScriptedFix>,
    standing: ScriptedFix,
    requests: u64,
}

/// Mock location provider.
///
/// # Examples
///
/// ```
/// use geocheck_core::Coordinate;
/// use geocheck_hardware::mock::MockLocation;
/// use geocheck_hardware::traits::LocationProvider;
///
/// #[tokio::main]
/// async fn main() -> geocheck_hardware::Result<()> {
///     let (gps, handle) = MockLocation::new();
///     handle.set_fix(Coordinate::new(25.0330, 121.5654).unwrap());
///
///     let fix = gps.acquire().await?;
///     assert_eq!(fix.lat(), 25.0330);
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct MockLocation {
    script: Arc<Mutex<LocationScript>>,
    name: String,
}

impl MockLocation {
    /// Create a new mock provider with the default name.
    ///
    /// Until a fix is configured every request fails with `Unsupported`.
    pub fn new() -> (Self, MockLocationHandle) {
        Self::with_name("Mock GPS".to_string())
    }

    /// Create a new mock provider with a custom name.
    pub fn with_name(name: String) -> (Self, MockLocationHandle) {
        let script = Arc::new(Mutex::new(LocationScript {
            queued: VecDeque::new(),
            standing: ScriptedFix {
                response: Err(DeviceError::unsupported("no fix configured")),
                latency: Duration::ZERO,
            },
            requests: 0,
        }));

        let provider = Self {
            script: Arc::clone(&script),
            name,
        };

        (provider, MockLocationHandle { script })
    }
}

impl Default for MockLocation {
    fn default() -> Self {
        Self::new().0
    }
}

impl LocationProvider for MockLocation {
    async fn acquire(&self) -> Result<Coordinate> {
        let fix = {
            let mut script = lock(&self.script);
            script.requests += 1;
            script
                .queued
                .pop_front()
                .unwrap_or_else(|| script.standing.clone())
        };

        debug!(device = %self.name, latency_ms = fix.latency.as_millis() as u64, "position requested");

        if !fix.latency.is_zero() {
            tokio::time::sleep(fix.latency).await;
        }
        fix.response
    }

    async fn get_info(&self) -> Result<DeviceInfo> {
        Ok(DeviceInfo::new(self.name.clone(), "Mock GPS v1.0").with_firmware_version("1.0.0"))
    }
}

/// Handle for scripting a mock location provider.
///
/// Cloned handles share the same script.
#[derive(Debug, Clone)]
pub struct MockLocationHandle {
    script: Arc<Mutex<LocationScript>>,
}

impl MockLocationHandle {
    /// Answer every subsequent request with `fix`.
    pub fn set_fix(&self, fix: Coordinate) {
        lock(&self.script).standing.response = Ok(fix);
    }

    /// Answer every subsequent request with a permission refusal.
    pub fn deny_permission(&self) {
        lock(&self.script).standing.response = Err(DeviceError::permission_denied("location"));
    }

    /// Answer every subsequent request as if the platform had no geolocation.
    pub fn set_unsupported(&self) {
        lock(&self.script).standing.response = Err(DeviceError::unsupported("geolocation"));
    }

    /// Delay every standing response by `latency`.
    pub fn set_latency(&self, latency: Duration) {
        lock(&self.script).standing.latency = latency;
    }

    /// Queue a one-off response for the next request, ahead of the standing one.
    pub fn push_response(&self, response: Result<Coordinate>, latency: Duration) {
        lock(&self.script)
            .queued
            .push_back(ScriptedFix { response, latency });
    }

    /// Number of requests received so far.
    pub fn request_count(&self) -> u64 {
        lock(&self.script).requests
    }
}

// A poisoned script only means a test panicked mid-update; keep serving it.
fn lock(script: &Mutex<LocationScript>) -> MutexGuard<'_, LocationScript> {
    script
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}
