//! Mock QR scanner for testing and development.
//!
//! The scanner receives simulated decoder output through an internal channel.
//! Like a real camera, it only produces frames while streaming: codes shown
//! to a stopped scanner are dropped.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use tokio::sync::mpsc;
use tracing::debug;

use crate::{DeviceError, Result, traits::QrScanner, types::DeviceInfo, types::ScanEvent};

#[derive(Debug, Default)]
struct CameraState {
    streaming: AtomicBool,
    access_denied: AtomicBool,
    starts: AtomicU32,
    stops: AtomicU32,
}

/// Mock QR scanner.
///
/// # Examples
///
/// ```
/// use geocheck_hardware::mock::MockQrScanner;
/// use geocheck_hardware::traits::QrScanner;
/// use geocheck_hardware::types::ScanEvent;
///
/// #[tokio::main]
/// async fn main() -> geocheck_hardware::Result<()> {
///     let (mut scanner, handle) = MockQrScanner::new();
///
///     scanner.start().await?;
///     handle.show_code(r#"{"lat":25.03,"lng":121.56}"#).await?;
///
///     let event = scanner.next_event().await?;
///     assert_eq!(event, ScanEvent::Decoded(r#"{"lat":25.03,"lng":121.56}"#.to_string()));
///
///     scanner.stop().await?;
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct MockQrScanner {
    /// Channel receiver for simulated decoder output
    event_rx: mpsc::Receiver<ScanEvent>,

    /// Camera state shared with the handle
    camera: Arc<CameraState>,

    /// Device name
    name: String,
}

impl MockQrScanner {
    /// Create a new mock scanner with the default name.
    pub fn new() -> (Self, MockQrScannerHandle) {
        Self::with_name("Mock QR Camera".to_string())
    }

    /// Create a new mock scanner with a custom name.
    pub fn with_name(name: String) -> (Self, MockQrScannerHandle) {
        let (event_tx, event_rx) = mpsc::channel(32);
        let camera = Arc::new(CameraState::default());

        let scanner = Self {
            event_rx,
            camera: Arc::clone(&camera),
            name: name.clone(),
        };

        let handle = MockQrScannerHandle {
            event_tx,
            camera,
            name,
        };

        (scanner, handle)
    }
}

impl Default for MockQrScanner {
    fn default() -> Self {
        Self::new().0
    }
}

impl QrScanner for MockQrScanner {
    async fn start(&mut self) -> Result<()> {
        if self.camera.access_denied.load(Ordering::SeqCst) {
            return Err(DeviceError::camera_unavailable(
                "Camera access denied. Please check your permissions.",
            ));
        }

        // Frames left over from an earlier session are not part of this one.
        while self.event_rx.try_recv().is_ok() {}

        self.camera.streaming.store(true, Ordering::SeqCst);
        self.camera.starts.fetch_add(1, Ordering::SeqCst);
        debug!(device = %self.name, "camera started");
        Ok(())
    }

    async fn next_event(&mut self) -> Result<ScanEvent> {
        if !self.is_streaming() {
            return Err(DeviceError::disconnected("scanner is not streaming"));
        }

        self.event_rx
            .recv()
            .await
            .ok_or_else(|| DeviceError::disconnected("Scanner event channel closed"))
    }

    async fn stop(&mut self) -> Result<()> {
        if self.camera.streaming.swap(false, Ordering::SeqCst) {
            self.camera.stops.fetch_add(1, Ordering::SeqCst);
            debug!(device = %self.name, "camera stopped");
        }
        Ok(())
    }

    fn is_streaming(&self) -> bool {
        self.camera.streaming.load(Ordering::SeqCst)
    }

    async fn get_info(&self) -> Result<DeviceInfo> {
        Ok(DeviceInfo::new(self.name.clone(), "Mock QR Camera v1.0").with_firmware_version("1.0.0"))
    }
}

/// Handle for controlling a mock scanner.
///
/// This handle simulates what the camera sees. It can be cloned and shared
/// across tasks.
#[derive(Debug, Clone)]
pub struct MockQrScannerHandle {
    /// Channel sender for simulated decoder output
    event_tx: mpsc::Sender<ScanEvent>,

    /// Camera state shared with the scanner
    camera: Arc<CameraState>,

    /// Device name
    name: String,
}

impl MockQrScannerHandle {
    /// Hold a QR code carrying `text` in front of the camera.
    ///
    /// Returns `Ok(false)` if the camera was not streaming and the code was
    /// not seen.
    ///
    /// # Errors
    ///
    /// Returns an error if the scanner has been dropped.
    pub async fn show_code(&self, text: impl Into<String>) -> Result<bool> {
        self.emit(ScanEvent::Decoded(text.into())).await
    }

    /// Simulate a decoder-level fault while streaming.
    ///
    /// # Errors
    ///
    /// Returns an error if the scanner has been dropped.
    pub async fn emit_fault(&self, message: impl Into<String>) -> Result<bool> {
        self.emit(ScanEvent::Fault(message.into())).await
    }

    /// Refuse (or restore) camera access for subsequent `start` calls.
    pub fn set_access_denied(&self, denied: bool) {
        self.camera.access_denied.store(denied, Ordering::SeqCst);
    }

    /// Returns `true` while the scanner holds the camera.
    pub fn is_streaming(&self) -> bool {
        self.camera.streaming.load(Ordering::SeqCst)
    }

    /// Number of successful `start` calls.
    pub fn start_count(&self) -> u32 {
        self.camera.starts.load(Ordering::SeqCst)
    }

    /// Number of `stop` calls that actually released the camera.
    pub fn stop_count(&self) -> u32 {
        self.camera.stops.load(Ordering::SeqCst)
    }

    async fn emit(&self, event: ScanEvent) -> Result<bool> {
        if !self.is_streaming() {
            debug!(device = %self.name, "camera not streaming, frame dropped");
            return Ok(false);
        }

        self.event_tx
            .send(event)
            .await
            .map_err(|_| DeviceError::disconnected("Scanner event channel closed"))?;
        Ok(true)
    }
}
