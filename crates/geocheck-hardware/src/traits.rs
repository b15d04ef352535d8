//! Device trait definitions.
//!
//! This module defines the contract between the check-in engine and the two
//! device subsystems it consumes: the location provider and the QR scanner.
//! Mock and platform implementations are interchangeable behind these traits.
//!
//! All traits use native `async fn` methods (Edition 2024 RPITIT), so they
//! are used through generic parameters or the enum wrappers in
//! [`devices`](crate::devices) rather than as trait objects.

#![allow(async_fn_in_trait)]

use geocheck_core::Coordinate;

use crate::error::Result;
use crate::types::{DeviceInfo, ScanEvent};

/// One-shot position source.
///
/// Each call to [`acquire`](LocationProvider::acquire) is an independent
/// request. It may suspend while the OS shows a permission prompt and does
/// not retry internally; the caller decides whether to ask again.
///
/// `acquire` takes `&self` so several requests can be outstanding at once.
/// Callers that care about ordering must tag requests themselves.
///
/// # Examples
///
/// ```no_run
/// use geocheck_hardware::traits::LocationProvider;
/// use geocheck_hardware::error::Result;
/// use geocheck_core::Coordinate;
///
/// async fn locate<L: LocationProvider>(provider: &L) -> Result<Coordinate> {
///     let fix = provider.acquire().await?;
///     println!("device at {fix}");
///     Ok(fix)
/// }
/// ```
pub trait LocationProvider: Send + Sync {
    /// Request the current device position.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The user or OS denied location permission (`PermissionDenied`)
    /// - The platform has no location capability (`Unsupported`)
    /// - The request timed out or the provider went away
    async fn acquire(&self) -> Result<Coordinate>;

    /// Get device information.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider cannot be queried.
    async fn get_info(&self) -> Result<DeviceInfo>;
}

/// QR code scanner backed by a camera.
///
/// The scanner owns the camera only between [`start`](QrScanner::start) and
/// [`stop`](QrScanner::stop). While streaming it yields [`ScanEvent`]s; the
/// decoded text is opaque and must be validated by the caller.
///
/// # Examples
///
/// ```no_run
/// use geocheck_hardware::traits::QrScanner;
/// use geocheck_hardware::types::ScanEvent;
/// use geocheck_hardware::error::Result;
///
/// async fn scan_once<S: QrScanner>(scanner: &mut S) -> Result<String> {
///     scanner.start().await?;
///     let text = loop {
///         match scanner.next_event().await {
///             Ok(ScanEvent::Decoded(text)) => break Ok(text),
///             Ok(ScanEvent::Fault(_)) => continue,
///             Err(e) => break Err(e),
///         }
///     };
///     scanner.stop().await?;
///     text
/// }
/// ```
pub trait QrScanner: Send + Sync {
    /// Acquire the camera and begin decoding.
    ///
    /// # Errors
    ///
    /// Returns `CameraUnavailable` if the camera cannot be opened
    /// (media access denied, device busy).
    async fn start(&mut self) -> Result<()>;

    /// Wait for the next decoded symbol or decoder fault.
    ///
    /// Only meaningful while streaming.
    ///
    /// # Errors
    ///
    /// Returns an error if the scanner is not streaming or the camera was
    /// lost.
    async fn next_event(&mut self) -> Result<ScanEvent>;

    /// Release the camera. Stopping an idle scanner is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if the camera could not be released cleanly.
    async fn stop(&mut self) -> Result<()>;

    /// Returns `true` between a successful `start` and the next `stop`.
    fn is_streaming(&self) -> bool;

    /// Get device information.
    ///
    /// # Errors
    ///
    /// Returns an error if the scanner cannot be queried.
    async fn get_info(&self) -> Result<DeviceInfo>;
}
