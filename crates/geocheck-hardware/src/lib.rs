//! Device abstraction layer for location-gated check-in.
//!
//! This crate provides trait-based abstractions for the two devices a
//! check-in kiosk or phone consumes: a location provider (GPS / platform
//! geolocation) and a camera-backed QR scanner. The traits allow easy
//! substitution between mock implementations (for development and testing)
//! and platform drivers.
//!
//! # Design Philosophy
//!
//! - **Async-first**: All I/O operations are asynchronous using native `async fn`
//!   in traits (Edition 2024 RPITIT).
//! - **Thread-safe**: All traits require `Send + Sync` for use with Tokio.
//! - **Error-aware**: All operations return `Result<T>` with a [`DeviceError`]
//!   that converts into the check-in error taxonomy.
//!
//! # Device Traits
//!
//! ## Location Providers
//!
//! The [`LocationProvider`] trait is a one-shot position source:
//!
//! ```no_run
//! use geocheck_hardware::traits::LocationProvider;
//! use geocheck_hardware::error::Result;
//!
//! async fn print_fix<L: LocationProvider>(gps: &L) -> Result<()> {
//!     let fix = gps.acquire().await?;
//!     println!("{fix}");
//!     Ok(())
//! }
//! ```
//!
//! ## QR Scanners
//!
//! The [`QrScanner`] trait streams decoded symbols while it holds the camera:
//!
//! ```no_run
//! use geocheck_hardware::traits::QrScanner;
//! use geocheck_hardware::types::ScanEvent;
//! use geocheck_hardware::error::Result;
//!
//! async fn first_code<S: QrScanner>(scanner: &mut S) -> Result<Option<String>> {
//!     scanner.start().await?;
//!     let event = scanner.next_event().await;
//!     scanner.stop().await?;
//!
//!     match event? {
//!         ScanEvent::Decoded(text) => Ok(Some(text)),
//!         ScanEvent::Fault(_) => Ok(None),
//!     }
//! }
//! ```
//!
//! # Mock Implementations
//!
//! [`mock::MockLocation`] and [`mock::MockQrScanner`] come with handles that
//! script fixes, permission refusals, latency, and the codes the camera sees.
//!
//! [`LocationProvider`]: traits::LocationProvider
//! [`QrScanner`]: traits::QrScanner

pub mod devices;
pub mod error;
pub mod mock;
pub mod traits;
pub mod types;

// Re-export commonly used types for convenience
pub use error::{DeviceError, Result};
pub use traits::{LocationProvider, QrScanner};
pub use types::{DeviceInfo, ScanEvent};
