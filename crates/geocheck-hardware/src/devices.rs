//! Enum wrappers for device dispatch.
//!
//! Native `async fn` in traits is not object-safe, so `Box<dyn LocationProvider>`
//! is not available. These enums give a single concrete type that can hold any
//! supported backend and still implement the device traits.
//!
//! # Examples
//!
//! ```
//! use geocheck_hardware::devices::{AnyLocationProvider, AnyQrScanner};
//! use geocheck_hardware::mock::{MockLocation, MockQrScanner};
//!
//! let (gps, _gps_handle) = MockLocation::new();
//! let (camera, _camera_handle) = MockQrScanner::new();
//!
//! let location = AnyLocationProvider::Mock(gps);
//! let scanner = AnyQrScanner::Mock(camera);
//! ```

use geocheck_core::Coordinate;

use crate::mock::{MockLocation, MockQrScanner};
use crate::traits::{LocationProvider, QrScanner};
use crate::{DeviceInfo, Result, ScanEvent};

/// Enum wrapper for location provider dispatch.
#[derive(Debug)]
#[non_exhaustive]
pub enum AnyLocationProvider {
    /// Mock provider for development and testing.
    Mock(MockLocation),
}

impl LocationProvider for AnyLocationProvider {
    async fn acquire(&self) -> Result<Coordinate> {
        match self {
            Self::Mock(device) => device.acquire().await,
        }
    }

    async fn get_info(&self) -> Result<DeviceInfo> {
        match self {
            Self::Mock(device) => device.get_info().await,
        }
    }
}

/// Enum wrapper for QR scanner dispatch.
#[derive(Debug)]
#[non_exhaustive]
pub enum AnyQrScanner {
    /// Mock scanner for development and testing.
    Mock(MockQrScanner),
}

impl QrScanner for AnyQrScanner {
    async fn start(&mut self) -> Result<()> {
        match self {
            Self::Mock(device) => device.start().await,
        }
    }

    async fn next_event(&mut self) -> Result<ScanEvent> {
        match self {
            Self::Mock(device) => device.next_event().await,
        }
    }

    async fn stop(&mut self) -> Result<()> {
        match self {
            Self::Mock(device) => device.stop().await,
        }
    }

    fn is_streaming(&self) -> bool {
        match self {
            Self::Mock(device) => device.is_streaming(),
        }
    }

    async fn get_info(&self) -> Result<DeviceInfo> {
        match self {
            Self::Mock(device) => device.get_info().await,
        }
    }
}
