//! Mock device implementations for testing and development.
//!
//! This module provides simulated devices that can be controlled
//! programmatically without a GPS receiver or camera.

pub mod location;
pub mod scanner;

// Re-export commonly used types
pub use location::{MockLocation, MockLocationHandle};
pub use scanner::{MockQrScanner, MockQrScannerHandle};
