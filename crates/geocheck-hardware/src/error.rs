//! Error types for device operations.
//!
//! This module defines errors raised by the location subsystem and the QR
//! scanner: permission refusals, missing platform support, camera failures,
//! disconnections and timeouts.

/// Result type alias for device operations.
pub type Result<T> = std::result::Result<T, DeviceError>;

/// Errors that can occur during device operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DeviceError {
    /// The user or OS refused access to the device.
    #[error("Permission denied: {device}")]
    PermissionDenied { device: String },

    /// The platform does not offer this capability.
    #[error("Unsupported operation: {operation}")]
    Unsupported { operation: String },

    /// Camera could not be opened or stopped streaming.
    #[error("Camera unavailable: {message}")]
    CameraUnavailable { message: String },

    /// Device is not connected or has been disconnected.
    #[error("Device disconnected: {device}")]
    Disconnected { device: String },

    /// Operation timed out after specified duration.
    #[error("Operation timeout after {duration_ms}ms")]
    Timeout { duration_ms: u64 },

    /// Generic error with custom message.
    #[error("{0}")]
    Other(String),
}

impl DeviceError {
    /// Create a new permission denied error.
    pub fn permission_denied(device: impl Into<String>) -> Self {
        Self::PermissionDenied {
            device: device.into(),
        }
    }

    /// Create a new unsupported operation error.
    pub fn unsupported(operation: impl Into<String>) -> Self {
        Self::Unsupported {
            operation: operation.into(),
        }
    }

    /// Create a new camera unavailable error.
    pub fn camera_unavailable(message: impl Into<String>) -> Self {
        Self::CameraUnavailable {
            message: message.into(),
        }
    }

    /// Create a new disconnected error.
    pub fn disconnected(device: impl Into<String>) -> Self {
        Self::Disconnected {
            device: device.into(),
        }
    }

    /// Create a new timeout error.
    pub fn timeout(duration_ms: u64) -> Self {
        Self::Timeout { duration_ms }
    }

    /// Create a generic error with custom message.
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other(message.into())
    }
}

/// Location failures keep their taxonomy; camera failures become
/// `ScannerUnavailable`; the rest are opaque device errors.
impl From<DeviceError> for geocheck_core::Error {
    fn from(error: DeviceError) -> Self {
        match error {
            DeviceError::PermissionDenied { .. } => geocheck_core::Error::PermissionDenied,
            DeviceError::Unsupported { .. } => geocheck_core::Error::Unsupported,
            DeviceError::CameraUnavailable { message } => {
                geocheck_core::Error::ScannerUnavailable(message)
            }
            other => geocheck_core::Error::Device(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permission_denied_error() {
        let error = DeviceError::permission_denied("GPS");
        assert!(matches!(error, DeviceError::PermissionDenied { .. }));
        assert_eq!(error.to_string(), "Permission denied: GPS");
    }

    #[test]
    fn test_timeout_error() {
        let error = DeviceError::timeout(3000);
        assert_eq!(error.to_string(), "Operation timeout after 3000ms");
    }

    #[test]
    fn test_camera_unavailable_error() {
        let error = DeviceError::camera_unavailable("access denied");
        assert_eq!(error.to_string(), "Camera unavailable: access denied");
    }

    #[test]
    fn test_conversion_to_core_error() {
        use geocheck_core::Error;

        assert_eq!(
            Error::from(DeviceError::permission_denied("GPS")),
            Error::PermissionDenied
        );
        assert_eq!(
            Error::from(DeviceError::unsupported("geolocation")),
            Error::Unsupported
        );
        assert_eq!(
            Error::from(DeviceError::camera_unavailable("busy")),
            Error::ScannerUnavailable("busy".to_string())
        );
        assert_eq!(
            Error::from(DeviceError::timeout(500)),
            Error::Device("Operation timeout after 500ms".to_string())
        );
    }
}
