use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    // Location errors
    #[error("Location permission denied")]
    PermissionDenied,

    #[error("Location service not supported on this device")]
    Unsupported,

    // Payload errors
    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    #[error("Coordinate out of range: lat={lat}, lng={lng}")]
    CoordinateOutOfRange { lat: f64, lng: f64 },

    // Check-in errors
    #[error("Missing {0} position")]
    MissingPosition(&'static str),

    #[error("Invalid state transition from {from} to {to}")]
    InvalidStateTransition { from: String, to: String },

    #[error("Event {event} not accepted in state {state}")]
    UnexpectedEvent { event: String, state: String },

    #[error("Check-in driver has stopped")]
    DriverStopped,

    // Device errors
    #[error("Scanner unavailable: {0}")]
    ScannerUnavailable(String),

    #[error("Device error: {0}")]
    Device(String),

    // Session errors
    #[error("Authentication failed")]
    AuthenticationFailed,

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Returns `true` for errors raised by the location subsystem.
    #[must_use]
    pub fn is_location_error(&self) -> bool {
        matches!(self, Error::PermissionDenied | Error::Unsupported)
    }

    /// Returns `true` for errors caused by an unusable scanned payload.
    #[must_use]
    pub fn is_payload_error(&self) -> bool {
        matches!(
            self,
            Error::MalformedPayload(_) | Error::CoordinateOutOfRange { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
