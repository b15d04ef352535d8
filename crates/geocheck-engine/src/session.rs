//! Session admission.
//!
//! A [`CheckInMachine`](crate::CheckInMachine) can only be built from an
//! [`Admission`], and the only way to obtain one is [`admit`], which asks a
//! [`SessionGate`] to authenticate the user first.

use chrono::{DateTime, Local};
use subtle::ConstantTimeEq;
use tracing::{info, warn};

use geocheck_core::{Error, Result};

/// Credential check in front of the check-in flow.
///
/// Credential storage and hashing belong to the implementor.
pub trait SessionGate {
    /// Returns `true` if `secret` is valid for `user_id`.
    fn authenticate(&self, user_id: &str, secret: &str) -> bool;
}

/// Gate backed by a single fixed user id and secret.
///
/// Both values are compared in constant time.
///
/// # Examples
///
/// ```
/// use geocheck_engine::session::{SessionGate, StaticCredentials};
///
/// let gate = StaticCredentials::new("kiosk", "hunter2");
/// assert!(gate.authenticate("kiosk", "hunter2"));
/// assert!(!gate.authenticate("kiosk", "hunter3"));
/// ```
#[derive(Clone)]
pub struct StaticCredentials {
    user_id: String,
    secret: String,
}

impl StaticCredentials {
    /// Create a gate that admits exactly `user_id` with `secret`.
    pub fn new(user_id: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            secret: secret.into(),
        }
    }
}

impl std::fmt::Debug for StaticCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticCredentials")
            .field("user_id", &self.user_id)
            .field("secret", &"<redacted>")
            .finish()
    }
}

impl SessionGate for StaticCredentials {
    fn authenticate(&self, user_id: &str, secret: &str) -> bool {
        let id_ok = self.user_id.as_bytes().ct_eq(user_id.as_bytes());
        let secret_ok = self.secret.as_bytes().ct_eq(secret.as_bytes());
        (id_ok & secret_ok).into()
    }
}

/// Proof that a user passed the session gate.
#[derive(Debug, Clone, PartialEq)]
pub struct Admission {
    user_id: String,
    admitted_at: DateTime<Local>,
}

impl Admission {
    /// Admitted user id.
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Local time of admission.
    pub fn admitted_at(&self) -> DateTime<Local> {
        self.admitted_at
    }
}

/// Authenticate `user_id` against `gate`.
///
/// # Errors
///
/// Returns `Error::AuthenticationFailed` if the gate rejects the credentials.
pub fn admit<G: SessionGate + ?Sized>(gate: &G, user_id: &str, secret: &str) -> Result<Admission> {
    if !gate.authenticate(user_id, secret) {
        warn!(user_id, "session admission refused");
        return Err(Error::AuthenticationFailed);
    }

    info!(user_id, "session admitted");
    Ok(Admission {
        user_id: user_id.to_string(),
        admitted_at: Local::now(),
    })
}
