//! Check-in engine: the location-gated check-in state machine and the async
//! driver that runs it against a location provider and a QR scanner.
//!
//! The pure part ([`CheckInMachine`]) takes events and returns effects. The
//! [`driver`] module executes those effects on tokio.

pub mod config;
pub mod countdown;
pub mod driver;
pub mod machine;
pub mod messages;
pub mod session;
pub mod state_machine;
pub mod view;

pub use config::{CheckInConfig, Locale};
pub use countdown::{Countdown, CountdownStatus};
pub use driver::{CheckInDriver, DriverHandle, UserIntent};
pub use machine::{CheckInEvent, CheckInMachine, Effect, Generation, Notice, NoticeLevel, Reaction};
pub use messages::Messages;
pub use session::{Admission, SessionGate, StaticCredentials, admit};
pub use state_machine::{CheckInState, StateMachine, StateTransition};
pub use view::CheckInSnapshot;
