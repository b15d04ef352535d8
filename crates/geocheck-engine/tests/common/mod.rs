//! Common test utilities for check-in integration tests.
//!
//! Builders for admitted machines, well-known coordinates, and a helper that
//! walks a machine to a given point in the flow.

#![allow(dead_code)]

use geocheck_core::Coordinate;
use geocheck_engine::{
    CheckInConfig, CheckInEvent, CheckInMachine, Effect, Generation, StaticCredentials, admit,
};
use tracing_subscriber::EnvFilter;

pub const USER_ID: &str = "tester";
pub const SECRET: &str = "correct horse";

/// Install a test-writer subscriber once; honors `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Taipei 101, the device position used throughout.
pub fn device_fix() -> Coordinate {
    Coordinate::new(25.0330, 121.5654).unwrap()
}

/// About 2.22 km due north of [`device_fix`].
pub fn far_reference() -> Coordinate {
    Coordinate::new(25.0530, 121.5654).unwrap()
}

pub fn machine_with(config: CheckInConfig) -> CheckInMachine {
    init_tracing();
    let gate = StaticCredentials::new(USER_ID, SECRET);
    let admission = admit(&gate, USER_ID, SECRET).unwrap();
    CheckInMachine::new(admission, config).unwrap()
}

pub fn machine() -> CheckInMachine {
    machine_with(CheckInConfig::default())
}

/// Generation of the position request among `effects`.
pub fn requested_generation(effects: &[Effect]) -> Generation {
    effects
        .iter()
        .find_map(|effect| match effect {
            Effect::RequestPosition { generation } => Some(*generation),
            _ => None,
        })
        .expect("reaction should request a position")
}

/// Admit, acquire `fix`, start scanning, and answer the re-request with `fix`.
pub fn scanning_machine(fix: Coordinate) -> CheckInMachine {
    let mut machine = machine();

    let reaction = machine.handle_event(CheckInEvent::RequestPosition);
    let generation = requested_generation(&reaction.effects);
    machine.handle_event(CheckInEvent::PositionAcquired {
        generation,
        coordinate: fix,
    });

    let reaction = machine.handle_event(CheckInEvent::StartScan);
    let generation = requested_generation(&reaction.effects);
    machine.handle_event(CheckInEvent::PositionAcquired {
        generation,
        coordinate: fix,
    });

    machine
}
