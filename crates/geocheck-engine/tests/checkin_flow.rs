//! Integration tests for the check-in flow, driven event by event.
//!
//! These tests exercise the machine without any runtime: every side effect
//! is inspected as a value.

mod common;

use chrono::Local;
use geocheck_core::{Coordinate, Error, Verdict};
use geocheck_engine::{
    CheckInConfig, CheckInEvent, CheckInState, Effect, Locale, NoticeLevel, StaticCredentials,
    admit,
};

use common::{device_fix, far_reference, machine, machine_with, requested_generation, scanning_machine};

fn confirm() -> CheckInEvent {
    CheckInEvent::Confirm { at: Local::now() }
}

// ============================================================================
// End-to-end outcomes
// ============================================================================

#[test]
fn test_identical_reference_succeeds_at_zero_distance() {
    let mut machine = scanning_machine(device_fix());

    machine.handle_event(CheckInEvent::ScanDecoded(device_fix().to_payload()));
    let reaction = machine.handle_event(confirm());

    assert_eq!(
        reaction.state,
        CheckInState::ResultDisplayed(Verdict::Success)
    );
    let result = machine.result().unwrap();
    assert!(result.distance_meters < 1e-6);
    assert_eq!(result.distance_display(), "0.00");
}

#[test]
fn test_far_reference_fails_beyond_threshold() {
    let mut machine = scanning_machine(device_fix());

    machine.handle_event(CheckInEvent::ScanDecoded(far_reference().to_payload()));
    let reaction = machine.handle_event(confirm());

    assert_eq!(
        reaction.state,
        CheckInState::ResultDisplayed(Verdict::Failure)
    );
    let result = machine.result().unwrap();
    assert!(result.distance_meters > 2000.0);

    let notice = reaction.notices().next().unwrap();
    assert_eq!(notice.level, NoticeLevel::Error);
    assert!(notice.text.starts_with("❌ 打卡失敗，距離 2223."));
    assert!(notice.text.ends_with("公尺超過 2 公里限制"));
}

#[test]
fn test_threshold_boundary_by_latitude_offset() {
    let origin = Coordinate::new(0.0, 0.0).unwrap();

    let mut inside = scanning_machine(origin);
    inside.handle_event(CheckInEvent::ScanDecoded(r#"{"lat":0.01794,"lng":0}"#.to_string()));
    assert_eq!(
        inside.handle_event(confirm()).state,
        CheckInState::ResultDisplayed(Verdict::Success)
    );

    let mut outside = scanning_machine(origin);
    outside.handle_event(CheckInEvent::ScanDecoded(r#"{"lat":0.02,"lng":0}"#.to_string()));
    assert_eq!(
        outside.handle_event(confirm()).state,
        CheckInState::ResultDisplayed(Verdict::Failure)
    );
}

#[test]
fn test_custom_threshold_and_locale() {
    let mut machine = machine_with(
        CheckInConfig::default()
            .threshold_meters(3000.0)
            .locale(Locale::En),
    );

    let reaction = machine.handle_event(CheckInEvent::RequestPosition);
    machine.handle_event(CheckInEvent::PositionAcquired {
        generation: requested_generation(&reaction.effects),
        coordinate: device_fix(),
    });
    machine.handle_event(CheckInEvent::StartScan);
    machine.handle_event(CheckInEvent::ScanDecoded(far_reference().to_payload()));

    let reaction = machine.handle_event(confirm());
    assert_eq!(
        reaction.state,
        CheckInState::ResultDisplayed(Verdict::Success)
    );
    assert!(
        reaction
            .notices()
            .any(|n| n.text.starts_with("✅ Check-in succeeded, distance 2223."))
    );
}

// ============================================================================
// Payload handling
// ============================================================================

#[test]
fn test_malformed_scan_preserves_prior_reference() {
    let mut machine = scanning_machine(device_fix());
    machine.handle_event(CheckInEvent::ScanDecoded(
        r#"{"lat":25.03,"lng":121.56}"#.to_string(),
    ));

    // Rescan: the stored reference is cleared when scanning restarts.
    machine.handle_event(CheckInEvent::StartScan);
    assert!(machine.reference_position().is_none());

    machine.handle_event(CheckInEvent::ScanDecoded(
        r#"{"lat":25.03,"lng":121.56}"#.to_string(),
    ));
    let before = machine.reference_position();

    // Garbage after acquisition leaves the reference untouched.
    let reaction = machine.handle_event(CheckInEvent::ScanDecoded("not json".to_string()));
    assert_eq!(reaction.state, CheckInState::ReferenceAcquired);
    assert_eq!(machine.reference_position(), before);
    assert_eq!(
        before,
        Some(Coordinate::new(25.03, 121.56).unwrap())
    );
}

#[test]
fn test_malformed_scans_are_transient() {
    let mut machine = scanning_machine(device_fix());

    for raw in ["not json", "{}", r#"{"lat":"25","lng":121}"#, "[25.03,121.56]"] {
        let reaction = machine.handle_event(CheckInEvent::ScanDecoded(raw.to_string()));
        assert_eq!(reaction.state, CheckInState::Scanning, "payload {raw:?}");
        assert!(reaction.is_error());
        assert!(!reaction.effects.contains(&Effect::StopScanner));
    }

    let reaction = machine.handle_event(CheckInEvent::ScanDecoded(
        r#"  {"lat":25.03,"lng":121.56}  "#.to_string(),
    ));
    assert_eq!(reaction.state, CheckInState::ReferenceAcquired);
}

#[test]
fn test_out_of_range_payload_accepted_when_enforcement_disabled() {
    let mut machine = machine_with(CheckInConfig::default().enforce_coordinate_range(false));

    let reaction = machine.handle_event(CheckInEvent::RequestPosition);
    machine.handle_event(CheckInEvent::PositionAcquired {
        generation: requested_generation(&reaction.effects),
        coordinate: device_fix(),
    });
    machine.handle_event(CheckInEvent::StartScan);

    let reaction =
        machine.handle_event(CheckInEvent::ScanDecoded(r#"{"lat":91,"lng":0}"#.to_string()));
    assert_eq!(reaction.state, CheckInState::ReferenceAcquired);
    assert_eq!(machine.reference_position().map(|c| c.lat()), Some(91.0));
}

// ============================================================================
// Countdown and reset
// ============================================================================

#[test]
fn test_countdown_resets_after_five_ticks() {
    let mut machine = scanning_machine(device_fix());
    machine.handle_event(CheckInEvent::ScanDecoded(device_fix().to_payload()));
    machine.handle_event(confirm());

    assert_eq!(machine.countdown(), Some(5));

    for _ in 0..4 {
        let reaction = machine.handle_event(CheckInEvent::Tick);
        assert!(matches!(reaction.state, CheckInState::ResultDisplayed(_)));
    }
    let reaction = machine.handle_event(CheckInEvent::Tick);

    assert_eq!(reaction.state, CheckInState::ScanReady);
    assert!(machine.device_position().is_none());
    assert!(machine.reference_position().is_none());
    assert!(machine.result().is_none());
    assert!(machine.countdown().is_none());
}

#[test]
fn test_next_cycle_after_reset() {
    let mut machine = scanning_machine(device_fix());
    machine.handle_event(CheckInEvent::ScanDecoded(device_fix().to_payload()));
    machine.handle_event(confirm());
    for _ in 0..5 {
        machine.handle_event(CheckInEvent::Tick);
    }

    // Confirm is refused until a new reference is scanned.
    assert!(machine.handle_event(confirm()).is_error());

    let reaction = machine.handle_event(CheckInEvent::StartScan);
    assert_eq!(reaction.state, CheckInState::Scanning);
    assert!(reaction.effects.contains(&Effect::StartScanner));

    // Reference decoded before the fresh fix arrives: confirmation is refused.
    machine.handle_event(CheckInEvent::ScanDecoded(device_fix().to_payload()));
    let reaction = machine.handle_event(confirm());
    assert_eq!(reaction.state, CheckInState::ReferenceAcquired);
    assert_eq!(
        reaction.notices().next().map(|n| n.text.as_str()),
        Some("請先取得 GPS 和掃描 QR Code")
    );
}

#[test]
fn test_result_screen_ignores_user_input() {
    let mut machine = scanning_machine(device_fix());
    machine.handle_event(CheckInEvent::ScanDecoded(device_fix().to_payload()));
    machine.handle_event(confirm());

    for event in [CheckInEvent::StartScan, CheckInEvent::CancelScan, confirm()] {
        let reaction = machine.handle_event(event);
        assert_eq!(
            reaction.state,
            CheckInState::ResultDisplayed(Verdict::Success)
        );
        assert!(reaction.is_error());
    }
    assert_eq!(machine.countdown(), Some(5));
}

// ============================================================================
// Generations
// ============================================================================

#[test]
fn test_stale_position_never_overwrites_current() {
    let mut machine = machine();

    let first = requested_generation(&machine.handle_event(CheckInEvent::RequestPosition).effects);
    let second = requested_generation(&machine.handle_event(CheckInEvent::RequestPosition).effects);
    assert!(second > first);

    machine.handle_event(CheckInEvent::PositionAcquired {
        generation: second,
        coordinate: device_fix(),
    });

    let reaction = machine.handle_event(CheckInEvent::PositionAcquired {
        generation: first,
        coordinate: far_reference(),
    });
    assert!(reaction.effects.is_empty());
    assert_eq!(machine.device_position(), Some(device_fix()));
}

#[test]
fn test_stale_failure_is_discarded() {
    let mut machine = scanning_machine(device_fix());
    let stale = machine.generation();

    // Restart scanning: the outstanding request belongs to the old scan.
    machine.handle_event(CheckInEvent::CancelScan);
    machine.handle_event(CheckInEvent::StartScan);

    let reaction = machine.handle_event(CheckInEvent::PositionFailed {
        generation: stale,
        error: Error::PermissionDenied,
    });
    assert!(reaction.effects.is_empty());
    assert_eq!(machine.device_position(), Some(device_fix()));
}

#[test]
fn test_completion_after_countdown_reset_is_stale() {
    let mut machine = scanning_machine(device_fix());
    machine.handle_event(CheckInEvent::ScanDecoded(device_fix().to_payload()));
    let in_flight = machine.generation();
    machine.handle_event(confirm());
    for _ in 0..5 {
        machine.handle_event(CheckInEvent::Tick);
    }

    machine.handle_event(CheckInEvent::PositionAcquired {
        generation: in_flight,
        coordinate: far_reference(),
    });
    assert!(machine.device_position().is_none());
}

#[test]
fn test_fix_landing_on_result_screen_is_stale() {
    let mut machine = scanning_machine(device_fix());
    machine.handle_event(CheckInEvent::ScanDecoded(device_fix().to_payload()));
    let in_flight = machine.generation();
    let reaction = machine.handle_event(confirm());
    assert_eq!(reaction.state, CheckInState::ResultDisplayed(Verdict::Success));

    machine.handle_event(CheckInEvent::PositionAcquired {
        generation: in_flight,
        coordinate: far_reference(),
    });

    let snapshot = machine.snapshot();
    assert_eq!(snapshot.device_position, Some(device_fix()));
    assert_eq!(snapshot.reference_position, Some(device_fix()));
    assert_eq!(snapshot.result.unwrap().distance_meters, 0.0);
}

#[test]
fn test_late_fix_while_scanning_replaces_position() {
    let mut machine = scanning_machine(device_fix());

    machine.handle_event(CheckInEvent::PositionAcquired {
        generation: machine.generation(),
        coordinate: far_reference(),
    });

    assert_eq!(machine.state(), CheckInState::Scanning);
    assert_eq!(machine.device_position(), Some(far_reference()));
}

// ============================================================================
// Camera release
// ============================================================================

#[test]
fn test_every_exit_from_scanning_stops_scanner() {
    // Successful decode
    let mut machine = scanning_machine(device_fix());
    let reaction = machine.handle_event(CheckInEvent::ScanDecoded(device_fix().to_payload()));
    assert_eq!(reaction.effects.first(), Some(&Effect::StopScanner));

    // Cancel
    let mut machine = scanning_machine(device_fix());
    let reaction = machine.handle_event(CheckInEvent::CancelScan);
    assert_eq!(reaction.effects, vec![Effect::StopScanner]);

    // Staying in Scanning never stops it
    let mut machine = scanning_machine(device_fix());
    let reaction = machine.handle_event(CheckInEvent::ScannerFault("glare".to_string()));
    assert!(!reaction.effects.contains(&Effect::StopScanner));
}

#[test]
fn test_session_gate_refuses_wrong_secret() {
    let gate = StaticCredentials::new(common::USER_ID, common::SECRET);
    assert_eq!(
        admit(&gate, common::USER_ID, "wrong").unwrap_err(),
        Error::AuthenticationFailed
    );
}

#[test]
fn test_snapshot_reflects_machine() {
    let mut machine = scanning_machine(device_fix());
    machine.handle_event(CheckInEvent::ScanDecoded(far_reference().to_payload()));

    let snapshot = machine.snapshot();
    assert_eq!(snapshot.user_id, common::USER_ID);
    assert_eq!(snapshot.state, CheckInState::ReferenceAcquired);
    assert_eq!(snapshot.reference_position, Some(far_reference()));
    assert!(snapshot.can_confirm());
    assert!(snapshot.can_start_scan());
}
