use std::time::Duration;

use tessera_core::RateLimitConfig;
use tessera_polygon::pace::RateGate;

fn gate(limit: u32, window_secs: u64) -> RateGate {
    RateGate::new(RateLimitConfig {
        limit,
        window: Duration::from_secs(window_secs),
    })
}

#[test]
fn no_pause_while_budget_remains() {
    let mut gate = gate(4, 60);
    for _ in 0..3 {
        gate.note_response();
    }
    assert_eq!(gate.required_pause(false), None);
}

#[test]
fn spent_budget_defaults_to_the_full_window() {
    let mut gate = gate(4, 60);
    for _ in 0..4 {
        gate.note_response();
    }
    gate.note_success(Some("a".to_owned()));
    gate.note_success(None);
    assert_eq!(gate.required_pause(false), Some(Duration::from_secs(60)));
}

#[test]
fn two_stamps_are_not_enough_cadence_evidence() {
    let mut gate = gate(2, 60);
    gate.note_response();
    gate.note_response();
    gate.note_success(None);
    gate.note_success(None);
    assert_eq!(gate.required_pause(false), Some(Duration::from_secs(60)));
}

#[test]
fn overload_forces_a_pause_with_budget_to_spare() {
    let gate = gate(4, 60);
    assert_eq!(gate.required_pause(true), Some(Duration::from_secs(60)));
}

#[test]
fn pause_adapts_to_observed_cadence() {
    let mut gate = gate(2, 60);
    gate.note_response();
    gate.note_success(None);
    std::thread::sleep(Duration::from_millis(1100));
    gate.note_response();
    gate.note_success(None);
    std::thread::sleep(Duration::from_millis(1100));
    gate.note_response();
    gate.note_success(None);

    // Spread is ~2.2s; rounding up to whole seconds lands on 3.
    assert_eq!(gate.required_pause(false), Some(Duration::from_secs(3)));
}

#[test]
fn adaptive_pause_never_exceeds_the_window() {
    let mut gate = gate(2, 1);
    gate.note_response();
    gate.note_response();
    gate.note_success(None);
    std::thread::sleep(Duration::from_millis(600));
    gate.note_success(None);
    std::thread::sleep(Duration::from_millis(600));
    gate.note_success(None);

    assert_eq!(gate.required_pause(false), Some(Duration::from_secs(1)));
}

#[test]
fn tight_cadence_shrinks_the_pause_below_the_window() {
    let mut gate = gate(1, 60);
    gate.note_response();
    for _ in 0..3 {
        gate.note_success(None);
    }

    let pause = gate.required_pause(false).unwrap();
    assert!(pause <= Duration::from_secs(1), "got {pause:?}");
}

#[test]
fn reset_clears_budget_and_cadence_but_keeps_the_total() {
    let mut gate = gate(2, 60);
    gate.note_response();
    gate.note_response();
    gate.note_success(Some("x".to_owned()));
    assert!(gate.required_pause(false).is_some());

    gate.reset();

    assert_eq!(gate.required_pause(false), None);
    assert!(gate.stamps().is_empty());
    assert_eq!(gate.total_responses(), 2);
}

#[test]
fn stamps_carry_the_upstream_request_id() {
    let mut gate = gate(4, 60);
    gate.note_success(Some("req-1".to_owned()));
    gate.note_success(None);

    assert_eq!(gate.stamps().len(), 2);
    assert_eq!(gate.stamps()[0].request_id.as_deref(), Some("req-1"));
    assert_eq!(gate.stamps()[1].request_id, None);
}
