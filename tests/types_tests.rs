//! Tests for shared domain types

use std::sync::atomic::AtomicBool;

use replay_firmware::config::{seconds_to_ticks, CYCLE_TIMER_TICK_HZ, MAX_FREQUENCY_HZ};
use replay_firmware::replay::cycle::CyclePhase;
use replay_firmware::replay::session::ReadySignal;
use replay_firmware::types::{Frequency, ReplayError, ReplayOutcome};

// ============================================================================
// Frequency
// ============================================================================

#[test]
fn frequency_accepts_supported_range() {
    assert!(Frequency::from_hz(0).is_some());
    assert!(Frequency::from_hz(1_575_420_000).is_some());
    assert!(Frequency::from_hz(MAX_FREQUENCY_HZ).is_some());
    assert!(Frequency::from_hz(MAX_FREQUENCY_HZ + 1).is_none());
}

#[test]
fn frequency_unit_conversions() {
    let freq = Frequency::from_khz(433_920).unwrap();
    assert_eq!(freq.as_hz(), 433_920_000);
    assert_eq!(freq.as_khz(), 433_920);
    assert!((freq.as_mhz_f64() - 433.92).abs() < 1e-9);
}

#[test]
fn frequency_display_in_hz() {
    let freq = Frequency::from_hz(2_400_000_000).unwrap();
    assert_eq!(format!("{freq}"), "2400000000 Hz");
    assert_eq!(format!("{freq:?}"), "Frequency(2400000000 Hz)");
}

// ============================================================================
// Phases, ticks, outcomes
// ============================================================================

#[test]
fn cycle_phase_starts_idle() {
    assert_eq!(CyclePhase::default(), CyclePhase::Idle);
}

#[test]
fn tick_conversion_matches_tick_rate() {
    assert_eq!(seconds_to_ticks(0), 0);
    assert_eq!(seconds_to_ticks(1), CYCLE_TIMER_TICK_HZ as u64);
    assert_eq!(seconds_to_ticks(30), 30 * CYCLE_TIMER_TICK_HZ as u64);
}

#[test]
fn replay_error_messages_are_user_facing() {
    assert_eq!(format!("{}", ReplayError::FileOpen), "file open error");
    assert_eq!(format!("{}", ReplayError::StreamRead), "file read error");
}

#[test]
fn replay_outcome_equality() {
    assert_eq!(ReplayOutcome::EndOfFile, ReplayOutcome::EndOfFile);
    assert_ne!(ReplayOutcome::EndOfFile, ReplayOutcome::ReadError);
}

// ============================================================================
// Ready signal
// ============================================================================

#[test]
fn ready_signal_set_and_clear() {
    let flag: &'static AtomicBool = Box::leak(Box::new(AtomicBool::new(false)));
    let signal = ReadySignal::new(flag);

    assert!(!signal.is_ready());
    signal.set();
    assert!(signal.is_ready());
    signal.clear();
    assert!(!signal.is_ready());
}

#[test]
fn ready_signal_copies_share_the_flag() {
    let flag: &'static AtomicBool = Box::leak(Box::new(AtomicBool::new(false)));
    let producer = ReadySignal::new(flag);
    let consumer = producer;

    producer.set();
    assert!(consumer.is_ready());
    consumer.clear();
    assert!(!producer.is_ready());
}
