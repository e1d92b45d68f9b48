//! Cyclic Transmit Phases
//!
//! Duty-cycled operation alternates fixed-duration "on" (transmitting)
//! and "off" (paused) intervals. This module holds the phase
//! enumeration, the validated cycle configuration, and the one helper
//! the timer interrupt context is allowed to run.

use crate::config::{OFF_DURATION_MAX_S, ON_DURATION_MAX_S, ON_DURATION_MIN_S};

/// The cyclic controller's current disposition
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum CyclePhase {
    /// No replay in progress; initial and terminal state
    #[default]
    Idle,
    /// A streaming session is (or should be) feeding the pipeline
    Transmitting,
    /// Inside the "off" interval; the armed timer governs the return
    Paused,
}

#[cfg(feature = "embedded")]
impl defmt::Format for CyclePhase {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Idle => defmt::write!(f, "IDLE"),
            Self::Transmitting => defmt::write!(f, "TX"),
            Self::Paused => defmt::write!(f, "PAUSE"),
        }
    }
}

/// Validated duty-cycle configuration
///
/// Read-only to the state machine; mutated only through user-facing
/// fields or a persisted-settings load.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CycleConfig {
    /// Cyclic mode enabled
    pub enabled: bool,
    on_duration_s: u16,
    off_duration_s: u16,
}

impl CycleConfig {
    /// Create a cycle configuration, returns None if a duration is out
    /// of range (on 1..=30 s, off 0..=30 s)
    #[must_use]
    pub const fn new(enabled: bool, on_duration_s: u16, off_duration_s: u16) -> Option<Self> {
        if on_duration_s < ON_DURATION_MIN_S
            || on_duration_s > ON_DURATION_MAX_S
            || off_duration_s > OFF_DURATION_MAX_S
        {
            return None;
        }
        Some(Self {
            enabled,
            on_duration_s,
            off_duration_s,
        })
    }

    /// Get the "on" (transmitting) interval in seconds
    #[must_use]
    pub const fn on_duration_s(&self) -> u16 {
        self.on_duration_s
    }

    /// Get the "off" (paused) interval in seconds
    #[must_use]
    pub const fn off_duration_s(&self) -> u16 {
        self.off_duration_s
    }

    /// Cyclic mode with a real pause phase (timer-governed)
    #[must_use]
    pub const fn is_cyclic(&self) -> bool {
        self.enabled && self.off_duration_s > 0
    }

    /// Cyclic mode with no pause phase: retransmit immediately on
    /// completion
    #[must_use]
    pub const fn is_continuous(&self) -> bool {
        self.enabled && self.off_duration_s == 0
    }
}

impl Default for CycleConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            on_duration_s: ON_DURATION_MIN_S,
            off_duration_s: 0,
        }
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for CycleConfig {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(
            f,
            "Cycle(en={}, on={}s, off={}s)",
            self.enabled,
            self.on_duration_s,
            self.off_duration_s
        );
    }
}

/// Command posted to the countdown bridge
///
/// The bridge keeps only the most recent command: the control context
/// already serializes arm and cancel requests, so the newest command is
/// the whole truth and anything it superseded must not run. An `Arm`
/// replaces a countdown in flight; a `Cancel` aborts one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimerCommand {
    /// Start (or restart) the countdown for a duration in timer ticks
    Arm(u64),
    /// Abort the countdown if one is in flight
    Cancel,
}

/// Resolve the countdown the bridge should run after a command
#[must_use]
pub const fn countdown_for(command: TimerCommand) -> Option<u64> {
    match command {
        TimerCommand::Arm(ticks) => Some(ticks),
        TimerCommand::Cancel => None,
    }
}

/// Decide the next desired phase when the countdown timer expires.
///
/// This is the only logic run on behalf of the interrupt context: no
/// allocation, no blocking, no shared-state mutation. The result is
/// carried as the immutable payload of a phase-flip notification and
/// interpreted later on the control context, which re-checks its own
/// state before acting.
#[must_use]
pub const fn next_phase_flip(session_active: bool) -> bool {
    // A live session means the "on" interval just elapsed.
    !session_active
}
