//! Replay Transmit Controller
//!
//! The state machine that decides when to start or stop a streaming
//! replay session, how it reacts to completion and error reports, and
//! how timer-driven phase flips move the system between transmitting
//! and paused without racing session teardown.
//!
//! Transitions are table-driven: [`plan`] maps (current phase, event)
//! to a next phase and an ordered action list, and the controller
//! executes the actions against the platform backend. There is no
//! recursive re-entry through [`ReplayController::toggle`], and no
//! state flag outside the controller instance.

use heapless::Vec;

use crate::config::{seconds_to_ticks, CHUNK_DEPTH, READ_CHUNK_SIZE};
use crate::replay::cycle::{CycleConfig, CyclePhase};
use crate::replay::session::{ReadySignal, ReplayBackend, SessionRequest};
use crate::settings::PersistedSettings;
use crate::types::{ReplayError, ReplayOutcome};

/// Notification consumed by the controller
///
/// All variants are delivered one at a time, in post order, on the
/// control context. The phase-flip variant originates in interrupt
/// context and is marshalled through the event queue before the
/// controller sees it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReplayEvent {
    /// User pressed the play/stop control
    Toggle,
    /// The streaming session posted its one final outcome
    SessionDone(ReplayOutcome),
    /// The transmit pipeline requests the next chunk fill
    BufferReady,
    /// Periodic report of bytes consumed by the pipeline
    Progress(u32),
    /// The cycle timer expired; `transmit` carries the desired phase
    PhaseFlip {
        /// True to enter the "on" interval, false to pause
        transmit: bool,
    },
}

#[cfg(feature = "embedded")]
impl defmt::Format for ReplayEvent {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Toggle => defmt::write!(f, "Toggle"),
            Self::SessionDone(outcome) => defmt::write!(f, "Done({})", outcome),
            Self::BufferReady => defmt::write!(f, "BufferReady"),
            Self::Progress(bytes) => defmt::write!(f, "Progress({})", bytes),
            Self::PhaseFlip { transmit } => defmt::write!(f, "Flip(tx={})", transmit),
        }
    }
}

/// One step of a planned transition, executed in order
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Action {
    /// Persist the current path and cycle settings
    SaveConfig,
    /// Arm the cycle timer for the "on" duration
    ArmOn,
    /// Arm the cycle timer for the "off" duration
    ArmOff,
    /// Cancel the cycle timer if armed
    Disarm,
    /// Open a streaming session for the current capture
    OpenSession,
    /// Drop the owned session, joining the worker
    CloseSession,
    /// Enable the transmit pipeline output
    EnableTx,
    /// Disable the transmit pipeline output
    DisableTx,
    /// Reset the ready (fill-request) signal
    ClearReady,
    /// Reset the progress indicator to zero
    ClearProgress,
}

pub(crate) type Actions = Vec<Action, 8>;

/// Transition table: (phase, event) to (next phase, action list).
///
/// Pure; the caller supplies the current session existence and the
/// read-only cycle configuration. `BufferReady` and `Progress` never
/// reach this table.
pub(crate) fn plan(
    phase: CyclePhase,
    session_active: bool,
    cycle: CycleConfig,
    loop_enabled: bool,
    event: ReplayEvent,
) -> (CyclePhase, Actions) {
    let mut actions = Actions::new();
    let mut push = |list: &mut Actions, action: Action| {
        // Capacity is sized for the longest sequence below.
        let _ = list.push(action);
    };

    match event {
        ReplayEvent::Toggle => {
            if session_active || phase != CyclePhase::Idle {
                // Stop everything: disarm before teardown so a flip
                // cannot land mid-way through it.
                push(&mut actions, Action::Disarm);
                push(&mut actions, Action::DisableTx);
                push(&mut actions, Action::CloseSession);
                push(&mut actions, Action::ClearReady);
                (CyclePhase::Idle, actions)
            } else {
                push(&mut actions, Action::SaveConfig);
                if cycle.is_cyclic() {
                    // Arm-and-start sequence for the "on" phase.
                    push(&mut actions, Action::ArmOn);
                }
                push(&mut actions, Action::OpenSession);
                push(&mut actions, Action::EnableTx);
                (CyclePhase::Transmitting, actions)
            }
        }

        ReplayEvent::SessionDone(ReplayOutcome::EndOfFile) => {
            push(&mut actions, Action::ClearProgress);
            if cycle.is_cyclic() {
                // The already-armed timer governs the next transition.
                push(&mut actions, Action::DisableTx);
                push(&mut actions, Action::CloseSession);
                push(&mut actions, Action::ClearReady);
                (phase, actions)
            } else if cycle.is_continuous() || (!cycle.enabled && loop_enabled) {
                // Immediate restart, no Idle-visible state in between.
                push(&mut actions, Action::CloseSession);
                push(&mut actions, Action::OpenSession);
                push(&mut actions, Action::EnableTx);
                (CyclePhase::Transmitting, actions)
            } else {
                push(&mut actions, Action::DisableTx);
                push(&mut actions, Action::CloseSession);
                push(&mut actions, Action::ClearReady);
                (CyclePhase::Idle, actions)
            }
        }

        ReplayEvent::SessionDone(ReplayOutcome::ReadError) => {
            push(&mut actions, Action::ClearProgress);
            push(&mut actions, Action::Disarm);
            push(&mut actions, Action::DisableTx);
            push(&mut actions, Action::CloseSession);
            push(&mut actions, Action::ClearReady);
            (CyclePhase::Idle, actions)
        }

        ReplayEvent::PhaseFlip { transmit } => {
            if phase == CyclePhase::Idle || !cycle.is_cyclic() || transmit == session_active {
                // Stale flip: the user stopped, the mode changed, or
                // the flip no longer matches the session state. Acting
                // on it could create a second session.
                (phase, actions)
            } else if transmit {
                push(&mut actions, Action::ArmOn);
                push(&mut actions, Action::OpenSession);
                push(&mut actions, Action::EnableTx);
                (CyclePhase::Transmitting, actions)
            } else {
                push(&mut actions, Action::ArmOff);
                push(&mut actions, Action::DisableTx);
                push(&mut actions, Action::CloseSession);
                push(&mut actions, Action::ClearReady);
                (CyclePhase::Paused, actions)
            }
        }

        // Handled directly by the controller, never planned.
        ReplayEvent::BufferReady | ReplayEvent::Progress(_) => (phase, actions),
    }
}

/// Owns the streaming session slot, the cycle state, and the timer
/// arming flag; drives the platform backend from planned transitions.
pub struct ReplayController<B: ReplayBackend> {
    backend: B,
    settings: PersistedSettings,
    loop_enabled: bool,
    phase: CyclePhase,
    timer_armed: bool,
    session: Option<B::Session>,
    ready: ReadySignal,
    progress_bytes: u32,
}

impl<B: ReplayBackend> ReplayController<B> {
    /// Create an idle controller over a platform backend
    pub fn new(backend: B, ready: ReadySignal) -> Self {
        Self {
            backend,
            settings: PersistedSettings::new(),
            loop_enabled: false,
            phase: CyclePhase::Idle,
            timer_armed: false,
            session: None,
            ready,
            progress_bytes: 0,
        }
    }

    /// Current cyclic phase
    #[must_use]
    pub const fn phase(&self) -> CyclePhase {
        self.phase
    }

    /// A streaming session exists right now
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.session.is_some()
    }

    /// The cycle timer is armed
    #[must_use]
    pub const fn timer_armed(&self) -> bool {
        self.timer_armed
    }

    /// Bytes consumed by the pipeline in the current session
    #[must_use]
    pub const fn progress_bytes(&self) -> u32 {
        self.progress_bytes
    }

    /// The backpressure signal shared with the producer
    #[must_use]
    pub const fn ready(&self) -> ReadySignal {
        self.ready
    }

    /// Current settings (capture path and cycle configuration)
    #[must_use]
    pub const fn settings(&self) -> &PersistedSettings {
        &self.settings
    }

    /// Mutable settings access for user-facing fields and config load
    pub fn settings_mut(&mut self) -> &mut PersistedSettings {
        &mut self.settings
    }

    /// Replace the settings wholesale (load-last-config)
    pub fn apply_settings(&mut self, settings: PersistedSettings) {
        self.settings = settings;
    }

    /// Legacy loop flag: restart on natural completion in non-cyclic
    /// mode. Ignored while cyclic mode is enabled.
    pub fn set_loop_enabled(&mut self, enabled: bool) {
        self.loop_enabled = enabled;
    }

    /// Whether the legacy loop flag is set
    #[must_use]
    pub const fn loop_enabled(&self) -> bool {
        self.loop_enabled
    }

    /// Borrow the platform backend
    #[must_use]
    pub const fn backend(&self) -> &B {
        &self.backend
    }

    /// Mutably borrow the platform backend
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Single externally-driven entry point: start a replay from Idle,
    /// or stop everything and return to Idle.
    ///
    /// # Errors
    ///
    /// Returns [`ReplayError::FileOpen`] when the capture cannot be
    /// opened; the controller is back at Idle with nothing armed.
    pub fn toggle(&mut self) -> Result<(), ReplayError> {
        self.handle(ReplayEvent::Toggle)
    }

    /// Dispatch one notification.
    ///
    /// # Errors
    ///
    /// Returns [`ReplayError::FileOpen`] when a planned session open
    /// fails, and [`ReplayError::StreamRead`] for a mid-stream failure
    /// report; both leave the controller at Idle with the timer
    /// disarmed.
    pub fn handle(&mut self, event: ReplayEvent) -> Result<(), ReplayError> {
        match event {
            ReplayEvent::BufferReady => {
                self.ready.set();
                Ok(())
            }
            ReplayEvent::Progress(bytes) => {
                self.progress_bytes = bytes;
                Ok(())
            }
            _ => {
                let (next, actions) = plan(
                    self.phase,
                    self.session.is_some(),
                    self.settings.cycle,
                    self.loop_enabled,
                    event,
                );
                self.execute(next, &actions)?;
                if event == ReplayEvent::SessionDone(ReplayOutcome::ReadError) {
                    log::error!("replay session failed mid-stream");
                    return Err(ReplayError::StreamRead);
                }
                Ok(())
            }
        }
    }

    /// Stop everything and return to Idle; safe to call repeatedly.
    pub fn shutdown(&mut self) {
        self.disarm();
        self.backend.set_transmit(false);
        self.session = None;
        self.ready.clear();
        self.phase = CyclePhase::Idle;
    }

    fn execute(&mut self, next: CyclePhase, actions: &[Action]) -> Result<(), ReplayError> {
        for action in actions {
            match action {
                Action::SaveConfig => {
                    if self.settings.path().is_empty() {
                        log::debug!("no capture selected, skipping config save");
                    } else if let Err(err) = self.backend.save_config(&self.settings) {
                        log::warn!("config save failed: {err}");
                    }
                }
                Action::ArmOn => {
                    self.backend
                        .arm_timer(seconds_to_ticks(self.settings.cycle.on_duration_s()));
                    self.timer_armed = true;
                }
                Action::ArmOff => {
                    self.backend
                        .arm_timer(seconds_to_ticks(self.settings.cycle.off_duration_s()));
                    self.timer_armed = true;
                }
                Action::Disarm => self.disarm(),
                Action::OpenSession => {
                    let request = SessionRequest {
                        path: self.settings.path(),
                        chunk_size: READ_CHUNK_SIZE,
                        chunk_depth: CHUNK_DEPTH,
                        ready: self.ready,
                    };
                    match self.backend.open_session(&request) {
                        Ok(session) => {
                            log::info!("replay session opened: {}", request.path);
                            self.session = Some(session);
                        }
                        Err(_) => {
                            // No error may leave a session or timer
                            // half-armed: roll everything back to Idle.
                            self.shutdown();
                            return Err(ReplayError::FileOpen);
                        }
                    }
                }
                Action::CloseSession => {
                    // Drop joins the worker before returning.
                    self.session = None;
                }
                Action::EnableTx => self.backend.set_transmit(true),
                Action::DisableTx => self.backend.set_transmit(false),
                Action::ClearReady => self.ready.clear(),
                Action::ClearProgress => self.progress_bytes = 0,
            }
        }
        self.phase = next;
        Ok(())
    }

    /// Cancel-if-armed; a no-op when the timer was never armed.
    fn disarm(&mut self) {
        if self.timer_armed {
            self.backend.disarm_timer();
            self.timer_armed = false;
        }
    }
}

impl<B: ReplayBackend> Drop for ReplayController<B> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cyclic() -> CycleConfig {
        CycleConfig::new(true, 5, 10).unwrap()
    }

    fn continuous() -> CycleConfig {
        CycleConfig::new(true, 5, 0).unwrap()
    }

    fn plain() -> CycleConfig {
        CycleConfig::default()
    }

    #[test]
    fn toggle_from_idle_plain_start() {
        let (next, actions) = plan(CyclePhase::Idle, false, plain(), false, ReplayEvent::Toggle);
        assert_eq!(next, CyclePhase::Transmitting);
        assert_eq!(
            actions.as_slice(),
            [Action::SaveConfig, Action::OpenSession, Action::EnableTx]
        );
    }

    #[test]
    fn toggle_from_idle_cyclic_arms_first() {
        let (next, actions) = plan(CyclePhase::Idle, false, cyclic(), false, ReplayEvent::Toggle);
        assert_eq!(next, CyclePhase::Transmitting);
        assert_eq!(
            actions.as_slice(),
            [
                Action::SaveConfig,
                Action::ArmOn,
                Action::OpenSession,
                Action::EnableTx
            ]
        );
    }

    #[test]
    fn toggle_while_active_stops_everything() {
        let (next, actions) = plan(
            CyclePhase::Transmitting,
            true,
            cyclic(),
            false,
            ReplayEvent::Toggle,
        );
        assert_eq!(next, CyclePhase::Idle);
        assert_eq!(
            actions.as_slice(),
            [
                Action::Disarm,
                Action::DisableTx,
                Action::CloseSession,
                Action::ClearReady
            ]
        );
    }

    #[test]
    fn toggle_while_paused_stops_everything() {
        // Paused phase has no session but is still logically active.
        let (next, actions) = plan(CyclePhase::Paused, false, cyclic(), false, ReplayEvent::Toggle);
        assert_eq!(next, CyclePhase::Idle);
        assert!(actions.contains(&Action::Disarm));
    }

    #[test]
    fn end_of_file_continuous_restarts_in_place() {
        let (next, actions) = plan(
            CyclePhase::Transmitting,
            true,
            continuous(),
            false,
            ReplayEvent::SessionDone(ReplayOutcome::EndOfFile),
        );
        assert_eq!(next, CyclePhase::Transmitting);
        assert_eq!(
            actions.as_slice(),
            [
                Action::ClearProgress,
                Action::CloseSession,
                Action::OpenSession,
                Action::EnableTx
            ]
        );
    }

    #[test]
    fn end_of_file_cyclic_waits_for_timer() {
        let (next, actions) = plan(
            CyclePhase::Transmitting,
            true,
            cyclic(),
            false,
            ReplayEvent::SessionDone(ReplayOutcome::EndOfFile),
        );
        assert_eq!(next, CyclePhase::Transmitting);
        assert!(!actions.contains(&Action::OpenSession));
        assert!(!actions.contains(&Action::Disarm));
        // A pending fill request must not leak into the session the
        // next timer flip opens.
        assert!(actions.contains(&Action::ClearReady));
    }

    #[test]
    fn end_of_file_loop_flag_restarts() {
        let (next, actions) = plan(
            CyclePhase::Transmitting,
            true,
            plain(),
            true,
            ReplayEvent::SessionDone(ReplayOutcome::EndOfFile),
        );
        assert_eq!(next, CyclePhase::Transmitting);
        assert!(actions.contains(&Action::OpenSession));
    }

    #[test]
    fn read_error_disarms_and_idles() {
        for phase in [CyclePhase::Transmitting, CyclePhase::Paused] {
            let (next, actions) = plan(
                phase,
                phase == CyclePhase::Transmitting,
                cyclic(),
                false,
                ReplayEvent::SessionDone(ReplayOutcome::ReadError),
            );
            assert_eq!(next, CyclePhase::Idle);
            assert!(actions.contains(&Action::Disarm));
            assert!(actions.contains(&Action::ClearProgress));
        }
    }

    #[test]
    fn stale_flip_is_a_no_op() {
        let (next, actions) = plan(
            CyclePhase::Idle,
            false,
            cyclic(),
            false,
            ReplayEvent::PhaseFlip { transmit: true },
        );
        assert_eq!(next, CyclePhase::Idle);
        assert!(actions.is_empty());
    }

    #[test]
    fn flip_matching_session_state_is_stale() {
        // A queued start-flip delivered while a session already exists
        // must not open a second one.
        let (next, actions) = plan(
            CyclePhase::Transmitting,
            true,
            cyclic(),
            false,
            ReplayEvent::PhaseFlip { transmit: true },
        );
        assert_eq!(next, CyclePhase::Transmitting);
        assert!(actions.is_empty());
    }

    #[test]
    fn flip_to_pause_rearms_for_off_interval() {
        let (next, actions) = plan(
            CyclePhase::Transmitting,
            true,
            cyclic(),
            false,
            ReplayEvent::PhaseFlip { transmit: false },
        );
        assert_eq!(next, CyclePhase::Paused);
        assert_eq!(actions[0], Action::ArmOff);
    }

    #[test]
    fn flip_to_transmit_rearms_for_on_interval() {
        let (next, actions) = plan(
            CyclePhase::Paused,
            false,
            cyclic(),
            false,
            ReplayEvent::PhaseFlip { transmit: true },
        );
        assert_eq!(next, CyclePhase::Transmitting);
        assert_eq!(actions[0], Action::ArmOn);
        assert!(actions.contains(&Action::OpenSession));
    }
}
