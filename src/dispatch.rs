//! Event Dispatch and Cycle-Timer Bridge
//!
//! All notifications the controller consumes are serialized onto one
//! single-consumer queue drained by the control task. This is the only
//! synchronization primitive in the system: the streaming worker, the
//! timer interrupt, and user input all post here, and the controller
//! never takes a lock.
//!
//! The cycle-timer expiry runs in interrupt context. The hook below
//! performs no allocation, no blocking call, and no shared-state
//! mutation: it derives the desired next phase from the session-active
//! mirror and enqueues an immutable flag. The controller re-checks its
//! own state when the notification is finally delivered, so a flip that
//! no longer applies is safely ignored.

use core::sync::atomic::{AtomicBool, Ordering};

use embassy_futures::select::{select, Either};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;
use embassy_time::{Duration, Timer};

use crate::config::{CYCLE_TIMER_TICK_HZ, EVENT_QUEUE_DEPTH};
use crate::replay::controller::ReplayEvent;
use crate::replay::cycle::{countdown_for, next_phase_flip, TimerCommand};
use crate::types::ReplayOutcome;

static EVENTS: Channel<CriticalSectionRawMutex, ReplayEvent, EVENT_QUEUE_DEPTH> = Channel::new();

/// Mirror of "a streaming session exists", readable from interrupt
/// context. The platform backend updates it on open/teardown.
static SESSION_ACTIVE: AtomicBool = AtomicBool::new(false);

/// Latest-wins command slot for the countdown task. A single slot
/// (not a queue): arm and cancel requests are serialized on the
/// control context, so a superseded command must never run, even when
/// several are posted before the countdown task is next polled.
static TIMER_COMMAND: Signal<CriticalSectionRawMutex, TimerCommand> = Signal::new();

/// Receive the next notification (control task only)
pub async fn next_event() -> ReplayEvent {
    EVENTS.receive().await
}

/// Post a user toggle request
pub fn post_toggle() {
    let _ = EVENTS.try_send(ReplayEvent::Toggle);
}

/// Post the session's one final outcome (worker context)
pub fn post_session_done(outcome: ReplayOutcome) {
    let _ = EVENTS.try_send(ReplayEvent::SessionDone(outcome));
}

/// Post a fill request from the transmit pipeline
pub fn post_buffer_ready() {
    let _ = EVENTS.try_send(ReplayEvent::BufferReady);
}

/// Post a bytes-consumed progress report
pub fn post_progress(bytes: u32) {
    let _ = EVENTS.try_send(ReplayEvent::Progress(bytes));
}

/// Update the session-active mirror (platform backend only)
pub fn set_session_active(active: bool) {
    SESSION_ACTIVE.store(active, Ordering::Release);
}

/// Interrupt-context hook for the cycle-timer expiry.
///
/// Enqueues exactly one phase-flip notification carrying the desired
/// next phase. Never blocks; a full queue drops the flip, which the
/// next expiry recovers.
pub fn on_cycle_timer_expired() {
    let transmit = next_phase_flip(SESSION_ACTIVE.load(Ordering::Acquire));
    let _ = EVENTS.try_send(ReplayEvent::PhaseFlip { transmit });
}

/// Arm the countdown for an absolute duration in timer ticks,
/// replacing any previous arming or countdown in flight
pub fn arm_cycle_timer(ticks: u64) {
    TIMER_COMMAND.signal(TimerCommand::Arm(ticks));
}

/// Cancel the countdown if armed; a no-op otherwise.
///
/// A cancel racing the expiry resolves to at most one delivered flip:
/// the countdown task commits to exactly one `select` branch.
pub fn disarm_cycle_timer() {
    TIMER_COMMAND.signal(TimerCommand::Cancel);
}

/// Countdown task bridging the timer to the event queue.
///
/// While a countdown is in flight the task selects over the expiry
/// and the command slot, so a newer arm restarts the countdown and a
/// cancel aborts it. No countdown outlives the command that replaced
/// it.
#[embassy_executor::task]
pub async fn cycle_timer_task() {
    let mut pending: Option<u64> = None;
    loop {
        let command = match pending {
            None => TIMER_COMMAND.wait().await,
            Some(ticks) => {
                match select(Timer::after(ticks_to_duration(ticks)), TIMER_COMMAND.wait()).await {
                    Either::First(()) => {
                        pending = None;
                        on_cycle_timer_expired();
                        continue;
                    }
                    Either::Second(command) => command,
                }
            }
        };
        pending = countdown_for(command);
    }
}

const fn ticks_to_duration(ticks: u64) -> Duration {
    Duration::from_micros(ticks.saturating_mul(1_000_000) / CYCLE_TIMER_TICK_HZ as u64)
}
