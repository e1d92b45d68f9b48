//! Streaming Session Contract
//!
//! The controller owns at most one streaming session at a time. The
//! session itself (file reader, chunk pool, worker context) is provided
//! by the platform behind the [`ReplayBackend`] trait; this module
//! specifies the seam, not the implementation.

use core::sync::atomic::{AtomicBool, Ordering};

use crate::settings::PersistedSettings;
use crate::types::ReplayError;

/// Consumer-to-producer backpressure flag
///
/// The transmit pipeline sets the flag to request the next chunk fill;
/// the producer clears it when the fill is underway. A copyable handle
/// over static storage so the worker context can hold it for the
/// session's whole lifetime.
#[derive(Clone, Copy, Debug)]
pub struct ReadySignal {
    flag: &'static AtomicBool,
}

impl ReadySignal {
    /// Create a handle over statically allocated storage
    #[must_use]
    pub const fn new(flag: &'static AtomicBool) -> Self {
        Self { flag }
    }

    /// Request the next chunk fill
    pub fn set(&self) {
        self.flag.store(true, Ordering::Release);
    }

    /// Reset the request (session stopped or torn down)
    pub fn clear(&self) {
        self.flag.store(false, Ordering::Release);
    }

    /// Check whether a fill has been requested
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }
}

/// Parameters for opening a streaming session
#[derive(Clone, Copy, Debug)]
pub struct SessionRequest<'a> {
    /// Capture file to stream
    pub path: &'a str,
    /// Bytes per chunk read from the capture
    pub chunk_size: usize,
    /// Number of chunk buffers in the bounded pool
    pub chunk_depth: usize,
    /// Backpressure flag the producer blocks on
    pub ready: ReadySignal,
}

/// Platform seam for the replay controller
///
/// One implementation per platform wires the controller to the
/// streaming worker, the transmit pipeline, the hardware countdown
/// timer, and persistent storage.
///
/// # Session ownership
///
/// `Session` is whatever owned value represents one run of streaming a
/// file through the transmit pipeline. Dropping it must synchronously
/// halt production, join the worker context, and release the
/// ready-signal coupling: once the drop returns, no further
/// notification may reference the destroyed session.
pub trait ReplayBackend {
    /// Owned handle for one streaming run; Drop tears it down
    type Session;

    /// Open the capture and start the chunked producer.
    ///
    /// On failure no session exists and no partial state may remain.
    fn open_session(&mut self, request: &SessionRequest<'_>)
        -> Result<Self::Session, ReplayError>;

    /// Enable or disable the transmit pipeline output
    fn set_transmit(&mut self, enabled: bool);

    /// Arm the hardware countdown timer for an absolute duration in
    /// timer ticks, replacing any previous arming
    fn arm_timer(&mut self, ticks: u64);

    /// Cancel the countdown timer if armed.
    ///
    /// Must be safe to call when the timer was never armed or has
    /// already fired. A cancel racing the hardware expiry must resolve
    /// to at most one delivered phase-flip notification.
    fn disarm_timer(&mut self);

    /// Persist the last-used capture path and cycle parameters
    ///
    /// # Errors
    ///
    /// Returns a settings error when the record cannot be written; the
    /// controller treats this as non-fatal and logs it.
    fn save_config(&mut self, settings: &PersistedSettings) -> Result<(), crate::settings::SettingsError>;
}
