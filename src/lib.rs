//! IQ Replay Transmit Firmware Library
//!
//! This library provides the transmit-session and cyclic-control core
//! for file-based signal replay on a software-defined-radio handheld.
//! A recorded IQ capture is streamed to the transmit pipeline, optionally
//! repeated in a duty-cycled on/off pattern driven by a hardware timer.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    APPLICATION LAYER                         │
//! │  Replay Controller  │  Persisted Settings  │  Metadata       │
//! ├─────────────────────────────────────────────────────────────┤
//! │                   DISPATCH / EVENT LAYER                     │
//! │  Single-consumer event queue  │  Cycle-timer ISR bridge      │
//! ├─────────────────────────────────────────────────────────────┤
//! │                    PLATFORM BACKEND                          │
//! │  Streaming session worker  │  Transmit pipeline  │  Timer    │
//! ├─────────────────────────────────────────────────────────────┤
//! │                    RTOS / SCHEDULER                          │
//! │           embassy-rs (async/await executor)                  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Design Principles
//!
//! - **Single source of truth**: one `CyclePhase` plus one armed flag,
//!   owned by the controller instance; no free-floating state flags
//! - **Table-driven transitions**: (phase, event) maps to a next phase
//!   and an action list; no recursive re-entry through `toggle`
//! - **Lock-free control context**: every notification is delivered one
//!   at a time on one logical context; interrupt handlers only enqueue
//! - **No unsafe in application code**: all unsafe isolated in the
//!   platform backend
//! - **Explicit error handling**: all fallible operations return `Result`

#![cfg_attr(feature = "embedded", no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

// Re-export dependencies needed by applications (only in embedded mode)
#[cfg(feature = "embedded")]
pub use embassy_executor;
#[cfg(feature = "embedded")]
pub use embassy_stm32;
#[cfg(feature = "embedded")]
pub use embassy_time;

/// Replay Control Logic
///
/// The transmit-session state machine, cyclic phase handling, and the
/// platform backend seam.
pub mod replay;

/// Persisted Settings
///
/// Line-oriented record holding the last-used capture path and cycle
/// parameters.
pub mod settings;

/// Sidecar Capture Metadata
///
/// Optional per-capture record of the original center frequency and
/// sample rate.
pub mod metadata;

/// Event Dispatch
///
/// Single-consumer notification queue and the cycle-timer interrupt
/// bridge.
#[cfg(feature = "embedded")]
pub mod dispatch;

/// Shared types used across modules
pub mod types;

/// System configuration and constants
pub mod config;

/// Prelude module for common imports
#[cfg(feature = "embedded")]
pub mod prelude {
    //! Convenient re-exports for common types and traits.

    pub use crate::config::*;
    pub use crate::replay::controller::{ReplayController, ReplayEvent};
    pub use crate::replay::cycle::{CycleConfig, CyclePhase};
    pub use crate::types::*;

    // Embassy
    pub use embassy_time::{Duration, Instant, Timer};

    // Error handling
    pub use core::result::Result;

    // Logging
    pub use defmt::{debug, error, info, trace, warn};
}
