//! Replay Control Logic
//!
//! State machine and business logic for file-based transmit replay.
//! Implements the functional core of the cyclic transmit feature.

pub mod controller;
pub mod cycle;
pub mod session;
