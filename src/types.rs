//! Shared types used across the replay firmware
//!
//! Domain-specific types that enforce invariants at compile time and
//! provide type safety throughout the codebase.

use core::fmt;

use crate::config::MAX_FREQUENCY_HZ;

/// Frequency in Hertz with validation
///
/// Represents a valid tuning frequency within the handheld's supported
/// range. The frequency is stored in Hz for precision.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Frequency(u64);

impl Frequency {
    /// Maximum supported frequency
    pub const MAX_HZ: u64 = MAX_FREQUENCY_HZ;

    /// Create a new Frequency from Hz, returns None if out of range
    #[must_use]
    pub const fn from_hz(hz: u64) -> Option<Self> {
        if hz <= Self::MAX_HZ {
            Some(Self(hz))
        } else {
            None
        }
    }

    /// Create a new Frequency from kHz
    #[must_use]
    pub const fn from_khz(khz: u64) -> Option<Self> {
        Self::from_hz(khz * 1000)
    }

    /// Get the frequency in Hz
    #[must_use]
    pub const fn as_hz(self) -> u64 {
        self.0
    }

    /// Get the frequency in kHz (truncated)
    #[must_use]
    pub const fn as_khz(self) -> u64 {
        self.0 / 1000
    }

    /// Get the frequency in MHz as floating point
    #[must_use]
    pub fn as_mhz_f64(self) -> f64 {
        self.0 as f64 / 1_000_000.0
    }
}

impl fmt::Debug for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Frequency({} Hz)", self.0)
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} Hz", self.0)
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for Frequency {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "{} Hz", self.0);
    }
}

/// Final report posted exactly once per streaming session
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReplayOutcome {
    /// The capture file was streamed to the end
    EndOfFile,
    /// The reader failed mid-stream
    ReadError,
}

#[cfg(feature = "embedded")]
impl defmt::Format for ReplayOutcome {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::EndOfFile => defmt::write!(f, "EOF"),
            Self::ReadError => defmt::write!(f, "READ-ERR"),
        }
    }
}

/// Errors surfaced to the user by the replay core
///
/// Session-level failures are recovered locally (state rolls back to
/// Idle); only the outward-facing variant is reported.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReplayError {
    /// The capture file could not be opened; no session was created
    FileOpen,
    /// The session failed mid-stream; session torn down, timer disarmed
    StreamRead,
}

impl fmt::Display for ReplayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FileOpen => write!(f, "file open error"),
            Self::StreamRead => write!(f, "file read error"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ReplayError {}

#[cfg(feature = "embedded")]
impl defmt::Format for ReplayError {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::FileOpen => defmt::write!(f, "FILE-OPEN"),
            Self::StreamRead => defmt::write!(f, "STREAM-READ"),
        }
    }
}
