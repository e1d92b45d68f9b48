//! System configuration and replay constants
//!
//! Compile-time constants for the replay transmit core. Chunking
//! geometry, persisted-record location, and cycle bounds are
//! centralized here.

/// Bytes read from the capture file per streaming chunk
pub const READ_CHUNK_SIZE: usize = 16_384;

/// Number of chunk buffers in the bounded producer pool
pub const CHUNK_DEPTH: usize = 3;

/// On-disk location of the persisted last-used configuration record
pub const CONFIG_FILE_PATH: &str = "/SIGGEN/CONFIG.TXT";

/// Comment marker for hand-edited configuration records
pub const CONFIG_COMMENT_MARKER: char = '#';

/// Maximum capture file path length in bytes
pub const MAX_PATH_LEN: usize = 256;

/// Maximum rendered size of the persisted configuration record
pub const CONFIG_TEXT_MAX: usize = 320;

/// Maximum accepted size of a (possibly hand-edited) configuration
/// record on load, comments included
pub const CONFIG_RECORD_MAX: usize = 1_024;

/// Minimum cyclic "on" (transmitting) duration in seconds
pub const ON_DURATION_MIN_S: u16 = 1;

/// Maximum cyclic "on" (transmitting) duration in seconds
pub const ON_DURATION_MAX_S: u16 = 30;

/// Maximum cyclic "off" (paused) duration in seconds; zero means
/// continuous retransmission with no pause phase
pub const OFF_DURATION_MAX_S: u16 = 30;

/// Hardware countdown-timer tick rate
pub const CYCLE_TIMER_TICK_HZ: u32 = 1_000;

/// Depth of the single-consumer notification queue
pub const EVENT_QUEUE_DEPTH: usize = 8;

/// Default transmit center frequency (GPS L1, matching the stock
/// signal-generator image)
pub const DEFAULT_FREQUENCY_HZ: u64 = 1_575_420_000;

/// Default capture sample rate when no sidecar metadata is present
pub const DEFAULT_SAMPLE_RATE: u32 = 2_600_000;

/// Baseband filter bandwidth used while replaying
pub const BASEBAND_BANDWIDTH_HZ: u32 = 1_750_000;

/// Upper bound of the handheld's tuning range
pub const MAX_FREQUENCY_HZ: u64 = 7_200_000_000;

/// Convert whole seconds to cycle-timer ticks
#[must_use]
pub const fn seconds_to_ticks(seconds: u16) -> u64 {
    seconds as u64 * CYCLE_TIMER_TICK_HZ as u64
}
