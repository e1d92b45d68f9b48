//! Sidecar Capture Metadata
//!
//! A capture file may be accompanied by a small text sidecar recording
//! the center frequency and sample rate used at record time:
//!
//! ```text
//! center_frequency=433920000
//! sample_rate=500000
//! ```
//!
//! The sidecar is optional and hand-editable: unknown keys and
//! malformed lines are ignored. A zero center frequency means
//! "unspecified" and resolves to the currently tuned frequency.

use crate::config::DEFAULT_SAMPLE_RATE;
use crate::types::Frequency;

/// Original record-time parameters for a capture file
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CaptureMetadata {
    /// Center frequency at record time; None when unspecified
    pub center_frequency: Option<Frequency>,
    /// Sample rate at record time; None when unspecified
    pub sample_rate: Option<u32>,
}

impl CaptureMetadata {
    /// Parse a sidecar record
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let mut meta = Self::default();

        for line in text.lines() {
            let line = line.trim();
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            match key.trim() {
                "center_frequency" => {
                    meta.center_frequency = value
                        .trim()
                        .parse::<u64>()
                        .ok()
                        .filter(|&hz| hz != 0)
                        .and_then(Frequency::from_hz);
                }
                "sample_rate" => {
                    meta.sample_rate = value.trim().parse().ok();
                }
                _ => {}
            }
        }

        meta
    }

    /// Center frequency for replay, falling back to the tuned frequency
    #[must_use]
    pub fn center_or(&self, tuned: Frequency) -> Frequency {
        self.center_frequency.unwrap_or(tuned)
    }

    /// Sample rate for replay, falling back to the stock default
    #[must_use]
    pub fn sample_rate_or_default(&self) -> u32 {
        self.sample_rate.unwrap_or(DEFAULT_SAMPLE_RATE)
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for CaptureMetadata {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(
            f,
            "Meta(cf={}, sr={})",
            self.center_frequency,
            self.sample_rate
        );
    }
}
