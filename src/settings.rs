//! Persisted Replay Settings
//!
//! The last-used capture path and cycle parameters survive power
//! cycles as a small line-oriented text record:
//!
//! ```text
//! /CAPTURES/BEACON.C8
//! 1
//! 5
//! 10
//! ```
//!
//! Line 1 is the capture path, line 2 the cycle-enabled flag (`0`/`1`),
//! lines 3 and 4 the on/off durations in seconds. Blank lines and lines
//! starting with `#` are skipped on read, so hand-edited records may
//! carry comments. Fields are positional; missing trailing lines leave
//! the corresponding settings at their prior values. Malformed fields
//! are rejected with a parse error rather than silently defaulted.

use core::fmt::{self, Write as _};

use heapless::String;

use crate::config::{
    CONFIG_COMMENT_MARKER, CONFIG_RECORD_MAX, CONFIG_TEXT_MAX, MAX_PATH_LEN, OFF_DURATION_MAX_S,
    ON_DURATION_MAX_S, ON_DURATION_MIN_S,
};
use crate::replay::cycle::CycleConfig;

/// Which persisted field failed to parse
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SettingsField {
    /// Cycle-enabled flag (must be `0` or `1`)
    CycleEnabled,
    /// On-duration seconds (integer in 1..=30)
    OnDuration,
    /// Off-duration seconds (integer in 0..=30)
    OffDuration,
}

impl fmt::Display for SettingsField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CycleEnabled => write!(f, "cycle-enabled flag"),
            Self::OnDuration => write!(f, "on-duration"),
            Self::OffDuration => write!(f, "off-duration"),
        }
    }
}

/// Errors from loading, parsing, or saving the persisted record
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SettingsError {
    /// Record unreadable or absent; callers treat this as "no prior
    /// config"
    Read,
    /// Record could not be written back
    Write,
    /// Capture path exceeds the supported length
    PathTooLong,
    /// A field held malformed or out-of-range text
    Parse(SettingsField),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read => write!(f, "config file unreadable"),
            Self::Write => write!(f, "config file write failed"),
            Self::PathTooLong => write!(f, "capture path too long"),
            Self::Parse(field) => write!(f, "malformed {field} in config file"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for SettingsError {}

#[cfg(feature = "embedded")]
impl defmt::Format for SettingsError {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Read => defmt::write!(f, "CFG-READ"),
            Self::Write => defmt::write!(f, "CFG-WRITE"),
            Self::PathTooLong => defmt::write!(f, "CFG-PATH-LEN"),
            Self::Parse(_) => defmt::write!(f, "CFG-PARSE"),
        }
    }
}

/// Last-used capture path and cycle parameters
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct PersistedSettings {
    path: String<MAX_PATH_LEN>,
    /// Duty-cycle configuration
    pub cycle: CycleConfig,
}

impl PersistedSettings {
    /// Create settings with defaults (empty path, cyclic mode off)
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the capture file path
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Set the capture file path
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::PathTooLong`] when the path does not
    /// fit the supported length.
    pub fn set_path(&mut self, path: &str) -> Result<(), SettingsError> {
        let mut next = String::new();
        next.push_str(path).map_err(|()| SettingsError::PathTooLong)?;
        self.path = next;
        Ok(())
    }

    /// Apply a loaded record on top of the current values.
    ///
    /// The whole record is validated before anything is committed:
    /// a parse failure leaves `self` untouched.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Parse`] for malformed or out-of-range
    /// fields, [`SettingsError::PathTooLong`] for an oversized path.
    pub fn apply_text(&mut self, text: &str) -> Result<(), SettingsError> {
        let mut fields: [Option<&str>; 4] = [None; 4];
        let mut count = 0;

        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with(CONFIG_COMMENT_MARKER) {
                continue;
            }
            if count < fields.len() {
                fields[count] = Some(line);
                count += 1;
            } else {
                break;
            }
        }

        let mut next = self.clone();

        if let Some(path) = fields[0] {
            next.set_path(path)?;
        }

        let enabled = match fields[1] {
            None => next.cycle.enabled,
            Some("0") => false,
            Some("1") => true,
            Some(_) => return Err(SettingsError::Parse(SettingsField::CycleEnabled)),
        };

        let on_s = match fields[2] {
            None => next.cycle.on_duration_s(),
            Some(text) => parse_duration(text, ON_DURATION_MIN_S, ON_DURATION_MAX_S)
                .ok_or(SettingsError::Parse(SettingsField::OnDuration))?,
        };

        let off_s = match fields[3] {
            None => next.cycle.off_duration_s(),
            Some(text) => parse_duration(text, 0, OFF_DURATION_MAX_S)
                .ok_or(SettingsError::Parse(SettingsField::OffDuration))?,
        };

        next.cycle = CycleConfig::new(enabled, on_s, off_s)
            .ok_or(SettingsError::Parse(SettingsField::OnDuration))?;

        *self = next;
        Ok(())
    }

    /// Render the record: exactly four fields, each newline-terminated
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Write`] when the rendered record
    /// exceeds the output buffer.
    pub fn render(&self) -> Result<String<CONFIG_TEXT_MAX>, SettingsError> {
        let mut out = String::new();
        write!(
            out,
            "{}\n{}\n{}\n{}\n",
            self.path,
            u8::from(self.cycle.enabled),
            self.cycle.on_duration_s(),
            self.cycle.off_duration_s()
        )
        .map_err(|_| SettingsError::Write)?;
        Ok(out)
    }
}

fn parse_duration(text: &str, min_s: u16, max_s: u16) -> Option<u16> {
    let value: u16 = text.parse().ok()?;
    if value < min_s || value > max_s {
        return None;
    }
    Some(value)
}

/// Storage seam for the persisted record
pub trait SettingsStorage {
    /// Read the whole record
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Read`] when the record is absent,
    /// unreadable, or oversized.
    fn load(&mut self) -> Result<String<CONFIG_RECORD_MAX>, SettingsError>;

    /// Overwrite the record
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Write`] on storage failure.
    fn store(&mut self, text: &str) -> Result<(), SettingsError>;
}

/// Loads and saves [`PersistedSettings`] through a storage backend
pub struct SettingsStore<S> {
    storage: S,
}

impl<S: SettingsStorage> SettingsStore<S> {
    /// Create a store over a storage backend
    pub const fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Load the record into `settings`.
    ///
    /// Returns `Ok(false)` when no prior record exists (absent or
    /// unreadable storage is not an error to the caller).
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Parse`] or
    /// [`SettingsError::PathTooLong`] for a present but malformed
    /// record.
    pub fn load_into(&mut self, settings: &mut PersistedSettings) -> Result<bool, SettingsError> {
        match self.storage.load() {
            Ok(text) => {
                settings.apply_text(&text)?;
                Ok(true)
            }
            Err(SettingsError::Read) => Ok(false),
            Err(other) => Err(other),
        }
    }

    /// Render and write the record
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Write`] on render or storage failure.
    pub fn save(&mut self, settings: &PersistedSettings) -> Result<(), SettingsError> {
        let text = settings.render()?;
        self.storage.store(&text)
    }
}

/// Filesystem-backed settings storage (host builds)
#[cfg(feature = "std")]
pub struct FsStorage {
    path: std::path::PathBuf,
}

#[cfg(feature = "std")]
impl FsStorage {
    /// Create storage backed by a file path
    pub fn new(path: impl Into<std::path::PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[cfg(feature = "std")]
impl SettingsStorage for FsStorage {
    fn load(&mut self) -> Result<String<CONFIG_RECORD_MAX>, SettingsError> {
        let text = std::fs::read_to_string(&self.path).map_err(|_| SettingsError::Read)?;
        let mut out = String::new();
        out.push_str(&text).map_err(|()| SettingsError::Read)?;
        Ok(out)
    }

    fn store(&mut self, text: &str) -> Result<(), SettingsError> {
        std::fs::write(&self.path, text).map_err(|_| SettingsError::Write)
    }
}
