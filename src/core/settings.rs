//! Validated logging configuration

use super::error::{MacroLogError, Result};
use super::level::MAX_THRESHOLD;
use crate::host::ConfigSource;
use serde::{Deserialize, Serialize};

pub const DEFAULT_FORMAT: &str = "{timestamp} {message}";
pub const DEFAULT_DATE_FORMAT: &str = "%H:%M:%S";

/// Configuration loaded once at startup.
///
/// The two thresholds are ranks in `0..=4`. Because the level enumeration
/// skips rank 4, a threshold of exactly 4 is cleared only by ERROR(5); that
/// follows from the gapped numbering and is kept as-is. A record passes a
/// sink when its rank is at or above the threshold, so a lower threshold is
/// more verbose.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogSettings {
    pub console_level: u8,
    pub file_level: u8,
    pub format: String,
    pub date_format: String,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            console_level: 2,
            file_level: 0,
            format: DEFAULT_FORMAT.to_string(),
            date_format: DEFAULT_DATE_FORMAT.to_string(),
        }
    }
}

impl LogSettings {
    /// Load settings from the host configuration.
    ///
    /// Out-of-range thresholds are rejected here with a descriptive error,
    /// never clamped, so a bad value can not silently change routing later.
    pub fn from_config(config: &dyn ConfigSource) -> Result<Self> {
        let console_level = Self::threshold(config, "log_level", 2)?;
        let file_level = Self::threshold(config, "log_file_level", 0)?;

        Ok(Self {
            console_level,
            file_level,
            format: config.get_str("format", DEFAULT_FORMAT),
            date_format: config.get_str("date_format", DEFAULT_DATE_FORMAT),
        })
    }

    fn threshold(config: &dyn ConfigSource, option: &str, default: i64) -> Result<u8> {
        let raw = config.get_int(option, default);
        if !(0..=i64::from(MAX_THRESHOLD)).contains(&raw) {
            return Err(MacroLogError::config(
                option,
                format!("got {}, expected 0..={}", raw, MAX_THRESHOLD),
            ));
        }
        Ok(raw as u8)
    }
}
