//! Severity level definitions
//!
//! The numbering is gapped on purpose: ERROR sits at rank 5 with nothing at
//! rank 4, so a threshold of 4 admits ERROR alone. Thresholds are plain
//! ranks in `0..=MAX_THRESHOLD`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Highest valid sink threshold rank.
pub const MAX_THRESHOLD: u8 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Level {
    Trace = 0,
    Debug = 1,
    Info = 2,
    Warn = 3,
    Error = 5,
}

impl Level {
    /// Every level in ascending severity order.
    pub const ALL: [Level; 5] = [
        Level::Trace,
        Level::Debug,
        Level::Info,
        Level::Warn,
        Level::Error,
    ];

    /// Numeric rank used for threshold comparisons.
    #[must_use]
    pub fn rank(self) -> u8 {
        self as u8
    }

    pub fn to_str(&self) -> &'static str {
        match self {
            Level::Trace => "TRACE",
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
        }
    }

    /// Level occupying a rank, if any. Rank 4 is vacant.
    #[must_use]
    pub fn from_rank(rank: u8) -> Option<Self> {
        match rank {
            0 => Some(Level::Trace),
            1 => Some(Level::Debug),
            2 => Some(Level::Info),
            3 => Some(Level::Warn),
            5 => Some(Level::Error),
            _ => None,
        }
    }

    /// Case-insensitive name lookup.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        name.parse().ok()
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_str())
    }
}

impl FromStr for Level {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "TRACE" => Ok(Level::Trace),
            "DEBUG" => Ok(Level::Debug),
            "INFO" => Ok(Level::Info),
            "WARN" | "WARNING" => Ok(Level::Warn),
            "ERROR" => Ok(Level::Error),
            _ => Err(format!("Invalid level: '{}'", s)),
        }
    }
}
