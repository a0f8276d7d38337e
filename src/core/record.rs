//! Log record structure and command-argument parsing

use super::error::{MacroLogError, Result};
use super::level::Level;
use crate::host::CommandArgs;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// One log event, immutable once constructed.
///
/// A record without a level is an unconditional print-style message: it is
/// always emitted, untagged, regardless of configured thresholds. The
/// timestamp is captured at construction so a record drained later still
/// carries the producer's clock.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogRecord {
    pub level: Option<Level>,
    pub name: String,
    pub message: String,
    pub display: bool,
    pub notify: bool,
    pub timestamp: DateTime<Local>,
    /// Attached failure trace, passed through the formatter verbatim.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace: Option<String>,
}

impl LogRecord {
    pub fn new(level: Option<Level>, name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level,
            name: name.into(),
            message: message.into(),
            display: false,
            notify: false,
            timestamp: Local::now(),
            trace: None,
        }
    }

    #[must_use]
    pub fn with_display(mut self, display: bool) -> Self {
        self.display = display;
        self
    }

    #[must_use]
    pub fn with_notify(mut self, notify: bool) -> Self {
        self.notify = notify;
        self
    }

    #[must_use]
    pub fn with_trace(mut self, trace: impl Into<String>) -> Self {
        self.trace = Some(trace.into());
        self
    }

    /// Render the record body.
    ///
    /// Leveled records render as `"<LEVEL> [<name>]: <message>"`, untagged
    /// records as `"<name>: <message>"`.
    #[must_use]
    pub fn render(&self) -> String {
        match self.level {
            Some(level) => format!("{} [{}]: {}", level, self.name, self.message),
            None => format!("{}: {}", self.name, self.message),
        }
    }

    /// Build a record from parsed command arguments.
    ///
    /// `MSG` is required; a missing message fails the invocation before any
    /// partial record exists. `DISPLAY` and `NOTIFY` are truthy integers
    /// defaulting to 0.
    pub fn from_args(level: Option<Level>, args: &dyn CommandArgs) -> Result<Self> {
        let message = args
            .get("MSG")
            .ok_or(MacroLogError::MissingArgument("MSG"))?
            .to_string();
        let name = args.get("NAME").unwrap_or_default().to_string();
        let display = args.get_int("DISPLAY", 0)? != 0;
        let notify = args.get_int("NOTIFY", 0)? != 0;

        Ok(Self {
            level,
            name,
            message,
            display,
            notify,
            timestamp: Local::now(),
            trace: None,
        })
    }
}
