//! # Macro Log
//!
//! Asynchronous, leveled macro logging for a printer firmware's command
//! processor.
//!
//! Commands invoked inside the time-sensitive control loop hand their
//! records to a background drain worker over a channel, so logging never
//! blocks on file I/O. The worker appends to a daily-rotating `ml.log` with
//! bounded retention. Interactive routing (console response, error-style
//! response, display update, command abort) happens synchronously in the
//! producer's context, with independent per-sink level thresholds.

pub mod core;
pub mod dispatch;
pub mod host;
pub mod sink;

pub mod prelude {
    pub use crate::core::{
        Level, LogRecord, LogSettings, MacroLogError, MultiLineFormatter, Result, MAX_THRESHOLD,
    };
    pub use crate::dispatch::{CommandSpec, MacroLog, COMMANDS, NOTIFY_PREFIX};
    pub use crate::host::{CommandArgs, ConfigSource, HostConsole};
    pub use crate::sink::{
        FileWorker, RotatingFileWriter, DEFAULT_RETENTION, DEFAULT_SHUTDOWN_TIMEOUT,
    };
}

pub use crate::core::{
    Level, LogRecord, LogSettings, MacroLogError, MultiLineFormatter, Result, MAX_THRESHOLD,
};
pub use dispatch::{CommandSpec, MacroLog, COMMANDS, NOTIFY_PREFIX};
pub use host::{CommandArgs, ConfigSource, HostConsole};
pub use sink::{FileWorker, RotatingFileWriter, DEFAULT_RETENTION, DEFAULT_SHUTDOWN_TIMEOUT};
