//! Dispatcher facade: threshold evaluation, multi-sink fan-out, and the
//! command surface exposed to the host's command layer.

use crate::core::error::{MacroLogError, Result};
use crate::core::formatter::MultiLineFormatter;
use crate::core::level::Level;
use crate::core::record::LogRecord;
use crate::core::settings::LogSettings;
use crate::host::{CommandArgs, ConfigSource, HostConsole};
use crate::sink::rotating_file::RotatingFileWriter;
use crate::sink::worker::{FileWorker, DEFAULT_SHUTDOWN_TIMEOUT};
use std::path::{Path, PathBuf};

/// Marker prepended for external notification routing.
pub const NOTIFY_PREFIX: &str = "MR_NOTIFY | ";

const LOG_FILE_NAME: &str = "ml.log";
const SOURCE_NAME: &str = "ML";

/// One entry of the command registration table.
pub struct CommandSpec {
    pub name: &'static str,
    pub help: &'static str,
}

/// Commands this module exposes, for the host to register.
pub const COMMANDS: &[CommandSpec] = &[
    CommandSpec { name: "_ML", help: "Log MSG at the level named by LVL, or untagged" },
    CommandSpec { name: "_LOG", help: "Alias of _ML" },
    CommandSpec { name: "_TRACE", help: "Log MSG at TRACE" },
    CommandSpec { name: "_DEBUG", help: "Log MSG at DEBUG" },
    CommandSpec { name: "_INFO", help: "Log MSG at INFO" },
    CommandSpec { name: "_WARN", help: "Log MSG at WARN (error-style response)" },
    CommandSpec { name: "_ERROR", help: "Log MSG at ERROR (aborts the command)" },
    CommandSpec { name: "_PRINT", help: "Log MSG unconditionally, untagged" },
];

/// Owns the configuration and the queue/worker lifecycle, and maps command
/// invocations to records.
///
/// Interactive sinks run synchronously in the caller's context; only the
/// file sink goes through the background worker.
pub struct MacroLog {
    settings: LogSettings,
    worker: Option<FileWorker>,
}

impl MacroLog {
    #[must_use]
    pub fn new(settings: LogSettings) -> Self {
        Self {
            settings,
            worker: None,
        }
    }

    /// Load settings from the host configuration and build the dispatcher.
    pub fn from_config(config: &dyn ConfigSource) -> Result<Self> {
        Ok(Self::new(LogSettings::from_config(config)?))
    }

    #[must_use]
    pub fn settings(&self) -> &LogSettings {
        &self.settings
    }

    /// Whether the background worker is running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.worker.is_some()
    }

    /// Host connect hook: set up file logging.
    ///
    /// Idempotent; the host may emit its connect event more than once, and a
    /// second call while the worker is running is a no-op. The log file
    /// lands next to the host's own log, or in the temp directory when the
    /// host has none.
    pub fn handle_connect(
        &mut self,
        console: &mut dyn HostConsole,
        host_log_path: Option<&Path>,
    ) -> Result<()> {
        if self.worker.is_some() {
            return Ok(());
        }

        let path = match host_log_path.and_then(Path::parent) {
            Some(dir) if !dir.as_os_str().is_empty() => dir.join(LOG_FILE_NAME),
            _ => PathBuf::from(LOG_FILE_NAME),
        };
        let writer = RotatingFileWriter::open(path)?;
        let resolved = writer.path().display().to_string();

        let formatter = MultiLineFormatter::new(&self.settings);
        self.worker = Some(FileWorker::spawn(writer, formatter)?);

        self.dispatch(
            console,
            LogRecord::new(
                None,
                SOURCE_NAME,
                format!("\n ----- Initializing with log file {} ----- ", resolved),
            ),
        )
    }

    /// Host disconnect hook: log the event, then drain and stop the worker.
    pub fn handle_disconnect(&mut self, console: &mut dyn HostConsole) -> Result<()> {
        self.dispatch(
            console,
            LogRecord::new(Some(Level::Trace), SOURCE_NAME, "Disconnecting"),
        )?;
        if let Some(mut worker) = self.worker.take() {
            worker.shutdown(DEFAULT_SHUTDOWN_TIMEOUT);
        }
        Ok(())
    }

    /// Entry point for a registered command invocation.
    pub fn handle_command(
        &mut self,
        name: &str,
        console: &mut dyn HostConsole,
        args: &dyn CommandArgs,
    ) -> Result<()> {
        let level = match name {
            "_ML" | "_LOG" => match args.get("LVL") {
                Some(raw) => match Level::from_name(raw) {
                    Some(level) => Some(level),
                    None => {
                        // Locally recoverable: one untagged diagnostic, then
                        // fail this invocation only.
                        self.dispatch(
                            console,
                            LogRecord::new(None, SOURCE_NAME, format!("Unknown LVL '{}'", raw)),
                        )?;
                        return Err(MacroLogError::UnknownLevel(raw.to_string()));
                    }
                },
                None => None,
            },
            "_TRACE" => Some(Level::Trace),
            "_DEBUG" => Some(Level::Debug),
            "_INFO" => Some(Level::Info),
            "_WARN" => Some(Level::Warn),
            "_ERROR" => Some(Level::Error),
            "_PRINT" => None,
            other => {
                return Err(MacroLogError::argument(
                    "command",
                    format!("unrecognized command '{}'", other),
                ))
            }
        };

        let record = LogRecord::from_args(level, args)?;
        self.dispatch(console, record)
    }

    /// Evaluate thresholds and fan the record out to its sinks.
    ///
    /// The file and interactive decisions are independent and use the same
    /// inclusive `rank >= threshold` comparison; an untagged record passes
    /// both unconditionally. An ERROR record returns `CommandAbort`, which
    /// halts the invoking command; everything queued for file before that
    /// still drains.
    pub fn dispatch(&mut self, console: &mut dyn HostConsole, record: LogRecord) -> Result<()> {
        let message = record.render();

        if record.level.is_none_or(|lv| lv.rank() >= self.settings.file_level) {
            if let Some(ref worker) = self.worker {
                worker.enqueue(record.clone());
            }
        }

        // Display routing is independent of both threshold decisions and
        // shows the plain rendered text, without the notify prefix.
        if record.display {
            console.run_command(&format!(
                "SET_DISPLAY_TEXT MSG=\"{}\"",
                message.replace('"', "\\\"")
            ));
        }

        if record.level.is_none_or(|lv| lv.rank() >= self.settings.console_level) {
            match record.level {
                Some(Level::Warn) => console.respond_error(&message),
                Some(Level::Error) => return Err(MacroLogError::CommandAbort(message)),
                _ => {
                    if record.notify {
                        console.respond(&format!("{}{}", NOTIFY_PREFIX, message));
                    } else {
                        console.respond(&message);
                    }
                }
            }
        }

        Ok(())
    }
}
