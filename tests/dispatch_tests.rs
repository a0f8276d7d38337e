//! End-to-end tests for the dispatch pipeline
//!
//! These tests verify:
//! - File-sink threshold filtering through the background worker
//! - FIFO drain ordering across shutdown
//! - Idempotent setup (one worker, one queue, one banner)
//! - ERROR records reaching the file before the command aborts

use macro_log::prelude::*;
use std::collections::HashMap;
use std::fs;
use tempfile::TempDir;

#[derive(Default)]
struct RecordingConsole {
    responses: Vec<String>,
    errors: Vec<String>,
    commands: Vec<String>,
}

impl HostConsole for RecordingConsole {
    fn respond(&mut self, text: &str) {
        self.responses.push(text.to_string());
    }

    fn respond_error(&mut self, text: &str) {
        self.errors.push(text.to_string());
    }

    fn run_command(&mut self, command: &str) {
        self.commands.push(command.to_string());
    }
}

struct MapArgs(HashMap<&'static str, &'static str>);

impl CommandArgs for MapArgs {
    fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).copied()
    }

    fn get_int(&self, key: &str, default: i64) -> Result<i64> {
        match self.0.get(key) {
            Some(raw) => raw
                .parse()
                .map_err(|_| MacroLogError::argument(key, format!("not an integer: '{}'", raw))),
            None => Ok(default),
        }
    }
}

fn args(pairs: &[(&'static str, &'static str)]) -> MapArgs {
    MapArgs(pairs.iter().copied().collect())
}

/// Connect a dispatcher whose ml.log lands inside `dir`.
fn connect(log: &mut MacroLog, console: &mut RecordingConsole, dir: &TempDir) {
    let host_log = dir.path().join("host.log");
    log.handle_connect(console, Some(&host_log)).unwrap();
}

fn read_ml_log(dir: &TempDir) -> String {
    fs::read_to_string(dir.path().join("ml.log")).unwrap()
}

#[test]
fn test_setup_writes_multiline_banner() {
    let dir = TempDir::new().unwrap();
    let mut log = MacroLog::new(LogSettings::default());
    let mut console = RecordingConsole::default();

    connect(&mut log, &mut console, &dir);
    log.handle_disconnect(&mut console).unwrap();

    let content = read_ml_log(&dir);
    assert!(content.contains("----- Initializing with log file"));
    // The banner's embedded line break gets the continuation indent.
    assert!(content.contains("\n          ----- "));
    // The banner is untagged, so it also reached the plain console sink.
    assert_eq!(console.responses.len(), 1);
    assert!(console.responses[0].starts_with("ML: "));
}

#[test]
fn test_file_threshold_filters_records() {
    let dir = TempDir::new().unwrap();
    let mut log = MacroLog::new(LogSettings {
        file_level: 2, // INFO
        console_level: 4,
        ..LogSettings::default()
    });
    let mut console = RecordingConsole::default();
    connect(&mut log, &mut console, &dir);

    log.dispatch(&mut console, LogRecord::new(Some(Level::Trace), "t", "too quiet"))
        .unwrap();
    log.dispatch(&mut console, LogRecord::new(Some(Level::Warn), "t", "loud enough"))
        .unwrap();
    log.handle_disconnect(&mut console).unwrap();

    let content = read_ml_log(&dir);
    assert!(!content.contains("too quiet"));
    assert!(content.contains("WARN [t]: loud enough"));
}

#[test]
fn test_untagged_record_always_reaches_file() {
    let dir = TempDir::new().unwrap();
    let mut log = MacroLog::new(LogSettings {
        file_level: 4,
        ..LogSettings::default()
    });
    let mut console = RecordingConsole::default();
    connect(&mut log, &mut console, &dir);

    log.dispatch(&mut console, LogRecord::new(None, "job", "unconditional"))
        .unwrap();
    log.handle_disconnect(&mut console).unwrap();

    assert!(read_ml_log(&dir).contains("job: unconditional"));
}

#[test]
fn test_records_drain_in_order_on_disconnect() {
    let dir = TempDir::new().unwrap();
    let mut log = MacroLog::new(LogSettings::default());
    let mut console = RecordingConsole::default();
    connect(&mut log, &mut console, &dir);

    for message in ["R1", "R2", "R3"] {
        log.dispatch(&mut console, LogRecord::new(Some(Level::Info), "t", message))
            .unwrap();
    }
    log.handle_disconnect(&mut console).unwrap();

    let content = read_ml_log(&dir);
    let positions: Vec<usize> = ["R1", "R2", "R3"]
        .iter()
        .map(|m| content.find(m).expect("record missing from file"))
        .collect();
    assert!(positions[0] < positions[1] && positions[1] < positions[2]);
}

#[test]
fn test_connect_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let mut log = MacroLog::new(LogSettings::default());
    let mut console = RecordingConsole::default();

    connect(&mut log, &mut console, &dir);
    assert!(log.is_running());
    connect(&mut log, &mut console, &dir);
    connect(&mut log, &mut console, &dir);
    log.handle_disconnect(&mut console).unwrap();
    assert!(!log.is_running());

    // Only the first connect spawned a worker and announced itself.
    let content = read_ml_log(&dir);
    assert_eq!(content.matches("Initializing with log file").count(), 1);
    assert_eq!(console.responses.len(), 1);
}

#[test]
fn test_error_command_aborts_but_still_logs_to_file() {
    let dir = TempDir::new().unwrap();
    let mut log = MacroLog::new(LogSettings::default());
    let mut console = RecordingConsole::default();
    connect(&mut log, &mut console, &dir);

    let err = log
        .handle_command(
            "_ERROR",
            &mut console,
            &args(&[("MSG", "thermal runaway"), ("NAME", "heater")]),
        )
        .unwrap_err();
    assert!(matches!(err, MacroLogError::CommandAbort(_)));
    assert!(console.errors.is_empty());

    log.handle_disconnect(&mut console).unwrap();
    assert!(read_ml_log(&dir).contains("ERROR [heater]: thermal runaway"));
}

#[test]
fn test_warn_command_end_to_end() {
    let dir = TempDir::new().unwrap();
    let mut log = MacroLog::new(LogSettings::default());
    let mut console = RecordingConsole::default();
    connect(&mut log, &mut console, &dir);
    // Drop the init banner so only the WARN's output is under test.
    console.responses.clear();

    log.handle_command(
        "_WARN",
        &mut console,
        &args(&[("MSG", "bed not level"), ("NAME", "probe"), ("NOTIFY", "1")]),
    )
    .unwrap();
    log.handle_disconnect(&mut console).unwrap();

    // Error-style response, never plain, notify or not.
    assert_eq!(console.errors, vec!["WARN [probe]: bed not level"]);
    assert!(console.responses.is_empty());
    assert!(read_ml_log(&dir).contains("WARN [probe]: bed not level"));
}

#[test]
fn test_display_command_updates_display_once() {
    let dir = TempDir::new().unwrap();
    let mut log = MacroLog::new(LogSettings::default());
    let mut console = RecordingConsole::default();
    connect(&mut log, &mut console, &dir);

    log.handle_command(
        "_INFO",
        &mut console,
        &args(&[("MSG", "heating"), ("NAME", "job"), ("DISPLAY", "1")]),
    )
    .unwrap();
    log.handle_disconnect(&mut console).unwrap();

    assert_eq!(
        console.commands,
        vec!["SET_DISPLAY_TEXT MSG=\"INFO [job]: heating\""]
    );
}

#[test]
fn test_multiline_message_is_indented_in_file() {
    let dir = TempDir::new().unwrap();
    let mut log = MacroLog::new(LogSettings::default());
    let mut console = RecordingConsole::default();
    connect(&mut log, &mut console, &dir);

    log.dispatch(&mut console, LogRecord::new(Some(Level::Info), "t", "line1\nline2"))
        .unwrap();
    log.handle_disconnect(&mut console).unwrap();

    assert!(read_ml_log(&dir).contains("line1\n         line2"));
}

#[test]
fn test_from_config_rejects_bad_thresholds() {
    struct BadConfig;

    impl ConfigSource for BadConfig {
        fn get_int(&self, key: &str, _default: i64) -> i64 {
            if key == "log_level" {
                7
            } else {
                0
            }
        }

        fn get_str(&self, _key: &str, default: &str) -> String {
            default.to_string()
        }
    }

    let err = MacroLog::from_config(&BadConfig).map(|_| ()).unwrap_err();
    assert!(matches!(err, MacroLogError::InvalidConfiguration { .. }));
}
