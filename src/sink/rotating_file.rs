//! Daily-rotating log file writer
//!
//! Owns the active `ml.log` handle for the drain worker. Rotation happens on
//! the first append after a calendar-day boundary: the active file is archived
//! under its date and archives beyond the retention count are deleted oldest
//! first. The current day is seeded from the file's mtime so a restart after
//! midnight still rotates the previous day's file.

use crate::core::error::{MacroLogError, Result};
use chrono::{DateTime, Local, NaiveDate};
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Archives kept beyond the active file.
pub const DEFAULT_RETENTION: usize = 2;

const MIN_RETENTION: usize = 2;
const MAX_RETENTION: usize = 5;

pub struct RotatingFileWriter {
    path: PathBuf,
    retention: usize,
    writer: Option<BufWriter<File>>,
    current_day: NaiveDate,
}

impl RotatingFileWriter {
    /// Open (or create) the log file at `path` with the default retention.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        Self::with_retention(path, DEFAULT_RETENTION)
    }

    /// Open with an explicit retention count in `2..=5`.
    pub fn with_retention(path: impl Into<PathBuf>, retention: usize) -> Result<Self> {
        if !(MIN_RETENTION..=MAX_RETENTION).contains(&retention) {
            return Err(MacroLogError::config(
                "retention",
                format!(
                    "got {}, expected {}..={}",
                    retention, MIN_RETENTION, MAX_RETENTION
                ),
            ));
        }

        let path = Self::resolve_path(path.into());
        let (file, current_day) = Self::open_file(&path)?;

        Ok(Self {
            path,
            retention,
            writer: Some(BufWriter::new(file)),
            current_day,
        })
    }

    /// Fall back to the system temp directory when the requested parent
    /// directory is missing and cannot be created.
    fn resolve_path(path: PathBuf) -> PathBuf {
        match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => {
                if parent.is_dir() || fs::create_dir_all(parent).is_ok() {
                    path
                } else {
                    let name = path.file_name().map(PathBuf::from).unwrap_or_else(|| "ml.log".into());
                    std::env::temp_dir().join(name)
                }
            }
            _ => std::env::temp_dir().join(path),
        }
    }

    /// Open for append (an existing file from a previous run is continued,
    /// never truncated) and read the day it belongs to off its mtime.
    fn open_file(path: &Path) -> Result<(File, NaiveDate)> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| {
                MacroLogError::file_sink(path.display().to_string(), format!("Failed to open: {}", e))
            })?;

        let day = file
            .metadata()
            .ok()
            .and_then(|m| m.modified().ok())
            .map(|mtime| DateTime::<Local>::from(mtime).date_naive())
            .unwrap_or_else(|| Local::now().date_naive());

        Ok((file, day))
    }

    /// Append one rendered line, rotating first if the day changed.
    pub fn append(&mut self, line: &str) -> Result<()> {
        self.roll_if_needed(Local::now().date_naive())?;

        let writer = self
            .writer
            .as_mut()
            .ok_or_else(|| MacroLogError::file_sink(self.path.display().to_string(), "Writer not open"))?;
        writer
            .write_all(line.as_bytes())
            .and_then(|()| writer.write_all(b"\n"))
            .and_then(|()| writer.flush())
            .map_err(|e| {
                MacroLogError::file_sink(
                    self.path.display().to_string(),
                    format!("Failed to write log line: {}", e),
                )
            })
    }

    fn roll_if_needed(&mut self, today: NaiveDate) -> Result<()> {
        if today == self.current_day {
            return Ok(());
        }

        let result = self.rotate(today);
        if result.is_err() && self.writer.is_none() {
            // Rotation failed with the handle already closed; reopen the old
            // file so later records keep landing somewhere.
            if let Ok((file, _)) = Self::open_file(&self.path) {
                self.writer = Some(BufWriter::new(file));
            }
        }
        result
    }

    fn rotate(&mut self, today: NaiveDate) -> Result<()> {
        // Release the handle before renaming the file under it.
        if let Some(mut writer) = self.writer.take() {
            writer.flush().map_err(|e| {
                MacroLogError::rotation(
                    self.path.display().to_string(),
                    format!("Failed to flush before rotation: {}", e),
                )
            })?;
        }

        if self.path.exists() {
            let archive = self.archive_path(self.current_day);
            fs::rename(&self.path, &archive).map_err(|e| {
                MacroLogError::rotation(
                    self.path.display().to_string(),
                    format!("Failed to archive current log file: {}", e),
                )
            })?;
        }

        self.prune_archives();

        let (file, _) = Self::open_file(&self.path)?;
        self.writer = Some(BufWriter::new(file));
        self.current_day = today;
        Ok(())
    }

    /// Archive name for the day a file covered, e.g. `ml.log.2026-08-27`.
    fn archive_path(&self, day: NaiveDate) -> PathBuf {
        let mut path = self.path.clone();
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("ml.log");
        path.set_file_name(format!("{}.{}", filename, day.format("%Y-%m-%d")));
        path
    }

    /// Delete archives beyond the retention count, oldest first.
    ///
    /// Date-stamped names sort lexicographically in date order, so a plain
    /// name sort is enough. Deletion is best effort; a stuck archive only
    /// costs disk, never a dropped record.
    fn prune_archives(&self) {
        let Some(parent) = self.path.parent() else {
            return;
        };
        let Some(filename) = self.path.file_name().and_then(|n| n.to_str()) else {
            return;
        };
        let prefix = format!("{}.", filename);

        let Ok(entries) = fs::read_dir(parent) else {
            return;
        };
        let mut archives: Vec<PathBuf> = entries
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| {
                p.file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| n.starts_with(&prefix))
            })
            .collect();
        archives.sort();

        if archives.len() <= self.retention {
            return;
        }
        let excess = archives.len() - self.retention;
        for old in &archives[..excess] {
            if let Err(e) = fs::remove_file(old) {
                eprintln!(
                    "[MACRO-LOG WARN] Failed to remove old archive {}: {}",
                    old.display(),
                    e
                );
            }
        }
    }

    pub fn flush(&mut self) -> Result<()> {
        if let Some(ref mut writer) = self.writer {
            writer.flush().map_err(|e| {
                MacroLogError::file_sink(
                    self.path.display().to_string(),
                    format!("Failed to flush: {}", e),
                )
            })?;
        }
        Ok(())
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for RotatingFileWriter {
    fn drop(&mut self) {
        if let Some(mut writer) = self.writer.take() {
            let _ = writer.flush();
        }
    }
}
