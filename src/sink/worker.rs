//! Background drain worker
//!
//! The one place in the pipeline with real concurrency: producers hand
//! records to an unbounded channel and return immediately; a single worker
//! thread drains the channel and performs every blocking file write. The
//! channel is the only shared state, so the worker owns the file handle
//! outright. Shutdown is cooperative: a sentinel is queued behind any
//! pending records and FIFO delivery guarantees they are all flushed before
//! the worker exits.

use crate::core::error::Result;
use crate::core::formatter::MultiLineFormatter;
use crate::core::record::LogRecord;
use crate::sink::rotating_file::RotatingFileWriter;
use crossbeam_channel::{unbounded, Sender};
use std::thread;
use std::time::Duration;

/// Bound on how long shutdown waits for the worker to finish draining.
pub const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

enum QueueItem {
    Record(LogRecord),
    Shutdown,
}

pub struct FileWorker {
    sender: Sender<QueueItem>,
    handle: Option<thread::JoinHandle<()>>,
}

impl FileWorker {
    /// Spawn the drain thread, which takes ownership of the terminal sink.
    pub fn spawn(mut writer: RotatingFileWriter, formatter: MultiLineFormatter) -> Result<Self> {
        let (sender, receiver) = unbounded();

        let handle = thread::Builder::new()
            .name("macro-log-drain".to_string())
            .spawn(move || {
                let mut failure_streak = 0usize;
                loop {
                    match receiver.recv() {
                        Ok(QueueItem::Record(record)) => {
                            // Sink failures stay inside the worker: report the
                            // start of a failure streak and keep draining.
                            match writer.append(&formatter.render(&record)) {
                                Ok(()) => failure_streak = 0,
                                Err(e) => {
                                    if failure_streak == 0 {
                                        eprintln!("[MACRO-LOG ERROR] File sink failed: {}", e);
                                    }
                                    failure_streak += 1;
                                }
                            }
                        }
                        // Sentinel or all senders gone: every record queued
                        // earlier has already been written.
                        Ok(QueueItem::Shutdown) | Err(_) => break,
                    }
                }
            })?;

        Ok(Self {
            sender,
            handle: Some(handle),
        })
    }

    /// Hand a record to the drain thread. Never blocks on file I/O.
    pub fn enqueue(&self, record: LogRecord) {
        // A closed channel means the worker already shut down; the record
        // has nowhere to go and is dropped.
        let _ = self.sender.send(QueueItem::Record(record));
    }

    /// Queue the stop sentinel and wait (bounded) for the drain to finish.
    ///
    /// Returns `true` if the worker exited within the timeout.
    pub fn shutdown(&mut self, timeout: Duration) -> bool {
        let _ = self.sender.send(QueueItem::Shutdown);

        let Some(handle) = self.handle.take() else {
            return true;
        };

        let start = std::time::Instant::now();
        loop {
            if handle.is_finished() {
                if let Err(e) = handle.join() {
                    eprintln!("[MACRO-LOG ERROR] Drain thread panicked during shutdown: {:?}", e);
                    return false;
                }
                return true;
            }
            if start.elapsed() >= timeout {
                eprintln!(
                    "[MACRO-LOG WARN] Drain thread did not finish within {:?}. \
                     Some records may be lost.",
                    timeout
                );
                return false;
            }
            thread::sleep(Duration::from_millis(10));
        }
    }
}

impl Drop for FileWorker {
    fn drop(&mut self) {
        if self.handle.is_some() {
            self.shutdown(DEFAULT_SHUTDOWN_TIMEOUT);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::level::Level;
    use crate::core::settings::LogSettings;
    use std::fs;
    use tempfile::tempdir;

    fn spawn_worker(path: &std::path::Path) -> FileWorker {
        let writer = RotatingFileWriter::open(path).unwrap();
        FileWorker::spawn(writer, MultiLineFormatter::new(&LogSettings::default())).unwrap()
    }

    #[test]
    fn test_records_drain_in_fifo_order_before_exit() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ml.log");
        let mut worker = spawn_worker(&path);

        worker.enqueue(LogRecord::new(Some(Level::Info), "t", "R1"));
        worker.enqueue(LogRecord::new(Some(Level::Info), "t", "R2"));
        worker.enqueue(LogRecord::new(Some(Level::Info), "t", "R3"));
        assert!(worker.shutdown(DEFAULT_SHUTDOWN_TIMEOUT));

        let content = fs::read_to_string(&path).unwrap();
        let positions: Vec<usize> = ["R1", "R2", "R3"]
            .iter()
            .map(|m| content.find(m).expect("record missing from file"))
            .collect();
        assert!(positions[0] < positions[1] && positions[1] < positions[2]);
    }

    #[test]
    fn test_enqueue_after_shutdown_is_ignored() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ml.log");
        let mut worker = spawn_worker(&path);

        assert!(worker.shutdown(DEFAULT_SHUTDOWN_TIMEOUT));
        worker.enqueue(LogRecord::new(None, "t", "late"));

        let content = fs::read_to_string(&path).unwrap();
        assert!(!content.contains("late"));
    }

    #[test]
    fn test_shutdown_twice_is_harmless() {
        let dir = tempdir().unwrap();
        let mut worker = spawn_worker(&dir.path().join("ml.log"));
        assert!(worker.shutdown(DEFAULT_SHUTDOWN_TIMEOUT));
        assert!(worker.shutdown(DEFAULT_SHUTDOWN_TIMEOUT));
    }

    #[test]
    fn test_concurrent_producers_all_land() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ml.log");
        let mut worker = spawn_worker(&path);

        std::thread::scope(|scope| {
            for producer in 0..4 {
                let worker = &worker;
                scope.spawn(move || {
                    for i in 0..25 {
                        worker.enqueue(LogRecord::new(
                            Some(Level::Debug),
                            "t",
                            format!("p{} m{}", producer, i),
                        ));
                    }
                });
            }
        });
        assert!(worker.shutdown(DEFAULT_SHUTDOWN_TIMEOUT));

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 100);
    }
}
