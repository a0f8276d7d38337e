//! File sink: rotating writer and the background drain worker

pub mod rotating_file;
pub mod worker;

pub use rotating_file::{RotatingFileWriter, DEFAULT_RETENTION};
pub use worker::{FileWorker, DEFAULT_SHUTDOWN_TIMEOUT};
