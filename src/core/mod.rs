//! Core record model, configuration, and formatting

pub mod error;
pub mod formatter;
pub mod level;
pub mod record;
pub mod settings;

pub use error::{MacroLogError, Result};
pub use formatter::MultiLineFormatter;
pub use level::{Level, MAX_THRESHOLD};
pub use record::LogRecord;
pub use settings::LogSettings;
