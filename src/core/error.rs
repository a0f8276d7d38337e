//! Error types for the macro logging pipeline

pub type Result<T> = std::result::Result<T, MacroLogError>;

#[derive(Debug, thiserror::Error)]
pub enum MacroLogError {
    /// Invalid configuration value, rejected at load time
    #[error("Invalid configuration for '{option}': {message}")]
    InvalidConfiguration { option: String, message: String },

    /// LVL argument named a level that does not exist
    #[error("Unknown log level '{0}'")]
    UnknownLevel(String),

    /// A required command argument was not supplied
    #[error("Missing required argument '{0}'")]
    MissingArgument(&'static str),

    /// A command argument was present but unusable
    #[error("Invalid argument '{key}': {message}")]
    InvalidArgument { key: String, message: String },

    /// Severity-as-control-flow: an ERROR record aborts the in-flight command.
    /// The payload is the rendered message the host should report.
    #[error("{0}")]
    CommandAbort(String),

    /// File sink error with path
    #[error("File sink error for '{path}': {message}")]
    FileSink { path: String, message: String },

    /// File rotation error
    #[error("Rotation failed for '{path}': {message}")]
    Rotation { path: String, message: String },

    /// Generic IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl MacroLogError {
    /// Create an invalid configuration error
    pub fn config(option: impl Into<String>, message: impl Into<String>) -> Self {
        MacroLogError::InvalidConfiguration {
            option: option.into(),
            message: message.into(),
        }
    }

    /// Create an invalid argument error
    pub fn argument(key: impl Into<String>, message: impl Into<String>) -> Self {
        MacroLogError::InvalidArgument {
            key: key.into(),
            message: message.into(),
        }
    }

    /// Create a file sink error
    pub fn file_sink(path: impl Into<String>, message: impl Into<String>) -> Self {
        MacroLogError::FileSink {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a rotation error
    pub fn rotation(path: impl Into<String>, message: impl Into<String>) -> Self {
        MacroLogError::Rotation {
            path: path.into(),
            message: message.into(),
        }
    }
}
