use std::io;

/// Failure of a single poll of the batch source.
#[derive(thiserror::Error, Debug)]
pub enum SourceError {
    #[error("Operation timed out")]
    TimeoutError,
    #[error("Batch source operation failed: {0}")]
    OperationFailed(String),
    #[error("Batch of {0} nodes exceeds the batch capacity")]
    CapacityExceeded(usize),
    #[error("Batch source is closed")]
    Closed,
}

impl SourceError {
    /// Transient errors skip one iteration. Only a closed source ends the session.
    pub fn is_transient(&self) -> bool {
        !matches!(self, SourceError::Closed)
    }
}

/// A record sink could not accept a record.
#[derive(thiserror::Error, Debug)]
pub enum SinkError {
    #[error("CSV write failed: {0}")]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    IoError(#[from] io::Error),
    #[error("Sink receiver disconnected: {0}")]
    Disconnected(String),
    #[error("Sink receiver stopped reading: {0}")]
    Stalled(String),
}

/// Failure to start a logging session.
#[derive(thiserror::Error, Debug)]
pub enum LoggerError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Sink(#[from] SinkError),
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    IoError { path: String, source: io::Error },
    #[error("Failed to parse config {path}: {source}")]
    ParseError {
        path: String,
        source: serde_yaml::Error,
    },
    #[error("Invalid config value: {0}")]
    InvalidValue(String),
}
