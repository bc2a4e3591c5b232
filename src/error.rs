use std::io;

/// Error returned when configuration values cannot be interpreted.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("not a valid log level: {0:?}")]
    InvalidLevel(String),
}

/// Error type returned by [`Formatter`](crate::format::Formatter)
/// implementations.
#[derive(thiserror::Error, Debug)]
pub enum FormatError {
    #[error("logger is not initialised - please use init_logger or init_default_logger")]
    NotInitialised,

    #[error("failed to marshal field {key:?} to JSON: {reason}")]
    SerializationFailed { key: String, reason: String },
}

/// Error type returned when a record could not be emitted.
///
/// The plain terminal methods (`info`, `error`, ...) print this to stderr;
/// [`FieldLogger::try_log`](crate::entry::FieldLogger::try_log) hands it to
/// the caller instead.
#[derive(thiserror::Error, Debug)]
pub enum LogError {
    #[error(transparent)]
    Format(#[from] FormatError),

    #[error("failed to write log line: {0}")]
    Write(#[from] io::Error),
}

/// Error type returned when parsing an output selector.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum OutputError {
    #[error("unknown or unsupported log output: {0:?}")]
    UnknownOutput(String),
}

/// Error type returned when installing the global `tracing` subscriber.
#[cfg(feature = "tracing-bridge")]
#[derive(thiserror::Error, Debug)]
pub enum InitError {
    #[error("failed to set global tracing subscriber: {0}")]
    SetGlobalDefault(#[from] tracing::subscriber::SetGlobalDefaultError),
}
