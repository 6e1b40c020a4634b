use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the log sink and its configuration
#[derive(Error, Debug)]
pub enum LoggerError {
    #[error("Failed to open file \"{}\" for logging: {source}", path.display())]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type LoggerResult<T> = Result<T, LoggerError>;
