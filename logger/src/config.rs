use crate::error::{LoggerError, LoggerResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    /// File to append log lines to, if any
    pub log_file: Option<PathBuf>,
    /// Wrap console level tags in ANSI colors
    pub color: bool,
    /// `tracing` filter directive used when `RUST_LOG` is not set
    pub filter: String,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            log_file: None,
            color: true,
            filter: "info".to_string(),
        }
    }
}

impl LoggerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_log_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.log_file = Some(path.into());
        self
    }

    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = filter.into();
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        if let Some(path) = &self.log_file {
            if path.as_os_str().is_empty() {
                return Err("Log file path cannot be empty".to_string());
            }
        }

        if self.filter.trim().is_empty() {
            return Err("Filter cannot be empty".to_string());
        }

        Ok(())
    }

    pub fn from_toml_str(source: &str) -> LoggerResult<Self> {
        let config: Self = toml::from_str(source)?;
        config.validate().map_err(LoggerError::InvalidConfig)?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> LoggerResult<Self> {
        let source = fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }
}
