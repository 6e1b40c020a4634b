//! Leveled logging to the console and an optional append-mode log file.
//!
//! A [`LogSink`] always writes to the console diagnostic stream (stderr by
//! default) with the level tag wrapped in an ANSI color, and duplicates the
//! plain line into a log file when one is open. [`SinkLayer`] lets the same
//! sink receive `tracing` events.
//!
//! # Examples
//!
//! ```rust
//! use logger::{log_info, LogSink};
//!
//! let mut sink = LogSink::new();
//! sink.open_file(std::env::temp_dir().join("logger-doc.log"));
//! log_info!(sink, "processed {} items", 3);
//! sink.close_file();
//! ```

pub mod config;
pub mod error;
pub mod layer;
pub mod level;
mod macros;
pub mod sink;

pub use config::LoggerConfig;
pub use error::{LoggerError, LoggerResult};
pub use layer::SinkLayer;
pub use level::Level;
pub use sink::{defer_or_log, lock_sink, CaptureBuffer, LogSink, SharedSink, SinkGuard};

pub mod prelude {
    pub use crate::config::*;
    pub use crate::error::*;
    pub use crate::layer::*;
    pub use crate::level::*;
    pub use crate::sink::*;
}
