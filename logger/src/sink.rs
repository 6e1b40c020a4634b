//! The console + file log sink
//!
//! Every line goes to the console writer as
//! `<color>[LEVEL]<reset>: <message><reset>` and, when a log file is open,
//! to that file as `[LEVEL]: <message>`. The file is opened in append mode
//! and flushed after every line.

use crate::config::LoggerConfig;
use crate::error::{LoggerError, LoggerResult};
use crate::level::{Level, RESET_COLOR};
use std::cell::RefCell;
use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::ops::{Deref, DerefMut};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// A sink shared between direct callers and [`crate::SinkLayer`]
pub type SharedSink = Arc<Mutex<LogSink>>;

struct LogFile {
    path: PathBuf,
    handle: File,
}

pub struct LogSink {
    console: Box<dyn Write + Send>,
    color: bool,
    file: Option<LogFile>,
}

impl LogSink {
    /// Sink writing to stderr, colored, without a log file
    pub fn new() -> Self {
        Self::with_console(io::stderr())
    }

    /// Sink writing console output to `console` instead of stderr
    pub fn with_console(console: impl Write + Send + 'static) -> Self {
        Self {
            console: Box::new(console),
            color: true,
            file: None,
        }
    }

    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    /// Build a stderr sink from `config`, opening its log file if one is set
    pub fn from_config(config: &LoggerConfig) -> Self {
        let mut sink = Self::new().with_color(config.color);
        if let Some(path) = &config.log_file {
            sink.open_file(path);
        }
        sink
    }

    pub fn into_shared(self) -> SharedSink {
        Arc::new(Mutex::new(self))
    }

    pub fn is_file_open(&self) -> bool {
        self.file.is_some()
    }

    pub fn file_path(&self) -> Option<&Path> {
        self.file.as_ref().map(|f| f.path.as_path())
    }

    /// Switch logging to `path`, appending to it.
    ///
    /// A failure is logged at error level and leaves the current file (if
    /// any) in place.
    pub fn open_file(&mut self, path: impl AsRef<Path>) {
        if let Err(e) = self.try_open_file(path) {
            self.error(&e);
        }
    }

    /// Like [`LogSink::open_file`], but hands the failure back instead of
    /// logging it.
    pub fn try_open_file(&mut self, path: impl AsRef<Path>) -> LoggerResult<()> {
        let path = path.as_ref();
        let handle = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|source| LoggerError::OpenFailed {
                path: path.to_path_buf(),
                source,
            })?;

        if self.file.is_some() {
            // Still written to the old file
            self.info(format_args!("Changing log files to \"{}\".", path.display()));
            self.close_file();
        }

        self.file = Some(LogFile {
            path: path.to_path_buf(),
            handle,
        });
        self.info(format_args!("Opened file \"{}\" for logging.", path.display()));
        Ok(())
    }

    /// Close the current log file. Does nothing when none is open.
    pub fn close_file(&mut self) {
        if let Some(mut file) = self.file.take() {
            let _ = file.handle.flush();
        }
    }

    pub fn log(&mut self, level: Level, message: impl fmt::Display) {
        let message = message.to_string();

        let _ = if self.color {
            writeln!(
                self.console,
                "{}[{}]{}: {}{}",
                level.color(),
                level,
                RESET_COLOR,
                message,
                RESET_COLOR
            )
        } else {
            writeln!(self.console, "[{}]: {}", level, message)
        };
        let _ = self.console.flush();

        if let Some(file) = self.file.as_mut() {
            let _ = writeln!(file.handle, "[{}]: {}", level, message);
            let _ = file.handle.flush();
        }
    }

    pub fn trace(&mut self, message: impl fmt::Display) {
        self.log(Level::Trace, message);
    }

    pub fn debug(&mut self, message: impl fmt::Display) {
        self.log(Level::Debug, message);
    }

    pub fn info(&mut self, message: impl fmt::Display) {
        self.log(Level::Info, message);
    }

    pub fn warn(&mut self, message: impl fmt::Display) {
        self.log(Level::Warn, message);
    }

    pub fn error(&mut self, message: impl fmt::Display) {
        self.log(Level::Error, message);
    }

    pub fn fatal(&mut self, message: impl fmt::Display) {
        self.log(Level::Fatal, message);
    }
}

impl Default for LogSink {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for LogSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogSink")
            .field("color", &self.color)
            .field("file", &self.file_path())
            .finish_non_exhaustive()
    }
}

thread_local! {
    // Shared sinks this thread currently holds, by address
    static HELD: RefCell<Vec<usize>> = const { RefCell::new(Vec::new()) };
    // Lines that arrived for a held sink, written when its guard drops
    static DEFERRED: RefCell<Vec<(usize, Level, String)>> = const { RefCell::new(Vec::new()) };
}

fn sink_key(sink: &SharedSink) -> usize {
    Arc::as_ptr(sink) as usize
}

/// Lock a shared sink.
///
/// While the returned guard is alive, lines sent to the same sink from this
/// thread through [`defer_or_log`] (as [`crate::SinkLayer`] does) are queued
/// and written when the guard drops, instead of deadlocking on the lock.
pub fn lock_sink(sink: &SharedSink) -> SinkGuard<'_> {
    let key = sink_key(sink);
    let guard = sink.lock().unwrap_or_else(PoisonError::into_inner);
    HELD.with(|held| held.borrow_mut().push(key));
    SinkGuard { key, guard }
}

/// Write `message` to `sink`, or queue it if this thread already holds the
/// sink through a [`SinkGuard`].
pub fn defer_or_log(sink: &SharedSink, level: Level, message: String) {
    let key = sink_key(sink);
    if HELD.with(|held| held.borrow().contains(&key)) {
        DEFERRED.with(|deferred| deferred.borrow_mut().push((key, level, message)));
        return;
    }
    lock_sink(sink).log(level, message);
}

pub struct SinkGuard<'a> {
    key: usize,
    guard: MutexGuard<'a, LogSink>,
}

impl Deref for SinkGuard<'_> {
    type Target = LogSink;

    fn deref(&self) -> &LogSink {
        &self.guard
    }
}

impl DerefMut for SinkGuard<'_> {
    fn deref_mut(&mut self) -> &mut LogSink {
        &mut self.guard
    }
}

impl Drop for SinkGuard<'_> {
    fn drop(&mut self) {
        let key = self.key;
        HELD.with(|held| {
            let mut held = held.borrow_mut();
            if let Some(pos) = held.iter().rposition(|k| *k == key) {
                held.remove(pos);
            }
        });

        let pending: Vec<_> = DEFERRED.with(|deferred| {
            let mut deferred = deferred.borrow_mut();
            let (mine, rest): (Vec<_>, Vec<_>) = deferred
                .drain(..)
                .partition(|(k, _, _)| *k == key);
            *deferred = rest;
            mine
        });
        for (_, level, message) in pending {
            self.guard.log(level, message);
        }
    }
}

/// In-memory console writer whose clones share one buffer.
///
/// Useful for capturing what a sink printed.
#[derive(Debug, Clone, Default)]
pub struct CaptureBuffer {
    bytes: Arc<Mutex<Vec<u8>>>,
}

impl CaptureBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> String {
        let bytes = self.bytes.lock().unwrap_or_else(PoisonError::into_inner);
        String::from_utf8_lossy(&bytes).into_owned()
    }

    pub fn clear(&self) {
        self.bytes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl Write for CaptureBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.bytes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
