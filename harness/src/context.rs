//! The process-wide context: one log sink and one test registry, built once
//! at startup and handed to whatever needs them.

use crate::error::{HarnessError, HarnessResult};
use crate::registry::{TestRegistry, TestSummary};
use crate::report::{write_summary, ReportFormat};
use logger::{lock_sink, Level, LogSink, LoggerConfig, SharedSink, SinkGuard};
use std::io::Write;

#[derive(Debug)]
pub struct Context {
    sink: SharedSink,
    registry: TestRegistry,
}

impl Context {
    pub fn new() -> Self {
        Self::with_sink(LogSink::new())
    }

    pub fn with_sink(sink: LogSink) -> Self {
        Self {
            sink: sink.into_shared(),
            registry: TestRegistry::new(),
        }
    }

    pub fn from_config(config: &LoggerConfig) -> HarnessResult<Self> {
        config.validate().map_err(HarnessError::InvalidConfig)?;
        Ok(Self::with_sink(LogSink::from_config(config)))
    }

    /// Lock the sink for direct writes.
    ///
    /// `tracing` events raised on this thread while the guard is alive are
    /// written after it drops.
    pub fn sink(&self) -> SinkGuard<'_> {
        lock_sink(&self.sink)
    }

    /// Handle for `logger::SinkLayer`
    pub fn shared_sink(&self) -> SharedSink {
        self.sink.clone()
    }

    pub fn registry(&self) -> &TestRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut TestRegistry {
        &mut self.registry
    }

    /// Run the registry and log the outcome through the sink.
    pub fn run_and_report(&mut self) -> TestSummary {
        let summary = self.registry.run();

        let mut sink = self.sink();
        for name in &summary.failures {
            sink.warn(format_args!("Test \"{}\" failed.", name));
        }
        let level = if summary.all_passed() {
            Level::Info
        } else {
            Level::Warn
        };
        sink.log(
            level,
            format_args!(
                "Ran {} tests: {} passed, {} failed.",
                summary.total, summary.passed, summary.failed
            ),
        );

        summary
    }

    /// Write `summary` to `out`, then close the log file.
    ///
    /// The file is closed even when writing fails; a `SinkLayer` holding the
    /// sink would otherwise keep it open for the rest of the process.
    pub fn finish<W: Write + ?Sized>(
        &self,
        summary: &TestSummary,
        format: ReportFormat,
        out: &mut W,
    ) -> HarnessResult<()> {
        let written = write_summary(summary, format, out);
        self.sink().close_file();
        written
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}
