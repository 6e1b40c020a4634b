//! Bridge from `tracing` events into a [`crate::LogSink`]

use crate::level::Level;
use crate::sink::{defer_or_log, SharedSink};
use std::fmt;
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::Context;
use tracing_subscriber::Layer;

/// Writes each `tracing` event as one sink line: the message, then the
/// remaining fields as `key=value`.
///
/// Events raised while this thread holds the sink through
/// [`crate::lock_sink`] are written once that guard drops. Holding the raw
/// `Mutex` guard instead (`sink.lock()`) while emitting events deadlocks.
#[derive(Debug, Clone)]
pub struct SinkLayer {
    sink: SharedSink,
}

impl SinkLayer {
    /// Direct writes to `sink` that may emit `tracing` events (for example
    /// through a `Display` impl) must go through [`crate::lock_sink`].
    pub fn new(sink: SharedSink) -> Self {
        Self { sink }
    }
}

impl<S> Layer<S> for SinkLayer
where
    S: Subscriber,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);

        let level = Level::from(*event.metadata().level());
        defer_or_log(&self.sink, level, visitor.finish());
    }
}

#[derive(Default)]
struct MessageVisitor {
    message: String,
    fields: Vec<String>,
}

impl MessageVisitor {
    fn finish(self) -> String {
        if self.fields.is_empty() {
            return self.message;
        }
        let fields = self.fields.join(" ");
        if self.message.is_empty() {
            fields
        } else {
            format!("{} {}", self.message, fields)
        }
    }
}

impl Visit for MessageVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        } else {
            self.fields.push(format!("{}={}", field.name(), value));
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{:?}", value);
        } else {
            self.fields.push(format!("{}={:?}", field.name(), value));
        }
    }
}
