//! crates/logging/src/tracing_bridge.rs
//! Bridge between the tracing crate and the leveled logger.
//!
//! [`LevelLayer`] is a tracing-subscriber layer that forwards every event to
//! a [`LevelLogger`], so libraries instrumented with `tracing` write through
//! the same per-level destinations as code using this crate directly.
//!
//! | tracing level     | logger level      |
//! |-------------------|-------------------|
//! | `TRACE`, `DEBUG`  | [`Level::Debug`]  |
//! | `INFO`            | [`Level::Info`]   |
//! | `WARN`            | [`Level::Warn`]   |
//! | `ERROR`           | [`Level::Error`]  |
//!
//! The event's source file and line, when recorded, become the call site.
//!
//! # Usage
//!
//! ```rust,ignore
//! logging::init_tracing(logging::global());
//! tracing::warn!("disk at {}%", 91);
//! ```

use std::fmt::{self, Write as _};

use logging_sink::CallSite;
use tracing::Subscriber;
use tracing::field::{Field, Visit};
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::registry::LookupSpan;

use crate::levels::Level;
use crate::logger::LevelLogger;

/// A tracing layer that writes events through a [`LevelLogger`].
#[derive(Debug)]
pub struct LevelLayer {
    logger: &'static LevelLogger,
}

impl LevelLayer {
    /// Creates a layer forwarding to `logger`.
    #[must_use]
    pub const fn new(logger: &'static LevelLogger) -> Self {
        Self { logger }
    }

    /// Maps a tracing level onto a logger level.
    #[must_use]
    pub const fn map_level(level: &tracing::Level) -> Level {
        match *level {
            tracing::Level::ERROR => Level::Error,
            tracing::Level::WARN => Level::Warn,
            tracing::Level::INFO => Level::Info,
            tracing::Level::DEBUG | tracing::Level::TRACE => Level::Debug,
        }
    }
}

impl<S> Layer<S> for LevelLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        let level = Self::map_level(metadata.level());
        if !self.logger.is_enabled(level) {
            return;
        }

        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);

        let call_site = match (metadata.file(), metadata.line()) {
            (Some(file), Some(line)) => Some(CallSite::new(file, line)),
            _ => None,
        };
        let logger = self.logger.logger(level);
        let _ = logger.output(call_site, &visitor.finish());
    }
}

/// Collects the `message` field followed by any other fields as `key=value`.
#[derive(Default)]
struct MessageVisitor {
    message: String,
    fields: String,
}

impl MessageVisitor {
    fn finish(self) -> String {
        if self.fields.is_empty() {
            self.message
        } else if self.message.is_empty() {
            self.fields
        } else {
            format!("{} {}", self.message, self.fields)
        }
    }

    fn push_field(&mut self, field: &Field, value: fmt::Arguments<'_>) {
        if !self.fields.is_empty() {
            self.fields.push(' ');
        }
        let _ = write!(self.fields, "{}={value}", field.name());
    }
}

impl Visit for MessageVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
        } else {
            self.push_field(field, format_args!("{value:?}"));
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            value.clone_into(&mut self.message);
        } else {
            self.push_field(field, format_args!("{value}"));
        }
    }
}

/// Installs a global tracing subscriber that forwards to `logger`.
///
/// # Panics
///
/// Panics if a global subscriber has already been installed, as
/// [`SubscriberInitExt::init`](tracing_subscriber::util::SubscriberInitExt::init)
/// does.
pub fn init_tracing(logger: &'static LevelLogger) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    tracing_subscriber::registry()
        .with(LevelLayer::new(logger))
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use logging_sink::{OutputFlags, SharedWriter};
    use test_support::CaptureBuffer;
    use tracing_subscriber::layer::SubscriberExt;

    fn leaked_logger() -> (&'static LevelLogger, CaptureBuffer) {
        let buffer = CaptureBuffer::new();
        let logger = LevelLogger::with_default_writer(SharedWriter::new(buffer.clone()));
        logger.set_flags(OutputFlags::NONE);
        (Box::leak(Box::new(logger)), buffer)
    }

    #[test]
    fn maps_tracing_levels() {
        assert_eq!(LevelLayer::map_level(&tracing::Level::TRACE), Level::Debug);
        assert_eq!(LevelLayer::map_level(&tracing::Level::DEBUG), Level::Debug);
        assert_eq!(LevelLayer::map_level(&tracing::Level::INFO), Level::Info);
        assert_eq!(LevelLayer::map_level(&tracing::Level::WARN), Level::Warn);
        assert_eq!(LevelLayer::map_level(&tracing::Level::ERROR), Level::Error);
    }

    #[test]
    fn events_are_forwarded_with_fields() {
        let (logger, buffer) = leaked_logger();
        let subscriber = tracing_subscriber::registry().with(LevelLayer::new(logger));

        tracing::subscriber::with_default(subscriber, || {
            tracing::warn!(attempt = 2, "retrying");
            tracing::error!("failed");
        });

        assert_eq!(buffer.lines(), vec!["WARN retrying attempt=2", "ERROR failed"]);
    }

    #[test]
    fn threshold_applies_to_events() {
        let (logger, buffer) = leaked_logger();
        logger.set_level("warn");
        let subscriber = tracing_subscriber::registry().with(LevelLayer::new(logger));

        tracing::subscriber::with_default(subscriber, || {
            tracing::trace!("noise");
            tracing::info!("routine");
            tracing::warn!("kept");
        });

        assert_eq!(buffer.lines(), vec!["WARN kept"]);
    }
}
