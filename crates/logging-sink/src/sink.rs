//! crates/logging-sink/src/sink.rs
//! Prefix- and flag-bound line writer with an in-place swappable destination.

use std::fmt;
use std::io::{self, Write};
use std::mem;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::flags::OutputFlags;
use crate::format::{CallSite, render_line, timestamp};
use crate::line_mode::LineMode;
use crate::writer::SharedWriter;

/// Streaming sink that renders one header-prefixed line per call.
///
/// The sink owns a [`SharedWriter`] together with its prefix, [`OutputFlags`]
/// and [`LineMode`]. All four live behind one mutex: callers may rebind the
/// destination with [`replace_writer`](Self::replace_writer) while other
/// threads are emitting, and each emitted line is rendered into a scratch
/// buffer and handed to the writer with a single `write_all`.
///
/// # Examples
///
/// ```
/// use logging_sink::{LineSink, OutputFlags, SharedWriter};
/// use test_support::CaptureBuffer;
///
/// let first = CaptureBuffer::new();
/// let second = CaptureBuffer::new();
/// let sink = LineSink::new(SharedWriter::new(first.clone()), "WARN ", OutputFlags::NONE);
///
/// sink.output(None, "disk almost full")?;
/// let _previous = sink.replace_writer(SharedWriter::new(second.clone()));
/// sink.output(None, "disk full")?;
///
/// assert_eq!(first.contents(), "WARN disk almost full\n");
/// assert_eq!(second.contents(), "WARN disk full\n");
/// # Ok::<(), std::io::Error>(())
/// ```
pub struct LineSink {
    state: Mutex<SinkState>,
}

struct SinkState {
    writer: SharedWriter,
    prefix: String,
    flags: OutputFlags,
    line_mode: LineMode,
    scratch: String,
}

impl LineSink {
    /// Creates a sink that terminates every line with a newline.
    #[must_use]
    pub fn new(writer: SharedWriter, prefix: impl Into<String>, flags: OutputFlags) -> Self {
        Self::with_line_mode(writer, prefix, flags, LineMode::WithNewline)
    }

    /// Creates a sink with an explicit [`LineMode`].
    #[must_use]
    pub fn with_line_mode(
        writer: SharedWriter,
        prefix: impl Into<String>,
        flags: OutputFlags,
        line_mode: LineMode,
    ) -> Self {
        Self {
            state: Mutex::new(SinkState {
                writer,
                prefix: prefix.into(),
                flags,
                line_mode,
                scratch: String::new(),
            }),
        }
    }

    fn state(&self) -> MutexGuard<'_, SinkState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Renders `message` and writes it to the current destination.
    pub fn output(&self, call_site: Option<CallSite<'_>>, message: &str) -> io::Result<()> {
        let mut state = self.state();
        let SinkState {
            writer,
            prefix,
            flags,
            line_mode,
            scratch,
        } = &mut *state;

        scratch.clear();
        render_line(
            scratch,
            prefix.as_str(),
            *flags,
            timestamp(*flags),
            call_site,
            message,
            *line_mode,
        );
        let mut destination: &SharedWriter = writer;
        destination.write_all(scratch.as_bytes())
    }

    /// Replaces the destination in place and returns the previous one.
    ///
    /// The previous writer is not closed; ownership decisions stay with the
    /// caller.
    #[must_use = "the returned writer may need to be closed by its owner"]
    pub fn replace_writer(&self, writer: SharedWriter) -> SharedWriter {
        let mut state = self.state();
        mem::replace(&mut state.writer, writer)
    }

    /// Returns a handle to the current destination.
    #[must_use]
    pub fn writer(&self) -> SharedWriter {
        self.state().writer.clone()
    }

    /// Returns the current header flags.
    #[must_use]
    pub fn flags(&self) -> OutputFlags {
        self.state().flags
    }

    /// Updates the header flags used for subsequent lines.
    pub fn set_flags(&self, flags: OutputFlags) {
        self.state().flags = flags;
    }

    /// Returns the prefix written at the start of every line.
    #[must_use]
    pub fn prefix(&self) -> String {
        self.state().prefix.clone()
    }

    /// Updates the prefix used for subsequent lines.
    pub fn set_prefix(&self, prefix: impl Into<String>) {
        self.state().prefix = prefix.into();
    }

    /// Flushes the current destination.
    pub fn flush(&self) -> io::Result<()> {
        let writer = self.writer();
        (&writer).flush()
    }
}

impl fmt::Debug for LineSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state();
        f.debug_struct("LineSink")
            .field("writer", &state.writer)
            .field("prefix", &state.prefix)
            .field("flags", &state.flags)
            .field("line_mode", &state.line_mode)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;
    use test_support::CaptureBuffer;

    fn sink_into(buffer: &CaptureBuffer, prefix: &str) -> LineSink {
        LineSink::new(SharedWriter::new(buffer.clone()), prefix, OutputFlags::NONE)
    }

    #[test]
    fn output_appends_newline_by_default() {
        let buffer = CaptureBuffer::new();
        let sink = sink_into(&buffer, "ERROR ");

        sink.output(None, "disk full").unwrap();
        sink.output(None, "vanished\n").unwrap();

        assert_eq!(buffer.lines(), vec!["ERROR disk full", "ERROR vanished"]);
    }

    #[test]
    fn without_newline_preserves_output() {
        let buffer = CaptureBuffer::new();
        let sink = LineSink::with_line_mode(
            SharedWriter::new(buffer.clone()),
            "",
            OutputFlags::NONE,
            LineMode::WithoutNewline,
        );
        sink.output(None, "ready").unwrap();
        assert_eq!(buffer.contents(), "ready");
    }

    #[test]
    fn replace_writer_returns_previous_destination() {
        let buffer = CaptureBuffer::new();
        let original = SharedWriter::new(buffer.clone());
        let sink = LineSink::new(original.clone(), "", OutputFlags::NONE);

        let previous = sink.replace_writer(SharedWriter::new(Vec::new()));
        assert!(previous.same_as(&original));
        assert!(!sink.writer().same_as(&original));
    }

    #[test]
    fn setters_apply_to_subsequent_lines() {
        let buffer = CaptureBuffer::new();
        let sink = sink_into(&buffer, "INFO ");
        sink.output(Some(CallSite::new("a/b.rs", 3)), "one").unwrap();

        sink.set_prefix("NOTE ");
        sink.set_flags(OutputFlags::SHORT_FILE);
        sink.output(Some(CallSite::new("a/b.rs", 4)), "two").unwrap();

        assert_eq!(sink.prefix(), "NOTE ");
        assert_eq!(sink.flags(), OutputFlags::SHORT_FILE);
        assert_eq!(buffer.lines(), vec!["INFO one", "NOTE b.rs:4: two"]);
    }

    #[test]
    fn closed_destination_reports_error() {
        let writer = SharedWriter::new(Vec::new());
        let sink = LineSink::new(writer.clone(), "", OutputFlags::NONE);
        writer.close().unwrap();
        assert!(sink.output(None, "lost").is_err());
    }

    #[test]
    fn concurrent_lines_do_not_interleave() {
        let buffer = CaptureBuffer::new();
        let sink = Arc::new(sink_into(&buffer, "INFO "));

        let handles: Vec<_> = (0..4)
            .map(|worker| {
                let sink = Arc::clone(&sink);
                thread::spawn(move || {
                    for n in 0..50 {
                        sink.output(None, &format!("worker {worker} line {n}")).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let lines = buffer.lines();
        assert_eq!(lines.len(), 200);
        assert!(lines.iter().all(|line| line.starts_with("INFO worker ")));
    }
}
