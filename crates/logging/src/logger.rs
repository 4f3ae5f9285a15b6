//! crates/logging/src/logger.rs
//! The leveled logger: threshold filtering, routing and emission.

use std::fmt;
use std::io;
use std::panic::Location;
use std::path::{Path, PathBuf};
use std::process;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use logging_sink::{CallSite, LineSink, OutputFlags, SharedWriter};

use crate::error::{FailFast, LogError};
use crate::levels::{Level, LevelSet};
use crate::liveness::Disappeared;
use crate::registry::Registry;

/// Prefix of the diagnostics sink used for the facility's own notes.
pub const DIAGNOSTIC_PREFIX: &str = "STD ";

/// A leveled logger routing each [`Level`] to its own destination.
///
/// Every level owns a lazily constructed [`LineSink`] with a fixed prefix
/// (`"DEBUG "` .. `"FATAL "`). Lines below the threshold set with
/// [`set_level`](Self::set_level) are discarded before they are formatted.
/// Levels can be routed to arbitrary writers with
/// [`set_log_output`](Self::set_log_output) or to files with
/// [`set_log_file`](Self::set_log_file); unrouted levels write to the default
/// writer, standard error unless replaced with [`set_output`](Self::set_output).
///
/// File destinations are watched: if a routed file disappears, it is
/// recreated before the next line for any level sharing it is written.
///
/// # Examples
///
/// ```
/// use logging::{Level, LevelLogger, OutputFlags, SharedWriter};
/// use test_support::CaptureBuffer;
///
/// let buffer = CaptureBuffer::new();
/// let logger = LevelLogger::with_default_writer(SharedWriter::new(buffer.clone()));
/// logger.set_flags(OutputFlags::NONE);
/// logger.set_level("warn");
///
/// logger.info(format_args!("suppressed"));
/// logger.warn(format_args!("disk at {}%", 91));
///
/// assert_eq!(buffer.lines(), vec!["WARN disk at 91%"]);
/// assert_eq!(logger.level(), Level::Warn);
/// ```
pub struct LevelLogger {
    threshold: AtomicU8,
    fatal_causes_exit: AtomicBool,
    diagnostics: LineSink,
    registry: Mutex<Registry>,
}

impl LevelLogger {
    /// Creates a logger writing every level to standard error.
    #[must_use]
    pub fn new() -> Self {
        Self::with_default_writer(SharedWriter::stderr())
    }

    /// Creates a logger whose unrouted levels write to `writer`.
    #[must_use]
    pub fn with_default_writer(writer: SharedWriter) -> Self {
        Self {
            threshold: AtomicU8::new(Level::Debug.bit()),
            fatal_causes_exit: AtomicBool::new(true),
            diagnostics: LineSink::new(SharedWriter::stderr(), DIAGNOSTIC_PREFIX, OutputFlags::STD),
            registry: Mutex::new(Registry::new(writer)),
        }
    }

    fn registry(&self) -> MutexGuard<'_, Registry> {
        self.registry.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // ========================================================================
    // Threshold
    // ========================================================================

    /// Sets the threshold by name; unknown names select [`Level::Info`].
    pub fn set_level(&self, name: &str) {
        self.set_loglevel(Level::from_name_or_info(name));
    }

    /// Sets the threshold.
    pub fn set_loglevel(&self, level: Level) {
        self.threshold.store(level.bit(), Ordering::Relaxed);
    }

    /// Returns the threshold.
    #[must_use]
    pub fn level(&self) -> Level {
        Level::from_bit(self.threshold.load(Ordering::Relaxed)).unwrap_or(Level::Debug)
    }

    /// Reports whether lines at `level` are currently emitted.
    #[must_use]
    pub fn is_enabled(&self, level: Level) -> bool {
        level.passes(self.level())
    }

    // ========================================================================
    // Routing
    // ========================================================================

    /// Replaces the default writer.
    ///
    /// All files opened by the logger are closed first and every logger is
    /// dropped, so subsequent lines from unrouted levels go to `writer`.
    /// Levels routed to externally supplied writers keep them.
    pub fn set_output(&self, writer: SharedWriter) {
        let failures = {
            let mut registry = self.registry();
            let failures = registry.close();
            registry.default_writer = writer;
            failures
        };
        self.report_close_failures(failures);
    }

    /// Returns the default writer.
    #[must_use]
    pub fn writer(&self) -> SharedWriter {
        self.registry().default_writer.clone()
    }

    /// Routes every level in `selector` to `writer`.
    ///
    /// Existing loggers are rebound in place. The writer is not tracked as a
    /// file, so it is never recreated and never closed by the logger.
    pub fn set_log_output(&self, selector: impl Into<LevelSet>, writer: SharedWriter) {
        self.registry().set_log_output(selector.into(), &writer);
    }

    /// Routes every level in `selector` to the file at `path`.
    ///
    /// The file is opened for appending and created if missing. Routing a
    /// second selector to the same path reuses the open handle. The returned
    /// handle can be passed to [`set_log_output`](Self::set_log_output) to
    /// alias further levels, or closed explicitly.
    ///
    /// # Errors
    ///
    /// Returns [`LogError::Open`] when the file cannot be opened.
    pub fn set_log_file(
        &self,
        selector: impl Into<LevelSet>,
        path: impl AsRef<Path>,
    ) -> Result<SharedWriter, LogError> {
        self.registry().set_log_file(selector.into(), path.as_ref())
    }

    /// Returns the file `level` is routed to, if any.
    #[must_use]
    pub fn log_file(&self, level: Level) -> Option<PathBuf> {
        self.registry().filenames[level.index()].clone()
    }

    // ========================================================================
    // Loggers
    // ========================================================================

    /// Returns the logger for `level`, recreating its file if it vanished.
    ///
    /// Repeated calls return the same logger until [`close`](Self::close) or
    /// [`set_output`](Self::set_output) drops it. If a vanished file cannot be
    /// recreated the process is terminated; see [`try_logger`](Self::try_logger).
    #[must_use]
    pub fn logger(&self, level: Level) -> Arc<LineSink> {
        match self.try_logger(level) {
            Ok(logger) => logger,
            Err(error) => self.terminate(&error),
        }
    }

    /// Like [`logger`](Self::logger) but reports a failed recreation.
    ///
    /// # Errors
    ///
    /// Returns [`LogError::Reopen`] when the file routed to `level` has
    /// disappeared and cannot be created again.
    pub fn try_logger(&self, level: Level) -> Result<Arc<LineSink>, LogError> {
        let (logger, disappeared) = {
            let mut registry = self.registry();
            let disappeared = registry.heal(level);
            (registry.bind(level), disappeared)
        };
        if let Some(disappeared) = disappeared {
            self.report_disappeared(&disappeared);
            let stale_failure = disappeared.outcome?;
            self.report_close_failures(stale_failure.map(|error| (disappeared.path, error)));
        }
        Ok(logger)
    }

    /// Closes every file opened by the logger and drops every logger.
    ///
    /// Emitting afterwards is valid: loggers are rebuilt against the default
    /// writer, or against externally supplied writers still routed.
    pub fn close(&self) {
        let failures = self.registry().close();
        self.report_close_failures(failures);
    }

    // ========================================================================
    // Formatting and switches
    // ========================================================================

    /// Returns the header flags shared by every level.
    #[must_use]
    pub fn flags(&self) -> OutputFlags {
        self.registry().flags
    }

    /// Sets the header flags for every level, existing loggers included.
    pub fn set_flags(&self, flags: OutputFlags) {
        self.registry().set_flags(flags);
    }

    /// Returns the prefix written before lines at `level`.
    #[must_use]
    pub fn prefix(&self, level: Level) -> String {
        self.registry().prefixes[level.index()].clone()
    }

    /// Sets the prefix for every level in `selector`.
    pub fn set_prefix(&self, selector: impl Into<LevelSet>, prefix: &str) {
        self.registry().set_prefix(selector.into(), prefix);
    }

    /// Controls whether [`fatal`](Self::fatal) exits the process.
    pub fn set_fatal_causes_exit(&self, enabled: bool) {
        self.fatal_causes_exit.store(enabled, Ordering::Relaxed);
    }

    /// Reports whether [`fatal`](Self::fatal) exits the process.
    #[must_use]
    pub fn fatal_causes_exit(&self) -> bool {
        self.fatal_causes_exit.load(Ordering::Relaxed)
    }

    /// Controls whether vanished log files are recreated.
    pub fn set_recreate_logfiles(&self, enabled: bool) {
        self.registry().recreate_logfiles = enabled;
    }

    /// Reports whether vanished log files are recreated.
    #[must_use]
    pub fn recreate_logfiles(&self) -> bool {
        self.registry().recreate_logfiles
    }

    /// Redirects the logger's own diagnostics, standard error by default.
    pub fn set_diagnostic_writer(&self, writer: SharedWriter) {
        let _previous = self.diagnostics.replace_writer(writer);
    }

    // ========================================================================
    // Emission
    // ========================================================================

    /// Writes a line at `level` if it passes the threshold.
    ///
    /// Unlike [`fatal`](Self::fatal), a [`Level::Fatal`] line written through
    /// this method never exits the process.
    #[track_caller]
    pub fn log(&self, level: Level, args: fmt::Arguments<'_>) {
        if self.is_enabled(level) {
            self.emit(level, &args.to_string(), Location::caller());
        }
    }

    /// Writes a debug line.
    #[track_caller]
    pub fn debug(&self, args: fmt::Arguments<'_>) {
        self.log(Level::Debug, args);
    }

    /// Writes an info line.
    #[track_caller]
    pub fn info(&self, args: fmt::Arguments<'_>) {
        self.log(Level::Info, args);
    }

    /// Writes a warning line.
    #[track_caller]
    pub fn warn(&self, args: fmt::Arguments<'_>) {
        self.log(Level::Warn, args);
    }

    /// Writes an error line.
    #[track_caller]
    pub fn error(&self, args: fmt::Arguments<'_>) {
        self.log(Level::Error, args);
    }

    /// Writes an info line; the drop-in for a plain logger's `print`.
    #[track_caller]
    pub fn print(&self, args: fmt::Arguments<'_>) {
        self.log(Level::Info, args);
    }

    /// Writes an info line terminated by a newline.
    #[track_caller]
    pub fn println(&self, args: fmt::Arguments<'_>) {
        if self.is_enabled(Level::Info) {
            self.emit(Level::Info, &format!("{args}\n"), Location::caller());
        }
    }

    /// Writes a fatal line, then exits with status 1 unless disabled with
    /// [`set_fatal_causes_exit`](Self::set_fatal_causes_exit).
    #[track_caller]
    pub fn fatal(&self, args: fmt::Arguments<'_>) {
        self.emit(Level::Fatal, &args.to_string(), Location::caller());
        self.exit_on_fatal();
    }

    /// Like [`fatal`](Self::fatal) with a terminating newline.
    #[track_caller]
    pub fn fatalln(&self, args: fmt::Arguments<'_>) {
        self.emit(Level::Fatal, &format!("{args}\n"), Location::caller());
        self.exit_on_fatal();
    }

    /// Writes a fatal line and returns it as a [`FailFast`].
    ///
    /// The line is always written, regardless of the threshold. The caller
    /// propagates the returned value or [`raise`](FailFast::raise)s it.
    #[track_caller]
    pub fn panic(&self, args: fmt::Arguments<'_>) -> FailFast {
        let message = args.to_string();
        self.emit(Level::Fatal, &message, Location::caller());
        FailFast::new(message)
    }

    /// Like [`panic`](Self::panic) with a terminating newline in the log line.
    #[track_caller]
    pub fn panicln(&self, args: fmt::Arguments<'_>) -> FailFast {
        let message = args.to_string();
        self.emit(Level::Fatal, &format!("{message}\n"), Location::caller());
        FailFast::new(message)
    }

    /// Writes an unfiltered line through the diagnostics sink.
    ///
    /// # Errors
    ///
    /// Returns the error reported by the diagnostics writer.
    #[track_caller]
    pub fn output(&self, args: fmt::Arguments<'_>) -> io::Result<()> {
        self.diagnostics
            .output(Some(CallSite::from(Location::caller())), &args.to_string())
    }

    fn emit(&self, level: Level, message: &str, location: &'static Location<'static>) {
        let logger = self.logger(level);
        // A failed write has nowhere better to be reported.
        let _ = logger.output(Some(CallSite::from(location)), message);
    }

    fn exit_on_fatal(&self) {
        if self.fatal_causes_exit() {
            let _ = self.logger(Level::Fatal).flush();
            process::exit(1);
        }
    }

    /// Reports `error` as a fatal diagnostic and exits with status 1.
    pub(crate) fn terminate(&self, error: &LogError) -> ! {
        #[cfg(feature = "tracing")]
        tracing::error!(error = %error, "log destination unavailable");
        let _ = self.diagnostics.output(None, &format!("FATAL {error}"));
        let _ = self.diagnostics.flush();
        process::exit(1)
    }

    fn report_disappeared(&self, disappeared: &Disappeared) {
        let _ = self.diagnostics.output(None, &format!("ERROR {disappeared}"));
        #[cfg(feature = "tracing")]
        tracing::warn!(
            path = %disappeared.path.display(),
            error = %disappeared.cause,
            "log file disappeared; re-creating"
        );
    }

    fn report_close_failures(&self, failures: impl IntoIterator<Item = (PathBuf, io::Error)>) {
        for (path, error) in failures {
            let _ = self.diagnostics.output(
                None,
                &format!("ERROR could not flush log file {}: {error}", path.display()),
            );
        }
    }
}

impl Default for LevelLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for LevelLogger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LevelLogger")
            .field("level", &self.level())
            .field("fatal_causes_exit", &self.fatal_causes_exit())
            .field("flags", &self.flags())
            .finish_non_exhaustive()
    }
}
