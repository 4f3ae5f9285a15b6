//! crates/logging/src/global.rs
//! Process-wide logger and free-function facade.
//!
//! The functions here forward to a single [`LevelLogger`] created on first
//! use, so a program can log without threading a logger through its call
//! graph. Routing failures that the context methods return as errors
//! terminate the process instead, after writing a `FATAL` diagnostic.

use std::fmt;
use std::io;
use std::path::Path;
use std::sync::{Arc, OnceLock};

use logging_sink::{LineSink, OutputFlags, SharedWriter};

use crate::error::FailFast;
use crate::levels::{Level, LevelSet};
use crate::logger::LevelLogger;

static GLOBAL: OnceLock<LevelLogger> = OnceLock::new();

/// Returns the process-wide logger.
pub fn global() -> &'static LevelLogger {
    GLOBAL.get_or_init(LevelLogger::new)
}

/// Sets the process-wide threshold by name; unknown names select Info.
pub fn set_level(name: &str) {
    global().set_level(name);
}

/// Sets the process-wide threshold.
pub fn set_loglevel(level: Level) {
    global().set_loglevel(level);
}

/// Returns the process-wide threshold.
pub fn level() -> Level {
    global().level()
}

/// Replaces the process-wide default writer, closing owned files first.
pub fn set_output(writer: SharedWriter) {
    global().set_output(writer);
}

/// Returns the process-wide default writer.
pub fn writer() -> SharedWriter {
    global().writer()
}

/// Routes `selector` to `writer`.
pub fn set_log_output(selector: impl Into<LevelSet>, writer: SharedWriter) {
    global().set_log_output(selector, writer);
}

/// Routes `selector` to the file at `path`, exiting if it cannot be opened.
pub fn set_log_file(selector: impl Into<LevelSet>, path: impl AsRef<Path>) -> SharedWriter {
    let logger = global();
    match logger.set_log_file(selector, path) {
        Ok(writer) => writer,
        Err(error) => logger.terminate(&error),
    }
}

/// Returns the process-wide logger for `level`.
pub fn logger(level: Level) -> Arc<LineSink> {
    global().logger(level)
}

/// Closes every file the process-wide logger opened.
pub fn close() {
    global().close();
}

/// Returns the shared header flags.
pub fn flags() -> OutputFlags {
    global().flags()
}

/// Sets the header flags for every level.
pub fn set_flags(flags: OutputFlags) {
    global().set_flags(flags);
}

/// Returns the prefix of `level`.
pub fn prefix(level: Level) -> String {
    global().prefix(level)
}

/// Sets the prefix for every level in `selector`.
pub fn set_prefix(selector: impl Into<LevelSet>, prefix: &str) {
    global().set_prefix(selector, prefix);
}

/// Controls whether [`fatal()`] exits the process.
pub fn set_fatal_causes_exit(enabled: bool) {
    global().set_fatal_causes_exit(enabled);
}

/// Controls whether vanished log files are recreated.
pub fn set_recreate_logfiles(enabled: bool) {
    global().set_recreate_logfiles(enabled);
}

/// Redirects the process-wide logger's diagnostics.
pub fn set_diagnostic_writer(writer: SharedWriter) {
    global().set_diagnostic_writer(writer);
}

/// Writes a debug line.
#[track_caller]
pub fn debug(args: fmt::Arguments<'_>) {
    global().debug(args);
}

/// Writes an info line.
#[track_caller]
pub fn info(args: fmt::Arguments<'_>) {
    global().info(args);
}

/// Writes a warning line.
#[track_caller]
pub fn warn(args: fmt::Arguments<'_>) {
    global().warn(args);
}

/// Writes an error line.
#[track_caller]
pub fn error(args: fmt::Arguments<'_>) {
    global().error(args);
}

/// Writes an info line.
#[track_caller]
pub fn print(args: fmt::Arguments<'_>) {
    global().print(args);
}

/// Writes an info line terminated by a newline.
#[track_caller]
pub fn println(args: fmt::Arguments<'_>) {
    global().println(args);
}

/// Writes a fatal line and exits unless disabled.
#[track_caller]
pub fn fatal(args: fmt::Arguments<'_>) {
    global().fatal(args);
}

/// Like [`fatal()`] with a terminating newline.
#[track_caller]
pub fn fatalln(args: fmt::Arguments<'_>) {
    global().fatalln(args);
}

/// Writes a fatal line and returns it as a [`FailFast`].
#[track_caller]
pub fn panic(args: fmt::Arguments<'_>) -> FailFast {
    global().panic(args)
}

/// Like [`panic()`] with a terminating newline in the log line.
#[track_caller]
pub fn panicln(args: fmt::Arguments<'_>) -> FailFast {
    global().panicln(args)
}

/// Writes an unfiltered line through the diagnostics sink.
#[track_caller]
pub fn output(args: fmt::Arguments<'_>) -> io::Result<()> {
    global().output(args)
}
