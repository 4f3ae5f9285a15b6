#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `logging` is a leveled logger. Each of the five severities (debug, info,
//! warn, error, fatal) owns its own [`LineSink`] with a fixed prefix, and
//! each can be routed independently: to the shared default writer, to any
//! writer supplied by the caller, or to a file shared with other levels.
//!
//! # Design
//!
//! - [`Level`] values are distinct bits so a [`LevelSet`] can address several
//!   levels in one routing call.
//! - [`LevelLogger`] is the context object. It keeps per-level writers, the
//!   filenames they came from, the open file handles and the lazily built
//!   loggers together behind one mutex.
//! - Before a logger is handed out the file routed to its level is checked.
//!   A file that was deleted or rotated away is recreated and every level
//!   sharing it is rebound to the new handle.
//! - [`global()`] exposes a process-wide [`LevelLogger`], driven by the free
//!   functions and macros in this crate.
//!
//! # Invariants
//!
//! - A line at level `L` is written only if the threshold's bit is not
//!   greater than `L`'s bit.
//! - [`LevelLogger::logger`] returns the same sink for a level until
//!   [`LevelLogger::close`] or [`LevelLogger::set_output`].
//! - Writers supplied by the caller are never closed by the logger.
//!
//! # Errors
//!
//! Routing calls on [`LevelLogger`] return [`LogError`]. The process-wide
//! facade treats those errors as unrecoverable and exits with status 1 after
//! writing a `FATAL` diagnostic. [`fatal()`] exits the same way unless
//! disabled with [`set_fatal_causes_exit`]. [`panic()`] and [`fail_fast!`]
//! return a [`FailFast`] for the caller to propagate or raise.
//!
//! # Examples
//!
//! Route warnings and errors to one file while everything else goes to an
//! in-memory buffer:
//!
//! ```
//! use logging::{Level, LevelLogger, OutputFlags, SharedWriter};
//! use test_support::{CaptureBuffer, LogDir};
//!
//! let dir = LogDir::new()?;
//! let buffer = CaptureBuffer::new();
//! let logger = LevelLogger::with_default_writer(SharedWriter::new(buffer.clone()));
//! logger.set_flags(OutputFlags::NONE);
//!
//! logger.set_log_file(Level::Warn | Level::Error, dir.file("problems.log"))?;
//! logger.info(format_args!("starting"));
//! logger.warn(format_args!("slow disk"));
//! logger.error(format_args!("write failed"));
//!
//! assert_eq!(buffer.lines(), vec!["INFO starting"]);
//! assert_eq!(dir.read_lines("problems.log"), vec!["WARN slow disk", "ERROR write failed"]);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # See also
//!
//! - [`logging_sink`] for line rendering and the shared writer handle.

mod config;
mod error;
mod global;
mod levels;
mod liveness;
mod logger;
mod macros;
mod registry;
#[cfg(feature = "tracing")]
mod tracing_bridge;

pub use config::{FileRoute, LoggerConfig};
pub use error::{FailFast, LogError};
pub use global::{
    close, debug, error, fatal, fatalln, flags, global, info, level, logger, output, panic,
    panicln, prefix, print, println, set_diagnostic_writer, set_fatal_causes_exit, set_flags,
    set_level, set_log_file, set_log_output, set_loglevel, set_output, set_prefix,
    set_recreate_logfiles, warn, writer,
};
pub use levels::{Level, LevelSet, LevelSetIter, ParseLevelError};
pub use logger::{DIAGNOSTIC_PREFIX, LevelLogger};
pub use logging_sink::{CallSite, LineMode, LineSink, OutputFlags, ParseFlagsError, SharedWriter};
#[cfg(feature = "tracing")]
pub use tracing_bridge::{LevelLayer, init_tracing};
