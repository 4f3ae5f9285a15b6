#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! crates/logging-sink/src/lib.rs
//!
//! # Overview
//!
//! `logging-sink` provides the formatted-output primitive used by the leveled
//! logger in the `logging` crate. A [`LineSink`] renders one line at a time
//! into a [`SharedWriter`], prefixing it with a fixed tag, an optional
//! timestamp and the call site that emitted it.
//!
//! # Design
//!
//! - [`SharedWriter`] is a cloneable handle around any [`std::io::Write`]
//!   implementor. Several sinks may hold the same handle, which is how multiple
//!   severity levels share one log file.
//! - [`LineSink`] keeps its writer, prefix, [`OutputFlags`] and [`LineMode`]
//!   behind a single mutex so the destination can be swapped in place while
//!   other threads keep writing through the same sink.
//! - Header rendering lives in [`render_line`] and is a pure function of its
//!   inputs so it can be exercised with a fixed clock.
//!
//! # Invariants
//!
//! - Every call to [`LineSink::output`] issues exactly one `write_all` on the
//!   underlying writer, so lines emitted concurrently never interleave.
//! - `LineMode::WithNewline` appends a newline only when the message does not
//!   already end with one.
//! - Writing through a closed [`SharedWriter`] reports an [`std::io::Error`]
//!   and never panics.
//!
//! # Examples
//!
//! ```
//! use logging_sink::{CallSite, LineSink, OutputFlags, SharedWriter};
//! use test_support::CaptureBuffer;
//!
//! let buffer = CaptureBuffer::new();
//! let sink = LineSink::new(SharedWriter::new(buffer.clone()), "INFO ", OutputFlags::NONE);
//! sink.output(Some(CallSite::new("src/main.rs", 7)), "ready").unwrap();
//!
//! assert_eq!(buffer.contents(), "INFO ready\n");
//! ```

mod flags;
mod format;
mod line_mode;
mod sink;
mod writer;

pub use flags::{OutputFlags, ParseFlagsError};
pub use format::{CallSite, render_line};
pub use line_mode::LineMode;
pub use sink::LineSink;
pub use writer::SharedWriter;
