//! crates/logging-sink/src/format.rs
//! Header rendering for a single log line.

use std::fmt::Write as _;
use std::panic::Location;

use time::OffsetDateTime;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;

use crate::flags::OutputFlags;
use crate::line_mode::LineMode;

const DATE_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]/[month padding:zero]/[day padding:zero]");
const TIME_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[hour padding:zero]:[minute padding:zero]:[second padding:zero]");
const MICROS_FORMAT: &[BorrowedFormatItem<'static>] = format_description!(
    "[hour padding:zero]:[minute padding:zero]:[second padding:zero].[subsecond digits:6]"
);

/// Source location reported in the header of a rendered line.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct CallSite<'a> {
    file: &'a str,
    line: u32,
}

impl<'a> CallSite<'a> {
    /// Creates a call site from a file path and line number.
    #[must_use]
    pub const fn new(file: &'a str, line: u32) -> Self {
        Self { file, line }
    }

    /// Returns the file path as recorded by the compiler.
    #[must_use]
    pub const fn file(&self) -> &'a str {
        self.file
    }

    /// Returns the line number.
    #[must_use]
    pub const fn line(&self) -> u32 {
        self.line
    }

    /// Returns the final path element of [`file`](Self::file).
    #[must_use]
    pub fn short_file(&self) -> &'a str {
        self.file
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or(self.file)
    }
}

impl From<&'static Location<'static>> for CallSite<'static> {
    fn from(location: &'static Location<'static>) -> Self {
        Self::new(location.file(), location.line())
    }
}

/// Renders `message` with its header into `buf`.
///
/// The layout is `prefix`, then the date and time selected by `flags`, then
/// the call site as `file:line: `, then the message. Missing call sites are
/// shown as `???:0` when a file flag is set.
pub fn render_line(
    buf: &mut String,
    prefix: &str,
    flags: OutputFlags,
    now: OffsetDateTime,
    call_site: Option<CallSite<'_>>,
    message: &str,
    line_mode: LineMode,
) {
    buf.push_str(prefix);

    if flags.contains(OutputFlags::DATE) {
        if let Ok(date) = now.format(DATE_FORMAT) {
            buf.push_str(&date);
            buf.push(' ');
        }
    }

    if flags.wants_time() {
        let format = if flags.contains(OutputFlags::MICROSECONDS) {
            MICROS_FORMAT
        } else {
            TIME_FORMAT
        };
        if let Ok(clock) = now.format(format) {
            buf.push_str(&clock);
            buf.push(' ');
        }
    }

    if flags.wants_file() {
        let (file, line) = match call_site {
            Some(site) if flags.contains(OutputFlags::SHORT_FILE) => (site.short_file(), site.line()),
            Some(site) => (site.file(), site.line()),
            None => ("???", 0),
        };
        let _ = write!(buf, "{file}:{line}: ");
    }

    buf.push_str(message);
    if line_mode.needs_terminator(message) {
        buf.push('\n');
    }
}

/// Returns the current time in the zone selected by `flags`.
///
/// The local offset cannot always be determined (for example in
/// multi-threaded processes on some platforms); UTC is used in that case.
pub(crate) fn timestamp(flags: OutputFlags) -> OffsetDateTime {
    if flags.contains(OutputFlags::UTC) {
        OffsetDateTime::now_utc()
    } else {
        OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc())
    }
}
