//! crates/logging/src/macros.rs
//! Formatting macros for the leveled logger.
//!
//! Each macro formats its arguments lazily with `format_args!` and forwards
//! them to the process-wide logger, or to a specific
//! [`LevelLogger`](crate::LevelLogger) when the first argument is
//! `logger: <expr>,`. The recorded call site is the macro invocation.

/// Emit a debug line.
///
/// # Example
/// ```
/// use logging::{LevelLogger, OutputFlags, SharedWriter};
/// use test_support::CaptureBuffer;
///
/// let buffer = CaptureBuffer::new();
/// let log = LevelLogger::with_default_writer(SharedWriter::new(buffer.clone()));
/// log.set_flags(OutputFlags::NONE);
///
/// logging::debug!(logger: log, "cache has {} entries", 12);
/// assert_eq!(buffer.lines(), vec!["DEBUG cache has 12 entries"]);
/// ```
#[macro_export]
macro_rules! debug {
    (logger: $logger:expr, $($arg:tt)+) => {
        $crate::LevelLogger::debug(&$logger, ::std::format_args!($($arg)+))
    };
    ($($arg:tt)+) => {
        $crate::debug(::std::format_args!($($arg)+))
    };
}

/// Emit an info line.
///
/// # Example
/// ```ignore
/// logging::info!("listening on {}", addr);
/// ```
#[macro_export]
macro_rules! info {
    (logger: $logger:expr, $($arg:tt)+) => {
        $crate::LevelLogger::info(&$logger, ::std::format_args!($($arg)+))
    };
    ($($arg:tt)+) => {
        $crate::info(::std::format_args!($($arg)+))
    };
}

/// Emit a warning line.
///
/// # Example
/// ```ignore
/// logging::warn!("retrying {} in {}s", host, delay);
/// ```
#[macro_export]
macro_rules! warn {
    (logger: $logger:expr, $($arg:tt)+) => {
        $crate::LevelLogger::warn(&$logger, ::std::format_args!($($arg)+))
    };
    ($($arg:tt)+) => {
        $crate::warn(::std::format_args!($($arg)+))
    };
}

/// Emit an error line.
///
/// # Example
/// ```ignore
/// logging::error!("request {} failed: {}", id, err);
/// ```
#[macro_export]
macro_rules! error {
    (logger: $logger:expr, $($arg:tt)+) => {
        $crate::LevelLogger::error(&$logger, ::std::format_args!($($arg)+))
    };
    ($($arg:tt)+) => {
        $crate::error(::std::format_args!($($arg)+))
    };
}

/// Emit a fatal line and exit the process unless exiting is disabled.
///
/// # Example
/// ```ignore
/// logging::fatal!("cannot bind {}: {}", addr, err);
/// ```
#[macro_export]
macro_rules! fatal {
    (logger: $logger:expr, $($arg:tt)+) => {
        $crate::LevelLogger::fatal(&$logger, ::std::format_args!($($arg)+))
    };
    ($($arg:tt)+) => {
        $crate::fatal(::std::format_args!($($arg)+))
    };
}

/// Emit a fatal line and evaluate to a [`FailFast`](crate::FailFast).
///
/// # Example
/// ```
/// use logging::{FailFast, LevelLogger, OutputFlags, SharedWriter};
/// use test_support::CaptureBuffer;
///
/// fn checked(log: &LevelLogger, index: usize, len: usize) -> Result<usize, FailFast> {
///     if index >= len {
///         return Err(logging::fail_fast!(logger: log, "index {index} out of {len}"));
///     }
///     Ok(index)
/// }
///
/// let buffer = CaptureBuffer::new();
/// let log = LevelLogger::with_default_writer(SharedWriter::new(buffer.clone()));
/// log.set_flags(OutputFlags::NONE);
///
/// let fail = checked(&log, 4, 3).unwrap_err();
/// assert_eq!(fail.message(), "index 4 out of 3");
/// assert_eq!(buffer.lines(), vec!["FATAL index 4 out of 3"]);
/// ```
#[macro_export]
macro_rules! fail_fast {
    (logger: $logger:expr, $($arg:tt)+) => {
        $crate::LevelLogger::panic(&$logger, ::std::format_args!($($arg)+))
    };
    ($($arg:tt)+) => {
        $crate::panic(::std::format_args!($($arg)+))
    };
}
