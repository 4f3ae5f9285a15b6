//! Integration tests for threshold filtering.
//!
//! A line is emitted only when the threshold's bit does not exceed the
//! line's level bit. These tests drive a context logger writing into an
//! in-memory buffer and check exactly which lines come out.

use logging::{Level, LevelLogger, OutputFlags, SharedWriter};
use test_support::CaptureBuffer;

fn capture() -> (LevelLogger, CaptureBuffer) {
    let buffer = CaptureBuffer::new();
    let logger = LevelLogger::with_default_writer(SharedWriter::new(buffer.clone()));
    logger.set_flags(OutputFlags::NONE);
    logger.set_fatal_causes_exit(false);
    (logger, buffer)
}

fn emit_all(logger: &LevelLogger) {
    logger.debug(format_args!("debug"));
    logger.info(format_args!("info"));
    logger.warn(format_args!("warn"));
    logger.error(format_args!("error"));
    logger.fatal(format_args!("fatal"));
}

// ============================================================================
// Threshold Changes
// ============================================================================

/// Verifies the canonical sequence: Info, then Error, keeps only "b" and "g".
#[test]
fn threshold_change_mid_stream() {
    let (logger, buffer) = capture();

    logger.set_level("Info");
    logger.debug(format_args!("a"));
    logger.print(format_args!("b"));
    logger.set_level("Error");
    logger.debug(format_args!("c"));
    logger.println(format_args!("d"));
    logger.info(format_args!("e"));
    logger.warn(format_args!("f"));
    logger.error(format_args!("g"));

    let lines = buffer.lines();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].ends_with('b'));
    assert!(lines[1].ends_with('g'));
}

/// Verifies each threshold admits exactly the levels at or above it.
#[test]
fn each_threshold_admits_levels_at_or_above() {
    let expected = [
        (Level::Debug, vec!["DEBUG debug", "INFO info", "WARN warn", "ERROR error", "FATAL fatal"]),
        (Level::Info, vec!["INFO info", "WARN warn", "ERROR error", "FATAL fatal"]),
        (Level::Warn, vec!["WARN warn", "ERROR error", "FATAL fatal"]),
        (Level::Error, vec!["ERROR error", "FATAL fatal"]),
        (Level::Fatal, vec!["FATAL fatal"]),
    ];

    for (threshold, lines) in expected {
        let (logger, buffer) = capture();
        logger.set_loglevel(threshold);
        emit_all(&logger);
        assert_eq!(buffer.lines(), lines, "threshold {threshold}");
    }
}

// ============================================================================
// Level Names
// ============================================================================

/// Verifies names are case-insensitive and "warning" is an alias.
#[test]
fn level_names_are_case_insensitive() {
    let (logger, _) = capture();

    logger.set_level("WARNING");
    assert_eq!(logger.level(), Level::Warn);
    logger.set_level("Debug");
    assert_eq!(logger.level(), Level::Debug);
    logger.set_level("fAtAl");
    assert_eq!(logger.level(), Level::Fatal);
}

/// Verifies an unrecognised name behaves as Info.
#[test]
fn unknown_name_behaves_as_info() {
    let (logger, buffer) = capture();

    logger.set_level("everything");
    logger.debug(format_args!("hidden"));
    logger.info(format_args!("shown"));

    assert_eq!(buffer.lines(), vec!["INFO shown"]);
}

// ============================================================================
// Print Family
// ============================================================================

/// Verifies print and println are filtered as Info.
#[test]
fn print_family_is_info() {
    let (logger, buffer) = capture();

    logger.print(format_args!("one"));
    logger.println(format_args!("two"));
    logger.set_level("warn");
    logger.print(format_args!("three"));
    logger.println(format_args!("four"));

    assert_eq!(buffer.lines(), vec!["INFO one", "INFO two"]);
}

/// Verifies fatal lines are written at every threshold.
#[test]
fn fatal_is_never_filtered() {
    for threshold in Level::ALL {
        let (logger, buffer) = capture();
        logger.set_loglevel(threshold);
        logger.fatal(format_args!("down"));
        assert_eq!(buffer.lines(), vec!["FATAL down"]);
    }
}

/// Verifies suppressed lines are never formatted.
#[test]
fn filtered_lines_are_not_formatted() {
    struct Loud;
    impl std::fmt::Display for Loud {
        fn fmt(&self, _: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            panic!("formatted a suppressed line");
        }
    }

    let (logger, buffer) = capture();
    logger.set_level("error");
    logger.debug(format_args!("{}", Loud));
    logger.info(format_args!("{}", Loud));

    assert!(buffer.contents().is_empty());
}
