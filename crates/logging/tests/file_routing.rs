//! Integration tests for per-level routing.
//!
//! Levels are routed with bitmask selectors either to caller-supplied
//! writers or to files. Files are shared by path: routing two selectors to
//! the same path uses one handle.

use logging::{Level, LevelLogger, LevelSet, OutputFlags, SharedWriter};
use test_support::{CaptureBuffer, LogDir};

fn capture() -> (LevelLogger, CaptureBuffer) {
    let buffer = CaptureBuffer::new();
    let logger = LevelLogger::with_default_writer(SharedWriter::new(buffer.clone()));
    logger.set_flags(OutputFlags::NONE);
    logger.set_fatal_causes_exit(false);
    (logger, buffer)
}

// ============================================================================
// Writer Routing
// ============================================================================

/// Verifies a selector routes every named level and nothing else.
#[test]
fn selector_routes_only_named_levels() {
    let (logger, default) = capture();
    let problems = CaptureBuffer::new();

    logger.set_log_output(Level::Warn | Level::Error, SharedWriter::new(problems.clone()));
    logger.info(format_args!("i"));
    logger.warn(format_args!("w"));
    logger.error(format_args!("e"));
    logger.fatal(format_args!("f"));

    assert_eq!(default.lines(), vec!["INFO i", "FATAL f"]);
    assert_eq!(problems.lines(), vec!["WARN w", "ERROR e"]);
}

/// Verifies rerouting rebinds a logger that was already handed out.
#[test]
fn rerouting_rebinds_live_logger() {
    let (logger, default) = capture();
    let held = logger.logger(Level::Info);
    let routed = CaptureBuffer::new();

    held.output(None, "before").unwrap();
    logger.set_log_output(Level::Info, SharedWriter::new(routed.clone()));
    held.output(None, "after").unwrap();

    assert_eq!(default.lines(), vec!["INFO before"]);
    assert_eq!(routed.lines(), vec!["INFO after"]);
}

/// Verifies an empty selector changes nothing.
#[test]
fn empty_selector_is_a_no_op() {
    let (logger, default) = capture();
    logger.set_log_output(LevelSet::EMPTY, SharedWriter::new(CaptureBuffer::new()));
    logger.error(format_args!("still default"));
    assert_eq!(default.lines(), vec!["ERROR still default"]);
}

/// Verifies undefined selector bits are ignored.
#[test]
fn undefined_selector_bits_are_ignored() {
    let (logger, default) = capture();
    let routed = CaptureBuffer::new();

    logger.set_log_output(
        LevelSet::from_bits_retain(0b1010_0000 | Level::Debug.bit()),
        SharedWriter::new(routed.clone()),
    );
    logger.debug(format_args!("d"));
    logger.info(format_args!("i"));

    assert_eq!(routed.lines(), vec!["DEBUG d"]);
    assert_eq!(default.lines(), vec!["INFO i"]);
}

// ============================================================================
// File Routing
// ============================================================================

/// Verifies one selector of three levels appends them all, in call order,
/// through a single handle.
#[test]
fn combined_selector_writes_one_file_in_order() {
    let dir = LogDir::new().unwrap();
    let (logger, default) = capture();

    let handle = logger
        .set_log_file(Level::Warn | Level::Error | Level::Fatal, dir.file("f.txt"))
        .unwrap();
    logger.warn(format_args!("w"));
    logger.error(format_args!("e"));
    logger.fatal(format_args!("f"));

    for level in [Level::Warn, Level::Error, Level::Fatal] {
        assert!(logger.logger(level).writer().same_as(&handle));
    }
    assert!(default.contents().is_empty());
    assert_eq!(dir.read_lines("f.txt"), vec!["WARN w", "ERROR e", "FATAL f"]);
}

/// Verifies two selectors routed to one path share a handle and a file.
#[test]
fn same_path_shares_one_handle() {
    let dir = LogDir::new().unwrap();
    let (logger, _) = capture();
    let path = dir.file("app.log");

    let first = logger.set_log_file(Level::Warn, &path).unwrap();
    let second = logger.set_log_file(Level::Error, &path).unwrap();
    logger.warn(format_args!("w"));
    logger.error(format_args!("e"));

    assert!(first.same_as(&second));
    assert_eq!(dir.read_lines("app.log"), vec!["WARN w", "ERROR e"]);
}

/// Verifies the returned handle can alias further levels.
#[test]
fn returned_handle_aliases_other_levels() {
    let dir = LogDir::new().unwrap();
    let (logger, default) = capture();

    let errors = logger.set_log_file(Level::Error, dir.file("errors.log")).unwrap();
    logger.set_log_output(Level::Warn, errors);
    logger.warn(format_args!("w"));
    logger.error(format_args!("e"));

    assert_eq!(dir.read_lines("errors.log"), vec!["WARN w", "ERROR e"]);
    assert!(default.contents().is_empty());
    assert_eq!(logger.log_file(Level::Warn), None);
}

/// Verifies an existing file is appended to rather than truncated.
#[test]
fn existing_file_is_appended() {
    let dir = LogDir::new().unwrap();
    std::fs::write(dir.file("app.log"), "earlier\n").unwrap();
    let (logger, _) = capture();

    logger.set_log_file(LevelSet::ALL, dir.file("app.log")).unwrap();
    logger.info(format_args!("later"));

    assert_eq!(dir.read_lines("app.log"), vec!["earlier", "INFO later"]);
}

/// Verifies distinct levels can use distinct files.
#[test]
fn distinct_files_per_level() {
    let dir = LogDir::new().unwrap();
    let (logger, _) = capture();

    logger.set_log_file(Level::Debug, dir.file("debug.log")).unwrap();
    logger.set_log_file(Level::Info, dir.file("info.log")).unwrap();
    logger.debug(format_args!("d"));
    logger.info(format_args!("i"));

    assert_eq!(dir.read_lines("debug.log"), vec!["DEBUG d"]);
    assert_eq!(dir.read_lines("info.log"), vec!["INFO i"]);
}

/// Verifies an unopenable path is reported with its name.
#[test]
fn unopenable_path_is_reported() {
    let dir = LogDir::new().unwrap();
    let (logger, _) = capture();
    let path = dir.file("missing/app.log");

    let error = logger.set_log_file(Level::Error, &path).unwrap_err();

    assert_eq!(error.path(), Some(path.as_path()));
    assert!(error.to_string().contains("app.log"));
}

// ============================================================================
// Teardown
// ============================================================================

/// Verifies close flushes owned files and later lines fall back to default.
#[test]
fn close_then_emit_falls_back_to_default() {
    let dir = LogDir::new().unwrap();
    let (logger, default) = capture();
    let handle = logger.set_log_file(LevelSet::ALL, dir.file("all.log")).unwrap();

    logger.info(format_args!("first"));
    logger.close();
    logger.info(format_args!("second"));

    assert!(handle.is_closed());
    assert_eq!(dir.read_lines("all.log"), vec!["INFO first"]);
    assert_eq!(default.lines(), vec!["INFO second"]);
}

/// Verifies close leaves caller-supplied writers open and routed.
#[test]
fn close_keeps_external_writers() {
    let (logger, _) = capture();
    let external = CaptureBuffer::new();
    let writer = SharedWriter::new(external.clone());

    logger.set_log_output(Level::Error, writer.clone());
    logger.close();
    logger.error(format_args!("kept"));

    assert!(!writer.is_closed());
    assert_eq!(external.lines(), vec!["ERROR kept"]);
}

/// Verifies set_output replaces the default without touching routed levels.
#[test]
fn set_output_moves_unrouted_levels() {
    let (logger, old_default) = capture();
    let routed = CaptureBuffer::new();
    let new_default = CaptureBuffer::new();

    logger.set_log_output(Level::Error, SharedWriter::new(routed.clone()));
    logger.info(format_args!("old"));
    logger.set_output(SharedWriter::new(new_default.clone()));
    logger.info(format_args!("new"));
    logger.error(format_args!("routed"));

    assert_eq!(old_default.lines(), vec!["INFO old"]);
    assert_eq!(new_default.lines(), vec!["INFO new"]);
    assert_eq!(routed.lines(), vec!["ERROR routed"]);
    assert!(logger.writer().same_as(&logger.logger(Level::Info).writer()));
}
