//! crates/logging/src/registry.rs
//! Per-level writer bindings, owned log files and lazily built loggers.
//!
//! A [`Registry`] is only ever touched while the owning
//! [`LevelLogger`](crate::LevelLogger) holds its mutex, so every method here
//! takes `&mut self` and performs no locking of its own.

use std::collections::HashMap;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use logging_sink::{LineSink, OutputFlags, SharedWriter};

use crate::error::{IoResultExt, LogError};
use crate::levels::{Level, LevelSet};

const LEVELS: usize = Level::ALL.len();

pub(crate) struct Registry {
    pub(crate) default_writer: SharedWriter,
    pub(crate) writers: [Option<SharedWriter>; LEVELS],
    pub(crate) filenames: [Option<PathBuf>; LEVELS],
    pub(crate) open_files: HashMap<PathBuf, SharedWriter>,
    pub(crate) loggers: [Option<Arc<LineSink>>; LEVELS],
    pub(crate) flags: OutputFlags,
    pub(crate) prefixes: [String; LEVELS],
    pub(crate) recreate_logfiles: bool,
}

impl Registry {
    pub(crate) fn new(default_writer: SharedWriter) -> Self {
        Self {
            default_writer,
            writers: Default::default(),
            filenames: Default::default(),
            open_files: HashMap::new(),
            loggers: Default::default(),
            flags: OutputFlags::LEVEL_DEFAULT,
            prefixes: Level::ALL.map(|level| level.prefix().to_owned()),
            recreate_logfiles: true,
        }
    }

    /// Returns the writer a logger for `level` should be bound to.
    pub(crate) fn writer_for(&self, level: Level) -> SharedWriter {
        self.writers[level.index()]
            .clone()
            .unwrap_or_else(|| self.default_writer.clone())
    }

    /// Returns the logger for `level`, constructing it on first use.
    pub(crate) fn bind(&mut self, level: Level) -> Arc<LineSink> {
        let writer = self.writer_for(level);
        let prefix = &self.prefixes[level.index()];
        let flags = self.flags;
        Arc::clone(
            self.loggers[level.index()]
                .get_or_insert_with(|| Arc::new(LineSink::new(writer, prefix.as_str(), flags))),
        )
    }

    /// Points every level in `selector` at `writer`, rebinding live loggers.
    pub(crate) fn set_log_output(&mut self, selector: LevelSet, writer: &SharedWriter) {
        for level in selector {
            self.writers[level.index()] = Some(writer.clone());
            let _previous = self.bind(level).replace_writer(writer.clone());
        }
    }

    /// Routes `selector` to the file at `path`, reusing an open handle.
    pub(crate) fn set_log_file(
        &mut self,
        selector: LevelSet,
        path: &Path,
    ) -> Result<SharedWriter, LogError> {
        let writer = match self.open_files.get(path) {
            Some(existing) if !existing.is_closed() => existing.clone(),
            _ => {
                let opened = open_log_file(path).or_open(path)?;
                self.open_files.insert(path.to_path_buf(), opened.clone());
                opened
            }
        };

        self.set_log_output(selector, &writer);
        for level in selector {
            self.filenames[level.index()] = Some(path.to_path_buf());
        }
        Ok(writer)
    }

    /// Rebinds every level that shares `path` or `stale` to `fresh`.
    pub(crate) fn rebind_file(
        &mut self,
        path: &Path,
        stale: Option<&SharedWriter>,
        fresh: &SharedWriter,
    ) {
        for level in Level::ALL {
            let index = level.index();
            let by_name = self.filenames[index].as_deref() == Some(path);
            let by_handle = match (stale, &self.writers[index]) {
                (Some(stale), Some(current)) => current.same_as(stale),
                _ => false,
            };
            if !(by_name || by_handle) {
                continue;
            }
            self.writers[index] = Some(fresh.clone());
            if let Some(logger) = &self.loggers[index] {
                let _previous = logger.replace_writer(fresh.clone());
            }
        }
    }

    /// Drops every logger and closes every owned file.
    ///
    /// Returns the paths whose final flush failed along with the error so
    /// the caller can report them. Levels bound to a closed handle fall back
    /// to the default writer; externally supplied writers stay bound.
    pub(crate) fn close(&mut self) -> Vec<(PathBuf, std::io::Error)> {
        self.loggers = Default::default();

        let mut failures = Vec::new();
        for (path, writer) in self.open_files.drain() {
            if let Err(error) = writer.close() {
                failures.push((path, error));
            }
        }

        for index in 0..LEVELS {
            if self.writers[index].take_if(|writer| writer.is_closed()).is_some() {
                self.filenames[index] = None;
            }
        }
        failures
    }

    pub(crate) fn set_flags(&mut self, flags: OutputFlags) {
        self.flags = flags;
        for logger in self.loggers.iter().flatten() {
            logger.set_flags(flags);
        }
    }

    pub(crate) fn set_prefix(&mut self, selector: LevelSet, prefix: &str) {
        for level in selector {
            self.prefixes[level.index()] = prefix.to_owned();
            if let Some(logger) = &self.loggers[level.index()] {
                logger.set_prefix(prefix);
            }
        }
    }
}

/// Opens `path` for appending, creating it when missing.
pub(crate) fn open_log_file(path: &Path) -> std::io::Result<SharedWriter> {
    let file: File = OpenOptions::new()
        .read(true)
        .create(true)
        .append(true)
        .open(path)?;
    Ok(SharedWriter::labelled(file, path.display().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_support::{CaptureBuffer, LogDir};

    fn registry_with(buffer: &CaptureBuffer) -> Registry {
        Registry::new(SharedWriter::new(buffer.clone()))
    }

    #[test]
    fn bind_is_lazy_and_idempotent() {
        let buffer = CaptureBuffer::new();
        let mut registry = registry_with(&buffer);

        assert!(registry.loggers.iter().all(Option::is_none));
        let first = registry.bind(Level::Warn);
        let second = registry.bind(Level::Warn);

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.prefix(), "WARN ");
        assert!(registry.loggers[Level::Info.index()].is_none());
    }

    #[test]
    fn unrouted_levels_use_default_writer() {
        let buffer = CaptureBuffer::new();
        let mut registry = registry_with(&buffer);

        let logger = registry.bind(Level::Info);
        assert!(logger.writer().same_as(&registry.default_writer));
    }

    #[test]
    fn set_log_output_rebinds_existing_logger_in_place() {
        let buffer = CaptureBuffer::new();
        let mut registry = registry_with(&buffer);
        let before = registry.bind(Level::Error);

        let routed = SharedWriter::new(CaptureBuffer::new());
        registry.set_log_output(Level::Error | Level::Fatal, &routed);

        let after = registry.bind(Level::Error);
        assert!(Arc::ptr_eq(&before, &after));
        assert!(after.writer().same_as(&routed));
        assert!(registry.loggers[Level::Fatal.index()].is_some());
        assert!(registry.filenames.iter().all(Option::is_none));
    }

    #[test]
    fn set_log_file_shares_one_handle_per_path() {
        let dir = LogDir::new().unwrap();
        let path = dir.file("shared.log");
        let mut registry = registry_with(&CaptureBuffer::new());

        let warn = registry.set_log_file(LevelSet::WARN, &path).unwrap();
        let error = registry.set_log_file(LevelSet::ERROR, &path).unwrap();

        assert!(warn.same_as(&error));
        assert_eq!(registry.open_files.len(), 1);
        assert_eq!(registry.filenames[Level::Warn.index()].as_deref(), Some(path.as_path()));
        assert_eq!(registry.filenames[Level::Error.index()].as_deref(), Some(path.as_path()));
    }

    #[test]
    fn set_log_file_reports_open_failure() {
        let dir = LogDir::new().unwrap();
        let path = dir.file("missing/dir/app.log");
        let mut registry = registry_with(&CaptureBuffer::new());

        let error = registry.set_log_file(LevelSet::ALL, &path).unwrap_err();
        assert!(matches!(error, LogError::Open { .. }));
        assert!(registry.writers.iter().all(Option::is_none));
    }

    #[test]
    fn close_releases_owned_files_but_keeps_external_writers() {
        let dir = LogDir::new().unwrap();
        let external = SharedWriter::new(CaptureBuffer::new());
        let mut registry = registry_with(&CaptureBuffer::new());

        let file = registry.set_log_file(LevelSet::ERROR, &dir.file("e.log")).unwrap();
        registry.set_log_output(LevelSet::WARN, &file);
        registry.set_log_output(LevelSet::INFO, &external);
        registry.bind(Level::Error);

        assert!(registry.close().is_empty());

        assert!(file.is_closed());
        assert!(!external.is_closed());
        assert!(registry.loggers.iter().all(Option::is_none));
        assert!(registry.writers[Level::Error.index()].is_none());
        assert!(registry.writers[Level::Warn.index()].is_none());
        assert!(registry.filenames[Level::Error.index()].is_none());
        assert!(registry.writers[Level::Info.index()].as_ref().unwrap().same_as(&external));
    }

    #[test]
    fn rebind_file_matches_name_and_alias() {
        let dir = LogDir::new().unwrap();
        let path = dir.file("app.log");
        let mut registry = registry_with(&CaptureBuffer::new());

        let stale = registry.set_log_file(LevelSet::ERROR, &path).unwrap();
        registry.set_log_output(LevelSet::WARN, &stale);
        let error_logger = registry.bind(Level::Error);

        let fresh = SharedWriter::new(CaptureBuffer::new());
        registry.rebind_file(&path, Some(&stale), &fresh);

        assert!(error_logger.writer().same_as(&fresh));
        assert!(registry.writers[Level::Warn.index()].as_ref().unwrap().same_as(&fresh));
        assert!(registry.writers[Level::Info.index()].is_none());
    }

    #[test]
    fn set_flags_and_prefix_reach_live_loggers() {
        let mut registry = registry_with(&CaptureBuffer::new());
        let debug = registry.bind(Level::Debug);

        registry.set_flags(OutputFlags::NONE);
        registry.set_prefix(LevelSet::DEBUG | LevelSet::INFO, "trace: ");

        assert_eq!(debug.flags(), OutputFlags::NONE);
        assert_eq!(debug.prefix(), "trace: ");
        assert_eq!(registry.bind(Level::Info).prefix(), "trace: ");
        assert_eq!(registry.bind(Level::Warn).prefix(), "WARN ");
    }
}
