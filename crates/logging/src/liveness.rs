//! crates/logging/src/liveness.rs
//! Recreates file destinations that disappear while the process runs.
//!
//! Before a logger is handed out, the file recorded for its level (if any)
//! is checked with a metadata lookup. When the lookup fails the file has
//! been removed or rotated away; it is reopened in append mode and every
//! level sharing it is rebound to the new handle.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use logging_sink::SharedWriter;

use crate::error::{IoResultExt, LogError};
use crate::levels::Level;
use crate::registry::{Registry, open_log_file};

/// A routed file that vanished, and what came of recreating it.
///
/// Displays as the note written before the recreation outcome is reported.
#[derive(Debug)]
pub(crate) struct Disappeared {
    pub(crate) path: PathBuf,
    pub(crate) cause: io::Error,
    /// `Ok` carries the flush error of the replaced handle, if any.
    pub(crate) outcome: Result<Option<io::Error>, LogError>,
}

impl fmt::Display for Disappeared {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Logfile disappeared, {} re-creating file {}",
            self.cause,
            self.path.display()
        )
    }
}

impl Registry {
    /// Ensures the file bound to `level` still exists, recreating it if not.
    ///
    /// Every level routed to the same path, or aliased to the stale handle,
    /// is rebound to the new handle and the stale handle is closed. Returns
    /// `None` when nothing had to be done.
    pub(crate) fn heal(&mut self, level: Level) -> Option<Disappeared> {
        if !self.recreate_logfiles {
            return None;
        }
        let path = self.filenames[level.index()].clone()?;
        let cause = fs::metadata(&path).err()?;

        let outcome = open_log_file(&path)
            .or_reopen(&path)
            .map(|fresh| self.replace_open_file(&path, fresh));
        Some(Disappeared {
            path,
            cause,
            outcome,
        })
    }

    fn replace_open_file(&mut self, path: &Path, fresh: SharedWriter) -> Option<io::Error> {
        let stale = self.open_files.insert(path.to_path_buf(), fresh.clone());
        self.rebind_file(path, stale.as_ref(), &fresh);
        stale.and_then(|stale| stale.close().err())
    }
}
