//! crates/logging/src/error.rs
//! Error types for log routing and fail-fast reporting.

use std::io;
use std::path::{Path, PathBuf};

use crate::levels::ParseLevelError;

/// Error raised while configuring or healing log destinations.
#[derive(Debug, thiserror::Error)]
pub enum LogError {
    /// A log file could not be opened when it was first routed.
    #[error("could not open log file {path}: {source}")]
    Open {
        /// The file that failed to open.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// A log file vanished and could not be recreated.
    #[error("could not reacquire log file {path}: {source}")]
    Reopen {
        /// The file that failed to reopen.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// A `LEVELS=PATH` route was malformed.
    #[error("invalid log route '{0}': expected LEVELS=PATH")]
    InvalidRoute(String),

    /// A level name or selector could not be parsed.
    #[error(transparent)]
    Level(#[from] ParseLevelError),
}

impl LogError {
    /// Creates an [`LogError::Open`] for `path`.
    pub fn open(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Open {
            path: path.into(),
            source,
        }
    }

    /// Creates an [`LogError::Reopen`] for `path`.
    pub fn reopen(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Reopen {
            path: path.into(),
            source,
        }
    }

    /// Returns the file involved, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Open { path, .. } | Self::Reopen { path, .. } => Some(path),
            Self::InvalidRoute(_) | Self::Level(_) => None,
        }
    }
}

/// Maps `io::Result` failures to [`LogError`] with path context.
pub(crate) trait IoResultExt<T> {
    fn or_open(self, path: &Path) -> Result<T, LogError>;
    fn or_reopen(self, path: &Path) -> Result<T, LogError>;
}

impl<T> IoResultExt<T> for io::Result<T> {
    fn or_open(self, path: &Path) -> Result<T, LogError> {
        self.map_err(|e| LogError::open(path, e))
    }

    fn or_reopen(self, path: &Path) -> Result<T, LogError> {
        self.map_err(|e| LogError::reopen(path, e))
    }
}

/// An unrecoverable condition reported at the fatal level.
///
/// Returned by the panic-style emission calls after the message has been
/// logged. The host decides whether to propagate it as an error or to
/// [`raise`](Self::raise) it as a panic.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[error("{message}")]
#[must_use = "a fail-fast condition should be propagated or raised"]
pub struct FailFast {
    message: String,
}

impl FailFast {
    /// Wraps an already logged message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Returns the logged message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Panics with the message as the payload.
    pub fn raise(self) -> ! {
        std::panic::panic_any(self.message)
    }
}
