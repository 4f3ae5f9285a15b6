//! crates/logging/src/config.rs
//! Declarative logger configuration: threshold, flags, switches and file routes.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use logging_sink::OutputFlags;

use super::error::LogError;
use super::levels::{Level, LevelSet};
use super::logger::LevelLogger;

/// Complete configuration for a [`LevelLogger`].
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct LoggerConfig {
    /// Minimum level that is emitted.
    pub level: Level,
    /// Header flags shared by every level.
    pub flags: OutputFlags,
    /// Whether fatal lines exit the process.
    pub fatal_causes_exit: bool,
    /// Whether vanished log files are recreated.
    pub recreate_logfiles: bool,
    /// File routes, applied in order.
    pub files: Vec<FileRoute>,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            level: Level::Debug,
            flags: OutputFlags::LEVEL_DEFAULT,
            fatal_causes_exit: true,
            recreate_logfiles: true,
            files: Vec::new(),
        }
    }
}

impl LoggerConfig {
    /// Applies every setting to `logger`.
    ///
    /// Routes are opened in order; a later route for an overlapping selector
    /// replaces an earlier one for the levels they share.
    ///
    /// # Errors
    ///
    /// Returns [`LogError::Open`] for the first route whose file cannot be
    /// opened. Settings and routes before it have already been applied.
    pub fn apply(&self, logger: &LevelLogger) -> Result<(), LogError> {
        logger.set_loglevel(self.level);
        logger.set_flags(self.flags);
        logger.set_fatal_causes_exit(self.fatal_causes_exit);
        logger.set_recreate_logfiles(self.recreate_logfiles);
        for route in &self.files {
            logger.set_log_file(route.levels, &route.path)?;
        }
        Ok(())
    }
}

/// Routes a set of levels to a file, written as `LEVELS=PATH`.
///
/// ```
/// use logging::{FileRoute, Level};
///
/// let route: FileRoute = "warn,error=/var/log/app/errors.log".parse()?;
/// assert!(route.levels.contains(Level::Warn));
/// assert_eq!(route.path.to_str(), Some("/var/log/app/errors.log"));
/// # Ok::<(), logging::LogError>(())
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FileRoute {
    /// Levels written to the file.
    pub levels: LevelSet,
    /// Destination file.
    pub path: PathBuf,
}

impl FileRoute {
    /// Creates a route.
    pub fn new(levels: impl Into<LevelSet>, path: impl Into<PathBuf>) -> Self {
        Self {
            levels: levels.into(),
            path: path.into(),
        }
    }
}

impl FromStr for FileRoute {
    type Err = LogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (levels, path) = s
            .split_once('=')
            .ok_or_else(|| LogError::InvalidRoute(s.to_owned()))?;
        let path = path.trim();
        if path.is_empty() {
            return Err(LogError::InvalidRoute(s.to_owned()));
        }
        let levels: LevelSet = levels.parse()?;
        if levels.is_empty() {
            return Err(LogError::InvalidRoute(s.to_owned()));
        }
        Ok(Self::new(levels, path))
    }
}

impl fmt::Display for FileRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.levels, self.path.display())
    }
}
