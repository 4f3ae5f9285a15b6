//! crates/logging/src/levels.rs
//! Severity levels and the bit set used to address several levels at once.

use std::fmt;
use std::ops::{BitOr, BitOrAssign};
use std::str::FromStr;

/// Severity of a log line.
///
/// Each level is a distinct bit so levels can be combined into a
/// [`LevelSet`] when routing output.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
#[repr(u8)]
pub enum Level {
    /// Diagnostic detail for developers.
    Debug = 1,
    /// Routine operational messages.
    Info = 1 << 1,
    /// Something unexpected that the program recovered from.
    Warn = 1 << 2,
    /// A failed operation.
    Error = 1 << 3,
    /// A condition that ends the process.
    Fatal = 1 << 4,
}

impl Level {
    /// Every level, lowest bit first.
    pub const ALL: [Self; 5] = [Self::Debug, Self::Info, Self::Warn, Self::Error, Self::Fatal];

    /// Returns the bit representing this level.
    #[must_use]
    pub const fn bit(self) -> u8 {
        self as u8
    }

    /// Returns a dense index in `0..5`, used for per-level tables.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Debug => 0,
            Self::Info => 1,
            Self::Warn => 2,
            Self::Error => 3,
            Self::Fatal => 4,
        }
    }

    /// Returns the tag written at the start of every line of this level.
    #[must_use]
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::Debug => "DEBUG ",
            Self::Info => "INFO ",
            Self::Warn => "WARN ",
            Self::Error => "ERROR ",
            Self::Fatal => "FATAL ",
        }
    }

    /// Returns the upper-case level name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warn => "WARN",
            Self::Error => "ERROR",
            Self::Fatal => "FATAL",
        }
    }

    /// Returns the level whose bit equals `bit`, if any.
    #[must_use]
    pub const fn from_bit(bit: u8) -> Option<Self> {
        match bit {
            1 => Some(Self::Debug),
            2 => Some(Self::Info),
            4 => Some(Self::Warn),
            8 => Some(Self::Error),
            16 => Some(Self::Fatal),
            _ => None,
        }
    }

    /// Parses a level name, falling back to [`Level::Info`] for unknown names.
    ///
    /// ```
    /// use logging::Level;
    ///
    /// assert_eq!(Level::from_name_or_info("Warning"), Level::Warn);
    /// assert_eq!(Level::from_name_or_info("verbose"), Level::Info);
    /// ```
    #[must_use]
    pub fn from_name_or_info(name: &str) -> Self {
        name.parse().unwrap_or(Self::Info)
    }

    /// Reports whether a line at this level is emitted under `threshold`.
    ///
    /// The comparison is made on the raw bit values: a line is suppressed
    /// only when the threshold bit is strictly greater than the level bit.
    #[must_use]
    pub const fn passes(self, threshold: Self) -> bool {
        threshold.bit() <= self.bit()
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a level name is not recognised.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[error("unknown log level: {0}")]
pub struct ParseLevelError(String);

impl FromStr for Level {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" | "warning" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            "fatal" => Ok(Self::Fatal),
            _ => Err(ParseLevelError(s.to_owned())),
        }
    }
}

/// A selector: any combination of [`Level`] bits.
///
/// Configuration calls that accept a selector apply independently to every
/// level in the set. Bits outside the five defined levels are retained but
/// never yielded by [`iter`](Self::iter), so they are ignored.
///
/// ```
/// use logging::{Level, LevelSet};
///
/// let selector = Level::Warn | Level::Error | Level::Fatal;
/// assert!(selector.contains(Level::Error));
/// assert!(!selector.contains(Level::Info));
/// assert_eq!(selector.iter().count(), 3);
/// assert_eq!(LevelSet::ALL.iter().count(), 5);
/// ```
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "String", into = "String")
)]
pub struct LevelSet(u8);

impl LevelSet {
    /// The empty selector; configuration calls with it are no-ops.
    pub const EMPTY: Self = Self(0);
    /// Only [`Level::Debug`].
    pub const DEBUG: Self = Self(Level::Debug.bit());
    /// Only [`Level::Info`].
    pub const INFO: Self = Self(Level::Info.bit());
    /// Only [`Level::Warn`].
    pub const WARN: Self = Self(Level::Warn.bit());
    /// Only [`Level::Error`].
    pub const ERROR: Self = Self(Level::Error.bit());
    /// Only [`Level::Fatal`].
    pub const FATAL: Self = Self(Level::Fatal.bit());
    /// Every defined level.
    pub const ALL: Self = Self(
        Level::Debug.bit()
            | Level::Info.bit()
            | Level::Warn.bit()
            | Level::Error.bit()
            | Level::Fatal.bit(),
    );

    /// Builds a selector from raw bits, keeping undefined bits.
    #[must_use]
    pub const fn from_bits_retain(bits: u8) -> Self {
        Self(bits)
    }

    /// Returns the raw bits.
    #[must_use]
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Reports whether `level` is selected.
    #[must_use]
    pub const fn contains(self, level: Level) -> bool {
        self.0 & level.bit() != 0
    }

    /// Reports whether no defined level is selected.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 & Self::ALL.0 == 0
    }

    /// Returns `self` with `level` added.
    #[must_use]
    pub const fn with(self, level: Level) -> Self {
        Self(self.0 | level.bit())
    }

    /// Iterates the selected levels, lowest bit first.
    #[must_use]
    pub const fn iter(self) -> LevelSetIter {
        LevelSetIter {
            set: self,
            next: 0,
        }
    }
}

/// Iterator over the levels of a [`LevelSet`].
#[derive(Clone, Debug)]
pub struct LevelSetIter {
    set: LevelSet,
    next: usize,
}

impl Iterator for LevelSetIter {
    type Item = Level;

    fn next(&mut self) -> Option<Level> {
        while let Some(level) = Level::ALL.get(self.next).copied() {
            self.next += 1;
            if self.set.contains(level) {
                return Some(level);
            }
        }
        None
    }
}

impl From<Level> for LevelSet {
    fn from(level: Level) -> Self {
        Self(level.bit())
    }
}

impl BitOr for Level {
    type Output = LevelSet;

    fn bitor(self, rhs: Self) -> LevelSet {
        LevelSet(self.bit() | rhs.bit())
    }
}

impl BitOr<Level> for LevelSet {
    type Output = Self;

    fn bitor(self, rhs: Level) -> Self {
        self.with(rhs)
    }
}

impl BitOr for LevelSet {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign<Level> for LevelSet {
    fn bitor_assign(&mut self, rhs: Level) {
        *self = self.with(rhs);
    }
}

impl IntoIterator for LevelSet {
    type Item = Level;
    type IntoIter = LevelSetIter;

    fn into_iter(self) -> LevelSetIter {
        self.iter()
    }
}

impl fmt::Display for LevelSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if *self == Self::ALL {
            return f.write_str("all");
        }
        if self.is_empty() {
            return f.write_str("none");
        }
        let mut first = true;
        for level in self.iter() {
            if !first {
                f.write_str(",")?;
            }
            f.write_str(&level.name().to_ascii_lowercase())?;
            first = false;
        }
        Ok(())
    }
}

impl FromStr for LevelSet {
    type Err = ParseLevelError;

    /// Parses `all`, `none`, or level names separated by `,` or `|`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut set = Self::EMPTY;
        for token in s.split([',', '|']).map(str::trim).filter(|t| !t.is_empty()) {
            match token.to_ascii_lowercase().as_str() {
                "all" => set = set | Self::ALL,
                "none" => {}
                _ => set |= token.parse::<Level>()?,
            }
        }
        Ok(set)
    }
}

impl TryFrom<String> for LevelSet {
    type Error = ParseLevelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<LevelSet> for String {
    fn from(set: LevelSet) -> Self {
        set.to_string()
    }
}
