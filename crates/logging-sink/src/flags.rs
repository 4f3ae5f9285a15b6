//! crates/logging-sink/src/flags.rs
//! Header flags controlling timestamp and call-site rendering.

use std::fmt;
use std::ops::{BitOr, BitOrAssign};
use std::str::FromStr;

/// Bit set selecting which header fields precede each rendered line.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "String", into = "String")
)]
pub struct OutputFlags(u32);

/// Names accepted by [`OutputFlags::from_str`], in rendering order.
const NAMED_FLAGS: [(&str, OutputFlags); 6] = [
    ("date", OutputFlags::DATE),
    ("time", OutputFlags::TIME),
    ("microseconds", OutputFlags::MICROSECONDS),
    ("longfile", OutputFlags::LONG_FILE),
    ("shortfile", OutputFlags::SHORT_FILE),
    ("utc", OutputFlags::UTC),
];

impl OutputFlags {
    /// No header fields; only the prefix and the message are written.
    pub const NONE: Self = Self(0);
    /// Date in the selected time zone: `2009/01/23`.
    pub const DATE: Self = Self(1);
    /// Wall clock time: `01:23:23`.
    pub const TIME: Self = Self(1 << 1);
    /// Microsecond resolution: `01:23:23.123123`. Implies [`Self::TIME`].
    pub const MICROSECONDS: Self = Self(1 << 2);
    /// Full file name and line number: `/a/b/c/d.rs:23`.
    pub const LONG_FILE: Self = Self(1 << 3);
    /// Final file name element and line number: `d.rs:23`. Overrides [`Self::LONG_FILE`].
    pub const SHORT_FILE: Self = Self(1 << 4);
    /// Render timestamps in UTC rather than the local time zone.
    pub const UTC: Self = Self(1 << 5);
    /// Date and time, the flags used for facility diagnostics.
    pub const STD: Self = Self(Self::DATE.0 | Self::TIME.0);
    /// Date, time and short file name, the default for level loggers.
    pub const LEVEL_DEFAULT: Self = Self(Self::STD.0 | Self::SHORT_FILE.0);

    const KNOWN: u32 = 0b11_1111;

    /// Returns the raw bit representation.
    #[must_use]
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Builds a flag set from raw bits, discarding bits with no meaning.
    #[must_use]
    pub const fn from_bits_truncate(bits: u32) -> Self {
        Self(bits & Self::KNOWN)
    }

    /// Reports whether every flag in `other` is also set in `self`.
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Reports whether no flag is set.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Returns `self` with the flags in `other` added.
    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Returns `self` with the flags in `other` removed.
    #[must_use]
    pub const fn difference(self, other: Self) -> Self {
        Self(self.0 & !other.0)
    }

    pub(crate) const fn wants_time(self) -> bool {
        self.0 & (Self::TIME.0 | Self::MICROSECONDS.0) != 0
    }

    pub(crate) const fn wants_file(self) -> bool {
        self.0 & (Self::LONG_FILE.0 | Self::SHORT_FILE.0) != 0
    }
}

impl BitOr for OutputFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

impl BitOrAssign for OutputFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        *self = self.union(rhs);
    }
}

impl fmt::Display for OutputFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("none");
        }
        let mut first = true;
        for (name, flag) in NAMED_FLAGS {
            if self.contains(flag) {
                if !first {
                    f.write_str(",")?;
                }
                f.write_str(name)?;
                first = false;
            }
        }
        Ok(())
    }
}

/// Error returned when a flag list contains an unknown name.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[error("unknown output flag: {0}")]
pub struct ParseFlagsError(String);

impl FromStr for OutputFlags {
    type Err = ParseFlagsError;

    /// Parses a comma separated list such as `date,time,shortfile`.
    ///
    /// `std` expands to `date,time`, `default` to `date,time,shortfile`, and
    /// `none` (or an empty string) to no flags.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut flags = Self::NONE;
        for token in s.split(',').map(str::trim).filter(|t| !t.is_empty()) {
            let lowered = token.to_ascii_lowercase();
            flags |= match lowered.as_str() {
                "none" => Self::NONE,
                "std" => Self::STD,
                "default" => Self::LEVEL_DEFAULT,
                "micro" => Self::MICROSECONDS,
                name => NAMED_FLAGS
                    .iter()
                    .find(|(known, _)| *known == name)
                    .map(|(_, flag)| *flag)
                    .ok_or_else(|| ParseFlagsError(token.to_owned()))?,
            };
        }
        Ok(flags)
    }
}

impl TryFrom<String> for OutputFlags {
    type Error = ParseFlagsError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<OutputFlags> for String {
    fn from(flags: OutputFlags) -> Self {
        flags.to_string()
    }
}
