/// Controls whether a [`LineSink`](crate::LineSink) terminates each rendered line.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum LineMode {
    /// Ensure the rendered line ends with exactly one newline terminator.
    #[default]
    WithNewline,
    /// Emit the rendered message verbatim.
    WithoutNewline,
}

impl LineMode {
    /// Reports whether the mode terminates lines with a newline.
    ///
    /// # Examples
    ///
    /// ```
    /// use logging_sink::LineMode;
    ///
    /// assert!(LineMode::WithNewline.append_newline());
    /// assert!(!LineMode::WithoutNewline.append_newline());
    /// ```
    #[must_use]
    pub const fn append_newline(self) -> bool {
        matches!(self, Self::WithNewline)
    }

    /// Returns `true` when a newline must be written after `message`.
    ///
    /// Messages that already carry a trailing newline (for example the output
    /// of a `println`-style call) are left alone so every record occupies a
    /// single line.
    #[must_use]
    pub fn needs_terminator(self, message: &str) -> bool {
        self.append_newline() && !message.ends_with('\n')
    }
}

impl From<bool> for LineMode {
    /// Converts a boolean newline preference into a [`LineMode`].
    ///
    /// ```
    /// use logging_sink::LineMode;
    ///
    /// assert_eq!(LineMode::from(true), LineMode::WithNewline);
    /// assert_eq!(LineMode::from(false), LineMode::WithoutNewline);
    /// ```
    fn from(append_newline: bool) -> Self {
        if append_newline {
            Self::WithNewline
        } else {
            Self::WithoutNewline
        }
    }
}

impl From<LineMode> for bool {
    fn from(mode: LineMode) -> Self {
        mode.append_newline()
    }
}
