//! crates/logging-sink/src/writer.rs
//! Cloneable, closable writer handle shared between sinks.

use std::fmt;
use std::io::{self, Write};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

type BoxedWriter = Box<dyn Write + Send>;

/// Shared handle to an output destination.
///
/// Clones refer to the same destination; [`same_as`](Self::same_as) compares
/// identity rather than contents. Closing a handle closes it for every clone,
/// after which writes fail with an [`io::Error`].
#[derive(Clone)]
pub struct SharedWriter {
    slot: Arc<Mutex<Option<BoxedWriter>>>,
    label: Arc<str>,
}

impl SharedWriter {
    /// Wraps `writer` in a new shared handle.
    pub fn new<W>(writer: W) -> Self
    where
        W: Write + Send + 'static,
    {
        Self::labelled(writer, "writer")
    }

    /// Wraps `writer` and records `label` for diagnostics and `Debug` output.
    pub fn labelled<W>(writer: W, label: impl Into<Arc<str>>) -> Self
    where
        W: Write + Send + 'static,
    {
        Self {
            slot: Arc::new(Mutex::new(Some(Box::new(writer)))),
            label: label.into(),
        }
    }

    /// Returns a handle writing to the process's standard error stream.
    pub fn stderr() -> Self {
        Self::labelled(io::stderr(), "stderr")
    }

    /// Returns a handle writing to the process's standard output stream.
    pub fn stdout() -> Self {
        Self::labelled(io::stdout(), "stdout")
    }

    /// Returns the label supplied at construction.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Reports whether `self` and `other` refer to the same destination.
    #[must_use]
    pub fn same_as(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.slot, &other.slot)
    }

    /// Reports whether the destination has been closed.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.lock().is_none()
    }

    /// Flushes and releases the destination.
    ///
    /// Closing an already closed handle is a no-op. The destination is
    /// released even when the final flush fails; the flush error is returned.
    pub fn close(&self) -> io::Result<()> {
        let taken = self.lock().take();
        match taken {
            Some(mut writer) => writer.flush(),
            None => Ok(()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Option<BoxedWriter>> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn closed_error(&self) -> io::Error {
        io::Error::new(
            io::ErrorKind::BrokenPipe,
            format!("log writer '{}' is closed", self.label),
        )
    }
}

impl fmt::Debug for SharedWriter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedWriter")
            .field("label", &self.label)
            .field("closed", &self.is_closed())
            .finish()
    }
}

impl Write for &SharedWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self.lock().as_mut() {
            Some(writer) => writer.write(buf),
            None => Err(self.closed_error()),
        }
    }

    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        match self.lock().as_mut() {
            Some(writer) => writer.write_all(buf),
            None => Err(self.closed_error()),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.lock().as_mut() {
            Some(writer) => writer.flush(),
            None => Ok(()),
        }
    }
}

impl Write for SharedWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        (&*self).write(buf)
    }

    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        (&*self).write_all(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        (&*self).flush()
    }
}
