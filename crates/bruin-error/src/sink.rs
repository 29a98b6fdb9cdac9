use std::fmt;
use std::io::{self, Write};
use std::sync::{Arc, Mutex, PoisonError};

/// Destination for errors printed by [`crate::Error::panic`] and
/// [`crate::Error::exit`].
///
/// Cloning shares the underlying writer.
#[derive(Clone, Default)]
pub enum OutputSink {
    #[default]
    Stderr,
    Writer(Arc<Mutex<dyn Write + Send>>),
}

impl OutputSink {
    /// Take ownership of a writer.
    pub fn new<W: Write + Send + 'static>(writer: W) -> Self {
        Self::Writer(Arc::new(Mutex::new(writer)))
    }

    /// Share a writer the caller keeps a handle to, e.g. a buffer in a test.
    pub fn shared<W: Write + Send + 'static>(writer: Arc<Mutex<W>>) -> Self {
        Self::Writer(writer)
    }

    /// Write `line` plus a trailing newline, then flush.
    pub(crate) fn write_line(&self, line: &str) -> io::Result<()> {
        match self {
            Self::Stderr => {
                let mut out = io::stderr().lock();
                writeln!(out, "{line}")?;
                out.flush()
            }
            Self::Writer(writer) => {
                // A writer poisoned by a panicking print is still usable.
                let mut out = writer.lock().unwrap_or_else(PoisonError::into_inner);
                writeln!(out, "{line}")?;
                out.flush()
            }
        }
    }
}

impl fmt::Debug for OutputSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stderr => f.write_str("OutputSink::Stderr"),
            Self::Writer(_) => f.write_str("OutputSink::Writer(..)"),
        }
    }
}
