//! Output sinks: destinations that accept formatted text incrementally.
//!
//! Three adapters cover the engine's targets: [`StringSink`] (single-use
//! string accumulator), [`WriterSink`] (any `io::Write` stream), and plain
//! `String` (growable append-only builder). A sink is owned by the call
//! rendering into it; the engine assumes single-writer-at-a-time per sink
//! and provides no internal locking.

use std::io::{self, Write};

use crate::error::FormatError;

/// Capability to accept formatted text incrementally.
pub trait Sink {
    fn write_str(&mut self, text: &str) -> Result<(), FormatError>;

    fn write_char(&mut self, c: char) -> Result<(), FormatError> {
        let mut buf = [0u8; 4];
        self.write_str(c.encode_utf8(&mut buf))
    }
}

/// Single-use in-memory accumulator. Writes never fail.
#[derive(Debug, Default)]
pub struct StringSink {
    buf: String,
}

impl StringSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-allocate for an expected output size.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: String::with_capacity(capacity),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.buf
    }

    pub fn into_string(self) -> String {
        self.buf
    }
}

impl Sink for StringSink {
    fn write_str(&mut self, text: &str) -> Result<(), FormatError> {
        self.buf.push_str(text);
        Ok(())
    }

    fn write_char(&mut self, c: char) -> Result<(), FormatError> {
        self.buf.push(c);
        Ok(())
    }
}

/// Streaming sink over any [`io::Write`]. Write failures abort the render
/// and propagate as [`FormatError::SinkWrite`].
#[derive(Debug)]
pub struct WriterSink<W: Write> {
    inner: W,
}

impl<W: Write> WriterSink<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> W {
        self.inner
    }

    /// Flush the underlying stream.
    pub fn flush(&mut self) -> Result<(), FormatError> {
        self.inner.flush().map_err(FormatError::from)
    }
}

impl WriterSink<io::Stdout> {
    /// Process standard output as an explicit sink value.
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl WriterSink<io::Stderr> {
    /// Process standard error as an explicit sink value.
    pub fn stderr() -> Self {
        Self::new(io::stderr())
    }
}

impl<W: Write> Sink for WriterSink<W> {
    fn write_str(&mut self, text: &str) -> Result<(), FormatError> {
        self.inner
            .write_all(text.as_bytes())
            .map_err(FormatError::from)
    }
}

/// Growable append-only text builder: render directly into a caller-owned
/// `String` without an intermediate accumulator.
impl Sink for String {
    fn write_str(&mut self, text: &str) -> Result<(), FormatError> {
        self.push_str(text);
        Ok(())
    }

    fn write_char(&mut self, c: char) -> Result<(), FormatError> {
        self.push(c);
        Ok(())
    }
}
