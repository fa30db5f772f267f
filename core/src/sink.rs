//! Byte-counting output sink.

use std::io::{self, Write};

/// Wraps a writer and tracks the cumulative number of bytes written through it.
///
/// TOC offsets are read from [`ByteCountWriter::byte_count`] immediately before
/// and after each object is written, so the counter must only ever grow by
/// exactly what the inner writer accepted.
#[derive(Debug)]
pub struct ByteCountWriter<W> {
    inner: W,
    byte_count: u64,
}

impl<W: Write> ByteCountWriter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            byte_count: 0,
        }
    }

    /// Total bytes written so far
    pub fn byte_count(&self) -> u64 {
        self.byte_count
    }

    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> Write for ByteCountWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let written = self.inner.write(buf)?;
        self.byte_count += written as u64;
        Ok(written)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}
