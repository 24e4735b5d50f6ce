//! Position tracking over the raw-audio chunk.

use std::cmp;
use std::io::{self, Read};

/// Read-position bookkeeping for the `data` chunk.
///
/// Reads are capped at the declared chunk size; the position advances by
/// the bytes the source actually delivered, never by the bytes requested.
/// The declared size is fixed at creation and never revisited, even when
/// a truncated source delivers fewer bytes.
#[derive(Debug)]
pub struct DataStream {
    declared_size: u32,
    position: u32,
}

impl DataStream {
    pub(crate) fn new(declared_size: u32) -> DataStream {
        DataStream {
            declared_size,
            position: 0,
        }
    }

    /// Payload size declared by the data chunk header.
    pub fn declared_size(&self) -> u32 {
        self.declared_size
    }

    /// Bytes delivered so far, relative to the start of the data chunk.
    pub fn position(&self) -> u32 {
        self.position
    }

    /// Reads up to `buf.len()` bytes of audio payload from `source`.
    ///
    /// A short read is reported as-is. `Ok(0)` on a non-empty buffer means
    /// the payload is exhausted, either because the declared size has been
    /// delivered or because the source itself ended early.
    pub(crate) fn read_from<R>(&mut self, source: &mut R, buf: &mut [u8]) -> io::Result<usize>
    where
        R: Read,
    {
        let remaining = (self.declared_size - self.position) as usize;
        let len = cmp::min(buf.len(), remaining);
        if len == 0 {
            return Ok(0);
        }
        let n = source.read(&mut buf[..len])?;
        self.position += n as u32;
        Ok(n)
    }
}
