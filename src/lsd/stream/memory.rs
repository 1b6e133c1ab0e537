//! In-memory byte source.

use log::{debug, trace};

use super::source::ByteSource;
use crate::lsd::types::error::Result;

/// A byte source over a buffer already held in memory.
///
/// Generic over the storage so it can own a `Vec<u8>` or view a borrowed
/// `&[u8]` without copying.
#[derive(Debug, Clone)]
pub struct MemorySource<B> {
    data: B,
    pos: usize,
}

impl<B: AsRef<[u8]>> MemorySource<B> {
    /// Creates a source positioned at offset 0.
    pub fn new(data: B) -> Self {
        Self { data, pos: 0 }
    }

    /// Returns the backing storage, dropping the cursor.
    pub fn into_inner(self) -> B {
        self.data
    }

    /// Bytes between the cursor and the end of the buffer.
    pub fn remaining(&self) -> &[u8] {
        &self.data.as_ref()[self.pos..]
    }
}

impl<B: AsRef<[u8]>> ByteSource for MemorySource<B> {
    fn read_some(&mut self, buf: &mut [u8]) -> Result<usize> {
        let remaining = self.remaining();
        let n = buf.len().min(remaining.len());
        buf[..n].copy_from_slice(&remaining[..n]);
        self.pos += n;
        if n < buf.len() {
            trace!("Short read at {}: {} of {} bytes", self.pos, n, buf.len());
        }
        Ok(n)
    }

    fn seek(&mut self, pos: u64) {
        let len = self.data.as_ref().len();
        let clamped = usize::try_from(pos).map_or(len, |p| p.min(len));
        if clamped as u64 != pos {
            debug!("Seek to {} clamped to buffer length {}", pos, len);
        }
        self.pos = clamped;
    }

    #[inline]
    fn tell(&self) -> u64 {
        self.pos as u64
    }

    #[inline]
    fn len(&self) -> u64 {
        self.data.as_ref().len() as u64
    }
}
