//! The byte-level capability every stream layer is built on.

use crate::lsd::types::error::Result;

/// Random-access source of raw bytes.
///
/// Implementations keep a single absolute cursor `position` with
/// `0 <= position <= len()`. Reads never cross `len()`; they come back short
/// instead. Seeks past `len()` clamp instead of failing, so decoders can look
/// beyond nominal boundaries of a damaged file.
///
/// Implemented by:
/// - [`MemorySource`](super::MemorySource) for buffers already in memory
/// - [`FileSource`](super::FileSource) for files on disk
/// - [`XoringSource`](super::XoringSource) for obfuscated data on top of either
pub trait ByteSource {
    /// Reads up to `buf.len()` bytes at the current position into `buf`.
    ///
    /// Returns the number of bytes copied and advances the position by the
    /// same amount. Fewer than `buf.len()` bytes are returned only when fewer
    /// remain; `Ok(0)` means the end of the source.
    ///
    /// # Errors
    /// Only a physical read failure of the backing storage.
    fn read_some(&mut self, buf: &mut [u8]) -> Result<usize>;

    /// Moves the position to `pos`, clamped to `len()`.
    fn seek(&mut self, pos: u64);

    /// Returns the current absolute byte offset.
    fn tell(&self) -> u64;

    /// Total number of bytes in the source.
    fn len(&self) -> u64;

    /// `true` when the source holds no bytes at all.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Reads up to `count` bytes into a fresh vector.
    fn read_vec(&mut self, count: usize) -> Result<Vec<u8>> {
        let mut buf = vec![0u8; count];
        let n = self.read_some(&mut buf)?;
        buf.truncate(n);
        Ok(buf)
    }
}

impl<S: ByteSource + ?Sized> ByteSource for &mut S {
    #[inline]
    fn read_some(&mut self, buf: &mut [u8]) -> Result<usize> {
        (**self).read_some(buf)
    }

    #[inline]
    fn seek(&mut self, pos: u64) {
        (**self).seek(pos)
    }

    #[inline]
    fn tell(&self) -> u64 {
        (**self).tell()
    }

    #[inline]
    fn len(&self) -> u64 {
        (**self).len()
    }
}

impl<S: ByteSource + ?Sized> ByteSource for Box<S> {
    #[inline]
    fn read_some(&mut self, buf: &mut [u8]) -> Result<usize> {
        (**self).read_some(buf)
    }

    #[inline]
    fn seek(&mut self, pos: u64) {
        (**self).seek(pos)
    }

    #[inline]
    fn tell(&self) -> u64 {
        (**self).tell()
    }

    #[inline]
    fn len(&self) -> u64 {
        (**self).len()
    }
}

/// In-memory source whose reads fail once they touch `fail_at` or beyond.
///
/// A failed read copies nothing and leaves the position unchanged.
#[cfg(test)]
pub(crate) struct FaultySource {
    inner: super::MemorySource<Vec<u8>>,
    fail_at: u64,
}

#[cfg(test)]
impl FaultySource {
    pub(crate) fn new(data: Vec<u8>, fail_at: u64) -> Self {
        Self {
            inner: super::MemorySource::new(data),
            fail_at,
        }
    }
}

#[cfg(test)]
impl ByteSource for FaultySource {
    fn read_some(&mut self, buf: &mut [u8]) -> Result<usize> {
        let end = self.inner.tell() + buf.len() as u64;
        if !buf.is_empty() && self.inner.tell() < self.inner.len() && end > self.fail_at {
            let fault = std::io::Error::new(std::io::ErrorKind::Other, "injected read fault");
            return Err(fault.into());
        }
        self.inner.read_some(buf)
    }

    fn seek(&mut self, pos: u64) {
        self.inner.seek(pos)
    }

    fn tell(&self) -> u64 {
        self.inner.tell()
    }

    fn len(&self) -> u64 {
        self.inner.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lsd::stream::MemorySource;
    use crate::lsd::types::error::LsdError;

    fn take_two<S: ByteSource>(mut source: S) -> Vec<u8> {
        source.read_vec(2).unwrap()
    }

    #[test]
    fn borrowed_source_shares_position() {
        let mut owned = MemorySource::new(vec![1u8, 2, 3]);
        assert_eq!(take_two(&mut owned), vec![1, 2]);
        assert_eq!(owned.tell(), 2);
    }

    #[test]
    fn faulty_source_fails_without_moving() {
        let mut faulty = FaultySource::new(vec![1, 2, 3, 4], 2);
        assert_eq!(faulty.read_vec(2).unwrap(), vec![1, 2]);
        assert!(matches!(faulty.read_vec(1), Err(LsdError::Io(_))));
        assert_eq!(faulty.tell(), 2);
    }

    #[test]
    fn boxed_dyn_source_dispatches() {
        let mut boxed: Box<dyn ByteSource> = Box::new(MemorySource::new(vec![9u8, 8]));
        boxed.seek(1);
        assert_eq!(boxed.read_vec(4).unwrap(), vec![8]);
        assert_eq!(boxed.tell(), 2);
        assert_eq!(boxed.len(), 2);
        assert!(!boxed.is_empty());
    }
}
