//! XOR de-obfuscation layered over any byte source.
//!
//! LSD files may be lightly scrambled with a byte-wise XOR. The key for each
//! byte is derived from its absolute file offset alone, so a seek followed by
//! a read yields exactly the bytes a sequential scan would have produced.
//! There is no running key state to resynchronise after a seek.

use log::{debug, trace};

use super::source::ByteSource;
use crate::lsd::types::error::Result;

/// Maps an absolute byte offset to the key byte XORed into it.
///
/// Must be a pure function of `offset`.
pub trait Keystream {
    fn key_at(&self, offset: u64) -> u8;
}

impl<F: Fn(u64) -> u8> Keystream for F {
    #[inline]
    fn key_at(&self, offset: u64) -> u8 {
        self(offset)
    }
}

/// The same key byte at every offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConstantKey(pub u8);

impl Keystream for ConstantKey {
    #[inline]
    fn key_at(&self, _offset: u64) -> u8 {
        self.0
    }
}

/// Offset-dependent rotation and increment of a per-dictionary key byte.
///
/// # Algorithm
/// `key_at(o) = key.rotate_left(o % 8) + (o mod 256)` (wrapping)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RotatingKey {
    key: u8,
}

impl RotatingKey {
    pub fn new(key: u8) -> Self {
        Self { key }
    }
}

impl Keystream for RotatingKey {
    #[inline]
    fn key_at(&self, offset: u64) -> u8 {
        self.key
            .rotate_left((offset % 8) as u32)
            .wrapping_add(offset as u8)
    }
}

/// A byte source that XORs every byte of `inner` with its keystream value.
///
/// Position, length and seeking are all delegated to the inner source.
#[derive(Debug)]
pub struct XoringSource<S, K> {
    inner: S,
    keystream: K,
}

impl<S: ByteSource, K: Keystream> XoringSource<S, K> {
    pub fn new(inner: S, keystream: K) -> Self {
        debug!("Enabling XOR de-obfuscation at offset {}", inner.tell());
        Self { inner, keystream }
    }

    pub fn get_ref(&self) -> &S {
        &self.inner
    }

    pub fn keystream(&self) -> &K {
        &self.keystream
    }

    /// Unwraps the adapter, returning the raw source at its current position.
    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: ByteSource, K: Keystream> ByteSource for XoringSource<S, K> {
    fn read_some(&mut self, buf: &mut [u8]) -> Result<usize> {
        let start = self.inner.tell();
        let n = self.inner.read_some(buf)?;
        trace!("De-obfuscating {} bytes at offset {}", n, start);
        for (offset, byte) in (start..).zip(buf[..n].iter_mut()) {
            *byte ^= self.keystream.key_at(offset);
        }
        Ok(n)
    }

    #[inline]
    fn seek(&mut self, pos: u64) {
        self.inner.seek(pos)
    }

    #[inline]
    fn tell(&self) -> u64 {
        self.inner.tell()
    }

    #[inline]
    fn len(&self) -> u64 {
        self.inner.len()
    }
}
