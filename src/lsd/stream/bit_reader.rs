//! Bit-granular reading over a byte source.
//!
//! Bits are consumed most-significant first within each byte, and multi-bit
//! values are assembled with the first bit read in the highest position. This
//! is the packing used throughout LSD headers and article tables.
//!
//! # Truncation
//! Reads that run off the end of the source are not errors. Missing bits are
//! filled with zeros in the low-order positions and missing bytes are simply
//! not returned. Format readers validate lengths against their own tables.

use log::trace;

use super::source::ByteSource;
use crate::lsd::types::error::{LsdError, Result};
use crate::lsd::utils;

/// The operations format-level decoders rely on.
///
/// Only the first five methods need implementing; the field readers are
/// built on top of them.
pub trait BitStream {
    /// Reads `n` bits (`1..=32`), MSB-first, advancing the cursor by `n`.
    fn read_bits(&mut self, n: u32) -> Result<u32>;

    /// Reads `count` bytes from a byte-aligned cursor.
    fn read_raw_bytes(&mut self, count: usize) -> Result<Vec<u8>>;

    /// Skips the unread bits of a partially consumed byte. No-op when aligned.
    fn align_to_byte(&mut self);

    /// Moves the cursor to the first bit of byte `byte_pos`.
    fn seek(&mut self, byte_pos: u64);

    /// Byte offset containing the cursor, rounded down.
    fn tell(&self) -> u64;

    fn read_bit(&mut self) -> Result<bool> {
        Ok(self.read_bits(1)? == 1)
    }

    fn read_u8(&mut self) -> Result<u8> {
        let bytes = self.read_raw_bytes(1)?;
        Ok(bytes.first().copied().unwrap_or(0))
    }

    /// Little-endian `u16` field, zero-padded if truncated.
    fn read_u16_le(&mut self) -> Result<u16> {
        let bytes = self.read_raw_bytes(2)?;
        Ok(utils::u16_le_padded(&bytes))
    }

    /// Little-endian `u32` field, zero-padded if truncated.
    fn read_u32_le(&mut self) -> Result<u32> {
        let bytes = self.read_raw_bytes(4)?;
        Ok(utils::u32_le_padded(&bytes))
    }

    /// Reads `units` UTF-16LE code units and decodes them.
    fn read_utf16_string(&mut self, units: usize) -> Result<String> {
        let bytes = self.read_raw_bytes(units.saturating_mul(2))?;
        Ok(utils::decode_utf16le(&bytes))
    }
}

/// Bit cursor over a [`ByteSource`].
///
/// Holds at most one partially consumed byte. The source stays one byte
/// ahead of the cursor while that byte is pending, and in step with it
/// whenever the cursor is aligned.
#[derive(Debug)]
pub struct BitReader<S> {
    source: S,
    /// Absolute bit offset of the next bit to hand out.
    bit_pos: u64,
    /// Byte holding `bit_pos` while it is not on a byte boundary.
    current: u8,
}

impl<S: ByteSource> BitReader<S> {
    /// Starts reading at the source's current position.
    pub fn new(source: S) -> Self {
        let bit_pos = source.tell() * 8;
        Self {
            source,
            bit_pos,
            current: 0,
        }
    }

    pub fn get_ref(&self) -> &S {
        &self.source
    }

    /// Direct access to the source. Reading through it desynchronises the
    /// bit cursor until the next [`seek`](Self::seek).
    pub fn get_mut(&mut self) -> &mut S {
        &mut self.source
    }

    pub fn into_inner(self) -> S {
        self.source
    }

    /// Exact cursor position in bits.
    #[inline]
    pub fn bit_position(&self) -> u64 {
        self.bit_pos
    }

    #[inline]
    pub fn is_aligned(&self) -> bool {
        self.bit_pos % 8 == 0
    }

    /// Reads `n` bits (`1..=32`) MSB-first.
    ///
    /// # Errors
    /// [`LsdError::InvalidBitWidth`] for `n` outside `1..=32`, or an I/O error
    /// from the source.
    pub fn read_bits(&mut self, n: u32) -> Result<u32> {
        if !(1..=32).contains(&n) {
            return Err(LsdError::InvalidBitWidth(n));
        }

        let mut value: u64 = 0;
        let mut remaining = n;
        while remaining > 0 {
            let used = (self.bit_pos % 8) as u32;
            if used == 0 {
                self.current = self.next_byte()?;
            }
            let available = 8 - used;
            let take = available.min(remaining);
            let bits = (self.current >> (available - take)) & (0xFF >> (8 - take));
            value = (value << take) | u64::from(bits);
            remaining -= take;
            self.bit_pos = self.bit_pos.saturating_add(u64::from(take));
        }
        Ok(value as u32)
    }

    /// Skips to the next byte boundary. Idempotent.
    pub fn align_to_byte(&mut self) {
        let used = self.bit_pos % 8;
        if used != 0 {
            self.bit_pos = self.bit_pos.saturating_add(8 - used);
        }
    }

    /// Reads up to `buf.len()` bytes, bypassing bit packing.
    ///
    /// The cursor advances by `buf.len() * 8` even when the source runs dry.
    /// Returns how many bytes were actually filled.
    ///
    /// # Errors
    /// [`LsdError::Misaligned`] if a partial byte is pending.
    pub fn read_raw_into(&mut self, buf: &mut [u8]) -> Result<usize> {
        self.check_aligned()?;
        let n = if self.remaining_bytes() == 0 {
            0
        } else {
            self.source.read_some(buf)?
        };
        self.skip_bytes(buf.len());
        Ok(n)
    }

    /// Reads up to `count` bytes from an aligned cursor.
    ///
    /// Only what the source still holds is allocated, so a bogus length
    /// field costs nothing beyond the bytes that exist.
    pub fn read_raw_bytes(&mut self, count: usize) -> Result<Vec<u8>> {
        self.check_aligned()?;
        let available = self.remaining_bytes();
        let wanted = usize::try_from(available).map_or(count, |a| count.min(a));
        let mut buf = vec![0u8; wanted];
        let n = if wanted == 0 {
            0
        } else {
            self.source.read_some(&mut buf)?
        };
        buf.truncate(n);
        if n < count {
            trace!(
                "Raw read at bit {} came back short: {} of {} bytes",
                self.bit_pos, n, count
            );
        }
        self.skip_bytes(count);
        Ok(buf)
    }

    /// Moves source and cursor to the start of `byte_pos` (clamped).
    pub fn seek(&mut self, byte_pos: u64) {
        self.source.seek(byte_pos);
        self.bit_pos = self.source.tell() * 8;
        self.current = 0;
    }

    /// Byte containing the cursor, never beyond the source length.
    pub fn tell(&self) -> u64 {
        (self.bit_pos / 8).min(self.source.len())
    }

    fn check_aligned(&self) -> Result<()> {
        if self.is_aligned() {
            Ok(())
        } else {
            Err(LsdError::Misaligned {
                bit_position: self.bit_pos,
            })
        }
    }

    /// Bytes the source can still deliver at the cursor. Zero once the
    /// cursor has run ahead of the clamped source.
    fn remaining_bytes(&self) -> u64 {
        let at = self.source.tell();
        if self.bit_pos / 8 > at {
            0
        } else {
            self.source.len().saturating_sub(at)
        }
    }

    /// Advances an aligned cursor by `count` bytes, staying aligned at the
    /// top of the range.
    fn skip_bytes(&mut self, count: usize) {
        let bits = (count as u64).saturating_mul(8);
        self.bit_pos = self.bit_pos.saturating_add(bits) & !7;
    }

    fn next_byte(&mut self) -> Result<u8> {
        let mut byte = [0u8; 1];
        if self.bit_pos / 8 > self.source.tell() || self.source.read_some(&mut byte)? == 0 {
            trace!("Bit read past end of source at bit {}", self.bit_pos);
            return Ok(0);
        }
        Ok(byte[0])
    }
}

impl<S: ByteSource> BitStream for BitReader<S> {
    #[inline]
    fn read_bits(&mut self, n: u32) -> Result<u32> {
        BitReader::read_bits(self, n)
    }

    #[inline]
    fn read_raw_bytes(&mut self, count: usize) -> Result<Vec<u8>> {
        BitReader::read_raw_bytes(self, count)
    }

    #[inline]
    fn align_to_byte(&mut self) {
        BitReader::align_to_byte(self)
    }

    #[inline]
    fn seek(&mut self, byte_pos: u64) {
        BitReader::seek(self, byte_pos)
    }

    #[inline]
    fn tell(&self) -> u64 {
        BitReader::tell(self)
    }
}
