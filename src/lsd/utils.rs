//! Low-level field decoding utilities

use byteorder::{ByteOrder, LittleEndian};
use encoding_rs::UTF_16LE;

/// Copies up to `N` bytes into a zeroed array, so short reads decode with
/// zero padding in the high-order bytes.
fn padded<const N: usize>(bytes: &[u8]) -> [u8; N] {
    let mut buf = [0u8; N];
    let n = bytes.len().min(N);
    buf[..n].copy_from_slice(&bytes[..n]);
    buf
}

/// Little-endian `u16` from up to 2 bytes.
pub fn u16_le_padded(bytes: &[u8]) -> u16 {
    LittleEndian::read_u16(&padded::<2>(bytes))
}

/// Little-endian `u32` from up to 4 bytes.
///
/// LSD tables store every offset and size field this way.
pub fn u32_le_padded(bytes: &[u8]) -> u32 {
    LittleEndian::read_u32(&padded::<4>(bytes))
}

/// Decodes UTF-16LE text, replacing malformed sequences.
pub fn decode_utf16le(bytes: &[u8]) -> String {
    let (text, _) = UTF_16LE.decode_without_bom_handling(bytes);
    text.into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_input_is_zero_extended() {
        assert_eq!(u32_le_padded(&[0x01, 0x02]), 0x0201);
        assert_eq!(u32_le_padded(&[]), 0);
        assert_eq!(u16_le_padded(&[0xFF]), 0x00FF);
    }

    #[test]
    fn odd_trailing_byte_is_replaced() {
        assert_eq!(decode_utf16le(&[b'a', 0, b'b']), "a\u{FFFD}");
    }
}
