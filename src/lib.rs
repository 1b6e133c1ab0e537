//! # lsd-reader
//!
//! Low-level reading primitives for Lingvo LSD dictionary files.
//!
//! LSD tables pack fields at arbitrary bit widths and parts of a file may be
//! XOR-obfuscated. This crate provides a seekable bit reader that composes
//! with plain or obfuscated byte sources, plus a reader for the overlay
//! directory of embedded resources.
//!
//! ```
//! use lsd_reader::{BitReader, ConstantKey, MemorySource, XoringSource};
//!
//! let source = XoringSource::new(MemorySource::new(vec![0xF0, 0x0F]), ConstantKey(0xFF));
//! let mut reader = BitReader::new(source);
//! assert_eq!(reader.read_bits(4).unwrap(), 0x0);
//! assert_eq!(reader.read_bits(12).unwrap(), 0xFF0);
//! assert_eq!(reader.tell(), 2);
//! ```
pub mod lsd;

// Re-export the main types for convenience
pub use lsd::{
    BitReader, BitStream, ByteSource, ConstantKey, FileSource, Keystream, LsdError,
    MemorySource, OverlayHeading, OverlayReader, Result, RotatingKey, XoringSource,
};
