//! Stream layer: byte sources, de-obfuscation and bit-level reading.
//!
//! # Layering
//!
//! ```text
//! ┌─────────────────────────────┐
//! │  BitReader<S>               │ ← bit cursor, MSB-first fields
//! ├─────────────────────────────┤
//! │  XoringSource<S, K>         │ ← optional, key is a function of offset
//! ├─────────────────────────────┤
//! │  MemorySource / FileSource  │ ← raw bytes, clamped seek
//! └─────────────────────────────┘
//! ```
//!
//! Each layer owns (or mutably borrows) exactly one layer below it, so a
//! reader chain belongs to a single decode pass and needs no locking.

mod bit_reader;
mod file;
mod memory;
mod source;
mod xoring;

pub use bit_reader::{BitReader, BitStream};
pub use file::FileSource;
pub use memory::MemorySource;
pub use source::ByteSource;
pub use xoring::{ConstantKey, Keystream, RotatingKey, XoringSource};
