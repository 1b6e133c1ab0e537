//! Custom error types for the lsd-reader crate.
//!
//! Only conditions that cannot be expressed as a value end up here. Running
//! past the end of a stream is not an error: readers hand back short or
//! zero-padded data and leave the verdict to the format layer.

use thiserror::Error;

/// The primary error type for all operations in this crate.
#[derive(Debug, Error)]
pub enum LsdError {
    /// The backing file could not be opened or a physical read failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A bit read was requested with a width outside `1..=32`.
    #[error("Invalid bit width: {0} (expected 1..=32)")]
    InvalidBitWidth(u32),

    /// A raw byte read was attempted while part of a byte was still pending.
    #[error("Raw byte read at unaligned bit position {bit_position}")]
    Misaligned { bit_position: u64 },

    /// A table field promised more data than the stream holds.
    #[error("Size mismatch for {context}: expected {expected} bytes, but found {found} bytes")]
    SizeMismatch {
        context: &'static str,
        expected: u64,
        found: u64,
    },

    /// The file is structurally invalid.
    #[error("Invalid format: {0}")]
    InvalidFormat(String),
}

/// A convenience `Result` type alias using the crate's `LsdError` type.
pub type Result<T> = std::result::Result<T, LsdError>;
