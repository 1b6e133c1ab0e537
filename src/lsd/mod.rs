//! Core LSD reading module

pub mod format;
pub mod stream;
pub mod types;
mod utils;

pub use format::overlay::{OverlayHeading, OverlayReader};
pub use stream::{
    BitReader, BitStream, ByteSource, ConstantKey, FileSource, Keystream, MemorySource,
    RotatingKey, XoringSource,
};
pub use types::error::{LsdError, Result};
