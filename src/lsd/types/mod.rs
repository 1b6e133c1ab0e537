//! Foundational error types shared by the stream and format layers.

pub mod error;
