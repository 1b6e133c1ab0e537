//! Format readers built on the stream layer.
//!
//! These interpret table layouts only as far as locating raw payloads. They
//! talk to the file exclusively through [`BitStream`](crate::lsd::stream::BitStream),
//! so the same code runs over plain or obfuscated sources.

pub mod overlay;
