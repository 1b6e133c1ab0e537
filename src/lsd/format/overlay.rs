//! Overlay directory: the table of embedded resources at the end of an LSD file.
//!
//! # Table Structure
//! ```text
//! [4 bytes] Entry count (little-endian u32)
//! per entry:
//!   [8 bits]  Name length in UTF-16 units
//!   [2*len]   Name (UTF-16LE)
//!   [4 bytes] Offset relative to the overlay data section
//!   [4 bytes] Unknown
//!   [4 bytes] Inflated size
//!   [4 bytes] Stored (compressed) size
//! ```
//!
//! Payloads are handed back exactly as stored. Inflating them is left to the
//! caller.

use log::{debug, info, trace};

use crate::lsd::stream::BitStream;
use crate::lsd::types::error::{LsdError, Result};

/// One entry of the overlay directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayHeading {
    pub name: String,
    /// Offset of the payload relative to the overlay data section.
    pub offset: u32,
    pub unk2: u32,
    /// Size of the payload once inflated.
    pub inflated_size: u32,
    /// Size of the payload as stored in the file.
    pub stream_size: u32,
}

/// Reads the overlay directory and its payloads from a bit stream.
#[derive(Debug)]
pub struct OverlayReader<B> {
    stream: B,
    data_offset: u64,
    entries_count: u32,
}

impl<B: BitStream> OverlayReader<B> {
    /// Positions `stream` at `headings_offset` and reads the entry count.
    ///
    /// Both offsets come from the dictionary header.
    pub fn new(mut stream: B, headings_offset: u64, data_offset: u64) -> Result<Self> {
        stream.seek(headings_offset);
        let entries_count = stream.read_u32_le()?;
        info!(
            "Overlay directory at {}: {} entries, data at {}",
            headings_offset, entries_count, data_offset
        );
        Ok(Self {
            stream,
            data_offset,
            entries_count,
        })
    }

    /// Number of entries declared by the directory, empty ones included.
    pub fn entries_count(&self) -> u32 {
        self.entries_count
    }

    /// Reads every heading, skipping entries that inflate to nothing.
    ///
    /// Expects the stream to sit right after the entry count, which holds
    /// after [`new`](Self::new).
    pub fn read_headings(&mut self) -> Result<Vec<OverlayHeading>> {
        let mut headings = Vec::new();
        for _ in 0..self.entries_count {
            let name_len = self.stream.read_bits(8)? as usize;
            let name = self.stream.read_utf16_string(name_len)?;
            let heading = OverlayHeading {
                name,
                offset: self.stream.read_u32_le()?,
                unk2: self.stream.read_u32_le()?,
                inflated_size: self.stream.read_u32_le()?,
                stream_size: self.stream.read_u32_le()?,
            };
            trace!("Overlay heading: {:?}", heading);
            if heading.inflated_size != 0 {
                headings.push(heading);
            }
        }
        debug!(
            "Read {} non-empty overlay headings of {}",
            headings.len(),
            self.entries_count
        );
        Ok(headings)
    }

    /// Reads the stored bytes of one entry.
    ///
    /// # Errors
    /// [`LsdError::SizeMismatch`] if the file ends before `stream_size` bytes.
    pub fn read_entry_raw(&mut self, heading: &OverlayHeading) -> Result<Vec<u8>> {
        let start = self.data_offset + u64::from(heading.offset);
        self.stream.seek(start);
        if self.stream.tell() != start {
            return Err(LsdError::InvalidFormat(format!(
                "Overlay entry '{}' starts at {} beyond end of file",
                heading.name, start
            )));
        }
        let data = self.stream.read_raw_bytes(heading.stream_size as usize)?;
        if data.len() as u64 != u64::from(heading.stream_size) {
            return Err(LsdError::SizeMismatch {
                context: "overlay entry",
                expected: u64::from(heading.stream_size),
                found: data.len() as u64,
            });
        }
        Ok(data)
    }

    pub fn into_inner(self) -> B {
        self.stream
    }
}
