//! File-backed byte source.

use std::fs::File;
use std::io::{ErrorKind, Read, Seek, SeekFrom};
use std::path::Path;

use log::{debug, info, trace};

use super::source::ByteSource;
use crate::lsd::types::error::Result;

/// A byte source reading directly from a file on disk.
///
/// The file length is captured when the file is opened and bounds every read
/// and seek afterwards. The handle is closed when the source is dropped.
///
/// Generic over the handle so any seekable reader can stand in for a `File`.
#[derive(Debug)]
pub struct FileSource<F = File> {
    file: F,
    len: u64,
    pos: u64,
    /// Where the OS cursor actually sits, so sequential reads skip the seek call.
    /// `UNKNOWN_FILE_POS` after a failed read forces the next read to seek.
    file_pos: u64,
}

const UNKNOWN_FILE_POS: u64 = u64::MAX;

impl FileSource {
    /// Opens `path` for reading.
    ///
    /// # Errors
    /// Returns [`LsdError::Io`](crate::LsdError::Io) if the file does not
    /// exist, cannot be read, or its metadata is unavailable.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        info!("Opening dictionary file: {}", path.display());
        let file = File::open(path)?;
        Self::from_file(file)
    }

    /// Wraps an already opened file, starting at offset 0.
    pub fn from_file(mut file: File) -> Result<Self> {
        let len = file.metadata()?.len();
        file.seek(SeekFrom::Start(0))?;
        debug!("File source ready: {} bytes", len);
        Ok(Self::with_len(file, len))
    }
}

impl<F: Read + Seek> FileSource<F> {
    /// Wraps a reader whose length is already known. The reader's own cursor
    /// position is not trusted; the first read seeks to offset 0.
    pub fn with_len(file: F, len: u64) -> Self {
        Self {
            file,
            len,
            pos: 0,
            file_pos: UNKNOWN_FILE_POS,
        }
    }
}

impl<F: Read + Seek> ByteSource for FileSource<F> {
    fn read_some(&mut self, buf: &mut [u8]) -> Result<usize> {
        let available = self.len - self.pos;
        let wanted = usize::try_from(available).map_or(buf.len(), |a| buf.len().min(a));
        if wanted == 0 {
            return Ok(0);
        }

        if self.file_pos != self.pos {
            self.file_pos = UNKNOWN_FILE_POS;
            self.file.seek(SeekFrom::Start(self.pos))?;
            self.file_pos = self.pos;
        }

        let mut filled = 0;
        while filled < wanted {
            match self.file.read(&mut buf[filled..wanted]) {
                Ok(0) => break, // file shrank underneath us
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => {
                    // The OS cursor moved by `filled`; don't trust it next time.
                    debug!("Read failed at {} after {} bytes: {}", self.pos, filled, e);
                    self.file_pos = UNKNOWN_FILE_POS;
                    return Err(e.into());
                }
            }
        }

        self.pos += filled as u64;
        self.file_pos = self.pos;
        if filled < buf.len() {
            trace!("Short read at {}: {} of {} bytes", self.pos, filled, buf.len());
        }
        Ok(filled)
    }

    fn seek(&mut self, pos: u64) {
        if pos > self.len {
            debug!("Seek to {} clamped to file length {}", pos, self.len);
        }
        self.pos = pos.min(self.len);
    }

    #[inline]
    fn tell(&self) -> u64 {
        self.pos
    }

    #[inline]
    fn len(&self) -> u64 {
        self.len
    }
}
