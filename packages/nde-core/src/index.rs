//! Index file offset table.
//!
//! Layout: an 8-byte header, then starting at byte 16 a run of 8-byte slots
//! (`u32` data offset, 4 unused bytes) terminated by an offset of 0.

use std::io::{Read, Seek};

use crate::cursor::BinaryCursor;
use crate::error::{NdeError, Result};

/// Walks the offset table of an index file.
#[derive(Debug)]
pub struct IndexWalker<R> {
    cursor: BinaryCursor<R>,
    header_len: u64,
    table_start: u64,
    finished: bool,
}

impl<R: Read + Seek> IndexWalker<R> {
    /// Creates a walker with the standard layout (8-byte header, table at 16).
    pub fn new(source: R) -> Result<Self> {
        Self::with_layout(source, 8, 16)
    }

    pub fn with_layout(source: R, header_len: u64, table_start: u64) -> Result<Self> {
        Ok(Self {
            cursor: BinaryCursor::new(source)?,
            header_len,
            table_start,
            finished: false,
        })
    }

    /// Skips the header and positions at the first slot.
    ///
    /// The header is never interpreted; only its presence is checked.
    pub fn read_header(&mut self) -> Result<()> {
        self.cursor.seek_absolute(0)?;
        self.cursor.skip(self.header_len)?;
        if self.cursor.position() > self.cursor.len() {
            return Err(NdeError::TruncatedInput {
                offset: 0,
                requested: self.header_len as usize,
                available: self.cursor.len(),
            });
        }
        self.cursor.seek_absolute(self.table_start)?;
        self.finished = false;
        Ok(())
    }

    /// Reads the next slot and returns its data offset. 0 marks end of table.
    pub fn next_offset(&mut self) -> Result<u32> {
        let offset = self.cursor.read_u32_le()?;
        self.cursor.read_u32_le()?;
        tracing::trace!("Index slot -> data offset {:#x}", offset);
        Ok(offset)
    }

    /// Absolute position of the next slot to be read.
    pub fn position(&self) -> u64 {
        self.cursor.position()
    }
}

/// Yields offsets until the 0 sentinel; a read error ends iteration after
/// being yielded once.
impl<R: Read + Seek> Iterator for IndexWalker<R> {
    type Item = Result<u32>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        match self.next_offset() {
            Ok(0) => {
                self.finished = true;
                None
            }
            Ok(offset) => Some(Ok(offset)),
            Err(e) => {
                self.finished = true;
                Some(Err(e))
            }
        }
    }
}
