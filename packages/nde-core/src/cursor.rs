//! Positioned little-endian reader over a seekable byte source.

use std::io::{ErrorKind, Read, Seek, SeekFrom};

use crate::error::{NdeError, Result};

/// Byte reader with absolute seeks and fixed-width little-endian reads.
///
/// The source length is captured once at construction; every read checks
/// it first so short reads surface as [`NdeError::TruncatedInput`] with the
/// exact offset instead of a bare I/O error.
#[derive(Debug)]
pub struct BinaryCursor<R> {
    inner: R,
    pos: u64,
    len: u64,
}

impl<R: Read + Seek> BinaryCursor<R> {
    /// Wraps a source and positions at offset 0.
    pub fn new(mut inner: R) -> Result<Self> {
        let len = inner.seek(SeekFrom::End(0)).map_err(io_error)?;
        inner.seek(SeekFrom::Start(0)).map_err(io_error)?;
        Ok(Self { inner, pos: 0, len })
    }

    /// Current absolute position.
    pub fn position(&self) -> u64 {
        self.pos
    }

    /// Total length of the source in bytes.
    pub fn len(&self) -> u64 {
        self.len
    }

    /// Returns `true` if the source holds no bytes.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Repositions to an absolute byte offset.
    ///
    /// Seeking past the end is allowed; the next read reports truncation.
    pub fn seek_absolute(&mut self, offset: u64) -> Result<()> {
        if offset != self.pos {
            self.inner
                .seek(SeekFrom::Start(offset))
                .map_err(io_error)?;
            self.pos = offset;
        }
        Ok(())
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        let [b] = self.read_array::<1>()?;
        Ok(b)
    }

    pub fn read_u16_le(&mut self) -> Result<u16> {
        Ok(u16::from_le_bytes(self.read_array()?))
    }

    pub fn read_u32_le(&mut self) -> Result<u32> {
        Ok(u32::from_le_bytes(self.read_array()?))
    }

    pub fn read_u64_le(&mut self) -> Result<u64> {
        Ok(u64::from_le_bytes(self.read_array()?))
    }

    pub fn read_f32_le(&mut self) -> Result<f32> {
        Ok(f32::from_le_bytes(self.read_array()?))
    }

    /// Reads exactly `n` bytes into an owned buffer.
    pub fn read_bytes(&mut self, n: usize) -> Result<Vec<u8>> {
        self.ensure_available(n)?;
        let mut buf = vec![0u8; n];
        self.fill(&mut buf)?;
        Ok(buf)
    }

    /// Reads a fixed-size array.
    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        self.ensure_available(N)?;
        let mut buf = [0u8; N];
        self.fill(&mut buf)?;
        Ok(buf)
    }

    /// Skips `n` bytes without reading them.
    pub fn skip(&mut self, n: u64) -> Result<()> {
        self.seek_absolute(self.pos.saturating_add(n))
    }

    fn remaining(&self) -> u64 {
        self.len.saturating_sub(self.pos)
    }

    fn ensure_available(&self, requested: usize) -> Result<()> {
        let available = self.remaining();
        if (requested as u64) > available {
            return Err(NdeError::TruncatedInput {
                offset: self.pos,
                requested,
                available,
            });
        }
        Ok(())
    }

    fn fill(&mut self, buf: &mut [u8]) -> Result<()> {
        match self.inner.read_exact(buf) {
            Ok(()) => {
                self.pos += buf.len() as u64;
                Ok(())
            }
            Err(e) => {
                // read_exact leaves the inner position unspecified on failure.
                self.inner
                    .seek(SeekFrom::Start(self.pos))
                    .map_err(io_error)?;
                if e.kind() == ErrorKind::UnexpectedEof {
                    Err(NdeError::TruncatedInput {
                        offset: self.pos,
                        requested: buf.len(),
                        available: self.remaining(),
                    })
                } else {
                    Err(io_error(e))
                }
            }
        }
    }
}

fn io_error(e: std::io::Error) -> NdeError {
    NdeError::Io(e.to_string())
}
