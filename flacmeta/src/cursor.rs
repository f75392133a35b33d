//! Sequential, seekable byte reader underlying the container walk.

use std::io::{self, Read, Seek, SeekFrom};

use byteorder::{BigEndian, ByteOrder, LittleEndian};

use crate::error::FlacMetaError;

/// Reader over an open byte source with fixed-width integer accessors.
///
/// Multi-byte integers in the container are big-endian; the single
/// little-endian accessor exists for the Vorbis comment block, whose length
/// prefixes are little-endian on the wire.
#[derive(Debug)]
pub struct ByteCursor<R> {
    inner: R,
}

impl<R: Read + Seek> ByteCursor<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    /// Reads exactly `n` bytes.
    ///
    /// Fewer available bytes (including a clean EOF) is a
    /// [`ShortRead`](FlacMetaError::ShortRead), distinct from an OS-level
    /// [`Io`](FlacMetaError::Io) failure.
    pub fn read_bytes(&mut self, n: usize) -> Result<Vec<u8>, FlacMetaError> {
        let mut buf = vec![0u8; n];
        let mut filled = 0;
        while filled < n {
            match self.inner.read(&mut buf[filled..]) {
                Ok(0) => return Err(FlacMetaError::ShortRead { wanted: n, got: filled }),
                Ok(read) => filled += read,
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(err) => return Err(FlacMetaError::Io(err)),
            }
        }
        Ok(buf)
    }

    pub fn read_u8(&mut self) -> Result<u8, FlacMetaError> {
        Ok(self.read_bytes(1)?[0])
    }

    pub fn read_u16_be(&mut self) -> Result<u16, FlacMetaError> {
        Ok(BigEndian::read_u16(&self.read_bytes(2)?))
    }

    pub fn read_u24_be(&mut self) -> Result<u32, FlacMetaError> {
        Ok(BigEndian::read_u24(&self.read_bytes(3)?))
    }

    pub fn read_u32_be(&mut self) -> Result<u32, FlacMetaError> {
        Ok(BigEndian::read_u32(&self.read_bytes(4)?))
    }

    pub fn read_u64_be(&mut self) -> Result<u64, FlacMetaError> {
        Ok(BigEndian::read_u64(&self.read_bytes(8)?))
    }

    pub fn read_u32_le(&mut self) -> Result<u32, FlacMetaError> {
        Ok(LittleEndian::read_u32(&self.read_bytes(4)?))
    }

    /// Relative seek; negative offsets move backwards.
    pub fn skip(&mut self, offset: i64) -> Result<(), FlacMetaError> {
        self.inner.seek(SeekFrom::Current(offset))?;
        Ok(())
    }

    /// Current byte offset from the start of the source.
    pub fn position(&mut self) -> Result<u64, FlacMetaError> {
        Ok(self.inner.stream_position()?)
    }
}
