//! Top-level walk over the container's metadata block sequence.

use std::io::{Read, Seek};

use crate::block::BlockType;
use crate::cursor::ByteCursor;
use crate::error::FlacMetaError;

const FLAC_MARKER: [u8; 4] = *b"fLaC";
const ID3_MARKER: [u8; 3] = *b"ID3";

/// One decoded 4-byte block header.
///
/// Bit 31 is the last-block flag, bits 30-24 the type code, bits 23-0 the
/// big-endian payload length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockHeader {
    pub block_type: BlockType,
    pub type_code: u8,
    pub is_last: bool,
    pub length: u32,
}

/// Walks the metadata blocks of an open byte source.
///
/// Two walks are supported: the typed walk ([`next_block`]) reads each
/// payload for decoding, and the raw walk ([`audio_data_offset`]) only seeks
/// past payloads to find the first audio byte.
///
/// [`next_block`]: ContainerScanner::next_block
/// [`audio_data_offset`]: ContainerScanner::audio_data_offset
#[derive(Debug)]
pub struct ContainerScanner<R> {
    cursor: ByteCursor<R>,
    seen_last: bool,
}

impl<R: Read + Seek> ContainerScanner<R> {
    /// Validates the stream marker, skipping a leading ID3v2 tag if present,
    /// and leaves the cursor at the first block header.
    pub fn open(reader: R) -> Result<Self, FlacMetaError> {
        let mut cursor = ByteCursor::new(reader);
        read_stream_marker(&mut cursor)?;
        Ok(Self { cursor, seen_last: false })
    }

    /// Typed walk: yields the next block header and payload, or `None` once
    /// the last block's payload has been consumed.
    pub fn next_block(&mut self) -> Result<Option<(BlockHeader, Vec<u8>)>, FlacMetaError> {
        if self.seen_last {
            return Ok(None);
        }
        let header = self.read_header()?;
        let payload = self
            .cursor
            .read_bytes(header.length as usize)
            .map_err(truncated)?;
        self.seen_last = header.is_last;
        tracing::trace!(?header.block_type, length = header.length, "walked metadata block");
        Ok(Some((header, payload)))
    }

    /// Raw walk: seeks past every payload without reading it and returns the
    /// byte offset of the first audio frame.
    pub fn audio_data_offset(mut self) -> Result<u64, FlacMetaError> {
        while !self.seen_last {
            let header = self.read_header()?;
            self.cursor.skip(i64::from(header.length))?;
            self.seen_last = header.is_last;
        }
        self.cursor.position()
    }

    fn read_header(&mut self) -> Result<BlockHeader, FlacMetaError> {
        let bytes = self.cursor.read_bytes(4).map_err(truncated)?;
        let type_code = bytes[0] & 0x7f;
        Ok(BlockHeader {
            block_type: BlockType::from(type_code),
            type_code,
            is_last: bytes[0] & 0x80 != 0,
            length: u32::from(bytes[1]) << 16 | u32::from(bytes[2]) << 8 | u32::from(bytes[3]),
        })
    }
}

/// A short read inside a walk means the container itself is truncated.
fn truncated(err: FlacMetaError) -> FlacMetaError {
    match err {
        FlacMetaError::ShortRead { wanted, got } => FlacMetaError::MalformedHeader(format!(
            "truncated metadata block: wanted {wanted} bytes, got {got}"
        )),
        other => other,
    }
}

/// Reads the 4-byte stream marker, skipping an ID3v2 prefix first when the
/// file starts with one.
fn read_stream_marker<R: Read + Seek>(cursor: &mut ByteCursor<R>) -> Result<(), FlacMetaError> {
    let mut marker = cursor.read_bytes(4)?;
    if marker[..3] == ID3_MARKER {
        // Two version/flags bytes, then the synchsafe tag size.
        cursor.read_bytes(2)?;
        let size = decode_synchsafe(&cursor.read_bytes(4)?)?;
        cursor.skip(i64::from(size))?;
        marker = cursor.read_bytes(4)?;
    }
    if marker != FLAC_MARKER {
        return Err(FlacMetaError::NotAContainer);
    }
    Ok(())
}

/// Decodes a big-endian synchsafe integer: 7 payload bits per byte, high bit
/// always clear.
pub fn decode_synchsafe(bytes: &[u8]) -> Result<u32, FlacMetaError> {
    let mut value = 0u32;
    for &byte in bytes {
        if byte & 0x80 != 0 {
            return Err(FlacMetaError::MalformedHeader(format!(
                "synchsafe byte {byte:#04x} has its high bit set"
            )));
        }
        value = value << 7 | u32::from(byte & 0x7f);
    }
    Ok(value)
}
