//! Metadata block classification and payload decoding.
//!
//! [`Block::decode`] is a pure function from a block header plus raw payload
//! bytes to a typed variant; it never touches the underlying file.

use std::io::Cursor;

use bytes::Bytes;
use serde::Serialize;

use crate::cursor::ByteCursor;
use crate::error::FlacMetaError;
use crate::scanner::BlockHeader;

/// Block type codes from the 7-bit field of the block header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockType {
    StreamInfo,
    Padding,
    Application,
    SeekTable,
    VorbisComment,
    Cuesheet,
    Picture,
    Unknown(u8),
}

impl From<u8> for BlockType {
    fn from(code: u8) -> Self {
        match code {
            0 => BlockType::StreamInfo,
            1 => BlockType::Padding,
            2 => BlockType::Application,
            3 => BlockType::SeekTable,
            4 => BlockType::VorbisComment,
            5 => BlockType::Cuesheet,
            6 => BlockType::Picture,
            other => BlockType::Unknown(other),
        }
    }
}

/// One decoded metadata block.
#[derive(Debug, Clone)]
pub enum Block {
    StreamInfo(StreamInfo),
    Application(Application),
    VorbisComment(VorbisComment),
    Cuesheet(Cuesheet),
    Picture(PictureEntry),
    /// Padding, seek tables and unknown type codes; payload not decoded.
    Ignored,
}

impl Block {
    /// Decodes a block payload according to its header type.
    pub fn decode(header: &BlockHeader, payload: &[u8]) -> Result<Block, FlacMetaError> {
        match header.block_type {
            BlockType::StreamInfo => StreamInfo::decode(payload).map(Block::StreamInfo),
            BlockType::Application => Application::decode(payload).map(Block::Application),
            BlockType::VorbisComment => VorbisComment::decode(payload).map(Block::VorbisComment),
            BlockType::Cuesheet => Cuesheet::decode(payload).map(Block::Cuesheet),
            BlockType::Picture => PictureEntry::decode(payload).map(Block::Picture),
            BlockType::Padding | BlockType::SeekTable | BlockType::Unknown(_) => Ok(Block::Ignored),
        }
    }
}

/// Fixed-layout STREAMINFO fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StreamInfo {
    pub min_block_size: u16,
    pub max_block_size: u16,
    pub min_frame_size: u32,
    pub max_frame_size: u32,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    pub channels: u8,
    pub bits_per_sample: u8,
    /// Total samples across the whole stream; 0 means unknown.
    pub total_samples: u64,
    /// MD5 of the unencoded audio as lowercase hex.
    pub md5: String,
}

impl StreamInfo {
    fn decode(payload: &[u8]) -> Result<Self, FlacMetaError> {
        let mut c = ByteCursor::new(Cursor::new(payload));
        let min_block_size = c.read_u16_be()?;
        let max_block_size = c.read_u16_be()?;
        let min_frame_size = c.read_u24_be()?;
        let max_frame_size = c.read_u24_be()?;
        // sample rate (20 bits) | channels-1 (3) | bits-1 (5) | samples (36)
        let packed = c.read_u64_be()?;
        let md5 = hex::encode(c.read_bytes(16)?);
        Ok(Self {
            min_block_size,
            max_block_size,
            min_frame_size,
            max_frame_size,
            sample_rate: (packed >> 44) as u32,
            channels: ((packed >> 41) & 0x07) as u8 + 1,
            bits_per_sample: ((packed >> 36) & 0x1f) as u8 + 1,
            total_samples: packed & 0x000f_ffff_ffff,
            md5,
        })
    }
}

/// APPLICATION block: 4-byte id plus an opaque payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Application {
    /// Application id as 8 lowercase hex characters.
    pub id_hex: String,
    /// The id's big-endian integer value as a decimal string. This is the
    /// canonical dictionary key; historical consumers expect the integer
    /// form, not the hex form.
    pub id_decimal: String,
    pub data: Bytes,
}

impl Application {
    fn decode(payload: &[u8]) -> Result<Self, FlacMetaError> {
        let mut c = ByteCursor::new(Cursor::new(payload));
        let id = c.read_bytes(4)?;
        Ok(Self {
            id_hex: hex::encode(&id),
            id_decimal: u32::from_be_bytes([id[0], id[1], id[2], id[3]]).to_string(),
            data: Bytes::copy_from_slice(&payload[4..]),
        })
    }
}

/// VORBIS_COMMENT block: vendor string plus opaque `KEY=VALUE` entries.
///
/// Length prefixes in this block are little-endian on the wire, unlike every
/// other field in the container.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VorbisComment {
    pub vendor: String,
    pub entries: Vec<String>,
}

impl VorbisComment {
    fn decode(payload: &[u8]) -> Result<Self, FlacMetaError> {
        let mut c = ByteCursor::new(Cursor::new(payload));
        let vendor_len = c.read_u32_le()? as usize;
        let vendor = String::from_utf8_lossy(&c.read_bytes(vendor_len)?).into_owned();
        let count = c.read_u32_le()?;
        let mut entries = Vec::new();
        for _ in 0..count {
            let len = c.read_u32_le()? as usize;
            entries.push(String::from_utf8_lossy(&c.read_bytes(len)?).into_owned());
        }
        Ok(Self { vendor, entries })
    }
}

/// CUESHEET block: CD-style track and index layout.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Cuesheet {
    pub media_catalog_number: String,
    /// Lead-in length in samples.
    pub lead_in: u64,
    /// Whether offsets use CD (MSF) addressing.
    pub is_cd: bool,
    /// Track records; the final record is the lead-out marker.
    pub tracks: Vec<CuesheetTrack>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CuesheetTrack {
    pub offset: u64,
    pub number: u8,
    pub isrc: String,
    /// Track type flag: false = audio, true = data.
    pub is_data: bool,
    pub pre_emphasis: bool,
    pub indices: Vec<CuesheetIndex>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CuesheetIndex {
    pub offset: u64,
    pub number: u8,
}

impl Cuesheet {
    fn decode(payload: &[u8]) -> Result<Self, FlacMetaError> {
        let mut c = ByteCursor::new(Cursor::new(payload));
        let media_catalog_number = nul_trimmed(&c.read_bytes(128)?);
        let lead_in = c.read_u64_be()?;
        let is_cd = c.read_u8()? & 0x80 != 0;
        c.skip(258)?;
        let track_count = c.read_u8()?;
        let mut tracks = Vec::with_capacity(track_count as usize);
        for _ in 0..track_count {
            let offset = c.read_u64_be()?;
            let number = c.read_u8()?;
            let isrc = nul_trimmed(&c.read_bytes(12)?);
            let flags = c.read_u8()?;
            c.skip(13)?;
            let index_count = c.read_u8()?;
            let mut indices = Vec::with_capacity(index_count as usize);
            for _ in 0..index_count {
                let index_offset = c.read_u64_be()?;
                let index_number = c.read_u8()?;
                c.skip(3)?;
                indices.push(CuesheetIndex { offset: index_offset, number: index_number });
            }
            tracks.push(CuesheetTrack {
                offset,
                number,
                isrc,
                is_data: flags & 0x80 != 0,
                pre_emphasis: flags & 0x40 != 0,
                indices,
            });
        }
        Ok(Self { media_catalog_number, lead_in, is_cd, tracks })
    }
}

/// PICTURE block contents.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PictureEntry {
    /// Picture type code (3 = front cover, ...).
    pub picture_type: u32,
    pub mime_type: String,
    pub description: String,
    pub width: u32,
    pub height: u32,
    pub depth: u32,
    /// Palette size for indexed images, 0 otherwise.
    pub color_count: u32,
    pub data: Bytes,
}

impl PictureEntry {
    fn decode(payload: &[u8]) -> Result<Self, FlacMetaError> {
        let mut c = ByteCursor::new(Cursor::new(payload));
        let picture_type = c.read_u32_be()?;
        let mime_len = c.read_u32_be()? as usize;
        let mime_type = String::from_utf8_lossy(&c.read_bytes(mime_len)?).into_owned();
        let desc_len = c.read_u32_be()? as usize;
        let description = String::from_utf8_lossy(&c.read_bytes(desc_len)?).into_owned();
        let width = c.read_u32_be()?;
        let height = c.read_u32_be()?;
        let depth = c.read_u32_be()?;
        let color_count = c.read_u32_be()?;
        let data_len = c.read_u32_be()? as usize;
        let data = Bytes::from(c.read_bytes(data_len)?);
        Ok(Self {
            picture_type,
            mime_type,
            description,
            width,
            height,
            depth,
            color_count,
            data,
        })
    }
}

fn nul_trimmed(bytes: &[u8]) -> String {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    String::from_utf8_lossy(&bytes[..end]).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::BlockHeader;

    fn header(block_type: BlockType, length: u32) -> BlockHeader {
        BlockHeader { block_type, type_code: 0, is_last: true, length }
    }

    fn stream_info_payload(
        sample_rate: u32,
        channels: u8,
        bits_per_sample: u8,
        total_samples: u64,
    ) -> Vec<u8> {
        let mut p = Vec::new();
        p.extend_from_slice(&4096u16.to_be_bytes());
        p.extend_from_slice(&4096u16.to_be_bytes());
        p.extend_from_slice(&[0x00, 0x10, 0x00]);
        p.extend_from_slice(&[0x00, 0x40, 0x00]);
        let packed = (u64::from(sample_rate) << 44)
            | (u64::from(channels - 1) << 41)
            | (u64::from(bits_per_sample - 1) << 36)
            | total_samples;
        p.extend_from_slice(&packed.to_be_bytes());
        p.extend_from_slice(&[0xab; 16]);
        p
    }

    #[test]
    fn stream_info_unpacks_bit_fields() {
        let payload = stream_info_payload(96_000, 6, 24, 0x0007_1234_5678);
        let info = match Block::decode(&header(BlockType::StreamInfo, payload.len() as u32), &payload)
            .unwrap()
        {
            Block::StreamInfo(info) => info,
            other => panic!("unexpected block {other:?}"),
        };
        assert_eq!(info.min_block_size, 4096);
        assert_eq!(info.max_block_size, 4096);
        assert_eq!(info.min_frame_size, 0x1000);
        assert_eq!(info.max_frame_size, 0x4000);
        assert_eq!(info.sample_rate, 96_000);
        assert_eq!(info.channels, 6);
        assert_eq!(info.bits_per_sample, 24);
        assert_eq!(info.total_samples, 0x0007_1234_5678);
        assert_eq!(info.md5, "ab".repeat(16));
    }

    #[test]
    fn application_id_renders_hex_and_decimal() {
        let mut payload = vec![0x00, 0x00, 0x00, 0x2a];
        payload.extend_from_slice(b"payload");
        let app = match Block::decode(&header(BlockType::Application, payload.len() as u32), &payload)
            .unwrap()
        {
            Block::Application(app) => app,
            other => panic!("unexpected block {other:?}"),
        };
        assert_eq!(app.id_hex, "0000002a");
        assert_eq!(app.id_decimal, "42");
        assert_eq!(&app.data[..], b"payload");
    }

    #[test]
    fn vorbis_comment_uses_little_endian_lengths() {
        let mut payload = Vec::new();
        payload.extend_from_slice(&9u32.to_le_bytes());
        payload.extend_from_slice(b"reference");
        payload.extend_from_slice(&2u32.to_le_bytes());
        for entry in ["TITLE=Song", "ARTIST=Band"] {
            payload.extend_from_slice(&(entry.len() as u32).to_le_bytes());
            payload.extend_from_slice(entry.as_bytes());
        }
        let comments =
            match Block::decode(&header(BlockType::VorbisComment, payload.len() as u32), &payload)
                .unwrap()
            {
                Block::VorbisComment(c) => c,
                other => panic!("unexpected block {other:?}"),
            };
        assert_eq!(comments.vendor, "reference");
        assert_eq!(comments.entries, vec!["TITLE=Song", "ARTIST=Band"]);
    }

    #[test]
    fn cuesheet_decodes_tracks_and_indices() {
        let mut payload = Vec::new();
        let mut mcn = b"1234567890123".to_vec();
        mcn.resize(128, 0);
        payload.extend_from_slice(&mcn);
        payload.extend_from_slice(&88200u64.to_be_bytes());
        payload.push(0x80); // is_cd
        payload.extend_from_slice(&[0u8; 258]);
        payload.push(2); // track count (one real track + lead-out)

        // track 1: audio, pre-emphasis, one index
        payload.extend_from_slice(&0u64.to_be_bytes());
        payload.push(1);
        let mut isrc = b"USRC17607839".to_vec();
        isrc.resize(12, 0);
        payload.extend_from_slice(&isrc);
        payload.push(0x40);
        payload.extend_from_slice(&[0u8; 13]);
        payload.push(1);
        payload.extend_from_slice(&588u64.to_be_bytes());
        payload.push(1);
        payload.extend_from_slice(&[0u8; 3]);

        // lead-out track
        payload.extend_from_slice(&441_000u64.to_be_bytes());
        payload.push(170);
        payload.extend_from_slice(&[0u8; 12]);
        payload.push(0x00);
        payload.extend_from_slice(&[0u8; 13]);
        payload.push(0);

        let cuesheet =
            match Block::decode(&header(BlockType::Cuesheet, payload.len() as u32), &payload)
                .unwrap()
            {
                Block::Cuesheet(c) => c,
                other => panic!("unexpected block {other:?}"),
            };
        assert_eq!(cuesheet.media_catalog_number, "1234567890123");
        assert_eq!(cuesheet.lead_in, 88_200);
        assert!(cuesheet.is_cd);
        assert_eq!(cuesheet.tracks.len(), 2);
        let track = &cuesheet.tracks[0];
        assert_eq!(track.number, 1);
        assert_eq!(track.isrc, "USRC17607839");
        assert!(!track.is_data);
        assert!(track.pre_emphasis);
        assert_eq!(track.indices, vec![CuesheetIndex { offset: 588, number: 1 }]);
        assert_eq!(cuesheet.tracks[1].number, 170);
        assert_eq!(cuesheet.tracks[1].offset, 441_000);
    }

    #[test]
    fn picture_decodes_length_prefixed_fields() {
        let mut payload = Vec::new();
        payload.extend_from_slice(&3u32.to_be_bytes());
        payload.extend_from_slice(&10u32.to_be_bytes());
        payload.extend_from_slice(b"image/jpeg");
        payload.extend_from_slice(&5u32.to_be_bytes());
        payload.extend_from_slice(b"cover");
        payload.extend_from_slice(&600u32.to_be_bytes());
        payload.extend_from_slice(&600u32.to_be_bytes());
        payload.extend_from_slice(&24u32.to_be_bytes());
        payload.extend_from_slice(&0u32.to_be_bytes());
        payload.extend_from_slice(&4u32.to_be_bytes());
        payload.extend_from_slice(&[0xff, 0xd8, 0xff, 0xe0]);

        let picture =
            match Block::decode(&header(BlockType::Picture, payload.len() as u32), &payload)
                .unwrap()
            {
                Block::Picture(p) => p,
                other => panic!("unexpected block {other:?}"),
            };
        assert_eq!(picture.picture_type, 3);
        assert_eq!(picture.mime_type, "image/jpeg");
        assert_eq!(picture.description, "cover");
        assert_eq!(picture.width, 600);
        assert_eq!(picture.height, 600);
        assert_eq!(picture.depth, 24);
        assert_eq!(picture.color_count, 0);
        assert_eq!(&picture.data[..], &[0xff, 0xd8, 0xff, 0xe0]);
    }

    #[test]
    fn padding_and_unknown_types_are_ignored() {
        for block_type in [BlockType::Padding, BlockType::SeekTable, BlockType::Unknown(99)] {
            assert!(matches!(
                Block::decode(&header(block_type, 4), &[0u8; 4]).unwrap(),
                Block::Ignored
            ));
        }
    }

    #[test]
    fn truncated_stream_info_is_a_short_read() {
        let payload = stream_info_payload(44_100, 2, 16, 0);
        assert!(matches!(
            Block::decode(&header(BlockType::StreamInfo, 20), &payload[..20]),
            Err(FlacMetaError::ShortRead { .. })
        ));
    }
}
