//! Whole-file metadata extraction.

use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

use serde::Serialize;

use crate::block::{Block, StreamInfo};
use crate::cuesheet::render_cuesheet;
use crate::diag::{Diagnostics, TracingDiagnostics};
use crate::error::FlacMetaError;
use crate::metrics::StreamProperties;
use crate::scanner::ContainerScanner;
use crate::tags::TagSet;

/// Structured metadata extracted from one FLAC container.
///
/// One sequential scan per file, no shared state between files. Callers
/// extracting many files concurrently use one extraction call per file.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FlacMetadata {
    pub properties: StreamProperties,
    pub tags: TagSet,
}

impl FlacMetadata {
    /// Extracts metadata from a FLAC file on disk, reporting non-fatal
    /// warnings through `tracing`.
    pub fn from_file(path: &Path) -> Result<Self, FlacMetaError> {
        Self::from_file_with(path, &mut TracingDiagnostics)
    }

    /// Same as [`from_file`](Self::from_file) with a caller-supplied
    /// diagnostics sink.
    pub fn from_file_with(
        path: &Path,
        diag: &mut dyn Diagnostics,
    ) -> Result<Self, FlacMetaError> {
        tracing::debug!(path = %path.display(), "extracting FLAC metadata");
        let source = path.display().to_string();
        let mut file = File::open(path)?;

        // A failed stat degrades the bit-rate computation, nothing more.
        let file_size = match file.metadata() {
            Ok(meta) => meta.len(),
            Err(err) => {
                diag.warn(&format!("{source}: couldn't stat file: {err}"));
                0
            }
        };

        let metadata = Self::from_reader(&mut file, file_size, &source, diag)?;
        tracing::debug!(
            path = %path.display(),
            sample_rate = metadata.properties.sample_rate,
            total_seconds = metadata.properties.total_seconds,
            comments = metadata.tags.comments.len(),
            "FLAC metadata extracted"
        );
        Ok(metadata)
    }

    /// Extracts metadata from any readable, seekable byte source.
    ///
    /// `source` labels diagnostics and the cuesheet `FILE` line; `file_size`
    /// feeds the bit-rate computation. Problems inside a single block are
    /// reported to `diag` and that block is skipped; a broken container
    /// (bad marker, truncated block chain) fails the whole call.
    pub fn from_reader<R: Read + Seek>(
        reader: &mut R,
        file_size: u64,
        source: &str,
        diag: &mut dyn Diagnostics,
    ) -> Result<Self, FlacMetaError> {
        let mut stream_info: Option<StreamInfo> = None;
        let mut tags = TagSet::default();

        {
            let mut scanner = ContainerScanner::open(&mut *reader)?;
            while let Some((header, payload)) = scanner.next_block()? {
                let block = match Block::decode(&header, &payload) {
                    Ok(block) => block,
                    Err(err) => {
                        diag.warn(&format!(
                            "{source}: undecodable {:?} block: {err}",
                            header.block_type
                        ));
                        continue;
                    }
                };
                match block {
                    Block::StreamInfo(info) => stream_info = Some(info),
                    Block::VorbisComment(comments) => tags.add_comments(&comments, diag),
                    Block::Cuesheet(cuesheet) => {
                        tags.set_cuesheet(render_cuesheet(&cuesheet, source))
                    }
                    Block::Picture(picture) => tags.add_picture(picture),
                    Block::Application(app) => tags.add_application(&app),
                    Block::Ignored => {}
                }
            }
        }

        // Independent raw walk over the block headers to locate the first
        // audio byte; payloads are seeked past, not read.
        reader.seek(SeekFrom::Start(0))?;
        let audio_offset = ContainerScanner::open(&mut *reader)?.audio_data_offset()?;

        let info = match stream_info {
            Some(info) => info,
            None => {
                diag.warn(&format!("{source}: no STREAMINFO block found"));
                StreamInfo::default()
            }
        };
        let properties = StreamProperties::derive(&info, audio_offset, file_size, source, diag);

        Ok(Self { properties, tags })
    }
}
