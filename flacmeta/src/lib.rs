//! # flacmeta
//!
//! FLAC container metadata extraction without an external FLAC library.
//!
//! The crate walks a file's metadata block sequence directly: it validates
//! the `fLaC` stream marker (skipping a leading ID3v2 tag when present),
//! decodes each typed block (STREAMINFO, VORBIS_COMMENT, CUESHEET, PICTURE,
//! APPLICATION) and folds the results into two output records — stream
//! properties and a tag dictionary with well-defined merge rules for
//! repeated keys. A second, raw walk over the block headers locates the
//! first audio byte, from which duration and bit rate are derived. Audio
//! frames are never decoded and nothing is ever written back.
//!
//! ## Example
//!
//! ```no_run
//! use flacmeta::FlacMetadata;
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let metadata = FlacMetadata::from_file(Path::new("audio.flac"))?;
//!
//! println!("Sample rate: {} Hz", metadata.properties.sample_rate);
//! println!("Duration: {} s", metadata.properties.total_seconds);
//! println!("Artist: {:?}", metadata.tags.comments.get("ARTIST"));
//! # Ok(())
//! # }
//! ```
//!
//! Output models implement `serde::Serialize`, so the result can be handed
//! to any structured-value sink (JSON, YAML, ...). Non-fatal problems —
//! malformed comment entries, a zero total duration — are reported through
//! the [`Diagnostics`] sink (by default, `tracing` warnings) and never abort
//! the scan.

pub mod block;
pub mod cuesheet;
pub mod cursor;
pub mod diag;
pub mod error;
pub mod metadata;
pub mod metrics;
pub mod scanner;
pub mod tags;

pub use block::{
    Application, Block, BlockType, Cuesheet, CuesheetIndex, CuesheetTrack, PictureEntry,
    StreamInfo, VorbisComment,
};
pub use cursor::ByteCursor;
pub use diag::{Diagnostics, TracingDiagnostics};
pub use error::FlacMetaError;
pub use metadata::FlacMetadata;
pub use metrics::StreamProperties;
pub use scanner::{BlockHeader, ContainerScanner};
pub use tags::{TagSet, SEPARATOR_KEY, VENDOR_KEY};
