//! Error kinds raised during a scan.

use std::io;

#[derive(thiserror::Error, Debug)]
pub enum FlacMetaError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("short read: wanted {wanted} bytes, got {got}")]
    ShortRead { wanted: usize, got: usize },
    #[error("malformed header: {0}")]
    MalformedHeader(String),
    #[error("missing fLaC stream marker")]
    NotAContainer,
}
