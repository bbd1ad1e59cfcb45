//! Capture sources feeding raw serial bytes to the analysis layer.
//!
//! A source yields the captured byte stream in chunks. Chunk boundaries carry
//! no meaning: the scanner reassembles packets across them.

mod capture;

pub use capture::{CaptureFileSource, CaptureFormat};

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkEvent {
    /// Offset of the first byte within the decoded stream.
    pub offset: u64,
    pub data: Vec<u8>,
}

pub trait ChunkSource {
    fn next_chunk(&mut self) -> Result<Option<ChunkEvent>, SourceError>;
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("capture parse error: {0}")]
    Capture(String),
}

impl From<capture::error::CaptureSourceError> for SourceError {
    fn from(value: capture::error::CaptureSourceError) -> Self {
        match value {
            capture::error::CaptureSourceError::Io(err) => SourceError::Io(err),
            err @ capture::error::CaptureSourceError::Hex { .. } => {
                SourceError::Capture(err.to_string())
            }
        }
    }
}
