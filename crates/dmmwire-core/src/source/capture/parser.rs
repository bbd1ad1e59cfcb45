use std::fs::File;
use std::io::{BufRead, BufReader, Lines, Read};
use std::path::Path;

use crate::source::{ChunkEvent, ChunkSource, SourceError};

use super::error::CaptureSourceError;
use super::layout;
use super::reader::{CaptureFormat, decode_hex_line, detect_format};

pub struct CaptureFileSource {
    inner: CaptureReader,
    offset: u64,
}

enum CaptureReader {
    Raw(BufReader<File>),
    Hex {
        lines: Lines<BufReader<File>>,
        line_no: usize,
    },
}

impl CaptureFileSource {
    pub fn open(path: &Path) -> Result<Self, SourceError> {
        Self::open_as(path, detect_format(path))
    }

    pub fn open_as(path: &Path, format: CaptureFormat) -> Result<Self, SourceError> {
        let file = BufReader::new(File::open(path).map_err(SourceError::from)?);
        let inner = match format {
            CaptureFormat::Raw => CaptureReader::Raw(file),
            CaptureFormat::HexText => CaptureReader::Hex {
                lines: file.lines(),
                line_no: 0,
            },
        };
        Ok(Self { inner, offset: 0 })
    }
}

impl ChunkSource for CaptureFileSource {
    fn next_chunk(&mut self) -> Result<Option<ChunkEvent>, SourceError> {
        let data = match next_data(&mut self.inner).map_err(SourceError::from)? {
            Some(data) => data,
            None => return Ok(None),
        };
        let event = ChunkEvent {
            offset: self.offset,
            data,
        };
        self.offset += event.data.len() as u64;
        Ok(Some(event))
    }
}

fn next_data(reader: &mut CaptureReader) -> Result<Option<Vec<u8>>, CaptureSourceError> {
    match reader {
        CaptureReader::Raw(file) => {
            let mut buf = vec![0u8; layout::RAW_CHUNK_SIZE];
            let read = file.read(&mut buf)?;
            if read == 0 {
                return Ok(None);
            }
            buf.truncate(read);
            Ok(Some(buf))
        }
        CaptureReader::Hex { lines, line_no } => loop {
            let Some(line) = lines.next() else {
                return Ok(None);
            };
            *line_no += 1;
            let bytes = decode_hex_line(&line?, *line_no)?;
            if !bytes.is_empty() {
                return Ok(Some(bytes));
            }
        },
    }
}
