use thiserror::Error;

#[derive(Debug, Error)]
pub enum CaptureSourceError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid hex on line {line}: {message}")]
    Hex { line: usize, message: String },
}
