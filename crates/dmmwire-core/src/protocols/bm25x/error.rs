use thiserror::Error;

/// Reasons a Brymen BM25x packet is rejected.
///
/// # Examples
/// ```
/// use dmmwire_core::Bm25xError;
///
/// let err = Bm25xError::InvalidSync { value: 0x7f };
/// assert!(err.to_string().contains("invalid sync byte"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Bm25xError {
    #[error("invalid packet length: need {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },
    #[error("invalid sync byte: {value:#04x}")]
    InvalidSync { value: u8 },
    #[error("nibble counter mismatch at byte {offset}: {value:#04x}")]
    CounterMismatch { offset: usize, value: u8 },
    #[error("more than one measurement mode active ({count})")]
    MultipleModes { count: usize },
    #[error("more than one unit prefix active ({count})")]
    MultiplePrefixes { count: usize },
    #[error("both AC and DC flags set")]
    AcAndDc,
}
