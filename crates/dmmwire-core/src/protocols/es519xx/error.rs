use thiserror::Error;

/// Reasons a Cyrustek ES519XX packet is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Es519xxError {
    #[error("invalid packet length: need {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },
    #[error("repeated packet differs from the first copy at byte {offset}")]
    DuplicateMismatch { offset: usize },
    #[error("missing CR LF terminator at byte {offset}: {value:#04x}")]
    MissingTerminator { offset: usize, value: u8 },
    #[error("more than one multiplier active")]
    MultipleMultipliers,
    #[error("more than one measurement mode active ({count})")]
    MultipleModes { count: usize },
    #[error("both AC and DC flags set")]
    AcAndDc,
    #[error("invalid display digit at byte {offset}: {value:#04x}")]
    InvalidDigit { offset: usize, value: u8 },
    #[error("invalid range byte: {value:#04x}")]
    InvalidRange { value: u8 },
    #[error("no exponent defined for function byte {function:#04x}")]
    UnsupportedMode { function: u8 },
}
