//! Serial capture file source.
//!
//! Captures are either the raw byte stream as received from the meter
//! (`.bin` or any other extension), or a text dump with whitespace separated
//! hex bytes (`.hex`, `.txt`) where `#` starts a comment.

pub mod error;
pub mod layout;
pub mod parser;
pub mod reader;

pub use parser::CaptureFileSource;
pub use reader::CaptureFormat;
