//! Cyrustek ES519XX protocol decoding.
//!
//! ES519XX chips send the display as ASCII digits followed by a function
//! byte, a status byte and one to four option bytes, terminated by CR LF.
//! The seven supported variants differ in baud rate, packet size (11 or 14
//! bytes), digit count and the meaning of the option bits; 11 byte devices
//! transmit every packet twice. Variant differences are carried by the
//! `ProtocolProfile` passed to every call.
//!
//! Decoding runs in stages: `flags` reads the status, option and function
//! bytes, `fixups` corrects device quirks, `validate` rejects contradictory
//! packets, then the display value is scaled with the variant's exponent table.

pub mod error;
pub mod exponents;
pub mod fixups;
pub mod flags;
pub mod layout;
pub mod parser;
pub mod reader;

pub use parser::{check_framing, parse_es519xx, validate_frame};
