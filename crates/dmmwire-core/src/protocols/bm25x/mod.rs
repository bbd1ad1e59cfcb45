//! Brymen BM25x protocol decoding.
//!
//! BM25x meters stream a 15 byte packet at 9600 baud. Byte 0 is a sync byte
//! and every following byte carries its own index in the high nibble; the low
//! nibbles mirror the LCD segments. The parser validates that framing, decodes
//! the four segment digits into a value and maps the annunciator bits to a
//! measurement kind and qualifier flags.
//!
//! Packets with conflicting annunciators (two modes, two prefixes, AC and DC)
//! are rejected. Unreadable digits degrade to NaN instead.
//!
//! Version française (résumé):
//! Décodage des paquets Brymen BM25x (15 octets, segments LCD en quartets).
//! Les positions sont dans `layout`, l'accès aux octets dans `reader`.

pub mod error;
pub mod layout;
pub mod parser;
pub mod reader;

pub use parser::{parse_bm25x, validate_frame};
