/// Bytes read per chunk from raw captures.
pub const RAW_CHUNK_SIZE: usize = 64;

/// Extensions treated as hex text dumps (compared case-insensitively).
pub const HEX_EXTENSIONS: [&str; 2] = ["hex", "txt"];

pub const HEX_COMMENT: char = '#';
