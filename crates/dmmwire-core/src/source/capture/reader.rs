use std::path::Path;

use super::error::CaptureSourceError;
use super::layout;

/// On-disk representation of a capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureFormat {
    Raw,
    HexText,
}

/// Pick the capture format from the file extension.
///
/// # Examples
/// This helper is part of an internal module, so the example is marked as
/// text example.
/// ```text
/// use std::path::Path;
///
/// assert_eq!(detect_format(Path::new("meter.HEX")), CaptureFormat::HexText);
/// assert_eq!(detect_format(Path::new("meter.bin")), CaptureFormat::Raw);
/// ```
pub fn detect_format(path: &Path) -> CaptureFormat {
    let is_hex = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            layout::HEX_EXTENSIONS
                .iter()
                .any(|candidate| ext.eq_ignore_ascii_case(candidate))
        });
    if is_hex {
        CaptureFormat::HexText
    } else {
        CaptureFormat::Raw
    }
}

/// Decode one line of a hex dump. Comments and whitespace are ignored.
///
/// `line_no` is 1-based and only used for error reporting.
pub fn decode_hex_line(line: &str, line_no: usize) -> Result<Vec<u8>, CaptureSourceError> {
    let content = match line.split_once(layout::HEX_COMMENT) {
        Some((before, _)) => before,
        None => line,
    };
    let digits: String = content.split_whitespace().collect();
    hex::decode(&digits).map_err(|err| CaptureSourceError::Hex {
        line: line_no,
        message: err.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::{CaptureFormat, decode_hex_line, detect_format};
    use crate::source::capture::error::CaptureSourceError;

    #[test]
    fn format_follows_extension() {
        assert_eq!(detect_format(Path::new("a.hex")), CaptureFormat::HexText);
        assert_eq!(detect_format(Path::new("a.TXT")), CaptureFormat::HexText);
        assert_eq!(detect_format(Path::new("a.bin")), CaptureFormat::Raw);
        assert_eq!(detect_format(Path::new("capture")), CaptureFormat::Raw);
    }

    #[test]
    fn decode_line_ignores_spacing_and_comments() {
        let bytes = decode_hex_line("02 1c 20\t30 # sync and flags", 1).unwrap();
        assert_eq!(bytes, vec![0x02, 0x1c, 0x20, 0x30]);
        assert_eq!(decode_hex_line("0d0a", 1).unwrap(), vec![0x0d, 0x0a]);
        assert!(decode_hex_line("   # only a comment", 1).unwrap().is_empty());
    }

    #[test]
    fn decode_line_reports_line_number() {
        let err = decode_hex_line("02 1", 7).unwrap_err();
        assert!(matches!(err, CaptureSourceError::Hex { line: 7, .. }));
        let err = decode_hex_line("zz", 3).unwrap_err();
        assert!(err.to_string().contains("line 3"));
    }
}
