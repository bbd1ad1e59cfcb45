use std::io::Write;

use dmmwire_core::{
    AnalysisError, AnalysisOptions, CaptureFileSource, CaptureFormat, ChunkSource,
    ProtocolVariant, SourceError, analyze_capture_file,
};
use tempfile::NamedTempFile;

const BM25X_VOLTS: [u8; 15] = [
    0x02, 0x1c, 0x20, 0x30, 0x4a, 0x5a, 0x6d, 0x79, 0x8f, 0x94, 0xae, 0xb0, 0xc0, 0xd0, 0xe4,
];

fn temp_capture(suffix: &str, bytes: &[u8]) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(suffix)
        .tempfile()
        .expect("temp file");
    file.write_all(bytes).expect("write capture");
    file.flush().expect("flush capture");
    file
}

fn drain(source: &mut impl ChunkSource) -> Vec<(u64, Vec<u8>)> {
    let mut chunks = Vec::new();
    while let Some(event) = source.next_chunk().expect("next chunk") {
        chunks.push((event.offset, event.data));
    }
    chunks
}

#[test]
fn raw_source_yields_every_byte_in_order() {
    let mut bytes = Vec::new();
    for _ in 0..10 {
        bytes.extend_from_slice(&BM25X_VOLTS);
    }
    let file = temp_capture(".bin", &bytes);

    let mut source = CaptureFileSource::open(file.path()).expect("open raw capture");
    let chunks = drain(&mut source);

    let joined: Vec<u8> = chunks.iter().flat_map(|(_, data)| data.clone()).collect();
    assert_eq!(joined, bytes);
    let mut expected_offset = 0;
    for (offset, data) in &chunks {
        assert_eq!(*offset, expected_offset);
        expected_offset += data.len() as u64;
    }
}

#[test]
fn hex_source_skips_comments_and_blank_lines() {
    let file = temp_capture(".hex", b"# header\n\n02 1c 20 # partial\n30 4a\n");

    let mut source = CaptureFileSource::open(file.path()).expect("open hex capture");
    let chunks = drain(&mut source);

    assert_eq!(
        chunks,
        vec![(0, vec![0x02, 0x1c, 0x20]), (3, vec![0x30, 0x4a])]
    );
}

#[test]
fn open_as_overrides_extension() {
    let file = temp_capture(".bin", b"0d0a\n");

    let mut source =
        CaptureFileSource::open_as(file.path(), CaptureFormat::HexText).expect("open as hex");
    let chunks = drain(&mut source);

    assert_eq!(chunks, vec![(0, vec![0x0d, 0x0a])]);
}

#[test]
fn malformed_hex_reports_line() {
    let file = temp_capture(".txt", b"02 1c\n02 1\n");

    let mut source = CaptureFileSource::open(file.path()).expect("open hex capture");
    source.next_chunk().expect("first line decodes");
    let err = source.next_chunk().expect_err("second line is odd length");

    match err {
        SourceError::Capture(message) => assert!(message.contains("line 2"), "{message}"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn missing_file_is_io_error() {
    let dir = tempfile::tempdir().expect("temp dir");
    let missing = dir.path().join("missing.bin");

    let err = CaptureFileSource::open(&missing)
        .err()
        .expect("missing file fails");
    assert!(matches!(err, SourceError::Io(_)));

    let options = AnalysisOptions::new(ProtocolVariant::Bm25x);
    let err = analyze_capture_file(&missing, &options).expect_err("analysis fails");
    assert!(matches!(err, AnalysisError::Source(SourceError::Io(_))));
}

#[test]
fn raw_capture_decodes_with_trailing_partial_frame() {
    let mut bytes = BM25X_VOLTS.to_vec();
    bytes.extend_from_slice(&BM25X_VOLTS[..7]);
    let file = temp_capture(".bin", &bytes);

    let report = analyze_capture_file(file.path(), &AnalysisOptions::new(ProtocolVariant::Bm25x))
        .expect("analyze raw capture");

    assert_eq!(report.measurements.len(), 1);
    assert_eq!(report.measurements[0].value, Some(12.34));
    let summary = report.capture_summary.expect("capture summary");
    assert_eq!(summary.bytes_total, 22);
    assert_eq!(summary.bytes_trailing, 7);
    assert_eq!(summary.bytes_skipped, 0);
    assert_eq!(report.input.bytes, 22);
    assert!(report.rejections.is_empty());
}
