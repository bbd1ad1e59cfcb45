use std::fs;
use std::path::{Path, PathBuf};

use dmmwire_core::{
    AnalysisOptions, MeasurementKind, ProtocolVariant, RejectionClass, Report,
    analyze_capture_file,
};

fn workspace_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("..").join("..")
}

fn load_expected_report(dir: &str) -> Report {
    let expected_path = workspace_root().join(dir).join("expected_report.json");
    let expected_json = fs::read_to_string(&expected_path).expect("read expected_report.json");
    serde_json::from_str(&expected_json).expect("parse expected report")
}

/// Golden directories are named after the protocol variant they decode.
fn variant_for(dir: &str) -> ProtocolVariant {
    let name = Path::new(dir)
        .file_name()
        .and_then(|name| name.to_str())
        .expect("golden dir name");
    name.parse().expect("golden dir names a protocol variant")
}

fn run_golden(dir: &str) {
    let input = workspace_root().join(dir).join("input.hex");
    let expected = load_expected_report(dir);

    let options = AnalysisOptions::new(variant_for(dir));
    let mut actual = analyze_capture_file(&input, &options).expect("analyze capture");
    actual.generated_at = expected.generated_at.clone();
    actual.input.path = expected.input.path.clone();

    let actual_value = serde_json::to_value(actual).expect("serialize actual");
    let expected_value = serde_json::to_value(expected).expect("serialize expected");

    assert_eq!(actual_value, expected_value, "golden mismatch in {dir}");
}

#[test]
fn golden_bm25x() {
    run_golden("tests/golden/bm25x");
}

#[test]
fn golden_es519xx_19200_14b() {
    run_golden("tests/golden/es519xx-19200-14b");
}

#[test]
fn golden_es519xx_2400_11b() {
    run_golden("tests/golden/es519xx-2400-11b");
}

#[test]
fn golden_bm25x_reports_open_circuit_as_special() {
    let report = load_expected_report("tests/golden/bm25x");
    let open = &report.measurements[1];
    assert_eq!(open.kind, MeasurementKind::Resistance);
    assert_eq!(open.value, None);
    assert_eq!(open.special.as_deref(), Some("inf"));
}

#[test]
fn golden_es519xx_14b_orders_rejections_by_class() {
    let report = load_expected_report("tests/golden/es519xx-19200-14b");
    let classes: Vec<RejectionClass> = report.rejections.iter().map(|r| r.class).collect();
    assert_eq!(classes, vec![RejectionClass::Conflict, RejectionClass::Decode]);
}

#[test]
fn golden_parity_mask_is_transparent_for_clean_captures() {
    let dir = "tests/golden/es519xx-2400-11b";
    let input = workspace_root().join(dir).join("input.hex");
    let mut options = AnalysisOptions::new(variant_for(dir));
    options.mask_parity = true;
    let report = analyze_capture_file(&input, &options).expect("analyze capture");
    let expected = load_expected_report(dir);

    assert_eq!(report.measurements, expected.measurements);
    assert!(report.capture_summary.expect("summary").parity_masked);
}
