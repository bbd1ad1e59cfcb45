//! dmmwire core library: serial multimeter protocol decoding.
//!
//! This crate turns the fixed-size packets streamed by digital multimeters
//! into typed [`MeasurementRecord`]s. Two protocol families are supported:
//! Brymen BM25x (LCD segment nibbles) and Cyrustek ES519XX (ASCII digits, in
//! seven layout variants). Decoders are byte-oriented, pure and synchronous;
//! all I/O is isolated in `source` modules, and the analysis layer drives a
//! stream scanner over recorded captures to build a deterministic report.
//!
//! Invariants:
//! - A record carries exactly one measurement kind; AC and DC are never both set.
//! - Over and underflow decode to positive infinity, never to digits.
//! - Identical bytes decode to bit-identical records.
//!
//! Version française (résumé):
//! Cette crate décode les paquets série des multimètres (Brymen BM25x,
//! Cyrustek ES519XX) en mesures typées. Les décodeurs sont purs; les E/S
//! restent dans `source`, l'analyse produit un rapport JSON déterministe.
//!
//! # Examples
//! ```no_run
//! use std::path::Path;
//!
//! use dmmwire_core::{AnalysisOptions, ProtocolVariant, analyze_capture_file};
//!
//! let options = AnalysisOptions::new(ProtocolVariant::Bm25x);
//! let report = analyze_capture_file(Path::new("bm257.bin"), &options)?;
//! println!("decoded {} measurements", report.measurements.len());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use serde::{Deserialize, Serialize};

mod analysis;
mod measurement;
mod protocols;
mod source;

pub use analysis::scanner::{PacketScanner, ScanEvent, ScanStats};
pub use analysis::{AnalysisError, AnalysisOptions, analyze_capture_file, analyze_source};
pub use measurement::{MeasurementKind, MeasurementRecord, MqFlags, Unit};
pub use protocols::bm25x::error::Bm25xError;
pub use protocols::es519xx::error::Es519xxError;
pub use protocols::{
    PacketError, ProtocolFamily, ProtocolProfile, ProtocolVariant, RejectionClass,
    UnknownVariant, check_framing, is_valid_frame, parse_packet, validate_frame,
};
pub use source::{CaptureFileSource, CaptureFormat, ChunkEvent, ChunkSource, SourceError};

/// Current report schema version.
pub const REPORT_VERSION: u32 = 1;
/// Default timestamp used when the capture time is unavailable.
pub const DEFAULT_GENERATED_AT: &str = "1970-01-01T00:00:00Z";

/// Analysis report with deterministic ordering.
///
/// # Examples
/// ```
/// use dmmwire_core::make_stub_report;
///
/// let report = make_stub_report("capture.bin", 123);
/// assert_eq!(report.report_version, dmmwire_core::REPORT_VERSION);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    /// Report schema version (not the binary version).
    pub report_version: u32,
    pub tool: ToolInfo,
    /// RFC3339 modification time of the capture file.
    pub generated_at: String,
    pub input: InputInfo,
    pub protocol: ProtocolInfo,
    /// Scanner counters; absent on stub reports.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capture_summary: Option<CaptureSummary>,
    /// Decoded measurements in stream order.
    pub measurements: Vec<MeasurementSummary>,
    /// Rejections ordered by class, then id.
    pub rejections: Vec<RejectionSummary>,
}

/// Tool metadata embedded in reports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInfo {
    pub name: String,
    pub version: String,
}

/// Input capture metadata embedded in reports.
///
/// # Examples
/// ```
/// use dmmwire_core::InputInfo;
///
/// let input = InputInfo {
///     path: "capture.hex".to_string(),
///     bytes: 1024,
/// };
/// assert_eq!(input.bytes, 1024);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputInfo {
    /// Input path as provided to the analyzer.
    pub path: String,
    /// Input size in bytes.
    pub bytes: u64,
}

/// Wire format the capture was decoded with.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProtocolInfo {
    pub name: String,
    pub family: ProtocolFamily,
    pub baud_rate: u32,
    pub frame_len: usize,
    pub display_digits: usize,
}

impl ProtocolInfo {
    pub fn for_variant(variant: ProtocolVariant) -> Self {
        let profile = variant.profile();
        Self {
            name: profile.name.to_string(),
            family: profile.family,
            baud_rate: profile.baud_rate,
            frame_len: profile.frame_len,
            display_digits: profile.digit_count(),
        }
    }
}

/// Stream scanner counters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureSummary {
    pub bytes_total: u64,
    /// Bytes dropped while searching for frame alignment.
    pub bytes_skipped: u64,
    /// Bytes left at the end that do not form a complete frame.
    pub bytes_trailing: u64,
    pub frames_decoded: u64,
    pub frames_rejected: u64,
    pub parity_masked: bool,
}

/// One decoded measurement as it appears in reports.
///
/// JSON has no infinity or NaN, so non-finite values are written as a null
/// `value` plus a `special` marker (`"inf"`, `"-inf"` or `"nan"`).
///
/// # Examples
/// ```
/// use dmmwire_core::{MeasurementKind, MeasurementRecord, MeasurementSummary, MqFlags, Unit};
///
/// let record = MeasurementRecord {
///     kind: MeasurementKind::Resistance,
///     unit: Unit::Ohm,
///     flags: MqFlags::AUTORANGE,
///     value: f64::INFINITY,
///     digits: -6,
/// };
/// let summary = MeasurementSummary::from_record(0, 0, &record);
/// assert_eq!(summary.value, None);
/// assert_eq!(summary.special.as_deref(), Some("inf"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasurementSummary {
    /// Position among the decoded measurements.
    pub index: u64,
    /// Stream offset of the frame's first byte.
    pub offset: u64,
    pub kind: MeasurementKind,
    pub unit: Unit,
    pub unit_symbol: String,
    pub flags: MqFlags,
    pub value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special: Option<String>,
    pub digits: i32,
}

impl MeasurementSummary {
    pub fn from_record(index: u64, offset: u64, record: &MeasurementRecord) -> Self {
        let (value, special) = if record.value.is_nan() {
            (None, Some("nan"))
        } else if record.value == f64::INFINITY {
            (None, Some("inf"))
        } else if record.value == f64::NEG_INFINITY {
            (None, Some("-inf"))
        } else {
            (Some(record.value), None)
        };
        Self {
            index,
            offset,
            kind: record.kind,
            unit: record.unit,
            unit_symbol: record.unit.symbol().to_string(),
            flags: record.flags,
            value,
            special: special.map(str::to_string),
            digits: record.digits,
        }
    }
}

/// Aggregated packet rejections sharing one stable id.
///
/// # Examples
/// ```
/// use dmmwire_core::{RejectionClass, RejectionSummary};
///
/// let rejection = RejectionSummary {
///     id: "DMM-FRAME-SYNC".to_string(),
///     class: RejectionClass::Framing,
///     message: "sync byte missing".to_string(),
///     count: 1,
///     examples: vec!["offset 0: bm25x: invalid sync byte: 0x00".to_string()],
/// };
/// assert_eq!(rejection.count, 1);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RejectionSummary {
    /// Stable identifier (e.g., `DMM-FLAGS-AC-DC`).
    pub id: String,
    pub class: RejectionClass,
    pub message: String,
    pub count: u64,
    /// At most three examples, formatted as `offset N: error`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub examples: Vec<String>,
}

/// Build a stub report with base fields filled and empty aggregates.
///
/// The protocol defaults to BM25x until the analysis sets the real one.
///
/// # Examples
/// ```
/// use dmmwire_core::make_stub_report;
///
/// let report = make_stub_report("capture.bin", 123);
/// assert!(report.measurements.is_empty());
/// assert!(report.capture_summary.is_none());
/// ```
pub fn make_stub_report(input_path: &str, input_bytes: u64) -> Report {
    Report {
        report_version: REPORT_VERSION,
        tool: ToolInfo {
            name: "dmmwire".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        generated_at: DEFAULT_GENERATED_AT.to_string(),
        input: InputInfo {
            path: input_path.to_string(),
            bytes: input_bytes,
        },
        protocol: ProtocolInfo::for_variant(ProtocolVariant::Bm25x),
        capture_summary: None,
        measurements: vec![],
        rejections: vec![],
    }
}
