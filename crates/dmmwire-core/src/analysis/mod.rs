use std::path::Path;

use thiserror::Error;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

use crate::protocols::ProtocolVariant;
use crate::source::{CaptureFileSource, ChunkEvent, ChunkSource, SourceError};
use crate::{
    CaptureSummary, DEFAULT_GENERATED_AT, MeasurementSummary, ProtocolInfo, Report,
    make_stub_report,
};

mod rejections;
pub mod scanner;

use rejections::RejectionTally;
use scanner::{PacketScanner, ScanEvent};

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Source error: {0}")]
    Source(#[from] SourceError),
}

/// How to interpret a capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisOptions {
    pub variant: ProtocolVariant,
    /// Clear bit 7 of every byte before scanning.
    pub mask_parity: bool,
}

impl AnalysisOptions {
    pub fn new(variant: ProtocolVariant) -> Self {
        Self {
            variant,
            mask_parity: false,
        }
    }
}

pub fn analyze_capture_file(
    path: &Path,
    options: &AnalysisOptions,
) -> Result<Report, AnalysisError> {
    let source = CaptureFileSource::open(path)?;
    analyze_source(path, source, options)
}

pub fn analyze_source<S: ChunkSource>(
    path: &Path,
    mut source: S,
    options: &AnalysisOptions,
) -> Result<Report, AnalysisError> {
    let mut scanner = PacketScanner::new(options.variant, options.mask_parity);
    let mut measurements = Vec::new();
    let mut rejections = RejectionTally::default();

    while let Some(ChunkEvent { data, .. }) = source.next_chunk()? {
        for event in scanner.push(&data) {
            match event {
                ScanEvent::Measurement { offset, record } => {
                    let index = measurements.len() as u64;
                    measurements.push(MeasurementSummary::from_record(index, offset, &record));
                }
                ScanEvent::Rejected { offset, error } => rejections.add(offset, &error),
            }
        }
    }

    let stats = scanner.stats();
    tracing::info!(
        protocol = %options.variant,
        decoded = stats.frames_decoded,
        rejected = stats.frames_rejected,
        skipped = stats.bytes_skipped,
        "capture analysed"
    );

    let metadata = path.metadata()?;
    let mut report = make_stub_report(&path.display().to_string(), metadata.len());
    report.generated_at = metadata
        .modified()
        .ok()
        .and_then(system_time_to_rfc3339)
        .unwrap_or_else(|| DEFAULT_GENERATED_AT.to_string());
    report.protocol = ProtocolInfo::for_variant(options.variant);
    report.capture_summary = Some(CaptureSummary {
        bytes_total: stats.bytes_total,
        bytes_skipped: stats.bytes_skipped,
        bytes_trailing: scanner.pending() as u64,
        frames_decoded: stats.frames_decoded,
        frames_rejected: stats.frames_rejected,
        parity_masked: options.mask_parity,
    });
    report.measurements = measurements;
    report.rejections = rejections.into_summaries();
    Ok(report)
}

fn system_time_to_rfc3339(time: std::time::SystemTime) -> Option<String> {
    OffsetDateTime::from(time).format(&Rfc3339).ok()
}
