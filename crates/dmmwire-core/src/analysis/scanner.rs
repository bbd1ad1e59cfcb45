//! Stream re-synchronisation over a raw serial byte stream.
//!
//! The scanner buffers incoming bytes and slides a frame-sized window over
//! them. A window that fails the framing checks is dropped one byte at a
//! time; an aligned window is consumed whole and decoded, so a rejected but
//! aligned frame does not cause a re-scan of its own bytes.

use crate::measurement::MeasurementRecord;
use crate::protocols::{self, PacketError, ProtocolVariant};

/// Bit 7 of every byte, set by some USB/HID serial cables.
const PARITY_MASK: u8 = 0x7f;

#[derive(Debug, Clone, PartialEq)]
pub enum ScanEvent {
    Measurement {
        /// Stream offset of the first byte of the frame.
        offset: u64,
        record: MeasurementRecord,
    },
    Rejected {
        offset: u64,
        error: PacketError,
    },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanStats {
    pub bytes_total: u64,
    /// Bytes dropped while searching for an aligned frame.
    pub bytes_skipped: u64,
    pub frames_decoded: u64,
    pub frames_rejected: u64,
}

pub struct PacketScanner {
    variant: ProtocolVariant,
    frame_len: usize,
    mask_parity: bool,
    buffer: Vec<u8>,
    /// Stream offset of `buffer[0]`.
    buffer_offset: u64,
    stats: ScanStats,
}

impl PacketScanner {
    pub fn new(variant: ProtocolVariant, mask_parity: bool) -> Self {
        let frame_len = variant.profile().frame_len;
        Self {
            variant,
            frame_len,
            mask_parity,
            buffer: Vec::with_capacity(4 * frame_len),
            buffer_offset: 0,
            stats: ScanStats::default(),
        }
    }

    pub fn stats(&self) -> ScanStats {
        self.stats
    }

    /// Bytes still waiting for a complete frame.
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }

    /// Feed bytes and return every event they complete, in stream order.
    pub fn push(&mut self, data: &[u8]) -> Vec<ScanEvent> {
        self.stats.bytes_total += data.len() as u64;
        if self.mask_parity {
            self.buffer
                .extend(data.iter().map(|byte| byte & PARITY_MASK));
        } else {
            self.buffer.extend_from_slice(data);
        }

        let mut events = Vec::new();
        let mut start = 0;
        while self.buffer.len() - start >= self.frame_len {
            let frame = &self.buffer[start..start + self.frame_len];
            let offset = self.buffer_offset + start as u64;
            if protocols::check_framing(self.variant, frame).is_err() {
                self.stats.bytes_skipped += 1;
                start += 1;
                continue;
            }
            match protocols::parse_packet(self.variant, frame) {
                Ok(record) => {
                    self.stats.frames_decoded += 1;
                    events.push(ScanEvent::Measurement { offset, record });
                }
                Err(error) => {
                    tracing::debug!(offset, id = error.id(), %error, "packet rejected");
                    self.stats.frames_rejected += 1;
                    events.push(ScanEvent::Rejected { offset, error });
                }
            }
            start += self.frame_len;
        }

        self.buffer.drain(..start);
        self.buffer_offset += start as u64;
        events
    }
}

#[cfg(test)]
mod tests {
    use super::{PacketScanner, ScanEvent};
    use crate::measurement::MeasurementKind;
    use crate::protocols::{PacketError, ProtocolVariant};
    use crate::protocols::bm25x::error::Bm25xError;

    const BM25X_VOLTS: [u8; 15] = [
        0x02, 0x1c, 0x20, 0x30, 0x4a, 0x5a, 0x6d, 0x79, 0x8f, 0x94, 0xae, 0xb0, 0xc0, 0xd0, 0xe4,
    ];

    #[test]
    fn resynchronises_after_garbage() {
        let mut scanner = PacketScanner::new(ProtocolVariant::Bm25x, false);
        let mut stream = vec![0xff, 0x02, 0x13];
        stream.extend_from_slice(&BM25X_VOLTS);
        stream.extend_from_slice(&BM25X_VOLTS);
        let events = scanner.push(&stream);
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], ScanEvent::Measurement { offset: 3, .. }));
        assert!(matches!(events[1], ScanEvent::Measurement { offset: 18, .. }));
        let stats = scanner.stats();
        assert_eq!(stats.bytes_skipped, 3);
        assert_eq!(stats.frames_decoded, 2);
        assert_eq!(scanner.pending(), 0);
    }

    #[test]
    fn frames_split_across_pushes() {
        let mut scanner = PacketScanner::new(ProtocolVariant::Bm25x, false);
        assert!(scanner.push(&BM25X_VOLTS[..6]).is_empty());
        assert_eq!(scanner.pending(), 6);
        let events = scanner.push(&BM25X_VOLTS[6..]);
        assert_eq!(events.len(), 1);
        match &events[0] {
            ScanEvent::Measurement { offset, record } => {
                assert_eq!(*offset, 0);
                assert_eq!(record.kind, MeasurementKind::Voltage);
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn aligned_conflicts_are_reported_and_consumed() {
        let mut conflicting = BM25X_VOLTS;
        conflicting[1] = 0x16;
        let mut scanner = PacketScanner::new(ProtocolVariant::Bm25x, false);
        let mut stream = conflicting.to_vec();
        stream.extend_from_slice(&BM25X_VOLTS);
        let events = scanner.push(&stream);
        assert_eq!(
            events[0],
            ScanEvent::Rejected {
                offset: 0,
                error: PacketError::Bm25x(Bm25xError::AcAndDc),
            }
        );
        assert!(matches!(events[1], ScanEvent::Measurement { offset: 15, .. }));
        assert_eq!(scanner.stats().bytes_skipped, 0);
    }

    #[test]
    fn parity_mask_clears_high_bit() {
        let variant = ProtocolVariant::Es519xx19200Baud14Byte;
        let noisy: Vec<u8> = b"112345;000:0\r\n".iter().map(|byte| byte | 0x80).collect();

        let mut plain = PacketScanner::new(variant, false);
        assert!(plain.push(&noisy).is_empty());

        let mut masked = PacketScanner::new(variant, true);
        let events = masked.push(&noisy);
        assert!(matches!(events[0], ScanEvent::Measurement { .. }));
        assert_eq!(masked.stats().bytes_total, 14);
    }
}
