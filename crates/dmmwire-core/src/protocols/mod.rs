//! Protocol decoding modules.
//!
//! Each protocol family follows a layered structure:
//! - `layout`: byte offsets, bit masks and constants (source of truth)
//! - `reader`: safe byte access and framing checks
//! - `parser`: domain-level decoding into a `MeasurementRecord`
//! - `error`: explicit, actionable errors
//!
//! Parsers are pure and contain no I/O; sources and analysis layers handle
//! file access and aggregation. [`parse_packet`] dispatches on the closed
//! [`ProtocolVariant`] enum.
//!
//! Version française (résumé):
//! Chaque famille (Brymen BM25x, Cyrustek ES519XX) est découpée en `layout`,
//! `reader`, `parser` et `error`. `parse_packet` choisit le décodeur selon la
//! variante.

pub mod bm25x;
pub(crate) mod common;
mod error;
pub mod es519xx;
pub mod profile;

pub use error::{PacketError, RejectionClass};
pub use profile::{ProtocolFamily, ProtocolProfile, ProtocolVariant, UnknownVariant};

use crate::measurement::MeasurementRecord;

/// Decode one frame of `variant`.
///
/// `frame` must be exactly `variant.profile().frame_len` bytes long. Every
/// failure is a routine rejection; callers wait for the next frame.
///
/// # Examples
/// ```
/// use dmmwire_core::{MeasurementKind, ProtocolVariant, parse_packet};
///
/// let record = parse_packet(ProtocolVariant::Es519xx19200Baud14Byte, b"112345;000:0\r\n")?;
/// assert_eq!(record.kind, MeasurementKind::Voltage);
/// assert_eq!(record.value, 12.345);
/// # Ok::<(), dmmwire_core::PacketError>(())
/// ```
pub fn parse_packet(
    variant: ProtocolVariant,
    frame: &[u8],
) -> Result<MeasurementRecord, PacketError> {
    let profile = variant.profile();
    let record = match profile.family {
        ProtocolFamily::Bm25x => bm25x::parse_bm25x(frame)?,
        ProtocolFamily::Es519xx => es519xx::parse_es519xx(frame, profile)?,
    };
    Ok(record)
}

/// Run the validity checks of `variant` without building a record.
///
/// BM25x validity is framing only; ES519XX also decodes the flag bytes and
/// rejects conflicting modes.
pub fn validate_frame(variant: ProtocolVariant, frame: &[u8]) -> Result<(), PacketError> {
    let profile = variant.profile();
    match profile.family {
        ProtocolFamily::Bm25x => bm25x::validate_frame(frame)?,
        ProtocolFamily::Es519xx => es519xx::validate_frame(frame, profile)?,
    }
    Ok(())
}

/// Check only length and framing bytes, leaving flag conflicts to the parser.
///
/// A frame that passes is aligned in the stream even if decoding it fails.
pub fn check_framing(variant: ProtocolVariant, frame: &[u8]) -> Result<(), PacketError> {
    let profile = variant.profile();
    match profile.family {
        ProtocolFamily::Bm25x => bm25x::validate_frame(frame)?,
        ProtocolFamily::Es519xx => es519xx::check_framing(frame, profile)?,
    }
    Ok(())
}

/// Convenience form of [`validate_frame`].
pub fn is_valid_frame(variant: ProtocolVariant, frame: &[u8]) -> bool {
    validate_frame(variant, frame).is_ok()
}

#[cfg(test)]
mod tests {
    use super::{PacketError, ProtocolVariant, check_framing, is_valid_frame, parse_packet};
    use crate::measurement::MeasurementKind;

    const BM25X_VOLTS: [u8; 15] = [
        0x02, 0x1c, 0x20, 0x30, 0x4a, 0x5a, 0x6d, 0x79, 0x8f, 0x94, 0xae, 0xb0, 0xc0, 0xd0, 0xe4,
    ];

    #[test]
    fn dispatch_by_family() {
        let record = parse_packet(ProtocolVariant::Bm25x, &BM25X_VOLTS).unwrap();
        assert_eq!(record.kind, MeasurementKind::Voltage);

        let record =
            parse_packet(ProtocolVariant::Es519xx19200Baud14Byte, b"112345;000:0\r\n").unwrap();
        assert_eq!(record.value, 12.345);
    }

    #[test]
    fn wrong_variant_is_rejected() {
        let err = parse_packet(ProtocolVariant::Es519xx19200Baud14Byte, &BM25X_VOLTS).unwrap_err();
        assert!(matches!(err, PacketError::Es519xx(_)));
        assert!(!is_valid_frame(ProtocolVariant::Bm25x, b"112345;000:0\r\n"));
    }

    #[test]
    fn framing_check_is_weaker_than_validation() {
        let variant = ProtocolVariant::Es519xx19200Baud14Byte;
        let conflicting = b"112345;000>0\r\n";
        assert!(check_framing(variant, conflicting).is_ok());
        assert!(!is_valid_frame(variant, conflicting));
    }

    #[test]
    fn validity_matches_parse_for_framing() {
        assert!(is_valid_frame(ProtocolVariant::Bm25x, &BM25X_VOLTS));
        let mut broken = BM25X_VOLTS;
        broken[5] = 0x00;
        assert!(!is_valid_frame(ProtocolVariant::Bm25x, &broken));
        assert!(parse_packet(ProtocolVariant::Bm25x, &broken).is_err());
    }
}
