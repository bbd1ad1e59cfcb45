use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::bm25x::error::Bm25xError;
use super::es519xx::error::Es519xxError;

/// A rejected packet, from either protocol family.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PacketError {
    #[error("bm25x: {0}")]
    Bm25x(#[from] Bm25xError),
    #[error("es519xx: {0}")]
    Es519xx(#[from] Es519xxError),
}

/// Broad reason a packet was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectionClass {
    /// Length, sync, counters, repeated copy or terminator.
    Framing,
    /// Flags that contradict each other.
    Conflict,
    /// Display or range bytes that cannot be turned into a value.
    Decode,
}

impl PacketError {
    /// Stable identifier used in reports.
    pub fn id(&self) -> &'static str {
        match self {
            PacketError::Bm25x(err) => match err {
                Bm25xError::InvalidLength { .. } => "DMM-FRAME-LENGTH",
                Bm25xError::InvalidSync { .. } => "DMM-FRAME-SYNC",
                Bm25xError::CounterMismatch { .. } => "DMM-FRAME-COUNTER",
                Bm25xError::MultipleModes { .. } => "DMM-FLAGS-MULTIPLE-MODES",
                Bm25xError::MultiplePrefixes { .. } => "DMM-FLAGS-MULTIPLE-PREFIXES",
                Bm25xError::AcAndDc => "DMM-FLAGS-AC-DC",
            },
            PacketError::Es519xx(err) => match err {
                Es519xxError::InvalidLength { .. } => "DMM-FRAME-LENGTH",
                Es519xxError::DuplicateMismatch { .. } => "DMM-FRAME-REPEAT",
                Es519xxError::MissingTerminator { .. } => "DMM-FRAME-TERMINATOR",
                Es519xxError::MultipleMultipliers => "DMM-FLAGS-MULTIPLE-MULTIPLIERS",
                Es519xxError::MultipleModes { .. } => "DMM-FLAGS-MULTIPLE-MODES",
                Es519xxError::AcAndDc => "DMM-FLAGS-AC-DC",
                Es519xxError::InvalidDigit { .. } => "DMM-VALUE-DIGIT",
                Es519xxError::InvalidRange { .. } => "DMM-VALUE-RANGE",
                Es519xxError::UnsupportedMode { .. } => "DMM-VALUE-MODE",
            },
        }
    }

    /// Fixed description of the rejection reason, without packet details.
    pub fn summary(&self) -> &'static str {
        match self.id() {
            "DMM-FRAME-LENGTH" => "frame length does not match the protocol",
            "DMM-FRAME-SYNC" => "sync byte missing",
            "DMM-FRAME-COUNTER" => "byte counter nibble out of sequence",
            "DMM-FRAME-REPEAT" => "repeated packet copy differs",
            "DMM-FRAME-TERMINATOR" => "CR LF terminator missing",
            "DMM-FLAGS-MULTIPLE-MODES" => "more than one measurement mode active",
            "DMM-FLAGS-MULTIPLE-PREFIXES" => "more than one unit prefix active",
            "DMM-FLAGS-MULTIPLE-MULTIPLIERS" => "more than one multiplier active",
            "DMM-FLAGS-AC-DC" => "AC and DC both active",
            "DMM-VALUE-DIGIT" => "display digit is not a decimal digit",
            "DMM-VALUE-RANGE" => "range byte outside the exponent table",
            _ => "measurement mode has no exponent table",
        }
    }

    pub fn class(&self) -> RejectionClass {
        let id = self.id();
        if id.starts_with("DMM-FRAME-") {
            RejectionClass::Framing
        } else if id.starts_with("DMM-FLAGS-") {
            RejectionClass::Conflict
        } else {
            RejectionClass::Decode
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{PacketError, RejectionClass};
    use crate::protocols::bm25x::error::Bm25xError;
    use crate::protocols::es519xx::error::Es519xxError;

    #[test]
    fn same_reason_shares_id_across_families() {
        let bm = PacketError::from(Bm25xError::AcAndDc);
        let es = PacketError::from(Es519xxError::AcAndDc);
        assert_eq!(bm.id(), es.id());
        assert_eq!(bm.class(), RejectionClass::Conflict);
    }

    #[test]
    fn classes_follow_id_prefix() {
        let framing = PacketError::from(Bm25xError::InvalidSync { value: 0 });
        assert_eq!(framing.class(), RejectionClass::Framing);
        let decode = PacketError::from(Es519xxError::InvalidRange { value: b'9' });
        assert_eq!(decode.class(), RejectionClass::Decode);
        assert_eq!(decode.to_string(), "es519xx: invalid range byte: 0x39");
    }
}
