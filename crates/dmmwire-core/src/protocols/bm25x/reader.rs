use super::error::Bm25xError;
use super::layout;
use crate::protocols::common::reader::FlagBit;

/// A character shown in one LCD digit position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Glyph {
    Digit(u8),
    Blank,
    Minus,
    L,
    C,
    F,
    E,
    N,
    R,
}

/// Segment patterns as assembled by [`Bm25xReader::segment_code`].
const GLYPHS: [(u8, Glyph); 18] = [
    (0xbe, Glyph::Digit(0)),
    (0xa0, Glyph::Digit(1)),
    (0xda, Glyph::Digit(2)),
    (0xf8, Glyph::Digit(3)),
    (0xe4, Glyph::Digit(4)),
    (0x7c, Glyph::Digit(5)),
    (0x7e, Glyph::Digit(6)),
    (0xa8, Glyph::Digit(7)),
    (0xfe, Glyph::Digit(8)),
    (0xfc, Glyph::Digit(9)),
    (0x00, Glyph::Blank),
    (0x40, Glyph::Minus),
    (0x16, Glyph::L),
    (0x1e, Glyph::C),
    (0x4e, Glyph::F),
    (0x5e, Glyph::E),
    (0x62, Glyph::N),
    (0x42, Glyph::R),
];

/// Map a segment pattern to its glyph.
pub fn glyph_for_code(code: u8) -> Option<Glyph> {
    GLYPHS
        .iter()
        .find(|(candidate, _)| *candidate == code)
        .map(|(_, glyph)| *glyph)
}

/// Decimal point annunciator state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecimalPoint {
    None,
    /// Index `i` in 1..4; the point sits left of digit `4 - i`.
    At(usize),
    Multiple,
}

pub struct Bm25xReader<'a> {
    packet: &'a [u8],
}

impl<'a> Bm25xReader<'a> {
    pub fn new(packet: &'a [u8]) -> Self {
        Self { packet }
    }

    pub fn require_len(&self, needed: usize) -> Result<(), Bm25xError> {
        if self.packet.len() != needed {
            return Err(Bm25xError::InvalidLength {
                expected: needed,
                actual: self.packet.len(),
            });
        }
        Ok(())
    }

    pub fn read_u8(&self, offset: usize) -> Result<u8, Bm25xError> {
        self.packet
            .get(offset)
            .copied()
            .ok_or(Bm25xError::InvalidLength {
                expected: layout::PACKET_SIZE,
                actual: self.packet.len(),
            })
    }

    pub(crate) fn is_set(&self, bit: FlagBit) -> bool {
        self.packet
            .get(bit.offset)
            .is_some_and(|byte| byte & bit.mask != 0)
    }

    /// Check the sync byte and the per-byte nibble counter.
    pub fn check_framing(&self) -> Result<(), Bm25xError> {
        self.require_len(layout::PACKET_SIZE)?;
        let sync = self.read_u8(layout::SYNC_OFFSET)?;
        if sync != layout::SYNC_BYTE {
            return Err(Bm25xError::InvalidSync { value: sync });
        }
        for offset in layout::COUNTER_START..layout::PACKET_SIZE {
            let value = self.read_u8(offset)?;
            if usize::from(value >> 4) != offset {
                return Err(Bm25xError::CounterMismatch { offset, value });
            }
        }
        Ok(())
    }

    /// Combine the two nibble groups of digit `index` into one segment pattern.
    pub fn segment_code(&self, index: usize) -> u8 {
        let low = layout::DIGIT_BASE_OFFSET + 2 * index;
        let low_bits = self.packet.get(low).copied().unwrap_or_default() & layout::DIGIT_LOW_MASK;
        let high_bits = (self.packet.get(low + 1).copied().unwrap_or_default() << 4) & 0xf0;
        low_bits | high_bits
    }

    /// Decode digit `index`; unknown patterns yield `None`.
    pub fn glyph(&self, index: usize) -> Option<Glyph> {
        let code = self.segment_code(index);
        let glyph = glyph_for_code(code);
        if glyph.is_none() {
            tracing::debug!(digit = index, code = format_args!("{code:#04x}"), "unknown digit");
        }
        glyph
    }

    pub fn decimal_point(&self) -> DecimalPoint {
        let mut point = DecimalPoint::None;
        for index in 1..layout::DIGIT_COUNT {
            let bit = FlagBit {
                offset: layout::POINT_BASE_OFFSET - 2 * index,
                mask: layout::POINT_MASK,
            };
            if !self.is_set(bit) {
                continue;
            }
            if point != DecimalPoint::None {
                tracing::trace!("multiple decimal points found");
                return DecimalPoint::Multiple;
            }
            point = DecimalPoint::At(index);
        }
        point
    }

    /// Exponent of the first lit prefix annunciator, 0 when none is lit.
    pub fn prefix_exponent(&self) -> i32 {
        layout::PREFIXES
            .iter()
            .find(|(bit, _)| self.is_set(*bit))
            .map(|(_, exponent)| *exponent)
            .unwrap_or(0)
    }

    pub fn prefix_count(&self) -> usize {
        layout::PREFIXES
            .iter()
            .filter(|(bit, _)| self.is_set(*bit))
            .count()
    }

    pub fn is_negative(&self) -> bool {
        self.is_set(layout::SIGN)
    }
}
