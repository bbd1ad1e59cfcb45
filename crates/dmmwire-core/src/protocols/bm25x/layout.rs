use crate::protocols::common::reader::FlagBit;

pub const PACKET_SIZE: usize = 15;
pub const DIGIT_COUNT: usize = 4;

pub const SYNC_OFFSET: usize = 0;
pub const SYNC_BYTE: u8 = 0x02;
/// Bytes from here on carry their own index in the high nibble.
pub const COUNTER_START: usize = 1;

/// Digit `n` spans the low nibbles of bytes `3 + 2n` and `4 + 2n`.
pub const DIGIT_BASE_OFFSET: usize = 3;
pub const DIGIT_LOW_MASK: u8 = 0x0e;
/// Decimal point candidates sit in bit 0 of byte `11 - 2i`, `i` in 1..4.
pub const POINT_BASE_OFFSET: usize = 11;
pub const POINT_MASK: u8 = 0x01;

pub(crate) const SIGN: FlagBit = FlagBit::new(3, 0);

pub(crate) const AUTORANGE: FlagBit = FlagBit::new(1, 3);
pub(crate) const DC: FlagBit = FlagBit::new(1, 2);
pub(crate) const AC: FlagBit = FlagBit::new(1, 1);
pub(crate) const RELATIVE: FlagBit = FlagBit::new(1, 0);
pub(crate) const HOLD: FlagBit = FlagBit::new(11, 3);
pub(crate) const MAX: FlagBit = FlagBit::new(13, 3);
pub(crate) const MIN: FlagBit = FlagBit::new(14, 3);

pub(crate) const VOLTAGE: FlagBit = FlagBit::new(14, 2);
pub(crate) const CURRENT: FlagBit = FlagBit::new(14, 1);
pub(crate) const RESISTANCE: FlagBit = FlagBit::new(12, 2);
pub(crate) const CAPACITANCE: FlagBit = FlagBit::new(13, 2);
pub(crate) const FREQUENCY: FlagBit = FlagBit::new(12, 1);

/// Unit prefix annunciators, in lookup priority order.
pub(crate) const PREFIXES: [(FlagBit, i32); 5] = [
    (FlagBit::new(11, 1), 6),
    (FlagBit::new(11, 0), 3),
    (FlagBit::new(13, 0), -3),
    (FlagBit::new(13, 1), -6),
    (FlagBit::new(12, 0), -9),
];
