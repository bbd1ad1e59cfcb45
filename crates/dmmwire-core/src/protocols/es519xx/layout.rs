use std::ops::Range;

pub const PACKET_SIZE_11B: usize = 11;
pub const PACKET_SIZE_14B: usize = 14;

/// Range byte: ASCII `'0'..='7'`, indexes the exponent table column.
pub const RANGE_OFFSET: usize = 0;
pub const RANGE_BASE: u8 = b'0';
pub const RANGE_COUNT: usize = 8;
/// Exponent table rows (see `exponents`).
pub const MODE_COUNT: usize = 9;

/// First ASCII display digit, leading digit first.
pub const DIGITS_OFFSET: usize = 1;

pub const CR: u8 = b'\r';
pub const LF: u8 = b'\n';

/// Option bytes of the 11 byte variants.
pub const OPTION1_11B: usize = 7;
pub const OPTION2_11B: usize = 8;

/// Option bytes of the 14 byte variants.
pub const OPTION1_14B: usize = 8;
pub const OPTION2_14B: usize = 9;
pub const OPTION3_14B: usize = 10;
pub const OPTION4_14B: usize = 11;

pub const fn digit_count(packet_size: usize) -> usize {
    if packet_size == PACKET_SIZE_14B { 5 } else { 4 }
}

pub const fn digits_range(packet_size: usize) -> Range<usize> {
    DIGITS_OFFSET..DIGITS_OFFSET + digit_count(packet_size)
}

/// The function byte follows the display digits.
pub const fn function_offset(packet_size: usize) -> usize {
    DIGITS_OFFSET + digit_count(packet_size)
}

pub const fn status_offset(packet_size: usize) -> usize {
    function_offset(packet_size) + 1
}

pub const fn terminator_offset(packet_size: usize) -> usize {
    packet_size - 2
}

// Status byte, standard layout.
pub const STATUS_JUDGE: u8 = 1 << 3;
pub const STATUS_SIGN: u8 = 1 << 2;
pub const STATUS_BATTERY: u8 = 1 << 1;
pub const STATUS_OVERFLOW: u8 = 1 << 0;

// Status byte, alternate function layout. Either overflow bit counts.
pub const ALT_STATUS_SIGN: u8 = 1 << 3;
pub const ALT_STATUS_BATTERY: u8 = 1 << 2;
pub const ALT_STATUS_OVERFLOW: u8 = (1 << 1) | (1 << 0);

// 14 byte option 1.
pub const OPT1_14B_MAX: u8 = 1 << 3;
pub const OPT1_14B_MIN: u8 = 1 << 2;
pub const OPT1_14B_REL: u8 = 1 << 1;
pub const OPT1_14B_RMR: u8 = 1 << 0;

// 14 byte option 2.
pub const OPT2_14B_UL: u8 = 1 << 3;
pub const OPT2_14B_PMAX: u8 = 1 << 2;
pub const OPT2_14B_PMIN: u8 = 1 << 1;

// 14 byte option 3.
pub const OPT3_14B_DC: u8 = 1 << 3;
pub const OPT3_14B_AC: u8 = 1 << 2;
pub const OPT3_14B_AUTO: u8 = 1 << 1;
pub const OPT3_14B_VAHZ: u8 = 1 << 0;

// 14 byte option 4, selectable low-pass filter.
pub const OPT4_LPF_HOLD: u8 = 1 << 3;
pub const OPT4_LPF_VBAR: u8 = 1 << 2;
pub const OPT4_LPF_LPF1: u8 = 1 << 1;
pub const OPT4_LPF_LPF0: u8 = 1 << 0;

// 14 byte option 4, fixed low-pass filter.
pub const OPT4_VBAR: u8 = 1 << 2;
pub const OPT4_HOLD: u8 = 1 << 1;
pub const OPT4_LPF1: u8 = 1 << 0;

// 11 byte alternate function option 2.
pub const ALT_OPT2_DC: u8 = 1 << 3;
pub const ALT_OPT2_AUTO: u8 = 1 << 2;
pub const ALT_OPT2_APO: u8 = 1 << 0;

// 11 byte option 1, 2400 baud.
pub const OPT1_2400_PMAX: u8 = 1 << 3;
pub const OPT1_2400_PMIN: u8 = 1 << 2;
pub const OPT1_2400_VAHZ: u8 = 1 << 0;

// 11 byte option 1, five digit display.
pub const OPT1_5DIGITS_UL: u8 = 1 << 3;
pub const OPT1_5DIGITS_PMAX: u8 = 1 << 2;
pub const OPT1_5DIGITS_PMIN: u8 = 1 << 1;
pub const OPT1_5DIGITS_DIGIT4: u8 = 1 << 0;

// 11 byte option 1, clamp meter.
pub const OPT1_CLAMP_UL: u8 = 1 << 3;
pub const OPT1_CLAMP_VASEL: u8 = 1 << 2;
pub const OPT1_CLAMP_VBAR: u8 = 1 << 1;

// 11 byte option 1, other 19200 baud chips.
pub const OPT1_HOLD: u8 = 1 << 3;
pub const OPT1_MAX: u8 = 1 << 2;
pub const OPT1_MIN: u8 = 1 << 1;

// 11 byte option 2. Bit 0 is APO at 2400 baud, VAHZ otherwise.
pub const OPT2_DC: u8 = 1 << 3;
pub const OPT2_AC: u8 = 1 << 2;
pub const OPT2_AUTO: u8 = 1 << 1;
pub const OPT2_BIT0: u8 = 1 << 0;

/// Exponents while the VBAR annunciator is lit, by range index.
pub const VBAR_MICRO_EXPONENTS: [i32; 2] = [-1, 0];
pub const VBAR_MILLI_EXPONENTS: [i32; 2] = [-2, -1];

/// Duty cycle readings always carry one decimal.
pub const DUTY_CYCLE_EXPONENT: i32 = -1;

/// Continuity readings at or below this many ohms count as closed.
pub const CONTINUITY_THRESHOLD: f64 = 25.0;
