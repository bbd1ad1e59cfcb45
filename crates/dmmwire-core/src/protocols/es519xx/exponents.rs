//! Per-variant decimal exponents, indexed by `[mode row][range index]`.

use super::layout::{MODE_COUNT, RANGE_COUNT};

pub type ExponentTable = [[i8; RANGE_COUNT]; MODE_COUNT];

pub const ROW_VOLTAGE: usize = 0;
pub const ROW_MICROAMP: usize = 1;
pub const ROW_MILLIAMP: usize = 2;
pub const ROW_AMP: usize = 3;
pub const ROW_MANUAL_AMP: usize = 4;
/// 2400 baud meters report RPM in the row other chips use for manual A.
pub const ROW_RPM: usize = 4;
pub const ROW_RESISTANCE: usize = 5;
pub const ROW_FREQUENCY: usize = 6;
pub const ROW_CAPACITANCE: usize = 7;
pub const ROW_DIODE: usize = 8;
/// Placeholder row for duty cycle, whose exponent is fixed.
pub const ROW_DUTY_CYCLE: usize = 0;

#[rustfmt::skip]
pub const EXPONENTS_2400_11B: ExponentTable = [
    [ -4,  -3,  -2, -1,  0,  0,  0,  0], // V
    [ -7,  -6,   0,  0,  0,  0,  0,  0], // uA
    [ -5,  -4,   0,  0,  0,  0,  0,  0], // mA
    [ -2,   0,   0,  0,  0,  0,  0,  0], // A
    [  1,   2,   3,  4,  5,  6,  0,  0], // RPM
    [ -1,   0,   1,  2,  3,  4,  0,  0], // Ohm
    [  0,   1,   2,  3,  4,  5,  0,  0], // Hz
    [-12, -11, -10, -9, -8, -7, -6, -5], // F
    [ -3,   0,   0,  0,  0,  0,  0,  0], // diode
];

#[rustfmt::skip]
pub const EXPONENTS_19200_11B_5DIGITS: ExponentTable = [
    [ -4,  -3,  -2, -1, -5,  0,  0,  0], // V
    [ -8,  -7,   0,  0,  0,  0,  0,  0], // uA
    [ -6,  -5,   0,  0,  0,  0,  0,  0], // mA
    [  0,  -3,   0,  0,  0,  0,  0,  0], // A
    [ -4,  -3,  -2, -1,  0,  0,  0,  0], // manual A
    [ -2,  -1,   0,  1,  2,  3,  4,  0], // Ohm
    [ -1,   0,   0,  1,  2,  3,  4,  0], // Hz
    [-12, -11, -10, -9, -8, -7, -6, -5], // F
    [ -4,   0,   0,  0,  0,  0,  0,  0], // diode
];

#[rustfmt::skip]
pub const EXPONENTS_19200_11B_CLAMPMETER: ExponentTable = [
    [ -3,  -2,  -1,  0, -4,  0,  0,  0], // V
    [ -7,  -6,   0,  0,  0,  0,  0,  0], // uA
    [ -5,  -4,   0,  0,  0,  0,  0,  0], // mA
    [ -2,   0,   0,  0,  0,  0,  0,  0], // A
    [ -3,  -2,  -1,  0,  0,  0,  0,  0], // manual A
    [ -1,   0,   1,  2,  3,  4,  0,  0], // Ohm
    [ -1,   0,   0,  1,  2,  3,  4,  0], // Hz
    [-12, -11, -10, -9, -8, -7, -6, -5], // F
    [ -3,   0,   0,  0,  0,  0,  0,  0], // diode
];

#[rustfmt::skip]
pub const EXPONENTS_19200_11B: ExponentTable = [
    [ -3,  -2,  -1,  0, -4,  0,  0,  0], // V
    [ -7,  -6,   0,  0,  0,  0,  0,  0], // uA
    [ -5,  -4,   0,  0,  0,  0,  0,  0], // mA
    [ -3,  -2,   0,  0,  0,  0,  0,  0], // A
    [  0,   0,   0,  0,  0,  0,  0,  0], // manual A
    [ -1,   0,   1,  2,  3,  4,  0,  0], // Ohm
    [  0,   1,   2,  3,  4,  0,  0,  0], // Hz
    [-12, -11, -10, -9, -8, -7, -6,  0], // F
    [ -3,   0,   0,  0,  0,  0,  0,  0], // diode
];

#[rustfmt::skip]
pub const EXPONENTS_19200_14B: ExponentTable = [
    [ -4,  -3,  -2, -1, -5,  0,  0,  0], // V
    [ -8,  -7,   0,  0,  0,  0,  0,  0], // uA
    [ -6,  -5,   0,  0,  0,  0,  0,  0], // mA
    [ -3,   0,   0,  0,  0,  0,  0,  0], // A
    [ -4,  -3,  -2, -1,  0,  0,  0,  0], // manual A
    [ -2,  -1,   0,  1,  2,  3,  4,  0], // Ohm
    [ -2,  -1,   0,  0,  1,  2,  3,  4], // Hz
    [-12, -11, -10, -9, -8, -7, -6, -5], // F
    [ -4,   0,   0,  0,  0,  0,  0,  0], // diode
];

/// Look up one exponent; out-of-table indices yield `None`.
pub fn lookup(table: &ExponentTable, row: usize, range: usize) -> Option<i32> {
    table
        .get(row)
        .and_then(|columns| columns.get(range))
        .map(|exponent| i32::from(*exponent))
}
