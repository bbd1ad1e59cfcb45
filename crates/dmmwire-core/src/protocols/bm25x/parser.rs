use super::error::Bm25xError;
use super::layout;
use super::reader::{Bm25xReader, DecimalPoint, Glyph};
use crate::measurement::{MeasurementKind, MeasurementRecord, MqFlags, Unit};
use crate::protocols::common::reader::count_set;
use crate::protocols::common::value::{apply_exponent, display_digits, fold_digits};
use crate::protocols::profile;

/// Displayed magnitude before prefix scaling and sign.
#[derive(Debug, Clone, Copy, PartialEq)]
struct DisplayValue {
    magnitude: f64,
    exponent: i32,
}

/// Check framing only: length, sync byte and nibble counters.
pub fn validate_frame(packet: &[u8]) -> Result<(), Bm25xError> {
    Bm25xReader::new(packet).check_framing()
}

/// Decode one 15 byte BM25x packet.
pub fn parse_bm25x(packet: &[u8]) -> Result<MeasurementRecord, Bm25xError> {
    let reader = Bm25xReader::new(packet);
    reader.check_framing()?;

    let modes = [
        reader.is_set(layout::VOLTAGE),
        reader.is_set(layout::CURRENT),
        reader.is_set(layout::RESISTANCE),
        reader.is_set(layout::CAPACITANCE),
        reader.is_set(layout::FREQUENCY),
    ];
    let mode_count = count_set(&modes);
    if mode_count > 1 {
        return Err(Bm25xError::MultipleModes { count: mode_count });
    }
    let prefix_count = reader.prefix_count();
    if prefix_count > 1 {
        return Err(Bm25xError::MultiplePrefixes {
            count: prefix_count,
        });
    }
    if reader.is_set(layout::AC) && reader.is_set(layout::DC) {
        return Err(Bm25xError::AcAndDc);
    }

    let mut flags = MqFlags::empty();
    flags.set_if(MqFlags::AUTORANGE, reader.is_set(layout::AUTORANGE));
    flags.set_if(MqFlags::DC, reader.is_set(layout::DC));
    flags.set_if(MqFlags::AC, reader.is_set(layout::AC));
    flags.set_if(MqFlags::RELATIVE, reader.is_set(layout::RELATIVE));
    flags.set_if(MqFlags::HOLD, reader.is_set(layout::HOLD));
    flags.set_if(MqFlags::MAX, reader.is_set(layout::MAX));
    flags.set_if(MqFlags::MIN, reader.is_set(layout::MIN));

    let (kind, unit) = classify(&reader, &mut flags);

    let display = decode_value(&reader);
    let exponent = display.exponent + reader.prefix_exponent();
    let mut value = apply_exponent(display.magnitude, exponent);
    if reader.is_negative() {
        value = -value;
    }

    Ok(MeasurementRecord {
        kind,
        unit,
        flags,
        value,
        digits: display_digits(exponent, &profile::BM25X),
    })
}

fn classify(reader: &Bm25xReader<'_>, flags: &mut MqFlags) -> (MeasurementKind, Unit) {
    match reader.glyph(layout::DIGIT_COUNT - 1) {
        Some(Glyph::C) => return (MeasurementKind::Temperature, Unit::Celsius),
        Some(Glyph::F) => return (MeasurementKind::Temperature, Unit::Fahrenheit),
        _ => {}
    }

    if reader.is_set(layout::VOLTAGE) {
        if !flags.contains(MqFlags::AC) && !flags.contains(MqFlags::DC) {
            flags.insert(MqFlags::DIODE | MqFlags::DC);
            return (MeasurementKind::Diode, Unit::Volt);
        }
        return (MeasurementKind::Voltage, Unit::Volt);
    }
    if reader.is_set(layout::CURRENT) {
        return (MeasurementKind::Current, Unit::Ampere);
    }
    if reader.is_set(layout::RESISTANCE) {
        return (MeasurementKind::Resistance, Unit::Ohm);
    }
    if reader.is_set(layout::CAPACITANCE) {
        return (MeasurementKind::Capacitance, Unit::Farad);
    }
    if reader.is_set(layout::FREQUENCY) {
        return (MeasurementKind::Frequency, Unit::Hertz);
    }
    (MeasurementKind::Gain, Unit::Unitless)
}

fn decode_value(reader: &Bm25xReader<'_>) -> DisplayValue {
    let mut digits = [0u8; layout::DIGIT_COUNT];
    let mut count = 0;
    for index in 0..layout::DIGIT_COUNT {
        match reader.glyph(index) {
            Some(Glyph::C | Glyph::F) if index == layout::DIGIT_COUNT - 1 => break,
            Some(Glyph::Digit(digit)) => {
                digits[count] = digit;
                count += 1;
            }
            _ => return special_value(reader),
        }
    }

    DisplayValue {
        magnitude: fold_digits(0, digits[..count].iter().copied()) as f64,
        exponent: decode_scale(reader.decimal_point(), count),
    }
}

/// `0L` in the middle digits is an open circuit; anything else is unreadable.
fn special_value(reader: &Bm25xReader<'_>) -> DisplayValue {
    let open = reader.glyph(1) == Some(Glyph::Digit(0)) && reader.glyph(2) == Some(Glyph::L);
    DisplayValue {
        magnitude: if open { f64::INFINITY } else { f64::NAN },
        exponent: 0,
    }
}

fn decode_scale(point: DecimalPoint, digit_count: usize) -> i32 {
    let index = match point {
        DecimalPoint::At(index) => index,
        DecimalPoint::None | DecimalPoint::Multiple => return 0,
    };
    let position = (index + digit_count) as i32 - layout::DIGIT_COUNT as i32;
    if !(0..=3).contains(&position) {
        tracing::debug!(point = index, digits = digit_count, "invalid decimal point");
        return 0;
    }
    -position
}
