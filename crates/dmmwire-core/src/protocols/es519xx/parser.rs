use super::error::Es519xxError;
use super::exponents;
use super::fixups::apply_fixups;
use super::flags::{Es519xxFlags, decode_flags};
use super::layout;
use super::reader::Es519xxReader;
use crate::measurement::{MeasurementKind, MeasurementRecord, MqFlags, Unit};
use crate::protocols::common::value::{apply_exponent, display_digits, fold_digits};
use crate::protocols::profile::ProtocolProfile;

/// Validate structure and flags without decoding the value.
///
/// Checks the frame length, the repeated copy on 11 byte variants, the CR LF
/// terminator and the consistency of the decoded flags.
pub fn validate_frame(frame: &[u8], profile: &ProtocolProfile) -> Result<(), Es519xxError> {
    decode_frame(&Es519xxReader::new(frame, profile.packet_size), profile).map(|_| ())
}

/// Check the frame length, the repeated copy and the terminator only.
pub fn check_framing(frame: &[u8], profile: &ProtocolProfile) -> Result<(), Es519xxError> {
    check_structure(&Es519xxReader::new(frame, profile.packet_size), profile)
}

/// Decode one ES519XX frame for the given variant profile.
pub fn parse_es519xx(
    frame: &[u8],
    profile: &ProtocolProfile,
) -> Result<MeasurementRecord, Es519xxError> {
    let reader = Es519xxReader::new(frame, profile.packet_size);
    let flags = decode_frame(&reader, profile)?;

    let mantissa = parse_value(&reader, &flags)?;
    let exponent = parse_exponent(&reader, &flags, profile)?;
    let value = apply_exponent(mantissa, exponent);
    let digits = display_digits(exponent, profile);
    tracing::trace!(value, exponent, "es519xx display value");

    flags.trace_indicators(profile.selectable_lpf);
    let (kind, unit, value) = classify(&flags, value);

    Ok(MeasurementRecord {
        kind,
        unit,
        flags: qualifiers(&flags),
        value,
        digits,
    })
}

fn check_structure(
    reader: &Es519xxReader<'_>,
    profile: &ProtocolProfile,
) -> Result<(), Es519xxError> {
    if profile.is_repeated() {
        reader.check_repeated()?;
    } else {
        reader.require_len(profile.frame_len)?;
    }
    reader.check_terminator()
}

fn decode_frame(
    reader: &Es519xxReader<'_>,
    profile: &ProtocolProfile,
) -> Result<Es519xxFlags, Es519xxError> {
    check_structure(reader, profile)?;
    let mut flags = decode_flags(reader, profile)?;
    apply_fixups(&mut flags, profile);
    flags.validate()?;
    Ok(flags)
}

/// Signed display integer; over and underflow read as positive infinity.
fn parse_value(reader: &Es519xxReader<'_>, flags: &Es519xxFlags) -> Result<f64, Es519xxError> {
    if flags.overflow || flags.underflow {
        tracing::trace!(
            overflow = flags.overflow,
            underflow = flags.underflow,
            "display out of range"
        );
        return Ok(f64::INFINITY);
    }
    let magnitude = fold_digits(u64::from(flags.digit4), reader.digits()?);
    // A signed zero display reads as 0.0, not -0.0.
    let value = magnitude as f64;
    Ok(if flags.sign && magnitude != 0 { -value } else { value })
}

fn parse_exponent(
    reader: &Es519xxReader<'_>,
    flags: &Es519xxFlags,
    profile: &ProtocolProfile,
) -> Result<i32, Es519xxError> {
    let index = reader.range_index()?;
    let unsupported = Es519xxError::UnsupportedMode {
        function: reader.function()?,
    };
    let Some(row) = flags.exponent_row() else {
        tracing::debug!(range = index, "no exponent row for active mode");
        return Err(unsupported);
    };

    if flags.vbar {
        let table = if flags.micro {
            &layout::VBAR_MICRO_EXPONENTS
        } else if flags.milli {
            &layout::VBAR_MILLI_EXPONENTS
        } else {
            return Ok(0);
        };
        return match table.get(index) {
            Some(exponent) => Ok(*exponent),
            None => Err(Es519xxError::InvalidRange {
                value: reader.read_u8(layout::RANGE_OFFSET)?,
            }),
        };
    }
    if flags.duty_cycle {
        return Ok(layout::DUTY_CYCLE_EXPONENT);
    }
    match profile
        .exponents
        .and_then(|table| exponents::lookup(table, row, index))
    {
        Some(exponent) => Ok(exponent),
        None => Err(unsupported),
    }
}

fn classify(flags: &Es519xxFlags, value: f64) -> (MeasurementKind, Unit, f64) {
    if flags.duty_cycle {
        (MeasurementKind::DutyCycle, Unit::Percentage, value)
    } else if flags.rpm {
        (MeasurementKind::Rpm, Unit::RevolutionsPerMinute, value)
    } else if flags.diode {
        (MeasurementKind::Diode, Unit::Volt, value)
    } else if flags.continuity {
        let closed = (0.0..=layout::CONTINUITY_THRESHOLD).contains(&value);
        (
            MeasurementKind::Continuity,
            Unit::Boolean,
            if closed { 1.0 } else { 0.0 },
        )
    } else if flags.temperature && flags.fahrenheit {
        (MeasurementKind::Temperature, Unit::Fahrenheit, value)
    } else if flags.temperature && flags.celsius {
        (MeasurementKind::Temperature, Unit::Celsius, value)
    } else if flags.capacitance {
        (MeasurementKind::Capacitance, Unit::Farad, value)
    } else if flags.frequency {
        (MeasurementKind::Frequency, Unit::Hertz, value)
    } else if flags.resistance {
        (MeasurementKind::Resistance, Unit::Ohm, value)
    } else if flags.current {
        (MeasurementKind::Current, Unit::Ampere, value)
    } else if flags.voltage {
        (MeasurementKind::Voltage, Unit::Volt, value)
    } else {
        (MeasurementKind::Gain, Unit::Unitless, value)
    }
}

fn qualifiers(flags: &Es519xxFlags) -> MqFlags {
    let mut qualifiers = MqFlags::empty();
    qualifiers.set_if(MqFlags::AC, flags.ac);
    qualifiers.set_if(MqFlags::DC, flags.dc);
    qualifiers.set_if(MqFlags::AUTORANGE, flags.auto);
    if flags.diode {
        qualifiers.remove(MqFlags::AC);
        qualifiers.insert(MqFlags::DIODE | MqFlags::DC);
    }
    qualifiers.set_if(MqFlags::HOLD, flags.hold);
    qualifiers.set_if(MqFlags::MAX, flags.max);
    qualifiers.set_if(MqFlags::MIN, flags.min);
    qualifiers.set_if(MqFlags::RELATIVE, flags.relative);
    qualifiers
}
