//! Status, option and function byte decoding.

use super::error::Es519xxError;
use super::exponents;
use super::layout;
use super::reader::Es519xxReader;
use crate::protocols::common::reader::count_set;
use crate::protocols::profile::ProtocolProfile;

/// Everything one packet says about the meter state, before classification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Es519xxFlags {
    // Status byte.
    pub judge: bool,
    pub sign: bool,
    pub battery_low: bool,
    pub overflow: bool,
    // Option bytes.
    pub underflow: bool,
    pub peak_max: bool,
    pub peak_min: bool,
    pub max: bool,
    pub min: bool,
    pub relative: bool,
    pub rmr: bool,
    pub dc: bool,
    pub ac: bool,
    pub auto: bool,
    pub vahz: bool,
    pub vasel: bool,
    pub vbar: bool,
    pub hold: bool,
    pub lpf0: bool,
    pub lpf1: bool,
    pub auto_power_off: bool,
    pub digit4: bool,
    // Function byte.
    pub micro: bool,
    pub milli: bool,
    pub voltage: bool,
    pub current: bool,
    pub resistance: bool,
    pub continuity: bool,
    pub diode: bool,
    pub frequency: bool,
    pub rpm: bool,
    pub duty_cycle: bool,
    pub capacitance: bool,
    pub temperature: bool,
    pub celsius: bool,
    pub fahrenheit: bool,
    pub adapter: Option<u8>,
}

/// Meaning of a function byte value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Function {
    Voltage,
    Amp,
    MicroAmp,
    MilliAmp,
    ManualAmp,
    Resistance,
    Continuity,
    Diode,
    Frequency,
    /// Frequency, RPM or duty cycle, chosen by the judge bit.
    FrequencyByJudge,
    Capacitance,
    /// Celsius with the judge bit, Fahrenheit without.
    Temperature,
    /// External adapter input 0..=3.
    Adapter(u8),
}

const STANDARD_FUNCTIONS: [(u8, Function); 15] = [
    (0x3b, Function::Voltage),
    (0x3d, Function::MicroAmp),
    (0x3f, Function::MilliAmp),
    (0x30, Function::Amp),
    (0x39, Function::ManualAmp),
    (0x33, Function::Resistance),
    (0x35, Function::Continuity),
    (0x31, Function::Diode),
    (0x32, Function::FrequencyByJudge),
    (0x36, Function::Capacitance),
    (0x34, Function::Temperature),
    (0x3e, Function::Adapter(0)),
    (0x3c, Function::Adapter(1)),
    (0x38, Function::Adapter(2)),
    (0x3a, Function::Adapter(3)),
];

const ALT_FUNCTIONS: [(u8, Function); 16] = [
    (0x3f, Function::Amp),
    (0x3e, Function::MicroAmp),
    (0x3d, Function::MilliAmp),
    (0x3c, Function::Voltage),
    (0x37, Function::Resistance),
    (0x36, Function::Continuity),
    (0x3b, Function::Diode),
    (0x3a, Function::Frequency),
    (0x34, Function::Adapter(0)),
    (0x35, Function::Adapter(0)),
    (0x38, Function::Adapter(1)),
    (0x39, Function::Adapter(1)),
    (0x32, Function::Adapter(2)),
    (0x33, Function::Adapter(2)),
    (0x30, Function::Adapter(3)),
    (0x31, Function::Adapter(3)),
];

/// Look up a function byte in the table matching the profile's byte ordering.
pub fn lookup_function(value: u8, alt_functions: bool) -> Option<Function> {
    let table: &[(u8, Function)] = if alt_functions {
        &ALT_FUNCTIONS
    } else {
        &STANDARD_FUNCTIONS
    };
    table
        .iter()
        .find(|(code, _)| *code == value)
        .map(|(_, function)| *function)
}

/// Decode status, option and function bytes. Fixups are applied separately.
pub fn decode_flags(
    reader: &Es519xxReader<'_>,
    profile: &ProtocolProfile,
) -> Result<Es519xxFlags, Es519xxError> {
    let mut flags = Es519xxFlags::default();
    decode_status(reader, profile, &mut flags)?;
    if profile.packet_size == layout::PACKET_SIZE_14B {
        decode_options_14b(reader, profile, &mut flags)?;
    } else if profile.alt_functions {
        decode_options_alt(reader, &mut flags)?;
    } else {
        decode_options_11b(reader, profile, &mut flags)?;
    }

    let function = reader.function()?;
    match lookup_function(function, profile.alt_functions) {
        Some(decoded) => flags.apply_function(decoded, profile.packet_size),
        None => tracing::debug!(
            function = format_args!("{function:#04x}"),
            "invalid function byte"
        ),
    }
    Ok(flags)
}

fn decode_status(
    reader: &Es519xxReader<'_>,
    profile: &ProtocolProfile,
    flags: &mut Es519xxFlags,
) -> Result<(), Es519xxError> {
    let status = reader.status()?;
    let has = |mask: u8| status & mask != 0;
    if profile.alt_functions {
        flags.sign = has(layout::ALT_STATUS_SIGN);
        flags.battery_low = has(layout::ALT_STATUS_BATTERY);
        flags.overflow = has(layout::ALT_STATUS_OVERFLOW);
    } else {
        flags.judge = has(layout::STATUS_JUDGE);
        flags.sign = has(layout::STATUS_SIGN);
        flags.battery_low = has(layout::STATUS_BATTERY);
        flags.overflow = has(layout::STATUS_OVERFLOW);
    }
    Ok(())
}

fn decode_options_14b(
    reader: &Es519xxReader<'_>,
    profile: &ProtocolProfile,
    flags: &mut Es519xxFlags,
) -> Result<(), Es519xxError> {
    let opt1 = reader.read_u8(layout::OPTION1_14B)?;
    flags.max = opt1 & layout::OPT1_14B_MAX != 0;
    flags.min = opt1 & layout::OPT1_14B_MIN != 0;
    flags.relative = opt1 & layout::OPT1_14B_REL != 0;
    flags.rmr = opt1 & layout::OPT1_14B_RMR != 0;

    let opt2 = reader.read_u8(layout::OPTION2_14B)?;
    flags.underflow = opt2 & layout::OPT2_14B_UL != 0;
    flags.peak_max = opt2 & layout::OPT2_14B_PMAX != 0;
    flags.peak_min = opt2 & layout::OPT2_14B_PMIN != 0;

    let opt3 = reader.read_u8(layout::OPTION3_14B)?;
    flags.dc = opt3 & layout::OPT3_14B_DC != 0;
    flags.ac = opt3 & layout::OPT3_14B_AC != 0;
    flags.auto = opt3 & layout::OPT3_14B_AUTO != 0;
    flags.vahz = opt3 & layout::OPT3_14B_VAHZ != 0;

    let opt4 = reader.read_u8(layout::OPTION4_14B)?;
    if profile.selectable_lpf {
        flags.hold = opt4 & layout::OPT4_LPF_HOLD != 0;
        flags.vbar = opt4 & layout::OPT4_LPF_VBAR != 0;
        flags.lpf1 = opt4 & layout::OPT4_LPF_LPF1 != 0;
        flags.lpf0 = opt4 & layout::OPT4_LPF_LPF0 != 0;
    } else {
        flags.vbar = opt4 & layout::OPT4_VBAR != 0;
        flags.hold = opt4 & layout::OPT4_HOLD != 0;
        flags.lpf1 = opt4 & layout::OPT4_LPF1 != 0;
    }
    Ok(())
}

fn decode_options_alt(
    reader: &Es519xxReader<'_>,
    flags: &mut Es519xxFlags,
) -> Result<(), Es519xxError> {
    let opt2 = reader.read_u8(layout::OPTION2_11B)?;
    flags.dc = opt2 & layout::ALT_OPT2_DC != 0;
    flags.auto = opt2 & layout::ALT_OPT2_AUTO != 0;
    flags.auto_power_off = opt2 & layout::ALT_OPT2_APO != 0;
    // No AC bit in this layout: anything not DC is AC.
    flags.ac = !flags.dc;
    Ok(())
}

fn decode_options_11b(
    reader: &Es519xxReader<'_>,
    profile: &ProtocolProfile,
    flags: &mut Es519xxFlags,
) -> Result<(), Es519xxError> {
    let slow = profile.baud_rate == 2400;
    let opt1 = reader.read_u8(layout::OPTION1_11B)?;
    if slow {
        flags.peak_max = opt1 & layout::OPT1_2400_PMAX != 0;
        flags.peak_min = opt1 & layout::OPT1_2400_PMIN != 0;
        flags.vahz = opt1 & layout::OPT1_2400_VAHZ != 0;
    } else if profile.five_digits {
        flags.underflow = opt1 & layout::OPT1_5DIGITS_UL != 0;
        flags.peak_max = opt1 & layout::OPT1_5DIGITS_PMAX != 0;
        flags.peak_min = opt1 & layout::OPT1_5DIGITS_PMIN != 0;
        flags.digit4 = opt1 & layout::OPT1_5DIGITS_DIGIT4 != 0;
    } else if profile.clamp_meter {
        flags.underflow = opt1 & layout::OPT1_CLAMP_UL != 0;
        flags.vasel = opt1 & layout::OPT1_CLAMP_VASEL != 0;
        flags.vbar = opt1 & layout::OPT1_CLAMP_VBAR != 0;
    } else {
        flags.hold = opt1 & layout::OPT1_HOLD != 0;
        flags.max = opt1 & layout::OPT1_MAX != 0;
        flags.min = opt1 & layout::OPT1_MIN != 0;
    }

    let opt2 = reader.read_u8(layout::OPTION2_11B)?;
    flags.dc = opt2 & layout::OPT2_DC != 0;
    flags.ac = opt2 & layout::OPT2_AC != 0;
    flags.auto = opt2 & layout::OPT2_AUTO != 0;
    if slow {
        flags.auto_power_off = opt2 & layout::OPT2_BIT0 != 0;
    } else {
        flags.vahz = opt2 & layout::OPT2_BIT0 != 0;
    }
    Ok(())
}

impl Es519xxFlags {
    pub fn apply_function(&mut self, function: Function, packet_size: usize) {
        match function {
            Function::Voltage => self.voltage = true,
            Function::Amp => {
                self.current = true;
                self.auto = true;
            }
            Function::MicroAmp => {
                self.current = true;
                self.micro = true;
                self.auto = true;
            }
            Function::MilliAmp => {
                self.current = true;
                self.milli = true;
                self.auto = true;
            }
            Function::ManualAmp => {
                self.current = true;
                self.auto = false;
            }
            Function::Resistance => self.resistance = true,
            Function::Continuity => self.continuity = true,
            Function::Diode => self.diode = true,
            Function::Frequency => self.frequency = true,
            Function::FrequencyByJudge => self.select_frequency_mode(packet_size),
            Function::Capacitance => self.capacitance = true,
            Function::Temperature => {
                self.temperature = true;
                self.celsius = self.judge;
                self.fahrenheit = !self.judge;
            }
            Function::Adapter(index) => self.adapter = Some(index),
        }
    }

    /// The judge bit turns frequency into duty cycle (14 byte) or RPM (11 byte).
    pub fn select_frequency_mode(&mut self, packet_size: usize) {
        match (self.judge, packet_size == layout::PACKET_SIZE_14B) {
            (false, _) => self.frequency = true,
            (true, true) => self.duty_cycle = true,
            (true, false) => self.rpm = true,
        }
    }

    pub fn kind_count(&self) -> usize {
        count_set(&[
            self.voltage,
            self.current,
            self.resistance,
            self.frequency,
            self.capacitance,
            self.temperature,
            self.continuity,
            self.diode,
            self.rpm,
            self.duty_cycle,
        ])
    }

    /// Reject packets whose flags contradict each other.
    pub fn validate(&self) -> Result<(), Es519xxError> {
        if self.micro && self.milli {
            return Err(Es519xxError::MultipleMultipliers);
        }
        let count = self.kind_count();
        if count > 1 {
            return Err(Es519xxError::MultipleModes { count });
        }
        if self.ac && self.dc {
            return Err(Es519xxError::AcAndDc);
        }
        Ok(())
    }

    /// Row of the exponent table for the active mode.
    pub fn exponent_row(&self) -> Option<usize> {
        let row = if self.voltage {
            exponents::ROW_VOLTAGE
        } else if self.current && self.micro {
            exponents::ROW_MICROAMP
        } else if self.current && self.milli {
            exponents::ROW_MILLIAMP
        } else if self.current && self.auto {
            exponents::ROW_AMP
        } else if self.current {
            exponents::ROW_MANUAL_AMP
        } else if self.rpm {
            exponents::ROW_RPM
        } else if self.resistance || self.continuity {
            exponents::ROW_RESISTANCE
        } else if self.frequency {
            exponents::ROW_FREQUENCY
        } else if self.capacitance {
            exponents::ROW_CAPACITANCE
        } else if self.diode {
            exponents::ROW_DIODE
        } else if self.duty_cycle {
            exponents::ROW_DUTY_CYCLE
        } else {
            return None;
        };
        Some(row)
    }

    /// Indicators that do not change the record, logged for diagnostics.
    pub fn trace_indicators(&self, selectable_lpf: bool) {
        let lpf_active = if selectable_lpf {
            !self.lpf0 || !self.lpf1
        } else {
            self.lpf1
        };
        tracing::trace!(
            judge = self.judge,
            battery_low = self.battery_low,
            overflow = self.overflow,
            underflow = self.underflow,
            peak_max = self.peak_max,
            peak_min = self.peak_min,
            vahz = self.vahz,
            auto_power_off = self.auto_power_off,
            vbar = self.vbar,
            lpf_active,
            "es519xx indicators"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::{Es519xxFlags, Function, decode_flags, lookup_function};
    use crate::protocols::ProtocolVariant;
    use crate::protocols::es519xx::error::Es519xxError;
    use crate::protocols::es519xx::exponents;
    use crate::protocols::es519xx::reader::Es519xxReader;

    fn decode(variant: ProtocolVariant, packet: &[u8]) -> Es519xxFlags {
        let profile = variant.profile();
        let reader = Es519xxReader::new(packet, profile.packet_size);
        decode_flags(&reader, profile).unwrap()
    }

    #[test]
    fn function_tables_depend_on_ordering() {
        assert_eq!(lookup_function(0x3f, false), Some(Function::MilliAmp));
        assert_eq!(lookup_function(0x3f, true), Some(Function::Amp));
        assert_eq!(lookup_function(0x3b, false), Some(Function::Voltage));
        assert_eq!(lookup_function(0x3b, true), Some(Function::Diode));
        assert_eq!(lookup_function(0x31, true), Some(Function::Adapter(3)));
        assert_eq!(lookup_function(0x37, false), None);
        assert_eq!(lookup_function(0x00, true), None);
    }

    #[test]
    fn decode_14b_option_bytes() {
        let flags = decode(ProtocolVariant::Es519xx19200Baud14Byte, b"1123453\x06\x0c\x0e\x0b\x06\r\n");
        assert!(flags.max && flags.min && !flags.relative && !flags.rmr);
        assert!(flags.underflow && flags.peak_max && flags.peak_min);
        assert!(flags.dc && !flags.ac && flags.auto && flags.vahz);
        assert!(flags.vbar && flags.hold && !flags.lpf1);
        assert!(flags.sign && flags.battery_low && !flags.judge && !flags.overflow);
    }

    #[test]
    fn first_option_byte_depends_on_baud_rate() {
        let packet = b"01234;0=8\r\n";
        let fast = decode(ProtocolVariant::Es519xx19200Baud11Byte, packet);
        assert!(fast.hold && fast.max && !fast.min);
        assert!(!fast.peak_max && !fast.vahz);

        let slow = decode(ProtocolVariant::Es519xx2400Baud11Byte, packet);
        assert!(slow.peak_max && slow.peak_min && slow.vahz);
        assert!(!slow.hold && !slow.max && !slow.min);
    }

    #[test]
    fn selectable_lpf_moves_hold_bit() {
        let packet = b"112345;0000\x0b\r\n";
        let fixed = decode(ProtocolVariant::Es519xx19200Baud14Byte, packet);
        assert!(fixed.hold && fixed.lpf1 && !fixed.vbar);
        let selectable = decode(ProtocolVariant::Es519xx19200Baud14ByteSelectableLpf, packet);
        assert!(selectable.hold && selectable.lpf1 && selectable.lpf0 && !selectable.vbar);
    }

    #[test]
    fn alternate_layout_derives_ac_from_dc() {
        let flags = decode(ProtocolVariant::Es519xx2400Baud11ByteAltFunctions, b"01234<\x0b\x00\x04\r\n");
        assert!(flags.voltage);
        assert!(flags.ac && !flags.dc && flags.auto);
        assert!(flags.sign && flags.overflow && !flags.battery_low);
    }

    #[test]
    fn temperature_unit_follows_judge() {
        let celsius = decode(ProtocolVariant::Es519xx19200Baud11Byte, b"00250\x34\x08\x00\x00\r\n");
        assert!(celsius.temperature && celsius.celsius && !celsius.fahrenheit);
        let fahrenheit = decode(ProtocolVariant::Es519xx19200Baud11Byte, b"00250\x34\x00\x00\x00\r\n");
        assert!(fahrenheit.fahrenheit && !fahrenheit.celsius);
    }

    #[test]
    fn judge_selects_rpm_or_duty_cycle() {
        let mut flags = Es519xxFlags { judge: true, ..Es519xxFlags::default() };
        flags.select_frequency_mode(11);
        assert!(flags.rpm && !flags.frequency);

        let mut flags = Es519xxFlags { judge: true, ..Es519xxFlags::default() };
        flags.select_frequency_mode(14);
        assert!(flags.duty_cycle);

        let mut flags = Es519xxFlags::default();
        flags.select_frequency_mode(14);
        assert!(flags.frequency);
    }

    #[test]
    fn validate_rejects_conflicts() {
        let both_multipliers = Es519xxFlags {
            current: true,
            micro: true,
            milli: true,
            ..Es519xxFlags::default()
        };
        assert_eq!(both_multipliers.validate(), Err(Es519xxError::MultipleMultipliers));

        let two_kinds = Es519xxFlags {
            voltage: true,
            resistance: true,
            ..Es519xxFlags::default()
        };
        assert_eq!(two_kinds.validate(), Err(Es519xxError::MultipleModes { count: 2 }));

        let ac_dc = Es519xxFlags {
            voltage: true,
            ac: true,
            dc: true,
            ..Es519xxFlags::default()
        };
        assert_eq!(ac_dc.validate(), Err(Es519xxError::AcAndDc));

        let ok = Es519xxFlags {
            voltage: true,
            dc: true,
            ..Es519xxFlags::default()
        };
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn exponent_rows_follow_mode_priority() {
        let manual = Es519xxFlags { current: true, ..Es519xxFlags::default() };
        assert_eq!(manual.exponent_row(), Some(exponents::ROW_MANUAL_AMP));
        let auto = Es519xxFlags { current: true, auto: true, ..Es519xxFlags::default() };
        assert_eq!(auto.exponent_row(), Some(exponents::ROW_AMP));
        let continuity = Es519xxFlags { continuity: true, ..Es519xxFlags::default() };
        assert_eq!(continuity.exponent_row(), Some(exponents::ROW_RESISTANCE));
        let temperature = Es519xxFlags { temperature: true, ..Es519xxFlags::default() };
        assert_eq!(temperature.exponent_row(), None);
        let adapter = Es519xxFlags { adapter: Some(2), ..Es519xxFlags::default() };
        assert_eq!(adapter.exponent_row(), None);
    }
}
