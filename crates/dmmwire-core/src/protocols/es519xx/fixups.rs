//! Device quirks applied after the primary flag decode.
//!
//! Each entry pairs a condition with the transformation it triggers, in the
//! order the meters need them applied.

use super::flags::Es519xxFlags;
use crate::protocols::profile::ProtocolProfile;

pub struct Fixup {
    pub name: &'static str,
    pub applies: fn(&Es519xxFlags, &ProtocolProfile) -> bool,
    pub apply: fn(&mut Es519xxFlags, &ProtocolProfile),
}

pub const FIXUPS: [Fixup; 3] = [
    Fixup {
        name: "vahz-frequency",
        applies: vahz_applies,
        apply: vahz_apply,
    },
    Fixup {
        name: "vasel-voltage",
        applies: vasel_applies,
        apply: vasel_apply,
    },
    Fixup {
        name: "2400-baud-current",
        applies: slow_current_applies,
        apply: slow_current_apply,
    },
];

pub fn apply_fixups(flags: &mut Es519xxFlags, profile: &ProtocolProfile) {
    for fixup in &FIXUPS {
        if (fixup.applies)(flags, profile) {
            tracing::trace!(fixup = fixup.name, "applying fixup");
            (fixup.apply)(flags, profile);
        }
    }
}

/// VAHZ: the V/A selector shows the frequency of the signal.
fn vahz_applies(flags: &Es519xxFlags, _profile: &ProtocolProfile) -> bool {
    flags.vahz && (flags.voltage || flags.current)
}

fn vahz_apply(flags: &mut Es519xxFlags, profile: &ProtocolProfile) {
    flags.voltage = false;
    flags.current = false;
    flags.milli = false;
    flags.micro = false;
    flags.select_frequency_mode(profile.packet_size);
}

/// Clamp meters report the voltage range on the current function codes.
fn vasel_applies(flags: &Es519xxFlags, _profile: &ProtocolProfile) -> bool {
    flags.current && (flags.micro || flags.milli) && flags.vasel
}

fn vasel_apply(flags: &mut Es519xxFlags, _profile: &ProtocolProfile) {
    flags.current = false;
    flags.auto = false;
    flags.voltage = true;
}

/// 2400 baud chips swap mA and A and have no manual A range.
fn slow_current_applies(flags: &Es519xxFlags, profile: &ProtocolProfile) -> bool {
    profile.baud_rate == 2400 && flags.current && (flags.milli || !flags.auto)
}

fn slow_current_apply(flags: &mut Es519xxFlags, _profile: &ProtocolProfile) {
    flags.milli = !flags.milli;
    flags.auto = true;
}

#[cfg(test)]
mod tests {
    use super::apply_fixups;
    use crate::protocols::ProtocolVariant;
    use crate::protocols::es519xx::flags::Es519xxFlags;

    #[test]
    fn vahz_turns_voltage_into_frequency() {
        let profile = ProtocolVariant::Es519xx19200Baud11Byte.profile();
        let mut flags = Es519xxFlags {
            vahz: true,
            voltage: true,
            ..Es519xxFlags::default()
        };
        apply_fixups(&mut flags, profile);
        assert!(flags.frequency && !flags.voltage);
    }

    #[test]
    fn vahz_with_judge_on_14b_is_duty_cycle() {
        let profile = ProtocolVariant::Es519xx19200Baud14Byte.profile();
        let mut flags = Es519xxFlags {
            vahz: true,
            judge: true,
            current: true,
            milli: true,
            ..Es519xxFlags::default()
        };
        apply_fixups(&mut flags, profile);
        assert!(flags.duty_cycle && !flags.current && !flags.milli);
    }

    #[test]
    fn vasel_turns_current_into_voltage() {
        let profile = ProtocolVariant::Es519xx19200Baud11ByteClampMeter.profile();
        let mut flags = Es519xxFlags {
            vasel: true,
            current: true,
            micro: true,
            auto: true,
            ..Es519xxFlags::default()
        };
        apply_fixups(&mut flags, profile);
        assert!(flags.voltage && !flags.current && !flags.auto);
    }

    #[test]
    fn slow_meters_swap_milliamp_and_amp() {
        let profile = ProtocolVariant::Es519xx2400Baud11Byte.profile();
        let mut milli = Es519xxFlags {
            current: true,
            milli: true,
            auto: true,
            ..Es519xxFlags::default()
        };
        apply_fixups(&mut milli, profile);
        assert!(!milli.milli && milli.auto);

        let mut manual = Es519xxFlags {
            current: true,
            ..Es519xxFlags::default()
        };
        apply_fixups(&mut manual, profile);
        assert!(manual.milli && manual.auto);
    }

    #[test]
    fn fast_meters_keep_current_flags() {
        let profile = ProtocolVariant::Es519xx19200Baud11Byte.profile();
        let mut flags = Es519xxFlags {
            current: true,
            milli: true,
            auto: true,
            ..Es519xxFlags::default()
        };
        let before = flags;
        apply_fixups(&mut flags, profile);
        assert_eq!(flags, before);
    }
}
