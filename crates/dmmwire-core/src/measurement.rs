//! Typed measurement records produced by the protocol decoders.
//!
//! A record carries exactly one measurement kind, its unit, the qualifier
//! flags shown on the meter display, the decoded value and its display
//! precision. Records are plain data: they own no buffers and are cheap to
//! copy.

use std::fmt;
use std::ops::{BitOr, BitOrAssign};

use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

/// Physical quantity measured by the instrument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeasurementKind {
    Voltage,
    Current,
    Resistance,
    Capacitance,
    Frequency,
    Temperature,
    Continuity,
    DutyCycle,
    Rpm,
    /// Reported when no mode annunciator is lit (unitless reading).
    Gain,
    Diode,
}

/// Unit attached to a measurement value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Unit {
    Volt,
    Ampere,
    Ohm,
    Farad,
    Hertz,
    Celsius,
    Fahrenheit,
    Boolean,
    Percentage,
    RevolutionsPerMinute,
    Unitless,
}

impl Unit {
    pub fn symbol(&self) -> &'static str {
        match self {
            Unit::Volt => "V",
            Unit::Ampere => "A",
            Unit::Ohm => "Ω",
            Unit::Farad => "F",
            Unit::Hertz => "Hz",
            Unit::Celsius => "°C",
            Unit::Fahrenheit => "°F",
            Unit::Boolean => "",
            Unit::Percentage => "%",
            Unit::RevolutionsPerMinute => "RPM",
            Unit::Unitless => "",
        }
    }
}

/// Qualifier flags (AC, DC, auto-range, hold, ...) as a typed bitset.
///
/// Serialized as a list of lower-case flag names in bit order.
///
/// # Examples
/// ```
/// use dmmwire_core::MqFlags;
///
/// let flags = MqFlags::DC | MqFlags::AUTORANGE;
/// assert!(flags.contains(MqFlags::DC));
/// assert!(!flags.contains(MqFlags::AC));
/// assert_eq!(flags.names().collect::<Vec<_>>(), vec!["dc", "autorange"]);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct MqFlags(u16);

const FLAG_NAMES: [(MqFlags, &str); 8] = [
    (MqFlags::AC, "ac"),
    (MqFlags::DC, "dc"),
    (MqFlags::AUTORANGE, "autorange"),
    (MqFlags::HOLD, "hold"),
    (MqFlags::MAX, "max"),
    (MqFlags::MIN, "min"),
    (MqFlags::RELATIVE, "relative"),
    (MqFlags::DIODE, "diode"),
];

impl MqFlags {
    pub const AC: MqFlags = MqFlags(1 << 0);
    pub const DC: MqFlags = MqFlags(1 << 1);
    pub const AUTORANGE: MqFlags = MqFlags(1 << 2);
    pub const HOLD: MqFlags = MqFlags(1 << 3);
    pub const MAX: MqFlags = MqFlags(1 << 4);
    pub const MIN: MqFlags = MqFlags(1 << 5);
    pub const RELATIVE: MqFlags = MqFlags(1 << 6);
    pub const DIODE: MqFlags = MqFlags(1 << 7);

    pub const fn empty() -> Self {
        MqFlags(0)
    }

    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub const fn contains(&self, other: MqFlags) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn insert(&mut self, other: MqFlags) {
        self.0 |= other.0;
    }

    pub fn remove(&mut self, other: MqFlags) {
        self.0 &= !other.0;
    }

    /// Insert `other` when `condition` holds.
    pub fn set_if(&mut self, other: MqFlags, condition: bool) {
        if condition {
            self.insert(other);
        }
    }

    /// Names of the set flags, in bit order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        FLAG_NAMES
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, name)| *name)
    }

    pub fn from_name(name: &str) -> Option<MqFlags> {
        FLAG_NAMES
            .iter()
            .find(|(_, candidate)| *candidate == name)
            .map(|(flag, _)| *flag)
    }
}

impl BitOr for MqFlags {
    type Output = MqFlags;

    fn bitor(self, rhs: MqFlags) -> MqFlags {
        MqFlags(self.0 | rhs.0)
    }
}

impl BitOrAssign for MqFlags {
    fn bitor_assign(&mut self, rhs: MqFlags) {
        self.0 |= rhs.0;
    }
}

impl fmt::Debug for MqFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

impl Serialize for MqFlags {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.names())
    }
}

impl<'de> Deserialize<'de> for MqFlags {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let names = Vec::<String>::deserialize(deserializer)?;
        let mut flags = MqFlags::empty();
        for name in names {
            let flag = MqFlags::from_name(&name)
                .ok_or_else(|| de::Error::custom(format!("unknown measurement flag: {name}")))?;
            flags.insert(flag);
        }
        Ok(flags)
    }
}

/// One decoded display update.
///
/// `value` may be NaN (unreadable display) or infinite (over-range). `digits`
/// is the number of decimals shown by the meter in the base unit, negative for
/// readings scaled by kilo/mega prefixes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MeasurementRecord {
    pub kind: MeasurementKind,
    pub unit: Unit,
    pub flags: MqFlags,
    pub value: f64,
    pub digits: i32,
}

impl MeasurementRecord {
    /// True when the meter signalled over-range or open circuit.
    pub fn is_overflow(&self) -> bool {
        self.value.is_infinite()
    }

    /// Bit-level equality, treating NaN values as equal when their payloads are.
    pub fn bit_eq(&self, other: &MeasurementRecord) -> bool {
        self.kind == other.kind
            && self.unit == other.unit
            && self.flags == other.flags
            && self.value.to_bits() == other.value.to_bits()
            && self.digits == other.digits
    }
}
