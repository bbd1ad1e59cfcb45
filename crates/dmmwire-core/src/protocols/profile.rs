//! Protocol variants and their fixed layout parameters.
//!
//! The variant set is closed: every supported wire format is a
//! `ProtocolVariant`, and each variant owns one `'static` `ProtocolProfile`
//! describing its packet size, baud rate, layout switches and exponent table.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::es519xx::exponents::{
    EXPONENTS_2400_11B, EXPONENTS_19200_11B, EXPONENTS_19200_11B_5DIGITS,
    EXPONENTS_19200_11B_CLAMPMETER, EXPONENTS_19200_14B, ExponentTable,
};
use super::{bm25x, es519xx};

/// Chip family a variant belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProtocolFamily {
    Bm25x,
    Es519xx,
}

/// Supported wire formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ProtocolVariant {
    /// Brymen BM25x, 9600 baud, 15 byte segment packets.
    Bm25x,
    Es519xx2400Baud11Byte,
    Es519xx2400Baud11ByteAltFunctions,
    Es519xx19200Baud11ByteFiveDigits,
    Es519xx19200Baud11ByteClampMeter,
    Es519xx19200Baud11Byte,
    Es519xx19200Baud14Byte,
    Es519xx19200Baud14ByteSelectableLpf,
}

/// Fixed parameters of one wire format.
#[derive(Debug, PartialEq, Eq)]
pub struct ProtocolProfile {
    pub variant: ProtocolVariant,
    pub family: ProtocolFamily,
    /// Stable name used on the command line and in reports.
    pub name: &'static str,
    pub description: &'static str,
    /// Chips or meters known to speak this format.
    pub chips: &'static [&'static str],
    pub baud_rate: u32,
    /// Size of one logical packet.
    pub packet_size: usize,
    /// Bytes consumed per display update (twice `packet_size` when the
    /// device repeats every packet).
    pub frame_len: usize,
    pub five_digits: bool,
    pub clamp_meter: bool,
    pub alt_functions: bool,
    pub selectable_lpf: bool,
    pub exponents: Option<&'static ExponentTable>,
    pub min_digits: i32,
    pub max_digits: i32,
}

impl ProtocolProfile {
    /// True when every packet is transmitted twice back to back.
    pub fn is_repeated(&self) -> bool {
        self.frame_len == 2 * self.packet_size
    }

    /// Number of display digits carried as ASCII in the packet.
    pub fn digit_count(&self) -> usize {
        match self.family {
            ProtocolFamily::Bm25x => bm25x::layout::DIGIT_COUNT,
            ProtocolFamily::Es519xx => es519xx::layout::digit_count(self.packet_size),
        }
    }
}

const MIN_DIGITS: i32 = -6;
const MAX_DIGITS: i32 = 12;

pub static BM25X: ProtocolProfile = ProtocolProfile {
    variant: ProtocolVariant::Bm25x,
    family: ProtocolFamily::Bm25x,
    name: "bm25x",
    description: "Brymen BM25x LCD segment stream",
    chips: &["BM251", "BM252", "BM253", "BM255", "BM257", "BM257s"],
    baud_rate: 9600,
    packet_size: bm25x::layout::PACKET_SIZE,
    frame_len: bm25x::layout::PACKET_SIZE,
    five_digits: false,
    clamp_meter: false,
    alt_functions: false,
    selectable_lpf: false,
    exponents: None,
    min_digits: MIN_DIGITS,
    max_digits: MAX_DIGITS,
};

pub static ES519XX_2400_11B: ProtocolProfile = ProtocolProfile {
    variant: ProtocolVariant::Es519xx2400Baud11Byte,
    family: ProtocolFamily::Es519xx,
    name: "es519xx-2400-11b",
    description: "Cyrustek ES519XX, 2400 baud, 11 byte packets",
    chips: &["ES51962", "ES51971", "ES51972", "ES51978", "ES51989"],
    baud_rate: 2400,
    packet_size: es519xx::layout::PACKET_SIZE_11B,
    frame_len: 2 * es519xx::layout::PACKET_SIZE_11B,
    five_digits: false,
    clamp_meter: false,
    alt_functions: false,
    selectable_lpf: false,
    exponents: Some(&EXPONENTS_2400_11B),
    min_digits: MIN_DIGITS,
    max_digits: MAX_DIGITS,
};

pub static ES519XX_2400_11B_ALTFN: ProtocolProfile = ProtocolProfile {
    variant: ProtocolVariant::Es519xx2400Baud11ByteAltFunctions,
    family: ProtocolFamily::Es519xx,
    name: "es519xx-2400-11b-altfn",
    description: "Cyrustek ES519XX, 2400 baud, 11 byte packets, alternate function codes",
    chips: &["ES51960", "ES51977", "ES51988"],
    baud_rate: 2400,
    packet_size: es519xx::layout::PACKET_SIZE_11B,
    frame_len: 2 * es519xx::layout::PACKET_SIZE_11B,
    five_digits: false,
    clamp_meter: false,
    alt_functions: true,
    selectable_lpf: false,
    exponents: Some(&EXPONENTS_2400_11B),
    min_digits: MIN_DIGITS,
    max_digits: MAX_DIGITS,
};

pub static ES519XX_19200_11B_5DIGITS: ProtocolProfile = ProtocolProfile {
    variant: ProtocolVariant::Es519xx19200Baud11ByteFiveDigits,
    family: ProtocolFamily::Es519xx,
    name: "es519xx-19200-11b-5digits",
    description: "Cyrustek ES519XX, 19200 baud, 11 byte packets, 5 digit display",
    chips: &["ES51911", "ES51916", "ES51918"],
    baud_rate: 19200,
    packet_size: es519xx::layout::PACKET_SIZE_11B,
    frame_len: 2 * es519xx::layout::PACKET_SIZE_11B,
    five_digits: true,
    clamp_meter: false,
    alt_functions: false,
    selectable_lpf: false,
    exponents: Some(&EXPONENTS_19200_11B_5DIGITS),
    min_digits: MIN_DIGITS,
    max_digits: MAX_DIGITS,
};

pub static ES519XX_19200_11B_CLAMP: ProtocolProfile = ProtocolProfile {
    variant: ProtocolVariant::Es519xx19200Baud11ByteClampMeter,
    family: ProtocolFamily::Es519xx,
    name: "es519xx-19200-11b-clamp",
    description: "Cyrustek ES519XX, 19200 baud, 11 byte packets, clamp meter",
    chips: &["ES51967", "ES51969"],
    baud_rate: 19200,
    packet_size: es519xx::layout::PACKET_SIZE_11B,
    frame_len: 2 * es519xx::layout::PACKET_SIZE_11B,
    five_digits: false,
    clamp_meter: true,
    alt_functions: false,
    selectable_lpf: false,
    exponents: Some(&EXPONENTS_19200_11B_CLAMPMETER),
    min_digits: MIN_DIGITS,
    max_digits: MAX_DIGITS,
};

pub static ES519XX_19200_11B: ProtocolProfile = ProtocolProfile {
    variant: ProtocolVariant::Es519xx19200Baud11Byte,
    family: ProtocolFamily::Es519xx,
    name: "es519xx-19200-11b",
    description: "Cyrustek ES519XX, 19200 baud, 11 byte packets",
    chips: &["ES51981", "ES51982", "ES51983", "ES51984", "ES51986"],
    baud_rate: 19200,
    packet_size: es519xx::layout::PACKET_SIZE_11B,
    frame_len: 2 * es519xx::layout::PACKET_SIZE_11B,
    five_digits: false,
    clamp_meter: false,
    alt_functions: false,
    selectable_lpf: false,
    exponents: Some(&EXPONENTS_19200_11B),
    min_digits: MIN_DIGITS,
    max_digits: MAX_DIGITS,
};

pub static ES519XX_19200_14B: ProtocolProfile = ProtocolProfile {
    variant: ProtocolVariant::Es519xx19200Baud14Byte,
    family: ProtocolFamily::Es519xx,
    name: "es519xx-19200-14b",
    description: "Cyrustek ES519XX, 19200 baud, 14 byte packets",
    chips: &["ES51921", "ES51922"],
    baud_rate: 19200,
    packet_size: es519xx::layout::PACKET_SIZE_14B,
    frame_len: es519xx::layout::PACKET_SIZE_14B,
    five_digits: false,
    clamp_meter: false,
    alt_functions: false,
    selectable_lpf: false,
    exponents: Some(&EXPONENTS_19200_14B),
    min_digits: MIN_DIGITS,
    max_digits: MAX_DIGITS,
};

pub static ES519XX_19200_14B_SEL_LPF: ProtocolProfile = ProtocolProfile {
    variant: ProtocolVariant::Es519xx19200Baud14ByteSelectableLpf,
    family: ProtocolFamily::Es519xx,
    name: "es519xx-19200-14b-sel-lpf",
    description: "Cyrustek ES519XX, 19200 baud, 14 byte packets, selectable low-pass filter",
    chips: &["ES51931", "ES51932"],
    baud_rate: 19200,
    packet_size: es519xx::layout::PACKET_SIZE_14B,
    frame_len: es519xx::layout::PACKET_SIZE_14B,
    five_digits: false,
    clamp_meter: false,
    alt_functions: false,
    selectable_lpf: true,
    exponents: Some(&EXPONENTS_19200_14B),
    min_digits: MIN_DIGITS,
    max_digits: MAX_DIGITS,
};

impl ProtocolVariant {
    /// All variants, in listing order.
    pub const ALL: [ProtocolVariant; 8] = [
        ProtocolVariant::Bm25x,
        ProtocolVariant::Es519xx2400Baud11Byte,
        ProtocolVariant::Es519xx2400Baud11ByteAltFunctions,
        ProtocolVariant::Es519xx19200Baud11ByteFiveDigits,
        ProtocolVariant::Es519xx19200Baud11ByteClampMeter,
        ProtocolVariant::Es519xx19200Baud11Byte,
        ProtocolVariant::Es519xx19200Baud14Byte,
        ProtocolVariant::Es519xx19200Baud14ByteSelectableLpf,
    ];

    pub fn profile(self) -> &'static ProtocolProfile {
        match self {
            ProtocolVariant::Bm25x => &BM25X,
            ProtocolVariant::Es519xx2400Baud11Byte => &ES519XX_2400_11B,
            ProtocolVariant::Es519xx2400Baud11ByteAltFunctions => &ES519XX_2400_11B_ALTFN,
            ProtocolVariant::Es519xx19200Baud11ByteFiveDigits => &ES519XX_19200_11B_5DIGITS,
            ProtocolVariant::Es519xx19200Baud11ByteClampMeter => &ES519XX_19200_11B_CLAMP,
            ProtocolVariant::Es519xx19200Baud11Byte => &ES519XX_19200_11B,
            ProtocolVariant::Es519xx19200Baud14Byte => &ES519XX_19200_14B,
            ProtocolVariant::Es519xx19200Baud14ByteSelectableLpf => &ES519XX_19200_14B_SEL_LPF,
        }
    }

    pub fn name(self) -> &'static str {
        self.profile().name
    }
}

impl fmt::Display for ProtocolVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a protocol name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown protocol variant '{name}'")]
pub struct UnknownVariant {
    pub name: String,
}

impl FromStr for ProtocolVariant {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        ProtocolVariant::ALL
            .into_iter()
            .find(|variant| variant.name() == wanted)
            .ok_or(UnknownVariant {
                name: s.to_string(),
            })
    }
}

impl TryFrom<String> for ProtocolVariant {
    type Error = UnknownVariant;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ProtocolVariant> for String {
    fn from(value: ProtocolVariant) -> Self {
        value.name().to_string()
    }
}
