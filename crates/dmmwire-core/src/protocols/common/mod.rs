//! Helpers shared by the protocol families.

pub(crate) mod reader;
pub(crate) mod value;
