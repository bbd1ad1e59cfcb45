/// A single flag bit at a fixed packet offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FlagBit {
    pub offset: usize,
    pub mask: u8,
}

impl FlagBit {
    pub(crate) const fn new(offset: usize, bit: u8) -> Self {
        Self {
            offset,
            mask: 1 << bit,
        }
    }
}

/// Number of `true` entries, used by the mutual-exclusion checks.
pub(crate) fn count_set(flags: &[bool]) -> usize {
    flags.iter().filter(|flag| **flag).count()
}

#[cfg(test)]
mod tests {
    use super::{FlagBit, count_set};

    #[test]
    fn flag_bit_masks_requested_bit() {
        let bit = FlagBit::new(7, 3);
        assert_eq!(bit.offset, 7);
        assert_eq!(bit.mask, 0x08);
    }

    #[test]
    fn count_set_counts_true_entries() {
        assert_eq!(count_set(&[]), 0);
        assert_eq!(count_set(&[true, false, true]), 2);
    }
}
