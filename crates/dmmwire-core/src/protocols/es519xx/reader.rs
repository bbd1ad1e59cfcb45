use super::error::Es519xxError;
use super::layout;

pub struct Es519xxReader<'a> {
    packet: &'a [u8],
    packet_size: usize,
}

impl<'a> Es519xxReader<'a> {
    pub fn new(packet: &'a [u8], packet_size: usize) -> Self {
        Self {
            packet,
            packet_size,
        }
    }

    pub fn require_len(&self, needed: usize) -> Result<(), Es519xxError> {
        if self.packet.len() != needed {
            return Err(Es519xxError::InvalidLength {
                expected: needed,
                actual: self.packet.len(),
            });
        }
        Ok(())
    }

    pub fn read_u8(&self, offset: usize) -> Result<u8, Es519xxError> {
        self.packet
            .get(offset)
            .copied()
            .ok_or(Es519xxError::InvalidLength {
                expected: offset + 1,
                actual: self.packet.len(),
            })
    }

    /// Devices that send every packet twice must send identical copies.
    pub fn check_repeated(&self) -> Result<(), Es519xxError> {
        let size = self.packet_size;
        self.require_len(2 * size)?;
        let (first, second) = self.packet.split_at(size);
        match first.iter().zip(second).position(|(a, b)| a != b) {
            Some(offset) => Err(Es519xxError::DuplicateMismatch { offset }),
            None => Ok(()),
        }
    }

    pub fn check_terminator(&self) -> Result<(), Es519xxError> {
        let offset = layout::terminator_offset(self.packet_size);
        for (offset, expected) in [(offset, layout::CR), (offset + 1, layout::LF)] {
            let value = self.read_u8(offset)?;
            if value != expected {
                return Err(Es519xxError::MissingTerminator { offset, value });
            }
        }
        Ok(())
    }

    pub fn function(&self) -> Result<u8, Es519xxError> {
        self.read_u8(layout::function_offset(self.packet_size))
    }

    pub fn status(&self) -> Result<u8, Es519xxError> {
        self.read_u8(layout::status_offset(self.packet_size))
    }

    /// ASCII display digits as values 0..=9, leading digit first.
    pub fn digits(&self) -> Result<impl Iterator<Item = u8> + '_, Es519xxError> {
        let range = layout::digits_range(self.packet_size);
        for offset in range.clone() {
            let value = self.read_u8(offset)?;
            if !value.is_ascii_digit() {
                return Err(Es519xxError::InvalidDigit { offset, value });
            }
        }
        Ok(self.packet[range].iter().map(|byte| byte - b'0'))
    }

    /// Column index into the exponent table.
    pub fn range_index(&self) -> Result<usize, Es519xxError> {
        let value = self.read_u8(layout::RANGE_OFFSET)?;
        match value.checked_sub(layout::RANGE_BASE).map(usize::from) {
            Some(index) if index < layout::RANGE_COUNT => Ok(index),
            _ => Err(Es519xxError::InvalidRange { value }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Es519xxReader;
    use crate::protocols::es519xx::error::Es519xxError;
    use crate::protocols::es519xx::layout;

    const PACKET_14B: &[u8; 14] = b"112345;0000\x30\r\n";

    #[test]
    fn read_fixed_fields() {
        let reader = Es519xxReader::new(PACKET_14B, layout::PACKET_SIZE_14B);
        assert_eq!(reader.range_index().unwrap(), 1);
        assert_eq!(reader.function().unwrap(), b';');
        assert_eq!(reader.status().unwrap(), b'0');
        assert_eq!(reader.digits().unwrap().collect::<Vec<_>>(), vec![1, 2, 3, 4, 5]);
        assert!(reader.check_terminator().is_ok());
    }

    #[test]
    fn reject_non_ascii_digit() {
        let mut packet = *PACKET_14B;
        packet[3] = b'?';
        let reader = Es519xxReader::new(&packet, layout::PACKET_SIZE_14B);
        assert!(matches!(
            reader.digits(),
            Err(Es519xxError::InvalidDigit { offset: 3, value: b'?' })
        ));
    }

    #[test]
    fn reject_range_outside_table() {
        for value in [b'8', b'/', 0x00, 0xff] {
            let mut packet = *PACKET_14B;
            packet[0] = value;
            let reader = Es519xxReader::new(&packet, layout::PACKET_SIZE_14B);
            assert_eq!(reader.range_index(), Err(Es519xxError::InvalidRange { value }));
        }
    }

    #[test]
    fn reject_missing_terminator() {
        let mut packet = *PACKET_14B;
        packet[13] = b'\r';
        let reader = Es519xxReader::new(&packet, layout::PACKET_SIZE_14B);
        assert_eq!(
            reader.check_terminator(),
            Err(Es519xxError::MissingTerminator { offset: 13, value: b'\r' })
        );
    }

    #[test]
    fn repeated_packets_must_match() {
        let single = b"001233000\r\n";
        let mut frame = Vec::new();
        frame.extend_from_slice(single);
        frame.extend_from_slice(single);
        let reader = Es519xxReader::new(&frame, layout::PACKET_SIZE_11B);
        assert!(reader.check_repeated().is_ok());

        frame[11 + 4] = b'9';
        let reader = Es519xxReader::new(&frame, layout::PACKET_SIZE_11B);
        assert_eq!(
            reader.check_repeated(),
            Err(Es519xxError::DuplicateMismatch { offset: 4 })
        );

        let reader = Es519xxReader::new(&frame[..11], layout::PACKET_SIZE_11B);
        assert!(matches!(
            reader.check_repeated(),
            Err(Es519xxError::InvalidLength { expected: 22, actual: 11 })
        ));
    }
}
