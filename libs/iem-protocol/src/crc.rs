//! CRC-16 over message fields
//!
//! Generator 0x1021, zero initial register, no reflection, no final XOR.
//! The lookup table is assembled from the remainders of the eight single-bit
//! byte values, so entry `i` is the XOR of the remainders selected by the set
//! bits of `i`.

/// Remainder of `1 << bit`, for bit 0 through 7
const BIT_REMAINDERS: [u16; 8] = [
    0x1021, 0x2042, 0x4084, 0x8108, 0x1231, 0x2462, 0x48C4, 0x9188,
];

/// 256-entry lookup table, built at compile time
pub static CRC_TABLE: [u16; 256] = build_table();

const fn build_table() -> [u16; 256] {
    let mut table = [0u16; 256];
    let mut index = 0;
    while index < 256 {
        let mut entry = 0u16;
        let mut bit = 0;
        while bit < 8 {
            if index & (1 << bit) != 0 {
                entry ^= BIT_REMAINDERS[bit];
            }
            bit += 1;
        }
        table[index] = entry;
        index += 1;
    }
    table
}

/// Checksum of the first `count` fields.
///
/// `count` larger than `fields.len()` covers the whole slice.
pub fn compute(fields: &[u8], count: usize) -> u16 {
    fields.iter().take(count).fold(0u16, |crc, &field| {
        let crc = crc ^ (u16::from(field) << 8);
        let index = (crc >> 8) as usize;
        (crc << 8) ^ CRC_TABLE[index]
    })
}

/// Checksum of every field in `fields`.
pub fn crc16(fields: &[u8]) -> u16 {
    compute(fields, fields.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Bit-at-a-time remainder of `byte << 8` under the same generator
    fn bitwise_entry(byte: u8) -> u16 {
        let mut crc = u16::from(byte) << 8;
        for _ in 0..8 {
            crc = if crc & 0x8000 != 0 {
                (crc << 1) ^ 0x1021
            } else {
                crc << 1
            };
        }
        crc
    }

    #[test]
    fn test_table_matches_bitwise_generator() {
        for byte in 0..=255u8 {
            assert_eq!(
                CRC_TABLE[byte as usize],
                bitwise_entry(byte),
                "table entry 0x{byte:02X}"
            );
        }
    }

    #[test]
    fn test_table_spot_entries() {
        assert_eq!(CRC_TABLE[0x00], 0x0000);
        assert_eq!(CRC_TABLE[0x01], 0x1021);
        assert_eq!(CRC_TABLE[0x03], 0x3063);
        assert_eq!(CRC_TABLE[0x80], 0x9188);
        assert_eq!(CRC_TABLE[0xFF], 0x1EF0);
    }

    #[test]
    fn test_matches_crc16_xmodem() {
        let xmodem = ::crc::Crc::<u16>::new(&::crc::CRC_16_XMODEM);
        let samples: [&[u8]; 5] = [
            b"123456789",
            &[0x02, 0x01],
            &[0x62, 0x00, 0x01, 0x32],
            &[0xFF, 0xF0, 0x0F, 0xF5, 0xF6],
            &[],
        ];
        for sample in samples {
            assert_eq!(crc16(sample), xmodem.checksum(sample), "{sample:02X?}");
        }
    }

    #[test]
    fn test_reference_vectors() {
        assert_eq!(crc16(b"123456789"), 0x31C3);
        assert_eq!(crc16(&[0x02, 0x01]), 0x7643);
        assert_eq!(crc16(&[0x10, 0x04]), 0x43F7);
        assert_eq!(crc16(&[0x35, 0x00]), 0xFA60);
        assert_eq!(crc16(&[0x92, 0x05, 0x01]), 0xF98D);
    }

    #[test]
    fn test_count_limits_covered_fields() {
        // Trailing placeholder is ignored when count stops before it
        let message = [0x02, 0x01, 0x00];
        assert_eq!(compute(&message, 2), 0x7643);
        assert_eq!(compute(&message, 2), compute(&message, 2));
        assert_ne!(compute(&message, 3), compute(&message, 2));
        assert_eq!(compute(&message, 10), crc16(&message));
        assert_eq!(compute(&message, 0), 0);
    }
}
