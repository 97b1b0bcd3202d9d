//! Frame codec
//!
//! A request travels as `START, stuffed fields, stuffed checksum (high, low), END`.
//! Stuffing only protects bytes whose top nibble is 0xF: such a byte becomes
//! `[ESCAPE_MARKER, low nibble]` and is rebuilt on receipt by OR-ing the
//! nibble into the marker. Any other byte, including a bare 0xF5/0xF6 the
//! caller should never produce, goes out unmodified.

use crate::constants::{END_DELIMITER, ESCAPE_MARKER, START_DELIMITER};
use crate::crc;

/// One logical request: selector, subselector and parameter fields, plus the
/// checksum computed over exactly those fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    fields: Vec<u8>,
    crc: u16,
}

impl Message {
    /// Build a message and compute its checksum over every field.
    pub fn new(fields: impl Into<Vec<u8>>) -> Self {
        let fields = fields.into();
        let crc = crc::crc16(&fields);
        Self { fields, crc }
    }

    pub fn fields(&self) -> &[u8] {
        &self.fields
    }

    pub fn crc(&self) -> u16 {
        self.crc
    }

    /// Selector is always the first field
    pub fn selector(&self) -> Option<u8> {
        self.fields.first().copied()
    }

    /// Wire representation of this message
    pub fn encode(&self) -> Vec<u8> {
        encode(&self.fields, self.crc)
    }
}

/// True when `byte` must travel escaped
#[inline]
pub fn needs_escape(byte: u8) -> bool {
    byte & 0xF0 == 0xF0
}

#[inline]
fn push_stuffed(out: &mut Vec<u8>, byte: u8) {
    if needs_escape(byte) {
        out.push(ESCAPE_MARKER);
        out.push(byte & 0x0F);
    } else {
        out.push(byte);
    }
}

/// Encode `fields` followed by `crc` (big-endian) into a delimited frame.
pub fn encode(fields: &[u8], crc: u16) -> Vec<u8> {
    // Worst case every byte doubles
    let mut out = Vec::with_capacity(2 * (fields.len() + 2) + 2);

    out.push(START_DELIMITER);
    for &field in fields {
        push_stuffed(&mut out, field);
    }
    let [high, low] = crc.to_be_bytes();
    push_stuffed(&mut out, high);
    push_stuffed(&mut out, low);
    out.push(END_DELIMITER);

    out
}

/// Reverse the stuffing in place and return the unstuffed length.
///
/// Delimiters are kept; only escape pairs collapse. A trailing escape marker
/// with no partner is dropped from the returned length.
pub fn decode(buf: &mut [u8]) -> usize {
    let mut escape_pending = false;
    let mut cursor = 0;

    for i in 0..buf.len() {
        let byte = buf[i];
        if escape_pending {
            buf[cursor] |= byte;
            cursor += 1;
            escape_pending = false;
        } else {
            buf[cursor] = byte;
            if byte == ESCAPE_MARKER {
                escape_pending = true;
            } else {
                cursor += 1;
            }
        }
    }

    cursor
}

/// Decode a copy of `raw` and return the unstuffed bytes.
pub fn decode_to_vec(raw: &[u8]) -> Vec<u8> {
    let mut buf = raw.to_vec();
    let len = decode(&mut buf);
    buf.truncate(len);
    buf
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_single_byte() {
        let mut out = Vec::new();
        push_stuffed(&mut out, 0xF3);
        assert_eq!(out, vec![0xF0, 0x03]);

        let mut buf = [0xF0, 0x03];
        assert_eq!(decode(&mut buf), 1);
        assert_eq!(buf[0], 0xF3);
    }

    #[test]
    fn test_plain_bytes_pass_through() {
        for byte in 0x00..=0xEFu8 {
            let mut out = Vec::new();
            push_stuffed(&mut out, byte);
            assert_eq!(out, vec![byte]);
        }
    }

    #[test]
    fn test_encode_hw_version_request() {
        let frame = Message::new(vec![0x02, 0x01]).encode();
        assert_eq!(frame, vec![0xF5, 0x02, 0x01, 0x76, 0x43, 0xF6]);
    }

    #[test]
    fn test_encode_escapes_checksum_high_byte() {
        // crc16([0x35, 0x00]) == 0xFA60
        let frame = Message::new(vec![0x35, 0x00]).encode();
        assert_eq!(frame, vec![0xF5, 0x35, 0x00, 0xF0, 0x0A, 0x60, 0xF6]);
    }

    #[test]
    fn test_encode_escapes_checksum_low_byte() {
        // crc16([0x10, 0x04]) == 0x43F7
        let frame = Message::new(vec![0x10, 0x04]).encode();
        assert_eq!(frame, vec![0xF5, 0x10, 0x04, 0x43, 0xF0, 0x07, 0xF6]);
    }

    #[test]
    fn test_encode_escapes_fields() {
        let frame = encode(&[0xF1, 0x20, 0xFF], 0x0102);
        assert_eq!(
            frame,
            vec![0xF5, 0xF0, 0x01, 0x20, 0xF0, 0x0F, 0x01, 0x02, 0xF6]
        );
    }

    #[test]
    fn test_encode_escapes_delimiter_valued_field() {
        // 0xF5 has top nibble 0xF, so it is escaped like any other such byte
        let frame = encode(&[0xF5], 0x0000);
        assert_eq!(frame, vec![0xF5, 0xF0, 0x05, 0x00, 0x00, 0xF6]);
    }

    #[test]
    fn test_decode_keeps_delimiters() {
        let mut buf = [0xF5, 0x02, 0x01, 0xF0, 0x03, 0x0A, 0x0B, 0xF6];
        let len = decode(&mut buf);
        assert_eq!(len, 7);
        assert_eq!(&buf[..len], &[0xF5, 0x02, 0x01, 0xF3, 0x0A, 0x0B, 0xF6]);
    }

    #[test]
    fn test_decode_trailing_marker_is_dropped() {
        let mut buf = [0x01, 0x02, 0xF0];
        assert_eq!(decode(&mut buf), 2);
    }

    #[test]
    fn test_decode_consecutive_escapes() {
        let decoded = decode_to_vec(&[0xF0, 0x0F, 0xF0, 0x00, 0xF0, 0x06]);
        assert_eq!(decoded, vec![0xFF, 0xF0, 0xF6]);
    }

    #[test]
    fn test_round_trip_all_byte_values() {
        let fields: Vec<u8> = (0..=255u8).collect();
        let message = Message::new(fields.clone());
        let decoded = decode_to_vec(&message.encode());

        let [high, low] = message.crc().to_be_bytes();
        let mut expected = vec![START_DELIMITER];
        expected.extend_from_slice(&fields);
        expected.push(high);
        expected.push(low);
        expected.push(END_DELIMITER);
        assert_eq!(decoded, expected);
    }

    #[test]
    fn test_message_accessors() {
        let message = Message::new(vec![0x62, 0x00, 0x01, 0x32]);
        assert_eq!(message.selector(), Some(0x62));
        assert_eq!(message.fields(), &[0x62, 0x00, 0x01, 0x32]);
        assert_eq!(message.crc(), 0x919A);
        assert_eq!(Message::new(Vec::new()).selector(), None);
    }
}
