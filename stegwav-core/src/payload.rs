use crate::bits::BitWriter;
use crate::error::{Error, Result};

/// Length prefix size in bits.
pub const LENGTH_PREFIX_BITS: usize = 32;

/// A length-prefixed frame: 32-bit big-endian payload bit count followed by
/// the payload bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    bytes: Vec<u8>,
}

impl Frame {
    /// Frame the UTF-8 bytes of `message`.
    ///
    /// Bytes are framed verbatim, so leading zero bytes survive and an empty
    /// message produces a zero-length payload.
    pub fn new(message: &str) -> Result<Self> {
        Self::from_bytes(message.as_bytes())
    }

    pub fn from_bytes(payload: &[u8]) -> Result<Self> {
        let payload_bits = u32::try_from(payload.len() * 8).map_err(|_| Error::Capacity {
            needed: payload.len().saturating_mul(8),
            available: u32::MAX as usize,
        })?;
        let mut bytes = Vec::with_capacity(4 + payload.len());
        bytes.extend_from_slice(&payload_bits.to_be_bytes());
        bytes.extend_from_slice(payload);
        Ok(Self { bytes })
    }

    /// The frame as bytes, prefix included.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Total frame length in bits, prefix included.
    pub fn bit_len(&self) -> usize {
        self.bytes.len() * 8
    }

    /// Number of payload bits announced by the prefix.
    pub fn payload_bits(&self) -> usize {
        self.bit_len() - LENGTH_PREFIX_BITS
    }

    pub fn payload(&self) -> &[u8] {
        &self.bytes[LENGTH_PREFIX_BITS / 8..]
    }
}

/// Read the payload bit count from the first 32 bits of `prefix`.
pub fn parse_length(prefix: &BitWriter) -> Option<u32> {
    if prefix.len() < LENGTH_PREFIX_BITS {
        return None;
    }
    let mut len = 0u32;
    for i in 0..LENGTH_PREFIX_BITS {
        len = (len << 1) | u32::from(prefix.bit(i)?);
    }
    Some(len)
}

/// Decode payload bytes as UTF-8, dropping invalid sequences.
///
/// Returns the text and whether anything was dropped.
pub fn decode_lossy(bytes: &[u8]) -> (String, bool) {
    let mut text = String::with_capacity(bytes.len());
    let mut dropped = false;
    for chunk in bytes.utf8_chunks() {
        text.push_str(chunk.valid());
        dropped |= !chunk.invalid().is_empty();
    }
    (text, dropped)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_layout() {
        let frame = Frame::new("Hi").unwrap();
        assert_eq!(frame.as_bytes(), &[0, 0, 0, 16, b'H', b'i']);
        assert_eq!(frame.bit_len(), 48);
        assert_eq!(frame.payload_bits(), 16);
        assert_eq!(frame.payload(), b"Hi");
    }

    #[test]
    fn empty_message_has_zero_length_payload() {
        let frame = Frame::new("").unwrap();
        assert_eq!(frame.as_bytes(), &[0, 0, 0, 0]);
        assert_eq!(frame.payload_bits(), 0);
    }

    #[test]
    fn leading_zero_byte_is_kept() {
        let frame = Frame::new("\0A").unwrap();
        assert_eq!(frame.payload_bits(), 16);
        assert_eq!(frame.payload(), &[0x00, 0x41]);
    }

    #[test]
    fn length_prefix_parses() {
        let mut bits = BitWriter::new();
        bits.write_bits(0x0001_0203, 32);
        bits.write_bits(0b1, 1);
        assert_eq!(parse_length(&bits), Some(0x0001_0203));

        let mut short = BitWriter::new();
        short.write_bits(0xFF, 8);
        assert_eq!(parse_length(&short), None);
    }

    #[test]
    fn lossy_decode_drops_invalid_bytes() {
        let (text, dropped) = decode_lossy(b"ab\xFFcd");
        assert_eq!(text, "abcd");
        assert!(dropped);

        let (text, dropped) = decode_lossy("größe".as_bytes());
        assert_eq!(text, "größe");
        assert!(!dropped);
    }
}
