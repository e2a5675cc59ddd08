use tracing::{debug, warn};

use crate::bits::BitWriter;
use crate::carrier::Carrier;
use crate::config::CodecConfig;
use crate::embed::validate_bit_depth;
use crate::error::{Error, Result};
use crate::payload::{self, LENGTH_PREFIX_BITS};

/// Collect the low `config.bit_depth` bits of the first `count` samples as one
/// continuous bitstream.
fn read_low_bits(samples: &[i32], count: usize, config: &CodecConfig) -> BitWriter {
    let mask = config.mask();
    let mut bits = BitWriter::with_capacity(count * config.bit_depth as usize);
    for &sample in &samples[..count] {
        bits.write_bits((sample & mask) as u32, config.bit_depth);
    }
    bits
}

/// Read the announced payload bit count without decoding the payload.
pub fn read_length(carrier: &Carrier, config: &CodecConfig) -> Result<u32> {
    validate_bit_depth(carrier, config)?;
    let needed = config.samples_for(LENGTH_PREFIX_BITS);
    if needed > carrier.len() {
        return Err(Error::FrameTruncated {
            needed,
            available: carrier.len(),
        });
    }
    let prefix = read_low_bits(carrier.samples(), needed, config);
    payload::parse_length(&prefix).ok_or(Error::FrameTruncated {
        needed,
        available: carrier.len(),
    })
}

/// Recover the raw payload bytes of the embedded frame.
///
/// A payload length that is not a whole number of bytes only happens on
/// carriers that were not written by [`crate::embed::embed`]; the trailing
/// partial byte is dropped.
pub fn extract_bytes(carrier: &Carrier, config: &CodecConfig) -> Result<Vec<u8>> {
    let payload_bits = read_length(carrier, config)? as usize;
    let total_bits = LENGTH_PREFIX_BITS.saturating_add(payload_bits);
    let needed = config.samples_for(total_bits);
    if needed > carrier.len() {
        return Err(Error::FrameTruncated {
            needed,
            available: carrier.len(),
        });
    }

    let stream = read_low_bits(carrier.samples(), needed, config);
    let whole_bytes = payload_bits / 8;
    if payload_bits % 8 != 0 {
        warn!(payload_bits, "payload length is not byte aligned, dropping partial byte");
    }

    let mut payload = BitWriter::with_capacity(whole_bytes * 8);
    for index in LENGTH_PREFIX_BITS..LENGTH_PREFIX_BITS + whole_bytes * 8 {
        payload.push_bit(stream.bit(index).unwrap_or(false));
    }

    debug!(payload_bits, samples = needed, bit_depth = config.bit_depth, "frame extracted");
    Ok(payload.into_bytes())
}

/// Recover the embedded message. Invalid UTF-8 is dropped rather than failing.
pub fn extract(carrier: &Carrier, config: &CodecConfig) -> Result<String> {
    let bytes = extract_bytes(carrier, config)?;
    let (text, dropped) = payload::decode_lossy(&bytes);
    if dropped {
        warn!(bytes = bytes.len(), "extracted payload is not valid UTF-8, dropped invalid sequences");
    }
    Ok(text)
}
