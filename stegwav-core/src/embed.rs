use tracing::debug;

use crate::bits::BitReader;
use crate::carrier::Carrier;
use crate::config::{CodecConfig, MAX_BIT_DEPTH};
use crate::error::{Error, Result};
use crate::payload::Frame;

/// A carrier with a frame written into its low bits.
#[derive(Debug, Clone)]
pub struct Embedded {
    pub carrier: Carrier,
    /// Frame bits written, length prefix included.
    pub bits_embedded: usize,
}

/// Check `config.bit_depth` against the codec limit and the carrier width.
pub(crate) fn validate_bit_depth(carrier: &Carrier, config: &CodecConfig) -> Result<()> {
    let max = MAX_BIT_DEPTH.min(u32::from(carrier.format().bits_per_sample));
    if config.bit_depth == 0 || config.bit_depth > max {
        return Err(Error::InvalidBitDepth {
            bit_depth: config.bit_depth,
            max,
        });
    }
    Ok(())
}

/// Reinterpret the low `width` bits of `value` as a signed sample. Only matters
/// when the bit depth reaches the sign bit.
fn sign_extend(value: i32, width: u32) -> i32 {
    let shift = 32 - width;
    (value << shift) >> shift
}

/// Hide `message` in the low `config.bit_depth` bits of the leading samples.
///
/// Only the first `ceil(frame_bits / bit_depth)` samples change; the input
/// carrier is left untouched and a modified copy is returned.
pub fn embed(carrier: &Carrier, message: &str, config: &CodecConfig) -> Result<Embedded> {
    let frame = Frame::new(message)?;
    embed_frame(carrier, &frame, config)
}

/// Write an already-built frame. Fails with [`Error::Capacity`] when the
/// carrier has fewer samples than the frame needs at this bit depth.
pub fn embed_frame(carrier: &Carrier, frame: &Frame, config: &CodecConfig) -> Result<Embedded> {
    validate_bit_depth(carrier, config)?;
    let needed = config.samples_for(frame.bit_len());
    if needed > carrier.len() {
        return Err(Error::Capacity {
            needed,
            available: carrier.len(),
        });
    }

    let mask = config.mask();
    let width = u32::from(carrier.format().bits_per_sample);
    let mut samples = carrier.samples().to_vec();
    let mut bits = BitReader::new(frame.as_bytes());
    for sample in samples.iter_mut().take(needed) {
        let Some(chunk) = bits.read_bits(config.bit_depth) else {
            break;
        };
        *sample = sign_extend((*sample & !mask) | chunk as i32, width);
    }

    debug!(
        bits = frame.bit_len(),
        samples = needed,
        bit_depth = config.bit_depth,
        "frame embedded"
    );

    Ok(Embedded {
        carrier: carrier.with_samples(samples),
        bits_embedded: frame.bit_len(),
    })
}
