use crate::error::{Error, Result};

/// Scale applied when converting floating-point samples to 16-bit integers.
pub const FLOAT_SCALE: f32 = i16::MAX as f32;

/// Shape and encoding of a PCM carrier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CarrierFormat {
    /// Interleaved channel count.
    pub channels: u16,
    /// Sample rate in Hz, carried through untouched.
    pub sample_rate: u32,
    /// Width of each integer sample: 8, 16, 24 or 32.
    pub bits_per_sample: u16,
}

impl CarrierFormat {
    /// Mono 16-bit at the given rate.
    pub fn mono_i16(sample_rate: u32) -> Self {
        Self {
            channels: 1,
            sample_rate,
            bits_per_sample: 16,
        }
    }

    fn validate(&self) -> Result<()> {
        if self.channels == 0 {
            return Err(Error::UnsupportedCarrierFormat(
                "carrier has no channels".into(),
            ));
        }
        if !matches!(self.bits_per_sample, 8 | 16 | 24 | 32) {
            return Err(Error::UnsupportedCarrierFormat(format!(
                "{}-bit samples are not supported",
                self.bits_per_sample
            )));
        }
        Ok(())
    }

    fn sample_range(&self) -> (i64, i64) {
        let half = 1i64 << (self.bits_per_sample - 1);
        (-half, half - 1)
    }
}

/// An integer PCM sample buffer in its original interleaved layout.
///
/// Samples are stored flat; the [`CarrierFormat`] keeps the channel count so
/// the shape can be restored when the buffer is written back out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Carrier {
    samples: Vec<i32>,
    format: CarrierFormat,
}

impl Carrier {
    /// Wrap integer samples. Every sample must fit the declared width and the
    /// sample count must be a whole number of frames.
    pub fn new(samples: Vec<i32>, format: CarrierFormat) -> Result<Self> {
        format.validate()?;
        if samples.len() % format.channels as usize != 0 {
            return Err(Error::UnsupportedCarrierFormat(format!(
                "{} samples do not divide into {} channels",
                samples.len(),
                format.channels
            )));
        }
        let (min, max) = format.sample_range();
        if let Some(&bad) = samples
            .iter()
            .find(|&&s| i64::from(s) < min || i64::from(s) > max)
        {
            return Err(Error::UnsupportedCarrierFormat(format!(
                "sample {bad} out of range for {}-bit audio",
                format.bits_per_sample
            )));
        }
        Ok(Self { samples, format })
    }

    /// Convert floating-point samples to 16-bit integers.
    ///
    /// Values are clamped to [-1.0, 1.0], scaled by [`FLOAT_SCALE`] and
    /// truncated toward zero. Non-finite samples are rejected.
    pub fn from_f32(samples: &[f32], channels: u16, sample_rate: u32) -> Result<Self> {
        if let Some(bad) = samples.iter().find(|s| !s.is_finite()) {
            return Err(Error::UnsupportedCarrierFormat(format!(
                "non-finite float sample {bad}"
            )));
        }
        let converted = samples
            .iter()
            .map(|&s| (s.clamp(-1.0, 1.0) * FLOAT_SCALE) as i32)
            .collect();
        Self::new(
            converted,
            CarrierFormat {
                channels,
                sample_rate,
                bits_per_sample: 16,
            },
        )
    }

    pub fn from_i16(samples: &[i16], channels: u16, sample_rate: u32) -> Result<Self> {
        Self::new(
            samples.iter().map(|&s| i32::from(s)).collect(),
            CarrierFormat {
                channels,
                sample_rate,
                bits_per_sample: 16,
            },
        )
    }

    pub fn samples(&self) -> &[i32] {
        &self.samples
    }

    pub fn format(&self) -> CarrierFormat {
        self.format
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Number of multi-channel frames.
    pub fn frames(&self) -> usize {
        self.samples.len() / self.format.channels as usize
    }

    pub fn into_samples(self) -> Vec<i32> {
        self.samples
    }

    /// Same format, new samples. Used by the codec, which never changes length.
    pub(crate) fn with_samples(&self, samples: Vec<i32>) -> Self {
        debug_assert_eq!(samples.len(), self.samples.len());
        Self {
            samples,
            format: self.format,
        }
    }
}
