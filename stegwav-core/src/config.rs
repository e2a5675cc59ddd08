/// Largest bit depth the codec accepts, regardless of carrier sample width.
pub const MAX_BIT_DEPTH: u32 = 16;

/// Configuration for LSB embedding and extraction.
#[derive(Debug, Clone)]
pub struct CodecConfig {
    /// Number of least-significant bits of each sample carrying payload.
    /// Valid range: 1 to [`MAX_BIT_DEPTH`], and at most the carrier's
    /// bits per sample. Default: 1.
    pub bit_depth: u32,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self { bit_depth: 1 }
    }
}

impl CodecConfig {
    pub fn with_bit_depth(bit_depth: u32) -> Self {
        Self { bit_depth }
    }

    /// Mask selecting the payload bits of a sample.
    pub fn mask(&self) -> i32 {
        ((1u32 << self.bit_depth) - 1) as i32
    }

    /// Number of samples needed to carry `bits` payload bits.
    pub fn samples_for(&self, bits: usize) -> usize {
        bits.div_ceil(self.bit_depth as usize)
    }
}

/// Tuning for the bit-depth recommendation heuristic.
#[derive(Debug, Clone)]
pub struct HeuristicConfig {
    /// Past attempts count as relevant when their carrier size differs from
    /// the query by less than this many bytes. Default: 100 000.
    pub size_window: u64,
    /// Minimum SNR in dB for an attempt to justify its bit depth. Default: 40.
    pub min_quality_db: f64,
    /// Recommendation when no history qualifies. Default: 1.
    pub fallback_bit_depth: u32,
}

impl Default for HeuristicConfig {
    fn default() -> Self {
        Self {
            size_window: 100_000,
            min_quality_db: 40.0,
            fallback_bit_depth: 1,
        }
    }
}
