pub mod analysis;
pub mod bits;
pub mod carrier;
pub mod config;
pub mod embed;
pub mod error;
pub mod extract;
pub mod heuristic;
pub mod history;
pub mod key;
pub mod payload;
pub mod pipeline;
pub mod playfair;
pub mod railfence;

#[cfg(feature = "parallel")]
pub mod parallel;

// Re-export primary API types
pub use analysis::QualityReport;
pub use carrier::{Carrier, CarrierFormat};
pub use config::{CodecConfig, HeuristicConfig};
pub use error::Error;
pub use heuristic::AdaptiveHeuristic;
pub use history::{AttemptLog, AttemptRecord, JsonFileLog, MemoryLog};
pub use key::CipherKey;
pub use pipeline::{Concealed, EmbedReport, Revealed, Watermarker};
pub use playfair::PlayfairCipher;
pub use railfence::RailFenceCipher;

#[cfg(feature = "parallel")]
pub use parallel::{compare_parallel, quality_parallel};

/// Encrypt `message` and hide it in the low `bit_depth` bits of `carrier`.
///
/// This is the one-shot API. To score the result and keep an attempt log,
/// see [`Watermarker`].
pub fn embed(
    carrier: &Carrier,
    key: &CipherKey,
    message: &str,
    bit_depth: u32,
) -> error::Result<Concealed> {
    pipeline::conceal(carrier, key, message, &CodecConfig::with_bit_depth(bit_depth))
}

/// Extract and decrypt a message hidden with [`embed`].
pub fn extract(carrier: &Carrier, key: &CipherKey, bit_depth: u32) -> error::Result<Revealed> {
    pipeline::reveal(carrier, key, &CodecConfig::with_bit_depth(bit_depth))
}

/// SNR in dB of `modified` relative to `original`; infinite when identical.
pub fn analyze(original: &Carrier, modified: &Carrier) -> f64 {
    analysis::analyze(original, modified)
}

/// Compare two carriers with full diagnostics (powers, changed samples).
pub fn analyze_with_diagnostics(original: &Carrier, modified: &Carrier) -> QualityReport {
    #[cfg(feature = "parallel")]
    {
        parallel::compare_parallel(original.samples(), modified.samples())
    }
    #[cfg(not(feature = "parallel"))]
    {
        analysis::compare(original.samples(), modified.samples())
    }
}
