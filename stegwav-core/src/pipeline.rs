//! Cipher stages composed with the LSB codec.
//!
//! [`conceal`] and [`reveal`] are the stateless building blocks. A
//! [`Watermarker`] adds scoring and attempt bookkeeping on top: every embed,
//! successful or not, lands in the attempt log before the result is returned.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::analysis::{self, QualityReport};
use crate::carrier::Carrier;
use crate::config::{CodecConfig, HeuristicConfig};
use crate::embed;
use crate::error::Result;
use crate::extract;
use crate::heuristic::AdaptiveHeuristic;
use crate::history::{AttemptLog, AttemptRecord};
use crate::key::CipherKey;

/// A carrier holding an encrypted message.
#[derive(Debug, Clone)]
pub struct Concealed {
    pub carrier: Carrier,
    /// The ciphertext that was embedded.
    pub ciphertext: String,
    /// Frame bits written, length prefix included.
    pub bits_embedded: usize,
}

/// A message recovered from a carrier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Revealed {
    /// Ciphertext read from the carrier.
    pub ciphertext: String,
    /// Decrypted message, uppercase with filler letters still in place.
    pub message: String,
}

/// Encrypt `message` with both cipher stages and embed the ciphertext.
pub fn conceal(
    carrier: &Carrier,
    key: &CipherKey,
    message: &str,
    config: &CodecConfig,
) -> Result<Concealed> {
    let ciphertext = key.encrypt(message);
    debug!(
        plaintext_len = message.len(),
        ciphertext_len = ciphertext.len(),
        "message encrypted"
    );
    let embedded = embed::embed(carrier, &ciphertext, config)?;
    Ok(Concealed {
        carrier: embedded.carrier,
        ciphertext,
        bits_embedded: embedded.bits_embedded,
    })
}

/// Extract the ciphertext and undo both cipher stages.
pub fn reveal(carrier: &Carrier, key: &CipherKey, config: &CodecConfig) -> Result<Revealed> {
    let ciphertext = extract::extract(carrier, config)?;
    let message = key.decrypt(&ciphertext)?;
    Ok(Revealed {
        ciphertext,
        message,
    })
}

/// Outcome of a recorded embed.
#[derive(Debug, Clone)]
pub struct EmbedReport {
    pub carrier: Carrier,
    pub ciphertext: String,
    pub bits_embedded: usize,
    pub bit_depth: u32,
    pub quality: QualityReport,
}

/// Embeds messages and learns which bit depths work for which carrier sizes.
#[derive(Debug, Clone)]
pub struct Watermarker {
    heuristic: AdaptiveHeuristic,
}

impl Watermarker {
    pub fn new(log: Arc<dyn AttemptLog>) -> Self {
        Self::with_heuristic(AdaptiveHeuristic::new(log))
    }

    pub fn with_config(log: Arc<dyn AttemptLog>, config: HeuristicConfig) -> Self {
        Self::with_heuristic(AdaptiveHeuristic::with_config(log, config))
    }

    pub fn with_heuristic(heuristic: AdaptiveHeuristic) -> Self {
        Self { heuristic }
    }

    pub fn heuristic(&self) -> &AdaptiveHeuristic {
        &self.heuristic
    }

    /// Advisory bit depth for a carrier of `carrier_size` bytes.
    pub fn suggest_bit_depth(&self, carrier_size: u64) -> u32 {
        self.heuristic.suggest(carrier_size)
    }

    /// Conceal `message`, score the result against the original carrier and
    /// record the attempt.
    ///
    /// A failed embed is recorded with no quality score before its error is
    /// returned. A failure to persist the record is returned as
    /// [`crate::Error::Persistence`].
    pub fn embed(
        &self,
        carrier_id: &str,
        carrier_size: u64,
        carrier: &Carrier,
        key: &CipherKey,
        message: &str,
        bit_depth: u32,
    ) -> Result<EmbedReport> {
        let config = CodecConfig::with_bit_depth(bit_depth);
        let concealed = match conceal(carrier, key, message, &config) {
            Ok(concealed) => concealed,
            Err(e) => {
                warn!(carrier = carrier_id, bit_depth, error = %e, "embed failed");
                if let Err(log_err) = self
                    .heuristic
                    .record(AttemptRecord::failure(carrier_id, carrier_size, bit_depth))
                {
                    warn!(error = %log_err, "failed to record embed failure");
                }
                return Err(e);
            }
        };

        let quality = analysis::compare(carrier.samples(), concealed.carrier.samples());
        self.heuristic.record(AttemptRecord::success(
            carrier_id,
            carrier_size,
            bit_depth,
            quality.snr_db,
        ))?;

        Ok(EmbedReport {
            carrier: concealed.carrier,
            ciphertext: concealed.ciphertext,
            bits_embedded: concealed.bits_embedded,
            bit_depth,
            quality,
        })
    }

    /// Embed at the suggested bit depth for `carrier_size`.
    pub fn embed_suggested(
        &self,
        carrier_id: &str,
        carrier_size: u64,
        carrier: &Carrier,
        key: &CipherKey,
        message: &str,
    ) -> Result<EmbedReport> {
        let bit_depth = self.suggest_bit_depth(carrier_size);
        self.embed(carrier_id, carrier_size, carrier, key, message, bit_depth)
    }

    /// Reveal a message. Extraction is not recorded.
    pub fn extract(&self, carrier: &Carrier, key: &CipherKey, bit_depth: u32) -> Result<Revealed> {
        reveal(carrier, key, &CodecConfig::with_bit_depth(bit_depth))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::history::MemoryLog;

    fn carrier(len: usize) -> Carrier {
        let samples: Vec<i16> = (0..len)
            .map(|i| ((i as f32 * 0.01).sin() * 20_000.0) as i16)
            .collect();
        Carrier::from_i16(&samples, 1, 44100).unwrap()
    }

    #[test]
    fn conceal_reveal_round_trip() {
        let key = CipherKey::new("MONARCHY", 3).unwrap();
        let config = CodecConfig::with_bit_depth(2);
        let concealed = conceal(&carrier(2000), &key, "instruments", &config).unwrap();
        assert_eq!(concealed.bits_embedded, 32 + 12 * 8);

        let revealed = reveal(&concealed.carrier, &key, &config).unwrap();
        assert_eq!(revealed.ciphertext, concealed.ciphertext);
        assert_eq!(revealed.message, "INSTRUMENTSX");
    }

    #[test]
    fn wrong_rail_count_garbles() {
        let key = CipherKey::new("MONARCHY", 3).unwrap();
        let other = CipherKey::new("MONARCHY", 4).unwrap();
        let config = CodecConfig::default();
        let concealed = conceal(&carrier(2000), &key, "attack at dawn", &config).unwrap();
        let revealed = reveal(&concealed.carrier, &other, &config).unwrap();
        assert_ne!(revealed.message, "ATTACKATDAWN");
    }

    #[test]
    fn records_success_with_quality() {
        let log = Arc::new(MemoryLog::new());
        let wm = Watermarker::new(log.clone());
        let key = CipherKey::new("KEY", 2).unwrap();

        let report = wm.embed("a.wav", 4000, &carrier(2000), &key, "hello", 1).unwrap();
        assert!(report.quality.snr_db > 40.0);

        let records = log.records();
        assert_eq!(records.len(), 1);
        assert!(records[0].success);
        assert_eq!(records[0].bit_depth, 1);
        assert_eq!(records[0].quality, Some(report.quality.snr_db));
    }

    #[test]
    fn records_failure_before_returning_error() {
        let log = Arc::new(MemoryLog::new());
        let wm = Watermarker::new(log.clone());
        let key = CipherKey::new("KEY", 2).unwrap();

        let result = wm.embed("tiny.wav", 100, &carrier(10), &key, "too long", 1);
        assert!(matches!(result, Err(Error::Capacity { .. })));

        let records = log.records();
        assert_eq!(records.len(), 1);
        assert!(!records[0].success);
        assert_eq!(records[0].quality, None);
        assert_eq!(records[0].size, 100);
    }

    #[test]
    fn suggestion_follows_history() {
        let log = Arc::new(MemoryLog::new());
        let wm = Watermarker::new(log);
        let key = CipherKey::new("KEY", 2).unwrap();
        let cover = carrier(5000);

        assert_eq!(wm.suggest_bit_depth(10_000), 1);
        wm.embed("a.wav", 10_000, &cover, &key, "message", 2).unwrap();
        assert_eq!(wm.suggest_bit_depth(10_000), 2);

        let report = wm.embed_suggested("b.wav", 10_000, &cover, &key, "message").unwrap();
        assert_eq!(report.bit_depth, 2);
        let revealed = wm.extract(&report.carrier, &key, 2).unwrap();
        assert_eq!(revealed.message, "MESXSAGE");
    }
}
