use std::sync::Arc;

use tracing::debug;

use crate::config::HeuristicConfig;
use crate::error::Result;
use crate::history::{AttemptLog, AttemptRecord};

/// Recommends a bit depth from past embedding attempts on similarly sized
/// carriers.
///
/// The recommendation is advisory: a carrier can still be too small for the
/// suggested depth, so callers must handle [`crate::Error::Capacity`].
#[derive(Clone)]
pub struct AdaptiveHeuristic {
    log: Arc<dyn AttemptLog>,
    config: HeuristicConfig,
}

impl AdaptiveHeuristic {
    pub fn new(log: Arc<dyn AttemptLog>) -> Self {
        Self::with_config(log, HeuristicConfig::default())
    }

    pub fn with_config(log: Arc<dyn AttemptLog>, config: HeuristicConfig) -> Self {
        Self { log, config }
    }

    pub fn config(&self) -> &HeuristicConfig {
        &self.config
    }

    pub fn log(&self) -> &dyn AttemptLog {
        self.log.as_ref()
    }

    /// Append an attempt to the log.
    pub fn record(&self, record: AttemptRecord) -> Result<()> {
        debug!(
            carrier = %record.carrier_id,
            size = record.size,
            bit_depth = record.bit_depth,
            success = record.success,
            "recording attempt"
        );
        self.log.append(record)
    }

    /// Largest bit depth that previously succeeded above the quality
    /// threshold on a carrier of similar size, or the fallback depth.
    pub fn suggest(&self, size: u64) -> u32 {
        let window = self.config.size_window;
        let relevant = self
            .log
            .query(&|r: &AttemptRecord| r.success && r.size.abs_diff(size) < window);

        let min_quality = self.config.min_quality_db;
        let suggestion = relevant
            .iter()
            .filter(|r| r.quality.is_some_and(|q| q > min_quality))
            .map(|r| r.bit_depth)
            .fold(self.config.fallback_bit_depth, u32::max);

        debug!(size, relevant = relevant.len(), suggestion, "bit depth suggested");
        suggestion
    }
}

impl std::fmt::Debug for AdaptiveHeuristic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdaptiveHeuristic")
            .field("records", &self.log.records().len())
            .field("config", &self.config)
            .finish()
    }
}
