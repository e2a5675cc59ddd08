use crate::carrier::Carrier;

/// SNR returned when the two buffers are identical.
pub const LOSSLESS: f64 = f64::INFINITY;

/// Signal-to-noise comparison of an original and a modified sample buffer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QualityReport {
    /// 10·log10(signal / noise) in dB, [`LOSSLESS`] when nothing changed.
    pub snr_db: f64,
    /// Sum of squared original samples.
    pub signal_power: f64,
    /// Sum of squared sample differences.
    pub noise_power: f64,
    /// Samples compared (the shorter of the two lengths).
    pub compared: usize,
    /// Samples whose value differs.
    pub changed: usize,
    /// Largest absolute sample difference.
    pub peak_diff: i64,
}

impl QualityReport {
    pub fn is_lossless(&self) -> bool {
        self.noise_power == 0.0
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Powers {
    pub signal: f64,
    pub noise: f64,
    pub changed: usize,
    pub peak_diff: i64,
}

impl Powers {
    pub fn of(original: i32, modified: i32) -> Self {
        let s = f64::from(original);
        let diff = i64::from(original) - i64::from(modified);
        let n = diff as f64;
        Self {
            signal: s * s,
            noise: n * n,
            changed: usize::from(diff != 0),
            peak_diff: diff.abs(),
        }
    }

    pub fn merge(self, other: Self) -> Self {
        Self {
            signal: self.signal + other.signal,
            noise: self.noise + other.noise,
            changed: self.changed + other.changed,
            peak_diff: self.peak_diff.max(other.peak_diff),
        }
    }

    pub fn into_report(self, compared: usize) -> QualityReport {
        QualityReport {
            snr_db: snr_db(self.signal, self.noise),
            signal_power: self.signal,
            noise_power: self.noise,
            compared,
            changed: self.changed,
            peak_diff: self.peak_diff,
        }
    }
}

fn snr_db(signal: f64, noise: f64) -> f64 {
    if noise == 0.0 {
        return LOSSLESS;
    }
    10.0 * (signal / noise).log10()
}

/// Compare two buffers sample by sample.
///
/// Buffers of different length are truncated to the shorter one. Signal power
/// is always taken from `original`.
pub fn compare(original: &[i32], modified: &[i32]) -> QualityReport {
    let compared = original.len().min(modified.len());
    original[..compared]
        .iter()
        .zip(&modified[..compared])
        .map(|(&a, &b)| Powers::of(a, b))
        .fold(Powers::default(), Powers::merge)
        .into_report(compared)
}

/// SNR in dB between `original` and `modified`.
pub fn quality(original: &[i32], modified: &[i32]) -> f64 {
    compare(original, modified).snr_db
}

/// SNR in dB between two carriers.
pub fn analyze(original: &Carrier, modified: &Carrier) -> f64 {
    quality(original.samples(), modified.samples())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_buffers_are_lossless() {
        let buf = vec![100, -200, 300, 0];
        let report = compare(&buf, &buf);
        assert_eq!(report.snr_db, LOSSLESS);
        assert!(report.is_lossless());
        assert_eq!(report.changed, 0);
    }

    #[test]
    fn known_snr() {
        // signal = 4 * 100^2 = 40000, noise = 4 * 1^2 = 4 → 40 dB
        let original = vec![100, -100, 100, -100];
        let modified = vec![101, -99, 99, -101];
        let report = compare(&original, &modified);
        assert!((report.snr_db - 40.0).abs() < 1e-9, "snr = {}", report.snr_db);
        assert_eq!(report.changed, 4);
        assert_eq!(report.peak_diff, 1);
        assert_eq!(report.signal_power, 40_000.0);
        assert_eq!(report.noise_power, 4.0);
    }

    #[test]
    fn signal_power_comes_from_first_argument() {
        let loud = vec![1000, 1000];
        let quiet = vec![10, 10];
        let forward = quality(&loud, &quiet);
        let backward = quality(&quiet, &loud);
        assert!(forward > backward);
        assert!(backward < 0.0);
    }

    #[test]
    fn truncates_to_shorter_buffer() {
        let original = vec![100, 100, 100];
        let modified = vec![100, 100];
        let report = compare(&original, &modified);
        assert_eq!(report.compared, 2);
        assert!(report.is_lossless());
    }

    #[test]
    fn extreme_values_do_not_overflow() {
        let report = compare(&[i32::MIN], &[i32::MAX]);
        assert_eq!(report.peak_diff, u32::MAX as i64);
        assert!(report.snr_db.is_finite());
    }

    #[test]
    fn all_zero_original_with_noise() {
        assert_eq!(quality(&[0, 0], &[1, 1]), f64::NEG_INFINITY);
    }
}
