//! Optional parallel processing using rayon.
//!
//! Enable with the `parallel` feature flag. Provides [`compare_parallel`] and
//! [`quality_parallel`], which split the power sums over long carriers across
//! threads. Results match the serial versions up to floating-point summation
//! order.

use rayon::prelude::*;

use crate::analysis::{Powers, QualityReport};

/// Number of samples summed per rayon task.
const BATCH_SIZE: usize = 16 * 1024;

/// Parallel version of [`crate::analysis::compare`].
pub fn compare_parallel(original: &[i32], modified: &[i32]) -> QualityReport {
    let compared = original.len().min(modified.len());
    original[..compared]
        .par_chunks(BATCH_SIZE)
        .zip(modified[..compared].par_chunks(BATCH_SIZE))
        .map(|(a, b)| {
            a.iter()
                .zip(b)
                .map(|(&x, &y)| Powers::of(x, y))
                .fold(Powers::default(), Powers::merge)
        })
        .reduce(Powers::default, Powers::merge)
        .into_report(compared)
}

/// Parallel version of [`crate::analysis::quality`].
pub fn quality_parallel(original: &[i32], modified: &[i32]) -> f64 {
    compare_parallel(original, modified).snr_db
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::compare;

    #[test]
    fn matches_serial() {
        let original: Vec<i32> = (0..100_000).map(|i| ((i * 37) % 20_000) - 10_000).collect();
        let modified: Vec<i32> = original.iter().map(|&s| s ^ 1).collect();
        let serial = compare(&original, &modified);
        let parallel = compare_parallel(&original, &modified);
        assert_eq!(serial.changed, parallel.changed);
        assert_eq!(serial.peak_diff, parallel.peak_diff);
        assert!((serial.snr_db - parallel.snr_db).abs() < 1e-9);
    }

    #[test]
    fn identical_is_lossless() {
        let buf = vec![5i32; 50_000];
        assert!(compare_parallel(&buf, &buf).is_lossless());
    }
}
