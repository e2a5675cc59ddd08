//! WAV file I/O for carriers.

use std::path::Path;

use anyhow::{Context, Result, bail};
use stegwav_core::{Carrier, CarrierFormat};

/// Read a WAV file as a carrier.
///
/// Integer files keep their sample width. Float files are clamped and
/// converted to 16-bit samples.
pub fn read(path: &Path) -> Result<Carrier> {
    let reader = hound::WavReader::open(path)
        .with_context(|| format!("failed to open {}", path.display()))?;
    let spec = reader.spec();

    let carrier = match spec.sample_format {
        hound::SampleFormat::Float => {
            let samples = reader
                .into_samples::<f32>()
                .collect::<Result<Vec<f32>, _>>()
                .with_context(|| format!("failed to read samples from {}", path.display()))?;
            tracing::info!(
                path = %path.display(),
                bits = spec.bits_per_sample,
                "float input converted to 16-bit"
            );
            Carrier::from_f32(&samples, spec.channels, spec.sample_rate)?
        }
        hound::SampleFormat::Int => {
            let samples = reader
                .into_samples::<i32>()
                .collect::<Result<Vec<i32>, _>>()
                .with_context(|| format!("failed to read samples from {}", path.display()))?;
            let format = CarrierFormat {
                channels: spec.channels,
                sample_rate: spec.sample_rate,
                bits_per_sample: spec.bits_per_sample,
            };
            Carrier::new(samples, format)?
        }
    };
    if carrier.is_empty() {
        bail!("{} contains no samples", path.display());
    }
    Ok(carrier)
}

/// Write a carrier as an integer WAV file at its own sample width.
pub fn write(path: &Path, carrier: &Carrier) -> Result<()> {
    let format = carrier.format();
    let spec = hound::WavSpec {
        channels: format.channels,
        sample_rate: format.sample_rate,
        bits_per_sample: format.bits_per_sample,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec)
        .with_context(|| format!("failed to create {}", path.display()))?;
    for &s in carrier.samples() {
        writer.write_sample(s)?;
    }
    writer
        .finalize()
        .with_context(|| format!("failed to finalize {}", path.display()))?;
    Ok(())
}

/// Size of the file at `path` in bytes, used to match similar carriers.
pub fn file_size(path: &Path) -> Result<u64> {
    let meta =
        std::fs::metadata(path).with_context(|| format!("failed to stat {}", path.display()))?;
    Ok(meta.len())
}

/// Identifier recorded in the attempt log: the file name without directories.
pub fn carrier_id(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(len: usize) -> Carrier {
        let samples: Vec<i16> = (0..len).map(|i| (i as i16).wrapping_mul(97)).collect();
        Carrier::from_i16(&samples, 1, 8000).unwrap()
    }

    #[test]
    fn int_round_trip_keeps_samples() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ramp.wav");
        let carrier = ramp(500);
        write(&path, &carrier).unwrap();
        assert_eq!(read(&path).unwrap(), carrier);
        assert!(file_size(&path).unwrap() > 1000);
    }

    #[test]
    fn float_input_becomes_16_bit() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("float.wav");
        let spec = hound::WavSpec {
            channels: 2,
            sample_rate: 22050,
            bits_per_sample: 32,
            sample_format: hound::SampleFormat::Float,
        };
        let mut writer = hound::WavWriter::create(&path, spec).unwrap();
        for s in [0.5f32, -0.5, 1.5, -1.5] {
            writer.write_sample(s).unwrap();
        }
        writer.finalize().unwrap();

        let carrier = read(&path).unwrap();
        assert_eq!(carrier.format().bits_per_sample, 16);
        assert_eq!(carrier.format().channels, 2);
        assert_eq!(carrier.samples(), &[16383, -16383, 32767, -32767]);
    }

    #[test]
    fn empty_file_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.wav");
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: 8000,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        hound::WavWriter::create(&path, spec).unwrap().finalize().unwrap();
        assert!(read(&path).is_err());
    }

    #[test]
    fn carrier_id_is_file_name() {
        assert_eq!(carrier_id(Path::new("/tmp/a/song.wav")), "song.wav");
    }
}
