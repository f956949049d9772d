use std::path::Path;

use crate::audio::types::Waveform;
use crate::error::{AudioError, Result};

/// WAV file loader for the command-line front-end
///
/// Decoding is a collaborator concern, not part of the analysis core; this
/// loader exists so the pipeline can be exercised end to end on real files.
/// Compressed formats must be decoded to WAV beforehand.
pub struct WavLoader;

impl WavLoader {
    /// Load a WAV file into a per-channel waveform
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Waveform> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("")
            .to_lowercase();

        if extension != "wav" {
            return Err(AudioError::UnsupportedFormat { format: extension }.into());
        }

        let reader = hound::WavReader::open(path).map_err(|_| AudioError::LoadFailed {
            path: path.display().to_string(),
        })?;

        let spec = reader.spec();

        let interleaved: Vec<f32> = match spec.sample_format {
            hound::SampleFormat::Float => reader
                .into_samples::<f32>()
                .collect::<std::result::Result<Vec<_>, _>>()
                .map_err(|_| AudioError::LoadFailed {
                    path: path.display().to_string(),
                })?,
            hound::SampleFormat::Int => {
                let bit_depth = spec.bits_per_sample;
                let samples: std::result::Result<Vec<i32>, _> = reader.into_samples().collect();

                samples
                    .map_err(|_| AudioError::LoadFailed {
                        path: path.display().to_string(),
                    })?
                    .into_iter()
                    .map(|sample| Self::int_to_float(sample, bit_depth))
                    .collect()
            }
        };

        Ok(Self::deinterleave(
            interleaved,
            spec.channels as usize,
            spec.sample_rate,
        ))
    }

    /// Split an interleaved sample stream into per-channel buffers
    fn deinterleave(interleaved: Vec<f32>, channel_count: usize, sample_rate: u32) -> Waveform {
        if channel_count <= 1 {
            return Waveform::new(vec![interleaved], sample_rate);
        }

        let frames = interleaved.len() / channel_count;
        let mut channels: Vec<Vec<f32>> = (0..channel_count)
            .map(|_| Vec::with_capacity(frames))
            .collect();

        for frame in interleaved.chunks_exact(channel_count) {
            for (channel, &sample) in channels.iter_mut().zip(frame) {
                channel.push(sample);
            }
        }

        Waveform::new(channels, sample_rate)
    }

    /// Convert integer sample to float (-1.0 to 1.0)
    fn int_to_float(sample: i32, bit_depth: u16) -> f32 {
        match bit_depth {
            8 => (sample as f32 - 128.0) / 128.0,
            16 => sample as f32 / 32768.0,
            24 => sample as f32 / 8388608.0,
            32 => sample as f32 / 2147483648.0,
            _ => sample as f32 / 32768.0, // Default to 16-bit
        }
    }

    /// Check if a file format is supported
    pub fn is_format_supported(extension: &str) -> bool {
        extension.eq_ignore_ascii_case("wav")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn write_stereo_wav(path: &Path, left: &[i16], right: &[i16]) {
        let spec = hound::WavSpec {
            channels: 2,
            sample_rate: 44100,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };

        let mut writer = hound::WavWriter::create(path, spec).unwrap();
        for (&l, &r) in left.iter().zip(right) {
            writer.write_sample(l).unwrap();
            writer.write_sample(r).unwrap();
        }
        writer.finalize().unwrap();
    }

    #[test]
    fn test_load_deinterleaves_stereo() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("stereo.wav");
        write_stereo_wav(&path, &[16384, 0, -16384], &[0, 16384, 0]);

        let waveform = WavLoader::load(&path).unwrap();

        assert_eq!(waveform.sample_rate, 44100);
        assert_eq!(waveform.channel_count(), 2);
        assert_eq!(waveform.len(), 3);
        assert_eq!(waveform.channels[0], vec![0.5, 0.0, -0.5]);
        assert_eq!(waveform.channels[1], vec![0.0, 0.5, 0.0]);
    }

    #[test]
    fn test_load_float_wav() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("float.wav");

        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: 48000,
            bits_per_sample: 32,
            sample_format: hound::SampleFormat::Float,
        };
        let mut writer = hound::WavWriter::create(&path, spec).unwrap();
        for &sample in &[0.25f32, -0.75, 1.0] {
            writer.write_sample(sample).unwrap();
        }
        writer.finalize().unwrap();

        let waveform = WavLoader::load(&path).unwrap();

        assert_eq!(waveform.sample_rate, 48000);
        assert_eq!(waveform.channels, vec![vec![0.25, -0.75, 1.0]]);
    }

    #[test]
    fn test_unsupported_format() {
        let result = WavLoader::load("song.mp3");

        assert!(matches!(
            result,
            Err(crate::error::AnalyzerError::Audio(AudioError::UnsupportedFormat { format })) if format == "mp3"
        ));
    }

    #[test]
    fn test_missing_file() {
        let result = WavLoader::load("does-not-exist.wav");
        assert!(matches!(
            result,
            Err(crate::error::AnalyzerError::Audio(AudioError::LoadFailed { .. }))
        ));
    }

    #[test]
    fn test_int_to_float_conversion() {
        assert_eq!(WavLoader::int_to_float(0, 16), 0.0);
        assert_eq!(WavLoader::int_to_float(32767, 16), 32767.0 / 32768.0);
        assert_eq!(WavLoader::int_to_float(-32768, 16), -1.0);

        assert_eq!(WavLoader::int_to_float(128, 8), 0.0);
        assert_eq!(WavLoader::int_to_float(0, 8), -1.0);
    }

    #[test]
    fn test_format_support() {
        assert!(WavLoader::is_format_supported("wav"));
        assert!(WavLoader::is_format_supported("WAV"));
        assert!(!WavLoader::is_format_supported("mp3"));
    }
}
