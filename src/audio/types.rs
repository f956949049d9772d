use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Decoded audio with one sample buffer per channel
#[derive(Debug, Clone)]
pub struct Waveform {
    /// Per-channel sample buffers, all equal length, amplitudes roughly in [-1, 1]
    pub channels: Vec<Vec<f32>>,

    /// Sample rate in Hz
    pub sample_rate: u32,
}

impl Waveform {
    /// Create a waveform from per-channel sample buffers
    pub fn new(channels: Vec<Vec<f32>>, sample_rate: u32) -> Self {
        Self { channels, sample_rate }
    }

    /// Number of samples per channel
    pub fn len(&self) -> usize {
        self.channels.first().map_or(0, Vec::len)
    }

    /// Whether the waveform holds no samples
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of channels
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Duration in seconds at the native sample rate
    pub fn duration(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.len() as f64 / self.sample_rate as f64
    }

    /// Mono mix of all channels
    ///
    /// A single-channel waveform is borrowed as-is; anything else is mixed
    /// down to the per-index arithmetic mean of all channels.
    pub fn mono(&self) -> Cow<'_, [f32]> {
        if self.channels.len() == 1 {
            return Cow::Borrowed(&self.channels[0]);
        }

        let mut mono = vec![0.0f32; self.len()];
        for channel in &self.channels {
            for (acc, &sample) in mono.iter_mut().zip(channel) {
                *acc += sample;
            }
        }

        let channel_count = self.channels.len() as f32;
        for acc in &mut mono {
            *acc /= channel_count;
        }

        Cow::Owned(mono)
    }
}

/// Complete beat/tempo analysis for one track
///
/// Plain data record consumed by gameplay and rendering code; nothing in it
/// refers back to the analyzer that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Sample rate of the analyzed waveform in Hz
    pub sample_rate: u32,

    /// Track duration in seconds
    pub duration: f64,

    /// Normalized per-frame loudness curve, values in [0, 1]
    pub intensities: Vec<f32>,

    /// Samples per loudness frame
    pub frame_size: usize,

    /// Seconds of detected beat-like peaks, strictly increasing
    pub peaks: Vec<f64>,

    /// Estimated tempo in beats per minute, absent when too few peaks were found
    pub bpm: Option<f32>,
}

impl AnalysisResult {
    /// Loudness frames per second of audio
    pub fn frame_rate(&self) -> f64 {
        if self.frame_size == 0 {
            return 0.0;
        }
        self.sample_rate as f64 / self.frame_size as f64
    }

    /// Loudness at a point in time, 0.0 outside the curve
    pub fn intensity_at(&self, time: f64) -> f32 {
        if time < 0.0 {
            return 0.0;
        }
        let index = (time * self.frame_rate()).floor() as usize;
        self.intensities.get(index).copied().unwrap_or(0.0)
    }

    /// Peaks within a time range, inclusive on both ends
    pub fn peaks_in_range(&self, start: f64, end: f64) -> Vec<f64> {
        self.peaks
            .iter()
            .copied()
            .filter(|&peak| peak >= start && peak <= end)
            .collect()
    }

    /// Find the next peak after a given time
    pub fn next_peak_after(&self, time: f64) -> Option<f64> {
        self.peaks.iter().copied().find(|&peak| peak > time)
    }

    /// Beat period implied by the estimated tempo
    pub fn seconds_per_beat(&self) -> Option<f64> {
        self.bpm.map(|bpm| 60.0 / bpm as f64)
    }
}

/// Configuration for beat/tempo analysis
///
/// The defaults reproduce the tuning the analysis was validated with; the
/// window lengths and the tempo octave are empirical and may need adjustment
/// for unusual material.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Multiplier applied to the trailing loudness average to form the peak threshold
    pub threshold_gain: f32,

    /// Length of the trailing loudness average window in seconds
    pub average_window_secs: f64,

    /// Half-width of the local-maximum confirmation window in seconds
    pub peak_window_secs: f64,

    /// Lower edge of the canonical tempo octave (BPM)
    pub min_bpm: f32,

    /// Upper edge of the canonical tempo octave (BPM)
    pub max_bpm: f32,

    /// Minimum number of peaks required before a tempo is reported
    pub min_peaks: usize,

    /// How many following peaks each peak is paired with during tempo voting
    pub interval_span: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            threshold_gain: 1.3,
            average_window_secs: 1.0,
            peak_window_secs: 0.5,
            min_bpm: 60.0,
            max_bpm: 200.0,
            min_peaks: 4,
            interval_span: 8,
        }
    }
}

impl AnalysisConfig {
    /// Validate configuration parameters
    pub fn validate(&self) -> Result<(), String> {
        if !(self.threshold_gain.is_finite() && self.threshold_gain > 0.0) {
            return Err("Threshold gain must be positive and finite".to_string());
        }

        if !(self.average_window_secs.is_finite() && self.average_window_secs > 0.0) {
            return Err("Average window must be positive and finite".to_string());
        }

        if !(self.peak_window_secs.is_finite() && self.peak_window_secs > 0.0) {
            return Err("Peak window must be positive and finite".to_string());
        }

        if !(self.min_bpm.is_finite() && self.min_bpm > 0.0) {
            return Err("Minimum BPM must be positive and finite".to_string());
        }

        // Octave folding only terminates when the range spans at least one octave
        if !self.max_bpm.is_finite() || self.max_bpm < self.min_bpm * 2.0 {
            return Err("Maximum BPM must be at least twice the minimum BPM".to_string());
        }

        if self.min_peaks < 2 {
            return Err("At least 2 peaks are needed to derive an interval".to_string());
        }

        if self.interval_span == 0 {
            return Err("Interval span must be at least 1".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mono_downmix_averages_channels() {
        let waveform = Waveform::new(
            vec![vec![1.0, 2.0, 3.0], vec![2.0, 4.0, 6.0]],
            44100,
        );

        assert_eq!(waveform.mono().as_ref(), &[1.5, 3.0, 4.5]);
    }

    #[test]
    fn test_mono_downmix_cancels_opposed_channels() {
        let waveform = Waveform::new(vec![vec![1.0; 512], vec![-1.0; 512]], 48000);

        assert!(waveform.mono().iter().all(|&sample| sample == 0.0));
    }

    #[test]
    fn test_single_channel_is_borrowed() {
        let waveform = Waveform::new(vec![vec![0.25, -0.5]], 44100);

        assert!(matches!(waveform.mono(), Cow::Borrowed(_)));
    }

    #[test]
    fn test_empty_waveform() {
        let waveform = Waveform::new(vec![], 44100);

        assert_eq!(waveform.len(), 0);
        assert_eq!(waveform.duration(), 0.0);
        assert!(waveform.mono().is_empty());
    }

    #[test]
    fn test_duration_from_sample_rate() {
        let waveform = Waveform::new(vec![vec![0.0; 22050]], 44100);
        assert_eq!(waveform.duration(), 0.5);
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(AnalysisConfig::default().validate().is_ok());
    }

    #[test]
    fn test_config_rejects_narrow_tempo_octave() {
        let config = AnalysisConfig {
            min_bpm: 120.0,
            max_bpm: 180.0,
            ..Default::default()
        };

        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("twice the minimum"));
    }

    #[test]
    fn test_config_rejects_zero_threshold_gain() {
        let config = AnalysisConfig {
            threshold_gain: 0.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    fn sample_result() -> AnalysisResult {
        AnalysisResult {
            sample_rate: 44100,
            duration: 5.0,
            intensities: vec![0.2, 1.0, 0.4, 0.1],
            frame_size: 44100,
            peaks: vec![1.0, 2.5, 4.0],
            bpm: Some(120.0),
        }
    }

    #[test]
    fn test_peaks_in_range() {
        let result = sample_result();
        assert_eq!(result.peaks_in_range(1.5, 3.0), vec![2.5]);
        assert_eq!(result.peaks_in_range(0.0, 5.0).len(), 3);
    }

    #[test]
    fn test_next_peak_after() {
        let result = sample_result();
        assert_eq!(result.next_peak_after(1.0), Some(2.5));
        assert_eq!(result.next_peak_after(4.0), None);
    }

    #[test]
    fn test_intensity_lookup() {
        let result = sample_result();
        // One frame per second at this frame size
        assert_eq!(result.intensity_at(1.2), 1.0);
        assert_eq!(result.intensity_at(-0.1), 0.0);
        assert_eq!(result.intensity_at(99.0), 0.0);
    }

    #[test]
    fn test_seconds_per_beat() {
        let result = sample_result();
        assert_eq!(result.seconds_per_beat(), Some(0.5));
    }
}
