use crate::audio::types::{AnalysisConfig, AnalysisResult, Waveform};
use crate::error::{AudioError, Result};

/// Core beat analyzer implementing loudness extraction, peak detection and
/// tempo estimation over a complete decoded waveform
pub struct BeatAnalyzer {
    config: AnalysisConfig,
}

impl BeatAnalyzer {
    /// Create a new analyzer with default configuration
    pub fn new() -> Self {
        Self::with_config(AnalysisConfig::default())
    }

    /// Create a new analyzer with custom configuration
    pub fn with_config(config: AnalysisConfig) -> Self {
        Self { config }
    }

    /// Perform the full beat/tempo analysis
    ///
    /// `fps` is the loudness frame rate of the output: the waveform is cut
    /// into `round(sample_rate / fps)` sample frames, so one intensity value
    /// covers roughly one output frame of the consumer.
    pub fn analyze(&self, waveform: &Waveform, fps: f64) -> Result<AnalysisResult> {
        self.config
            .validate()
            .map_err(|e| AudioError::InvalidParameters { details: e })?;
        validate_call(waveform, fps)?;

        tracing::info!("Starting beat analysis for {:.1} seconds of audio", waveform.duration());
        tracing::info!(
            "Sample rate: {} Hz, Channels: {}",
            waveform.sample_rate,
            waveform.channel_count()
        );

        let frame_size = frame_size(waveform.sample_rate, fps);

        tracing::debug!("Extracting frame loudness ({} samples per frame)...", frame_size);
        let mono = waveform.mono();
        let mut intensities = frame_intensities(&mono, frame_size);
        normalize(&mut intensities);

        tracing::debug!("Detecting peaks over {} frames...", intensities.len());
        let peaks = self.detect_peaks(&intensities, fps);

        tracing::debug!("Voting tempo from {} peaks...", peaks.len());
        let bpm = self.estimate_tempo(&peaks);

        tracing::info!(
            "Analysis complete: {} peaks detected, BPM: {}",
            peaks.len(),
            bpm.map_or_else(|| "n/a".to_string(), |value| format!("{value:.0}"))
        );

        Ok(AnalysisResult {
            sample_rate: waveform.sample_rate,
            duration: waveform.duration(),
            intensities,
            frame_size,
            peaks,
            bpm,
        })
    }

    /// Scan the normalized loudness curve for beat-like peaks
    ///
    /// A frame qualifies when it rises above an adaptive threshold (a
    /// trailing moving average scaled by the configured gain) and no frame
    /// within the confirmation window carries a strictly larger value. The
    /// adaptive threshold follows loud and quiet song sections; the window
    /// suppresses closely spaced spurious maxima.
    fn detect_peaks(&self, intensities: &[f32], fps: f64) -> Vec<f64> {
        let avg_window = window_frames(fps, self.config.average_window_secs);
        let peak_window = window_frames(fps, self.config.peak_window_secs);
        let gain = self.config.threshold_gain as f64;

        let mut peaks = Vec::new();
        let mut trailing_sum = 0.0f64;

        for (i, &intensity) in intensities.iter().enumerate() {
            // Trailing average including the current frame; the window
            // shrinks near the start of the curve.
            trailing_sum += intensity as f64;
            if i >= avg_window {
                trailing_sum -= intensities[i - avg_window] as f64;
            }
            let average = trailing_sum / (i + 1).min(avg_window) as f64;

            if (intensity as f64) <= average * gain {
                continue;
            }

            let start = i.saturating_sub(peak_window);
            let end = (i + peak_window).min(intensities.len() - 1);
            // Earlier frames win exact ties so a flat plateau yields one peak.
            let confirmed = intensities[start..i].iter().all(|&other| other < intensity)
                && intensities[i..=end].iter().all(|&other| other <= intensity);

            if confirmed {
                peaks.push(i as f64 / fps);
            }
        }

        peaks
    }

    /// Vote a tempo from pairwise peak intervals
    ///
    /// Every peak is paired with its next few neighbors; each interval casts
    /// a vote for its implied BPM after folding into the canonical octave.
    /// Voting over many pairs tolerates octave errors and a fraction of
    /// missed or spurious peaks.
    fn estimate_tempo(&self, peaks: &[f64]) -> Option<f32> {
        if peaks.len() < self.config.min_peaks {
            return None;
        }

        let min_bpm = self.config.min_bpm as f64;
        let max_bpm = self.config.max_bpm as f64;

        // Insertion-ordered vote table so count ties resolve to the
        // candidate encountered first in the scan.
        let mut votes: Vec<(u32, u32)> = Vec::new();

        for (i, &earlier) in peaks.iter().enumerate() {
            for &later in peaks.iter().skip(i + 1).take(self.config.interval_span) {
                let interval = later - earlier;
                if interval <= 0.0 {
                    continue;
                }

                let mut bpm = 60.0 / interval;
                while bpm < min_bpm {
                    bpm *= 2.0;
                }
                while bpm > max_bpm {
                    bpm /= 2.0;
                }

                let candidate = bpm.round() as u32;
                match votes.iter_mut().find(|(value, _)| *value == candidate) {
                    Some((_, count)) => *count += 1,
                    None => votes.push((candidate, 1)),
                }
            }
        }

        let mut best: Option<(u32, u32)> = None;
        for &(candidate, count) in &votes {
            match best {
                Some((_, best_count)) if count <= best_count => {}
                _ => best = Some((candidate, count)),
            }
        }

        best.map(|(candidate, _)| candidate as f32)
    }
}

impl Default for BeatAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

/// Analyze a waveform with the default configuration
pub fn analyze(waveform: &Waveform, fps: f64) -> Result<AnalysisResult> {
    BeatAnalyzer::new().analyze(waveform, fps)
}

fn validate_call(waveform: &Waveform, fps: f64) -> Result<()> {
    if waveform.sample_rate == 0 {
        return Err(AudioError::InvalidWaveform {
            details: "sample rate must be positive".to_string(),
        }
        .into());
    }

    let expected = waveform.len();
    if waveform.channels.iter().any(|channel| channel.len() != expected) {
        return Err(AudioError::InvalidWaveform {
            details: "all channels must hold the same number of samples".to_string(),
        }
        .into());
    }

    if !fps.is_finite() || fps <= 0.0 {
        return Err(AudioError::InvalidParameters {
            details: format!("frame rate must be positive, got {fps}"),
        }
        .into());
    }

    Ok(())
}

/// Samples per loudness frame for a given analysis frame rate
fn frame_size(sample_rate: u32, fps: f64) -> usize {
    (sample_rate as f64 / fps).round().max(1.0) as usize
}

/// Frames spanning a window of `secs` seconds at the given frame rate
fn window_frames(fps: f64, secs: f64) -> usize {
    (fps * secs).round().max(1.0) as usize
}

/// RMS loudness per non-overlapping frame; the last frame may be shorter
fn frame_intensities(mono: &[f32], frame_size: usize) -> Vec<f32> {
    mono.chunks(frame_size)
        .map(|frame| (frame.iter().map(|&x| x * x).sum::<f32>() / frame.len() as f32).sqrt())
        .collect()
}

/// Scale a non-negative sequence into [0, 1] by its maximum
fn normalize(values: &mut [f32]) {
    let max = values.iter().fold(0.0f32, |acc, &value| acc.max(value));
    if max == 0.0 {
        values.fill(0.0);
        return;
    }

    for value in values.iter_mut() {
        *value /= max;
    }
}
