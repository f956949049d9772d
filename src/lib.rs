//! # Beatmapper
//!
//! Turn decoded audio into beat, loudness and tempo maps for rhythm-driven
//! gameplay and visualization.
//!
//! The analysis is a pure, synchronous computation over a complete waveform:
//! downmix to mono, cut into fixed-duration frames, measure RMS loudness per
//! frame, normalize, pick beat-like peaks with an adaptive threshold, and
//! vote a tempo from pairwise peak intervals. The resulting record is plain
//! data; decoding the audio and consuming the analysis (rendering, input,
//! game logic) are collaborator concerns outside this crate's core.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use beatmapper::{analyze, WavLoader};
//!
//! # fn main() -> anyhow::Result<()> {
//! let waveform = WavLoader::load("song.wav")?;
//! let analysis = analyze(&waveform, 60.0)?;
//!
//! println!("Duration: {:.1}s", analysis.duration);
//! println!("Peaks: {}", analysis.peaks.len());
//! if let Some(bpm) = analysis.bpm {
//!     println!("Tempo: {bpm:.0} BPM");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - [`audio`] - Waveform types, the analysis pipeline and the WAV front-end loader
//! - [`config`] - Configuration management
//! - [`error`] - Error taxonomy
//!
//! ## Custom Tuning
//!
//! The peak-detection windows and the tempo octave are empirical constants;
//! widen or tighten them through [`AnalysisConfig`](audio::AnalysisConfig):
//!
//! ```rust
//! use beatmapper::{AnalysisConfig, BeatAnalyzer};
//!
//! let analyzer = BeatAnalyzer::with_config(AnalysisConfig {
//!     max_bpm: 180.0,
//!     ..Default::default()
//! });
//! ```

pub mod audio;
pub mod config;
pub mod error;

// Re-export commonly used types for convenience
pub use crate::{
    audio::{analyze, AnalysisConfig, AnalysisResult, BeatAnalyzer, WavLoader, Waveform},
    config::Config,
    error::{AnalyzerError, Result},
};
