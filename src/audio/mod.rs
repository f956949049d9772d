//! # Audio Analysis Module
//!
//! Provides the beat/tempo analysis pipeline: mono downmixing, per-frame
//! loudness extraction, adaptive peak detection and histogram-voting tempo
//! estimation over a complete decoded waveform.
//!
//! ## Core Features
//!
//! - **Loudness Curve**: per-frame RMS, normalized to [0, 1]
//! - **Peak Detection**: adaptive moving-average threshold with local-maximum confirmation
//! - **Tempo Estimation**: pairwise interval voting folded into a canonical BPM octave
//!
//! ## Usage
//!
//! ```rust,no_run
//! use beatmapper::audio::{BeatAnalyzer, WavLoader};
//!
//! # fn main() -> anyhow::Result<()> {
//! // Load audio file
//! let waveform = WavLoader::load("song.wav")?;
//!
//! // Analyze at 60 loudness frames per second
//! let analyzer = BeatAnalyzer::new();
//! let analysis = analyzer.analyze(&waveform, 60.0)?;
//!
//! println!("Detected BPM: {:?}", analysis.bpm);
//! println!("Found {} peaks", analysis.peaks.len());
//! # Ok(())
//! # }
//! ```

pub mod analyzer;
pub mod loader;
pub mod types;

pub use analyzer::{analyze, BeatAnalyzer};
pub use loader::WavLoader;
pub use types::{AnalysisConfig, AnalysisResult, Waveform};
