use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::{info, Level};

use beatmapper::{config::Config, BeatAnalyzer, WavLoader};

#[derive(Parser)]
#[command(
    name = "beatmapper",
    version,
    about = "Analyze an audio track into a beat/tempo map",
    long_about = "Beatmapper extracts a normalized loudness curve, beat-like peak timestamps and an estimated tempo from a decoded audio track, for consumption by rhythm-driven gameplay or visualization."
)]
struct Cli {
    /// Audio file path (WAV; decode compressed formats first)
    input: PathBuf,

    /// Loudness frames per second (overrides the configuration file)
    #[arg(short, long)]
    fps: Option<f64>,

    /// Configuration file (optional)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write the full analysis as JSON to this path
    #[arg(short, long)]
    json: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .init();

    info!("Starting beatmapper v{}", env!("CARGO_PKG_VERSION"));
    info!("Input: {:?}", cli.input);

    // Load configuration
    let mut config = match cli.config {
        Some(config_path) => {
            info!("Loading configuration from {:?}", config_path);
            Config::from_file(&config_path)?
        }
        None => {
            info!("Using default configuration");
            Config::default()
        }
    };

    if let Some(fps) = cli.fps {
        config.fps = fps;
    }
    config.validate()?;

    let waveform = WavLoader::load(&cli.input)?;
    info!(
        "Loaded {:.1}s of audio ({} Hz, {} channel(s))",
        waveform.duration(),
        waveform.sample_rate,
        waveform.channel_count()
    );

    let analyzer = BeatAnalyzer::with_config(config.analysis);
    let analysis = analyzer.analyze(&waveform, config.fps)?;

    info!(
        "Loudness curve: {} frames of {} samples",
        analysis.intensities.len(),
        analysis.frame_size
    );
    info!("Peaks: {}", analysis.peaks.len());
    match analysis.bpm {
        Some(bpm) => info!("Estimated tempo: {bpm:.0} BPM"),
        None => info!("Estimated tempo: not enough peaks"),
    }

    if let Some(json_path) = cli.json {
        let content = serde_json::to_string_pretty(&analysis)?;
        std::fs::write(&json_path, content)?;
        info!("Analysis written to {:?}", json_path);
    }

    Ok(())
}
