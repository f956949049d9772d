use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{
    audio::AnalysisConfig,
    error::{ConfigError, Result},
};

/// Main configuration for beatmapper
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Loudness frames per second of audio
    pub fps: f64,

    /// Beat/tempo analysis settings
    pub analysis: AnalysisConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            fps: 60.0,
            analysis: AnalysisConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;

        let config: Config = toml::from_str(&content).map_err(|_| ConfigError::ParseFailed {
            path: path.display().to_string(),
        })?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::InvalidValue {
            key: "config".to_string(),
            value: e.to_string(),
        })?;

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if !self.fps.is_finite() || self.fps <= 0.0 {
            return Err(ConfigError::InvalidValue {
                key: "fps".to_string(),
                value: self.fps.to_string(),
            }
            .into());
        }

        self.analysis.validate().map_err(|message| ConfigError::InvalidValue {
            key: "analysis".to_string(),
            value: message,
        })?;

        Ok(())
    }
}
