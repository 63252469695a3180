//! Music layer configuration (the `[music]` table of `flare.toml`)

use crate::sequencer::LEAD_PROBABILITY;
use flare_core::{FlareError, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MusicConfig {
    /// Master volume applied when the audio unlocks, linear `[0, 1]`
    pub volume: f32,
    /// Starting intensity, `[0, 1]`
    pub intensity: f32,
    /// Tempo in quarter notes per minute
    pub bpm: f64,
    /// Start the ambient music as soon as the first input unlocks audio
    pub autostart: bool,
    /// Chance each lead step sounds
    pub lead_probability: f64,
    /// Never open an audio device
    pub silent: bool,
    pub seed: u64,
}

impl Default for MusicConfig {
    fn default() -> Self {
        Self {
            volume: 0.7,
            intensity: 0.5,
            bpm: 120.0,
            autostart: true,
            lead_probability: LEAD_PROBABILITY,
            silent: false,
            seed: 0x5EED,
        }
    }
}

impl MusicConfig {
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.volume) {
            return Err(FlareError::ConfigError(format!(
                "music.volume must be within [0, 1], got {}",
                self.volume
            )));
        }
        if !(0.0..=1.0).contains(&self.intensity) {
            return Err(FlareError::ConfigError(format!(
                "music.intensity must be within [0, 1], got {}",
                self.intensity
            )));
        }
        if !self.bpm.is_finite() || self.bpm <= 0.0 {
            return Err(FlareError::ConfigError(format!(
                "music.bpm must be positive, got {}",
                self.bpm
            )));
        }
        if !(0.0..=1.0).contains(&self.lead_probability) {
            return Err(FlareError::ConfigError(format!(
                "music.lead_probability must be within [0, 1], got {}",
                self.lead_probability
            )));
        }
        Ok(())
    }
}
