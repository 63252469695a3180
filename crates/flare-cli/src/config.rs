//! `flare.toml`: one table per effect layer

use flare_audio::MusicConfig;
use flare_core::Result;
use flare_particles::ParticleConfig;
use flare_wings::WingConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlareConfig {
    pub particles: ParticleConfig,
    pub music: MusicConfig,
    pub wings: WingConfig,
}

impl FlareConfig {
    pub fn from_toml_str(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        self.particles.validate()?;
        self.music.validate()?;
        self.wings.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_is_default() {
        let config = FlareConfig::from_toml_str("").unwrap();
        assert_eq!(config, FlareConfig::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_dump_parses_back() {
        let dumped = FlareConfig::default().to_toml_string().unwrap();
        assert!(dumped.contains("[particles]"));
        assert!(dumped.contains("[music]"));
        assert!(dumped.contains("[wings]"));
        assert_eq!(
            FlareConfig::from_toml_str(&dumped).unwrap(),
            FlareConfig::default()
        );
    }

    #[test]
    fn test_sections_override_independently() {
        let config = FlareConfig::from_toml_str(
            r#"
            [particles]
            capacity = 120

            [wings]
            player = "rover"
            "#,
        )
        .unwrap();
        assert_eq!(config.particles.capacity, 120);
        assert_eq!(config.particles.ambient_count, 50);
        assert_eq!(config.wings.player, "rover");
        assert_eq!(config.music, MusicConfig::default());
    }

    #[test]
    fn test_invalid_section_fails_validation() {
        let config = FlareConfig::from_toml_str("[music]\nbpm = 0.0").unwrap();
        assert!(config.validate().is_err());
    }
}
