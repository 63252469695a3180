//! Wing feature configuration (the `[wings]` table of `flare.toml`)

use flare_core::{FlareError, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WingConfig {
    /// Name of the entity the wings attach to
    pub player: String,
    /// Flap frequency factor
    pub flap_speed: f32,
    /// Wing yaw while dashing, radians
    pub wing_spread: f32,
    /// Seconds after a dash ends before the wings disappear
    pub hide_delay: f64,
    /// Points in the wing trail
    pub trail_length: usize,
    pub seed: u64,
}

impl Default for WingConfig {
    fn default() -> Self {
        Self {
            player: "martian".into(),
            flap_speed: 0.1,
            wing_spread: 0.8,
            hide_delay: 0.5,
            trail_length: 20,
            seed: 0xF1A9,
        }
    }
}

impl WingConfig {
    pub fn validate(&self) -> Result<()> {
        if self.player.is_empty() {
            return Err(FlareError::ConfigError("wings.player must not be empty".into()));
        }
        if self.trail_length == 0 {
            return Err(FlareError::ConfigError(
                "wings.trail_length must be at least 1".into(),
            ));
        }
        if !self.hide_delay.is_finite() || self.hide_delay < 0.0 {
            return Err(FlareError::ConfigError(format!(
                "wings.hide_delay must be non-negative, got {}",
                self.hide_delay
            )));
        }
        if !self.flap_speed.is_finite() || !self.wing_spread.is_finite() {
            return Err(FlareError::ConfigError(
                "wings.flap_speed and wings.wing_spread must be finite".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        let config: WingConfig = toml::from_str("").unwrap();
        assert_eq!(config.player, "martian");
        assert_eq!(config.trail_length, 20);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_empty_trail() {
        let config: WingConfig = toml::from_str("trail_length = 0").unwrap();
        assert!(matches!(config.validate(), Err(FlareError::ConfigError(_))));
    }
}
