//! Particle layer configuration (the `[particles]` table of `flare.toml`)

use flare_core::{FlareError, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleConfig {
    /// Number of pre-allocated particle slots
    pub capacity: usize,
    /// Drifting motes spawned at initialization
    pub ambient_count: usize,
    /// Size of the box (x, y, z) ambient motes live in, centred on the origin
    pub ambient_extent: [f32; 3],
    /// Seed for spawn jitter
    pub seed: u64,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            capacity: 200,
            ambient_count: 50,
            ambient_extent: [60.0, 30.0, 30.0],
            seed: 0xDEAD_BEEF,
        }
    }
}

impl ParticleConfig {
    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return Err(FlareError::ConfigError(
                "particles.capacity must be at least 1".into(),
            ));
        }
        if self.ambient_count > self.capacity {
            return Err(FlareError::ConfigError(format!(
                "particles.ambient_count ({}) exceeds capacity ({})",
                self.ambient_count, self.capacity
            )));
        }
        if self.ambient_extent.iter().any(|e| !e.is_finite() || *e < 0.0) {
            return Err(FlareError::ConfigError(
                "particles.ambient_extent must be finite and non-negative".into(),
            ));
        }
        Ok(())
    }
}
