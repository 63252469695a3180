//! Effect recipes: how many particles each effect takes from the pool and
//! how they start out.
//!
//! Velocities are displacements per frame, matching the frame-driven motion
//! in `motion.rs`.

use crate::particle::{ParticleHandle, ParticlePool};
use flare_core::{Color, Vec3};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

/// Behavior family of a particle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectKind {
    /// Drifting background motes, never released
    Ambient,
    /// Glitter around a collectible
    Sparkle,
    /// Ring burst when an item is collected
    Explosion,
    /// Dash streak
    Trail,
    /// Dust kicked off the ground on jump
    Jump,
    /// Spiralling ring around a power-up
    PowerUp,
}

impl EffectKind {
    /// Particles requested per effect call (ambient count comes from config)
    pub fn burst_size(&self) -> usize {
        match self {
            EffectKind::Ambient => 0,
            EffectKind::Sparkle => 12,
            EffectKind::Explosion => 20,
            EffectKind::Trail => 8,
            EffectKind::Jump => 6,
            EffectKind::PowerUp => 15,
        }
    }

    /// Scale a particle of this kind is spawned with
    pub fn base_scale(&self) -> f32 {
        match self {
            EffectKind::Ambient => 1.0,
            EffectKind::Sparkle => 0.5,
            EffectKind::Explosion => 0.3,
            EffectKind::Trail => 0.2,
            EffectKind::Jump => 0.15,
            EffectKind::PowerUp => 0.4,
        }
    }

    /// Fixed spawn colour; ambient motes pick a random blue-cyan hue instead
    pub fn base_color(&self) -> Option<Color> {
        match self {
            EffectKind::Ambient => None,
            EffectKind::Sparkle => Some(Color::from_hex(0xffff00)),
            EffectKind::Explosion => Some(Color::from_hex(0x00ffff)),
            EffectKind::Trail => Some(Color::from_hex(0x00aaff)),
            EffectKind::Jump => Some(Color::from_hex(0x00ff88)),
            EffectKind::PowerUp => Some(Color::from_hex(0xffffff)),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            EffectKind::Ambient => "ambient",
            EffectKind::Sparkle => "sparkle",
            EffectKind::Explosion => "explosion",
            EffectKind::Trail => "trail",
            EffectKind::Jump => "jump",
            EffectKind::PowerUp => "powerup",
        }
    }
}

/// Uniform sample in `[-width/2, width/2)`
pub(crate) fn centered<R: Rng>(rng: &mut R, width: f32) -> f32 {
    (rng.gen::<f32>() - 0.5) * width
}

fn centered_vec<R: Rng>(rng: &mut R, width: f32) -> Vec3 {
    Vec3::new(
        centered(rng, width),
        centered(rng, width),
        centered(rng, width),
    )
}

/// Random position inside the ambient box centred on the origin
pub(crate) fn ambient_position<R: Rng>(rng: &mut R, extent: [f32; 3]) -> Vec3 {
    Vec3::new(
        centered(rng, extent[0]),
        centered(rng, extent[1]),
        centered(rng, extent[2]),
    )
}

/// Initial offset from the effect origin and velocity of the `i`-th of `count` particles
fn launch<R: Rng>(kind: EffectKind, i: usize, count: usize, rng: &mut R) -> (Vec3, Vec3) {
    match kind {
        EffectKind::Ambient => (Vec3::ZERO, centered_vec(rng, 0.01)),
        EffectKind::Sparkle => (centered_vec(rng, 0.4), centered_vec(rng, 0.05)),
        EffectKind::Explosion => {
            let angle = i as f32 / count as f32 * TAU;
            let speed = 0.1 + rng.gen::<f32>() * 0.05;
            let velocity = Vec3::new(
                angle.cos() * speed,
                angle.sin() * speed,
                centered(rng, 0.02),
            );
            (Vec3::ZERO, velocity)
        }
        EffectKind::Trail => (centered_vec(rng, 0.2), centered_vec(rng, 0.02)),
        EffectKind::Jump => {
            let velocity = Vec3::new(
                centered(rng, 0.03),
                -rng.gen::<f32>() * 0.02,
                centered(rng, 0.03),
            );
            (Vec3::new(0.0, -0.3, 0.0), velocity)
        }
        EffectKind::PowerUp => {
            let angle = i as f32 / count as f32 * TAU;
            let radius = 0.8;
            let offset = Vec3::new(
                angle.cos() * radius,
                angle.sin() * radius,
                centered(rng, 0.2),
            );
            let velocity = Vec3::new(
                angle.cos() * 0.02,
                angle.sin() * 0.02,
                centered(rng, 0.01),
            );
            (offset, velocity)
        }
    }
}

/// Outcome of one effect call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpawnReport {
    pub requested: usize,
    pub spawned: usize,
}

impl SpawnReport {
    /// Particles the pool could not supply
    pub fn dropped(&self) -> usize {
        self.requested - self.spawned
    }
}

/// Spawn `count` particles of `kind` around `origin`.
///
/// Stops early when the pool runs dry; the report says how many made it.
pub fn spawn<R: Rng>(
    pool: &mut ParticlePool,
    rng: &mut R,
    kind: EffectKind,
    origin: Vec3,
    count: usize,
) -> SpawnReport {
    let mut spawned = 0;
    for i in 0..count {
        let Some(handle) = pool.acquire() else {
            break;
        };
        let (offset, velocity) = launch(kind, i, count, rng);
        init_particle(pool, handle, kind, origin + offset, velocity, rng);
        spawned += 1;
    }
    SpawnReport {
        requested: count,
        spawned,
    }
}

fn init_particle<R: Rng>(
    pool: &mut ParticlePool,
    handle: ParticleHandle,
    kind: EffectKind,
    position: Vec3,
    velocity: Vec3,
    rng: &mut R,
) {
    let Some(p) = pool.get_mut(handle) else {
        return;
    };
    p.position = position;
    p.velocity = velocity;
    p.scale = kind.base_scale();
    p.color = kind
        .base_color()
        .unwrap_or_else(|| Color::from_hsl(rng.gen::<f32>() * 0.3 + 0.5, 0.8, 0.6));
    p.kind = Some(kind);
    p.life = 1.0;
    p.max_life = 1.0;
}
