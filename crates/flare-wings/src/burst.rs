//! Ring of short-lived spheres thrown off when a dash starts
//!
//! Positions are relative to the player. Motion is per frame.

use flare_core::{Color, Vec3};
use rand::Rng;
use std::f32::consts::TAU;

pub const BURST_COUNT: usize = 15;
pub const BURST_RADIUS: f32 = 0.8;
pub const BURST_SPEED: f32 = 0.1;
pub const BURST_COLOR: u32 = 0x00ffff;
const START_OPACITY: f32 = 0.8;
const FADE_PER_FRAME: f32 = 0.05;

#[derive(Debug, Clone, PartialEq)]
pub struct BurstParticle {
    pub position: Vec3,
    pub velocity: Vec3,
    pub opacity: f32,
}

/// One dash burst; empty once every particle has faded
#[derive(Debug, Clone, PartialEq)]
pub struct DashBurst {
    particles: Vec<BurstParticle>,
}

impl DashBurst {
    pub fn spawn<R: Rng>(rng: &mut R) -> Self {
        let particles = (0..BURST_COUNT)
            .map(|i| {
                let angle = i as f32 / BURST_COUNT as f32 * TAU;
                let (sin, cos) = angle.sin_cos();
                BurstParticle {
                    position: Vec3::new(
                        cos * BURST_RADIUS,
                        sin * BURST_RADIUS,
                        (rng.gen::<f32>() - 0.5) * 0.4,
                    ),
                    velocity: Vec3::new(
                        cos * BURST_SPEED,
                        sin * BURST_SPEED,
                        (rng.gen::<f32>() - 0.5) * 0.1,
                    ),
                    opacity: START_OPACITY,
                }
            })
            .collect();
        Self { particles }
    }

    pub fn color() -> Color {
        Color::from_hex(BURST_COLOR)
    }

    pub fn particles(&self) -> &[BurstParticle] {
        &self.particles
    }

    pub fn is_finished(&self) -> bool {
        self.particles.is_empty()
    }

    /// Move and fade every particle one frame, dropping the invisible ones
    pub fn step(&mut self) {
        for p in &mut self.particles {
            p.position += p.velocity;
            p.opacity -= FADE_PER_FRAME;
        }
        self.particles.retain(|p| p.opacity > 0.0);
    }
}
