//! Per-frame particle motion, one rule per effect kind

use crate::effects::{ambient_position, EffectKind};
use crate::particle::Particle;
use rand::Rng;

/// Life drained per second
const LIFE_DRAIN: f32 = 2.0;
const EXPLOSION_GRAVITY: f32 = 0.002;
const JUMP_GRAVITY: f32 = 0.001;
const SPIRAL_SPEED: f32 = 0.02;

/// What the pool should do with a particle after stepping it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fate {
    Alive,
    Expired,
}

/// Advance one particle by a frame.
///
/// `time` is the effect layer's elapsed time in seconds and drives the
/// shared oscillations (ambient bobbing, power-up spiral).
pub fn step<R: Rng>(
    p: &mut Particle,
    dt: f32,
    time: f32,
    ambient_extent: [f32; 3],
    rng: &mut R,
) -> Fate {
    let Some(kind) = p.kind else {
        return Fate::Alive;
    };

    p.position += p.velocity;
    p.life -= dt * LIFE_DRAIN;

    match kind {
        EffectKind::Ambient => {
            p.position.y += (time + p.position.x).sin() * 0.001;
            p.opacity = 0.6 + (time * 2.0 + p.position.x).sin() * 0.2;

            if p.life <= 0.0 {
                p.life = p.max_life;
                p.position = ambient_position(rng, ambient_extent);
            }
        }
        EffectKind::Sparkle => fade(p, 1.0, kind),
        EffectKind::Explosion => {
            fade(p, 1.0, kind);
            p.velocity.y -= EXPLOSION_GRAVITY;
        }
        EffectKind::Trail => fade(p, 0.7, kind),
        EffectKind::Jump => {
            fade(p, 1.0, kind);
            p.velocity.y -= JUMP_GRAVITY;
        }
        EffectKind::PowerUp => {
            fade(p, 1.0, kind);
            let spiral = time * 2.0;
            p.velocity.x = spiral.cos() * SPIRAL_SPEED;
            p.velocity.y = spiral.sin() * SPIRAL_SPEED;
        }
    }

    if kind != EffectKind::Ambient && p.life <= 0.0 {
        Fate::Expired
    } else {
        Fate::Alive
    }
}

/// Opacity and scale follow remaining life
fn fade(p: &mut Particle, opacity_factor: f32, kind: EffectKind) {
    p.opacity = p.life * opacity_factor;
    p.scale = kind.base_scale() * p.life;
}

#[cfg(test)]
mod tests {
    use super::*;
    use flare_core::Vec3;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    const EXTENT: [f32; 3] = [60.0, 30.0, 30.0];

    fn particle(kind: EffectKind, velocity: Vec3) -> Particle {
        let mut p = Particle::parked();
        p.kind = Some(kind);
        p.velocity = velocity;
        p.scale = kind.base_scale();
        p.life = 1.0;
        p.max_life = 1.0;
        p.visible = true;
        p
    }

    #[test]
    fn explosion_falls_and_fades() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut p = particle(EffectKind::Explosion, Vec3::new(0.1, 0.0, 0.0));

        assert_eq!(step(&mut p, 0.1, 0.0, EXTENT, &mut rng), Fate::Alive);
        assert!((p.position.x - 0.1).abs() < 1e-6);
        assert!((p.life - 0.8).abs() < 1e-6);
        assert!((p.opacity - 0.8).abs() < 1e-6);
        assert!((p.scale - 0.24).abs() < 1e-6);
        assert!((p.velocity.y + 0.002).abs() < 1e-6);
    }

    #[test]
    fn trail_is_dimmer() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut p = particle(EffectKind::Trail, Vec3::ZERO);
        step(&mut p, 0.25, 0.0, EXTENT, &mut rng);
        assert!((p.opacity - 0.35).abs() < 1e-6);
        assert!((p.scale - 0.1).abs() < 1e-6);
    }

    #[test]
    fn transient_particles_expire_after_half_a_second() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut p = particle(EffectKind::Sparkle, Vec3::ZERO);
        let mut frames = 0;
        while step(&mut p, 0.0625, 0.0, EXTENT, &mut rng) == Fate::Alive {
            frames += 1;
            assert!(frames < 100);
        }
        // life 1.0 drained at 2/s in 1/16s frames: the 8th frame expires it
        assert_eq!(frames, 7);
    }

    #[test]
    fn ambient_respawns_instead_of_expiring() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut p = particle(EffectKind::Ambient, Vec3::ZERO);
        p.life = 0.01;

        assert_eq!(step(&mut p, 0.1, 1.0, EXTENT, &mut rng), Fate::Alive);
        assert_eq!(p.life, 1.0);
        assert!(p.position.x.abs() <= 30.0);
        assert!(p.position.y.abs() <= 15.0);
        assert!(p.position.z.abs() <= 15.0);
        assert!(p.opacity >= 0.4 && p.opacity <= 0.8);
    }

    #[test]
    fn jump_dust_gains_gravity_each_frame() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut p = particle(EffectKind::Jump, Vec3::new(0.01, -0.005, 0.0));

        step(&mut p, 0.05, 0.0, EXTENT, &mut rng);
        assert!((p.position.y + 0.005).abs() < 1e-7);
        assert!((p.velocity.y + 0.006).abs() < 1e-7);
        assert!((p.opacity - 0.9).abs() < 1e-6);
        assert!((p.scale - 0.135).abs() < 1e-6);

        step(&mut p, 0.05, 0.0, EXTENT, &mut rng);
        assert!((p.position.y + 0.011).abs() < 1e-7);
        assert!((p.velocity.y + 0.007).abs() < 1e-7);
    }

    #[test]
    fn ambient_bobs_and_pulses() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut p = particle(EffectKind::Ambient, Vec3::ZERO);
        p.position = Vec3::new(0.5, 2.0, -1.0);
        let time = 1.25f32;

        assert_eq!(step(&mut p, 0.1, time, EXTENT, &mut rng), Fate::Alive);
        let bob = (time + 0.5).sin() * 0.001;
        assert!((p.position.y - (2.0 + bob)).abs() < 1e-6);
        assert!((p.opacity - (0.6 + (time * 2.0 + 0.5).sin() * 0.2)).abs() < 1e-6);
        assert_eq!(p.position.x, 0.5);
        assert!((p.life - 0.8).abs() < 1e-6);
    }

    #[test]
    fn powerup_spirals() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut p = particle(EffectKind::PowerUp, Vec3::ZERO);
        let time = 0.75;
        step(&mut p, 0.01, time, EXTENT, &mut rng);
        assert!((p.velocity.x - (time * 2.0).cos() * 0.02).abs() < 1e-6);
        assert!((p.velocity.y - (time * 2.0).sin() * 0.02).abs() < 1e-6);
    }

    #[test]
    fn unclaimed_slot_is_left_alone() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut p = Particle::parked();
        p.velocity = Vec3::ONE;
        assert_eq!(step(&mut p, 0.1, 0.0, EXTENT, &mut rng), Fate::Alive);
        assert_eq!(p.position, Vec3::ZERO);
    }
}
