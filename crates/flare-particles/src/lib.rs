//! Flare Particles - pooled cosmetic particle effects
//!
//! Provides a fixed-capacity particle layer with:
//! - A free-list pool with O(1) acquire/release (`ParticlePool`)
//! - Effect recipes for sparkles, explosions, dash trails, jump dust, power-up rings
//! - Ambient motes that drift and respawn forever
//! - Frame-driven motion with per-kind fading, gravity and spiral rules
//! - GPU instance packing for instanced draw calls

pub mod config;
pub mod effects;
pub mod motion;
pub mod particle;

use flare_core::{Result, Vec3};
use flare_ecs::FlareWorld;
use flare_runtime::{GameEvent, RuntimeSystem};
use rand::SeedableRng;
use rand_pcg::Pcg32;

pub use config::ParticleConfig;
pub use effects::{EffectKind, SpawnReport};
pub use particle::{Particle, ParticleHandle, ParticleInstance, ParticlePool};

/// Running counters for diagnostics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParticleStats {
    pub spawned: usize,
    /// Particles an effect asked for but the pool could not supply
    pub dropped: usize,
    pub released: usize,
    pub peak_active: usize,
}

/// The particle layer, driven by the game loop through `RuntimeSystem`
pub struct ParticleSystem {
    config: ParticleConfig,
    pool: ParticlePool,
    rng: Pcg32,
    initialized: bool,
    /// Seconds since initialization, drives shared oscillations
    elapsed: f64,
    instance_buffer: Vec<ParticleInstance>,
    stats: ParticleStats,
}

impl ParticleSystem {
    pub fn new(config: ParticleConfig) -> Self {
        let pool = ParticlePool::new(config.capacity);
        let rng = Pcg32::seed_from_u64(config.seed);
        Self {
            config,
            pool,
            rng,
            initialized: false,
            elapsed: 0.0,
            instance_buffer: Vec::new(),
            stats: ParticleStats::default(),
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Seed the ambient motes. Calling again is a no-op.
    pub fn init(&mut self) {
        if self.initialized {
            return;
        }
        self.initialized = true;
        self.create_ambient();
        tracing::info!(
            capacity = self.pool.capacity(),
            ambient = self.pool.active_count(),
            "particle pool ready"
        );
    }

    fn create_ambient(&mut self) {
        let count = self.config.ambient_count;
        let report = effects::spawn(
            &mut self.pool,
            &mut self.rng,
            EffectKind::Ambient,
            Vec3::ZERO,
            count,
        );
        // Ambient motes start scattered through the box, not at the origin
        let extent = self.config.ambient_extent;
        for i in 0..self.pool.active_count() {
            let Some(handle) = self.pool.active_handle(i) else {
                continue;
            };
            let position = effects::ambient_position(&mut self.rng, extent);
            if let Some(p) = self.pool.get_mut(handle) {
                p.position = position;
            }
        }
        self.record(EffectKind::Ambient, report);
    }

    /// Spawn an effect at `position`. Does nothing before `init`.
    pub fn emit(&mut self, kind: EffectKind, position: Vec3) -> SpawnReport {
        let requested = kind.burst_size();
        if !self.initialized {
            return SpawnReport {
                requested,
                spawned: 0,
            };
        }
        let report = effects::spawn(&mut self.pool, &mut self.rng, kind, position, requested);
        self.record(kind, report);
        report
    }

    pub fn collectible_sparkle(&mut self, position: Vec3) -> SpawnReport {
        self.emit(EffectKind::Sparkle, position)
    }

    pub fn collection_explosion(&mut self, position: Vec3) -> SpawnReport {
        self.emit(EffectKind::Explosion, position)
    }

    pub fn dash_trail(&mut self, position: Vec3) -> SpawnReport {
        self.emit(EffectKind::Trail, position)
    }

    pub fn jump_particles(&mut self, position: Vec3) -> SpawnReport {
        self.emit(EffectKind::Jump, position)
    }

    pub fn power_up_glow(&mut self, position: Vec3) -> SpawnReport {
        self.emit(EffectKind::PowerUp, position)
    }

    fn record(&mut self, kind: EffectKind, report: SpawnReport) {
        self.stats.spawned += report.spawned;
        self.stats.dropped += report.dropped();
        self.stats.peak_active = self.stats.peak_active.max(self.pool.active_count());
        if report.dropped() > 0 {
            tracing::warn!(
                effect = kind.label(),
                requested = report.requested,
                spawned = report.spawned,
                "particle pool exhausted"
            );
        } else {
            tracing::debug!(effect = kind.label(), spawned = report.spawned, "effect spawned");
        }
    }

    /// Step every active particle and return expired ones to the pool.
    pub fn update_particles(&mut self, dt: f32) {
        if !self.initialized {
            return;
        }
        self.elapsed += dt as f64;
        let time = self.elapsed as f32;
        let extent = self.config.ambient_extent;

        // Backwards so a release only disturbs already-visited entries
        for i in (0..self.pool.active_count()).rev() {
            let Some(handle) = self.pool.active_handle(i) else {
                continue;
            };
            let fate = match self.pool.get_mut(handle) {
                Some(p) => motion::step(p, dt, time, extent, &mut self.rng),
                None => continue,
            };
            if fate == motion::Fate::Expired && self.pool.release(handle) {
                self.stats.released += 1;
            }
        }
    }

    /// Pack visible particles into the instance buffer for GPU upload.
    /// Call this after `update_particles()`.
    pub fn pack_instances(&mut self) {
        self.instance_buffer.clear();
        self.instance_buffer.extend(
            self.pool
                .active()
                .filter(|(_, p)| p.visible)
                .map(|(_, p)| ParticleInstance::from_particle(p)),
        );
    }

    /// Get the packed instance data
    pub fn instance_data(&self) -> &[ParticleInstance] {
        &self.instance_buffer
    }

    pub fn pool(&self) -> &ParticlePool {
        &self.pool
    }

    pub fn active_count(&self) -> usize {
        self.pool.active_count()
    }

    pub fn stats(&self) -> ParticleStats {
        self.stats
    }

    /// Count active particles of one kind
    pub fn count_of(&self, kind: EffectKind) -> usize {
        self.pool
            .active()
            .filter(|(_, p)| p.kind == Some(kind))
            .count()
    }
}

impl Default for ParticleSystem {
    fn default() -> Self {
        Self::new(ParticleConfig::default())
    }
}

impl RuntimeSystem for ParticleSystem {
    fn initialize(&mut self, _world: &mut FlareWorld) -> Result<()> {
        self.config.validate()?;
        self.init();
        Ok(())
    }

    fn fixed_update(&mut self, _world: &mut FlareWorld, _dt: f64) -> Result<()> {
        // Visual only
        Ok(())
    }

    fn handle_events(&mut self, _world: &mut FlareWorld, events: &[GameEvent]) -> Result<()> {
        for event in events {
            match event {
                GameEvent::PlayerJumped { position } => {
                    self.jump_particles(*position);
                }
                GameEvent::DashStarted { position } => {
                    self.dash_trail(*position);
                }
                GameEvent::ItemCollected { position } => {
                    self.collectible_sparkle(*position);
                    self.collection_explosion(*position);
                }
                GameEvent::PowerUpCollected { position } => {
                    self.power_up_glow(*position);
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn update(&mut self, _world: &mut FlareWorld, dt: f64) -> Result<()> {
        self.update_particles(dt as f32);
        self.pack_instances();
        Ok(())
    }

    fn shutdown(&mut self) -> Result<()> {
        self.pool.release_all();
        self.instance_buffer.clear();
        tracing::info!(spawned = self.stats.spawned, dropped = self.stats.dropped, "particles shut down");
        Ok(())
    }

    fn name(&self) -> &str {
        "particles"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config() -> ParticleConfig {
        ParticleConfig {
            capacity: 64,
            ambient_count: 10,
            seed: 11,
            ..Default::default()
        }
    }

    #[test]
    fn effects_before_init_spawn_nothing() {
        let mut system = ParticleSystem::new(small_config());
        let report = system.jump_particles(Vec3::ZERO);
        assert_eq!(report.spawned, 0);
        assert_eq!(system.active_count(), 0);

        system.update_particles(0.1);
        assert_eq!(system.active_count(), 0);
    }

    #[test]
    fn init_is_idempotent() {
        let mut system = ParticleSystem::new(small_config());
        system.init();
        system.init();
        assert_eq!(system.count_of(EffectKind::Ambient), 10);
        assert!(system.pool().is_consistent());
    }

    #[test]
    fn events_map_to_effects() {
        let mut system = ParticleSystem::new(ParticleConfig {
            capacity: 80,
            ..small_config()
        });
        let mut world = FlareWorld::new();
        system.initialize(&mut world).unwrap();

        let at = Vec3::new(2.0, 1.0, 0.0);
        let events = vec![
            GameEvent::PlayerJumped { position: at },
            GameEvent::DashStarted { position: at },
            GameEvent::ItemCollected { position: at },
            GameEvent::PowerUpCollected { position: at },
            GameEvent::DamageTaken,
        ];
        system.handle_events(&mut world, &events).unwrap();

        assert_eq!(system.count_of(EffectKind::Jump), 6);
        assert_eq!(system.count_of(EffectKind::Trail), 8);
        assert_eq!(system.count_of(EffectKind::Sparkle), 12);
        assert_eq!(system.count_of(EffectKind::Explosion), 20);
        assert_eq!(system.count_of(EffectKind::PowerUp), 15);
        assert_eq!(system.active_count(), 10 + 6 + 8 + 12 + 20 + 15);
        assert_eq!(system.stats().dropped, 0);
    }

    #[test]
    fn transient_effects_return_to_pool() {
        let mut system = ParticleSystem::new(small_config());
        let mut world = FlareWorld::new();
        system.initialize(&mut world).unwrap();
        system.collection_explosion(Vec3::ZERO);
        assert_eq!(system.active_count(), 30);

        // One second at 60 fps drains life (2/s) well past zero
        for _ in 0..60 {
            system.update(&mut world, 1.0 / 60.0).unwrap();
            assert!(system.pool().is_consistent());
        }

        assert_eq!(system.active_count(), 10);
        assert_eq!(system.count_of(EffectKind::Ambient), 10);
        assert_eq!(system.stats().released, 20);
        assert_eq!(system.instance_data().len(), 10);

        let slot = system.pool().active().next().map(|(_, p)| p.clone()).unwrap();
        assert!(slot.visible);
    }

    #[test]
    fn exhaustion_degrades_gracefully() {
        let config = ParticleConfig {
            capacity: 30,
            ambient_count: 10,
            seed: 5,
            ..Default::default()
        };
        let mut system = ParticleSystem::new(config);
        system.init();

        assert_eq!(system.collection_explosion(Vec3::ZERO).spawned, 20);
        let report = system.collectible_sparkle(Vec3::ZERO);
        assert_eq!(report.spawned, 0);
        assert_eq!(system.stats().dropped, 12);
        assert_eq!(system.pool().free_count(), 0);
        assert!(system.pool().is_consistent());
    }

    #[test]
    fn shutdown_empties_pool() {
        let mut system = ParticleSystem::new(small_config());
        let mut world = FlareWorld::new();
        system.initialize(&mut world).unwrap();
        system.power_up_glow(Vec3::ZERO);
        system.shutdown().unwrap();
        assert_eq!(system.active_count(), 0);
        assert_eq!(system.pool().free_count(), 64);
        assert_eq!(system.name(), "particles");
    }

    #[test]
    fn invalid_config_fails_initialize() {
        let mut system = ParticleSystem::new(ParticleConfig {
            capacity: 4,
            ambient_count: 8,
            ..Default::default()
        });
        let mut world = FlareWorld::new();
        assert!(system.initialize(&mut world).is_err());
    }
}
