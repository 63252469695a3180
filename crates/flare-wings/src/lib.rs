//! Flare Wings - cosmetic dash wings
//!
//! While the player dashes, a pair of glowing wings unfolds and flaps, a
//! point trail streams behind, and a ring of sparks bursts outward. The
//! wing pose is mirrored into the player's `wings` component every frame so
//! renderers and tools can read it from the world.

pub mod burst;
pub mod config;
pub mod trail;
pub mod wing;

use burst::DashBurst;
use flare_core::{Color, EntityId, Result, Vec3};
use flare_ecs::FlareWorld;
use flare_runtime::{GameEvent, RuntimeSystem, TimerId, TimerQueue};
use rand::SeedableRng;
use rand_pcg::Pcg32;
use trail::WingTrail;
use wing::{WingPair, DASH_EMISSIVE, FLAP_AMPLITUDE, REST_EMISSIVE};

pub use config::WingConfig;

/// Wall time scale the flap and glow oscillations run at
const PHASE_RATE: f64 = 10.0;
const GLOW_RATE: f32 = 0.05;

/// Component name the pose is written to
pub const WINGS_COMPONENT: &str = "wings";

/// Dash wings, trail and bursts attached to the player entity
pub struct WingSystem {
    config: WingConfig,
    player: Option<EntityId>,
    wings: WingPair,
    trail: WingTrail,
    bursts: Vec<DashBurst>,
    flapping: bool,
    timers: TimerQueue<()>,
    pending_hide: Option<TimerId>,
    rng: Pcg32,
    elapsed: f64,
    visible_time: f64,
    dashes: usize,
}

impl Default for WingSystem {
    fn default() -> Self {
        Self::new(WingConfig::default())
    }
}

impl WingSystem {
    pub fn new(config: WingConfig) -> Self {
        Self {
            player: None,
            wings: WingPair::new(),
            trail: WingTrail::new(config.trail_length),
            bursts: Vec::new(),
            flapping: false,
            timers: TimerQueue::new(),
            pending_hide: None,
            rng: Pcg32::seed_from_u64(config.seed),
            elapsed: 0.0,
            visible_time: 0.0,
            dashes: 0,
            config,
        }
    }

    /// Whether the wings are attached to the player
    pub fn is_initialized(&self) -> bool {
        self.player.is_some()
    }

    /// Attach to the player entity if it exists yet. Returns whether attached.
    ///
    /// A despawned player is dropped so a respawned one can be picked up.
    pub fn try_attach(&mut self, world: &FlareWorld) -> bool {
        if let Some(player) = self.player {
            if world.contains(player) {
                return true;
            }
            self.player = None;
            tracing::info!(player = %self.config.player, "player entity gone, wings detached");
        }
        let Some(id) = world.get_id(&self.config.player) else {
            return false;
        };
        self.player = Some(id);
        tracing::info!(player = %self.config.player, "wings attached");
        true
    }

    pub fn is_flapping(&self) -> bool {
        self.flapping
    }

    pub fn wings(&self) -> &WingPair {
        &self.wings
    }

    pub fn trail(&self) -> &WingTrail {
        &self.trail
    }

    pub fn bursts(&self) -> &[DashBurst] {
        &self.bursts
    }

    /// Seconds the wings have been on screen
    pub fn visible_time(&self) -> f64 {
        self.visible_time
    }

    /// Dashes the wings reacted to
    pub fn dash_count(&self) -> usize {
        self.dashes
    }

    /// Whether a delayed hide is waiting to fire
    pub fn hide_pending(&self) -> bool {
        self.pending_hide.is_some()
    }

    pub fn on_dash_start(&mut self) {
        if !self.is_initialized() {
            return;
        }
        if let Some(id) = self.pending_hide.take() {
            self.timers.cancel(id);
        }

        self.wings.set_visible(true);
        self.trail.visible = true;
        self.flapping = true;
        self.wings.spread(self.config.wing_spread);
        self.wings.set_emissive(Color::from_hex(DASH_EMISSIVE));
        self.bursts.push(DashBurst::spawn(&mut self.rng));
        self.dashes += 1;
        tracing::debug!(bursts = self.bursts.len(), "dash wings out");
    }

    pub fn on_dash_end(&mut self) {
        if !self.is_initialized() {
            return;
        }
        self.flapping = false;
        self.wings.set_emissive(Color::from_hex(REST_EMISSIVE));
        if let Some(id) = self.pending_hide.take() {
            self.timers.cancel(id);
        }
        self.pending_hide = Some(self.timers.schedule(self.config.hide_delay, ()));
    }

    fn hide(&mut self) {
        self.wings.set_visible(false);
        self.trail.visible = false;
        tracing::debug!("dash wings hidden");
    }

    /// Advance the animation by `dt` seconds, following the player in `world`
    pub fn animate(&mut self, world: &FlareWorld, dt: f64) {
        let Some(player) = self.player else {
            return;
        };

        self.elapsed += dt;
        if self.timers.drain_due(dt).pop().is_some() {
            self.pending_hide = None;
            self.hide();
        }

        if self.flapping {
            let phase = (self.elapsed * PHASE_RATE) as f32;
            let flap = (phase * self.config.flap_speed).sin() * FLAP_AMPLITUDE;
            self.wings.flap(flap);

            let glow = 0.5 + (phase * GLOW_RATE).sin() * 0.3;
            self.wings.set_emissive(Color::gray(glow * 0.2));

            let head = world.get_world_position(player).unwrap_or(Vec3::ZERO);
            self.trail.advance(head);
        }

        for burst in &mut self.bursts {
            burst.step();
        }
        self.bursts.retain(|b| !b.is_finished());

        if self.wings.is_visible() {
            self.visible_time += dt;
        }
    }

    /// Write the current pose into the player's `wings` component
    pub fn write_pose(&self, world: &mut FlareWorld) -> Result<()> {
        let Some(player) = self.player else {
            return Ok(());
        };
        if !world.contains(player) {
            return Ok(());
        }

        let mut table = toml::map::Map::new();
        table.insert("visible".into(), toml::Value::Boolean(self.wings.is_visible()));
        table.insert("flapping".into(), toml::Value::Boolean(self.flapping));
        table.insert(
            "left_rotation".into(),
            float_array(&self.wings.left.rotation.to_array()),
        );
        table.insert(
            "right_rotation".into(),
            float_array(&self.wings.right.rotation.to_array()),
        );
        table.insert(
            "emissive".into(),
            float_array(&self.wings.left.material.emissive.to_array()),
        );
        table.insert("trail_visible".into(), toml::Value::Boolean(self.trail.visible));
        table.insert("trail_positions".into(), float_array(&self.trail.position_buffer()));
        table.insert("trail_colors".into(), float_array(&self.trail.color_buffer()));
        table.insert(
            "burst_color".into(),
            toml::Value::Integer(DashBurst::color().to_hex() as i64),
        );
        table.insert(
            "burst_particles".into(),
            toml::Value::Integer(self.bursts.iter().map(|b| b.particles().len()).sum::<usize>() as i64),
        );

        world.set_component(player, WINGS_COMPONENT, toml::Value::Table(table))
    }
}

fn float_array(values: &[f32]) -> toml::Value {
    toml::Value::Array(values.iter().map(|v| toml::Value::Float(*v as f64)).collect())
}

impl RuntimeSystem for WingSystem {
    fn initialize(&mut self, world: &mut FlareWorld) -> Result<()> {
        self.config.validate()?;
        if !self.try_attach(world) {
            tracing::info!(player = %self.config.player, "wings waiting for player entity");
        }
        Ok(())
    }

    fn fixed_update(&mut self, _world: &mut FlareWorld, _dt: f64) -> Result<()> {
        Ok(())
    }

    fn handle_events(&mut self, world: &mut FlareWorld, events: &[GameEvent]) -> Result<()> {
        self.try_attach(world);
        for event in events {
            match event {
                GameEvent::DashStarted { .. } => self.on_dash_start(),
                GameEvent::DashEnded => self.on_dash_end(),
                _ => {}
            }
        }
        Ok(())
    }

    fn update(&mut self, world: &mut FlareWorld, dt: f64) -> Result<()> {
        if !self.try_attach(world) {
            return Ok(());
        }
        self.animate(world, dt);
        self.write_pose(world)
    }

    fn shutdown(&mut self) -> Result<()> {
        self.timers.clear();
        self.pending_hide = None;
        self.bursts.clear();
        tracing::info!(dashes = self.dashes, "wings shut down");
        Ok(())
    }

    fn name(&self) -> &str {
        "wings"
    }
}
