//! Flare Audio - Generative music and sound effects (Kira backend)
//!
//! Provides the music layer for the Flare effect stack:
//! - `note` / `envelope` / `patch` / `synth`: pitches, voice presets and offline note rendering
//! - `Sequencer`: looping bass, drum and lead patterns
//! - `SfxPlayer`: one-shot gameplay sound effects with delayed follow-up notes
//! - `AudioEngine`: wraps Kira AudioManager, mixer graph, intensity and volume
//! - `MusicSystem`: implements `RuntimeSystem` for game loop integration

pub mod config;
pub mod engine;
pub mod envelope;
pub mod note;
pub mod patch;
pub mod sequencer;
pub mod sfx;
pub mod synth;

use engine::AudioEngine;
use flare_core::Result;
use flare_ecs::FlareWorld;
use flare_runtime::{GameEvent, RuntimeSystem};
use rand::SeedableRng;
use rand_pcg::Pcg32;
use std::collections::BTreeMap;

pub use config::MusicConfig;
pub use note::NoteValue;
pub use patch::{Bus, Voice};
pub use sequencer::{NoteCommand, Sequencer};
pub use sfx::{Sfx, SfxPlayer};

/// Top-level music system: ambient patterns plus gameplay sound effects
pub struct MusicSystem {
    config: MusicConfig,
    engine: AudioEngine,
    sequencer: Sequencer,
    sfx: SfxPlayer,
    rng: Pcg32,
    initialized: bool,
    notes_played: BTreeMap<Voice, usize>,
    play_failures: usize,
}

impl Default for MusicSystem {
    fn default() -> Self {
        Self::new(MusicConfig::default())
    }
}

impl MusicSystem {
    pub fn new(config: MusicConfig) -> Self {
        // Controls set before unlock land here and carry over to the device
        let mut engine = AudioEngine::silent(config.bpm);
        engine.set_volume(config.volume);
        engine.set_intensity(config.intensity);

        Self {
            engine,
            sequencer: Sequencer::new(config.lead_probability),
            sfx: SfxPlayer::new(),
            rng: Pcg32::seed_from_u64(config.seed),
            initialized: false,
            notes_played: BTreeMap::new(),
            play_failures: 0,
            config,
        }
    }

    /// Whether audio has been unlocked
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn is_playing(&self) -> bool {
        self.sequencer.is_playing()
    }

    pub fn engine(&self) -> &AudioEngine {
        &self.engine
    }

    /// Open the device and build the mixer graph. Calling again is a no-op.
    ///
    /// A device or graph failure leaves the layer running silent.
    pub fn init(&mut self) {
        if self.initialized {
            return;
        }

        let volume = self.engine.volume();
        let intensity = self.engine.intensity();
        if !self.config.silent {
            self.engine = AudioEngine::new(self.config.bpm);
        }
        // The graph is built with the current intensity baked in
        self.engine.set_intensity(intensity);
        if let Err(e) = self.engine.build_graph() {
            tracing::warn!("music graph unavailable ({e}), running silent");
            self.engine = AudioEngine::silent(self.config.bpm);
        }
        self.engine.set_volume(volume);
        self.engine.set_intensity(intensity);

        self.initialized = true;
        tracing::info!(
            device = self.engine.is_available(),
            bpm = self.config.bpm,
            "audio unlocked"
        );
    }

    /// Start the ambient patterns, unlocking audio first if needed
    pub fn start_ambient(&mut self) {
        if !self.initialized {
            self.init();
        }
        if self.sequencer.start() {
            tracing::info!("ambient music started");
        }
    }

    /// Stop the ambient patterns; pending sound effect notes still play
    pub fn stop(&mut self) {
        if self.sequencer.is_playing() {
            self.sequencer.stop();
            tracing::info!("ambient music stopped");
        }
    }

    /// Play a sound effect. Ignored until audio is unlocked.
    pub fn play_sfx(&mut self, sfx: Sfx) {
        if !self.initialized {
            return;
        }
        tracing::debug!(voice = %sfx.voice(), "sound effect");
        let notes = self.sfx.trigger(sfx);
        self.dispatch(&notes);
    }

    pub fn play_dash_sound(&mut self) {
        self.play_sfx(Sfx::Dash);
    }

    pub fn play_jump_sound(&mut self) {
        self.play_sfx(Sfx::Jump);
    }

    pub fn play_collect_sound(&mut self) {
        self.play_sfx(Sfx::Collect);
    }

    pub fn play_damage_sound(&mut self) {
        self.play_sfx(Sfx::Damage);
    }

    pub fn play_power_up_sound(&mut self) {
        self.play_sfx(Sfx::PowerUp);
    }

    pub fn set_intensity(&mut self, intensity: f32) {
        self.engine.set_intensity(intensity);
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.engine.set_volume(volume);
    }

    /// Advance patterns and follow-up notes by `dt` seconds, playing what came due
    pub fn advance(&mut self, dt: f64) {
        let mut notes = self.sequencer.advance(dt, &mut self.rng);
        notes.extend(self.sfx.advance(dt));
        self.dispatch(&notes);
    }

    fn dispatch(&mut self, notes: &[NoteCommand]) {
        for note in notes {
            *self.notes_played.entry(note.voice).or_insert(0) += 1;
            if let Err(e) = self.engine.play(note) {
                self.play_failures += 1;
                tracing::warn!("{e}");
            }
        }
    }

    /// Notes played on one voice since creation
    pub fn notes_played(&self, voice: Voice) -> usize {
        self.notes_played.get(&voice).copied().unwrap_or(0)
    }

    /// Notes played per voice
    pub fn notes_by_voice(&self) -> &BTreeMap<Voice, usize> {
        &self.notes_played
    }

    pub fn total_notes(&self) -> usize {
        self.notes_played.values().sum()
    }

    pub fn play_failures(&self) -> usize {
        self.play_failures
    }
}

impl RuntimeSystem for MusicSystem {
    fn initialize(&mut self, _world: &mut FlareWorld) -> Result<()> {
        self.config.validate()?;
        // The device opens on the first input event
        tracing::info!("music layer waiting for first input");
        Ok(())
    }

    fn fixed_update(&mut self, _world: &mut FlareWorld, _dt: f64) -> Result<()> {
        // Audio doesn't need fixed timestep
        Ok(())
    }

    fn handle_events(&mut self, _world: &mut FlareWorld, events: &[GameEvent]) -> Result<()> {
        for event in events {
            match event {
                GameEvent::ActionPressed(_) => {
                    if !self.initialized {
                        self.init();
                        if self.config.autostart {
                            self.start_ambient();
                        }
                    }
                }
                GameEvent::DashStarted { .. } => self.play_dash_sound(),
                GameEvent::PlayerJumped { .. } => self.play_jump_sound(),
                GameEvent::ItemCollected { .. } => self.play_collect_sound(),
                GameEvent::DamageTaken => self.play_damage_sound(),
                GameEvent::PowerUpCollected { .. } => self.play_power_up_sound(),
                GameEvent::IntensityChanged(intensity) => self.set_intensity(*intensity),
                GameEvent::VolumeChanged(volume) => self.set_volume(*volume),
                GameEvent::DashEnded => {}
            }
        }
        Ok(())
    }

    fn update(&mut self, _world: &mut FlareWorld, dt: f64) -> Result<()> {
        self.advance(dt);
        Ok(())
    }

    fn shutdown(&mut self) -> Result<()> {
        self.stop();
        self.sfx.clear();
        // Kira cleans up when AudioManager is dropped
        tracing::info!(notes = self.total_notes(), "music shut down");
        Ok(())
    }

    fn name(&self) -> &str {
        "music"
    }
}
