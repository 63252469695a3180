//! Audio engine wrapping Kira's AudioManager
//!
//! Owns the mixer graph (music bus into reverb bus into the main track),
//! renders and caches note buffers, and exposes the intensity and volume
//! controls. Degrades gracefully when no audio device is available.

use crate::note::{self, NoteValue};
use crate::patch::{Bus, Voice};
use crate::sequencer::NoteCommand;
use crate::synth;
use flare_core::{FlareError, Result};
use kira::effect::delay::DelayBuilder;
use kira::effect::filter::{FilterBuilder, FilterHandle, FilterMode};
use kira::effect::reverb::{ReverbBuilder, ReverbHandle};
use kira::sound::static_sound::{StaticSoundData, StaticSoundSettings};
use kira::track::{TrackBuilder, TrackHandle};
use kira::{AudioManager, AudioManagerSettings, Decibels, DefaultBackend, Frame, Mix, Tween};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

/// Sample rate note buffers are rendered at; Kira resamples on playback
pub const SAMPLE_RATE: u32 = 44_100;

const BASE_CUTOFF_HZ: f32 = 1000.0;
const CUTOFF_RANGE_HZ: f32 = 2000.0;
const BASE_REVERB_MIX: f32 = 0.2;
const REVERB_MIX_RANGE: f32 = 0.3;
/// Kira reverb feedback giving roughly a four second tail
const REVERB_FEEDBACK: f64 = 0.9;
const DELAY_FEEDBACK: f32 = 0.3;
const DELAY_MIX: f32 = 0.2;
const SILENCE_DB: f32 = -60.0;

/// Low-pass cutoff in Hz for an intensity in `[0, 1]`
pub fn filter_cutoff(intensity: f32) -> f32 {
    BASE_CUTOFF_HZ + CUTOFF_RANGE_HZ * intensity.clamp(0.0, 1.0)
}

/// Reverb wet level for an intensity in `[0, 1]`
pub fn reverb_mix(intensity: f32) -> f32 {
    BASE_REVERB_MIX + REVERB_MIX_RANGE * intensity.clamp(0.0, 1.0)
}

/// Convert linear amplitude to decibels, floored at silence
pub fn amplitude_to_db(amplitude: f32) -> f32 {
    if amplitude <= 0.0 {
        SILENCE_DB
    } else {
        (20.0 * amplitude.log10()).max(SILENCE_DB)
    }
}

/// Handles that keep the mixer tracks and their effects alive
struct SignalGraph {
    music_bus: TrackHandle,
    reverb_bus: TrackHandle,
    filter: FilterHandle,
    reverb: ReverbHandle,
}

type SoundKey = (Voice, &'static str, NoteValue);

/// Wraps Kira's AudioManager with the music mixer graph and a note cache
pub struct AudioEngine {
    manager: Option<AudioManager<DefaultBackend>>,
    graph: Option<SignalGraph>,
    sound_cache: HashMap<SoundKey, StaticSoundData>,
    bpm: f64,
    intensity: f32,
    volume: f32,
}

impl AudioEngine {
    /// Open the default output device, falling back to silent mode
    pub fn new(bpm: f64) -> Self {
        let manager = AudioManager::<DefaultBackend>::new(AudioManagerSettings::default())
            .map_err(|e| tracing::warn!("no audio device available ({e}), running silent"))
            .ok();

        Self {
            manager,
            ..Self::silent(bpm)
        }
    }

    /// An engine that never opens a device
    pub fn silent(bpm: f64) -> Self {
        Self {
            manager: None,
            graph: None,
            sound_cache: HashMap::new(),
            bpm,
            intensity: 0.5,
            volume: 1.0,
        }
    }

    /// Whether audio is actually available
    pub fn is_available(&self) -> bool {
        self.manager.is_some()
    }

    pub fn has_graph(&self) -> bool {
        self.graph.is_some()
    }

    pub fn intensity(&self) -> f32 {
        self.intensity
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    /// Build the mixer graph. Does nothing without a device or if already built.
    pub fn build_graph(&mut self) -> Result<()> {
        if self.graph.is_some() {
            return Ok(());
        }
        let Some(manager) = &mut self.manager else {
            return Ok(());
        };

        let mut reverb_builder = TrackBuilder::new();
        let reverb = reverb_builder.add_effect(
            ReverbBuilder::new()
                .feedback(REVERB_FEEDBACK)
                .mix(Mix(reverb_mix(self.intensity))),
        );
        let mut reverb_bus = manager
            .add_sub_track(reverb_builder)
            .map_err(|e| FlareError::AudioError(format!("Failed to create reverb bus: {e}")))?;

        let delay_time = NoteValue::EIGHTH.seconds(self.bpm);
        let mut music_builder = TrackBuilder::new();
        let filter = music_builder.add_effect(
            FilterBuilder::new()
                .mode(FilterMode::LowPass)
                .cutoff(filter_cutoff(self.intensity) as f64),
        );
        music_builder.add_effect(
            DelayBuilder::new()
                .delay_time(Duration::from_secs_f64(delay_time))
                .feedback(Decibels(amplitude_to_db(DELAY_FEEDBACK)))
                .mix(Mix(DELAY_MIX)),
        );
        let music_bus = reverb_bus
            .add_sub_track(music_builder)
            .map_err(|e| FlareError::AudioError(format!("Failed to create music bus: {e}")))?;

        manager
            .main_track()
            .set_volume(Decibels(amplitude_to_db(self.volume)), Tween::default());

        self.graph = Some(SignalGraph {
            music_bus,
            reverb_bus,
            filter,
            reverb,
        });
        tracing::info!(bpm = self.bpm, "music graph ready");
        Ok(())
    }

    /// Render a note's samples at the engine tempo
    pub fn render_note(&self, command: &NoteCommand) -> Result<Vec<f32>> {
        let frequency = note::frequency(command.note)?;
        let hold = command.duration.seconds(self.bpm) as f32;
        Ok(synth::render(
            &command.voice.patch(),
            frequency,
            hold,
            SAMPLE_RATE,
        ))
    }

    fn sound_for(&mut self, command: &NoteCommand) -> Result<StaticSoundData> {
        let key = (command.voice, command.note, command.duration);
        if let Some(data) = self.sound_cache.get(&key) {
            return Ok(data.clone());
        }

        let frames: Arc<[Frame]> = self
            .render_note(command)?
            .into_iter()
            .map(Frame::from_mono)
            .collect();
        let data = StaticSoundData {
            sample_rate: SAMPLE_RATE,
            frames,
            settings: StaticSoundSettings::default(),
            slice: None,
        };
        self.sound_cache.insert(key, data.clone());
        Ok(data)
    }

    /// Play a note on its voice's bus. Silent engines accept and drop it.
    pub fn play(&mut self, command: &NoteCommand) -> Result<()> {
        if self.graph.is_none() {
            return Ok(());
        }
        let data = self.sound_for(command)?;
        let Some(graph) = &mut self.graph else {
            return Ok(());
        };

        let track = match command.voice.patch().bus {
            Bus::Music => &mut graph.music_bus,
            Bus::Reverb => &mut graph.reverb_bus,
        };
        track.play(data).map_err(|e| {
            FlareError::AudioError(format!(
                "Failed to play {} {}: {e}",
                command.voice, command.note
            ))
        })?;
        Ok(())
    }

    /// Number of distinct note buffers rendered so far
    pub fn cached_sounds(&self) -> usize {
        self.sound_cache.len()
    }

    /// Open the filter and deepen the reverb as intensity rises
    pub fn set_intensity(&mut self, intensity: f32) {
        self.intensity = intensity.clamp(0.0, 1.0);
        if let Some(graph) = &mut self.graph {
            graph
                .filter
                .set_cutoff(filter_cutoff(self.intensity) as f64, Tween::default());
            graph
                .reverb
                .set_mix(Mix(reverb_mix(self.intensity)), Tween::default());
        }
    }

    /// Set the master volume from a linear level in `[0, 1]`
    pub fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
        if let Some(manager) = &mut self.manager {
            manager
                .main_track()
                .set_volume(Decibels(amplitude_to_db(self.volume)), Tween::default());
        }
    }
}
