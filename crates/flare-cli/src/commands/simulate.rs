//! Simulate command: drives the effect layers through a scripted timeline

use crate::config::FlareConfig;
use crate::timeline::Timeline;
use anyhow::{bail, Context, Result};
use flare_audio::MusicSystem;
use flare_core::Vec3;
use flare_ecs::FlareWorld;
use flare_particles::ParticleSystem;
use flare_runtime::{EventBus, GameClock, RuntimeSystem};
use flare_wings::WingSystem;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Player speed along +x, units per second
const PLAYER_SPEED: f32 = 1.0;
/// Seconds simulated past the last event when no length is given
const TAIL_SECONDS: f64 = 2.0;

pub struct SimulateArgs {
    pub timeline: PathBuf,
    pub config: Option<PathBuf>,
    pub seconds: Option<f64>,
    pub fps: u32,
    pub format: String,
    pub silent: bool,
}

#[derive(Debug, Serialize)]
pub struct Summary {
    pub frames: usize,
    pub seconds: f64,
    pub events: usize,
    pub particles: ParticleSummary,
    pub music: MusicSummary,
    pub wings: WingSummary,
}

#[derive(Debug, Serialize)]
pub struct ParticleSummary {
    pub capacity: usize,
    pub peak_active: usize,
    pub final_active: usize,
    pub spawned: usize,
    pub dropped: usize,
}

#[derive(Debug, Serialize)]
pub struct MusicSummary {
    pub unlocked: bool,
    pub playing: bool,
    pub device: bool,
    pub notes: BTreeMap<String, usize>,
    pub total_notes: usize,
}

#[derive(Debug, Serialize)]
pub struct WingSummary {
    pub attached: bool,
    pub dashes: usize,
    pub visible_seconds: f64,
}

pub fn run(args: SimulateArgs) -> Result<()> {
    if args.format != "text" && args.format != "json" {
        bail!("unknown format '{}'; valid values: text, json", args.format);
    }
    if args.fps == 0 {
        bail!("--fps must be at least 1");
    }

    let mut config = match &args.config {
        Some(path) => FlareConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => FlareConfig::default(),
    };
    if args.silent {
        config.music.silent = true;
    }
    config.validate().context("Invalid configuration")?;

    let timeline = Timeline::load(&args.timeline)
        .with_context(|| format!("Failed to load timeline {}", args.timeline.display()))?;
    if timeline.is_empty() {
        tracing::warn!("timeline has no events; only ambient effects will run");
    } else {
        tracing::info!(events = timeline.len(), end = timeline.end(), "timeline loaded");
    }

    let seconds = args.seconds.unwrap_or(timeline.end() + TAIL_SECONDS);
    let summary = simulate(&config, &timeline, seconds, args.fps)?;

    if args.format == "json" {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_text(&summary);
    }
    Ok(())
}

/// Run the three layers against `timeline` for `seconds` at `fps`
pub fn simulate(config: &FlareConfig, timeline: &Timeline, seconds: f64, fps: u32) -> Result<Summary> {
    let dt = 1.0 / fps as f64;
    let frames = (seconds.max(0.0) * fps as f64).ceil() as usize;

    let mut world = FlareWorld::new();
    let player = world.spawn(config.wings.player.as_str())?;
    world.set_position(player, Vec3::ZERO)?;

    let mut particles = ParticleSystem::new(config.particles.clone());
    let mut music = MusicSystem::new(config.music.clone());
    let mut wings = WingSystem::new(config.wings.clone());

    for system in systems(&mut particles, &mut music, &mut wings) {
        system
            .initialize(&mut world)
            .with_context(|| format!("Failed to initialize {}", system.name()))?;
    }

    let mut clock = GameClock::new();
    let mut bus = EventBus::new();
    let mut next_event = 0;
    let mut peak_active = particles.active_count();

    for _ in 0..frames {
        clock.advance(dt);
        let now = clock.total_time();

        let position = Vec3::new(now as f32 * PLAYER_SPEED, 0.0, 0.0);
        world.set_position(player, position)?;

        let events = timeline.events();
        while next_event < events.len() && events[next_event].at <= now {
            bus.push(events[next_event].to_game_event(position)?);
            next_event += 1;
        }
        let frame_events = bus.drain();

        while clock.take_fixed_step() {
            for system in systems(&mut particles, &mut music, &mut wings) {
                system.fixed_update(&mut world, clock.fixed_timestep())?;
            }
        }

        for system in systems(&mut particles, &mut music, &mut wings) {
            system.handle_events(&mut world, &frame_events)?;
            system.update(&mut world, clock.delta_time())?;
        }
        peak_active = peak_active.max(particles.active_count());
    }

    let summary = Summary {
        frames,
        seconds: clock.total_time(),
        events: next_event,
        particles: ParticleSummary {
            capacity: particles.pool().capacity(),
            peak_active,
            final_active: particles.active_count(),
            spawned: particles.stats().spawned,
            dropped: particles.stats().dropped,
        },
        music: MusicSummary {
            unlocked: music.is_initialized(),
            playing: music.is_playing(),
            device: music.engine().is_available(),
            notes: music
                .notes_by_voice()
                .iter()
                .map(|(voice, count)| (voice.label().to_string(), *count))
                .collect(),
            total_notes: music.total_notes(),
        },
        wings: WingSummary {
            attached: wings.is_initialized(),
            dashes: wings.dash_count(),
            visible_seconds: wings.visible_time(),
        },
    };

    for system in systems(&mut particles, &mut music, &mut wings) {
        system.shutdown()?;
    }

    Ok(summary)
}

fn systems<'a>(
    particles: &'a mut ParticleSystem,
    music: &'a mut MusicSystem,
    wings: &'a mut WingSystem,
) -> [&'a mut dyn RuntimeSystem; 3] {
    [
        particles as &mut dyn RuntimeSystem,
        music as &mut dyn RuntimeSystem,
        wings as &mut dyn RuntimeSystem,
    ]
}

fn print_text(summary: &Summary) {
    println!(
        "Simulated {:.2}s ({} frames, {} events)",
        summary.seconds, summary.frames, summary.events
    );
    println!();

    let p = &summary.particles;
    println!("Particles");
    println!("  Capacity:     {}", p.capacity);
    println!("  Peak active:  {}", p.peak_active);
    println!("  Final active: {}", p.final_active);
    println!("  Spawned:      {}", p.spawned);
    if p.dropped > 0 {
        println!("  Dropped:      {} (pool exhausted)", p.dropped);
    }
    println!();

    let m = &summary.music;
    println!("Music");
    println!(
        "  Unlocked: {}  Playing: {}  Device: {}",
        m.unlocked, m.playing, m.device
    );
    if m.notes.is_empty() {
        println!("  No notes played.");
    } else {
        for (voice, count) in &m.notes {
            println!("  {:<8} {}", voice, count);
        }
        println!("  Total:   {}", m.total_notes);
    }
    println!();

    let w = &summary.wings;
    println!("Wings");
    println!("  Attached: {}", w.attached);
    println!("  Dashes:   {}", w.dashes);
    println!("  Visible:  {:.2}s", w.visible_seconds);
}

#[cfg(test)]
mod tests {
    use super::*;

    const RUN: &str = r#"
        [[event]]
        at = 0.1
        kind = "input"

        [[event]]
        at = 0.5
        kind = "jump"

        [[event]]
        at = 1.0
        kind = "dash_start"

        [[event]]
        at = 1.5
        kind = "dash_end"

        [[event]]
        at = 2.0
        kind = "collect"
        position = [2.0, 1.0, 0.0]
    "#;

    fn silent_config() -> FlareConfig {
        let mut config = FlareConfig::default();
        config.music.silent = true;
        config
    }

    #[test]
    fn test_simulation_summary() {
        let timeline = Timeline::from_toml_str(RUN).unwrap();
        let summary = simulate(&silent_config(), &timeline, 3.0, 60).unwrap();

        assert_eq!(summary.frames, 180);
        assert_eq!(summary.events, 5);

        // 50 ambient + 6 jump, then 8 trail, then 12 sparkle + 20 explosion
        assert_eq!(summary.particles.spawned, 50 + 6 + 8 + 32);
        assert_eq!(summary.particles.dropped, 0);
        assert!(summary.particles.peak_active >= 82);
        assert_eq!(summary.particles.final_active, 50);

        assert!(summary.music.unlocked);
        assert!(summary.music.playing);
        assert!(!summary.music.device);
        assert_eq!(summary.music.notes.get("jump"), Some(&1));
        assert_eq!(summary.music.notes.get("dash"), Some(&1));
        assert_eq!(summary.music.notes.get("collect"), Some(&2));
        assert!(summary.music.notes.get("bass").copied().unwrap_or(0) >= 5);

        assert!(summary.wings.attached);
        assert_eq!(summary.wings.dashes, 1);
        // Visible from the dash start until 0.5 s after it ends
        assert!((summary.wings.visible_seconds - 1.0).abs() < 0.05);
    }

    #[test]
    fn test_small_pool_drops_particles() {
        let mut config = silent_config();
        config.particles.capacity = 60;
        let timeline = Timeline::from_toml_str(RUN).unwrap();
        let summary = simulate(&config, &timeline, 2.5, 30).unwrap();

        assert!(summary.particles.dropped > 0);
        assert!(summary.particles.peak_active <= 60);
    }

    #[test]
    fn test_no_input_keeps_audio_locked() {
        let timeline =
            Timeline::from_toml_str("[[event]]\nat = 0.2\nkind = \"damage\"").unwrap();
        let summary = simulate(&silent_config(), &timeline, 1.0, 60).unwrap();
        assert!(!summary.music.unlocked);
        assert_eq!(summary.music.total_notes, 0);
        assert_eq!(summary.events, 1);
    }

    #[test]
    fn test_summary_serializes() {
        let timeline = Timeline::default();
        let summary = simulate(&silent_config(), &timeline, 0.5, 60).unwrap();
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["particles"]["final_active"], 50);
        assert_eq!(json["wings"]["dashes"], 0);
    }
}
