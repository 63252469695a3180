//! Gameplay events the cosmetic layers react to

use flare_core::Vec3;

/// A gameplay event broadcast to every effect layer
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// Any user input (click, key press). The first one unlocks audio.
    ActionPressed(String),
    /// Player left the ground
    PlayerJumped { position: Vec3 },
    /// Player started a dash
    DashStarted { position: Vec3 },
    /// Player's dash finished
    DashEnded,
    /// Player picked up a collectible
    ItemCollected { position: Vec3 },
    /// Player got hurt
    DamageTaken,
    /// Player picked up a power-up
    PowerUpCollected { position: Vec3 },
    /// Game intensity changed, in [0, 1]
    IntensityChanged(f32),
    /// Master volume changed, in [0, 1]
    VolumeChanged(f32),
}

impl GameEvent {
    /// Short name used in logs and summaries
    pub fn label(&self) -> &'static str {
        match self {
            GameEvent::ActionPressed(_) => "input",
            GameEvent::PlayerJumped { .. } => "jump",
            GameEvent::DashStarted { .. } => "dash_start",
            GameEvent::DashEnded => "dash_end",
            GameEvent::ItemCollected { .. } => "collect",
            GameEvent::DamageTaken => "damage",
            GameEvent::PowerUpCollected { .. } => "powerup",
            GameEvent::IntensityChanged(_) => "intensity",
            GameEvent::VolumeChanged(_) => "volume",
        }
    }
}
