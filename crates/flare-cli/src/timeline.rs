//! Scripted gameplay events for headless simulation
//!
//! ```toml
//! [[event]]
//! at = 0.0
//! kind = "input"
//!
//! [[event]]
//! at = 1.5
//! kind = "collect"
//! position = [3.0, 1.0, 0.0]
//! ```

use flare_core::{FlareError, Result, Vec3};
use flare_runtime::GameEvent;
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Input,
    Jump,
    DashStart,
    DashEnd,
    Collect,
    Damage,
    Powerup,
    Intensity,
    Volume,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TimelineEvent {
    /// Seconds from the start of the run
    pub at: f64,
    pub kind: EventKind,
    /// Where it happened; defaults to the player's position at that moment
    pub position: Option<[f32; 3]>,
    /// Level for `intensity` and `volume`
    pub value: Option<f32>,
    /// Input action name for `input`
    pub action: Option<String>,
}

impl TimelineEvent {
    pub fn to_game_event(&self, player_position: Vec3) -> Result<GameEvent> {
        let position = self
            .position
            .map(Vec3::from_array)
            .unwrap_or(player_position);

        Ok(match self.kind {
            EventKind::Input => {
                GameEvent::ActionPressed(self.action.clone().unwrap_or_else(|| "start".into()))
            }
            EventKind::Jump => GameEvent::PlayerJumped { position },
            EventKind::DashStart => GameEvent::DashStarted { position },
            EventKind::DashEnd => GameEvent::DashEnded,
            EventKind::Collect => GameEvent::ItemCollected { position },
            EventKind::Damage => GameEvent::DamageTaken,
            EventKind::Powerup => GameEvent::PowerUpCollected { position },
            EventKind::Intensity => GameEvent::IntensityChanged(self.required_value()?),
            EventKind::Volume => GameEvent::VolumeChanged(self.required_value()?),
        })
    }

    fn required_value(&self) -> Result<f32> {
        self.value.ok_or_else(|| {
            FlareError::ParseError(format!("event at {}s needs a `value`", self.at))
        })
    }
}

/// Events ordered by time
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Timeline {
    #[serde(default, rename = "event")]
    events: Vec<TimelineEvent>,
}

impl Timeline {
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let mut timeline: Timeline = toml::from_str(source)?;
        if let Some(bad) = timeline.events.iter().find(|e| !e.at.is_finite() || e.at < 0.0) {
            return Err(FlareError::ParseError(format!(
                "event time must be a non-negative number, got {}",
                bad.at
            )));
        }
        // Stable, so same-time events keep file order
        timeline.events.sort_by(|a, b| a.at.total_cmp(&b.at));
        Ok(timeline)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    pub fn events(&self) -> &[TimelineEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Time of the last event
    pub fn end(&self) -> f64 {
        self.events.last().map(|e| e.at).unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
        [[event]]
        at = 2.0
        kind = "dash_end"

        [[event]]
        at = 0.0
        kind = "input"
        action = "jump"

        [[event]]
        at = 1.0
        kind = "dash_start"
        position = [1.0, 2.0, 3.0]

        [[event]]
        at = 1.5
        kind = "intensity"
        value = 0.9
    "#;

    #[test]
    fn test_parse_and_sort() {
        let timeline = Timeline::from_toml_str(SAMPLE).unwrap();
        let kinds: Vec<_> = timeline.events().iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            vec![
                EventKind::Input,
                EventKind::DashStart,
                EventKind::Intensity,
                EventKind::DashEnd
            ]
        );
        assert_eq!(timeline.end(), 2.0);
    }

    #[test]
    fn test_convert_events() {
        let timeline = Timeline::from_toml_str(SAMPLE).unwrap();
        let player = Vec3::new(5.0, 0.0, 0.0);
        let events: Vec<GameEvent> = timeline
            .events()
            .iter()
            .map(|e| e.to_game_event(player).unwrap())
            .collect();

        assert_eq!(events[0], GameEvent::ActionPressed("jump".into()));
        assert_eq!(
            events[1],
            GameEvent::DashStarted {
                position: Vec3::new(1.0, 2.0, 3.0)
            }
        );
        assert_eq!(events[2], GameEvent::IntensityChanged(0.9));
        assert_eq!(events[3], GameEvent::DashEnded);

        let jump = TimelineEvent {
            at: 0.0,
            kind: EventKind::Jump,
            position: None,
            value: None,
            action: None,
        };
        assert_eq!(
            jump.to_game_event(player).unwrap(),
            GameEvent::PlayerJumped { position: player }
        );
    }

    #[test]
    fn test_rejects_bad_events() {
        assert!(Timeline::from_toml_str("[[event]]\nat = -1.0\nkind = \"jump\"").is_err());
        assert!(Timeline::from_toml_str("[[event]]\nat = 1.0\nkind = \"teleport\"").is_err());

        let volume = Timeline::from_toml_str("[[event]]\nat = 1.0\nkind = \"volume\"").unwrap();
        assert!(volume.events()[0].to_game_event(Vec3::ZERO).is_err());
    }

    #[test]
    fn test_empty_timeline() {
        let timeline = Timeline::from_toml_str("").unwrap();
        assert!(timeline.is_empty());
        assert_eq!(timeline.end(), 0.0);
    }
}
