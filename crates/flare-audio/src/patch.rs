//! Voice presets: oscillator, envelope, level and routing for each voice

use crate::envelope::Envelope;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Every sound source the music layer can play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Voice {
    Bass,
    Lead,
    Drums,
    Dash,
    Jump,
    Collect,
    Damage,
    PowerUp,
}

impl Voice {
    pub const ALL: [Voice; 8] = [
        Voice::Bass,
        Voice::Lead,
        Voice::Drums,
        Voice::Dash,
        Voice::Jump,
        Voice::Collect,
        Voice::Damage,
        Voice::PowerUp,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Voice::Bass => "bass",
            Voice::Lead => "lead",
            Voice::Drums => "drums",
            Voice::Dash => "dash",
            Voice::Jump => "jump",
            Voice::Collect => "collect",
            Voice::Damage => "damage",
            Voice::PowerUp => "powerup",
        }
    }

    pub fn patch(&self) -> Patch {
        match self {
            Voice::Bass => Patch {
                oscillator: Oscillator::Fm {
                    harmonicity: 0.5,
                    modulation_index: 2.0,
                },
                envelope: Envelope::new(0.1, 0.2, 0.3, 0.5),
                volume_db: -15.0,
                bus: Bus::Music,
            },
            Voice::Lead => Patch {
                oscillator: Oscillator::Saw,
                envelope: Envelope::new(0.1, 0.2, 0.4, 0.8),
                volume_db: -18.0,
                bus: Bus::Music,
            },
            Voice::Drums => Patch {
                oscillator: Oscillator::Membrane,
                envelope: Envelope::new(0.01, 0.2, 0.0, 0.1),
                volume_db: -12.0,
                bus: Bus::Reverb,
            },
            Voice::Dash => Patch {
                oscillator: Oscillator::Fm {
                    harmonicity: 5.0,
                    modulation_index: 3.0,
                },
                envelope: Envelope::new(0.01, 0.1, 0.0, 0.2),
                volume_db: -10.0,
                bus: Bus::Reverb,
            },
            Voice::Jump => Patch {
                oscillator: Oscillator::Triangle,
                envelope: Envelope::new(0.01, 0.1, 0.0, 0.2),
                volume_db: -12.0,
                bus: Bus::Reverb,
            },
            Voice::Collect => Patch {
                oscillator: Oscillator::Sine,
                envelope: Envelope::new(0.01, 0.3, 0.0, 0.3),
                volume_db: -8.0,
                bus: Bus::Reverb,
            },
            Voice::Damage => Patch {
                oscillator: Oscillator::Fm {
                    harmonicity: 0.25,
                    modulation_index: 8.0,
                },
                envelope: Envelope::new(0.01, 0.2, 0.0, 0.1),
                volume_db: -8.0,
                bus: Bus::Reverb,
            },
            Voice::PowerUp => Patch {
                oscillator: Oscillator::Saw,
                envelope: Envelope::new(0.01, 0.2, 0.5, 0.8),
                volume_db: -6.0,
                bus: Bus::Reverb,
            },
        }
    }
}

impl fmt::Display for Voice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Tone generator of a voice
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Oscillator {
    Sine,
    Triangle,
    Saw,
    /// Two-operator FM: modulator at `harmonicity × f`, depth `modulation_index`
    Fm {
        harmonicity: f32,
        modulation_index: f32,
    },
    /// Sine with a fast downward pitch sweep, for kick drums
    Membrane,
}

/// Mixer track a voice is routed to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Bus {
    /// Filtered and delayed, then reverberated
    Music,
    /// Reverb only
    Reverb,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Patch {
    pub oscillator: Oscillator,
    pub envelope: Envelope,
    pub volume_db: f32,
    pub bus: Bus,
}
