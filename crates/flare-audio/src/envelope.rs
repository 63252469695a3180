//! Linear ADSR amplitude envelope

/// Attack, decay and release in seconds; sustain is a level in `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Envelope {
    pub attack: f32,
    pub decay: f32,
    pub sustain: f32,
    pub release: f32,
}

impl Envelope {
    pub const fn new(attack: f32, decay: f32, sustain: f32, release: f32) -> Self {
        Self {
            attack,
            decay,
            sustain,
            release,
        }
    }

    /// Level while the note is held, `t` seconds after the trigger
    fn held_level(&self, t: f32) -> f32 {
        if t < self.attack {
            return t / self.attack;
        }
        let t = t - self.attack;
        if t < self.decay {
            return 1.0 - (1.0 - self.sustain) * (t / self.decay);
        }
        self.sustain
    }

    /// Amplitude at `t` seconds for a note held `hold` seconds
    pub fn level(&self, t: f32, hold: f32) -> f32 {
        if t < 0.0 {
            return 0.0;
        }
        if t < hold {
            return self.held_level(t);
        }
        let since_release = t - hold;
        if since_release >= self.release {
            return 0.0;
        }
        let start = self.held_level(hold);
        start * (1.0 - since_release / self.release)
    }

    /// Time from trigger until the envelope reaches silence
    pub fn total_length(&self, hold: f32) -> f32 {
        hold.max(0.0) + self.release
    }
}
