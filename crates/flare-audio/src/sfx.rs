//! One-shot sound effects
//!
//! An effect is its first note, played at once, plus follow-up notes held in
//! a timer queue. Follow-ups are independent of the ambient sequencer and
//! still fire after it stops.

use crate::note::NoteValue;
use crate::patch::Voice;
use crate::sequencer::NoteCommand;
use flare_runtime::TimerQueue;

/// Gameplay sound effects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sfx {
    Dash,
    Jump,
    Collect,
    Damage,
    PowerUp,
}

impl Sfx {
    pub fn voice(&self) -> Voice {
        match self {
            Sfx::Dash => Voice::Dash,
            Sfx::Jump => Voice::Jump,
            Sfx::Collect => Voice::Collect,
            Sfx::Damage => Voice::Damage,
            Sfx::PowerUp => Voice::PowerUp,
        }
    }

    /// Notes of the effect as (delay seconds, pitch, duration)
    fn phrase(&self) -> &'static [(f64, &'static str, NoteValue)] {
        match self {
            Sfx::Dash => &[(0.0, "F4", NoteValue::SIXTEENTH)],
            Sfx::Jump => &[(0.0, "C5", NoteValue::THIRTY_SECOND)],
            Sfx::Collect => &[
                (0.0, "E5", NoteValue::SIXTEENTH),
                (0.1, "G5", NoteValue::SIXTEENTH),
            ],
            Sfx::Damage => &[(0.0, "A2", NoteValue::EIGHTH)],
            Sfx::PowerUp => &[
                (0.0, "C4", NoteValue::SIXTEENTH),
                (0.1, "E4", NoteValue::SIXTEENTH),
                (0.2, "G4", NoteValue::SIXTEENTH),
                (0.3, "C5", NoteValue::SIXTEENTH),
            ],
        }
    }
}

/// Plays effect phrases, holding back their delayed notes
#[derive(Default)]
pub struct SfxPlayer {
    follow_ups: TimerQueue<NoteCommand>,
}

impl SfxPlayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start an effect. Returns the notes to play now; the rest are queued.
    pub fn trigger(&mut self, sfx: Sfx) -> Vec<NoteCommand> {
        let voice = sfx.voice();
        let now = self.follow_ups.now();
        let mut immediate = Vec::new();

        for &(delay, note, duration) in sfx.phrase() {
            if delay <= 0.0 {
                immediate.push(NoteCommand {
                    voice,
                    note,
                    duration,
                    at: now,
                });
            } else {
                self.follow_ups.schedule(
                    delay,
                    NoteCommand {
                        voice,
                        note,
                        duration,
                        at: now + delay,
                    },
                );
            }
        }

        immediate
    }

    /// Advance by `dt` seconds and return follow-up notes that came due
    pub fn advance(&mut self, dt: f64) -> Vec<NoteCommand> {
        self.follow_ups.drain_due(dt)
    }

    /// Follow-up notes still waiting
    pub fn pending(&self) -> usize {
        self.follow_ups.len()
    }

    pub fn clear(&mut self) {
        self.follow_ups.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pitches(notes: &[NoteCommand]) -> Vec<&'static str> {
        notes.iter().map(|n| n.note).collect()
    }

    #[test]
    fn test_single_note_effects() {
        let mut player = SfxPlayer::new();

        let dash = player.trigger(Sfx::Dash);
        assert_eq!(pitches(&dash), ["F4"]);
        assert_eq!(dash[0].voice, Voice::Dash);
        assert_eq!(dash[0].duration, NoteValue::SIXTEENTH);

        let jump = player.trigger(Sfx::Jump);
        assert_eq!(pitches(&jump), ["C5"]);
        assert_eq!(jump[0].duration, NoteValue::THIRTY_SECOND);

        let damage = player.trigger(Sfx::Damage);
        assert_eq!(pitches(&damage), ["A2"]);
        assert_eq!(damage[0].duration, NoteValue::EIGHTH);

        assert_eq!(player.pending(), 0);
    }

    #[test]
    fn test_collect_follow_up() {
        let mut player = SfxPlayer::new();
        assert_eq!(pitches(&player.trigger(Sfx::Collect)), ["E5"]);
        assert_eq!(player.pending(), 1);

        assert!(player.advance(0.05).is_empty());
        assert_eq!(pitches(&player.advance(0.06)), ["G5"]);
        assert_eq!(player.pending(), 0);
    }

    #[test]
    fn test_power_up_arpeggio() {
        let mut player = SfxPlayer::new();
        let mut played = pitches(&player.trigger(Sfx::PowerUp));
        for _ in 0..30 {
            played.extend(pitches(&player.advance(1.0 / 60.0)));
        }
        assert_eq!(played, ["C4", "E4", "G4", "C5"]);
    }

    #[test]
    fn test_follow_ups_keep_their_time() {
        let mut player = SfxPlayer::new();
        player.advance(1.0);
        player.trigger(Sfx::PowerUp);
        let late = player.advance(1.0);
        let times: Vec<f64> = late.iter().map(|n| n.at).collect();
        assert_eq!(times.len(), 3);
        assert!((times[0] - 1.1).abs() < 1e-9);
        assert!((times[2] - 1.3).abs() < 1e-9);
    }
}
