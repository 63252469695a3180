//! Ambient pattern sequencer
//!
//! Three looping parts (bass, drums, lead) driven by a `TimerQueue`. Each
//! part reschedules itself from the instant it fired, so the groove keeps
//! its period no matter how the frame time is sliced.

use crate::note::NoteValue;
use crate::patch::Voice;
use flare_runtime::TimerQueue;
use rand::Rng;

const BASS_NOTES: [&str; 4] = ["C2", "F2", "G2", "F2"];
const LEAD_NOTES: [&str; 8] = ["C4", "D4", "F4", "G4", "A4", "F4", "D4", "C4"];
const DRUM_NOTE: &str = "C1";

const BASS_START: f64 = 0.0;
const BASS_INTERVAL: f64 = 0.5;
const DRUM_START: f64 = 0.25;
const DRUM_INTERVAL: f64 = 1.0;
const DRUM_OFFBEAT: f64 = 0.25;
const LEAD_START: f64 = 2.0;
const LEAD_INTERVAL: f64 = 0.75;

/// Default chance that a lead step sounds
pub const LEAD_PROBABILITY: f64 = 0.6;

/// A note to play on a voice
#[derive(Debug, Clone, PartialEq)]
pub struct NoteCommand {
    pub voice: Voice,
    /// Pitch name, e.g. `C2`
    pub note: &'static str,
    pub duration: NoteValue,
    /// Time on the issuing clock, in seconds
    pub at: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cue {
    Bass,
    Drums,
    DrumOffbeat,
    Lead,
}

/// Drives the looping background parts
pub struct Sequencer {
    timers: TimerQueue<Cue>,
    playing: bool,
    bass_step: usize,
    lead_step: usize,
    lead_probability: f64,
}

impl Default for Sequencer {
    fn default() -> Self {
        Self::new(LEAD_PROBABILITY)
    }
}

impl Sequencer {
    pub fn new(lead_probability: f64) -> Self {
        Self {
            timers: TimerQueue::new(),
            playing: false,
            bass_step: 0,
            lead_step: 0,
            lead_probability: lead_probability.clamp(0.0, 1.0),
        }
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Start all parts from their first step. Returns false if already playing.
    pub fn start(&mut self) -> bool {
        if self.playing {
            return false;
        }
        self.playing = true;
        self.bass_step = 0;
        self.lead_step = 0;
        self.timers.clear();
        self.timers.schedule(BASS_START, Cue::Bass);
        self.timers.schedule(DRUM_START, Cue::Drums);
        self.timers.schedule(LEAD_START, Cue::Lead);
        true
    }

    /// Stop every part; nothing scheduled before the stop will fire
    pub fn stop(&mut self) {
        self.playing = false;
        self.timers.clear();
    }

    /// Seconds since the sequencer was created, on its own clock
    pub fn now(&self) -> f64 {
        self.timers.now()
    }

    /// Advance by `dt` seconds and return the notes that came due, in order
    pub fn advance<R: Rng>(&mut self, dt: f64, rng: &mut R) -> Vec<NoteCommand> {
        self.timers.advance(dt);
        let mut notes = Vec::new();

        while let Some(fired) = self.timers.pop_due() {
            let at = fired.due;
            match fired.payload {
                Cue::Bass => {
                    let note = BASS_NOTES[self.bass_step % BASS_NOTES.len()];
                    self.bass_step += 1;
                    notes.push(NoteCommand {
                        voice: Voice::Bass,
                        note,
                        duration: NoteValue::QUARTER,
                        at,
                    });
                    self.timers.schedule(BASS_INTERVAL, Cue::Bass);
                }
                Cue::Drums => {
                    notes.push(drum_hit(at));
                    self.timers.schedule(DRUM_OFFBEAT, Cue::DrumOffbeat);
                    self.timers.schedule(DRUM_INTERVAL, Cue::Drums);
                }
                Cue::DrumOffbeat => notes.push(drum_hit(at)),
                Cue::Lead => {
                    let note = LEAD_NOTES[self.lead_step % LEAD_NOTES.len()];
                    self.lead_step += 1;
                    if rng.gen_bool(self.lead_probability) {
                        notes.push(NoteCommand {
                            voice: Voice::Lead,
                            note,
                            duration: NoteValue::EIGHTH,
                            at,
                        });
                    }
                    self.timers.schedule(LEAD_INTERVAL, Cue::Lead);
                }
            }
        }

        notes
    }
}

fn drum_hit(at: f64) -> NoteCommand {
    NoteCommand {
        voice: Voice::Drums,
        note: DRUM_NOTE,
        duration: NoteValue::SIXTEENTH,
        at,
    }
}
