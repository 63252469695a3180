//! Pitch names and note values
//!
//! Pitches use scientific notation (`C4`, `F#2`, `Bb3`) with A4 = 440 Hz.
//! Durations use the `<division>n` form (`4n` is a quarter note), with an
//! optional trailing `.` for dotted values.

use flare_core::{FlareError, Result};
use std::fmt;
use std::str::FromStr;

const A4_HZ: f32 = 440.0;
const A4_MIDI: i32 = 69;

/// MIDI note number of a pitch name
pub fn midi_number(name: &str) -> Result<i32> {
    let mut chars = name.trim().chars().peekable();

    let semitone = match chars.next().map(|c| c.to_ascii_uppercase()) {
        Some('C') => 0,
        Some('D') => 2,
        Some('E') => 4,
        Some('F') => 5,
        Some('G') => 7,
        Some('A') => 9,
        Some('B') => 11,
        _ => return Err(FlareError::ParseError(format!("Invalid note name: '{name}'"))),
    };

    let mut accidental = 0;
    while let Some(&c) = chars.peek() {
        match c {
            '#' => accidental += 1,
            'b' => accidental -= 1,
            _ => break,
        }
        chars.next();
    }

    let octave: String = chars.collect();
    let octave: i32 = octave
        .parse()
        .map_err(|_| FlareError::ParseError(format!("Invalid octave in note: '{name}'")))?;

    Ok((octave + 1) * 12 + semitone + accidental)
}

/// Frequency in Hz of a pitch name
pub fn frequency(name: &str) -> Result<f32> {
    let midi = midi_number(name)?;
    Ok(midi_to_hz(midi))
}

pub fn midi_to_hz(midi: i32) -> f32 {
    A4_HZ * 2f32.powf((midi - A4_MIDI) as f32 / 12.0)
}

/// A rhythmic duration relative to the tempo
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NoteValue {
    /// 1 = whole note, 4 = quarter, 16 = sixteenth
    pub division: u32,
    pub dotted: bool,
}

impl NoteValue {
    pub const QUARTER: NoteValue = NoteValue::new(4);
    pub const EIGHTH: NoteValue = NoteValue::new(8);
    pub const SIXTEENTH: NoteValue = NoteValue::new(16);
    pub const THIRTY_SECOND: NoteValue = NoteValue::new(32);

    pub const fn new(division: u32) -> Self {
        Self {
            division,
            dotted: false,
        }
    }

    /// Length in seconds at `bpm` quarter notes per minute
    pub fn seconds(&self, bpm: f64) -> f64 {
        let whole = 240.0 / bpm;
        let base = whole / self.division as f64;
        if self.dotted {
            base * 1.5
        } else {
            base
        }
    }
}

impl FromStr for NoteValue {
    type Err = FlareError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let (body, dotted) = match s.strip_suffix('.') {
            Some(body) => (body, true),
            None => (s, false),
        };
        let digits = body
            .strip_suffix('n')
            .ok_or_else(|| FlareError::ParseError(format!("Invalid note value: '{s}'")))?;
        let division: u32 = digits
            .parse()
            .map_err(|_| FlareError::ParseError(format!("Invalid note value: '{s}'")))?;

        if !division.is_power_of_two() || division > 64 {
            return Err(FlareError::ParseError(format!(
                "Unsupported note division: '{s}'"
            )));
        }

        Ok(Self { division, dotted })
    }
}

impl fmt::Display for NoteValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}n", self.division)?;
        if self.dotted {
            write!(f, ".")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 0.01
    }

    #[test]
    fn test_reference_pitches() {
        assert!(close(frequency("A4").unwrap(), 440.0));
        assert!(close(frequency("C4").unwrap(), 261.63));
        assert!(close(frequency("C2").unwrap(), 65.41));
        assert!(close(frequency("A2").unwrap(), 110.0));
        assert!(close(frequency("C5").unwrap(), 523.25));
    }

    #[test]
    fn test_accidentals() {
        assert_eq!(midi_number("F#4").unwrap(), midi_number("Gb4").unwrap());
        assert!(close(frequency("Bb3").unwrap(), 233.08));
        assert_eq!(midi_number("C1").unwrap(), 24);
        assert_eq!(midi_number("C-1").unwrap(), 0);
    }

    #[test]
    fn test_invalid_notes() {
        assert!(frequency("H2").is_err());
        assert!(frequency("C").is_err());
        assert!(frequency("").is_err());
        assert!(frequency("C#x").is_err());
    }

    #[test]
    fn test_note_values() {
        let quarter: NoteValue = "4n".parse().unwrap();
        assert_eq!(quarter, NoteValue::QUARTER);
        assert!((quarter.seconds(120.0) - 0.5).abs() < 1e-9);
        assert!((NoteValue::SIXTEENTH.seconds(120.0) - 0.125).abs() < 1e-9);
        assert!((NoteValue::THIRTY_SECOND.seconds(120.0) - 0.0625).abs() < 1e-9);

        let dotted: NoteValue = "8n.".parse().unwrap();
        assert!(dotted.dotted);
        assert!((dotted.seconds(120.0) - 0.375).abs() < 1e-9);
        assert_eq!(dotted.to_string(), "8n.");

        assert!((NoteValue::QUARTER.seconds(60.0) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_invalid_note_values() {
        assert!("4".parse::<NoteValue>().is_err());
        assert!("3n".parse::<NoteValue>().is_err());
        assert!("0n".parse::<NoteValue>().is_err());
        assert!("xn".parse::<NoteValue>().is_err());
    }
}
