//! Offline rendering of a single note into a mono sample buffer
//!
//! Notes are short and the set of (voice, pitch, duration) triples the
//! layer plays is small, so each is rendered once and cached by the engine.

use crate::patch::{Oscillator, Patch};
use std::f32::consts::TAU;

/// Octaves the membrane pitch sweep starts above the note
const MEMBRANE_OCTAVES: f32 = 10.0;
/// Seconds the membrane sweep takes to settle on the note
const MEMBRANE_PITCH_DECAY: f32 = 0.05;

/// Linear gain for a level in decibels
pub fn db_to_gain(db: f32) -> f32 {
    10f32.powf(db / 20.0)
}

/// Render `patch` playing `frequency` Hz held for `hold` seconds.
///
/// The buffer covers the hold plus the envelope release.
pub fn render(patch: &Patch, frequency: f32, hold: f32, sample_rate: u32) -> Vec<f32> {
    let sr = sample_rate as f32;
    let length = (patch.envelope.total_length(hold) * sr).ceil() as usize;
    let gain = db_to_gain(patch.volume_db);

    let mut samples = Vec::with_capacity(length);
    let mut phase = 0.0f32;
    let mut mod_phase = 0.0f32;

    for i in 0..length {
        let t = i as f32 / sr;
        let freq = match patch.oscillator {
            Oscillator::Membrane => membrane_frequency(frequency, t),
            _ => frequency,
        };

        let value = match patch.oscillator {
            Oscillator::Sine | Oscillator::Membrane => (phase * TAU).sin(),
            Oscillator::Triangle => 4.0 * (phase - 0.5).abs() - 1.0,
            Oscillator::Saw => 2.0 * phase - 1.0,
            Oscillator::Fm {
                modulation_index, ..
            } => (phase * TAU + modulation_index * (mod_phase * TAU).sin()).sin(),
        };

        samples.push(value * patch.envelope.level(t, hold) * gain);

        phase = (phase + freq / sr).fract();
        if let Oscillator::Fm { harmonicity, .. } = patch.oscillator {
            mod_phase = (mod_phase + freq * harmonicity / sr).fract();
        }
    }

    samples
}

fn membrane_frequency(frequency: f32, t: f32) -> f32 {
    if t >= MEMBRANE_PITCH_DECAY {
        return frequency;
    }
    let remaining = 1.0 - t / MEMBRANE_PITCH_DECAY;
    frequency * MEMBRANE_OCTAVES.powf(remaining)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::envelope::Envelope;
    use crate::patch::{Bus, Voice};

    const SR: u32 = 8000;

    fn sine_patch() -> Patch {
        Patch {
            oscillator: Oscillator::Sine,
            envelope: Envelope::new(0.001, 0.0, 1.0, 0.1),
            volume_db: 0.0,
            bus: Bus::Reverb,
        }
    }

    #[test]
    fn test_buffer_covers_hold_and_release() {
        let buffer = render(&sine_patch(), 440.0, 0.5, SR);
        assert!((4800..=4801).contains(&buffer.len()));
        assert_eq!(buffer[0], 0.0);
        assert!(buffer.last().unwrap().abs() < 0.01);
    }

    #[test]
    fn test_sine_pitch() {
        let buffer = render(&sine_patch(), 200.0, 1.0, SR);
        // Count rising zero crossings across the held second
        let crossings = buffer[..8000]
            .windows(2)
            .filter(|w| w[0] < 0.0 && w[1] >= 0.0)
            .count();
        assert!((199..=201).contains(&crossings), "crossings {crossings}");
    }

    #[test]
    fn test_volume_scales_output() {
        let patch = Voice::Collect.patch();
        let buffer = render(&patch, 659.25, 0.125, SR);
        let peak = buffer.iter().fold(0.0f32, |m, s| m.max(s.abs()));
        let gain = db_to_gain(-8.0);
        assert!(peak <= gain + 1e-6);
        assert!(peak > gain * 0.5);
    }

    #[test]
    fn test_every_voice_renders_finite_samples() {
        for voice in Voice::ALL {
            let buffer = render(&voice.patch(), 110.0, 0.25, SR);
            assert!(!buffer.is_empty());
            assert!(buffer.iter().all(|s| s.is_finite() && s.abs() <= 1.0), "{voice}");
        }
    }

    #[test]
    fn test_membrane_sweeps_down() {
        assert!((membrane_frequency(32.7, 0.0) - 327.0).abs() < 0.01);
        assert_eq!(membrane_frequency(32.7, 0.2), 32.7);
        assert!(membrane_frequency(32.7, 0.025) < membrane_frequency(32.7, 0.01));
    }

    #[test]
    fn test_db_to_gain() {
        assert!((db_to_gain(0.0) - 1.0).abs() < 1e-6);
        assert!((db_to_gain(-20.0) - 0.1).abs() < 1e-6);
    }
}
