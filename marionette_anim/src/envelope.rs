// Amplitude envelopes and drum recoil.
//
// Three small state machines that turn discrete strikes or sustained arcs
// into continuous amplitudes:
// - `DecayedEnvelope`: jumps to full amplitude on a strike and falls back
//   to zero, linearly or exponentially with a zero-snap epsilon.
// - `SustainedEnvelope`: integrates toward 1 while a note is held and back
//   toward 0 after release, at independent attack/release rates.
// - `DrumRecoil`: a drum head's velocity-scaled displacement that returns
//   to rest at a constant comeback speed.
//
// All three are pure per-frame integrators with no references to the score;
// the owning animator decides when to fire them.

use crate::config::{DecayMode, EnvelopeParams};
use serde::{Deserialize, Serialize};

/// Strike-then-decay amplitude in [0, 1].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DecayedEnvelope {
    params: EnvelopeParams,
    amplitude: f32,
}

impl DecayedEnvelope {
    pub fn new(params: EnvelopeParams) -> Self {
        Self {
            params,
            amplitude: 0.0,
        }
    }

    /// Fire the envelope. Amplitude becomes 1, or `velocity / 127` when
    /// velocity scaling is on.
    pub fn strike(&mut self, velocity: u8) {
        self.amplitude = if self.params.velocity_scaled {
            f32::from(velocity) / 127.0
        } else {
            1.0
        };
    }

    /// Decay by `delta` seconds and return the new amplitude.
    pub fn tick(&mut self, delta: f32) -> f32 {
        match self.params.decay_mode {
            DecayMode::Linear => {
                self.amplitude = (self.amplitude - delta / self.params.decay_time).max(0.0);
            }
            DecayMode::Exponential => {
                self.amplitude *= 0.5_f32.powf(delta / self.params.half_life);
                if self.amplitude < self.params.epsilon {
                    self.amplitude = 0.0;
                }
            }
        }
        self.amplitude
    }

    pub fn amplitude(&self) -> f32 {
        self.amplitude
    }
}

/// Held-note amplitude in [0, 1] with independent attack and release rates.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SustainedEnvelope {
    params: EnvelopeParams,
    level: f32,
}

impl SustainedEnvelope {
    pub fn new(params: EnvelopeParams) -> Self {
        Self { params, level: 0.0 }
    }

    /// Integrate toward 1 while `active`, toward 0 otherwise. Returns the
    /// new level, clamped to [0, 1].
    pub fn tick(&mut self, active: bool, delta: f32) -> f32 {
        if active {
            self.level = (self.level + self.params.attack_rate * delta).min(1.0);
        } else {
            self.level = (self.level - self.params.release_rate * delta).max(0.0);
        }
        self.level
    }

    pub fn level(&self) -> f32 {
        self.level
    }
}

/// Drum head displacement: a strike pushes the head down in proportion to
/// velocity, then it returns to rest at a constant speed.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DrumRecoil {
    /// Current displacement, always <= 0 (at rest when 0).
    offset: f32,
    distance: f32,
    comeback: f32,
}

impl DrumRecoil {
    pub fn new(params: &EnvelopeParams) -> Self {
        Self {
            offset: 0.0,
            distance: params.recoil_distance,
            comeback: params.recoil_comeback,
        }
    }

    pub fn strike(&mut self, velocity: u8) {
        self.offset = -self.distance * f32::from(velocity) / 127.0;
    }

    /// Return toward rest and report the current displacement.
    pub fn tick(&mut self, delta: f32) -> f32 {
        self.offset = (self.offset + self.comeback * delta).min(0.0);
        self.offset
    }

    pub fn offset(&self) -> f32 {
        self.offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EnvelopeParams;

    #[test]
    fn linear_decay_reaches_zero_and_clamps() {
        let params = EnvelopeParams {
            decay_mode: DecayMode::Linear,
            decay_time: 0.2,
            ..EnvelopeParams::default()
        };
        let mut env = DecayedEnvelope::new(params);
        env.strike(100);
        assert_eq!(env.amplitude(), 1.0);

        assert!((env.tick(0.1) - 0.5).abs() < 1e-6);
        assert_eq!(env.tick(0.1), 0.0);
        // Never goes negative, even with a huge step.
        assert_eq!(env.tick(10.0), 0.0);
    }

    #[test]
    fn exponential_decay_halves_per_half_life_and_snaps() {
        let params = EnvelopeParams {
            decay_mode: DecayMode::Exponential,
            half_life: 0.1,
            epsilon: 1e-3,
            ..EnvelopeParams::default()
        };
        let mut env = DecayedEnvelope::new(params);
        env.strike(127);

        assert!((env.tick(0.1) - 0.5).abs() < 1e-6);
        assert!((env.tick(0.1) - 0.25).abs() < 1e-6);
        // Long decay snaps to exactly zero, no infinite tail.
        for _ in 0..20 {
            env.tick(0.1);
        }
        assert_eq!(env.amplitude(), 0.0);
    }

    #[test]
    fn velocity_scaling_changes_initial_amplitude() {
        let params = EnvelopeParams {
            velocity_scaled: true,
            ..EnvelopeParams::default()
        };
        let mut env = DecayedEnvelope::new(params);
        env.strike(64);
        assert!((env.amplitude() - 64.0 / 127.0).abs() < 1e-6);
        env.strike(127);
        assert_eq!(env.amplitude(), 1.0);
    }

    #[test]
    fn sustained_rises_while_held_and_falls_after() {
        let params = EnvelopeParams {
            attack_rate: 2.0,
            release_rate: 1.0,
            ..EnvelopeParams::default()
        };
        let mut env = SustainedEnvelope::new(params);

        assert!((env.tick(true, 0.25) - 0.5).abs() < 1e-6);
        assert_eq!(env.tick(true, 1.0), 1.0); // clamped at 1
        assert!((env.tick(false, 0.5) - 0.5).abs() < 1e-6);
        assert_eq!(env.tick(false, 1.0), 0.0); // clamped at 0
    }

    #[test]
    fn recoil_scales_with_velocity_and_returns_at_constant_speed() {
        let params = EnvelopeParams {
            recoil_distance: 2.0,
            recoil_comeback: 10.0,
            ..EnvelopeParams::default()
        };
        let mut recoil = DrumRecoil::new(&params);

        recoil.strike(127);
        assert!((recoil.offset() + 2.0).abs() < 1e-6);

        // Monotone return to rest, never overshooting past zero.
        let mut prev = recoil.offset();
        for _ in 0..30 {
            let v = recoil.tick(0.02);
            assert!(v >= prev);
            assert!(v <= 0.0);
            prev = v;
        }
        assert_eq!(recoil.offset(), 0.0);

        recoil.strike(64);
        assert!(recoil.offset() > -2.0 && recoil.offset() < 0.0);
    }
}
