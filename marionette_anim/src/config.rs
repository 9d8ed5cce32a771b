// Data-driven animation configuration.
//
// All tunable animation parameters live here in `AnimConfig`, grouped into
// nested per-concern structs. The animators never use magic numbers — they
// read from the config. This enables feel iteration without recompilation,
// and keeps "looks right" constants (like the sticky visibility tolerance)
// out of the algorithm code.
//
// Defaults reproduce the tuning the motion curves were designed against.
// Where a default is a pure tuning choice rather than a structural invariant
// (sticky gap, recoil rate), the field comment says so.
//
// See also: `striker.rs`, `envelope.rs`, `instance.rs` and the specialized
// animator modules, each of which documents how it consumes its group.

use serde::{Deserialize, Serialize};

/// Top-level animation configuration (immutable after startup).
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AnimConfig {
    pub striker: StrikerParams,
    pub instance: InstanceParams,
    pub envelope: EnvelopeParams,
    pub visibility: VisibilityParams,
    pub reverse_cymbal: ReverseCymbalParams,
    pub guiro: GuiroParams,
    pub helicopter: HelicopterParams,
    pub puffer: PufferParams,
}

/// Strike motion: anticipation, recoil, and stick visibility.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StrikerParams {
    /// Multiplier on the anticipation angle; higher values start the
    /// downstroke later and move it faster.
    pub strike_speed: f64,
    /// Rest/recoil angle in degrees. The stick never rotates past this.
    pub max_idle_angle: f64,
    /// Recoil return rate in degrees per second. Tuning choice.
    pub recoil_rate: f64,
    /// Sticky sticks stay visible between strikes when the gap between the
    /// previous and next strike is within this many quarter notes. A tuning
    /// constant, not a structural invariant.
    pub sticky_gap_quarters: f64,
}

impl Default for StrikerParams {
    fn default() -> Self {
        Self {
            strike_speed: 3.0,
            max_idle_angle: 50.0,
            recoil_rate: 5.0,
            sticky_gap_quarters: 2.1,
        }
    }
}

/// Multi-instance layout smoothing.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct InstanceParams {
    /// Maximum rate of change of the movement index, in index units per
    /// second. Bounds every per-frame step to `rate * delta`.
    pub rate: f32,
}

impl Default for InstanceParams {
    fn default() -> Self {
        Self { rate: 2.0 }
    }
}

/// How a decayed envelope falls back to zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DecayMode {
    /// Straight line to zero over `decay_time`.
    Linear,
    /// Halves every `half_life`; snapped to zero below `epsilon`.
    Exponential,
}

/// Decay/sustain envelope tuning.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EnvelopeParams {
    pub decay_mode: DecayMode,
    /// Seconds from full amplitude to zero (linear mode).
    pub decay_time: f32,
    /// Halving period in seconds (exponential mode).
    pub half_life: f32,
    /// Amplitudes below this snap to exactly zero — no infinite tails.
    pub epsilon: f32,
    /// Scale strike amplitude by velocity / 127 instead of always 1.
    pub velocity_scaled: bool,
    /// Sustained envelope rise rate toward 1, per second.
    pub attack_rate: f32,
    /// Sustained envelope fall rate toward 0, per second.
    pub release_rate: f32,
    /// Drum recoil: displacement at full velocity, in scene units.
    pub recoil_distance: f32,
    /// Drum recoil: return speed toward rest, in scene units per second.
    pub recoil_comeback: f32,
}

impl Default for EnvelopeParams {
    fn default() -> Self {
        Self {
            decay_mode: DecayMode::Linear,
            decay_time: 0.25,
            half_life: 0.08,
            epsilon: 1e-3,
            velocity_scaled: false,
            attack_rate: 1.0,
            release_rate: 1.0,
            recoil_distance: 2.0,
            recoil_comeback: 22.0,
        }
    }
}

/// When a whole instrument shows and hides around its notes.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VisibilityParams {
    /// Seconds before the next arc at which the instrument appears.
    pub preroll: f64,
    /// Seconds after the last arc during which the instrument lingers.
    pub linger: f64,
}

impl Default for VisibilityParams {
    fn default() -> Self {
        Self {
            preroll: 1.0,
            linger: 2.0,
        }
    }
}

/// Reverse cymbal wobble: `amplitude * cos(t·w·π) / (3 + t³·w·damping·π)`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ReverseCymbalParams {
    pub amplitude: f64,
    /// Wobble frequency `w`.
    pub wobble_speed: f64,
    pub damping: f64,
    /// Seconds before the pseudo-strike at which the wobble begins; zero
    /// outside `[0, horizon)`.
    pub horizon: f64,
}

impl Default for ReverseCymbalParams {
    fn default() -> Self {
        Self {
            amplitude: 2.5,
            wobble_speed: 4.5,
            damping: 1.5,
            horizon: 4.5,
        }
    }
}

/// Guiro slide rates and easing.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GuiroParams {
    /// Slide rate for long strokes, full slides per second.
    pub long_rate: f32,
    /// Slide rate for short strokes, full slides per second.
    pub short_rate: f32,
    /// Power-curve exponent for the horizontal easing.
    pub easing_power: i32,
    /// Total horizontal travel of the stick, in scene units.
    pub motion_scale: f32,
}

impl Default for GuiroParams {
    fn default() -> Self {
        Self {
            long_rate: 3.6,
            short_rate: 9.0,
            easing_power: 2,
            motion_scale: 5.0,
        }
    }
}

/// Helicopter wobble, lift, and rotor spin.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HelicopterParams {
    /// Rotor spin rate in degrees per second.
    pub rotor_rate: f64,
    /// Coherent-noise frequency for the wobble channels (lattice points per
    /// second).
    pub noise_frequency: f32,
    /// Subtracted from the raw [0,1) noise before scaling, biasing the
    /// wobble slightly downward.
    pub wobble_bias: f32,
    /// Wobble magnitude in degrees at full force.
    pub wobble_scale: f32,
    /// Vertical travel between grounded and hovering, in scene units.
    pub lift_range: f32,
}

impl Default for HelicopterParams {
    fn default() -> Self {
        Self {
            rotor_rate: 3141.0,
            noise_frequency: 1.0,
            wobble_bias: 0.4,
            wobble_scale: 10.0,
            lift_range: 120.0,
        }
    }
}

/// Steam puff particle behavior.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PufferParams {
    /// Puffs spawned per second while the source is active.
    pub spawn_rate: f32,
    /// Seconds each puff lives.
    pub lifetime: f32,
    /// Initial puff speed in scene units per second.
    pub speed: f32,
    /// Uniform scale gained per second of age.
    pub growth: f32,
}

impl Default for PufferParams {
    fn default() -> Self {
        Self {
            spawn_rate: 15.0,
            lifetime: 0.9,
            speed: 6.0,
            growth: 1.5,
        }
    }
}
