// marionette_noise — deterministic, portable noise sources.
//
// Provides the two flavors of randomness the animation core needs:
// - `NoiseRng`: a sequential SplitMix64 stream for one-off scatter values
//   (per-instance wobble seeds, particle spread).
// - `NoiseField`: 1-D coherent value noise over a hashed integer lattice,
//   sampled along the playback clock for smooth wobble motion (helicopter
//   hover, steam drift). Output is continuous in time and in [0, 1).
//
// Both are hand-rolled with zero external dependencies, chosen for
// portability and to guarantee identical output across all platforms.
// This crate is the single source of randomness for the whole project;
// nothing else may touch OS entropy or the system clock.
//
// **Critical constraint: determinism.** Every function here must produce
// identical output given the same inputs, regardless of platform, compiler
// version, or optimization level. The lattice hash uses only integer
// arithmetic; floats appear solely in the final interpolation.

use serde::{Deserialize, Serialize};

/// SplitMix64 step (Steele, Lea & Flood, 2014). Used both as the `NoiseRng`
/// generator and as the lattice hash for `NoiseField`.
fn splitmix64(state: &mut u64) -> u64 {
    *state = state.wrapping_add(0x9e37_79b9_7f4a_7c15);
    let mut z = *state;
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}

/// Hash an (seed, lattice index) pair to a uniform f32 in [0, 1).
///
/// Stateless — the same pair always hashes to the same value, which is what
/// makes `NoiseField` resumable from any sample time.
fn lattice_value(seed: u64, index: i64) -> f32 {
    let mut s = seed ^ (index as u64).wrapping_mul(0xd134_2543_de82_ef95);
    let h = splitmix64(&mut s);
    // Upper 24 bits fill the f32 mantissa — full single precision.
    (h >> 40) as f32 / (1u64 << 24) as f32
}

/// Sequential SplitMix64 stream — the project's scatter generator.
///
/// Each consumer owns its own `NoiseRng`, seeded deterministically (usually
/// from a stage seed plus a fixed salt), ensuring reproducible streams that
/// do not interleave across consumers.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NoiseRng {
    state: u64,
}

impl NoiseRng {
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    /// Derive an independent child generator. Used to hand each instrument
    /// its own stream from one stage seed without coupling their sequences.
    pub fn fork(&mut self, salt: u64) -> Self {
        Self {
            state: self.next_u64() ^ salt.wrapping_mul(0x9e37_79b9_7f4a_7c15),
        }
    }

    /// Generate the next `u64` in the sequence.
    pub fn next_u64(&mut self) -> u64 {
        splitmix64(&mut self.state)
    }

    /// Generate a uniform `f32` in [0, 1).
    pub fn next_f32(&mut self) -> f32 {
        (self.next_u64() >> 40) as f32 / (1u64 << 24) as f32
    }

    /// Generate a uniform value in `[low, high)`.
    ///
    /// Panics if `low >= high`.
    pub fn range_f32(&mut self, low: f32, high: f32) -> f32 {
        assert!(low < high, "range_f32: low must be less than high");
        low + self.next_f32() * (high - low)
    }
}

/// 1-D coherent value noise sampled along a time axis.
///
/// Random values are fixed at integer lattice points and interpolated with
/// a smoothstep curve in between, giving a continuous, band-limited signal
/// in [0, 1) — the same character as the gradient-coherent noise the wobble
/// animations were tuned against. `frequency` controls how many lattice
/// points pass per second of input time.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NoiseField {
    seed: u64,
    frequency: f32,
}

impl NoiseField {
    pub fn new(seed: u64, frequency: f32) -> Self {
        Self { seed, frequency }
    }

    /// Sample the field at time `t` (seconds). Continuous in `t`; exact
    /// lattice values at integer phase.
    pub fn sample(&self, t: f64) -> f32 {
        let phase = t * self.frequency as f64;
        let cell = phase.floor();
        let frac = (phase - cell) as f32;

        let a = lattice_value(self.seed, cell as i64);
        let b = lattice_value(self.seed, cell as i64 + 1);

        // Smoothstep keeps the first derivative continuous at lattice points.
        let u = frac * frac * (3.0 - 2.0 * frac);
        a + (b - a) * u
    }

    /// Sample recentered to [-0.5, 0.5) — convenient for symmetric wobble.
    pub fn sample_centered(&self, t: f64) -> f32 {
        self.sample(t) - 0.5
    }
}
