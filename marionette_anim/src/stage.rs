// The stage — host-facing driver for one performance.
//
// Owns the scene arena, the shared score, and every instrument. The host
// advances a playback clock and calls `tick(time, delta)` once per frame:
// instruments tick first (order-independent, each touching only its own
// nodes), then layout ranks are assigned per family and the instance glides
// applied. A rank is an instrument's position among the currently-visible
// members of its family; hidden instruments target -1 and park off-stage,
// so reappearing slides in from the side rather than popping.
//
// `seek` is the one backward operation: every cursor rebuilds against the
// new time and the next `tick` proceeds normally.
//
// **Critical constraint: determinism.** Given the same score, config, seed,
// and time samples, two stages produce identical arenas. Instruments are
// handed forked rng streams at build time; nothing reads clocks or entropy.

use crate::config::AnimConfig;
use crate::instrument::Instrument;
use marionette_midi::Score;
use marionette_noise::NoiseRng;
use marionette_scene::SceneArena;
use rustc_hash::FxHashMap;

/// One performance: arena, score, instruments, and the frame driver.
#[derive(Clone, Debug)]
pub struct Stage {
    arena: SceneArena,
    score: Score,
    config: AnimConfig,
    instruments: Vec<Instrument>,
    rng: NoiseRng,
    time: f64,
}

impl Stage {
    pub fn new(score: Score, config: AnimConfig, seed: u64) -> Self {
        Self {
            arena: SceneArena::new(),
            score,
            config,
            instruments: Vec::new(),
            rng: NoiseRng::new(seed),
            time: 0.0,
        }
    }

    /// Fork a deterministic rng stream for an instrument being built.
    pub fn fork_rng(&mut self, salt: u64) -> NoiseRng {
        self.rng.fork(salt)
    }

    pub fn push(&mut self, instrument: Instrument) {
        self.instruments.push(instrument);
    }

    /// Advance one frame. `time` is the playback clock in seconds; `delta`
    /// the seconds since the previous frame.
    pub fn tick(&mut self, time: f64, delta: f64) {
        for instrument in &mut self.instruments {
            instrument.tick(time, delta, &self.score, &mut self.arena);
        }

        // Rank visible instruments within each family, in push order.
        let mut ranks: FxHashMap<&str, f32> = FxHashMap::default();
        let targets: Vec<f32> = self
            .instruments
            .iter()
            .map(|instrument| {
                if instrument.is_visible() {
                    let rank = ranks.entry(instrument.family()).or_insert(0.0);
                    let target = *rank;
                    *rank += 1.0;
                    target
                } else {
                    -1.0
                }
            })
            .collect();

        for (instrument, target) in self.instruments.iter_mut().zip(targets) {
            instrument.set_instance_target(target);
            instrument.adjust_for_multiple_instances(delta, &mut self.arena);
        }
        self.time = time;
    }

    /// Jump the playback clock, forward or backward. Every instrument's
    /// cursors rebuild (transient particles despawn); poses settle on the
    /// next `tick`.
    pub fn seek(&mut self, time: f64) {
        for instrument in &mut self.instruments {
            instrument.seek(&self.score, time, &mut self.arena);
        }
        self.time = time;
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn score(&self) -> &Score {
        &self.score
    }

    pub fn config(&self) -> &AnimConfig {
        &self.config
    }

    pub fn arena(&self) -> &SceneArena {
        &self.arena
    }

    pub fn arena_mut(&mut self) -> &mut SceneArena {
        &mut self.arena
    }

    pub fn instruments(&self) -> &[Instrument] {
        &self.instruments
    }
}
