// marionette_anim — the per-instrument animation core.
//
// Converts a stream of timed musical events (from `marionette_midi`) into
// continuous, frame-rate-independent pose updates written into a
// `marionette_scene::SceneArena`. The host advances a playback clock once per
// frame; every instrument's `tick(time, delta)` reads the shared score,
// advances its private cursors, and mutates only the scene nodes it owns.
//
// Module overview:
// - `config.rs`:         `AnimConfig` — every tunable parameter, serde-loaded.
// - `collector.rs`:      `EventCollector` (forward-only strike cursor with
//   look-ahead peek) and `ArcCollector` (active-note window cursor).
// - `striker.rs`:        The strike state machine: idle → anticipate →
//   strike → recoil, with tempo-scaled anticipation.
// - `instance.rs`:       `InstanceIndex` — smoothed multi-instance layout.
// - `envelope.rs`:       Decayed/sustained amplitude envelopes + drum recoil.
// - `pitch_class.rs`:    Fan-out of one track into per-pitch-class animators.
// - `bell.rs`:           Bell stretch driven by the current arc.
// - `reverse_cymbal.rs`: Pseudo-strike (note-end) damped-cosine wobble.
// - `guiro.rs`:          Alternating eased slide with a "U" bob.
// - `helicopter.rs`:     Noise-driven wobble with a force integrator and the
//   twelve-light pitch-class array.
// - `puffer.rs`:         Steam puff particle pool for breath visualization.
// - `monophonic.rs`:     Greedy polyphony fan-out across voice clones.
// - `instrument.rs`:     `Instrument` — capability composition over a
//   sum-type kind, dispatched by `match`.
// - `stage.rs`:          `Stage` — owns arena, score, and instruments; the
//   host-facing frame loop and seek.
//
// **Critical constraint: determinism.** Every pose is a pure function of
// `(score, config, seed, time samples)`. Randomness comes only from
// `marionette_noise` generators seeded from the stage seed. No component may
// read the system clock or OS entropy, and tick order across instruments
// must not affect results.

pub mod bell;
pub mod collector;
pub mod config;
pub mod envelope;
pub mod guiro;
pub mod helicopter;
pub mod instance;
pub mod instrument;
pub mod monophonic;
pub mod pitch_class;
pub mod puffer;
pub mod reverse_cymbal;
pub mod stage;
pub mod striker;

pub use config::AnimConfig;
pub use instrument::{Instrument, InstrumentKind};
pub use stage::Stage;
pub use striker::{Axis, StickStatus, Striker};
