// marionette_midi — the timed event sequence the animation core consumes.
//
// A `Score` is an immutable, time-ordered view of one decoded MIDI
// performance: note events keyed by tick, a tempo map that converts ticks to
// wall-clock seconds, and derived note arcs (a note-on paired with its
// matching note-off). It is built once at song load and shared read-only by
// every animator for the rest of playback.
//
// Module overview:
// - `event.rs`: `TimedEvent` / `EventKind` — the atomic note on/off records.
// - `tempo.rs`: `TempoChange` + `TempoMap` — tick→seconds conversion with a
//   precomputed prefix table, and tempo-in-effect lookups.
// - `arc.rs`:   `TimedArc` — FIFO pairing of note-ons with note-offs.
// - `score.rs`: `Score` — the owning sequence type and its query surface.
// - `smf.rs`:   Standard MIDI File import via `midly`.
//
// **Critical constraint: immutability.** Nothing in this crate mutates after
// construction. Animators hold `&Score` (or clones of event subsets) and the
// playback session owns the `Score` itself, outliving every animator.

pub mod arc;
pub mod event;
pub mod score;
pub mod smf;
pub mod tempo;

pub use arc::TimedArc;
pub use event::{EventKind, TimedEvent};
pub use score::Score;
pub use smf::ScoreLoadError;
pub use tempo::{TempoChange, TempoMap};
