// Atomic musical events.
//
// A `TimedEvent` is one decoded note on/off record: absolute tick, channel,
// note number, and velocity. Events are created once at song load, sorted by
// non-decreasing tick, and never mutated afterward.
//
// See also: `score.rs` for the owning sequence, `arc.rs` for the on/off
// pairing built from these.

use serde::{Deserialize, Serialize};

/// Whether an event starts or ends a note.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventKind {
    NoteOn,
    NoteOff,
}

/// One note on/off record at an absolute tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimedEvent {
    /// Absolute position in MIDI ticks from the start of the song.
    pub tick: u64,
    /// MIDI channel (0–15).
    pub channel: u8,
    /// Note number (0–127).
    pub note: u8,
    /// Strike velocity (0–127). Note-offs carry 0.
    pub velocity: u8,
    pub kind: EventKind,
}

impl TimedEvent {
    pub fn note_on(tick: u64, channel: u8, note: u8, velocity: u8) -> Self {
        Self {
            tick,
            channel,
            note,
            velocity,
            kind: EventKind::NoteOn,
        }
    }

    pub fn note_off(tick: u64, channel: u8, note: u8) -> Self {
        Self {
            tick,
            channel,
            note,
            velocity: 0,
            kind: EventKind::NoteOff,
        }
    }

    pub fn is_note_on(&self) -> bool {
        self.kind == EventKind::NoteOn
    }
}
