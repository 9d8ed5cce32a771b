// Timed arcs — a note's sounding interval.
//
// A `TimedArc` pairs a note-on with its matching note-off and carries both
// tick and precomputed second positions. Pairing is FIFO per (channel, note):
// a note-off closes the earliest still-open note-on of the same key, which is
// how overlapping repeats of one pitch resolve. Unmatched note-ons are closed
// at the final event tick so every arc satisfies `end >= start`.
//
// Arcs are built once per instrument at construction and immutable after.
//
// See also: `score.rs` (`arcs_for_channel`), the animation core's arc
// collector which advances a window over these.

use crate::event::{EventKind, TimedEvent};
use crate::tempo::TempoMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::collections::VecDeque;

/// A note's sounding interval, from its start to its matching end.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TimedArc {
    pub channel: u8,
    pub note: u8,
    /// Velocity of the opening note-on.
    pub velocity: u8,
    pub start_tick: u64,
    pub end_tick: u64,
    /// Start time in seconds.
    pub start: f64,
    /// End time in seconds. Invariant: `end >= start`.
    pub end: f64,
}

impl TimedArc {
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    /// True while `time` falls within the sounding interval `[start, end)`.
    pub fn is_sounding_at(&self, time: f64) -> bool {
        time >= self.start && time < self.end
    }

    /// Pair note-ons with note-offs across an event list.
    ///
    /// Input events may belong to multiple channels; output arcs are sorted
    /// by `(start_tick, channel, note)` — a stable, deterministic order.
    pub fn pair(events: &[TimedEvent], tempo: &TempoMap) -> Vec<TimedArc> {
        // Open note-ons per key, earliest first. BTreeMap keeps iteration
        // deterministic when flushing leftovers.
        let mut open: BTreeMap<(u8, u8), VecDeque<&TimedEvent>> = BTreeMap::new();
        let mut arcs = Vec::new();
        let last_tick = events.last().map_or(0, |e| e.tick);

        for event in events {
            let key = (event.channel, event.note);
            match event.kind {
                EventKind::NoteOn => {
                    open.entry(key).or_default().push_back(event);
                }
                EventKind::NoteOff => {
                    if let Some(on) = open.get_mut(&key).and_then(VecDeque::pop_front) {
                        arcs.push(make_arc(on, event.tick, tempo));
                    }
                    // A note-off with no matching note-on is a decoding
                    // defect upstream; ignored here.
                }
            }
        }

        // Close anything still sounding at the end of the song.
        for (_, queue) in open {
            for on in queue {
                arcs.push(make_arc(on, last_tick.max(on.tick), tempo));
            }
        }

        arcs.sort_by_key(|a| (a.start_tick, a.channel, a.note));
        arcs
    }
}

fn make_arc(on: &TimedEvent, end_tick: u64, tempo: &TempoMap) -> TimedArc {
    TimedArc {
        channel: on.channel,
        note: on.note,
        velocity: on.velocity,
        start_tick: on.tick,
        end_tick,
        start: tempo.time_of_tick(on.tick),
        end: tempo.time_of_tick(end_tick),
    }
}
