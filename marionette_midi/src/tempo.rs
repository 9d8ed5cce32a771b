// Tempo mapping — converting ticks to wall-clock seconds.
//
// MIDI positions are expressed in ticks; animation runs on seconds. The
// conversion depends on every tempo change before the tick in question, so
// `TempoMap` precomputes a prefix table of elapsed seconds at each tempo
// change. Lookups are then a binary search plus one linear segment, O(log n)
// per call and allocation-free.
//
// The anticipation math in the striker also needs the tempo *in effect* at a
// future strike (faster tempo means faster downstroke for the same musical
// distance) — that is `tempo_before_tick`.
//
// See also: `score.rs` which owns a `TempoMap`, `smf.rs` which extracts
// tempo meta events from a Standard MIDI File.

use serde::{Deserialize, Serialize};

/// The MIDI default tempo, used when a file declares none.
const DEFAULT_BPM: f64 = 120.0;

/// A tempo in effect from `tick` onward.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TempoChange {
    pub tick: u64,
    pub beats_per_minute: f64,
}

/// Piecewise-constant tempo over the song, with a prefix-seconds table for
/// fast tick→time conversion.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TempoMap {
    ticks_per_quarter: u16,
    changes: Vec<TempoChange>,
    /// `seconds_at[i]` is the wall-clock time of `changes[i].tick`.
    seconds_at: Vec<f64>,
}

impl TempoMap {
    /// Build a map from a list of tempo changes (any order, duplicates by
    /// tick resolved last-wins). A change at tick 0 is synthesized at the
    /// MIDI default of 120 BPM if none is present.
    pub fn new(ticks_per_quarter: u16, mut changes: Vec<TempoChange>) -> Self {
        changes.sort_by_key(|c| c.tick);
        changes.dedup_by(|next, kept| {
            if next.tick == kept.tick {
                *kept = *next;
                true
            } else {
                false
            }
        });
        if changes.first().is_none_or(|c| c.tick != 0) {
            changes.insert(
                0,
                TempoChange {
                    tick: 0,
                    beats_per_minute: DEFAULT_BPM,
                },
            );
        }

        let mut seconds_at = Vec::with_capacity(changes.len());
        let mut elapsed = 0.0;
        seconds_at.push(0.0);
        for i in 1..changes.len() {
            let prev = &changes[i - 1];
            elapsed += seconds_per_tick(ticks_per_quarter, prev.beats_per_minute)
                * (changes[i].tick - prev.tick) as f64;
            seconds_at.push(elapsed);
        }

        Self {
            ticks_per_quarter,
            changes,
            seconds_at,
        }
    }

    pub fn ticks_per_quarter(&self) -> u16 {
        self.ticks_per_quarter
    }

    /// Wall-clock time of an absolute tick, in seconds.
    pub fn time_of_tick(&self, tick: u64) -> f64 {
        let i = match self.changes.binary_search_by_key(&tick, |c| c.tick) {
            Ok(i) => i,
            Err(i) => i - 1, // index 0 always has tick 0
        };
        self.seconds_at[i]
            + seconds_per_tick(self.ticks_per_quarter, self.changes[i].beats_per_minute)
                * (tick - self.changes[i].tick) as f64
    }

    /// The tempo in effect immediately before `tick`, in BPM. A change
    /// exactly at `tick` does not count; the opening tempo applies at 0.
    pub fn tempo_before_tick(&self, tick: u64) -> f64 {
        let i = self
            .changes
            .partition_point(|c| c.tick < tick)
            .saturating_sub(1);
        self.changes[i].beats_per_minute
    }
}

fn seconds_per_tick(ticks_per_quarter: u16, bpm: f64) -> f64 {
    60.0 / (bpm * ticks_per_quarter as f64)
}
