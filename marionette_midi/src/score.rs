// The owning sequence type — one decoded performance, read-only.
//
// `Score` holds the full sorted event list and the tempo map, and answers the
// queries the animation core needs: the wall-clock time of an event, the
// tempo in effect before a tick, and per-channel event/arc subsets for
// instrument construction.
//
// The playback session owns the `Score`; instruments borrow it per tick.
// Nothing here mutates after `new`.
//
// See also: `smf.rs` for constructing a `Score` from a Standard MIDI File,
// `arc.rs` for the note pairing used by `arcs_for_channel`.

use crate::arc::TimedArc;
use crate::event::TimedEvent;
use crate::tempo::{TempoChange, TempoMap};
use serde::{Deserialize, Serialize};

/// An immutable, time-ordered collection of musical events with tick→time
/// and tempo mapping.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Score {
    events: Vec<TimedEvent>,
    tempo: TempoMap,
}

impl Score {
    /// Build a score from decoded events and tempo changes. Events are
    /// sorted (stably) by tick; tempo handling is described in `tempo.rs`.
    pub fn new(
        ticks_per_quarter: u16,
        mut events: Vec<TimedEvent>,
        tempo_changes: Vec<TempoChange>,
    ) -> Self {
        events.sort_by_key(|e| e.tick);
        Self {
            events,
            tempo: TempoMap::new(ticks_per_quarter, tempo_changes),
        }
    }

    pub fn events(&self) -> &[TimedEvent] {
        &self.events
    }

    pub fn ticks_per_quarter(&self) -> u16 {
        self.tempo.ticks_per_quarter()
    }

    pub fn tempo(&self) -> &TempoMap {
        &self.tempo
    }

    /// Wall-clock time of an event, in seconds.
    pub fn time_of(&self, event: &TimedEvent) -> f64 {
        self.tempo.time_of_tick(event.tick)
    }

    pub fn time_of_tick(&self, tick: u64) -> f64 {
        self.tempo.time_of_tick(tick)
    }

    /// The tempo (BPM) in effect immediately before `tick`.
    pub fn tempo_before_tick(&self, tick: u64) -> f64 {
        self.tempo.tempo_before_tick(tick)
    }

    /// Total duration in seconds (time of the final event).
    pub fn duration(&self) -> f64 {
        self.events
            .last()
            .map_or(0.0, |e| self.tempo.time_of_tick(e.tick))
    }

    /// All events on one channel, in tick order.
    pub fn events_for_channel(&self, channel: u8) -> Vec<TimedEvent> {
        self.events
            .iter()
            .filter(|e| e.channel == channel)
            .copied()
            .collect()
    }

    /// Note-on events on one channel, in tick order. This is the strike list
    /// a percussive animator consumes.
    pub fn note_ons_for_channel(&self, channel: u8) -> Vec<TimedEvent> {
        self.events
            .iter()
            .filter(|e| e.channel == channel && e.is_note_on())
            .copied()
            .collect()
    }

    /// Paired note arcs for one channel, sorted by start.
    pub fn arcs_for_channel(&self, channel: u8) -> Vec<TimedArc> {
        let events = self.events_for_channel(channel);
        TimedArc::pair(&events, &self.tempo)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_channel_score() -> Score {
        Score::new(
            480,
            vec![
                TimedEvent::note_on(0, 0, 60, 100),
                TimedEvent::note_on(0, 1, 40, 80),
                TimedEvent::note_off(480, 0, 60),
                TimedEvent::note_off(240, 1, 40),
            ],
            vec![],
        )
    }

    #[test]
    fn events_are_sorted_by_tick() {
        let score = two_channel_score();
        let ticks: Vec<u64> = score.events().iter().map(|e| e.tick).collect();
        let mut sorted = ticks.clone();
        sorted.sort_unstable();
        assert_eq!(ticks, sorted);
    }

    #[test]
    fn channel_filters() {
        let score = two_channel_score();
        assert_eq!(score.events_for_channel(0).len(), 2);
        assert_eq!(score.note_ons_for_channel(0).len(), 1);
        assert_eq!(score.arcs_for_channel(1).len(), 1);
        assert_eq!(score.arcs_for_channel(1)[0].end_tick, 240);
    }

    #[test]
    fn time_of_uses_tempo_map() {
        let score = two_channel_score();
        let off = TimedEvent::note_off(480, 0, 60);
        assert!((score.time_of(&off) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn duration_is_final_event_time() {
        let score = two_channel_score();
        assert!((score.duration() - 0.5).abs() < 1e-9);
        let empty = Score::new(480, vec![], vec![]);
        assert_eq!(empty.duration(), 0.0);
    }
}
