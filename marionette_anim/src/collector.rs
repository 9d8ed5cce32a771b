// Event cursors — forward-only traversal of a sorted timeline.
//
// Two cursors cover every animator's needs:
// - `EventCollector` walks a list of strike events (note-ons, time-sorted),
//   yielding each event exactly once as playback reaches it, with an
//   idempotent look-ahead `peek` for anticipation math.
// - `ArcCollector` maintains the set of arcs sounding *right now* by
//   advancing a window over start-sorted arcs — amortized O(1) per tick,
//   never a rescan of history.
//
// Both guarantee monotonic behavior only for monotonic input time. A seek
// (time jumping backward) is a collaborator responsibility: call `seek`,
// which rebuilds the cursor consistent with the new time. Feeding a
// decreasing `time` without `seek` is unsupported.
//
// See also: `striker.rs` (owns one `EventCollector`), `pitch_class.rs` and
// the sustained instruments (own `ArcCollector`s).

use marionette_midi::{Score, TimedArc, TimedEvent};
use smallvec::SmallVec;

/// Forward-only cursor over strike events.
#[derive(Clone, Debug)]
pub struct EventCollector {
    events: Vec<TimedEvent>,
    /// Index of the next unconsumed event. Monotonically non-decreasing for
    /// monotonically non-decreasing input time.
    index: usize,
}

impl EventCollector {
    /// Takes ownership of the strike list. Events must be tick-sorted (as
    /// produced by `Score::note_ons_for_channel`).
    pub fn new(events: Vec<TimedEvent>) -> Self {
        debug_assert!(events.windows(2).all(|w| w[0].tick <= w[1].tick));
        Self { events, index: 0 }
    }

    /// Return the next unconsumed event if its timestamp has been reached,
    /// consuming it. At most one event per call; an event is returned at
    /// most once, ever, in order.
    pub fn advance_collect_one(&mut self, score: &Score, time: f64) -> Option<TimedEvent> {
        let event = self.events.get(self.index)?;
        if score.time_of(event) <= time {
            self.index += 1;
            Some(*event)
        } else {
            None
        }
    }

    /// The next unconsumed event, without consuming it. Side-effect-free.
    pub fn peek(&self) -> Option<TimedEvent> {
        self.events.get(self.index).copied()
    }

    /// The most recently consumed event.
    pub fn prev(&self) -> Option<TimedEvent> {
        self.index
            .checked_sub(1)
            .and_then(|i| self.events.get(i))
            .copied()
    }

    /// Reposition the cursor for a seek: events strictly before `time`
    /// count as consumed, everything at or after it will fire normally.
    /// This is a full rescan from index 0 — the only supported way to move
    /// backward.
    pub fn seek(&mut self, score: &Score, time: f64) {
        self.index = self
            .events
            .partition_point(|e| score.time_of(e) < time);
    }

    pub fn events(&self) -> &[TimedEvent] {
        &self.events
    }

    pub fn is_exhausted(&self) -> bool {
        self.index >= self.events.len()
    }
}

/// Window cursor over start-sorted arcs, tracking the currently-sounding set.
#[derive(Clone, Debug)]
pub struct ArcCollector {
    arcs: Vec<TimedArc>,
    /// Index of the next arc that has not started yet.
    next: usize,
    current: SmallVec<[TimedArc; 4]>,
}

impl ArcCollector {
    /// Takes ownership of the arc list. Arcs must be start-sorted (as
    /// produced by `TimedArc::pair`).
    pub fn new(arcs: Vec<TimedArc>) -> Self {
        debug_assert!(arcs.windows(2).all(|w| w[0].start_tick <= w[1].start_tick));
        Self {
            arcs,
            next: 0,
            current: SmallVec::new(),
        }
    }

    /// Advance the window to `time`: newly-started arcs enter the current
    /// set, finished arcs leave it.
    pub fn advance(&mut self, time: f64) {
        while self.next < self.arcs.len() && self.arcs[self.next].start <= time {
            self.current.push(self.arcs[self.next]);
            self.next += 1;
        }
        self.current.retain(|arc| arc.end > time);
    }

    /// The arcs sounding at the last `advance` time.
    pub fn current(&self) -> &[TimedArc] {
        &self.current
    }

    pub fn is_playing(&self) -> bool {
        !self.current.is_empty()
    }

    /// The next arc that has not started yet.
    pub fn peek(&self) -> Option<&TimedArc> {
        self.arcs.get(self.next)
    }

    /// Rebuild the window for a seek: the current set becomes exactly the
    /// arcs sounding at `time`.
    pub fn seek(&mut self, time: f64) {
        self.next = self.arcs.partition_point(|a| a.start <= time);
        self.current = self.arcs[..self.next]
            .iter()
            .filter(|a| a.end > time)
            .copied()
            .collect();
    }

    pub fn arcs(&self) -> &[TimedArc] {
        &self.arcs
    }
}
