// Pitch-class fan-out — one track split into twelve (or fewer) animators.
//
// Percussion arrays (drum octaves, woodblock pairs, helicopter light banks)
// map notes to fixture slots by pitch class: `(note + offset) % modulus`.
// The offset aligns the instrument's lowest fixture with its lowest sounding
// note; the default `offset = 3, modulus = 12` puts C on slot 3, matching
// the physical layouts the fixtures were modeled after.
//
// Each slot owns its own arc window and sustained envelope and ticks
// independently; slot order never affects the result.

use crate::collector::ArcCollector;
use crate::config::EnvelopeParams;
use crate::envelope::SustainedEnvelope;
use marionette_midi::TimedArc;
use marionette_scene::NodeId;

/// Default pitch-class slot count.
pub const PITCH_CLASSES: usize = 12;

/// Default alignment offset. Slot index is `(note + 3) % 12`.
pub const DEFAULT_OFFSET: u8 = 3;

/// The fixture slot a note maps to.
pub fn slot_of(note: u8, offset: u8, modulus: usize) -> usize {
    (usize::from(note) + usize::from(offset)) % modulus
}

/// One fixture slot: an arc window plus a sustained level for its node.
#[derive(Clone, Debug)]
pub struct PitchClassAnimator {
    node: NodeId,
    collector: ArcCollector,
    envelope: SustainedEnvelope,
}

impl PitchClassAnimator {
    pub fn new(node: NodeId, arcs: Vec<TimedArc>, params: EnvelopeParams) -> Self {
        Self {
            node,
            collector: ArcCollector::new(arcs),
            envelope: SustainedEnvelope::new(params),
        }
    }

    /// Advance the window and envelope; returns the slot's current level.
    pub fn tick(&mut self, time: f64, delta: f64) -> f32 {
        self.collector.advance(time);
        self.envelope.tick(self.collector.is_playing(), delta as f32)
    }

    pub fn playing(&self) -> bool {
        self.collector.is_playing()
    }

    pub fn level(&self) -> f32 {
        self.envelope.level()
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn seek(&mut self, time: f64) {
        self.collector.seek(time);
    }
}

/// A bank of fixture slots fed by pitch-class partitioning.
#[derive(Clone, Debug)]
pub struct PitchClassSet {
    slots: Vec<PitchClassAnimator>,
    offset: u8,
}

impl PitchClassSet {
    /// Partition `arcs` across `nodes` by pitch class. `nodes.len()` is the
    /// modulus; notes sharing a slot share its animator.
    pub fn new(nodes: Vec<NodeId>, arcs: &[TimedArc], offset: u8, params: &EnvelopeParams) -> Self {
        let modulus = nodes.len();
        let mut partitions: Vec<Vec<TimedArc>> = vec![Vec::new(); modulus];
        for arc in arcs {
            partitions[slot_of(arc.note, offset, modulus)].push(*arc);
        }
        let slots = nodes
            .into_iter()
            .zip(partitions)
            .map(|(node, part)| PitchClassAnimator::new(node, part, params.clone()))
            .collect();
        Self { slots, offset }
    }

    /// Tick every slot. Slots are independent, so iteration order does not
    /// affect the outcome.
    pub fn tick(&mut self, time: f64, delta: f64) {
        for slot in &mut self.slots {
            slot.tick(time, delta);
        }
    }

    pub fn slots(&self) -> &[PitchClassAnimator] {
        &self.slots
    }

    pub fn slot_for_note(&self, note: u8) -> &PitchClassAnimator {
        &self.slots[slot_of(note, self.offset, self.slots.len())]
    }

    pub fn seek(&mut self, time: f64) {
        for slot in &mut self.slots {
            slot.seek(time);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use marionette_midi::{Score, TimedEvent};
    use marionette_scene::SceneArena;

    #[test]
    fn slot_mapping_wraps_with_offset() {
        assert_eq!(slot_of(60, 3, 12), 3); // C maps to slot 3
        assert_eq!(slot_of(69, 3, 12), 0); // A wraps to slot 0
        assert_eq!(slot_of(72, 3, 12), 3); // octaves share a slot
        assert_eq!(slot_of(60, 0, 2), 0); // woodblock pair, low block
        assert_eq!(slot_of(61, 0, 2), 1);
    }

    fn set_for(score: &Score, arena: &mut SceneArena, count: usize) -> PitchClassSet {
        let nodes: Vec<NodeId> = (0..count).map(|_| arena.create_node(None)).collect();
        PitchClassSet::new(
            nodes,
            &score.arcs_for_channel(0),
            DEFAULT_OFFSET,
            &EnvelopeParams::default(),
        )
    }

    #[test]
    fn arcs_land_in_their_slots() {
        let score = Score::new(
            480,
            vec![
                TimedEvent::note_on(0, 0, 60, 100),
                TimedEvent::note_on(0, 0, 64, 100),
                TimedEvent::note_off(480, 0, 60),
                TimedEvent::note_off(480, 0, 64),
            ],
            vec![],
        );
        let mut arena = SceneArena::new();
        let mut set = set_for(&score, &mut arena, 12);

        set.tick(0.25, 1.0 / 60.0);
        assert!(set.slot_for_note(60).playing());
        assert!(set.slot_for_note(64).playing());
        assert!(!set.slot_for_note(62).playing());

        set.tick(0.6, 1.0 / 60.0);
        assert!(!set.slot_for_note(60).playing());
    }

    #[test]
    fn octaves_share_one_animator() {
        let score = Score::new(
            480,
            vec![
                TimedEvent::note_on(0, 0, 48, 100),
                TimedEvent::note_off(480, 0, 48),
            ],
            vec![],
        );
        let mut arena = SceneArena::new();
        let mut set = set_for(&score, &mut arena, 12);

        set.tick(0.25, 1.0 / 60.0);
        // Note 48 and note 60 are the same pitch class.
        assert!(set.slot_for_note(60).playing());
        assert!(std::ptr::eq(set.slot_for_note(48), set.slot_for_note(60)));
    }

    #[test]
    fn level_rises_while_playing_and_decays_after() {
        let score = Score::new(
            480,
            vec![
                TimedEvent::note_on(0, 0, 60, 100),
                TimedEvent::note_off(960, 0, 60),
            ],
            vec![],
        );
        let mut arena = SceneArena::new();
        let mut set = set_for(&score, &mut arena, 12);

        let delta = 1.0 / 60.0;
        let mut t = 0.0;
        let mut peak = 0.0f32;
        while t <= 1.0 {
            set.tick(t, delta);
            peak = peak.max(set.slot_for_note(60).level());
            t += delta;
        }
        assert!(peak > 0.9);

        // After the note ends the level falls.
        set.tick(1.5, 0.5);
        assert!(set.slot_for_note(60).level() < peak);
    }
}
