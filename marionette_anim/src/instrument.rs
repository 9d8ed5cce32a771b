// Instrument composition — capability structs over a sum-type kind.
//
// There is no instrument inheritance tree. `Instrument` is one struct that
// owns the scene roots (`root -> placement -> geometry`), the whole-body
// visibility window, and the multi-instance glide; everything
// kind-specific lives in the `InstrumentKind` enum and is dispatched by a
// single `match` in `tick`. Shared behaviors (strikers, envelopes, arc
// windows) are plain components the kinds compose.
//
// Visibility: an instrument shows while an arc sounds, within a pre-roll
// of the next arc, or for a lingering window after the last. Those padded
// per-arc intervals are merged once at construction into a sorted disjoint
// list, so the per-tick check is one monotone cursor step.
//
// Two small percussion kinds live here rather than in their own modules:
// the woodblock pair and the drum octave are pure compositions of striker
// plus recoil with nothing algorithmically new.

use crate::config::{AnimConfig, VisibilityParams};
use crate::envelope::{DecayedEnvelope, DrumRecoil};
use crate::guiro::Guiro;
use crate::helicopter::Helicopter;
use crate::instance::InstanceIndex;
use crate::monophonic::MonophonicGroup;
use crate::pitch_class::{DEFAULT_OFFSET, PITCH_CLASSES, PitchClassSet, slot_of};
use crate::reverse_cymbal::ReverseCymbal;
use crate::striker::Striker;
use marionette_midi::{Score, TimedArc, TimedEvent};
use marionette_scene::{NodeId, SceneArena, Vec3};

/// One struck block: a mallet striker recoiling the block it hits, with a
/// decayed flash amplitude the renderer can map to emissive intensity.
#[derive(Clone, Debug)]
pub struct StruckBlock {
    striker: Striker,
    recoil: DrumRecoil,
    flash: DecayedEnvelope,
    block: NodeId,
}

impl StruckBlock {
    pub fn new(
        striker: Striker,
        recoil: DrumRecoil,
        flash: DecayedEnvelope,
        block: NodeId,
    ) -> Self {
        Self {
            striker,
            recoil,
            flash,
            block,
        }
    }

    fn tick(&mut self, time: f64, delta: f64, score: &Score, arena: &mut SceneArena) {
        let status = self.striker.tick(time, delta, score, arena);
        if let Some(strike) = status.strike {
            self.recoil.strike(strike.velocity);
            self.flash.strike(strike.velocity);
        }
        let offset = self.recoil.tick(delta as f32);
        self.flash.tick(delta as f32);
        arena.set_local_translation(self.block, Vec3::new(0.0, offset, 0.0));
    }

    /// Strike flash amplitude, 1 at impact and decaying to 0.
    pub fn flash(&self) -> f32 {
        self.flash.amplitude()
    }

    fn seek(&mut self, score: &Score, time: f64) {
        self.striker.seek(score, time);
    }

    pub fn block(&self) -> NodeId {
        self.block
    }
}

/// High and low woodblock, on the GM keys 76 and 77.
#[derive(Clone, Debug)]
pub struct WoodblockPair {
    high: StruckBlock,
    low: StruckBlock,
}

/// GM percussion key of the high woodblock.
pub const HIGH_WOODBLOCK: u8 = 76;
/// GM percussion key of the low woodblock.
pub const LOW_WOODBLOCK: u8 = 77;

impl WoodblockPair {
    /// Split `strikes` by key onto the two blocks.
    pub fn new(
        config: &AnimConfig,
        score: &Score,
        strikes: &[TimedEvent],
        arena: &mut SceneArena,
        parent: NodeId,
    ) -> Self {
        let mut build = |key: u8| {
            let block = arena.create_node(Some(parent));
            let mallet = arena.create_node(Some(parent));
            let hits = strikes.iter().filter(|e| e.note == key).copied().collect();
            StruckBlock::new(
                Striker::new(&config.striker, score, hits, mallet, mallet),
                DrumRecoil::new(&config.envelope),
                DecayedEnvelope::new(config.envelope.clone()),
                block,
            )
        };
        Self {
            high: build(HIGH_WOODBLOCK),
            low: build(LOW_WOODBLOCK),
        }
    }

    pub fn tick(&mut self, time: f64, delta: f64, score: &Score, arena: &mut SceneArena) {
        self.high.tick(time, delta, score, arena);
        self.low.tick(time, delta, score, arena);
    }

    pub fn seek(&mut self, score: &Score, time: f64) {
        self.high.seek(score, time);
        self.low.seek(score, time);
    }

    pub fn high(&self) -> &StruckBlock {
        &self.high
    }

    pub fn low(&self) -> &StruckBlock {
        &self.low
    }
}

/// Twelve mallets around one drum, one per pitch class; any strike recoils
/// the shared drum head.
#[derive(Clone, Debug)]
pub struct DrumOctave {
    mallets: Vec<Striker>,
    recoil: DrumRecoil,
    drum: NodeId,
}

impl DrumOctave {
    pub fn new(
        config: &AnimConfig,
        score: &Score,
        strikes: &[TimedEvent],
        arena: &mut SceneArena,
        parent: NodeId,
    ) -> Self {
        let drum = arena.create_node(Some(parent));
        let mut partitions: Vec<Vec<TimedEvent>> = vec![Vec::new(); PITCH_CLASSES];
        for strike in strikes {
            partitions[slot_of(strike.note, DEFAULT_OFFSET, PITCH_CLASSES)].push(*strike);
        }
        let mallets = partitions
            .into_iter()
            .map(|hits| {
                let mallet = arena.create_node(Some(parent));
                Striker::new(&config.striker, score, hits, mallet, mallet)
            })
            .collect();
        Self {
            mallets,
            recoil: DrumRecoil::new(&config.envelope),
            drum,
        }
    }

    pub fn tick(&mut self, time: f64, delta: f64, score: &Score, arena: &mut SceneArena) {
        let mut loudest = 0u8;
        for mallet in &mut self.mallets {
            let status = mallet.tick(time, delta, score, arena);
            loudest = loudest.max(status.velocity());
        }
        if loudest > 0 {
            self.recoil.strike(loudest);
        }
        let offset = self.recoil.tick(delta as f32);
        arena.set_local_translation(self.drum, Vec3::new(0.0, offset, 0.0));
    }

    pub fn seek(&mut self, score: &Score, time: f64) {
        for mallet in &mut self.mallets {
            mallet.seek(score, time);
        }
    }

    pub fn drum(&self) -> NodeId {
        self.drum
    }

    /// The strikers, indexed by pitch-class slot.
    pub fn mallets(&self) -> &[Striker] {
        &self.mallets
    }
}

/// The kind-specific animator an `Instrument` dispatches to.
#[derive(Clone, Debug)]
pub enum InstrumentKind {
    ReverseCymbal(ReverseCymbal),
    Guiro(Guiro),
    Helicopter(Helicopter),
    WoodblockPair(WoodblockPair),
    DrumOctave(DrumOctave),
    /// Pitch-class fan-out (choirs, tuned percussion arrays).
    Ensemble(PitchClassSet),
    Monophonic(MonophonicGroup),
}

/// One instrument on stage: scene roots, visibility window, layout glide,
/// and its kind-specific animator.
#[derive(Clone, Debug)]
pub struct Instrument {
    kind: InstrumentKind,
    family: String,
    root: NodeId,
    placement: NodeId,
    geometry: NodeId,
    /// Merged, disjoint show-intervals in seconds, sorted by start.
    show_intervals: Vec<(f64, f64)>,
    interval_cursor: usize,
    visible: bool,
    instance: InstanceIndex,
    base: Vec3,
    offset_per_index: Vec3,
}

impl Instrument {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        kind: InstrumentKind,
        family: impl Into<String>,
        arcs: &[TimedArc],
        visibility: &VisibilityParams,
        instance_rate: f32,
        arena: &mut SceneArena,
        base: Vec3,
        offset_per_index: Vec3,
    ) -> Self {
        let root = arena.create_node(None);
        let placement = arena.create_node(Some(root));
        let geometry = arena.create_node(Some(placement));
        arena.set_visible(root, false);
        Self {
            kind,
            family: family.into(),
            root,
            placement,
            geometry,
            show_intervals: merge_show_intervals(arcs, visibility),
            interval_cursor: 0,
            visible: false,
            instance: InstanceIndex::new(0.0, instance_rate),
            base,
            offset_per_index,
        }
    }

    pub fn tick(&mut self, time: f64, delta: f64, score: &Score, arena: &mut SceneArena) {
        while self.interval_cursor < self.show_intervals.len()
            && self.show_intervals[self.interval_cursor].1 <= time
        {
            self.interval_cursor += 1;
        }
        self.visible = self
            .show_intervals
            .get(self.interval_cursor)
            .is_some_and(|&(start, _)| start <= time);
        arena.set_visible(self.root, self.visible);

        match &mut self.kind {
            InstrumentKind::ReverseCymbal(rc) => {
                rc.tick(time, delta, score, arena);
            }
            InstrumentKind::Guiro(g) => g.tick(time, delta, score, arena),
            InstrumentKind::Helicopter(h) => h.tick(time, delta, arena),
            InstrumentKind::WoodblockPair(w) => w.tick(time, delta, score, arena),
            InstrumentKind::DrumOctave(d) => d.tick(time, delta, score, arena),
            InstrumentKind::Ensemble(e) => e.tick(time, delta),
            InstrumentKind::Monophonic(m) => m.tick(time, delta, arena),
        }
    }

    /// Glide toward the assigned layout rank and place the root.
    pub fn adjust_for_multiple_instances(&mut self, delta: f64, arena: &mut SceneArena) {
        let index = self.instance.update(delta as f32);
        arena.set_local_translation(self.root, self.base.add(self.offset_per_index.scale(index)));
    }

    pub fn set_instance_target(&mut self, target: f32) {
        self.instance.set_target(target);
    }

    pub fn seek(&mut self, score: &Score, time: f64, arena: &mut SceneArena) {
        self.interval_cursor = self
            .show_intervals
            .partition_point(|&(_, end)| end <= time);
        match &mut self.kind {
            InstrumentKind::ReverseCymbal(rc) => rc.seek(score, time),
            InstrumentKind::Guiro(g) => g.seek(score, time),
            InstrumentKind::Helicopter(h) => h.seek(time),
            InstrumentKind::WoodblockPair(w) => w.seek(score, time),
            InstrumentKind::DrumOctave(d) => d.seek(score, time),
            InstrumentKind::Ensemble(e) => e.seek(time),
            InstrumentKind::Monophonic(m) => m.seek(time, arena),
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn family(&self) -> &str {
        &self.family
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn placement(&self) -> NodeId {
        self.placement
    }

    pub fn geometry(&self) -> NodeId {
        self.geometry
    }

    pub fn kind(&self) -> &InstrumentKind {
        &self.kind
    }

    pub fn instance_index(&self) -> f32 {
        self.instance.value()
    }
}

/// Pad each arc by the pre-roll/linger window and merge overlaps into a
/// sorted disjoint interval list.
fn merge_show_intervals(arcs: &[TimedArc], visibility: &VisibilityParams) -> Vec<(f64, f64)> {
    let mut padded: Vec<(f64, f64)> = arcs
        .iter()
        .map(|arc| (arc.start - visibility.preroll, arc.end + visibility.linger))
        .collect();
    padded.sort_by(|a, b| a.0.total_cmp(&b.0));

    let mut merged: Vec<(f64, f64)> = Vec::new();
    for (start, end) in padded {
        match merged.last_mut() {
            Some(last) if start <= last.1 => last.1 = last.1.max(end),
            _ => merged.push((start, end)),
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AnimConfig;
    use crate::envelope::SustainedEnvelope;

    const DELTA: f64 = 1.0 / 60.0;

    fn default_visibility() -> VisibilityParams {
        VisibilityParams::default() // preroll 1.0 s, linger 2.0 s
    }

    fn arcs_of(score: &Score) -> Vec<TimedArc> {
        score.arcs_for_channel(0)
    }

    #[test]
    fn show_intervals_pad_and_merge() {
        let score = Score::new(
            480,
            vec![
                TimedEvent::note_on(0, 0, 60, 100),
                TimedEvent::note_off(480, 0, 60),
                // Second arc at 2.0 s; the 2 s linger from the first (ends
                // 0.5 s) overlaps its 1 s preroll, so both merge.
                TimedEvent::note_on(1920, 0, 62, 100),
                TimedEvent::note_off(2400, 0, 62),
            ],
            vec![],
        );
        let merged = merge_show_intervals(&arcs_of(&score), &default_visibility());
        assert_eq!(merged.len(), 1);
        assert!((merged[0].0 + 1.0).abs() < 1e-9);
        assert!((merged[0].1 - 4.5).abs() < 1e-9);
    }

    #[test]
    fn distant_arcs_keep_separate_intervals() {
        let score = Score::new(
            480,
            vec![
                TimedEvent::note_on(0, 0, 60, 100),
                TimedEvent::note_off(480, 0, 60),
                // 10.0 s: far beyond linger + preroll.
                TimedEvent::note_on(9600, 0, 62, 100),
                TimedEvent::note_off(10_080, 0, 62),
            ],
            vec![],
        );
        let merged = merge_show_intervals(&arcs_of(&score), &default_visibility());
        assert_eq!(merged.len(), 2);
    }

    fn ensemble_instrument(score: &Score, arena: &mut SceneArena) -> Instrument {
        let config = AnimConfig::default();
        let nodes: Vec<NodeId> = (0..12).map(|_| arena.create_node(None)).collect();
        let set = PitchClassSet::new(nodes, &arcs_of(score), 3, &config.envelope);
        Instrument::new(
            InstrumentKind::Ensemble(set),
            "choir",
            &arcs_of(score),
            &config.visibility,
            config.instance.rate,
            arena,
            Vec3::ZERO,
            Vec3::new(0.0, 10.0, 0.0),
        )
    }

    fn sparse_score() -> Score {
        Score::new(
            480,
            vec![
                TimedEvent::note_on(1920, 0, 60, 100), // 2.0 s .. 2.5 s
                TimedEvent::note_off(2400, 0, 60),
            ],
            vec![],
        )
    }

    #[test]
    fn instrument_shows_through_preroll_note_and_linger() {
        let score = sparse_score();
        let mut arena = SceneArena::new();
        let mut instrument = ensemble_instrument(&score, &mut arena);

        instrument.tick(0.5, DELTA, &score, &mut arena);
        assert!(!instrument.is_visible()); // before preroll

        instrument.tick(1.5, DELTA, &score, &mut arena);
        assert!(instrument.is_visible()); // within 1 s preroll

        instrument.tick(2.2, DELTA, &score, &mut arena);
        assert!(instrument.is_visible()); // sounding

        instrument.tick(4.0, DELTA, &score, &mut arena);
        assert!(instrument.is_visible()); // within 2 s linger

        instrument.tick(5.0, DELTA, &score, &mut arena);
        assert!(!instrument.is_visible()); // gone
        assert!(!arena.visible(instrument.root()));
    }

    #[test]
    fn instance_glide_moves_the_root() {
        let score = sparse_score();
        let mut arena = SceneArena::new();
        let mut instrument = ensemble_instrument(&score, &mut arena);

        instrument.set_instance_target(2.0);
        // Rate 2.0/s: after 1 s of frames the index has settled at 2.
        for i in 0..60 {
            instrument.adjust_for_multiple_instances(DELTA, &mut arena);
            let y = arena.local_translation(instrument.root()).y;
            assert!(y <= 20.0 + 1e-4, "overshoot at frame {i}");
        }
        assert!((instrument.instance_index() - 2.0).abs() < 1e-6);
        assert!((arena.local_translation(instrument.root()).y - 20.0).abs() < 1e-3);
    }

    #[test]
    fn seek_rewinds_the_visibility_window() {
        let score = sparse_score();
        let mut arena = SceneArena::new();
        let mut instrument = ensemble_instrument(&score, &mut arena);

        instrument.tick(6.0, DELTA, &score, &mut arena);
        assert!(!instrument.is_visible());

        instrument.seek(&score, 2.0, &mut arena);
        instrument.tick(2.0, DELTA, &score, &mut arena);
        assert!(instrument.is_visible());
    }

    fn percussion_score(notes: &[(u64, u8)]) -> Score {
        let events = notes
            .iter()
            .map(|&(tick, note)| TimedEvent::note_on(tick, 9, note, 100))
            .collect();
        Score::new(480, events, vec![])
    }

    #[test]
    fn woodblocks_split_strikes_by_key() {
        let score = percussion_score(&[(0, HIGH_WOODBLOCK), (480, LOW_WOODBLOCK)]);
        let mut arena = SceneArena::new();
        let parent = arena.create_node(None);
        let config = AnimConfig::default();
        let mut pair = WoodblockPair::new(
            &config,
            &score,
            &score.note_ons_for_channel(9),
            &mut arena,
            parent,
        );

        pair.tick(0.0, DELTA, &score, &mut arena);
        // The high block recoils and flashes on its strike; the low block
        // is untouched.
        assert!(arena.local_translation(pair.high().block()).y < 0.0);
        assert!(pair.high().flash() > 0.9);
        assert_eq!(arena.local_translation(pair.low().block()).y, 0.0);
        assert_eq!(pair.low().flash(), 0.0);

        let mut t = DELTA;
        while t < 0.5 {
            pair.tick(t, DELTA, &score, &mut arena);
            t += DELTA;
        }
        pair.tick(0.5, DELTA, &score, &mut arena);
        assert!(arena.local_translation(pair.low().block()).y < 0.0);
        // The high flash has fully decayed since its hit.
        assert_eq!(pair.high().flash(), 0.0);
    }

    #[test]
    fn drum_octave_recoils_on_any_pitch_class() {
        let score = percussion_score(&[(0, 36), (480, 43)]);
        let mut arena = SceneArena::new();
        let parent = arena.create_node(None);
        let config = AnimConfig::default();
        let mut octave = DrumOctave::new(
            &config,
            &score,
            &score.note_ons_for_channel(9),
            &mut arena,
            parent,
        );

        octave.tick(0.0, DELTA, &score, &mut arena);
        let after_first = arena.local_translation(octave.drum()).y;
        assert!(after_first < 0.0);

        // The head returns toward rest between hits, then dips again.
        octave.tick(0.25, 0.25, &score, &mut arena);
        assert!(arena.local_translation(octave.drum()).y > after_first);
        octave.tick(0.5, DELTA, &score, &mut arena);
        assert!(arena.local_translation(octave.drum()).y < 0.0);
    }

    #[test]
    fn drum_octave_mallets_partition_like_the_pitch_class_bank() {
        // 36 and 48 are octaves of one class; 41 is a different class.
        let score = percussion_score(&[(0, 36), (480, 48), (960, 41)]);
        let mut arena = SceneArena::new();
        let parent = arena.create_node(None);
        let config = AnimConfig::default();
        let octave = DrumOctave::new(
            &config,
            &score,
            &score.note_ons_for_channel(9),
            &mut arena,
            parent,
        );

        assert_eq!(octave.mallets().len(), PITCH_CLASSES);
        let shared = slot_of(36, DEFAULT_OFFSET, PITCH_CLASSES);
        assert_eq!(octave.mallets()[shared].collector().events().len(), 2);
        let other = slot_of(41, DEFAULT_OFFSET, PITCH_CLASSES);
        assert_ne!(other, shared);
        assert_eq!(octave.mallets()[other].collector().events().len(), 1);
    }

    #[test]
    fn envelope_component_is_reusable_across_kinds() {
        // Sanity check that the sustained envelope composes without any
        // instrument wrapper, the way free components are meant to.
        let mut env = SustainedEnvelope::new(AnimConfig::default().envelope);
        env.tick(true, 0.5);
        assert!(env.level() > 0.0);
    }
}
