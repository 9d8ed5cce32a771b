// Monophonic instruments — polyphony through visual clones.
//
// A saxophone model can only finger one note at a time, so chords are shown
// by cloning the instrument: arcs are dealt greedily onto voices, each arc
// going to the first voice whose previous arc has already ended. Voice 0
// therefore carries the melody line and higher-ranked voices appear only
// during overlaps.
//
// Each voice owns its subtree and fans out from the instrument body by a
// per-rank spread (a yaw for saxophones, a lateral shift for flutes), so
// simultaneous voices are visually separated. A voice is shown only while
// it is sounding, except voice 0, which stays with the instrument. Voices
// can additionally carry a bell stretcher and a steam puffer that exhales
// while the voice sounds.

use crate::bell::BellStretcher;
use crate::collector::ArcCollector;
use crate::config::{EnvelopeParams, PufferParams};
use crate::envelope::SustainedEnvelope;
use crate::puffer::{PuffBehavior, SteamPuffer};
use crate::striker::Axis;
use marionette_midi::TimedArc;
use marionette_noise::NoiseRng;
use marionette_scene::{NodeId, SceneArena, Vec3, rad};
use serde::{Deserialize, Serialize};

/// Deal arcs onto the minimum set of non-overlapping voices, greedily:
/// each arc goes to the lowest-ranked voice that is free at its start.
pub fn assign_voices(arcs: &[TimedArc]) -> Vec<Vec<TimedArc>> {
    let mut voices: Vec<Vec<TimedArc>> = Vec::new();
    for arc in arcs {
        match voices
            .iter_mut()
            .find(|v| v.last().is_none_or(|last| last.end <= arc.start))
        {
            Some(voice) => voice.push(*arc),
            None => voices.push(vec![*arc]),
        }
    }
    voices
}

/// How a voice's root is displaced by its polyphony rank.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum PolyphonySpread {
    /// Yaw about the given axis, degrees per rank (saxophones: 25° about Y).
    Rotate { axis: Axis, degrees_per_rank: f32 },
    /// Translate by this vector per rank (flutes: a lateral shift).
    Translate(Vec3),
}

/// One clone of a monophonic instrument.
#[derive(Clone, Debug)]
pub struct Voice {
    root: NodeId,
    rank: usize,
    collector: ArcCollector,
    envelope: SustainedEnvelope,
    bell: Option<BellStretcher>,
    puffer: Option<SteamPuffer>,
}

impl Voice {
    fn tick(&mut self, time: f64, delta: f64, spread: PolyphonySpread, arena: &mut SceneArena) {
        self.collector.advance(time);
        let playing = self.collector.is_playing();
        self.envelope.tick(playing, delta as f32);

        arena.set_visible(self.root, playing || self.rank == 0);
        match spread {
            PolyphonySpread::Rotate {
                axis,
                degrees_per_rank,
            } => {
                let yaw = rad(degrees_per_rank * self.rank as f32);
                arena.set_rotation_euler(self.root, axis.euler(yaw));
            }
            PolyphonySpread::Translate(step) => {
                arena.set_local_translation(self.root, step.scale(self.rank as f32));
            }
        }

        if let Some(bell) = &mut self.bell {
            bell.tick(self.collector.current().first(), time, arena);
        }
        if let Some(puffer) = &mut self.puffer {
            puffer.tick(delta, playing, arena);
        }
    }

    pub fn is_playing(&self) -> bool {
        self.collector.is_playing()
    }

    pub fn current_arc(&self) -> Option<&TimedArc> {
        self.collector.current().first()
    }

    pub fn level(&self) -> f32 {
        self.envelope.level()
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn puffer(&self) -> Option<&SteamPuffer> {
        self.puffer.as_ref()
    }
}

/// The set of clones for one monophonic instrument.
#[derive(Clone, Debug)]
pub struct MonophonicGroup {
    voices: Vec<Voice>,
    spread: PolyphonySpread,
}

impl MonophonicGroup {
    /// Build voices under `parent`, one subtree per polyphony rank.
    /// `bell_stretchiness`, when set, gives each voice a bell child scaled
    /// through its held note.
    pub fn new(
        arcs: &[TimedArc],
        spread: PolyphonySpread,
        envelope: &EnvelopeParams,
        bell_stretchiness: Option<f32>,
        parent: NodeId,
        arena: &mut SceneArena,
    ) -> Self {
        let voices = assign_voices(arcs)
            .into_iter()
            .enumerate()
            .map(|(rank, arcs)| {
                let root = arena.create_node(Some(parent));
                let bell = bell_stretchiness.map(|s| {
                    let bell_node = arena.create_node(Some(root));
                    BellStretcher::new(bell_node, s, Axis::Y)
                });
                Voice {
                    root,
                    rank,
                    collector: ArcCollector::new(arcs),
                    envelope: SustainedEnvelope::new(envelope.clone()),
                    bell,
                    puffer: None,
                }
            })
            .collect();
        Self { voices, spread }
    }

    /// Attach a steam puffer to every voice, anchored to a fresh child node
    /// of the voice root. Each puffer forks its own rng stream so clones
    /// scatter independently.
    pub fn with_puffers(
        mut self,
        params: &PufferParams,
        behavior: PuffBehavior,
        rng: &mut NoiseRng,
        arena: &mut SceneArena,
    ) -> Self {
        for voice in &mut self.voices {
            let mouth = arena.create_node(Some(voice.root));
            voice.puffer = Some(SteamPuffer::new(
                params.clone(),
                behavior,
                mouth,
                rng.fork(voice.rank as u64),
            ));
        }
        self
    }

    pub fn tick(&mut self, time: f64, delta: f64, arena: &mut SceneArena) {
        for voice in &mut self.voices {
            voice.tick(time, delta, self.spread, arena);
        }
    }

    pub fn voices(&self) -> &[Voice] {
        &self.voices
    }

    pub fn is_playing(&self) -> bool {
        self.voices.iter().any(Voice::is_playing)
    }

    pub fn seek(&mut self, time: f64, arena: &mut SceneArena) {
        for voice in &mut self.voices {
            voice.collector.seek(time);
            if let Some(puffer) = &mut voice.puffer {
                puffer.clear(arena);
            }
        }
    }
}
