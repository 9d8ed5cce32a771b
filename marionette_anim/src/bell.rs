// Bell stretch — the flared end of a horn swelling through a held note.
//
// While an arc sounds, the bell scales along its length axis from
// `1 + stretchiness` at note start down to 1 at note end:
//
//     scale = stretchiness * (end - time) / duration + 1
//
// Zero-duration arcs would divide by zero; they render at rest. With no
// sounding arc the bell sits at scale 1.

use crate::striker::Axis;
use marionette_midi::TimedArc;
use marionette_scene::{NodeId, SceneArena, Vec3};

/// Scales a bell node along one axis while a note sounds.
#[derive(Clone, Debug)]
pub struct BellStretcher {
    bell: NodeId,
    /// Extra scale at note start; 0.5 means the bell starts half again as
    /// long and relaxes over the note.
    stretchiness: f32,
    axis: Axis,
    scale: f32,
}

impl BellStretcher {
    pub fn new(bell: NodeId, stretchiness: f32, axis: Axis) -> Self {
        Self {
            bell,
            stretchiness,
            axis,
            scale: 1.0,
        }
    }

    /// Update from the currently sounding arc (if any) and write the scale
    /// to the arena.
    pub fn tick(&mut self, arc: Option<&TimedArc>, time: f64, arena: &mut SceneArena) {
        self.scale = match arc {
            Some(arc) if arc.duration() > 0.0 => {
                let remaining = ((arc.end - time) / arc.duration()).clamp(0.0, 1.0) as f32;
                self.stretchiness * remaining + 1.0
            }
            _ => 1.0,
        };
        let s = match self.axis {
            Axis::X => Vec3::new(self.scale, 1.0, 1.0),
            Axis::Y => Vec3::new(1.0, self.scale, 1.0),
            Axis::Z => Vec3::new(1.0, 1.0, self.scale),
        };
        arena.set_scale(self.bell, s);
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }
}
