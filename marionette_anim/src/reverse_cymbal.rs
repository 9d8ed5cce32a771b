// Reverse cymbal — a swell that peaks when the note *ends*.
//
// A reversed cymbal sample crescendos into its cutoff, so the visual strike
// belongs at the arc's end, not its start. Each arc is converted into a
// pseudo-strike at `end_tick` with full velocity, and a standard striker
// winds up toward those. The cymbal itself wobbles with a damped cosine of
// the time remaining until the pseudo-strike:
//
//     amplitude * cos(t·w·π) / (3 + t³·w·damping·π)
//
// which is `amplitude / 3` at the moment of impact and dies off toward the
// horizon. Outside `[0, horizon)` the cymbal is still.
//
// The stick orbits the cymbal by pitch class, 30 degrees per semitone, so
// repeated swells on different notes approach from different sides.

use crate::config::{ReverseCymbalParams, StrikerParams};
use crate::striker::{Axis, StickStatus, Striker};
use marionette_midi::{Score, TimedArc, TimedEvent};
use marionette_scene::{NodeId, SceneArena, Vec3, rad};
use std::f64::consts::PI;

/// Cymbal tilt for a pseudo-strike `time_until` seconds away, in degrees.
/// Zero outside the wobble horizon.
pub fn rotation_amount(time_until: f64, params: &ReverseCymbalParams) -> f64 {
    if time_until < 0.0 || time_until >= params.horizon {
        return 0.0;
    }
    params.amplitude * (time_until * params.wobble_speed * PI).cos()
        / (3.0 + time_until.powi(3) * params.wobble_speed * params.damping * PI)
}

/// Convert arcs into full-velocity strikes at their end ticks.
pub fn pseudo_strikes(arcs: &[TimedArc]) -> Vec<TimedEvent> {
    let mut strikes: Vec<TimedEvent> = arcs
        .iter()
        .map(|arc| TimedEvent::note_on(arc.end_tick, arc.channel, arc.note, 127))
        .collect();
    strikes.sort_by_key(|e| e.tick);
    strikes
}

/// Cymbal wobble plus an orbiting stick, both cued by note ends.
#[derive(Clone, Debug)]
pub struct ReverseCymbal {
    params: ReverseCymbalParams,
    striker: Striker,
    /// Tilts with the wobble.
    cymbal: NodeId,
    /// Yawed to place the stick by pitch class.
    stick_pivot: NodeId,
}

impl ReverseCymbal {
    pub fn new(
        striker_params: &StrikerParams,
        params: ReverseCymbalParams,
        score: &Score,
        arcs: &[TimedArc],
        cymbal: NodeId,
        stick_pivot: NodeId,
        stick: NodeId,
    ) -> Self {
        let striker = Striker::new(striker_params, score, pseudo_strikes(arcs), stick, stick)
            .with_axis(Axis::X);
        Self {
            params,
            striker,
            cymbal,
            stick_pivot,
        }
    }

    pub fn tick(
        &mut self,
        time: f64,
        delta: f64,
        score: &Score,
        arena: &mut SceneArena,
    ) -> StickStatus {
        let status = self.striker.tick(time, delta, score, arena);

        let tilt = match self.striker.collector().peek() {
            Some(next) => {
                let yaw = f64::from(next.note % 12) * 30.0;
                arena.set_rotation_euler(self.stick_pivot, Axis::Y.euler(rad(yaw as f32)));
                rotation_amount(score.time_of(&next) - time, &self.params)
            }
            None => 0.0,
        };
        arena.set_rotation_euler(self.cymbal, Vec3::new(rad(tilt as f32), 0.0, 0.0));
        status
    }

    pub fn seek(&mut self, score: &Score, time: f64) {
        self.striker.seek(score, time);
    }
}
