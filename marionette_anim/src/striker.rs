// The strike state machine — idle, anticipate, strike, recoil.
//
// A striker owns a forward-only cursor over its strike list and a rotation
// angle in degrees. Each tick it computes a *proposed* anticipation angle
// from the next upcoming strike:
//
//     proposed = seconds_until_strike * bpm_at_strike * strike_speed
//
// Scaling by tempo keeps the downstroke the same musical length regardless
// of BPM. While the proposed angle exceeds `max_idle_angle` the stick is
// too early to start its windup, so it recoils toward rest instead; once
// the proposed angle dips inside the range, the stick tracks it down to
// zero, hitting exactly at the strike time. Consumption then flips the
// cursor to the following strike and the proposed angle jumps back up,
// which reads as the bounce.
//
// Visibility: the stick shows only while striking or recoiling, plus a
// sticky window that keeps it up between closely spaced strikes (gap within
// `sticky_gap_quarters` quarter notes). Animators that reuse the state
// machine without a literal stick (reverse cymbal, piano keys) construct
// with `actual_stick = false` and manage node visibility themselves.
//
// See also: `collector.rs` for the cursor contract, `config.rs` for tuning.

use crate::collector::EventCollector;
use crate::config::StrikerParams;
use marionette_midi::{Score, TimedEvent};
use marionette_scene::{NodeId, SceneArena, Vec3, rad};
use serde::{Deserialize, Serialize};

/// Which local axis a striker rotates about.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// An Euler rotation of `radians` about this axis alone.
    pub fn euler(self, radians: f32) -> Vec3 {
        match self {
            Axis::X => Vec3::new(radians, 0.0, 0.0),
            Axis::Y => Vec3::new(0.0, radians, 0.0),
            Axis::Z => Vec3::new(0.0, 0.0, radians),
        }
    }
}

/// What a striker did this frame, reported to the owning instrument.
#[derive(Clone, Copy, Debug, Default)]
pub struct StickStatus {
    /// The strike consumed this frame, if any. Fire envelopes off this.
    pub strike: Option<TimedEvent>,
    /// The stick's rotation this frame, in degrees from vertical.
    pub rotation_angle: f64,
    /// The strike currently being wound up for, if the stick is inside its
    /// anticipation window. `None` while idle or recoiling.
    pub striking_for: Option<TimedEvent>,
}

impl StickStatus {
    /// Velocity of the consumed strike, or 0 when none fired.
    pub fn velocity(&self) -> u8 {
        self.strike.map_or(0, |e| e.velocity)
    }
}

/// A stick (or mallet, or hand) that winds up and strikes on cue.
#[derive(Clone, Debug)]
pub struct Striker {
    collector: EventCollector,
    strike_speed: f64,
    max_idle_angle: f64,
    recoil_rate: f64,
    /// Gap threshold for sticky visibility, in ticks.
    sticky_gap_ticks: f64,
    sticky: bool,
    /// False for animators that reuse the math without a visible stick;
    /// they handle node visibility themselves.
    actual_stick: bool,
    axis: Axis,
    /// Node hidden/shown with stick visibility.
    mount: NodeId,
    /// Node receiving the strike rotation. Often the same as `mount`.
    rotation_node: NodeId,
    angle: f64,
}

impl Striker {
    pub fn new(
        params: &StrikerParams,
        score: &Score,
        strikes: Vec<TimedEvent>,
        mount: NodeId,
        rotation_node: NodeId,
    ) -> Self {
        Self {
            collector: EventCollector::new(strikes),
            strike_speed: params.strike_speed,
            max_idle_angle: params.max_idle_angle,
            recoil_rate: params.recoil_rate,
            sticky_gap_ticks: f64::from(score.ticks_per_quarter()) * params.sticky_gap_quarters,
            sticky: true,
            actual_stick: true,
            axis: Axis::X,
            mount,
            rotation_node,
            angle: params.max_idle_angle,
        }
    }

    pub fn with_axis(mut self, axis: Axis) -> Self {
        self.axis = axis;
        self
    }

    pub fn with_sticky(mut self, sticky: bool) -> Self {
        self.sticky = sticky;
        self
    }

    pub fn with_actual_stick(mut self, actual_stick: bool) -> Self {
        self.actual_stick = actual_stick;
        self
    }

    /// Advance the state machine and write pose to the arena.
    pub fn tick(
        &mut self,
        time: f64,
        delta: f64,
        score: &Score,
        arena: &mut SceneArena,
    ) -> StickStatus {
        let strike = self.collector.advance_collect_one(score, time);

        let peek = self.collector.peek();
        let proposed = peek.map_or(self.max_idle_angle + 1.0, |next| {
            (score.time_of(&next) - time) * score.tempo_before_tick(next.tick) * self.strike_speed
        });

        let striking_for = if proposed > self.max_idle_angle {
            // Too early to wind up; recoil toward rest.
            self.angle = (self.angle + self.recoil_rate * delta).min(self.max_idle_angle);
            None
        } else {
            self.angle = proposed.clamp(0.0, self.max_idle_angle);
            peek
        };

        let mut visible = self.angle < self.max_idle_angle;
        if self.sticky
            && let (Some(prev), Some(next)) = (self.collector.prev(), peek)
            && (next.tick - prev.tick) as f64 <= self.sticky_gap_ticks
        {
            visible = true;
        }

        if self.actual_stick {
            arena.set_visible(self.mount, visible);
        }
        arena.set_rotation_euler(self.rotation_node, self.axis.euler(rad(self.angle as f32)));

        StickStatus {
            strike,
            rotation_angle: self.angle,
            striking_for,
        }
    }

    /// Reposition for a playback seek. The stick snaps to rest; the next
    /// tick recomputes its pose from the new cursor position.
    pub fn seek(&mut self, score: &Score, time: f64) {
        self.collector.seek(score, time);
        self.angle = self.max_idle_angle;
    }

    pub fn angle(&self) -> f64 {
        self.angle
    }

    pub fn collector(&self) -> &EventCollector {
        &self.collector
    }
}
