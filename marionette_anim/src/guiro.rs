// Guiro — a stick scraped across a ridged gourd.
//
// The slide position lives in [0, 1]. Each strike starts a stroke from one
// end; direction alternates per strike, and the stroke rate depends on the
// strike type (a long scrape is slow, a short scrape fast). The stroke stops
// when the position leaves the range, then clamps back in.
//
// The raw position maps to the stick's horizontal travel through a power
// easing that accelerates through the middle of the stroke; long and short
// strokes ease from opposite ends. A "U" bob, `|(2p - 1)^5|`, lifts the
// stick at the stroke ends and dips it in the middle, and the gourd sinks
// by a quarter of the same curve.
//
// Short and long strikes arrive on separate strike lists (they are distinct
// percussion keys), so the guiro owns two event cursors.

use crate::collector::EventCollector;
use crate::config::GuiroParams;
use marionette_midi::{Score, TimedEvent};
use marionette_scene::{NodeId, SceneArena, Vec3};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
enum StrokeSpeed {
    Short,
    Long,
}

/// The scraped-gourd animator.
#[derive(Clone, Debug)]
pub struct Guiro {
    params: GuiroParams,
    short_collector: EventCollector,
    long_collector: EventCollector,
    gourd: NodeId,
    stick: NodeId,
    stick_base: Vec3,
    moving: bool,
    moving_left: bool,
    speed: StrokeSpeed,
    position: f32,
}

impl Guiro {
    pub fn new(
        params: GuiroParams,
        short_strikes: Vec<TimedEvent>,
        long_strikes: Vec<TimedEvent>,
        gourd: NodeId,
        stick: NodeId,
        stick_base: Vec3,
    ) -> Self {
        Self {
            params,
            short_collector: EventCollector::new(short_strikes),
            long_collector: EventCollector::new(long_strikes),
            gourd,
            stick,
            stick_base,
            moving: false,
            moving_left: true,
            speed: StrokeSpeed::Long,
            position: 0.0,
        }
    }

    pub fn tick(&mut self, time: f64, delta: f64, score: &Score, arena: &mut SceneArena) {
        if self
            .short_collector
            .advance_collect_one(score, time)
            .is_some()
        {
            self.begin_stroke(StrokeSpeed::Short);
        }
        if self
            .long_collector
            .advance_collect_one(score, time)
            .is_some()
        {
            self.begin_stroke(StrokeSpeed::Long);
        }

        if self.moving {
            let direction = if self.moving_left { -1.0 } else { 1.0 };
            let rate = match self.speed {
                StrokeSpeed::Long => self.params.long_rate,
                StrokeSpeed::Short => self.params.short_rate,
            };
            self.position += direction * rate * delta as f32;
            if !(0.0..=1.0).contains(&self.position) {
                // Reached the end of the gourd.
                self.moving = false;
            }
            self.position = self.position.clamp(0.0, 1.0);
        }

        let bob = self.vertical_transform();
        arena.set_local_translation(
            self.stick,
            self.stick_base.add(Vec3::new(
                self.eased_position() * self.params.motion_scale,
                bob,
                0.0,
            )),
        );
        arena.set_rotation_euler(self.stick, Vec3::new(bob / 4.0, 0.0, 0.0));
        arena.set_local_translation(self.gourd, Vec3::new(0.0, bob / 4.0, 0.0));
    }

    fn begin_stroke(&mut self, speed: StrokeSpeed) {
        self.moving = true;
        self.speed = speed;
        self.moving_left = !self.moving_left;
        // Each stroke starts from the end it travels away from.
        self.position = if self.moving_left { 1.0 } else { 0.0 };
    }

    /// Power easing of the slide, accelerating through the stroke. Long and
    /// short strokes ease from opposite ends so both read as a push.
    fn eased_position(&self) -> f32 {
        let p = self.position;
        let n = self.params.easing_power;
        let ease_in = p.powi(n);
        let ease_out = 1.0 - (1.0 - p).powi(n);
        match (self.speed, self.moving_left) {
            (StrokeSpeed::Long, true) => ease_out,
            (StrokeSpeed::Long, false) => ease_in,
            (StrokeSpeed::Short, true) => ease_in,
            (StrokeSpeed::Short, false) => ease_out,
        }
    }

    /// The "U" bob: high at the stroke ends, dipping through the middle.
    fn vertical_transform(&self) -> f32 {
        (2.0 * self.position - 1.0).powi(5).abs()
    }

    pub fn position(&self) -> f32 {
        self.position
    }

    pub fn is_moving(&self) -> bool {
        self.moving
    }

    pub fn seek(&mut self, score: &Score, time: f64) {
        self.short_collector.seek(score, time);
        self.long_collector.seek(score, time);
        self.moving = false;
        self.position = 0.0;
    }
}
