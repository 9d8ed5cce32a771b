// Smoothed multi-instance layout index.
//
// When several instruments of one family are visible at once, each gets a
// layout rank (0, 1, 2, ...) and positions itself at `base + offset * index`.
// Ranks change abruptly as instruments appear and disappear; `InstanceIndex`
// turns the integer rank into a continuous value that glides toward the
// target at a bounded rate, so instruments slide to their new spot instead
// of teleporting.
//
// The step each frame is clamped to `rate * delta` in magnitude, which makes
// the glide frame-rate independent and gives a hard bound on per-frame
// movement. Targets may be negative (a hidden instrument parks off-stage at
// rank -1 so its return animates in from the side).

use serde::{Deserialize, Serialize};

/// Continuous layout index gliding toward an integer rank.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct InstanceIndex {
    index: f32,
    target: f32,
    /// Maximum index change per second.
    rate: f32,
}

impl InstanceIndex {
    /// Start exactly at `target` with no pending glide.
    pub fn new(target: f32, rate: f32) -> Self {
        Self {
            index: target,
            target,
            rate,
        }
    }

    /// Set the rank to glide toward. Negative targets are allowed.
    pub fn set_target(&mut self, target: f32) {
        self.target = target;
    }

    pub fn target(&self) -> f32 {
        self.target
    }

    /// Advance the glide by `delta` seconds and return the new value. The
    /// change is at most `rate * delta` in magnitude, and the value never
    /// overshoots the target.
    pub fn update(&mut self, delta: f32) -> f32 {
        let step = self.rate * delta;
        let gap = self.target - self.index;
        if gap.abs() <= step {
            self.index = self.target;
        } else {
            self.index += step.copysign(gap);
        }
        self.index
    }

    pub fn value(&self) -> f32 {
        self.index
    }
}
