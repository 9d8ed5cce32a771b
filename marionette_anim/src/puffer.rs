// Steam puffer — transient particle puffs marking breath or exhaust.
//
// While the source is active, puffs spawn at a fixed rate through a
// fractional accumulator (spawning is frame-rate independent). Each puff is
// a scene node under the puffer's root: it drifts along its launch velocity,
// grows as it ages, and despawns through `remove_subtree` when its lifetime
// runs out. Scatter comes from the puffer's own forked rng stream, so two
// puffers never share a sequence and replays are identical.

use crate::config::PufferParams;
use marionette_noise::NoiseRng;
use marionette_scene::{NodeId, SceneArena, Vec3};
use serde::{Deserialize, Serialize};

/// Launch direction family for a puffer's particles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PuffBehavior {
    /// Sideways spray (horn water keys, whistle mouths).
    Outwards,
    /// Rising plume (steam whistles, train stacks).
    Upwards,
}

#[derive(Clone, Debug)]
struct Puff {
    node: NodeId,
    velocity: Vec3,
    age: f32,
}

/// A particle pool anchored to one scene node.
#[derive(Clone, Debug)]
pub struct SteamPuffer {
    params: PufferParams,
    behavior: PuffBehavior,
    root: NodeId,
    rng: NoiseRng,
    puffs: Vec<Puff>,
    /// Fractional puffs owed; spawns when it crosses 1.
    accumulator: f32,
}

impl SteamPuffer {
    pub fn new(params: PufferParams, behavior: PuffBehavior, root: NodeId, rng: NoiseRng) -> Self {
        Self {
            params,
            behavior,
            root,
            rng,
            puffs: Vec::new(),
            accumulator: 0.0,
        }
    }

    /// Advance all puffs; spawn new ones while `active`.
    pub fn tick(&mut self, delta: f64, active: bool, arena: &mut SceneArena) {
        let delta = delta as f32;

        if active {
            self.accumulator += self.params.spawn_rate * delta;
            while self.accumulator >= 1.0 {
                self.accumulator -= 1.0;
                self.spawn(arena);
            }
        } else {
            self.accumulator = 0.0;
        }

        let lifetime = self.params.lifetime;
        let growth = self.params.growth;
        self.puffs.retain_mut(|puff| {
            puff.age += delta;
            if puff.age >= lifetime {
                arena.remove_subtree(puff.node);
                return false;
            }
            let pos = arena.local_translation(puff.node).add(puff.velocity.scale(delta));
            arena.set_local_translation(puff.node, pos);
            arena.set_scale_uniform(puff.node, 1.0 + growth * puff.age);
            true
        });
    }

    fn spawn(&mut self, arena: &mut SceneArena) {
        let node = arena.create_node(Some(self.root));
        let spread = self.rng.range_f32(-1.0, 1.0);
        let drift = self.rng.range_f32(0.5, 1.0);
        let velocity = match self.behavior {
            PuffBehavior::Outwards => Vec3::new(drift, spread * 0.3, spread),
            PuffBehavior::Upwards => Vec3::new(spread * 0.3, drift, spread * 0.3),
        }
        .scale(self.params.speed);
        self.puffs.push(Puff {
            node,
            velocity,
            age: 0.0,
        });
    }

    pub fn live_count(&self) -> usize {
        self.puffs.len()
    }

    /// Drop every live puff, e.g. across a seek.
    pub fn clear(&mut self, arena: &mut SceneArena) {
        for puff in self.puffs.drain(..) {
            arena.remove_subtree(puff.node);
        }
        self.accumulator = 0.0;
    }
}
