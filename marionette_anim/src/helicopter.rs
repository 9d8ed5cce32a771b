// Helicopter — noise-driven hover with a twelve-light rotor.
//
// Three coupled behaviors:
// - A "force" scalar integrates up at 1/s while any note sounds and down
//   otherwise, clamped to [0, 1]. It gates both lift and wobble, so the
//   helicopter spools up and settles instead of snapping.
// - Lift raises the body from grounded to hovering through an
//   ease-in-out-sine of the force; wobble tilts it on all three axes by
//   independent coherent-noise channels scaled by the force.
// - The rotor spins at a constant rate, and its twelve light layers map
//   the sounding pitch classes: note `n` lights layer `11 - (n + 3) % 12`.
//
// Noise channels are forked from the stage seed, so two helicopters in one
// song wobble differently but any replay is identical.

use crate::collector::ArcCollector;
use crate::config::HelicopterParams;
use crate::pitch_class::{DEFAULT_OFFSET, PITCH_CLASSES, slot_of};
use marionette_midi::TimedArc;
use marionette_noise::{NoiseField, NoiseRng};
use marionette_scene::{NodeId, SceneArena, Vec3, rad};

/// easeInOutSine from easings.net.
fn ease_in_out_sine(x: f32) -> f32 {
    -((std::f32::consts::PI * x).cos() - 1.0) / 2.0
}

/// The helicopter animator.
#[derive(Clone, Debug)]
pub struct Helicopter {
    params: HelicopterParams,
    collector: ArcCollector,
    /// Receives wobble rotation and noise bounce.
    body: NodeId,
    /// Receives the lift translation.
    placement: NodeId,
    rotor: NodeId,
    /// Light layers, indexed by rotor layer (0..12).
    lights: [NodeId; 12],
    noise_x: NoiseField,
    noise_y: NoiseField,
    noise_z: NoiseField,
    force: f64,
    rotor_angle: f64,
}

impl Helicopter {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        params: HelicopterParams,
        arcs: Vec<TimedArc>,
        rng: &mut NoiseRng,
        body: NodeId,
        placement: NodeId,
        rotor: NodeId,
        lights: [NodeId; 12],
    ) -> Self {
        let noise_x = NoiseField::new(rng.next_u64(), params.noise_frequency);
        let noise_y = NoiseField::new(rng.next_u64(), params.noise_frequency);
        let noise_z = NoiseField::new(rng.next_u64(), params.noise_frequency);
        Self {
            params,
            collector: ArcCollector::new(arcs),
            body,
            placement,
            rotor,
            lights,
            noise_x,
            noise_y,
            noise_z,
            force: 0.0,
            rotor_angle: 0.0,
        }
    }

    /// The light layer a note maps to.
    pub fn light_index(note: u8) -> usize {
        PITCH_CLASSES - 1 - slot_of(note, DEFAULT_OFFSET, PITCH_CLASSES)
    }

    pub fn tick(&mut self, time: f64, delta: f64, arena: &mut SceneArena) {
        self.collector.advance(time);

        for light in self.lights {
            arena.set_visible(light, false);
        }
        for arc in self.collector.current() {
            arena.set_visible(self.lights[Self::light_index(arc.note)], true);
        }

        if self.collector.is_playing() {
            self.force = (self.force + delta).min(1.0);
        } else {
            self.force = (self.force - delta).max(0.0);
        }

        self.rotor_angle = (self.rotor_angle + self.params.rotor_rate * delta) % 360.0;
        arena.set_rotation_euler(self.rotor, Vec3::new(0.0, rad(self.rotor_angle as f32), 0.0));

        let force = self.force as f32;
        let wobble = |noise: &NoiseField| {
            force * 0.5 * rad((noise.sample(time) - self.params.wobble_bias) * self.params.wobble_scale)
        };
        arena.set_rotation_euler(
            self.body,
            Vec3::new(
                wobble(&self.noise_x),
                wobble(&self.noise_y),
                wobble(&self.noise_z),
            ),
        );
        // Vertical bounce rides the same Z-channel noise as the roll.
        arena.set_local_translation(
            self.body,
            Vec3::new(
                0.0,
                force * (self.noise_z.sample(time) - self.params.wobble_bias) * 10.0,
                0.0,
            ),
        );
        arena.set_local_translation(
            self.placement,
            Vec3::new(
                0.0,
                -self.params.lift_range + self.params.lift_range * ease_in_out_sine(force),
                0.0,
            ),
        );
    }

    pub fn force(&self) -> f64 {
        self.force
    }

    pub fn is_playing(&self) -> bool {
        self.collector.is_playing()
    }

    pub fn seek(&mut self, time: f64) {
        self.collector.seek(time);
        self.force = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use marionette_midi::{Score, TimedEvent};

    const DELTA: f64 = 1.0 / 60.0;

    fn setup(events: Vec<TimedEvent>) -> (Helicopter, Score, SceneArena) {
        let score = Score::new(480, events, vec![]);
        let mut arena = SceneArena::new();
        let placement = arena.create_node(None);
        let body = arena.create_node(Some(placement));
        let rotor = arena.create_node(Some(body));
        let lights = std::array::from_fn(|_| arena.create_node(Some(rotor)));
        let mut rng = NoiseRng::new(7);
        let heli = Helicopter::new(
            HelicopterParams::default(),
            score.arcs_for_channel(0),
            &mut rng,
            body,
            placement,
            rotor,
            lights,
        );
        (heli, score, arena)
    }

    fn held_note(note: u8, end_tick: u64) -> Vec<TimedEvent> {
        vec![
            TimedEvent::note_on(0, 0, note, 100),
            TimedEvent::note_off(end_tick, 0, note),
        ]
    }

    #[test]
    fn light_index_maps_pitch_classes() {
        assert_eq!(Helicopter::light_index(57), 11); // (57+3)%12 == 0
        assert_eq!(Helicopter::light_index(60), 8);
        assert_eq!(Helicopter::light_index(68), 0);
        // Octaves share a light.
        assert_eq!(
            Helicopter::light_index(60),
            Helicopter::light_index(72)
        );
    }

    #[test]
    fn force_ramps_up_while_playing_and_down_after() {
        // Note held for 2 s (at 120 BPM, 1920 ticks).
        let (mut heli, _score, mut arena) = setup(held_note(60, 1920));

        let mut t = 0.0;
        while t < 0.5 {
            heli.tick(t, DELTA, &mut arena);
            t += DELTA;
        }
        let half = heli.force();
        assert!(half > 0.4 && half < 0.6);

        while t < 1.5 {
            heli.tick(t, DELTA, &mut arena);
            t += DELTA;
        }
        assert_eq!(heli.force(), 1.0); // clamped

        // After the note ends the force drains back to zero.
        let mut t = 2.0;
        while t < 3.2 {
            heli.tick(t, DELTA, &mut arena);
            t += DELTA;
        }
        assert_eq!(heli.force(), 0.0);
    }

    #[test]
    fn sounding_pitch_class_lights_its_layer() {
        let (mut heli, _score, mut arena) = setup(held_note(60, 960));
        let lights = heli.lights;

        heli.tick(0.5, DELTA, &mut arena);
        for (i, light) in lights.iter().enumerate() {
            assert_eq!(arena.visible(*light), i == Helicopter::light_index(60));
        }

        heli.tick(1.5, DELTA, &mut arena);
        for light in lights {
            assert!(!arena.visible(light));
        }
    }

    #[test]
    fn grounded_when_idle_hovering_at_full_force() {
        let (mut heli, _score, mut arena) = setup(held_note(60, 3840));
        let placement = heli.placement;

        heli.tick(0.0, DELTA, &mut arena);
        assert!((arena.local_translation(placement).y + 120.0).abs() < 1.0);

        let mut t = DELTA;
        while t < 2.0 {
            heli.tick(t, DELTA, &mut arena);
            t += DELTA;
        }
        // Force saturated: lift is -120 + 120 * 1 = 0.
        assert!(arena.local_translation(placement).y.abs() < 1e-4);
    }

    #[test]
    fn wobble_is_zero_at_rest() {
        let (mut heli, _score, mut arena) = setup(vec![]);
        let body = heli.body;
        heli.tick(0.0, DELTA, &mut arena);
        let rot = arena.rotation_euler(body);
        assert_eq!(rot, Vec3::ZERO);
    }

    #[test]
    fn replay_is_deterministic() {
        let (mut a, _s1, mut arena_a) = setup(held_note(60, 1920));
        let (mut b, _s2, mut arena_b) = setup(held_note(60, 1920));
        let body_a = a.body;
        let body_b = b.body;

        let mut t = 0.0;
        while t < 1.0 {
            a.tick(t, DELTA, &mut arena_a);
            b.tick(t, DELTA, &mut arena_b);
            t += DELTA;
        }
        assert_eq!(arena_a.rotation_euler(body_a), arena_b.rotation_euler(body_b));
    }
}
