// Benchmark for the full-stage tick loop.
//
// Builds a stage with a dense generated score and several instrument kinds,
// then measures the per-frame cost of `Stage::tick` at 60 Hz steps. This is
// the hot path: it runs once per rendered frame for every instrument.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use marionette_anim::config::AnimConfig;
use marionette_anim::instrument::{Instrument, InstrumentKind};
use marionette_anim::monophonic::{MonophonicGroup, PolyphonySpread};
use marionette_anim::pitch_class::PitchClassSet;
use marionette_anim::striker::Axis;
use marionette_anim::Stage;
use marionette_midi::{Score, TimedEvent};
use marionette_scene::{NodeId, Vec3};

const DELTA: f64 = 1.0 / 60.0;

/// A busy four-channel score: eighth notes on every channel for ~60 s.
fn dense_score() -> Score {
    let mut events = Vec::new();
    for channel in 0..4u8 {
        for i in 0..500u64 {
            let on = i * 240;
            let note = 48 + ((i + u64::from(channel) * 5) % 24) as u8;
            events.push(TimedEvent::note_on(on, channel, note, 100));
            events.push(TimedEvent::note_off(on + 200, channel, note));
        }
    }
    Score::new(480, events, vec![])
}

fn build_stage() -> Stage {
    let score = dense_score();
    let config = AnimConfig::default();
    let mut stage = Stage::new(score, config.clone(), 7);

    for channel in 0..2u8 {
        let arcs = stage.score().arcs_for_channel(channel);
        let nodes: Vec<NodeId> = (0..12)
            .map(|_| stage.arena_mut().create_node(None))
            .collect();
        let set = PitchClassSet::new(nodes, &arcs, 3, &config.envelope);
        let instrument = Instrument::new(
            InstrumentKind::Ensemble(set),
            "ensemble",
            &arcs,
            &config.visibility,
            config.instance.rate,
            stage.arena_mut(),
            Vec3::ZERO,
            Vec3::new(20.0, 0.0, 0.0),
        );
        stage.push(instrument);
    }

    for channel in 2..4u8 {
        let arcs = stage.score().arcs_for_channel(channel);
        let parent = stage.arena_mut().create_node(None);
        let group = MonophonicGroup::new(
            &arcs,
            PolyphonySpread::Rotate {
                axis: Axis::Y,
                degrees_per_rank: 25.0,
            },
            &config.envelope,
            Some(0.5),
            parent,
            stage.arena_mut(),
        );
        let instrument = Instrument::new(
            InstrumentKind::Monophonic(group),
            "sax",
            &arcs,
            &config.visibility,
            config.instance.rate,
            stage.arena_mut(),
            Vec3::new(0.0, 40.0, 0.0),
            Vec3::new(0.0, 10.0, 0.0),
        );
        stage.push(instrument);
    }

    stage
}

fn bench_tick_loop(c: &mut Criterion) {
    c.bench_function("stage_tick_60s_at_60hz", |b| {
        b.iter(|| {
            let mut stage = build_stage();
            let mut t = 0.0;
            while t < 60.0 {
                stage.tick(black_box(t), DELTA);
                t += DELTA;
            }
            black_box(stage.time())
        });
    });

    c.bench_function("stage_single_tick", |b| {
        let mut stage = build_stage();
        let mut t = 0.0;
        b.iter(|| {
            stage.tick(black_box(t), DELTA);
            t += DELTA;
            if t >= 60.0 {
                stage.seek(0.0);
                t = 0.0;
            }
        });
    });
}

criterion_group!(benches, bench_tick_loop);
criterion_main!(benches);
