use beat_model::{BeatMap, NoteEvent};
use beat_play::{AutoPlayer, ImplementId, LaneLayout, ManualClock, PlayConfig, PlaySession};
use beat_rule::{Judgment, ScoreAggregator, ScoreRule};
use criterion::{Criterion, black_box, criterion_group, criterion_main};

fn dense_map(count: usize) -> BeatMap {
    let notes = (0..count)
        .map(|i| NoteEvent::hit(2.0 + i as f64 * 0.125, (i % 4) as i32))
        .collect();
    BeatMap::new("bench", 120.0, 3).with_notes(notes)
}

fn session_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("session");
    group.sample_size(20);

    group.bench_function("autoplay_1000_notes", |b| {
        let map = dense_map(1000);
        let duration = map.last_note_time().unwrap_or(0.0) + 3.0;
        b.iter(|| {
            let mut session = PlaySession::new(
                &map,
                &LaneLayout::default(),
                PlayConfig::default(),
                ManualClock::new(duration),
            )
            .unwrap();
            let mut player = AutoPlayer::new(ImplementId(0));
            player.attach(&mut session);
            black_box(player.run_to_end(&mut session, 1.0 / 120.0));
        });
    });

    group.finish();
}

fn aggregator_benchmark(c: &mut Criterion) {
    c.bench_function("aggregator_record", |b| {
        let judgments = [Judgment::Perfect, Judgment::Perfect, Judgment::Good, Judgment::Miss];
        let mut agg = ScoreAggregator::new(ScoreRule::default(), 1.0);
        agg.start();
        let mut i = 0;
        b.iter(|| {
            black_box(agg.record(black_box(judgments[i % judgments.len()])));
            i += 1;
        });
    });
}

criterion_group!(benches, session_benchmark, aggregator_benchmark);
criterion_main!(benches);
