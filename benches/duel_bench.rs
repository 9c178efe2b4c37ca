use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use buckshot_duel::core::{DuelConfig, GameRng};
use buckshot_duel::duel::Duel;
use buckshot_duel::observation::Observation;
use buckshot_duel::policy::{Policy, RandomPolicy};

/// Play one full random self-play match; returns the number of actions.
fn play_match(seed: u64, max_lives: u32) -> u32 {
    let config = DuelConfig::default()
        .with_max_lives(max_lives)
        .with_auto_start(true);
    let mut duel = Duel::new(config, seed).expect("valid config");
    let mut rng = GameRng::new(seed ^ 0xA5A5);
    let mut policy = RandomPolicy;
    let mut steps = 0;

    while let Some(side) = duel.current_turn() {
        let action = policy.choose(&duel, side, &mut rng);
        duel.execute(side, action).expect("in-turn action");
        steps += 1;
    }
    steps
}

fn self_play(c: &mut Criterion) {
    let mut group = c.benchmark_group("self_play");
    for max_lives in [2u32, 4, 8] {
        group.bench_function(BenchmarkId::new("random_match", max_lives), |b| {
            let mut seed = 0u64;
            b.iter(|| {
                seed += 1;
                black_box(play_match(seed, max_lives))
            })
        });
    }
    group.finish();
}

fn observation(c: &mut Criterion) {
    let duel = Duel::new(DuelConfig::default().with_auto_start(true), 42).expect("valid config");

    c.bench_function("observation_csv", |b| {
        b.iter(|| black_box(Observation::from_duel(&duel).to_csv()))
    });
    c.bench_function("observation_tensor", |b| {
        b.iter(|| black_box(Observation::from_duel(&duel).to_tensor()))
    });
}

criterion_group!(benches, self_play, observation);
criterion_main!(benches);
