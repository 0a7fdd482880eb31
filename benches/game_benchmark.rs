//! Benchmarks for the tick resolver and full matches.
//!
//! Matches run on the bundled arena map, the hot path for tournaments.

#![allow(missing_docs)]

use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use pursuit::game::{ActionMap, Game, MapTemplate};
use pursuit::tournament::run_match;

/// Load the arena map from the maps directory.
fn load_arena() -> MapTemplate {
    let path = format!("{}/maps/arena.json", env!("CARGO_MANIFEST_DIR"));
    MapTemplate::load(std::path::Path::new(&path))
        .unwrap_or_else(|e| panic!("Failed to load {path}: {e}"))
}

fn bench_full_match(c: &mut Criterion) {
    let template = load_arena();

    c.bench_function("match_greedy_vs_random", |b| {
        b.iter(|| {
            let outcome = run_match(black_box(&template), ["greedy", "random"], black_box(42));
            black_box(outcome)
        });
    });
}

fn bench_match_batch(c: &mut Criterion) {
    // 10 matches sequentially, without parallel overhead
    let template = load_arena();

    c.bench_function("10_matches_sequential", |b| {
        b.iter(|| {
            for seed in 0..10u64 {
                let outcome = run_match(black_box(&template), ["greedy", "greedy"], black_box(seed));
                let _ = black_box(outcome);
            }
        });
    });
}

fn bench_tick(c: &mut Criterion) {
    // Engine cost alone: every agent stays, so the match never ends early
    let template = load_arena();
    let mut game = Game::new(template);
    game.reset("a", "d", 7);
    let stay = |owner: &str, game: &Game| -> ActionMap {
        game.agent_ids_by_owner(owner)
            .into_iter()
            .map(|id| (id, "STAY".to_string()))
            .collect()
    };
    let attacker = stay("a", &game);
    let defender = stay("d", &game);

    c.bench_function("tick_stay", |b| {
        b.iter(|| {
            game.step(black_box(&attacker), black_box(&defender));
        });
    });
}

fn bench_views(c: &mut Criterion) {
    let template = load_arena();
    let mut game = Game::new(template);
    game.reset("a", "d", 7);

    c.bench_function("agent_views_defender", |b| {
        b.iter(|| black_box(game.agent_views(black_box("d"))));
    });
}

criterion_group!(benches, bench_full_match, bench_match_batch, bench_tick, bench_views);
criterion_main!(benches);
