use bracket_engine::bracket::{
    Bracket, Competitor, Entrant, MatchId, MatchReport, assign_seeds, build_bracket,
    report_result, seeding_order,
};
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};

/// Helper to seed N entrants named p1..pN
fn seeded_field(n_competitors: usize) -> Vec<Competitor> {
    let entrants = (1..=n_competitors)
        .map(|i| Entrant::new(format!("p{}", i), format!("Player {}", i)))
        .collect();
    assign_seeds(entrants).unwrap()
}

/// Report every playable match with slot 1 winning until a champion exists
fn play_out(mut bracket: Bracket) -> Bracket {
    loop {
        let next = bracket.playable_matches().first().map(|m| {
            let (winner, loser) = m.occupants().unwrap();
            MatchReport::new(m.id, winner.clone(), loser.clone())
        });
        match next {
            Some(report) => bracket.apply_result(&report).unwrap(),
            None => return bracket,
        }
    }
}

/// Benchmark seeding order generation
fn bench_seeding_order(c: &mut Criterion) {
    c.bench_function("seeding_order_1024", |b| {
        b.iter(|| seeding_order(1000));
    });
}

/// Benchmark bracket construction with different field sizes
fn bench_build_bracket(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_bracket");

    for n_competitors in [8, 64, 200, 512].iter() {
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}_competitors", n_competitors)),
            n_competitors,
            |b, &n| {
                let field = seeded_field(n);
                b.iter(|| build_bracket(1, &field).unwrap());
            },
        );
    }

    group.finish();
}

/// Benchmark a single first-round report (includes the staging clone)
fn bench_report_result(c: &mut Criterion) {
    let mut group = c.benchmark_group("report_result");

    for n_competitors in [8, 512].iter() {
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}_competitors", n_competitors)),
            n_competitors,
            |b, &n| {
                let bracket = build_bracket(1, &seeded_field(n)).unwrap();
                let report = MatchReport::new(MatchId::winners(1, 1), "p1", format!("p{}", n));
                b.iter(|| report_result(&bracket, &report).unwrap());
            },
        );
    }

    group.finish();
}

/// Benchmark a whole tournament played to a champion
fn bench_full_playthrough(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_playthrough");
    group.sample_size(20);

    for n_competitors in [8, 64].iter() {
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}_competitors", n_competitors)),
            n_competitors,
            |b, &n| {
                b.iter_batched(
                    || build_bracket(1, &seeded_field(n)).unwrap(),
                    play_out,
                    criterion::BatchSize::SmallInput,
                );
            },
        );
    }

    group.finish();
}

/// Benchmark correcting an early result in a finished bracket
fn bench_rereport_cascade(c: &mut Criterion) {
    let finished = play_out(build_bracket(1, &seeded_field(64)).unwrap());
    let correction = MatchReport::new(MatchId::winners(1, 1), "p64", "p1");

    c.bench_function("rereport_cascade_64", |b| {
        b.iter(|| report_result(&finished, &correction).unwrap());
    });
}

criterion_group!(
    construction,
    bench_seeding_order,
    bench_build_bracket,
);

criterion_group!(
    propagation,
    bench_report_result,
    bench_full_playthrough,
    bench_rereport_cascade,
);

criterion_main!(construction, propagation);
