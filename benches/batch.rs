use corrector::engine::{batch, CorrectionSession, MonospaceMetrics, Viewport};
use corrector::{AnalyzerOutput, Match};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

/// `words` copies of "teh " with a match on every copy.
fn misspelled(words: usize) -> (String, Vec<Match>) {
    let text = "teh ".repeat(words);
    let matches = (0..words)
        .map(|i| Match::new(i * 4, i * 4 + 3, vec!["the".into(), "tea".into()]))
        .collect();
    (text, matches)
}

fn bench_batch(c: &mut Criterion) {
    let mut group = c.benchmark_group("batch");
    group.sample_size(10);

    let (text, matches) = misspelled(2_000);

    group.bench_function("apply_2000_matches", |b| {
        b.iter(|| batch::apply(black_box(&text), black_box(&matches)).unwrap());
    });

    group.bench_function("run_batch_with_geometry", |b| {
        b.iter(|| {
            let mut session = CorrectionSession::new(MonospaceMetrics::terminal(4), Viewport::new(80.0));
            let output = AnalyzerOutput {
                matches: matches.clone(),
            };
            session.run_batch(black_box(&text), Some(output)).unwrap();
        });
    });

    group.finish();
}

fn bench_swap(c: &mut Criterion) {
    let mut group = c.benchmark_group("swap");
    group.sample_size(10);

    let (text, matches) = misspelled(2_000);
    let mut session = CorrectionSession::new(MonospaceMetrics::terminal(4), Viewport::new(80.0));
    session
        .run_batch(&text, Some(AnalyzerOutput { matches }))
        .unwrap();
    let first = session.regions().iter().next().unwrap().id();

    // Swapping the first region cascades through every other one.
    group.bench_function("cascade_from_first", |b| {
        let mut long = false;
        b.iter(|| {
            let chosen = if long { "the" } else { "teh-longer" };
            session.swap(black_box(first), chosen).unwrap();
            long = !long;
        });
    });

    group.finish();
}

criterion_group!(benches, bench_batch, bench_swap);
criterion_main!(benches);
