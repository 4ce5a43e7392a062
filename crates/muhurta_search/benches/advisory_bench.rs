use std::collections::BTreeMap;

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use muhurta_chart::{BodyReading, CLASSICAL_BODIES, HouseCusps, NatalChart};
use muhurta_search::{
    AdviceRequest, AdviceSettings, LinearMotionFeed, SearchConfig, Topic, TopicCatalog,
    TransitScorer, advise,
};
use muhurta_time::UtcTime;

fn natal() -> NatalChart {
    let bodies: BTreeMap<_, _> = CLASSICAL_BODIES
        .into_iter()
        .enumerate()
        .map(|(i, b)| (b, BodyReading::fixed(37.0 * i as f64).expect("finite")))
        .collect();
    NatalChart::new(bodies, Some(HouseCusps::equal(12.0).expect("valid cusps")))
}

fn feed() -> LinearMotionFeed {
    let epoch = UtcTime::new(2024, 3, 20, 0, 0, 0.0).to_jd().expect("valid date");
    let mut f = LinearMotionFeed::uniform(epoch, 0.0, 1.0).expect("finite");
    for (i, b) in CLASSICAL_BODIES.into_iter().enumerate() {
        let reading = BodyReading::new(53.0 * i as f64, 0.0, 13.0 / (i as f64 + 1.0))
            .expect("finite");
        f = f.with(b, reading);
    }
    f
}

fn scorer_bench(c: &mut Criterion) {
    let natal = natal();
    let table = Default::default();
    let profile = TopicCatalog::builtin().profile(Topic::Contract);
    let scorer = TransitScorer::new(Topic::Contract, profile, &table);
    let positions = muhurta_search::EphemerisFeed::positions_at(&feed(), 2460390.0)
        .expect("positions");

    let mut group = c.benchmark_group("transit_scorer");
    group.bench_function("score_only", |b| {
        b.iter(|| scorer.score_only(black_box(&natal), black_box(&positions)))
    });
    group.bench_function("score_full", |b| {
        b.iter(|| scorer.score(black_box(&natal), black_box(&positions)))
    });
    group.finish();
}

fn advisory_bench(c: &mut Criterion) {
    let natal = natal();
    let feed = feed();
    let request = AdviceRequest::new("2024-03-20", "contract");
    let sequential = AdviceSettings::default();
    let parallel = AdviceSettings {
        search: SearchConfig {
            parallel: true,
            ..SearchConfig::default()
        },
        ..AdviceSettings::default()
    };

    let mut group = c.benchmark_group("advisory_search");
    group.sample_size(50);
    group.bench_function("24_windows_sequential", |b| {
        b.iter(|| advise(black_box(&feed), &natal, &request, &sequential).expect("advice"))
    });
    group.bench_function("24_windows_parallel", |b| {
        b.iter(|| advise(black_box(&feed), &natal, &request, &parallel).expect("advice"))
    });
    group.finish();
}

criterion_group!(benches, scorer_bench, advisory_bench);
criterion_main!(benches);
