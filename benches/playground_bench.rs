use chart_playground::MarkChartBuilder;
use chart_playground::api::{Playground, PlaygroundConfig, reflect_dataset};
use chart_playground::core::Viewport;
use chart_playground::samples::{BAR, SAMPLES};
use chart_playground::script::normalize;
use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

fn bench_normalize_samples(c: &mut Criterion) {
    let scripts: Vec<&str> = SAMPLES.iter().map(|sample| sample.script).collect();

    c.bench_function("normalize_samples", |b| {
        b.iter(|| {
            for script in &scripts {
                let _ = normalize(black_box(script));
            }
        })
    });
}

fn bench_run_bar_sample(c: &mut Criterion) {
    let mut playground = Playground::new(
        MarkChartBuilder::new(),
        PlaygroundConfig::new(Viewport::new(640, 400)),
    )
    .expect("playground init");

    c.bench_function("run_bar_sample", |b| {
        b.iter(|| {
            playground.run(black_box(BAR.script)).expect("sample runs");
        })
    });
}

fn bench_reflect_dataset(c: &mut Criterion) {
    let mut playground = Playground::new(
        MarkChartBuilder::new(),
        PlaygroundConfig::new(Viewport::new(640, 400)),
    )
    .expect("playground init");
    playground
        .run(
            "let data = []; for i in 0..1000 { data.push(#{ x: i, y: i * 2 }); } \
             let chart = Chart(#{ container: container, data: data }); chart",
        )
        .expect("script runs");
    let chart = playground.current_handle().expect("chart");

    c.bench_function("reflect_dataset_1k", |b| {
        b.iter(|| {
            let _ = reflect_dataset(black_box(&chart));
        })
    });
}

criterion_group!(
    benches,
    bench_normalize_samples,
    bench_run_bar_sample,
    bench_reflect_dataset
);
criterion_main!(benches);
