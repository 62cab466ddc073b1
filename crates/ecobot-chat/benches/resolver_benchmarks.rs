//! Benchmarks for resolving and rendering chat replies.
//!
//! Covers each resolution path (exact key, title, menu, keyword, fallback)
//! and the full render of the largest topic.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use ecobot_chat::{resolve, ResponseEngine};

const INPUTS: &[(&str, &str)] = &[
    ("exact_key", "1"),
    ("title", "quero ver a qualidade da água na minha cidade"),
    ("menu", "voltar para o menu principal"),
    ("keyword", "como anda o aquecimento global"),
    ("fallback", "qual é a previsão do campeonato de futebol"),
];

fn bench_resolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve");
    for (name, text) in INPUTS {
        group.bench_function(*name, |b| b.iter(|| resolve(black_box(text))));
    }
    group.finish();
}

fn bench_resolve_and_respond(c: &mut Criterion) {
    let engine = ResponseEngine::new();

    let mut group = c.benchmark_group("resolve_and_respond");
    group.bench_function("air_topic", |b| {
        b.iter(|| engine.resolve_and_respond(black_box("1")))
    });
    group.bench_function("links_topic", |b| {
        b.iter(|| engine.resolve_and_respond(black_box("6")))
    });
    group.bench_function("welcome", |b| {
        b.iter(|| engine.resolve_and_respond(black_box("menu")))
    });
    group.finish();
}

criterion_group!(benches, bench_resolve, bench_resolve_and_respond);
criterion_main!(benches);
