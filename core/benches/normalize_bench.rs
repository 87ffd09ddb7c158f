use criterion::{criterion_group, criterion_main, Criterion};
use deskfind_core::tokenizer::{normalize, Normalizer};

const TEXT: &str = "It was the best of times, it was the worst of times, it was the age of wisdom, \
    it was the age of foolishness, it was the epoch of belief, it was the epoch of incredulity, \
    it was the season of Light, it was the season of Darkness, it was the spring of hope, \
    it was the winter of despair, we had everything before us, we had nothing before us.";

fn bench_normalize(c: &mut Criterion) {
    let text = TEXT.repeat(50);
    c.bench_function("normalize_paragraphs", |b| b.iter(|| normalize(&text)));

    let normalizer = Normalizer::default();
    c.bench_function("normalize_cached_query", |b| b.iter(|| normalizer.normalize_cached("season of light")));
}

criterion_group!(benches, bench_normalize);
criterion_main!(benches);
