//! Scoring throughput for small and large catalogs.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use symptom_advisor::{CatalogEntry, CatalogIndex, EmbeddingProvider, HashingEmbedder, Matcher};

fn build_index(entries: usize, embedder: &HashingEmbedder) -> CatalogIndex {
    let catalog: Vec<CatalogEntry> = (0..entries)
        .map(|i| {
            CatalogEntry::new(
                format!("symptom {} with pain number {}", i, i * 7),
                "advice",
            )
            .unwrap()
        })
        .collect();
    CatalogIndex::build(catalog, embedder).unwrap()
}

fn bench_match_vector(c: &mut Criterion) {
    let embedder = HashingEmbedder::new(384);
    let query = embedder.embed("persistent pain number 42").unwrap();
    let matcher = Matcher::default();

    let mut group = c.benchmark_group("match_vector");
    for size in [100usize, 1_000, 10_000] {
        let index = build_index(size, &embedder);
        group.bench_with_input(BenchmarkId::from_parameter(size), &index, |b, index| {
            b.iter(|| matcher.match_vector(black_box(&query), index))
        });
    }
    group.finish();
}

fn bench_match_query(c: &mut Criterion) {
    let embedder = HashingEmbedder::new(384);
    let index = build_index(1_000, &embedder);
    let matcher = Matcher::default();

    c.bench_function("match_query_hashing_1000", |b| {
        b.iter(|| {
            matcher
                .match_query(black_box("I have pain number 42"), &index, &embedder)
                .unwrap()
        })
    });
}

criterion_group!(benches, bench_match_vector, bench_match_query);
criterion_main!(benches);
