//! Curation queue performance benchmarks.
//!
//! Measures end-to-end queue building: comparison, classification, scoring, and ranking.

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use concordance::{
    Concordance, ConcordanceConfig, Entity, EntityType, InMemoryRepository, LexicalAnalyzer,
    SourceAttestation,
};

/// Generate characters with a mix of agreeing and divergent traits.
fn generate_characters(count: usize) -> InMemoryRepository {
    let sources = ["matthew", "mark", "luke", "john", "paul"];
    let places = ["Bethlehem", "Nazareth", "Capernaum", "Bethsaida"];
    let roles = ["disciple", "apostle", "follower of John"];

    let mut repo = InMemoryRepository::new();
    for n in 0..count {
        let mut entity = Entity::new(format!("character_{:04}", n), format!("Character {}", n));
        if n % 3 == 0 {
            entity = entity.with_summary("Curated summary.").with_tag("apostle");
        }
        for (i, source) in sources.iter().enumerate().take(2 + n % 4) {
            entity = entity.with_source(
                SourceAttestation::new(*source)
                    .with_trait("birthplace", places[(n + i) % places.len()])
                    .with_trait("role", roles[(n * i) % roles.len()])
                    .with_trait("death_cause", if i % 2 == 0 { "stoning" } else { "stoned by the council" })
                    .with_reference(format!("{} {}:{}", source, n % 28 + 1, i + 1)),
            );
        }
        repo.insert(EntityType::Character, entity);
    }
    repo
}

fn bench_queue_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("queue_build");

    for size in [10, 100, 500] {
        let repo = Arc::new(generate_characters(size));
        group.throughput(Throughput::Elements(size as u64));

        group.bench_with_input(BenchmarkId::new("structural", size), &size, |b, _| {
            let engine = Concordance::new(repo.clone());
            b.iter(|| {
                engine
                    .build_curation_review_queue(black_box("character"), None, false)
                    .unwrap()
            })
        });

        group.bench_with_input(BenchmarkId::new("lexical", size), &size, |b, _| {
            let engine = Concordance::new(repo.clone()).with_analyzer(Arc::new(LexicalAnalyzer::new()));
            b.iter(|| {
                engine
                    .build_curation_review_queue(black_box("character"), None, false)
                    .unwrap()
            })
        });
    }

    group.finish();
}

fn bench_cached_queue(c: &mut Criterion) {
    let repo = Arc::new(generate_characters(500));
    let engine = Concordance::with_config(repo, ConcordanceConfig::default());
    engine.build_curation_review_queue("character", Some(25), true).unwrap();

    c.bench_function("queue_cached_hit", |b| {
        b.iter(|| {
            engine
                .build_curation_review_queue(black_box("character"), Some(25), true)
                .unwrap()
        })
    });
}

criterion_group!(benches, bench_queue_build, bench_cached_queue);
criterion_main!(benches);
