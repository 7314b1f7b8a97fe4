//! Benchmarks for catalog scoring.
//!
//! Real catalogs hold tens to a few hundred questions; the large case only
//! checks that ranking stays linear in catalog size.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use ctop_recommend::{CatalogEntry, Recommender};

const TOPICS: &[&str] = &[
    "password", "sensor", "node", "alarm", "threshold", "domain", "vertical", "analytic",
    "export", "dashboard", "user", "map",
];

fn build_catalog(size: usize) -> Recommender {
    let entries = (0..size)
        .map(|i| {
            let a = TOPICS[i % TOPICS.len()];
            let b = TOPICS[(i / TOPICS.len()) % TOPICS.len()];
            CatalogEntry::new(
                format!("How do I manage the {} for a {} entry {}?", a, b, i),
                format!("faq_{}_{}_{}", a, b, i),
            )
            .with_keywords([a, b])
        })
        .collect();
    Recommender::new(entries)
}

fn bench_recommend(c: &mut Criterion) {
    for size in [50usize, 500, 5_000] {
        let recommender = build_catalog(size);
        c.bench_function(&format!("recommend_{}_entries", size), |b| {
            b.iter(|| {
                recommender.recommend(
                    black_box("I forgot the password for my sensor dashboard"),
                    black_box("faq_forgot_password"),
                    3,
                )
            })
        });
    }
}

criterion_group!(benches, bench_recommend);
criterion_main!(benches);
