use criterion::{criterion_group, criterion_main, Criterion};
use rand::seq::IndexedRandom;
use static_hash_index::{Config, HashAlgorithm};

fn words(n: usize) -> Vec<String> {
    (0..n).map(|_| nanoid::nanoid!()).collect()
}

fn index_build(c: &mut Criterion) {
    let words = words(100_000);

    for algorithm in HashAlgorithm::ALL {
        c.bench_function(&format!("build index, 100k words ({})", algorithm.label()), |b| {
            b.iter(|| {
                Config::new(algorithm)
                    .page_size(100)
                    .bucket_capacity(300)
                    .build(words.clone())
                    .unwrap()
            });
        });
    }
}

fn index_lookup(c: &mut Criterion) {
    let words = words(100_000);
    let mut rng = rand::rng();

    for capacity in [8, 64, 300] {
        let index = Config::new(HashAlgorithm::Fnv1a)
            .page_size(100)
            .bucket_capacity(capacity)
            .build(words.clone())
            .unwrap();

        c.bench_function(&format!("indexed lookup, capacity {capacity}"), |b| {
            b.iter(|| {
                let word = words.choose(&mut rng).unwrap();
                assert!(index.lookup(word).is_some());
            });
        });
    }

    let index = Config::new(HashAlgorithm::Fnv1a)
        .page_size(100)
        .build(words.clone())
        .unwrap();

    c.bench_function("indexed lookup, miss", |b| {
        b.iter(|| {
            assert!(index.lookup("not-a-word").is_none());
        });
    });
}

fn table_scan(c: &mut Criterion) {
    let words = words(100_000);
    let mut rng = rand::rng();

    let index = Config::new(HashAlgorithm::Fnv1a)
        .page_size(100)
        .build(words.clone())
        .unwrap();

    c.bench_function("table scan, 100k words", |b| {
        b.iter(|| {
            let word = words.choose(&mut rng).unwrap();
            assert!(index.scan(word).is_found());
        });
    });

    c.bench_function("table scan, miss", |b| {
        b.iter(|| {
            assert!(!index.scan("not-a-word").is_found());
        });
    });
}

criterion_group!(benches, index_build, index_lookup, table_scan);
criterion_main!(benches);
