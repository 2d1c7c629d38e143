//! Benchmarks for the steppable sorters and the shuffle.
//!
//! Run with: cargo bench -p vsort-core --bench algorithms_bench

use criterion::{BatchSize, BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use std::hint::black_box;
use vsort_core::buffer::{fill, shuffle};
use vsort_core::{SortAlgorithm, sort_with};

fn shuffled(len: usize, seed: u64) -> Vec<i32> {
    let mut values = vec![0; len];
    fill(&mut values);
    shuffle(&mut values, &mut SmallRng::seed_from_u64(seed));
    values
}

fn bench_fast_sorts(c: &mut Criterion) {
    let mut group = c.benchmark_group("sort/fast");

    for len in [1_000usize, 10_000] {
        group.throughput(Throughput::Elements(len as u64));
        group.bench_with_input(BenchmarkId::new("merge", len), &len, |b, &len| {
            b.iter_batched(
                || shuffled(len, 1),
                |mut values| black_box(sort_with(SortAlgorithm::Merge, &mut values, |_| {})),
                BatchSize::LargeInput,
            );
        });
    }

    group.finish();
}

fn bench_quadratic_sorts(c: &mut Criterion) {
    let mut group = c.benchmark_group("sort/quadratic");

    for algorithm in [
        SortAlgorithm::Selection,
        SortAlgorithm::Bubble,
        SortAlgorithm::Insertion,
    ] {
        let len = 1_000usize;
        group.throughput(Throughput::Elements(len as u64));
        group.bench_with_input(BenchmarkId::new(algorithm.as_str(), len), &len, |b, &len| {
            b.iter_batched(
                || shuffled(len, 2),
                |mut values| black_box(sort_with(algorithm, &mut values, |_| {})),
                BatchSize::LargeInput,
            );
        });
    }

    group.finish();
}

fn bench_counting_variant(c: &mut Criterion) {
    let mut group = c.benchmark_group("sort/counting");
    group.sample_size(10);

    for len in [100usize, 300] {
        group.bench_with_input(BenchmarkId::new("restart", len), &len, |b, &len| {
            b.iter_batched(
                || shuffled(len, 3),
                |mut values| black_box(sort_with(SortAlgorithm::Counting, &mut values, |_| {})),
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

fn bench_shuffle(c: &mut Criterion) {
    let mut group = c.benchmark_group("buffer/shuffle");

    for len in [25_000usize, 100_000] {
        group.throughput(Throughput::Elements(len as u64));
        let mut rng = SmallRng::seed_from_u64(4);
        let mut values = vec![0; len];
        fill(&mut values);
        group.bench_function(BenchmarkId::new("naive", len), |b| {
            b.iter(|| shuffle(black_box(&mut values), &mut rng));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_fast_sorts,
    bench_quadratic_sorts,
    bench_counting_variant,
    bench_shuffle,
);

criterion_main!(benches);
