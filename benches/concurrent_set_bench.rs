//! Set construction and pipeline benchmarks.
//!
//! Compares the plain `UnorderedSet` against `ConcurrentSet` for single-thread
//! inserts, and the snapshot pipeline against the exclusive pipeline for one
//! `map` + `filter` round.

use criterion::{BatchSize, BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use std::sync::Arc;
use std::thread;
use uniset::{ConcurrentSet, UnorderedSet};

const SIZES: [u64; 3] = [100, 1_000, 10_000];

fn batch_size_for(size: u64) -> BatchSize {
    if size < 1_000 {
        BatchSize::SmallInput
    } else {
        BatchSize::LargeInput
    }
}

fn benchmark_insert(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("set_insert");

    for size in SIZES {
        group.bench_with_input(BenchmarkId::new("unordered", size), &size, |bencher, &size| {
            bencher.iter(|| {
                let mut set = UnorderedSet::new();
                for element in 0..size {
                    set.insert(black_box(element));
                }
                black_box(set)
            });
        });

        group.bench_with_input(BenchmarkId::new("concurrent", size), &size, |bencher, &size| {
            bencher.iter(|| {
                let set = ConcurrentSet::new();
                for element in 0..size {
                    set.insert(black_box(element));
                }
                black_box(set)
            });
        });
    }

    group.finish();
}

fn benchmark_pipeline(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("concurrent_pipeline");

    for size in SIZES {
        group.bench_with_input(BenchmarkId::new("snapshot", size), &size, |bencher, &size| {
            bencher.iter_batched(
                || (0..size).collect::<ConcurrentSet<u64>>(),
                |set| {
                    let committed = set.pipeline().map(|x| x * 3).filter(|x| x % 2 == 0).collect();
                    black_box(committed)
                },
                batch_size_for(size),
            );
        });

        group.bench_with_input(BenchmarkId::new("exclusive", size), &size, |bencher, &size| {
            bencher.iter_batched(
                || (0..size).collect::<ConcurrentSet<u64>>(),
                |set| {
                    let committed = set
                        .pipeline_exclusive()
                        .map(|x| x * 3)
                        .filter(|x| x % 2 == 0)
                        .collect();
                    black_box(committed)
                },
                batch_size_for(size),
            );
        });
    }

    group.finish();
}

fn benchmark_contended_insert(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("concurrent_contended_insert");
    let per_thread: u64 = 1_000;

    for threads in [1_u64, 2, 4, 8] {
        group.bench_with_input(BenchmarkId::new("threads", threads), &threads, |bencher, &threads| {
            bencher.iter(|| {
                let set = Arc::new(ConcurrentSet::new());
                let handles: Vec<_> = (0..threads)
                    .map(|worker| {
                        let set = Arc::clone(&set);
                        thread::spawn(move || {
                            for offset in 0..per_thread {
                                set.insert(worker * per_thread + offset);
                            }
                        })
                    })
                    .collect();
                for handle in handles {
                    handle.join().unwrap();
                }
                black_box(set.len())
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_insert,
    benchmark_pipeline,
    benchmark_contended_insert
);

criterion_main!(benches);
