//! Criterion benchmarks for task submission and round trips through the
//! worker pool.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use stash_worker::{Task, WorkerPool, WorkerPoolConfig};

fn make_pool(workers: usize) -> WorkerPool {
    WorkerPool::new(WorkerPoolConfig {
        worker_count: Some(workers),
        queue_capacity: 4096,
        ..WorkerPoolConfig::default()
    })
    .expect("benchmark pool config is valid")
}

fn bench_spawn_join(c: &mut Criterion) {
    let pool = make_pool(2);
    c.bench_function("spawn_join_round_trip", |b| {
        b.iter(|| {
            pool.spawn(|| black_box(21_u64) * 2)
                .expect("pool is running")
                .join()
        })
    });
}

fn bench_submit_batch(c: &mut Criterion) {
    c.bench_function("submit_1000_then_shutdown", |b| {
        b.iter(|| {
            let pool = make_pool(4);
            for i in 0..1000_u64 {
                let task = Task::new(move || {
                    let _ = black_box(i.wrapping_mul(31));
                });
                pool.submit(task).expect("pool is running");
            }
            pool.shutdown()
        })
    });
}

criterion_group!(benches, bench_spawn_join, bench_submit_batch);
criterion_main!(benches);
