//! Criterion micro-benchmarks for task ordering and agent dispatch.

use anvil_dispatch::TaskScheduler;
use anvil_engine::{standard_scheduler, Problem};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

/// A linear chain `t0 <- t1 <- ... <- t{n-1}`, registered back to front.
fn chain(n: usize) -> TaskScheduler {
    let mut s = TaskScheduler::new();
    for i in (0..n).rev() {
        let deps: Vec<String> = if i == 0 { vec![] } else { vec![format!("t{}", i - 1)] };
        s.register_task(&format!("t{i}"), deps).unwrap();
    }
    s
}

/// `n` tasks that all depend on one root.
fn fan_out(n: usize) -> TaskScheduler {
    let mut s = TaskScheduler::new();
    s.register_task("root", Vec::<String>::new()).unwrap();
    for i in 0..n {
        s.register_task(&format!("leaf{i}"), ["root"]).unwrap();
    }
    s
}

fn bench_finalize_chain_1k(c: &mut Criterion) {
    c.bench_function("finalize_chain_1k", |b| {
        b.iter_batched(
            || chain(1_000),
            |mut s| {
                black_box(s.finalize().unwrap().len());
            },
            criterion::BatchSize::SmallInput,
        );
    });
}

fn bench_finalize_fan_out_1k(c: &mut Criterion) {
    c.bench_function("finalize_fan_out_1k", |b| {
        b.iter_batched(
            || fan_out(1_000),
            |mut s| {
                black_box(s.finalize().unwrap().len());
            },
            criterion::BatchSize::SmallInput,
        );
    });
}

fn bench_standard_scheduler(c: &mut Criterion) {
    c.bench_function("standard_scheduler_finalize", |b| {
        b.iter(|| {
            let mut s = standard_scheduler().unwrap();
            black_box(s.finalize().unwrap().len());
        });
    });
}

fn bench_construct_64_kernels(c: &mut Criterion) {
    let types = anvil_bench::reference_types();
    let input = anvil_bench::reference_input(64);
    c.bench_function("construct_64_kernels_4_threads", |b| {
        b.iter(|| {
            let problem =
                Problem::construct_standard(anvil_bench::reference_config(4), &types, &input)
                    .unwrap();
            black_box(problem.metrics().objects_created);
        });
    });
}

criterion_group!(
    benches,
    bench_finalize_chain_1k,
    bench_finalize_fan_out_1k,
    bench_standard_scheduler,
    bench_construct_64_kernels,
);
criterion_main!(benches);
