//! Criterion micro-benchmarks for object store population and queries.

use anvil_core::{BlockId, Params, Restriction, ThreadId};
use anvil_registry::TypeRegistry;
use anvil_store::ObjectStore;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn populate(types: &TypeRegistry, store: &mut ObjectStore, objects: usize) {
    let params = Params::new();
    for i in 0..objects {
        let name = format!("load_{i}");
        let restriction = Restriction::blocks([BlockId((i % 4) as u32)]);
        for t in 0..store.num_threads() {
            let thread = ThreadId(t as u32);
            let obj = types
                .create(anvil_bench::LOAD_KERNEL, &name, &params, thread)
                .unwrap();
            store.add_object(thread, obj, restriction.clone()).unwrap();
        }
    }
}

fn bench_add_256_objects_4_threads(c: &mut Criterion) {
    let types = anvil_bench::reference_types();
    let mesh = anvil_bench::reference_mesh(16);
    c.bench_function("add_256_objects_4_threads", |b| {
        b.iter(|| {
            let mut store = ObjectStore::new(&mesh, 4);
            populate(&types, &mut store, 256);
            black_box(store.len(ThreadId(0)));
        });
    });
}

fn bench_update_active(c: &mut Criterion) {
    let types = anvil_bench::reference_types();
    let mesh = anvil_bench::reference_mesh(16);
    let mut store = ObjectStore::new(&mesh, 4);
    populate(&types, &mut store, 256);
    c.bench_function("update_active_256_objects", |b| {
        b.iter(|| {
            store.update_active();
            black_box(store.active_objects(ThreadId(3)).len());
        });
    });
}

fn bench_sort(c: &mut Criterion) {
    let types = anvil_bench::reference_types();
    let mesh = anvil_bench::reference_mesh(16);
    let mut store = ObjectStore::new(&mesh, 1);
    populate(&types, &mut store, 512);
    c.bench_function("sort_512_objects", |b| {
        b.iter(|| {
            store.sort(ThreadId(0)).unwrap();
            black_box(store.len(ThreadId(0)));
        });
    });
}

fn bench_block_query(c: &mut Criterion) {
    let types = anvil_bench::reference_types();
    let mesh = anvil_bench::reference_mesh(16);
    let mut store = ObjectStore::new(&mesh, 1);
    populate(&types, &mut store, 256);
    c.bench_function("objects_on_block", |b| {
        b.iter(|| {
            let view = store.objects_on(ThreadId(0), black_box(BlockId(2)));
            black_box(view.iter().count());
        });
    });
}

criterion_group!(
    benches,
    bench_add_256_objects_4_threads,
    bench_update_active,
    bench_sort,
    bench_block_query,
);
criterion_main!(benches);
