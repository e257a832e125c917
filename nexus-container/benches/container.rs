//! Benchmarks comparing the container against std sequences.
//!
//! Run with: cargo bench
//!
//! Bounded containers are pre-allocated and reused across iterations.

use std::collections::{LinkedList, VecDeque};
use std::hint::black_box;

use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use nexus_container::Container;

const COUNT: usize = 10_000;
const SORTED: usize = 512;

// ============================================================================
// Deque Benchmarks
// ============================================================================

fn bench_push_pop(c: &mut Criterion) {
    let mut group = c.benchmark_group("add_back_get_front");
    group.throughput(Throughput::Elements(COUNT as u64));

    let mut bounded: Container<u64> = Container::try_with_capacity(COUNT).unwrap();
    let mut growable: Container<u64> = Container::new();
    let mut deque = VecDeque::<u64>::with_capacity(COUNT);
    let mut linked = LinkedList::<u64>::new();

    group.bench_function("container/bounded", |b| {
        b.iter(|| {
            for i in 0..COUNT as u64 {
                bounded.add_back(i).unwrap();
            }
            while let Some(element) = bounded.get_front() {
                black_box(element.into_inner());
            }
        });
    });

    group.bench_function("container/growable", |b| {
        b.iter(|| {
            for i in 0..COUNT as u64 {
                growable.add_back(i).unwrap();
            }
            while let Some(element) = growable.get_front() {
                black_box(element.into_inner());
            }
        });
    });

    group.bench_function("VecDeque", |b| {
        b.iter(|| {
            for i in 0..COUNT as u64 {
                deque.push_back(i);
            }
            while let Some(value) = deque.pop_front() {
                black_box(value);
            }
        });
    });

    group.bench_function("LinkedList", |b| {
        b.iter(|| {
            for i in 0..COUNT as u64 {
                linked.push_back(i);
            }
            while let Some(value) = linked.pop_front() {
                black_box(value);
            }
        });
    });

    group.finish();
}

// ============================================================================
// Sorted Insert Benchmarks
// ============================================================================

fn bench_sorted_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("sorted_insert");
    group.throughput(Throughput::Elements(SORTED as u64));

    // Deterministic scatter so every run inserts the same sequence.
    let values: Vec<u64> = (0..SORTED as u64).map(|i| (i * 7919) % 1009).collect();

    let mut list: Container<u64> = Container::try_with_capacity(SORTED).unwrap();
    let mut vec = Vec::<u64>::with_capacity(SORTED);

    group.bench_function("container", |b| {
        b.iter(|| {
            for &value in &values {
                list.add_sorted_ascending(value, |new, cur| new.cmp(cur)).unwrap();
            }
            list.delete_all();
        });
    });

    group.bench_function("Vec/insert", |b| {
        b.iter(|| {
            for &value in &values {
                let pos = vec.partition_point(|&cur| cur < value);
                vec.insert(pos, value);
            }
            vec.clear();
        });
    });

    group.finish();
}

// ============================================================================
// Lookup Benchmarks
// ============================================================================

fn bench_matching(c: &mut Criterion) {
    let mut group = c.benchmark_group("matching");

    let mut list: Container<u64> = Container::new();
    for i in 0..SORTED as u64 {
        list.add_back(i).unwrap();
    }

    group.bench_function("peek_matching/last", |b| {
        let probe = SORTED as u64 - 1;
        b.iter(|| black_box(list.peek_matching(&probe, |p, cur| p.cmp(cur))));
    });

    group.bench_function("get_then_add_back", |b| {
        let mut probe = 0u64;
        b.iter(|| {
            let element = list.get_matching(&probe, |p, cur| p.cmp(cur)).unwrap();
            list.add_back(element.into_inner()).unwrap();
            probe = (probe + 1) % SORTED as u64;
        });
    });

    group.finish();
}

criterion_group!(benches, bench_push_pop, bench_sorted_insert, bench_matching);
criterion_main!(benches);
