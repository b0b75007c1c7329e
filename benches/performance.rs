//! Performance benchmarks for the bus.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use herald::{Bus, Playback};

/// Benchmark publish fan-out with varying subscriber counts
fn bench_publish_fanout(c: &mut Criterion) {
    let mut group = c.benchmark_group("publish_fanout");

    for subscribers in [0, 1, 10, 100] {
        group.bench_with_input(
            BenchmarkId::new("subscribers", subscribers),
            &subscribers,
            |b, &count| {
                let bus: Bus<u64> = Bus::with_max_history(10);
                for _ in 0..count {
                    bus.subscribe("bench", |values: &[u64]| {
                        black_box(values);
                    });
                }

                let mut i = 0u64;
                b.iter(|| {
                    i += 1;
                    black_box(bus.publish("bench", [i]));
                });
            },
        );
    }

    group.finish();
}

/// Benchmark history trimming once the buffer is full
fn bench_history_eviction(c: &mut Criterion) {
    let mut group = c.benchmark_group("history_eviction");

    for max_history in [10, 1_000, 100_000] {
        group.bench_with_input(
            BenchmarkId::new("max_history", max_history),
            &max_history,
            |b, &max| {
                let bus: Bus<u64> = Bus::with_max_history(max);
                for i in 0..max as u64 {
                    bus.publish("bench", [i]);
                }

                let mut i = 0u64;
                b.iter(|| {
                    i += 1;
                    bus.publish("bench", [i]);
                });
            },
        );
    }

    group.finish();
}

/// Benchmark subscribing with full playback
fn bench_subscribe_playback(c: &mut Criterion) {
    let mut group = c.benchmark_group("subscribe_playback");

    for history in [10, 100, 1_000] {
        group.bench_with_input(
            BenchmarkId::new("history", history),
            &history,
            |b, &len| {
                let bus: Bus<u64> = Bus::with_max_history(len);
                for i in 0..len as u64 {
                    bus.publish("bench", [i]);
                }

                b.iter(|| {
                    let sub = bus.subscribe_with(
                        "bench",
                        |values: &[u64]| {
                            black_box(values);
                        },
                        Playback::All,
                    );
                    sub.unsubscribe();
                });
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_publish_fanout,
    bench_history_eviction,
    bench_subscribe_playback,
);

criterion_main!(benches);
