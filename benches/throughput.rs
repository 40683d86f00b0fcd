//! Throughput benchmarks for the alarm queue.
//!
//! Benchmarks:
//! - Uncontended send/receive pairs (lock overhead)
//! - Alarm-priority delivery over a normal backlog
//! - Producer/consumer handoff across threads
//!
//! Run with:
//! ```bash
//! cargo bench --bench throughput
//! ```
//!
//! For HTML reports:
//! ```bash
//! cargo bench --bench throughput -- --verbose
//! open target/criterion/report/index.html
//! ```

use alarmq::{AlarmQueue, MsgKind};
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;
use std::thread;
use std::time::Duration;

fn throughput_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("throughput");
    group.measurement_time(Duration::from_secs(5));

    // Single thread: the cost of one lock round trip per operation
    group.throughput(Throughput::Elements(1));
    group.bench_function("send_receive_normal", |b| {
        let queue = AlarmQueue::new();
        b.iter(|| {
            queue.send(black_box(1u64), MsgKind::Normal).unwrap();
            black_box(queue.receive().unwrap());
        });
    });

    // Alarm overtaking a standing backlog of normals
    for backlog in [0usize, 100, 10_000].iter() {
        group.bench_with_input(
            BenchmarkId::new("alarm_over_backlog", backlog),
            backlog,
            |b, &backlog| {
                let queue = AlarmQueue::new();
                for i in 0..backlog {
                    queue.send(i as u64, MsgKind::Normal).unwrap();
                }
                b.iter(|| {
                    queue.send(black_box(u64::MAX), MsgKind::Alarm).unwrap();
                    black_box(queue.receive().unwrap());
                });
            },
        );
    }

    // Cross-thread handoff: producers feed one consumer
    group.sample_size(20);
    for producers in [1usize, 2, 4].iter() {
        const PER_PRODUCER: u64 = 10_000;
        group.throughput(Throughput::Elements(*producers as u64 * PER_PRODUCER));
        group.bench_with_input(
            BenchmarkId::new("producer_consumer", producers),
            producers,
            |b, &producers| {
                b.iter(|| {
                    let queue = AlarmQueue::new();
                    let handles: Vec<_> = (0..producers)
                        .map(|_| {
                            let queue = queue.clone();
                            thread::spawn(move || {
                                for i in 0..PER_PRODUCER {
                                    let kind = if i % 100 == 0 {
                                        MsgKind::Alarm
                                    } else {
                                        MsgKind::Normal
                                    };
                                    queue.send(i, kind).unwrap();
                                }
                            })
                        })
                        .collect();

                    for _ in 0..(producers as u64 * PER_PRODUCER) {
                        black_box(queue.receive().unwrap());
                    }
                    for handle in handles {
                        handle.join().unwrap();
                    }
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, throughput_benchmarks);
criterion_main!(benches);
