use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tcscope::channel;
use tcscope_common::{TelemetryEvent, PAYLOAD_PREFIX_CAP};

fn sample_event() -> TelemetryEvent {
    TelemetryEvent {
        timestamp_ns: 1,
        core_id: 0,
        protocol: 0x0800,
        packet_len: 1500,
        payload: [0x5a; PAYLOAD_PREFIX_CAP],
    }
}

fn bench_publish(c: &mut Criterion) {
    let (tx, mut rx) = channel::bounded(4096).unwrap();
    let event = sample_event();

    c.bench_function("publish_then_drain_one", |b| {
        b.iter(|| {
            black_box(tx.publish(black_box(&event)));
            black_box(rx.drain().next());
        })
    });

    c.bench_function("publish_into_full_ring", |b| {
        while tx.publish(&event) {}
        b.iter(|| black_box(tx.publish(black_box(&event))))
    });
}

criterion_group!(benches, bench_publish);
criterion_main!(benches);
