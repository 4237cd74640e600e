use crate::error::{Result, TcscopeError};
use std::cell::UnsafeCell;
use std::mem::MaybeUninit;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tcscope_common::TelemetryEvent;
use tracing::debug;

/// One ring slot. `seq` doubles as the commit marker: producers claim a slot
/// when `seq` equals the claim position, commit by storing `position + 1`,
/// and the consumer releases it for the next lap by storing
/// `position + capacity`.
struct Slot {
    seq: AtomicU64,
    event: UnsafeCell<MaybeUninit<TelemetryEvent>>,
}

struct Shared {
    slots: Box<[Slot]>,
    mask: u64,
    /// Monotonic write cursor; only ever advanced, never rewound.
    head: AtomicU64,
    /// Events rejected because the ring was full.
    dropped: AtomicU64,
}

// SAFETY: slot payloads are only written by the producer that won the claim
// CAS for that position and only read by the consumer after observing the
// commit store with Acquire ordering, so no two threads ever access a slot's
// `event` cell concurrently.
unsafe impl Send for Shared {}
unsafe impl Sync for Shared {}

impl Shared {
    fn capacity(&self) -> u64 {
        self.slots.len() as u64
    }
}

/// Producer half of the telemetry channel. Cheap to clone; one logical
/// producer per execution core.
#[derive(Clone)]
pub struct TelemetryProducer {
    shared: Arc<Shared>,
}

/// Consumer half of the telemetry channel. Deliberately not `Clone`: the
/// ring supports exactly one consumer, which owns the read cursor.
pub struct TelemetryConsumer {
    shared: Arc<Shared>,
    tail: u64,
}

/// Create a telemetry channel with a fixed number of slots.
///
/// `capacity` must be a non-zero power of two so slot indexing reduces to a
/// mask.
pub fn bounded(capacity: usize) -> Result<(TelemetryProducer, TelemetryConsumer)> {
    if capacity == 0 || !capacity.is_power_of_two() {
        return Err(TcscopeError::InvalidCapacity(capacity));
    }

    let slots = (0..capacity as u64)
        .map(|i| Slot {
            seq: AtomicU64::new(i),
            event: UnsafeCell::new(MaybeUninit::uninit()),
        })
        .collect::<Vec<_>>()
        .into_boxed_slice();

    let shared = Arc::new(Shared {
        slots,
        mask: capacity as u64 - 1,
        head: AtomicU64::new(0),
        dropped: AtomicU64::new(0),
    });

    debug!(capacity, "telemetry channel ready");

    Ok((
        TelemetryProducer {
            shared: Arc::clone(&shared),
        },
        TelemetryConsumer { shared, tail: 0 },
    ))
}

impl TelemetryProducer {
    /// Append one event. Lock-free and non-blocking: returns `true` once the
    /// record is committed, `false` when the ring is full (the event is
    /// dropped and counted, never queued).
    ///
    /// The consumer cannot observe a partially written record: the event
    /// bytes are stored before the slot's commit marker is published with
    /// Release ordering.
    pub fn publish(&self, event: &TelemetryEvent) -> bool {
        let shared = &self.shared;
        let mut pos = shared.head.load(Ordering::Relaxed);
        loop {
            let slot = &shared.slots[(pos & shared.mask) as usize];
            let seq = slot.seq.load(Ordering::Acquire);

            if seq == pos {
                // Slot is free at this position; try to claim it.
                match shared
                    .head
                    .compare_exchange_weak(pos, pos + 1, Ordering::Relaxed, Ordering::Relaxed)
                {
                    Ok(_) => {
                        // SAFETY: the claim CAS makes this thread the only
                        // writer of this slot until the commit below.
                        unsafe { (*slot.event.get()).write(*event) };
                        slot.seq.store(pos + 1, Ordering::Release);
                        return true;
                    }
                    Err(current) => pos = current,
                }
            } else if seq < pos {
                // The slot still holds an unconsumed record from the
                // previous lap: the ring is full. Drop the newest event.
                shared.dropped.fetch_add(1, Ordering::Relaxed);
                return false;
            } else {
                // Another producer claimed this position first.
                pos = shared.head.load(Ordering::Relaxed);
            }
        }
    }

    /// Total events dropped because the ring was full. Monotonic.
    pub fn dropped(&self) -> u64 {
        self.shared.dropped.load(Ordering::Relaxed)
    }

    /// Number of slots in the ring.
    pub fn capacity(&self) -> usize {
        self.shared.slots.len()
    }
}

impl TelemetryConsumer {
    /// Lazily drain committed events in commit order. The iterator stops at
    /// the first uncommitted slot; a later `drain` call resumes from there.
    pub fn drain(&mut self) -> Drain<'_> {
        Drain { consumer: self }
    }

    fn pop(&mut self) -> Option<TelemetryEvent> {
        let pos = self.tail;
        let slot = &self.shared.slots[(pos & self.shared.mask) as usize];
        if slot.seq.load(Ordering::Acquire) != pos + 1 {
            return None;
        }
        // SAFETY: the Acquire load above observed the producer's commit
        // store for this position, so the slot holds a fully written event
        // and no producer touches it until we release it below.
        let event = unsafe { (*slot.event.get()).assume_init_read() };
        slot.seq.store(pos + self.shared.capacity(), Ordering::Release);
        self.tail = pos + 1;
        Some(event)
    }

    /// Total events dropped because the ring was full. Monotonic.
    pub fn dropped(&self) -> u64 {
        self.shared.dropped.load(Ordering::Relaxed)
    }

    /// Number of slots in the ring.
    pub fn capacity(&self) -> usize {
        self.shared.slots.len()
    }
}

/// Lazy draining iterator returned by [`TelemetryConsumer::drain`].
pub struct Drain<'a> {
    consumer: &'a mut TelemetryConsumer,
}

impl Iterator for Drain<'_> {
    type Item = TelemetryEvent;

    fn next(&mut self) -> Option<TelemetryEvent> {
        self.consumer.pop()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tcscope_common::PAYLOAD_PREFIX_CAP;

    fn event(tag: u8) -> TelemetryEvent {
        let mut payload = [0u8; PAYLOAD_PREFIX_CAP];
        payload[0] = tag;
        TelemetryEvent {
            timestamp_ns: tag as u64,
            core_id: 0,
            protocol: 0x0800,
            packet_len: 64,
            payload,
        }
    }

    #[test]
    fn rejects_invalid_capacity() {
        assert!(bounded(0).is_err());
        assert!(bounded(3).is_err());
        assert!(bounded(4).is_ok());
    }

    #[test]
    fn published_events_drain_byte_identical_in_order() {
        let (tx, mut rx) = bounded(8).unwrap();
        for tag in 0..5 {
            assert!(tx.publish(&event(tag)));
        }

        let drained: Vec<_> = rx.drain().collect();
        assert_eq!(drained.len(), 5);
        for (tag, got) in drained.iter().enumerate() {
            let expected = event(tag as u8);
            assert_eq!(got.to_bytes(), expected.to_bytes());
        }
    }

    #[test]
    fn drain_is_idempotent_without_new_publishes() {
        let (tx, mut rx) = bounded(4).unwrap();
        tx.publish(&event(1));
        assert_eq!(rx.drain().count(), 1);
        assert_eq!(rx.drain().count(), 0);
    }

    #[test]
    fn full_ring_drops_newest_and_counts() {
        let (tx, mut rx) = bounded(4).unwrap();
        for tag in 0..6 {
            let accepted = tx.publish(&event(tag));
            assert_eq!(accepted, tag < 4);
        }

        assert_eq!(tx.dropped(), 2);
        let drained: Vec<_> = rx.drain().collect();
        assert_eq!(drained.len(), 4);
        // The oldest four survive; the two newest were the ones dropped.
        for (tag, got) in drained.iter().enumerate() {
            assert_eq!(got.payload[0], tag as u8);
        }
        assert_eq!(rx.dropped(), 2);
    }

    #[test]
    fn slots_are_reusable_after_drain() {
        let (tx, mut rx) = bounded(4).unwrap();
        for lap in 0..3u8 {
            for tag in 0..4 {
                assert!(tx.publish(&event(lap * 4 + tag)));
            }
            let drained: Vec<_> = rx.drain().collect();
            assert_eq!(drained.len(), 4);
            assert_eq!(drained[0].payload[0], lap * 4);
        }
        assert_eq!(tx.dropped(), 0);
    }

    #[test]
    fn concurrent_publishers_lose_nothing_within_capacity() {
        const THREADS: u64 = 8;
        const PER_THREAD: u64 = 64;

        let (tx, mut rx) = bounded(1024).unwrap();
        let handles: Vec<_> = (0..THREADS)
            .map(|t| {
                let tx = tx.clone();
                std::thread::spawn(move || {
                    for i in 0..PER_THREAD {
                        let mut ev = event(0);
                        ev.timestamp_ns = t * PER_THREAD + i;
                        assert!(tx.publish(&ev));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let mut seen: Vec<u64> = rx.drain().map(|ev| ev.timestamp_ns).collect();
        assert_eq!(seen.len(), (THREADS * PER_THREAD) as usize);
        assert_eq!(tx.dropped(), 0);
        seen.sort_unstable();
        seen.dedup();
        assert_eq!(seen.len(), (THREADS * PER_THREAD) as usize);
    }

    #[test]
    fn concurrent_overflow_drops_exactly_the_excess() {
        const THREADS: u64 = 4;
        const PER_THREAD: u64 = 256;
        const CAPACITY: u64 = 64;

        let (tx, mut rx) = bounded(CAPACITY as usize).unwrap();
        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                let tx = tx.clone();
                std::thread::spawn(move || {
                    let mut accepted = 0u64;
                    for i in 0..PER_THREAD {
                        if tx.publish(&event((i % 250) as u8)) {
                            accepted += 1;
                        }
                    }
                    accepted
                })
            })
            .collect();
        let accepted: u64 = handles.into_iter().map(|h| h.join().unwrap()).sum();

        let drained = rx.drain().count() as u64;
        assert_eq!(drained, accepted);
        assert_eq!(tx.dropped(), THREADS * PER_THREAD - accepted);
    }
}
