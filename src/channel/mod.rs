//! Lock-free telemetry channel between the classifier hook and a consumer.
//!
//! The channel is a fixed-capacity ring of [`TelemetryEvent`] slots. Any
//! number of hook invocations may publish concurrently; a single consumer
//! drains committed records in order. A full ring drops the newest record and
//! counts it, it never blocks the packet path.
//!
//! [`TelemetryEvent`]: tcscope_common::TelemetryEvent

mod ring;

pub use ring::{bounded, Drain, TelemetryConsumer, TelemetryProducer};
