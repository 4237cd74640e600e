//! tcscope - single-hook traffic classifier core
//!
//! A per-packet classifier hook plus the lock-free telemetry channel it
//! reports through:
//! - [`hook::Classifier`] validates a bounded [`hook::PacketContext`],
//!   decides a [`hook::Verdict`], and emits at most one telemetry event
//! - [`channel`] carries fixed-size [`tcscope_common::TelemetryEvent`]
//!   records from any number of cores to a single consumer
//!
//! Loading, attaching, and buffer provisioning belong to external tooling;
//! it gates compatibility on [`tcscope_common::LICENSE`] and
//! [`tcscope_common::INTERFACE_VERSION`] before attaching the hook.

pub mod channel;
pub mod config;
pub mod error;
pub mod hook;

pub use error::{Result, TcscopeError};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
