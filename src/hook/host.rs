//! Capability interface injected by the host environment.
//!
//! Restricted execution environments expose helpers like the current
//! processor id and a nanosecond clock through a fixed dispatch table. The
//! hook reaches them through this trait so unit tests can substitute a
//! deterministic double.

use std::time::{SystemTime, UNIX_EPOCH};

pub trait Host: Send + Sync {
    /// Id of the execution core the current invocation runs on.
    fn core_id(&self) -> u32;

    /// Host clock in nanoseconds.
    fn timestamp_ns(&self) -> u64;
}

/// Host backed by the operating system's scheduler and clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemHost;

impl Host for SystemHost {
    fn core_id(&self) -> u32 {
        current_core()
    }

    fn timestamp_ns(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0)
    }
}

#[cfg(target_os = "linux")]
fn current_core() -> u32 {
    // sched_getcpu reports failure as a negative value; fold that to core 0.
    let cpu = unsafe { libc::sched_getcpu() };
    if cpu < 0 {
        0
    } else {
        cpu as u32
    }
}

#[cfg(not(target_os = "linux"))]
fn current_core() -> u32 {
    0
}
