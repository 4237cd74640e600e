//! The per-packet classifier hook and its supporting seams.

pub mod classifier;
pub mod context;
pub mod host;

pub use classifier::Classifier;
pub use context::{PacketContext, MIN_HEADER_LEN};
pub use host::{Host, SystemHost};

/// Classification outcome returned to the host stack for each packet.
///
/// Produced once per invocation and consumed immediately; never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Let the packet continue down the stack.
    Pass,
    /// Discard the packet.
    Drop,
    /// Steer the packet to the given interface index.
    Redirect(u32),
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Verdict::Pass => write!(f, "pass"),
            Verdict::Drop => write!(f, "drop"),
            Verdict::Redirect(ifindex) => write!(f, "redirect({})", ifindex),
        }
    }
}

/// Pluggable verdict logic, consulted only after the packet context has been
/// validated. Implementations must restrict themselves to the context's
/// checked accessors and must not retain any part of the context.
pub trait VerdictPolicy: Send + Sync {
    fn decide(&self, ctx: &PacketContext<'_>) -> Verdict;
}

/// Default policy: every packet continues down the stack untouched.
#[derive(Debug, Default, Clone, Copy)]
pub struct PassThrough;

impl VerdictPolicy for PassThrough {
    fn decide(&self, _ctx: &PacketContext<'_>) -> Verdict {
        Verdict::Pass
    }
}
