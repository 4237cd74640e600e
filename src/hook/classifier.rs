//! The per-packet entry point.

use crate::channel::TelemetryProducer;
use crate::config::{FailPolicy, FilterConfig};
use crate::error::Result;
use crate::hook::context::{PacketContext, MIN_HEADER_LEN};
use crate::hook::host::Host;
use crate::hook::{PassThrough, Verdict, VerdictPolicy};
use tcscope_common::{TelemetryEvent, PAYLOAD_PREFIX_CAP};
use tracing::debug;

/// The classifier hook. Holds only immutable configuration and capability
/// handles; nothing carries over between invocations except what flows
/// through the telemetry channel.
pub struct Classifier<H: Host> {
    config: FilterConfig,
    host: H,
    telemetry: TelemetryProducer,
    policy: Box<dyn VerdictPolicy>,
}

impl<H: Host> Classifier<H> {
    /// Build a classifier over an already-provisioned telemetry channel.
    /// Fails if the configuration is invalid.
    pub fn new(config: FilterConfig, host: H, telemetry: TelemetryProducer) -> Result<Self> {
        config.validate()?;
        debug!(
            payload_prefix_len = config.payload_prefix_len,
            "classifier ready"
        );
        Ok(Self {
            config,
            host,
            telemetry,
            policy: Box::new(PassThrough),
        })
    }

    /// Replace the default pass-through verdict policy.
    pub fn with_policy(mut self, policy: impl VerdictPolicy + 'static) -> Self {
        self.policy = Box::new(policy);
        self
    }

    /// Classify one packet. Invoked synchronously by the host stack, once
    /// per packet, on whichever core is processing it.
    ///
    /// Packets shorter than [`MIN_HEADER_LEN`] resolve to the configured
    /// fail policy with no telemetry. Otherwise the policy decides the
    /// verdict and at most one event is published; a full channel counts the
    /// drop and never stalls the packet.
    pub fn classify(&self, ctx: &PacketContext<'_>) -> Verdict {
        let core_id = self.host.core_id();
        let len = ctx.len();

        if len < MIN_HEADER_LEN {
            return self.fail_verdict();
        }

        let verdict = self.policy.decide(ctx);

        let mut event = TelemetryEvent {
            timestamp_ns: self.host.timestamp_ns(),
            core_id,
            protocol: ctx.ether_proto(),
            packet_len: len.min(u16::MAX as usize) as u16,
            payload: [0; PAYLOAD_PREFIX_CAP],
        };
        let prefix = ctx.payload_prefix(self.config.payload_prefix_len);
        event.payload[..prefix.len()].copy_from_slice(prefix);
        self.telemetry.publish(&event);

        verdict
    }

    fn fail_verdict(&self) -> Verdict {
        match self.config.fail_policy {
            FailPolicy::Pass => Verdict::Pass,
            FailPolicy::Drop => Verdict::Drop,
        }
    }
}
