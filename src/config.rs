//! Configuration for the classifier hook and its telemetry channel.

use crate::error::{Result, TcscopeError};
use serde::{Deserialize, Serialize};
use tcscope_common::PAYLOAD_PREFIX_CAP;

/// Verdict returned when packet validation fails before any protocol field
/// can be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailPolicy {
    /// Fail-open: let unparseable packets continue down the stack.
    Pass,
    /// Fail-closed: discard unparseable packets.
    Drop,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    pub fail_policy: FailPolicy,
    /// Payload bytes captured per telemetry record, at most
    /// [`PAYLOAD_PREFIX_CAP`].
    pub payload_prefix_len: usize,
    /// Telemetry channel slot count. Must be a non-zero power of two.
    pub channel_capacity: usize,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            fail_policy: FailPolicy::Pass,
            payload_prefix_len: PAYLOAD_PREFIX_CAP,
            channel_capacity: 1024,
        }
    }
}

impl FilterConfig {
    pub fn validate(&self) -> Result<()> {
        if self.channel_capacity == 0 || !self.channel_capacity.is_power_of_two() {
            return Err(TcscopeError::InvalidCapacity(self.channel_capacity));
        }
        if self.payload_prefix_len > PAYLOAD_PREFIX_CAP {
            return Err(TcscopeError::PayloadPrefixTooLong {
                len: self.payload_prefix_len,
                max: PAYLOAD_PREFIX_CAP,
            });
        }
        Ok(())
    }
}
