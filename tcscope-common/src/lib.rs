//! Shared types between the classifier hook and its consumers
//!
//! This crate defines the telemetry record and loader-facing metadata that
//! must be:
//! - `#[repr(C)]` for stable memory layout
//! - `no_std` compatible for restricted execution environments
//! - Shared between the hook and the user-space consumer

#![cfg_attr(not(feature = "userspace"), no_std)]

/// Compatibility string read by the loader before attachment.
///
/// Kernel-facing programs carry this in a dedicated `license` section; the
/// same value is exposed here so tooling can gate on it without parsing ELF.
pub const LICENSE: &str = "Dual MIT/GPL";

/// Numeric interface-version tag read by the loader before attachment.
///
/// A loader refuses to attach when this tag does not match what it was built
/// against.
pub const INTERFACE_VERSION: u32 = 0xFFFF_FFFE;

/// Maximum payload prefix bytes carried in a [`TelemetryEvent`].
pub const PAYLOAD_PREFIX_CAP: usize = 64;

/// Encoded size of a [`TelemetryEvent`] on the wire, in bytes.
pub const WIRE_SIZE: usize = 8 + 4 + 2 + 2 + PAYLOAD_PREFIX_CAP;

/// Per-packet telemetry record emitted by the classifier hook.
///
/// Layout (80 bytes total, 8-byte aligned):
/// - timestamp_ns: Host clock in nanoseconds at classification time
/// - core_id: Execution core the hook ran on
/// - protocol: EtherType of the observed packet (host byte order)
/// - packet_len: Packet size in bytes, saturated at `u16::MAX`
/// - payload: Truncated payload prefix; bytes past the captured length are zero
///
/// The wire encoding produced by [`TelemetryEvent::to_bytes`] is
/// little-endian with the fields in declaration order and no padding.
#[repr(C)]
#[derive(Clone, Copy, Debug)]
#[cfg_attr(feature = "userspace", derive(PartialEq, Eq))]
pub struct TelemetryEvent {
    pub timestamp_ns: u64,
    pub core_id: u32,
    pub protocol: u16,
    pub packet_len: u16,
    pub payload: [u8; PAYLOAD_PREFIX_CAP],
}

impl TelemetryEvent {
    /// Encode the record into its fixed little-endian wire form.
    pub fn to_bytes(&self) -> [u8; WIRE_SIZE] {
        let mut buf = [0u8; WIRE_SIZE];
        buf[0..8].copy_from_slice(&self.timestamp_ns.to_le_bytes());
        buf[8..12].copy_from_slice(&self.core_id.to_le_bytes());
        buf[12..14].copy_from_slice(&self.protocol.to_le_bytes());
        buf[14..16].copy_from_slice(&self.packet_len.to_le_bytes());
        buf[16..].copy_from_slice(&self.payload);
        buf
    }

    /// Decode a record from its wire form. Returns `None` unless `buf` is
    /// exactly [`WIRE_SIZE`] bytes.
    pub fn from_bytes(buf: &[u8]) -> Option<Self> {
        if buf.len() != WIRE_SIZE {
            return None;
        }
        let mut payload = [0u8; PAYLOAD_PREFIX_CAP];
        payload.copy_from_slice(&buf[16..]);
        Some(Self {
            timestamp_ns: u64::from_le_bytes(buf[0..8].try_into().ok()?),
            core_id: u32::from_le_bytes(buf[8..12].try_into().ok()?),
            protocol: u16::from_le_bytes(buf[12..14].try_into().ok()?),
            packet_len: u16::from_le_bytes(buf[14..16].try_into().ok()?),
            payload,
        })
    }
}

/// IP protocol constants
pub mod protocol {
    pub const ICMP: u8 = 1;
    pub const TCP: u8 = 6;
    pub const UDP: u8 = 17;
}

/// EtherType constants (host byte order)
pub mod ethertype {
    pub const IPV4: u16 = 0x0800;
    pub const ARP: u16 = 0x0806;
    pub const IPV6: u16 = 0x86DD;
}

#[cfg(feature = "userspace")]
const _: () = {
    assert!(
        core::mem::size_of::<TelemetryEvent>() == WIRE_SIZE,
        "TelemetryEvent must be exactly 80 bytes"
    );
    assert!(
        core::mem::align_of::<TelemetryEvent>() == 8,
        "TelemetryEvent must be 8-byte aligned"
    );
};
