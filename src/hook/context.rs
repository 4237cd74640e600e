//! Bounded read-only view over a single packet.

/// Minimum bytes a packet must hold before any protocol-specific field is
/// read: one Ethernet header.
pub const MIN_HEADER_LEN: usize = 14;

/// Read-mostly view over one packet's metadata and a validated byte range.
///
/// Borrowed for the duration of a single hook invocation; the classifier
/// never retains it. Every accessor is bounds-checked against the packet
/// length, so an out-of-range read is an `Option::None`, never undefined
/// behavior.
#[derive(Debug, Clone, Copy)]
pub struct PacketContext<'a> {
    ifindex: u32,
    ether_proto: u16,
    data: &'a [u8],
}

impl<'a> PacketContext<'a> {
    pub fn new(ifindex: u32, ether_proto: u16, data: &'a [u8]) -> Self {
        Self {
            ifindex,
            ether_proto,
            data,
        }
    }

    /// Ingress interface index.
    pub fn ifindex(&self) -> u32 {
        self.ifindex
    }

    /// EtherType of the packet in host byte order.
    pub fn ether_proto(&self) -> u16 {
        self.ether_proto
    }

    /// Validated packet length in bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Read one byte at `offset`, if in bounds.
    pub fn read_u8(&self, offset: usize) -> Option<u8> {
        self.data.get(offset).copied()
    }

    /// Read a big-endian (network order) u16 at `offset`, if in bounds.
    pub fn read_u16(&self, offset: usize) -> Option<u16> {
        let bytes = self.slice(offset, 2)?;
        Some(u16::from_be_bytes([bytes[0], bytes[1]]))
    }

    /// Read a big-endian (network order) u32 at `offset`, if in bounds.
    pub fn read_u32(&self, offset: usize) -> Option<u32> {
        let bytes = self.slice(offset, 4)?;
        Some(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// Borrow `len` bytes starting at `offset`, if fully in bounds.
    pub fn slice(&self, offset: usize, len: usize) -> Option<&'a [u8]> {
        let end = offset.checked_add(len)?;
        self.data.get(offset..end)
    }

    /// The first `max` bytes of the packet, capped at the packet length.
    /// Never fails: a short packet simply yields a shorter prefix.
    pub fn payload_prefix(&self, max: usize) -> &'a [u8] {
        &self.data[..self.data.len().min(max)]
    }
}
