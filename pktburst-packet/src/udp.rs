//! UDP header construction
//!
//! The checksum is always written as `0x0000`, which IPv4 receivers treat as
//! "no checksum". Frames are replayed verbatim, so nothing recomputes it later.

use bytes::{BufMut, BytesMut};

/// UDP header size in bytes
pub const HEADER_SIZE: usize = 8;

/// Fixed-layout UDP header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UdpHeader {
    /// Source port
    pub source_port: u16,
    /// Destination port
    pub destination_port: u16,
}

impl UdpHeader {
    pub fn new(source_port: u16, destination_port: u16) -> Self {
        Self {
            source_port,
            destination_port,
        }
    }

    /// Serialize the header for a datagram carrying `payload_len` bytes
    ///
    /// Returns `None` if the length does not fit in 16 bits.
    pub fn to_bytes(&self, payload_len: usize) -> Option<[u8; HEADER_SIZE]> {
        let length = u16::try_from(HEADER_SIZE + payload_len).ok()?;

        let mut buffer = BytesMut::with_capacity(HEADER_SIZE);
        buffer.put_u16(self.source_port);
        buffer.put_u16(self.destination_port);
        buffer.put_u16(length);
        buffer.put_u16(0);

        let mut header = [0u8; HEADER_SIZE];
        header.copy_from_slice(&buffer);
        Some(header)
    }
}
