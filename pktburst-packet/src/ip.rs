//! IPv4 header construction
//!
//! Only the fixed 20-byte header is produced (IHL 5, no options). Lengths are
//! computed from what follows at build time; the header checksum is filled in.

use crate::checksum::internet_checksum;
use bytes::{BufMut, BytesMut};
use std::net::Ipv4Addr;

/// IPv4 header size in bytes (no options)
pub const HEADER_SIZE: usize = 20;

/// Default Time to Live
pub const DEFAULT_TTL: u8 = 64;

/// Identification value stamped on every header
pub const DEFAULT_IDENTIFICATION: u16 = 1;

/// Fixed-layout IPv4 header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ipv4Header {
    /// Source IP address
    pub source: Ipv4Addr,
    /// Destination IP address
    pub destination: Ipv4Addr,
    /// Protocol of the encapsulated data
    pub protocol: u8,
    /// Time to Live
    pub ttl: u8,
    /// Identification
    pub identification: u16,
}

impl Ipv4Header {
    pub fn new(source: Ipv4Addr, destination: Ipv4Addr, protocol: u8) -> Self {
        Self {
            source,
            destination,
            protocol,
            ttl: DEFAULT_TTL,
            identification: DEFAULT_IDENTIFICATION,
        }
    }

    /// Serialize the header for a datagram carrying `following` bytes
    ///
    /// Returns `None` if the total length does not fit in 16 bits.
    pub fn to_bytes(&self, following: usize) -> Option<[u8; HEADER_SIZE]> {
        let total_length = u16::try_from(HEADER_SIZE + following).ok()?;

        let mut buffer = BytesMut::with_capacity(HEADER_SIZE);
        // Version 4, IHL 5
        buffer.put_u8(0x45);
        // Type of Service
        buffer.put_u8(0);
        buffer.put_u16(total_length);
        buffer.put_u16(self.identification);
        // Flags + fragment offset
        buffer.put_u16(0);
        buffer.put_u8(self.ttl);
        buffer.put_u8(self.protocol);
        // Checksum placeholder, patched below
        buffer.put_u16(0);
        buffer.put_slice(&self.source.octets());
        buffer.put_slice(&self.destination.octets());

        let checksum = internet_checksum(&buffer);
        buffer[10..12].copy_from_slice(&checksum.to_be_bytes());

        let mut header = [0u8; HEADER_SIZE];
        header.copy_from_slice(&buffer);
        Some(header)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_layout() {
        let header = Ipv4Header::new(Ipv4Addr::new(127, 0, 0, 1), Ipv4Addr::new(10, 0, 0, 0), 17);
        let bytes = header.to_bytes(33).unwrap();

        assert_eq!(bytes[0], 0x45);
        assert_eq!(u16::from_be_bytes([bytes[2], bytes[3]]), 53);
        assert_eq!(u16::from_be_bytes([bytes[4], bytes[5]]), DEFAULT_IDENTIFICATION);
        assert_eq!(bytes[8], DEFAULT_TTL);
        assert_eq!(bytes[9], 17);
        assert_eq!(&bytes[12..16], &[127, 0, 0, 1]);
        assert_eq!(&bytes[16..20], &[10, 0, 0, 0]);
    }

    #[test]
    fn test_header_checksum_valid() {
        let header = Ipv4Header::new(
            Ipv4Addr::new(192, 168, 1, 1),
            Ipv4Addr::new(192, 168, 1, 2),
            17,
        );
        let bytes = header.to_bytes(100).unwrap();
        assert_ne!(u16::from_be_bytes([bytes[10], bytes[11]]), 0);
        assert_eq!(internet_checksum(&bytes), 0);
    }

    #[test]
    fn test_total_length_overflow() {
        let header = Ipv4Header::new(Ipv4Addr::LOCALHOST, Ipv4Addr::LOCALHOST, 17);
        assert!(header.to_bytes(65515).is_some());
        assert!(header.to_bytes(65516).is_none());
    }
}
