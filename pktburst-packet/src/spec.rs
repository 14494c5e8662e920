//! Declarative frame descriptions

use crate::payload::Payload;
use pktburst_core::{ethertypes, MacAddr};
use std::net::Ipv4Addr;

/// Destination link address of a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    /// A specific station address
    Address(MacAddr),
    /// ff:ff:ff:ff:ff:ff
    Broadcast,
}

impl Destination {
    /// Address written on the wire
    pub fn resolve(self) -> MacAddr {
        match self {
            Destination::Address(mac) => mac,
            Destination::Broadcast => MacAddr::BROADCAST,
        }
    }
}

impl From<MacAddr> for Destination {
    fn from(mac: MacAddr) -> Self {
        Destination::Address(mac)
    }
}

/// Optional network layer header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NetworkHeader {
    #[default]
    None,
    Ipv4 {
        source: Ipv4Addr,
        destination: Ipv4Addr,
        protocol: u8,
    },
}

/// Optional transport layer header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransportHeader {
    #[default]
    None,
    Udp {
        source_port: u16,
        destination_port: u16,
    },
}

/// Semantic description of one frame to build
///
/// # Examples
///
/// ```
/// use pktburst_packet::{FrameSpec, Payload};
///
/// // Broadcast frame with a private EtherType and an MTU-sized text payload
/// let spec = FrameSpec::broadcast(0x1234)
///     .payload(Payload::pattern(&b"This is a testing packet"[..], 1492));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameSpec {
    /// Destination address
    pub destination: Destination,
    /// Source address; the sink's own address when `None`
    pub source: Option<MacAddr>,
    /// EtherType (>= 1536) or 802.3 length (< 1536)
    pub ethertype_or_length: u16,
    /// Network header
    pub network: NetworkHeader,
    /// Transport header (requires a network header)
    pub transport: TransportHeader,
    /// Payload
    pub payload: Payload,
}

impl FrameSpec {
    /// New spec with no upper headers and an empty payload
    pub fn new(destination: impl Into<Destination>, ethertype_or_length: u16) -> Self {
        Self {
            destination: destination.into(),
            source: None,
            ethertype_or_length,
            network: NetworkHeader::None,
            transport: TransportHeader::None,
            payload: Payload::default(),
        }
    }

    /// New broadcast spec
    pub fn broadcast(ethertype_or_length: u16) -> Self {
        Self::new(Destination::Broadcast, ethertype_or_length)
    }

    /// Override the source address
    pub fn source(mut self, source: MacAddr) -> Self {
        self.source = Some(source);
        self
    }

    /// Add an IPv4 header
    pub fn ipv4(mut self, source: Ipv4Addr, destination: Ipv4Addr, protocol: u8) -> Self {
        self.network = NetworkHeader::Ipv4 {
            source,
            destination,
            protocol,
        };
        self
    }

    /// Add a UDP header
    pub fn udp(mut self, source_port: u16, destination_port: u16) -> Self {
        self.transport = TransportHeader::Udp {
            source_port,
            destination_port,
        };
        self
    }

    /// Set the payload
    pub fn payload(mut self, payload: Payload) -> Self {
        self.payload = payload;
        self
    }

    /// Ethernet II + IPv4 + UDP in one call
    pub fn ipv4_udp(
        destination: impl Into<Destination>,
        source_ip: Ipv4Addr,
        destination_ip: Ipv4Addr,
        source_port: u16,
        destination_port: u16,
    ) -> Self {
        Self::new(destination, ethertypes::IPV4)
            .ipv4(source_ip, destination_ip, pktburst_core::ip_protocols::UDP)
            .udp(source_port, destination_port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_broadcast_resolves() {
        assert_eq!(Destination::Broadcast.resolve(), MacAddr::BROADCAST);
        let mac = MacAddr([0x00, 0x11, 0x22, 0x33, 0x44, 0x55]);
        assert_eq!(Destination::from(mac).resolve(), mac);
    }

    #[test]
    fn test_ipv4_udp_shortcut() {
        let spec = FrameSpec::ipv4_udp(
            Destination::Broadcast,
            Ipv4Addr::new(127, 0, 0, 1),
            Ipv4Addr::new(10, 0, 0, 0),
            1234,
            5678,
        );
        assert_eq!(spec.ethertype_or_length, 0x0800);
        assert_eq!(
            spec.network,
            NetworkHeader::Ipv4 {
                source: Ipv4Addr::new(127, 0, 0, 1),
                destination: Ipv4Addr::new(10, 0, 0, 0),
                protocol: 17,
            }
        );
        assert_eq!(
            spec.transport,
            TransportHeader::Udp {
                source_port: 1234,
                destination_port: 5678,
            }
        );
        assert!(spec.source.is_none());
    }
}
