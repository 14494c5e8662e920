//! Ethernet link header construction
//!
//! The 16-bit field after the source address is either an EtherType
//! (Ethernet II, values >= 1536) or an 802.3 length (values <= 1500).
//! Values in between are undefined and rejected by the builder.

use bytes::{BufMut, BytesMut};
use pktburst_core::ethertypes::{MAX_802_3_LENGTH, MIN_ETHERTYPE};
use pktburst_core::MacAddr;
use std::fmt;

/// Ethernet header size (dst + src + type/length)
pub const HEADER_SIZE: usize = 14;

/// Common EtherType values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EtherType {
    /// IPv4 (0x0800)
    IPv4,
    /// ARP (0x0806)
    ARP,
    /// VLAN-tagged frame (0x8100)
    VLAN,
    /// IPv6 (0x86DD)
    IPv6,
    /// Any other EtherType
    Custom(u16),
}

impl EtherType {
    /// Convert EtherType to u16 value
    pub fn to_u16(self) -> u16 {
        match self {
            EtherType::IPv4 => 0x0800,
            EtherType::ARP => 0x0806,
            EtherType::VLAN => 0x8100,
            EtherType::IPv6 => 0x86DD,
            EtherType::Custom(val) => val,
        }
    }

    /// Create EtherType from u16 value
    pub fn from_u16(value: u16) -> Self {
        match value {
            0x0800 => EtherType::IPv4,
            0x0806 => EtherType::ARP,
            0x8100 => EtherType::VLAN,
            0x86DD => EtherType::IPv6,
            val => EtherType::Custom(val),
        }
    }
}

impl fmt::Display for EtherType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EtherType::IPv4 => write!(f, "IPv4"),
            EtherType::ARP => write!(f, "ARP"),
            EtherType::VLAN => write!(f, "VLAN"),
            EtherType::IPv6 => write!(f, "IPv6"),
            EtherType::Custom(val) => write!(f, "0x{:04X}", val),
        }
    }
}

/// Interpretation of the type/length field of a link header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkField {
    /// Ethernet II: the field names the upper protocol
    EtherType(EtherType),
    /// IEEE 802.3: the field is a payload length
    Length(u16),
    /// 1501..=1535, neither a valid length nor an EtherType
    Undefined(u16),
}

impl LinkField {
    /// Classify a raw type/length value
    pub fn classify(value: u16) -> Self {
        if value >= MIN_ETHERTYPE {
            LinkField::EtherType(EtherType::from_u16(value))
        } else if value <= MAX_802_3_LENGTH {
            LinkField::Length(value)
        } else {
            LinkField::Undefined(value)
        }
    }

    /// The raw 16-bit value written on the wire
    pub fn to_u16(self) -> u16 {
        match self {
            LinkField::EtherType(ethertype) => ethertype.to_u16(),
            LinkField::Length(len) | LinkField::Undefined(len) => len,
        }
    }

    /// True for Ethernet II framing
    pub fn is_ethertype(self) -> bool {
        matches!(self, LinkField::EtherType(_))
    }
}

/// Append a link header to `buffer`
pub fn write_header(buffer: &mut BytesMut, destination: MacAddr, source: MacAddr, field: u16) {
    buffer.put_slice(destination.as_bytes());
    buffer.put_slice(source.as_bytes());
    buffer.put_u16(field);
}
