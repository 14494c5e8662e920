//! Synthetic frame construction for pktburst
//!
//! This crate turns a declarative [`FrameSpec`] into one immutable [`Frame`]
//! ready to be replayed by the burst transmitter. It supports:
//!
//! - **Ethernet II / 802.3** link headers (EtherType or length field)
//! - **IPv4** headers with header checksum
//! - **UDP** headers (checksum left as a zero placeholder)
//! - **Payload generation** from literal bytes or a repeated pattern
//! - **CRC-32** lookup table generation and Ethernet FCS calculation
//!
//! # Quick Start
//!
//! ```rust
//! use std::net::Ipv4Addr;
//! use pktburst_core::{EngineConfig, MacAddr};
//! use pktburst_packet::{FrameBuilder, FrameSpec, Payload};
//!
//! let spec = FrameSpec::broadcast(0x0800)
//!     .ipv4(Ipv4Addr::new(127, 0, 0, 1), Ipv4Addr::new(10, 0, 0, 0), 17)
//!     .udp(1234, 5678)
//!     .payload(Payload::text("This is a test IP packet!"));
//!
//! let frame = FrameBuilder::new(EngineConfig::default())
//!     .build(&spec, MacAddr([0x00, 0x11, 0x22, 0x33, 0x44, 0x55]))
//!     .unwrap();
//!
//! assert_eq!(frame.len(), 14 + 20 + 8 + 25);
//! ```

pub mod builder;
pub mod checksum;
pub mod crc32;
pub mod ethernet;
pub mod frame;
pub mod ip;
pub mod payload;
pub mod spec;
pub mod udp;

// Re-export commonly used types for convenience
pub use builder::FrameBuilder;
pub use checksum::internet_checksum;
pub use crc32::{crc32_lut, ethernet_fcs, render_lut_bits, CRC32_POLY};
pub use ethernet::{EtherType, LinkField};
pub use frame::Frame;
pub use payload::Payload;
pub use spec::{Destination, FrameSpec, NetworkHeader, TransportHeader};
