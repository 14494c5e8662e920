//! Frame builder
//!
//! Turns a [`FrameSpec`] into a [`Frame`]. The build is stateless: every
//! length field is computed from the `FrameSpec` at build time and nothing is
//! recomputed afterwards.

use crate::ethernet::{self, LinkField};
use crate::frame::Frame;
use crate::ip::{self, Ipv4Header};
use crate::spec::{FrameSpec, NetworkHeader, TransportHeader};
use crate::udp::{self, UdpHeader};
use bytes::{BufMut, BytesMut};
use pktburst_core::{ip_protocols, EngineConfig, Error, MacAddr, RawSink, Result};
use tracing::debug;

/// Builds immutable frames from declarative specs
///
/// # Examples
///
/// ```
/// use pktburst_core::{EngineConfig, MacAddr};
/// use pktburst_packet::{FrameBuilder, FrameSpec, Payload};
///
/// let builder = FrameBuilder::new(EngineConfig::default());
/// let spec = FrameSpec::broadcast(0x1234).payload(Payload::pattern(&b"AB"[..], 5));
/// let frame = builder.build(&spec, MacAddr::ZERO).unwrap();
///
/// // "AB" repeated 5 / 2 = 2 times: the payload is 4 bytes, not 5
/// assert_eq!(&frame[14..], b"ABAB");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameBuilder {
    config: EngineConfig,
}

impl FrameBuilder {
    /// Create a builder enforcing `config.max_frame_size`
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// The configuration in use
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Build a frame whose source defaults to the address of `sink`
    pub fn build_for(&self, spec: &FrameSpec, sink: &dyn RawSink) -> Result<Frame> {
        self.build(spec, sink.own_address())
    }

    /// Build a frame
    ///
    /// `sink_address` is used as the source address when the `FrameSpec` does not
    /// name one.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Construction`] if the header combination is invalid
    /// (transport without network header, IPv4 inside an 802.3 length frame,
    /// an IPv4 protocol number that contradicts the transport header, an
    /// undefined type/length value, an empty payload pattern) or if the frame
    /// would exceed the configured maximum size.
    pub fn build(&self, spec: &FrameSpec, sink_address: MacAddr) -> Result<Frame> {
        self.config.validate()?;
        Self::check_layers(spec)?;

        let network_len = match spec.network {
            NetworkHeader::None => 0,
            NetworkHeader::Ipv4 { .. } => ip::HEADER_SIZE,
        };
        let transport_len = match spec.transport {
            TransportHeader::None => 0,
            TransportHeader::Udp { .. } => udp::HEADER_SIZE,
        };
        // Size is checked before the payload is materialized
        let total = (ethernet::HEADER_SIZE + network_len + transport_len)
            .checked_add(spec.payload.resolved_len())
            .filter(|total| *total <= self.config.max_frame_size)
            .ok_or_else(|| {
                Error::construction(format!(
                    "frame with a {}-byte payload exceeds maximum frame size {}",
                    spec.payload.resolved_len(),
                    self.config.max_frame_size
                ))
            })?;

        let payload = spec.payload.resolve()?;

        let mut buffer = BytesMut::with_capacity(total);

        ethernet::write_header(
            &mut buffer,
            spec.destination.resolve(),
            spec.source.unwrap_or(sink_address),
            spec.ethertype_or_length,
        );

        if let NetworkHeader::Ipv4 {
            source,
            destination,
            protocol,
        } = spec.network
        {
            let header = Ipv4Header::new(source, destination, protocol)
                .to_bytes(transport_len + payload.len())
                .ok_or_else(|| Error::construction("IPv4 total length exceeds 65535"))?;
            buffer.put_slice(&header);
        }

        if let TransportHeader::Udp {
            source_port,
            destination_port,
        } = spec.transport
        {
            let header = UdpHeader::new(source_port, destination_port)
                .to_bytes(payload.len())
                .ok_or_else(|| Error::construction("UDP length exceeds 65535"))?;
            buffer.put_slice(&header);
        }

        buffer.put_slice(&payload);

        debug!(
            len = buffer.len(),
            ethertype_or_length = spec.ethertype_or_length,
            payload_len = payload.len(),
            "Built frame"
        );

        Ok(Frame::new(buffer.freeze()))
    }

    fn check_layers(spec: &FrameSpec) -> Result<()> {
        let link = LinkField::classify(spec.ethertype_or_length);
        if let LinkField::Undefined(value) = link {
            return Err(Error::construction(format!(
                "type/length value {} is neither an 802.3 length nor an EtherType",
                value
            )));
        }

        match (spec.network, spec.transport) {
            (NetworkHeader::None, TransportHeader::Udp { .. }) => {
                return Err(Error::construction(
                    "transport header requires a network header",
                ));
            }
            (NetworkHeader::Ipv4 { .. }, _) if !link.is_ethertype() => {
                return Err(Error::construction(format!(
                    "IPv4 header cannot follow an 802.3 length field ({})",
                    spec.ethertype_or_length
                )));
            }
            (NetworkHeader::Ipv4 { protocol, .. }, TransportHeader::Udp { .. })
                if protocol != ip_protocols::UDP =>
            {
                return Err(Error::construction(format!(
                    "IPv4 protocol {} does not match UDP transport header",
                    protocol
                )));
            }
            _ => {}
        }

        Ok(())
    }
}
