//! Network interface lookup and the raw datalink sink

use crate::{Error, MacAddr, RawSink, SinkError};
use pnet_datalink::{self, Channel, DataLinkSender, NetworkInterface};
use std::fmt;
use std::net::Ipv4Addr;
use tracing::debug;

/// Network interface
#[derive(Debug, Clone)]
pub struct Interface {
    /// Interface name (e.g., "eth0", "enxc8a362a81bc2")
    pub name: String,
    /// Interface index
    pub index: u32,
    /// MAC address
    pub mac_address: MacAddr,
    /// First IPv4 address, if any
    pub ipv4: Option<Ipv4Addr>,
    /// Is interface up?
    pub is_up: bool,
    /// Is interface a loopback?
    pub is_loopback: bool,
}

impl From<&NetworkInterface> for Interface {
    fn from(iface: &NetworkInterface) -> Self {
        let mac_address = iface
            .mac
            .map(|mac| MacAddr([mac.0, mac.1, mac.2, mac.3, mac.4, mac.5]))
            .unwrap_or(MacAddr::ZERO);

        let ipv4 = iface.ips.iter().find_map(|network| match network {
            ipnetwork::IpNetwork::V4(v4) => Some(v4.ip()),
            ipnetwork::IpNetwork::V6(_) => None,
        });

        Self {
            name: iface.name.clone(),
            index: iface.index,
            mac_address,
            ipv4,
            is_up: iface.is_up(),
            is_loopback: iface.is_loopback(),
        }
    }
}

impl Interface {
    /// Create a new interface description
    pub fn new(name: String, index: u32, mac_address: MacAddr) -> Self {
        Self {
            name,
            index,
            mac_address,
            ipv4: None,
            is_up: true,
            is_loopback: false,
        }
    }

    /// Get interface by name
    pub fn by_name(name: &str) -> Result<Self, Error> {
        find_raw(name).map(|iface| Self::from(&iface))
    }

    /// List all available interfaces
    pub fn list_all() -> Result<Vec<Self>, Error> {
        let interfaces = pnet_datalink::interfaces();

        if interfaces.is_empty() {
            return Err(Error::Interface(
                "No network interfaces found. Are you running with sufficient privileges?"
                    .to_string(),
            ));
        }

        Ok(interfaces.iter().map(Self::from).collect())
    }

    /// Open a raw Ethernet channel on this interface
    ///
    /// The returned sink keeps the channel open for its whole lifetime, so a
    /// burst pays the channel setup cost once.
    pub fn open_sink(&self) -> Result<InterfaceSink, Error> {
        let interface = find_raw(&self.name)?;

        let tx = match pnet_datalink::channel(&interface, Default::default()) {
            Ok(Channel::Ethernet(tx, _rx)) => tx,
            Ok(_) => return Err(Error::Interface("Unsupported channel type".to_string())),
            Err(e) => return Err(Error::Interface(format!("Failed to create channel: {}", e))),
        };

        debug!(interface = %self.name, mac = %self.mac_address, "Opened datalink channel");

        Ok(InterfaceSink {
            interface: self.clone(),
            tx,
        })
    }
}

impl fmt::Display for Interface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.mac_address)?;
        if let Some(ip) = self.ipv4 {
            write!(f, " {}", ip)?;
        }
        if !self.is_up {
            write!(f, " [down]")?;
        }
        Ok(())
    }
}

fn find_raw(name: &str) -> Result<NetworkInterface, Error> {
    pnet_datalink::interfaces()
        .into_iter()
        .find(|iface| iface.name == name)
        .ok_or_else(|| Error::InterfaceNotFound(name.to_string()))
}

/// [`RawSink`] backed by a `pnet_datalink` Ethernet channel
pub struct InterfaceSink {
    interface: Interface,
    tx: Box<dyn DataLinkSender>,
}

impl InterfaceSink {
    /// The interface this sink writes to
    pub fn interface(&self) -> &Interface {
        &self.interface
    }
}

impl RawSink for InterfaceSink {
    fn write(&mut self, frame: &[u8]) -> Result<(), SinkError> {
        self.tx
            .send_to(frame, None)
            .ok_or(SinkError::BufferUnavailable)?
            .map_err(SinkError::Io)
    }

    fn own_address(&self) -> MacAddr {
        self.interface.mac_address
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_nonexistent_interface() {
        let result = Interface::by_name("nonexistent_interface_xyz");
        match result {
            Err(Error::InterfaceNotFound(name)) => assert_eq!(name, "nonexistent_interface_xyz"),
            _ => panic!("Expected InterfaceNotFound error"),
        }
    }

    #[test]
    fn test_interface_display() {
        let mut iface = Interface::new(
            "test0".to_string(),
            1,
            MacAddr([0x00, 0x11, 0x22, 0x33, 0x44, 0x55]),
        );
        iface.ipv4 = Some(Ipv4Addr::new(10, 0, 0, 1));
        assert_eq!(iface.to_string(), "test0 (00:11:22:33:44:55) 10.0.0.1");

        iface.is_up = false;
        assert!(iface.to_string().ends_with("[down]"));
    }
}
