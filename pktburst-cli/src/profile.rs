//! Burst profiles
//!
//! A profile is a TOML file describing the frames of a burst, how often to
//! repeat them and the engine limits to apply:
//!
//! ```toml
//! [[frames]]
//! destination = "broadcast"
//! ethertype = 0x0800
//!
//! [frames.ipv4]
//! source = "127.0.0.1"
//! destination = "10.0.0.0"
//!
//! [frames.udp]
//! source_port = 1234
//! destination_port = 5678
//!
//! [frames.payload]
//! pattern = "This is a test message for sending packets."
//! target_length = 1492
//!
//! [plan]
//! repeat = 10000      # or "unbounded"
//! cache = true
//!
//! [engine]
//! max_frame_size = 1514
//! ```

use pktburst_core::{ip_protocols, EngineConfig, Error, MacAddr, Result};
use pktburst_packet::{Destination, FrameSpec, Payload};
use pktburst_transmit::RepeatCount;
use serde::Deserialize;
use std::net::Ipv4Addr;
use std::path::Path;

/// IPv4 protocol number used when no transport header is present
const NO_TRANSPORT_PROTOCOL: u8 = 0;

/// Top-level profile loaded from a TOML file
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct BurstProfile {
    pub frames: Vec<FrameProfile>,
    #[serde(default)]
    pub plan: PlanProfile,
    #[serde(default)]
    pub engine: EngineProfile,
}

/// One frame of the burst
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FrameProfile {
    /// MAC address or `"broadcast"`
    #[serde(default = "default_destination")]
    pub destination: String,
    /// MAC address; the sink's own address when omitted
    #[serde(default)]
    pub source: Option<String>,
    /// EtherType or 802.3 length
    pub ethertype: u16,
    #[serde(default)]
    pub ipv4: Option<Ipv4Profile>,
    #[serde(default)]
    pub udp: Option<UdpProfile>,
    #[serde(default)]
    pub payload: PayloadProfile,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Ipv4Profile {
    pub source: String,
    pub destination: String,
    /// Defaults to UDP when a UDP header follows
    #[serde(default)]
    pub protocol: Option<u8>,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct UdpProfile {
    pub source_port: u16,
    pub destination_port: u16,
}

/// Exactly one of `text`, `hex` or `pattern` (+ `target_length`)
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct PayloadProfile {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub hex: Option<String>,
    #[serde(default)]
    pub pattern: Option<String>,
    #[serde(default)]
    pub target_length: Option<usize>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct PlanProfile {
    #[serde(default)]
    pub repeat: Option<RepeatValue>,
    #[serde(default)]
    pub cache: bool,
}

/// `repeat = 10` or `repeat = "unbounded"`
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum RepeatValue {
    Count(u64),
    Word(String),
}

#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct EngineProfile {
    #[serde(default)]
    pub max_frame_size: Option<usize>,
    #[serde(default)]
    pub allow_unbounded: Option<bool>,
}

fn default_destination() -> String {
    "broadcast".to_string()
}

impl BurstProfile {
    /// Load a profile from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::profile(format!("profile not found: {}", path.display()))
            } else {
                Error::Io(e)
            }
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse a profile from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let profile: Self =
            toml::from_str(content).map_err(|e| Error::profile(format!("invalid TOML: {}", e)))?;
        if profile.frames.is_empty() {
            return Err(Error::profile("profile declares no frames"));
        }
        Ok(profile)
    }

    /// Frame descriptions in transmission order
    pub fn frame_specs(&self) -> Result<Vec<FrameSpec>> {
        self.frames.iter().map(FrameProfile::to_spec).collect()
    }

    /// Repeat count, one pass when omitted
    pub fn repeat(&self) -> Result<RepeatCount> {
        match &self.plan.repeat {
            None => Ok(RepeatCount::default()),
            Some(RepeatValue::Count(n)) => Ok(RepeatCount::Times(*n)),
            Some(RepeatValue::Word(word)) => word.parse(),
        }
    }

    /// Engine configuration; unbounded profiles are allowed to loop unless
    /// they opt out explicitly
    pub fn engine_config(&self) -> Result<EngineConfig> {
        let mut config = EngineConfig::default();
        if let Some(size) = self.engine.max_frame_size {
            config = config.with_max_frame_size(size);
        }
        let allow = self
            .engine
            .allow_unbounded
            .unwrap_or(self.repeat()?.is_unbounded());
        config = config.with_unbounded(allow);
        config.validate()?;
        Ok(config)
    }
}

impl FrameProfile {
    pub fn to_spec(&self) -> Result<FrameSpec> {
        let mut spec = FrameSpec::new(parse_destination(&self.destination)?, self.ethertype);

        if let Some(source) = &self.source {
            spec = spec.source(source.parse()?);
        }

        if let Some(ipv4) = &self.ipv4 {
            let protocol = ipv4.protocol.unwrap_or(if self.udp.is_some() {
                ip_protocols::UDP
            } else {
                NO_TRANSPORT_PROTOCOL
            });
            spec = spec.ipv4(
                parse_ipv4(&ipv4.source)?,
                parse_ipv4(&ipv4.destination)?,
                protocol,
            );
        }

        if let Some(udp) = self.udp {
            spec = spec.udp(udp.source_port, udp.destination_port);
        }

        Ok(spec.payload(self.payload.to_payload()?))
    }
}

impl PayloadProfile {
    pub fn to_payload(&self) -> Result<Payload> {
        match (&self.text, &self.hex, &self.pattern) {
            (None, None, None) => {
                if self.target_length.is_some() {
                    return Err(Error::profile("target_length requires a pattern"));
                }
                Ok(Payload::default())
            }
            (Some(text), None, None) => Ok(Payload::text(text)),
            (None, Some(hex), None) => Ok(Payload::literal(parse_hex(hex)?)),
            (None, None, Some(pattern)) => {
                let target_length = self
                    .target_length
                    .ok_or_else(|| Error::profile("pattern payload requires target_length"))?;
                Ok(Payload::pattern(pattern.clone().into_bytes(), target_length))
            }
            _ => Err(Error::profile(
                "payload must set only one of text, hex or pattern",
            )),
        }
    }
}

/// Parse a destination MAC address, accepting `"broadcast"` as the sentinel
pub fn parse_destination(s: &str) -> Result<Destination> {
    if s.trim().eq_ignore_ascii_case("broadcast") {
        return Ok(Destination::Broadcast);
    }
    s.parse::<MacAddr>().map(Destination::Address)
}

/// Parse a dotted-quad IPv4 address
pub fn parse_ipv4(s: &str) -> Result<Ipv4Addr> {
    s.trim()
        .parse()
        .map_err(|_| Error::construction(format!("invalid IPv4 address '{}'", s)))
}

/// Parse hex bytes, ignoring whitespace, `:` separators and a `0x` prefix
pub fn parse_hex(s: &str) -> Result<Vec<u8>> {
    let trimmed = s.trim();
    let body = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    let digits: Vec<u8> = body
        .bytes()
        .filter(|b| !b.is_ascii_whitespace() && *b != b':')
        .collect();

    if digits.len() % 2 != 0 {
        return Err(Error::construction(format!(
            "hex payload has an odd number of digits: '{}'",
            s
        )));
    }

    digits
        .chunks(2)
        .map(|pair| {
            std::str::from_utf8(pair)
                .ok()
                .and_then(|text| u8::from_str_radix(text, 16).ok())
                .ok_or_else(|| Error::construction(format!("invalid hex payload '{}'", s)))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pktburst_packet::{NetworkHeader, TransportHeader};
    use std::io::Write;

    const SCRIPT_PROFILE: &str = r#"
[[frames]]
ethertype = 0x0800

[frames.ipv4]
source = "127.0.0.1"
destination = "10.0.0.0"

[frames.udp]
source_port = 1234
destination_port = 5678

[frames.payload]
pattern = "This is a test message for sending packets."
target_length = 1492

[plan]
repeat = 10000
cache = true
"#;

    #[test]
    fn test_parse_udp_profile() {
        let profile = BurstProfile::from_toml_str(SCRIPT_PROFILE).unwrap();
        let specs = profile.frame_specs().unwrap();

        assert_eq!(specs.len(), 1);
        let spec = &specs[0];
        assert_eq!(spec.destination, Destination::Broadcast);
        assert_eq!(spec.source, None);
        assert_eq!(spec.ethertype_or_length, 0x0800);
        assert_eq!(
            spec.network,
            NetworkHeader::Ipv4 {
                source: Ipv4Addr::new(127, 0, 0, 1),
                destination: Ipv4Addr::new(10, 0, 0, 0),
                protocol: ip_protocols::UDP,
            }
        );
        assert_eq!(
            spec.transport,
            TransportHeader::Udp {
                source_port: 1234,
                destination_port: 5678,
            }
        );
        assert_eq!(spec.payload.resolved_len(), 1462);

        assert_eq!(profile.repeat().unwrap(), RepeatCount::Times(10000));
        assert!(profile.plan.cache);
        let config = profile.engine_config().unwrap();
        assert_eq!(config.max_frame_size, 1514);
        assert!(!config.allow_unbounded);
    }

    #[test]
    fn test_unbounded_profile_allows_looping() {
        let profile = BurstProfile::from_toml_str(
            r#"
[[frames]]
destination = "00:11:22:33:44:55"
source = "02-00-00-00-00-01"
ethertype = 0x1234
payload = { text = "hello" }

[plan]
repeat = "unbounded"
"#,
        )
        .unwrap();

        assert_eq!(profile.repeat().unwrap(), RepeatCount::Unbounded);
        assert!(profile.engine_config().unwrap().allow_unbounded);

        let spec = &profile.frame_specs().unwrap()[0];
        assert_eq!(
            spec.destination,
            Destination::Address(MacAddr([0x00, 0x11, 0x22, 0x33, 0x44, 0x55]))
        );
        assert_eq!(spec.source, Some(MacAddr([0x02, 0, 0, 0, 0, 1])));
        assert_eq!(spec.payload, Payload::text("hello"));
    }

    #[test]
    fn test_multiple_frames_keep_order() {
        let profile = BurstProfile::from_toml_str(
            r#"
[[frames]]
ethertype = 0x1234
payload = { hex = "de ad be ef" }

[[frames]]
ethertype = 46
payload = { text = "second" }

[engine]
max_frame_size = 128
"#,
        )
        .unwrap();

        let specs = profile.frame_specs().unwrap();
        assert_eq!(specs.len(), 2);
        assert_eq!(specs[0].payload, Payload::literal(vec![0xde, 0xad, 0xbe, 0xef]));
        assert_eq!(specs[1].ethertype_or_length, 46);
        assert_eq!(profile.repeat().unwrap(), RepeatCount::Times(1));
        assert_eq!(profile.engine_config().unwrap().max_frame_size, 128);
    }

    #[test]
    fn test_malformed_address_is_construction_error() {
        let profile = BurstProfile::from_toml_str(
            r#"
[[frames]]
destination = "00:11:22:33:44"
ethertype = 0x1234
"#,
        )
        .unwrap();
        assert!(matches!(
            profile.frame_specs(),
            Err(Error::Construction(_))
        ));

        let profile = BurstProfile::from_toml_str(
            r#"
[[frames]]
ethertype = 0x0800
ipv4 = { source = "127.0.0.256", destination = "10.0.0.0" }
"#,
        )
        .unwrap();
        assert!(matches!(
            profile.frame_specs(),
            Err(Error::Construction(_))
        ));
    }

    #[test]
    fn test_invalid_profiles() {
        assert!(matches!(
            BurstProfile::from_toml_str("frames = []"),
            Err(Error::Profile(_))
        ));
        assert!(matches!(
            BurstProfile::from_toml_str("[[frames]]\nethertype = 0x1234\ncolour = \"red\""),
            Err(Error::Profile(_))
        ));

        let both = PayloadProfile {
            text: Some("a".into()),
            hex: Some("00".into()),
            ..Default::default()
        };
        assert!(matches!(both.to_payload(), Err(Error::Profile(_))));

        let no_length = PayloadProfile {
            pattern: Some("ab".into()),
            ..Default::default()
        };
        assert!(matches!(no_length.to_payload(), Err(Error::Profile(_))));

        let profile = BurstProfile::from_toml_str(
            "[[frames]]\nethertype = 0x1234\n[plan]\nrepeat = \"often\"",
        )
        .unwrap();
        assert!(profile.repeat().is_err());
    }

    #[test]
    fn test_parse_hex() {
        assert_eq!(parse_hex("0x0102ff").unwrap(), vec![1, 2, 0xff]);
        assert_eq!(parse_hex("de:ad be:EF").unwrap(), vec![0xde, 0xad, 0xbe, 0xef]);
        assert!(parse_hex("").unwrap().is_empty());
        assert!(parse_hex("abc").is_err());
        assert!(parse_hex("zz").is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SCRIPT_PROFILE.as_bytes()).unwrap();

        let profile = BurstProfile::load(file.path()).unwrap();
        assert_eq!(profile.frames.len(), 1);

        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.toml");
        assert!(matches!(
            BurstProfile::load(&missing),
            Err(Error::Profile(_))
        ));
    }
}
