//! CLI argument parsing

use crate::profile::{parse_destination, parse_hex, parse_ipv4};
use clap::{Args, Parser, Subcommand};
use pktburst_core::{ip_protocols, EngineConfig, Error, Result};
use pktburst_packet::{FrameSpec, Payload};
use pktburst_transmit::RepeatCount;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "pktburst")]
#[command(version, about = "Synthetic frame generator and burst transmitter", long_about = None)]
pub struct Cli {
    /// Verbose output (-v, -vv, -vvv for increasing verbosity)
    #[arg(short = 'v', long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List available network interfaces
    Interfaces,

    /// Build frames and transmit them in a burst
    Send(SendArgs),

    /// Write the MSB-first CRC-32 lookup table as binary lines
    CrcTable {
        /// Output file (stdout if omitted)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
}

#[derive(Args, Debug, Clone)]
pub struct SendArgs {
    /// Network interface to transmit on
    #[arg(short = 'I', long, required_unless_present = "dry_run")]
    pub interface: Option<String>,

    /// Burst profile (TOML); replaces the frame flags below
    #[arg(short = 'P', long, value_name = "FILE")]
    pub profile: Option<PathBuf>,

    /// Destination MAC address
    #[arg(long, default_value = "ff:ff:ff:ff:ff:ff")]
    pub dst: String,

    /// Source MAC address (defaults to the interface address)
    #[arg(long)]
    pub src: Option<String>,

    /// EtherType (>= 0x0600) or 802.3 length, decimal or 0x-prefixed hex
    #[arg(short = 'e', long, default_value = "0x1234", value_parser = parse_u16)]
    pub ethertype: u16,

    /// Add an IPv4 header from this address
    #[arg(long, value_name = "ADDR", requires = "ip_dst")]
    pub ip_src: Option<String>,

    /// Add an IPv4 header to this address
    #[arg(long, value_name = "ADDR", requires = "ip_src")]
    pub ip_dst: Option<String>,

    /// IPv4 protocol number (defaults to UDP when --udp is set)
    #[arg(long)]
    pub ip_proto: Option<u8>,

    /// Add a UDP header with these ports
    #[arg(long, value_name = "SPORT:DPORT", value_parser = parse_ports)]
    pub udp: Option<(u16, u16)>,

    /// Literal payload text
    #[arg(long, conflicts_with_all = ["hex", "pattern"])]
    pub text: Option<String>,

    /// Literal payload as hex bytes
    #[arg(long, conflicts_with = "pattern")]
    pub hex: Option<String>,

    /// Payload pattern repeated whole up to --length bytes
    #[arg(long, requires = "length")]
    pub pattern: Option<String>,

    /// Target payload length for --pattern
    #[arg(long)]
    pub length: Option<usize>,

    /// Number of passes
    #[arg(short = 'c', long, conflicts_with = "forever")]
    pub count: Option<u64>,

    /// Repeat until interrupted
    #[arg(short = 'l', long = "loop")]
    pub forever: bool,

    /// Pre-serialize a pass into one contiguous buffer
    #[arg(long)]
    pub cache: bool,

    /// Cancel the burst after this many seconds
    #[arg(short = 'd', long, value_name = "SECONDS")]
    pub duration: Option<f64>,

    /// Transmit into memory instead of an interface
    #[arg(long)]
    pub dry_run: bool,

    /// Maximum frame size in bytes
    #[arg(long)]
    pub max_frame_size: Option<usize>,
}

impl Cli {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Tracing level selected by the `-v` count
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

impl SendArgs {
    /// Frame description assembled from the command-line flags
    pub fn frame_spec(&self) -> Result<FrameSpec> {
        let mut spec = FrameSpec::new(parse_destination(&self.dst)?, self.ethertype);

        if let Some(src) = &self.src {
            spec = spec.source(src.parse()?);
        }

        if let (Some(ip_src), Some(ip_dst)) = (&self.ip_src, &self.ip_dst) {
            let protocol = self
                .ip_proto
                .unwrap_or(if self.udp.is_some() { ip_protocols::UDP } else { 0 });
            spec = spec.ipv4(parse_ipv4(ip_src)?, parse_ipv4(ip_dst)?, protocol);
        }

        if let Some((sport, dport)) = self.udp {
            spec = spec.udp(sport, dport);
        }

        let payload = if let Some(text) = &self.text {
            Payload::text(text)
        } else if let Some(hex) = &self.hex {
            Payload::literal(parse_hex(hex)?)
        } else if let Some(pattern) = &self.pattern {
            let length = self
                .length
                .ok_or_else(|| Error::construction("--pattern requires --length"))?;
            Payload::pattern(pattern.clone().into_bytes(), length)
        } else {
            Payload::default()
        };

        Ok(spec.payload(payload))
    }

    /// Repeat count from `--count` / `--loop`, one pass by default
    pub fn repeat(&self) -> Option<RepeatCount> {
        if self.forever {
            Some(RepeatCount::Unbounded)
        } else {
            self.count.map(RepeatCount::Times)
        }
    }

    /// Apply command-line overrides to a base configuration
    ///
    /// Only `--loop` enables unbounded transmission; otherwise the base
    /// configuration decides.
    pub fn apply_config(&self, mut config: EngineConfig) -> EngineConfig {
        if let Some(size) = self.max_frame_size {
            config = config.with_max_frame_size(size);
        }
        if self.forever {
            config = config.with_unbounded(true);
        }
        config
    }
}

/// Parse a `u16` in decimal or `0x` hex
pub fn parse_u16(s: &str) -> std::result::Result<u16, String> {
    let s = s.trim();
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u16::from_str_radix(hex, 16),
        None => s.parse::<u16>(),
    };
    parsed.map_err(|e| format!("invalid value '{}': {}", s, e))
}

/// Parse `SPORT:DPORT`
pub fn parse_ports(s: &str) -> std::result::Result<(u16, u16), String> {
    let (src, dst) = s
        .split_once(':')
        .ok_or_else(|| format!("expected SPORT:DPORT, got '{}'", s))?;
    let src = src
        .trim()
        .parse()
        .map_err(|e| format!("invalid source port '{}': {}", src, e))?;
    let dst = dst
        .trim()
        .parse()
        .map_err(|e| format!("invalid destination port '{}': {}", dst, e))?;
    Ok((src, dst))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_u16() {
        assert_eq!(parse_u16("0x1234"), Ok(0x1234));
        assert_eq!(parse_u16("0X0800"), Ok(0x0800));
        assert_eq!(parse_u16("46"), Ok(46));
        assert!(parse_u16("0x10000").is_err());
        assert!(parse_u16("ipv4").is_err());
    }

    #[test]
    fn test_parse_ports() {
        assert_eq!(parse_ports("1234:5678"), Ok((1234, 5678)));
        assert!(parse_ports("1234").is_err());
        assert!(parse_ports("1234:99999").is_err());
    }

    #[test]
    fn test_send_flags() {
        let cli = Cli::try_parse_from([
            "pktburst", "-vv", "send", "-I", "eth0", "--ip-src", "127.0.0.1", "--ip-dst",
            "10.0.0.0", "--udp", "1234:5678", "--pattern", "abc", "--length", "1492", "-c",
            "10000", "--cache",
        ])
        .unwrap();

        assert_eq!(cli.log_level(), "debug");
        let Commands::Send(args) = cli.command else {
            panic!("expected send");
        };
        assert_eq!(args.interface.as_deref(), Some("eth0"));
        assert_eq!(args.ethertype, 0x1234);
        assert_eq!(args.udp, Some((1234, 5678)));
        assert_eq!(args.length, Some(1492));
        assert_eq!(args.count, Some(10000));
        assert!(args.cache);
        assert!(!args.forever);
    }

    #[test]
    fn test_frame_spec_from_flags() {
        let cli = Cli::try_parse_from([
            "pktburst", "send", "--dry-run", "-e", "0x0800", "--ip-src", "127.0.0.1",
            "--ip-dst", "10.0.0.0", "--udp", "1234:5678", "--text", "hi", "--loop",
        ])
        .unwrap();
        let Commands::Send(args) = cli.command else {
            panic!("expected send");
        };

        let spec = args.frame_spec().unwrap();
        assert_eq!(
            spec,
            FrameSpec::ipv4_udp(
                pktburst_packet::Destination::Broadcast,
                "127.0.0.1".parse().unwrap(),
                "10.0.0.0".parse().unwrap(),
                1234,
                5678,
            )
            .payload(Payload::text("hi"))
        );

        let repeat = args.repeat().unwrap();
        assert_eq!(repeat, RepeatCount::Unbounded);
        assert!(args.apply_config(EngineConfig::default()).allow_unbounded);
    }

    #[test]
    fn test_frame_spec_rejects_bad_mac() {
        let cli = Cli::try_parse_from(["pktburst", "send", "--dry-run", "--dst", "ff:ff"]).unwrap();
        let Commands::Send(args) = cli.command else {
            panic!("expected send");
        };
        assert!(matches!(args.frame_spec(), Err(Error::Construction(_))));
        assert_eq!(args.repeat(), None);
    }

    #[test]
    fn test_count_conflicts_with_loop() {
        let result =
            Cli::try_parse_from(["pktburst", "send", "-I", "eth0", "--count", "3", "--loop"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_interface_required_unless_dry_run() {
        assert!(Cli::try_parse_from(["pktburst", "send"]).is_err());
        assert!(Cli::try_parse_from(["pktburst", "send", "--dry-run"]).is_ok());
    }

    #[test]
    fn test_crc_table_output() {
        let cli = Cli::try_parse_from(["pktburst", "crc-table", "-o", "lut.txt"]).unwrap();
        match cli.command {
            Commands::CrcTable { output } => {
                assert_eq!(output, Some(PathBuf::from("lut.txt")))
            }
            other => panic!("unexpected command {:?}", other),
        }
    }
}
