//! pktburst Core Library
//!
//! This crate provides the fundamental types, configuration, sink trait and
//! error handling shared by the pktburst frame builder and burst transmitter.

pub mod config;
pub mod error;
pub mod interface;
pub mod sink;
pub mod types;

// Re-export commonly used types
pub use config::EngineConfig;
pub use error::{Error, Result, SinkError};
pub use interface::{Interface, InterfaceSink};
pub use sink::{CachedPass, PassError, RawSink};
pub use types::*;
