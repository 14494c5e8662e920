//! CLI interface for pktburst
//!
//! Argument parsing, TOML burst profiles, and the glue that turns either into
//! a transmission plan.

pub mod args;
pub mod profile;
pub mod request;

pub use args::{Cli, Commands, SendArgs};
pub use profile::BurstProfile;
pub use request::BurstRequest;
