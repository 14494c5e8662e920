//! Engine configuration shared by the frame builder and the transmitter

use crate::{Error, Result};

/// Default maximum frame size: 1500-byte MTU plus the 14-byte link header (no FCS)
pub const DEFAULT_MAX_FRAME_SIZE: usize = 1514;

/// Size of the Ethernet link header (dst + src + type/length)
pub const LINK_HEADER_SIZE: usize = 14;

/// Configuration consumed by the frame builder and burst transmitter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// Largest frame (link header included, FCS excluded) that may be built
    pub max_frame_size: usize,
    /// Whether plans with an unbounded repeat count may be transmitted
    pub allow_unbounded: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_frame_size: DEFAULT_MAX_FRAME_SIZE,
            allow_unbounded: false,
        }
    }
}

impl EngineConfig {
    /// Create a configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum frame size
    pub fn with_max_frame_size(mut self, size: usize) -> Self {
        self.max_frame_size = size;
        self
    }

    /// Allow or forbid unbounded transmission
    pub fn with_unbounded(mut self, allow: bool) -> Self {
        self.allow_unbounded = allow;
        self
    }

    /// Check that the configuration can describe at least a bare link header
    pub fn validate(&self) -> Result<()> {
        if self.max_frame_size < LINK_HEADER_SIZE {
            return Err(Error::InvalidConfig(format!(
                "max_frame_size {} is smaller than the {}-byte link header",
                self.max_frame_size, LINK_HEADER_SIZE
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.max_frame_size, 1514);
        assert!(!config.allow_unbounded);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builders() {
        let config = EngineConfig::new()
            .with_max_frame_size(9018)
            .with_unbounded(true);
        assert_eq!(config.max_frame_size, 9018);
        assert!(config.allow_unbounded);
    }

    #[test]
    fn test_too_small_is_invalid() {
        let config = EngineConfig::new().with_max_frame_size(13);
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
    }
}
