//! Turning command-line input into a ready-to-run burst

use crate::args::SendArgs;
use crate::profile::BurstProfile;
use pktburst_core::{MacAddr, Result};
use pktburst_packet::{FrameBuilder, FrameSpec};
use pktburst_transmit::{RepeatCount, TransmissionPlan};
use tracing::debug;

/// Everything `send` needs before a sink is opened
#[derive(Debug, Clone)]
pub struct BurstRequest {
    pub specs: Vec<FrameSpec>,
    pub repeat: RepeatCount,
    pub cache: bool,
    pub config: pktburst_core::EngineConfig,
}

impl BurstRequest {
    /// Resolve flags and an optional profile; flags override the profile's plan
    /// and limits
    pub fn from_args(args: &SendArgs) -> Result<Self> {
        let (specs, base_repeat, base_cache, base_config) = match &args.profile {
            Some(path) => {
                let profile = BurstProfile::load(path)?;
                debug!(path = %path.display(), frames = profile.frames.len(), "Loaded profile");
                (
                    profile.frame_specs()?,
                    profile.repeat()?,
                    profile.plan.cache,
                    profile.engine_config()?,
                )
            }
            None => (
                vec![args.frame_spec()?],
                RepeatCount::default(),
                false,
                pktburst_core::EngineConfig::default(),
            ),
        };

        let repeat = args.repeat().unwrap_or(base_repeat);
        let config = args.apply_config(base_config);
        config.validate()?;

        Ok(Self {
            specs,
            repeat,
            cache: base_cache || args.cache,
            config,
        })
    }

    /// Build every frame for a sink with address `sink_address`
    ///
    /// All frames are built before anything is transmitted, so a bad frame
    /// never leaves a partial burst on the wire.
    pub fn build_plan(&self, sink_address: MacAddr) -> Result<TransmissionPlan> {
        let builder = FrameBuilder::new(self.config);
        let frames = self
            .specs
            .iter()
            .map(|spec| builder.build(spec, sink_address))
            .collect::<Result<Vec<_>>>()?;

        Ok(TransmissionPlan::new(frames)
            .repeat(self.repeat)
            .cached(self.cache))
    }
}
