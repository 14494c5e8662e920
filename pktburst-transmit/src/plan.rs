//! Transmission plans

use pktburst_core::{Error, Result};
use pktburst_packet::Frame;
use std::fmt;
use std::str::FromStr;

/// How many passes over the frame sequence a burst makes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepeatCount {
    /// Exactly this many passes; zero sends nothing
    Times(u64),
    /// Loop until cancelled
    Unbounded,
}

impl RepeatCount {
    /// Whether pass number `pass` (zero-based) should run
    pub fn allows(self, pass: u64) -> bool {
        match self {
            RepeatCount::Times(n) => pass < n,
            RepeatCount::Unbounded => true,
        }
    }

    pub fn is_unbounded(self) -> bool {
        matches!(self, RepeatCount::Unbounded)
    }
}

impl Default for RepeatCount {
    fn default() -> Self {
        RepeatCount::Times(1)
    }
}

impl fmt::Display for RepeatCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RepeatCount::Times(n) => write!(f, "{}", n),
            RepeatCount::Unbounded => write!(f, "unbounded"),
        }
    }
}

impl FromStr for RepeatCount {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "unbounded" | "infinite" | "inf" | "loop" => Ok(RepeatCount::Unbounded),
            other => other
                .parse::<u64>()
                .map(RepeatCount::Times)
                .map_err(|_| Error::profile(format!("invalid repeat count '{}'", s))),
        }
    }
}

/// Frames to send, how often, and whether to pre-serialize them
///
/// Cheap to clone: frames share their buffers.
#[derive(Debug, Clone)]
pub struct TransmissionPlan {
    frames: Vec<Frame>,
    repeat: RepeatCount,
    use_precomputed_cache: bool,
}

impl TransmissionPlan {
    /// Plan sending `frames` once, in streaming mode
    pub fn new(frames: Vec<Frame>) -> Self {
        Self {
            frames,
            repeat: RepeatCount::default(),
            use_precomputed_cache: false,
        }
    }

    /// Plan for a single frame
    pub fn single(frame: Frame) -> Self {
        Self::new(vec![frame])
    }

    /// Set the repeat count
    pub fn repeat(mut self, repeat: RepeatCount) -> Self {
        self.repeat = repeat;
        self
    }

    /// Repeat the pass `n` times
    pub fn times(self, n: u64) -> Self {
        self.repeat(RepeatCount::Times(n))
    }

    /// Repeat until cancelled
    pub fn unbounded(self) -> Self {
        self.repeat(RepeatCount::Unbounded)
    }

    /// Select cached-buffer mode
    pub fn cached(mut self, use_cache: bool) -> Self {
        self.use_precomputed_cache = use_cache;
        self
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn repeat_count(&self) -> RepeatCount {
        self.repeat
    }

    pub fn uses_cache(&self) -> bool {
        self.use_precomputed_cache
    }

    /// Bytes written by one pass
    pub fn pass_bytes(&self) -> usize {
        self.frames.iter().map(Frame::len).sum()
    }

    /// Total frames the plan will send if it runs to completion
    pub fn total_frames(&self) -> Option<u64> {
        match self.repeat {
            RepeatCount::Times(n) => Some(n.saturating_mul(self.frames.len() as u64)),
            RepeatCount::Unbounded => None,
        }
    }

    /// True if running the plan would write nothing
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty() || self.repeat == RepeatCount::Times(0)
    }
}
