//! Burst transmission engine for pktburst
//!
//! This crate replays built frames to a [`RawSink`](pktburst_core::RawSink)
//! as fast as the sink accepts them. It includes:
//!
//! - `TransmissionPlan`: frames, repeat count (finite or unbounded) and mode
//! - `BurstTransmitter`: streaming and cached-buffer transmission
//! - `CancelToken`: cooperative cancellation for unbounded bursts
//! - `BurstExecutor`: runs a burst on a dedicated blocking thread under Tokio
//! - `MemorySink`: in-memory sink for dry runs and tests
//!
//! # Example
//!
//! ```
//! use pktburst_core::{EngineConfig, MacAddr};
//! use pktburst_packet::{FrameBuilder, FrameSpec, Payload};
//! use pktburst_transmit::{BurstTransmitter, CancelToken, MemorySink, TransmissionPlan};
//!
//! let config = EngineConfig::default();
//! let mut sink = MemorySink::new(MacAddr([0x02, 0, 0, 0, 0, 1]));
//! let recording = sink.recording();
//!
//! let frame = FrameBuilder::new(config)
//!     .build_for(&FrameSpec::broadcast(0x1234).payload(Payload::text("hi")), &sink)
//!     .unwrap();
//! let plan = TransmissionPlan::single(frame).times(1000).cached(true);
//!
//! let result = BurstTransmitter::new(config).transmit(&plan, &mut sink, &CancelToken::new());
//! assert!(result.is_success());
//! assert_eq!(result.frames_sent, 1000);
//! assert_eq!(recording.frame_count(), 1000);
//! ```

pub mod cancel;
pub mod executor;
pub mod memory;
pub mod plan;
pub mod result;
pub mod stats;
pub mod transmitter;

pub use cancel::CancelToken;
pub use executor::{BurstExecutor, BurstHandle};
pub use memory::{MemoryRecording, MemorySink};
pub use plan::{RepeatCount, TransmissionPlan};
pub use result::TransmissionResult;
pub use stats::{BurstStats, BurstStatsCounters};
pub use transmitter::BurstTransmitter;
